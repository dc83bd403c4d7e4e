//! Bot upkeep: randomized intents each turn and population restocking.
use rand::Rng;

use outbreak_core::{Card, Direction, Game};

/// Assigns every alive bot a random direction and, when it holds a
/// weapon, a coin-flip chance of playing it this turn.
pub fn randomize(game: &mut Game) {
    let mut rng = rand::thread_rng();
    for bot in game.registry_mut().bots_mut() {
        if !bot.alive {
            continue;
        }
        bot.direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        bot.play = if bot.hand.find(Card::Weapon).is_some() && rng.gen_bool(0.5) {
            Card::Weapon
        } else {
            Card::Dice
        };
    }
}

/// Tops the alive bot population back up to the configured count.
pub fn restock(game: &mut Game) {
    let mut rng = rand::thread_rng();
    while game.registry().alive_bot_count() < game.config().bot_count {
        let name = format!("bot-{:04x}", rng.r#gen::<u16>());
        let id = game.join_bot(&name);
        tracing::debug!(bot = %id, "restocked bot");
    }
}
