//! Real-time turn pacing.
//!
//! A single background task counts the turn timer down once per second
//! and runs the full tick when it reaches zero. Everything that touches
//! the world happens under the write lock, so clients only ever observe
//! turn boundaries.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use outbreak_core::Game;

use crate::bots;

pub(crate) fn spawn(game: Arc<RwLock<Game>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut clock = tokio::time::interval(Duration::from_secs(1));
        clock.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            clock.tick().await;
            let mut game = game.write().await;
            game.state_mut().timer_down();
            if !game.state().is_turn_over() {
                continue;
            }

            bots::randomize(&mut game);
            game.tick();
            tracing::info!(
                turn = game.events().current_turn(),
                remaining = game.state().remaining_turns(),
                "turn resolved"
            );

            if game.state().is_game_over() {
                tracing::info!(won = game.state().have_won(), "session over, resetting world");
                game.reset_world();
            }
            bots::restock(&mut game);
            let config = game.config().clone();
            game.state_mut().reset_timer(&config);
        }
    })
}
