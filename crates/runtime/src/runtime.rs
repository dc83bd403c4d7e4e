//! High-level runtime orchestrator.
//!
//! The runtime owns the shared world and the turn scheduler task, and
//! hands out [`GameHandle`] clones for clients to drive the session.
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use outbreak_core::{Game, GameConfig};

use crate::handle::GameHandle;
use crate::{bots, scheduler};

/// Runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Skip spawning the real-time scheduler; turns then only advance
    /// through [`GameHandle::advance_turn`].
    pub manual_ticks: bool,
}

/// Owns the session for its lifetime.
///
/// Dropping the runtime aborts the scheduler; handles obtained earlier
/// keep the world alive but no further timed turns run.
pub struct Runtime {
    handle: GameHandle,
    scheduler: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Builds the world, seeds the bot population, and starts the turn
    /// scheduler unless manual ticking was requested.
    pub fn start(config: RuntimeConfig) -> Self {
        let mut game = Game::new(config.game_config);
        bots::restock(&mut game);
        tracing::info!(
            width = game.config().map_width,
            height = game.config().map_height,
            bots = game.config().bot_count,
            "session started"
        );

        let game = Arc::new(RwLock::new(game));
        let scheduler = if config.manual_ticks {
            None
        } else {
            Some(scheduler::spawn(Arc::clone(&game)))
        };
        Self {
            handle: GameHandle::new(game),
            scheduler,
        }
    }

    /// A cloneable handle for clients and async tasks.
    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.abort();
        }
    }
}
