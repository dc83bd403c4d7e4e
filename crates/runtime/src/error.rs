use outbreak_core::{PlayerId, RegistryError};

/// Errors surfaced to runtime consumers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    /// The request named a player the registry does not know.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
}

impl From<RegistryError> for RuntimeError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::PlayerNotFound(id) => RuntimeError::PlayerNotFound(id),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
