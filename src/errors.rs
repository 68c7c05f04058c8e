use thiserror::Error;

use claimright_config::ConfigError;
use claimright_core::{CoreError, ErrorKind};
use claimright_domain::PeriodError;

/// Error type returned by [`crate::AccrualEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Classification of engine-level failures; configuration problems count
    /// as validation errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(err) => err.kind(),
            EngineError::Config(ConfigError::Invalid(_)) => ErrorKind::Validation,
            EngineError::Config(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<PeriodError> for EngineError {
    fn from(err: PeriodError) -> Self {
        EngineError::Core(err.into())
    }
}
