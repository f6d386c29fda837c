//! # Simulator Error Types

use delivery_domain::DomainError;
use thiserror::Error;

use crate::config::ConfigError;

/// Simulator-level errors
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Simulation loop is no longer running")]
    Stopped,
}

/// Result type alias for simulator operations
pub type SimulatorResult<T> = Result<T, SimulatorError>;
