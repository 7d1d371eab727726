/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Strategy not found: {0}")]
    StrategyNotFound(String),

    #[error("Duplicate strategy: {0}")]
    DuplicateStrategy(String),

    #[error("Strategy is running: {0}")]
    StrategyRunning(String),

    #[error("Invalid slice transition: {0}")]
    InvalidTransition(String),

    #[error("Scheduler channel closed: {0}")]
    ChannelClosed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
