use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("No Flipper found. Checked patterns {patterns:?}. Pass port as argument.")]
    PortNotFound {
        patterns: Vec<String>,
        candidates: Vec<String>,
    },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Source error: {0}")]
    SourceError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

pub type DeployResult<T> = std::result::Result<T, DeployError>;
