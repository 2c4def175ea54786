use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
    #[error(transparent)]
    Invalid(#[from] EngineError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
