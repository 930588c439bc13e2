use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::core::types::EntityId),

    #[error("Behavior not assigned to entity: {0}")]
    BehaviorNotAssigned(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PackError>;
