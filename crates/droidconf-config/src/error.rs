//! Descriptor loading errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("duplicate definition: {0}")]
    Duplicate(String),

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("minSdk {min_sdk} is greater than targetSdk {target_sdk}")]
    InvalidVersionOrdering { min_sdk: u32, target_sdk: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<kdl::KdlError> for ConfigError {
    fn from(err: kdl::KdlError) -> Self {
        ConfigError::MalformedInput(err.to_string())
    }
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
