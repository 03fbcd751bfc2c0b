//! Configuration records.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Errors raised by configuration validation and dictionary conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The configuration did not serialize to a JSON object.
    #[error("configuration is not a dictionary")]
    NotADictionary,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A validated, serializable configuration record.
///
/// Configurations are plain data with a `Default`. They are validated when a
/// model is constructed and never mutated afterwards.
pub trait ModelConfig:
    Default + Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// Check every field.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the offending field.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Export as a JSON dictionary.
    ///
    /// # Errors
    /// Returns `ConfigError` if serialization fails.
    fn to_dict(&self) -> Result<Map<String, Value>, ConfigError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::NotADictionary),
        }
    }

    /// Build from a JSON dictionary, then validate.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    /// Returns `ConfigError` if a key has the wrong type or validation fails.
    fn from_dict(dict: Map<String, Value>) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(Value::Object(dict))?;
        config.validate()?;
        Ok(config)
    }
}
