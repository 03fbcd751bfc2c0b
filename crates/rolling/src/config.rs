//! Rolling model configuration.

use serde::{Deserialize, Serialize};
use statrisk_traits::{ConfigError, ModelConfig};

/// Default window, one year of daily periods.
pub const DEFAULT_WINDOW: usize = 252;

/// Configuration for rolling risk models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Number of periods preceding each model date. Every window spans
    /// `window + 1` periods including the date itself.
    pub window: usize,
    /// Show a progress bar while fitting or transforming.
    pub show_progress: bool,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self { window: DEFAULT_WINDOW, show_progress: false }
    }
}

impl RollingConfig {
    /// Configuration with the given window and no progress bar.
    #[must_use]
    pub const fn with_window(window: usize) -> Self {
        Self { window, show_progress: false }
    }
}

impl ModelConfig for RollingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::Invalid("rolling window must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_window_is_invalid() {
        assert!(RollingConfig::with_window(0).validate().is_err());
        assert!(RollingConfig::default().validate().is_ok());
    }

    #[test]
    fn dict_round_trip() {
        let config = RollingConfig { window: 5, show_progress: true };
        let dict = config.to_dict().unwrap();
        assert_eq!(dict["window"], 5);
        assert_eq!(RollingConfig::from_dict(dict).unwrap(), config);
    }
}
