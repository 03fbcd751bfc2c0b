//! Error types for rolling risk models.

use statrisk_model::ModelError;
use statrisk_primitives::{Date, FrameError};
use statrisk_traits::ConfigError;
use statrisk_utils::UtilsError;

/// Errors that can occur while fitting, transforming or persisting a rolling
/// risk model.
#[derive(Debug, thiserror::Error)]
pub enum RollingError {
    /// Model error outside a window.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Persistence error.
    #[error("persistence error: {0}")]
    Utils(#[from] UtilsError),

    /// Labeled table error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// File system error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The persistence worker pool could not be started.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Fitting a window failed.
    #[error("failed to fit window {index} ending {date}: {source}")]
    Fit {
        /// Row index of the window's last period.
        index: usize,
        /// Date of the window's last period.
        date: Date,
        /// Underlying error.
        source: Box<ModelError>,
    },

    /// Transforming the model at a date failed.
    #[error("failed to transform model at {date}: {source}")]
    Transform {
        /// Model date.
        date: Date,
        /// Underlying error.
        source: Box<ModelError>,
    },

    /// Not enough periods for a single window.
    #[error("insufficient history: need more than {window} periods, got {periods}")]
    InsufficientHistory {
        /// Window length.
        window: usize,
        /// Available periods.
        periods: usize,
    },

    /// Not enough periods before a model date.
    #[error("insufficient history before {date}: need {required} periods, got {available}")]
    MissingHistory {
        /// Model date.
        date: Date,
        /// Required preceding periods.
        required: usize,
        /// Available preceding periods.
        available: usize,
    },

    /// A required date is absent from the input.
    #[error("date {0} not found")]
    MissingDate(Date),

    /// The rolling model holds no fitted models.
    #[error("rolling model has not been fitted")]
    NotFitted,
}

impl RollingError {
    /// Date the error is attached to, if any.
    #[must_use]
    pub const fn date(&self) -> Option<Date> {
        match self {
            Self::Fit { date, .. }
            | Self::Transform { date, .. }
            | Self::MissingHistory { date, .. }
            | Self::MissingDate(date) => Some(*date),
            _ => None,
        }
    }
}
