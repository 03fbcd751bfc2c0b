//! Windowed fitting and transformation.

use std::collections::BTreeMap;

use ndarray::Array1;
use statrisk_model::{FactorExtractor, FactorRiskModel, ModelError, ZERO_RETURN};
use statrisk_primitives::{Date, TimeFrame, Validity};
use statrisk_traits::Regressor;
use tracing::{debug, info, warn};

use crate::{RollingError, RollingFactorRiskModel, progress::window_progress};

impl RollingFactorRiskModel {
    /// Fit one model per date over trailing windows of `returns`.
    ///
    /// For every row `i ≥ window` the rows `i - window..=i` are restricted to
    /// the instruments valid at date `i`, missing returns are set to zero, and
    /// the extractor is fitted with the weights row at date `i`. Dates without
    /// any valid instrument, or whose valid instruments have no returns over
    /// the window, are skipped. The previous models are replaced only
    /// once every window has been fitted.
    ///
    /// # Errors
    /// Returns `RollingError::InsufficientHistory` when `returns` has no more
    /// than `window` rows, or `RollingError::Fit` naming the first window that
    /// failed.
    pub fn fit<E: FactorExtractor + ?Sized>(
        &mut self,
        extractor: &E,
        returns: &TimeFrame,
        validity: Option<&Validity>,
        weights: Option<&TimeFrame>,
    ) -> Result<(), RollingError> {
        let window = self.config.window;
        let periods = returns.nrows();
        if periods <= window {
            return Err(RollingError::InsufficientHistory { window, periods });
        }

        let progress = window_progress(self.config.show_progress, periods - window, "fit");
        let mut values = BTreeMap::new();
        for index in window..periods {
            let date = returns.index()[index];
            let fitted = fit_window(extractor, returns, validity, weights, index - window, index)
                .map_err(|source| RollingError::Fit { index, date, source: Box::new(source) })?;
            match fitted {
                Some(model) => {
                    values.insert(date, model);
                }
                None => warn!(%date, "no valid instruments with returns, skipping date"),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(models = values.len(), window, "fitted rolling factor risk model");
        self.values = values;
        Ok(())
    }

    /// Regress new returns on each model's factor returns.
    ///
    /// Every model dated on or after `start_date` is replaced by its
    /// [`FactorRiskModel::transform`] on the `window + 1` rows of `y` ending at
    /// the model date, restricted to the instruments valid at that date with
    /// missing returns set to zero. Models without any valid instrument are
    /// kept unchanged. The previous models are replaced only once every date
    /// has been transformed.
    ///
    /// # Errors
    /// Returns `RollingError::NotFitted` on an empty model,
    /// `RollingError::MissingDate` if a model date is absent from `y`,
    /// `RollingError::MissingHistory` if `y` has fewer than `window` rows
    /// before a model date, or `RollingError::Transform` naming the date that
    /// failed.
    pub fn transform<R: Regressor + ?Sized>(
        &mut self,
        y: &TimeFrame,
        validity: Option<&Validity>,
        regressor: &R,
        start_date: Option<Date>,
    ) -> Result<(), RollingError> {
        if self.values.is_empty() {
            return Err(RollingError::NotFitted);
        }
        let window = self.config.window;
        let pending: Vec<(&Date, &FactorRiskModel)> =
            self.values.iter().filter(|(date, _)| start_date.is_none_or(|s| **date >= s)).collect();

        let progress = window_progress(self.config.show_progress, pending.len(), "transform");
        let mut values = self.values.clone();
        for (&date, model) in pending {
            let end = y.row_position(&date).ok_or(RollingError::MissingDate(date))?;
            if end < window {
                return Err(RollingError::MissingHistory { date, required: window, available: end });
            }

            let slice = y.slice_rows(end - window..end + 1)?;
            let Some(slice) = restrict(slice, validity, &date)? else {
                warn!(%date, "no valid instruments, keeping model");
                progress.inc(1);
                continue;
            };

            debug!(%date, instruments = slice.ncols(), "transforming window");
            let transformed = model
                .transform(&slice, regressor)
                .map_err(|source| RollingError::Transform { date, source: Box::new(source) })?;
            values.insert(date, transformed);
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(models = values.len(), window, "transformed rolling factor risk model");
        self.values = values;
        Ok(())
    }
}

fn fit_window<E: FactorExtractor + ?Sized>(
    extractor: &E,
    returns: &TimeFrame,
    validity: Option<&Validity>,
    weights: Option<&TimeFrame>,
    start: usize,
    end: usize,
) -> Result<Option<FactorRiskModel>, ModelError> {
    let date = returns.index()[end];
    let slice = returns.slice_rows(start..end + 1)?;
    let Some(slice) = restrict(slice, validity, &date)? else {
        return Ok(None);
    };
    if slice.values().iter().all(|r| r.abs() < ZERO_RETURN) {
        return Ok(None);
    }

    let weights = weights.map(|w| weights_at(w, &date, slice.columns())).transpose()?;
    debug!(%date, instruments = slice.ncols(), "fitting window");
    extractor.fit(&slice, weights.as_ref().map(Array1::view)).map(Some)
}

/// Keep the instruments valid at `date` and zero-fill missing returns.
/// `None` when no instrument is valid.
fn restrict(
    slice: TimeFrame,
    validity: Option<&Validity>,
    date: &Date,
) -> Result<Option<TimeFrame>, ModelError> {
    let slice = match validity {
        Some(validity) => {
            let valid = valid_columns(validity, date, slice.columns());
            if valid.is_empty() {
                return Ok(None);
            }
            slice.select_columns(&valid)?
        }
        None => slice,
    };
    Ok(Some(slice.fill_nan(0.0)))
}

/// Instruments flagged valid at `date`. Instruments missing from the validity
/// table, and every instrument on a date missing from it, are invalid.
fn valid_columns(validity: &Validity, date: &Date, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|name| validity.get(date, name).copied().unwrap_or(false))
        .cloned()
        .collect()
}

/// Weights at `date` aligned to `columns`; missing or NaN weights become zero.
fn weights_at(
    weights: &TimeFrame,
    date: &Date,
    columns: &[String],
) -> Result<Array1<f64>, ModelError> {
    let position = weights
        .row_position(date)
        .ok_or_else(|| ModelError::Misaligned(format!("no instrument weights at {date}")))?;
    let row = weights
        .slice_rows(position..position + 1)?
        .reindex_columns(columns, 0.0)?
        .fill_nan(0.0);
    Ok(row.values().row(0).to_owned())
}
