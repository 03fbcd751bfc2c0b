//! Parallel directory persistence for rolling factor risk models.

use std::{collections::BTreeMap, fs, num::NonZeroUsize, path::Path, thread};

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use serde::{Deserialize, Serialize};
use statrisk_model::{FactorRiskModel, ModelError};
use statrisk_primitives::Date;
use statrisk_utils::{TableFormat, read_json, write_json};
use tracing::info;

use crate::{RollingConfig, RollingError, RollingFactorRiskModel};

/// Name of the index file at the root of a persisted rolling model.
pub const MANIFEST_FILE: &str = "manifest.json";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    config: RollingConfig,
    format: TableFormat,
    entries: BTreeMap<Date, String>,
}

impl RollingFactorRiskModel {
    /// Write every model into `path/<YYYY-MM-DD>/` and index them in
    /// `path/manifest.json`.
    ///
    /// Models are written in parallel; the manifest is written once all of
    /// them have succeeded.
    ///
    /// # Errors
    /// Returns `RollingError` if the worker pool cannot start or any file
    /// cannot be written.
    pub fn write_directory(&self, path: &Path, format: TableFormat) -> Result<(), RollingError> {
        fs::create_dir_all(path)?;
        let pool = persistence_pool()?;

        let entries = pool.install(|| {
            self.values
                .par_iter()
                .map(|(date, model)| {
                    let name = date.format(DATE_FORMAT).to_string();
                    model.write_directory(&path.join(&name), format)?;
                    Ok((*date, name))
                })
                .collect::<Result<BTreeMap<_, _>, ModelError>>()
        })?;

        let manifest = Manifest { config: self.config, format, entries };
        write_json(&manifest, &path.join(MANIFEST_FILE))?;
        info!(
            models = manifest.entries.len(),
            threads = pool.current_num_threads(),
            path = %path.display(),
            "wrote rolling factor risk model"
        );
        Ok(())
    }

    /// Read a rolling model written with
    /// [`write_directory`](Self::write_directory), loading models in parallel.
    ///
    /// # Errors
    /// Returns `RollingError` if the manifest or any listed model cannot be
    /// read.
    pub fn read_directory(path: &Path) -> Result<Self, RollingError> {
        let manifest: Manifest = read_json(&path.join(MANIFEST_FILE))?;
        let pool = persistence_pool()?;

        let values = pool.install(|| {
            manifest
                .entries
                .par_iter()
                .map(|(date, name)| {
                    FactorRiskModel::read_directory(&path.join(name), manifest.format)
                        .map(|model| (*date, model))
                })
                .collect::<Result<BTreeMap<_, _>, ModelError>>()
        })?;

        info!(models = values.len(), path = %path.display(), "read rolling factor risk model");
        Self::from_values(manifest.config, values)
    }
}

fn persistence_pool() -> Result<ThreadPool, RollingError> {
    let threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    Ok(ThreadPoolBuilder::new().num_threads(threads).build()?)
}
