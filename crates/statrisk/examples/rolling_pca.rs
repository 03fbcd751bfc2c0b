//! Example: Rolling PCA Risk Model
//!
//! Walks through the statrisk workflow on simulated returns:
//! 1. Simulating a three-factor market over an estimation universe
//! 2. Fitting a rolling PCA factor risk model
//! 3. Transforming it onto a wider model universe
//! 4. Rescaling the latest correlation with volatility forecasts and shrinkage
//! 5. Persisting the rolling model and reading it back
//!
//! Run with: `RUST_LOG=info cargo run --example rolling_pca`

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use statrisk::{
    model::{CovParams, NComponents, Pca, PcaConfig, ShrinkageConfig, Wls},
    primitives::{Date, FrameError, Series, TimeFrame},
    rolling::{RollingConfig, RollingCovarianceEstimator, RollingFactorRiskModel},
    traits::RiskModel,
    utils::TableFormat,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Number of simulated business days
const PERIODS: usize = 300;

/// Instruments used to extract factors
const ESTIMATION_UNIVERSE: usize = 40;

/// Additional instruments only covered through `transform`
const EXTRA_INSTRUMENTS: usize = 20;

/// Rolling window length
const WINDOW: usize = 120;

/// Latent factors in the simulation
const FACTORS: usize = 3;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let returns = simulate_returns(ESTIMATION_UNIVERSE + EXTRA_INSTRUMENTS)?;
    let estimation = returns.select_columns(&returns.columns()[..ESTIMATION_UNIVERSE])?;
    info!(periods = returns.nrows(), instruments = returns.ncols(), "simulated returns");

    // Step 1: Rolling PCA on the estimation universe
    let pca =
        Pca::new(PcaConfig { n_components: NComponents::Count(FACTORS), ..PcaConfig::default() })?;
    let config = RollingConfig { window: WINDOW, show_progress: true };
    let mut rolling = RollingFactorRiskModel::new(config)?;
    rolling.fit(&pca, &estimation, None, None)?;

    // Step 2: Extend every date to the full universe
    rolling.transform(&returns, None, &Wls::new(), None)?;

    let (last_date, last_model) = rolling.items().next_back().ok_or("no fitted model")?;
    print_model_summary(*last_date, last_model.factors().len(), rolling.len());

    // Step 3: Volatility-rescaled, shrunk covariance on the latest date
    let vol = last_model.vol(&CovParams::with_halflife(60.0))?;
    print_volatilities(&vol);

    let forecasts = TimeFrame::new(
        rolling.keys().copied().collect(),
        returns.columns().to_vec(),
        Array2::from_elem((rolling.len(), returns.ncols()), 0.02),
    )?;
    let estimator = RollingCovarianceEstimator::new(&rolling, ShrinkageConfig::constant(0.2))?;
    let covariances = estimator.cov(Some(&forecasts))?;
    if let Some(cov) = covariances.get(last_date) {
        info!(instruments = cov.ncols(), "shrunk covariance on {last_date}");
        println!("Shrunk covariance {}x{} on {last_date}", cov.nrows(), cov.ncols());
    }

    // Step 4: Persistence round trip
    let dir = tempfile::tempdir()?;
    rolling.write_directory(dir.path(), TableFormat::Parquet)?;
    let restored = RollingFactorRiskModel::read_directory(dir.path())?;
    println!("Restored {} models from {}", restored.len(), dir.path().display());

    Ok(())
}

// ============================================================================
// SIMULATION
// ============================================================================

fn simulate_returns(instruments: usize) -> Result<TimeFrame, FrameError> {
    let mut rng = StdRng::seed_from_u64(42);
    let loadings = Array2::from_shape_fn((FACTORS, instruments), |_| rng.gen_range(0.2..1.5));
    let factors = Array2::from_shape_fn((PERIODS, FACTORS), |_| rng.gen_range(-0.02..0.02));
    let noise = Array2::from_shape_fn((PERIODS, instruments), |_| rng.gen_range(-0.005..0.005));
    let values = factors.dot(&loadings) + noise;

    let names = (0..instruments).map(|j| format!("SIM{j:03}")).collect();
    TimeFrame::new(business_days(PERIODS), names, values)
}

fn business_days(n: usize) -> Vec<Date> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();
    (0..)
        .map(|i| start + Duration::days(i))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(n)
        .collect()
}

// ============================================================================
// OUTPUT
// ============================================================================

fn print_model_summary(date: Date, factors: usize, models: usize) {
    println!("{}", "=".repeat(60));
    println!("Rolling PCA risk model");
    println!("{}", "=".repeat(60));
    println!("  Models:         {models}");
    println!("  Latest date:    {date}");
    println!("  Factors:        {factors}");
    println!("  Window:         {WINDOW}");
    println!();
}

fn print_volatilities(vol: &Series) {
    println!("Half-life volatility (first 5 instruments):");
    for (name, v) in vol.index().iter().zip(vol.values().iter()).take(5) {
        println!("  {name:<8} {:>8.4}%", v * 100.0);
    }
    println!();
}
