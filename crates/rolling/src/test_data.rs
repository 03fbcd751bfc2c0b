//! Shared sample returns for tests.
//!
//! Same fixture as the `factor_risk_model` tests of `statrisk-model`; keep the
//! two in step. `fixture_matches_model_reference` pins it to the model's
//! full-sample PCA exposures.

use ndarray::array;
use statrisk_primitives::{Date, TimeFrame};

pub(crate) fn instruments() -> Vec<String> {
    ["A", "AAL", "AAP", "AAPL"].iter().map(ToString::to_string).collect()
}

/// Business days 2016-01-04 through 2016-01-15.
pub(crate) fn dates() -> Vec<Date> {
    [4, 5, 6, 7, 8, 11, 12, 13, 14, 15]
        .iter()
        .map(|&d| Date::from_ymd_opt(2016, 1, d).unwrap())
        .collect()
}

pub(crate) fn daily_returns() -> TimeFrame {
    TimeFrame::new(
        dates(),
        instruments(),
        array![
            [-0.02678756, -0.03400254, 0.0, 0.000855],
            [-0.00344077, -0.00953307, 0.0, -0.02505943],
            [0.00443915, 0.01752232, 0.0, -0.01956966],
            [-0.04247514, -0.01891826, 0.0, -0.04220453],
            [-0.01051272, -0.00197782, 0.0, 0.00528776],
            [-0.01684373, 0.01758743, 0.0, 0.01619198],
            [0.00658919, 0.02239528, 0.0, 0.01451376],
            [-0.03482585, -0.0452383, 0.0, -0.02571051],
            [0.02034743, 0.01122229, 0.0, 0.02187115],
            [-0.01329412, -0.04414332, 0.0, -0.02401548],
        ],
    )
    .unwrap()
}

#[test]
fn fixture_matches_model_reference() {
    use approx::assert_abs_diff_eq;
    use statrisk_model::{FactorExtractor, NComponents, Pca, PcaConfig};

    let config = PcaConfig { n_components: NComponents::Count(2), ..PcaConfig::default() };
    let model = Pca::new(config).unwrap().fit(&daily_returns(), None).unwrap();
    assert_abs_diff_eq!(
        model.factor_exposures().values().view(),
        array![
            [-0.15454215, -0.22795166, 0.0, -0.17179763],
            [0.00706732, 0.08354979, 0.0, -0.11721647]
        ]
        .view(),
        epsilon = 1e-7
    );
}
