//! Shared test utilities for `clue-core`.

use clue_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::PointSet;

/// Builds a standard proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Points `0, 1, .., n - 1` on a line. With `dc = 1.5` point `n - 2` is the
/// only seed, `n - 1` follows it, and every other point follows its
/// right-hand neighbour.
#[must_use]
pub(crate) fn line(n: usize) -> PointSet<1> {
    PointSet::try_new((0..n).map(|i| [i as f32]).collect()).expect("line points are finite")
}
