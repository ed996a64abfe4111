use proptest::test_runner::Config;

/// Shared configuration for the crate's property tests.
///
/// Miri gets a handful of cases and no failure persistence, as it has no file system.
pub(crate) fn proptest_cfg() -> Config {
    if cfg!(miri) {
        Config {
            failure_persistence: None,
            cases: 8,
            ..Config::default()
        }
    } else {
        Config::default()
    }
}
