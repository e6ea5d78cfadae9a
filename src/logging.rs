//! Logger initialisation for the binary and tests.

use env_logger::{Builder, Env};

/// Default filter for the crate's own messages.
const fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,skycarpet=debug"
    } else {
        "warn,skycarpet=info"
    }
}

/// Initializes the global logger.
///
/// When `verbose` is `true`, per-tick debug messages (collections, impacts,
/// remote snapshots) are printed. Otherwise only lifecycle events such as
/// world regeneration are shown. Other crates log at `warn` and above.
/// `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter(verbose)));
    builder.format_timestamp_millis();

    // Repeated initialisation is a no-op so tests may call this freely.
    let _ = builder.try_init();
}

/// Routes log output through the test harness's captured stdout.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or(default_filter(true)))
        .is_test(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, "warn,skycarpet=debug")]
    #[case(false, "warn,skycarpet=info")]
    fn filter_follows_verbosity(#[case] verbose: bool, #[case] expected: &str) {
        assert_eq!(default_filter(verbose), expected);
    }

    #[rstest]
    fn repeated_init_is_harmless() {
        init_for_tests();
        init(true);
        init(false);
        log::debug!("logger still usable after double init");
    }
}
