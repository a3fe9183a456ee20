//! Logger initialisation for the simulator and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Filter applied when `RUST_LOG` is unset.
///
/// Quiet mode shows pursuit transitions at `info` and everything else at
/// `warn`; verbose mode drops both by one level.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let (global, own) = if verbose {
        (LevelFilter::Info, LevelFilter::Debug)
    } else {
        (LevelFilter::Warn, LevelFilter::Info)
    };
    format!("{global},{}={own}", env!("CARGO_CRATE_NAME"))
}

/// Initializes the global logger.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}
