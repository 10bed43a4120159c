//! Logging setup for the lamina CLI.
//!
//! Library crates emit `tracing` events; this module installs the subscriber
//! that renders them on stderr.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for the lamina crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, when set
//! 4. info for the lamina crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "lamina=debug,lamina_bundler=debug,lamina_config=debug,lamina_cli=debug";
const QUIET_FILTER: &str = "lamina=error,lamina_bundler=error,lamina_config=error,lamina_cli=error";
const DEFAULT_FILTER: &str = "lamina=info,lamina_bundler=info,lamina_config=info,lamina_cli=info";

/// Initialize the global tracing subscriber.
///
/// Call once, before any logging occurs. `verbose` wins over `quiet`.
///
/// ```rust,no_run
/// use lamina_cli::logger::init_logger;
///
/// // Errors only, no ANSI escapes (CI logs)
/// init_logger(false, true, true);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether colored output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise stderr
/// terminal capabilities decide.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
