//! Stderr logging for the `log` facade
//!
//! Backed by `env_logger`. Only this crate's records pass by default, and
//! lines are prefixed with `[true-north]` so they stay apart from frames
//! printed on stdout.

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Environment variable holding `env_logger` directives, e.g. `debug` or
/// `true_north=trace,reqwest=debug`. Applied after the `-v` level.
pub const LOG_ENV: &str = "TRUE_NORTH_LOG";

/// Level from the `-v` count
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logger builder: `level` for `true_north`, nothing else unless
/// `TRUE_NORTH_LOG` says so
pub fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Off)
        .filter_module("true_north", level)
        .parse_env(LOG_ENV)
        .format(|buf, record| writeln!(buf, "[true-north] {:<5} {}", record.level(), record.args()));
    builder
}

/// Install the logger. Later calls are no-ops.
pub fn init(level: LevelFilter) {
    if builder(level).try_init().is_err() {
        log::debug!("logger already installed");
    }
}
