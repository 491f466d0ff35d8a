//! Minimal stderr logger for the CLI and examples.
//!
//! With `cci-core`'s `tracing` feature on, stage spans reach this logger
//! through `tracing`'s `log` bridge.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::time::Instant;

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let t = self.started.elapsed().as_secs_f64();
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "[{t:9.3}s {:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the logger at `level`. Fails if another logger is already set.
pub fn init_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger {
        level,
        started: Instant::now(),
    }))?;
    log::set_max_level(level);
    Ok(())
}

/// Parse `off|error|warn|info|debug|trace` (case-insensitive), defaulting to `info`.
pub fn parse_level(level: Option<&str>) -> Result<LevelFilter, String> {
    match level {
        None => Ok(LevelFilter::Info),
        Some(s) => s
            .parse()
            .map_err(|_| format!("invalid log level '{s}', expected off|error|warn|info|debug|trace")),
    }
}
