//! Minimal stderr backend for the `log` facade

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    color: bool,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let (color, label) = match record.level() {
            Level::Error => ("31", "error"),
            Level::Warn => ("33", "warn"),
            Level::Info => ("32", "info"),
            Level::Debug => ("36", "debug"),
            Level::Trace => ("90", "trace"),
        };

        if self.color {
            eprintln!("\x1b[{}m{}\x1b[0m [{}] {}", color, label, record.target(), record.args());
        } else {
            eprintln!("{} [{}] {}", label, record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs the logger, `verbosity` is the number of `-v` flags
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let logger = StderrLogger {
        color: atty::is(atty::Stream::Stderr),
    };

    // Only fails if a logger is already installed
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
