use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Logger writing to stderr while remembering recent entries
#[derive(Clone)]
pub struct CliLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    warnings: Arc<AtomicUsize>,
    max_entries: usize,
    level: LevelFilter,
}

impl CliLogger {
    pub fn new(max_entries: usize, level: LevelFilter) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            warnings: Arc::new(AtomicUsize::new(0)),
            max_entries,
            level,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    /// Warnings and errors logged so far
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    fn record(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry);

        // Keep only the most recent entries
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(0..excess);
        }
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: format!("{}", record.args()),
        };

        if entry.level <= Level::Warn {
            self.warnings.fetch_add(1, Ordering::Relaxed);
        }

        eprintln!(
            "{} {:<5} [{}] {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.level,
            entry.target,
            entry.message
        );
        self.record(entry);
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn messages(logger: &CliLogger) -> Vec<String> {
        logger
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    fn emit(logger: &CliLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("test")
                .args(format_args!("{}", message))
                .build(),
        );
    }

    #[test]
    fn test_keeps_most_recent_entries() {
        let logger = CliLogger::new(2, LevelFilter::Info);
        emit(&logger, Level::Info, "one");
        emit(&logger, Level::Info, "two");
        emit(&logger, Level::Info, "three");

        assert_eq!(messages(&logger), vec!["two", "three"]);
    }

    #[test]
    fn test_counts_warnings_and_filters_debug() {
        let logger = CliLogger::new(10, LevelFilter::Info);
        emit(&logger, Level::Debug, "hidden");
        emit(&logger, Level::Warn, "careful");
        emit(&logger, Level::Error, "broken");

        assert_eq!(logger.warning_count(), 2);
        assert_eq!(messages(&logger), vec!["careful", "broken"]);
    }

    #[test]
    fn test_second_init_reports_error() {
        // Only this test installs the global logger
        let _ = CliLogger::new(10, LevelFilter::Info).init();
        let second = CliLogger::new(10, LevelFilter::Info).init();

        let err: anyhow::Error = second.unwrap_err().into();
        assert!(!err.to_string().is_empty());
    }
}
