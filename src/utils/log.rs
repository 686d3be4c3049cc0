use chrono::Local;
use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

const LOG_DIR: &str = "logs";

/// Writes records to stderr and, optionally, appends them to `logs/<file>`.
pub struct ChartLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl ChartLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level, file: None }
    }

    /// Also append every record to `logs/<filename>`, creating the
    /// directory if it doesn't exist.
    pub fn with_file(mut self, filename: &str) -> io::Result<Self> {
        self.file = Some(Mutex::new(open_log_file(filename)?));
        Ok(self)
    }
}

pub fn open_log_file(filename: &str) -> io::Result<File> {
    if !Path::new(LOG_DIR).exists() {
        std::fs::create_dir_all(LOG_DIR)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(LOG_DIR).join(filename))
}

fn format_record(record: &Record, level: &str) -> String {
    format!(
        "{} {} {}: {}",
        Local::now().format("%H:%M:%S%.3f"),
        level,
        record.target(),
        record.args()
    )
}

fn level_tag(level: Level) -> colored::ColoredString {
    let tag = format!("{:<5}", level);
    match level {
        Level::Error => tag.red().bold(),
        Level::Warn => tag.yellow(),
        Level::Info => tag.green(),
        Level::Debug => tag.blue(),
        Level::Trace => tag.dimmed(),
    }
}

impl Log for ChartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "{}",
            format_record(record, &level_tag(record.level()).to_string())
        );

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let line = format_record(record, &format!("{:<5}", record.level()));
                let _ = writeln!(file, "{}", line);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Failed to open log file: {0}")]
    File(#[from] io::Error),

    #[error("A logger is already installed")]
    AlreadyInstalled(#[from] SetLoggerError),
}

/// Installs [`ChartLogger`] as the global logger. Only the first call
/// succeeds; later calls return an error and leave the first logger in place.
pub fn init(level: LevelFilter, file: Option<&str>) -> Result<(), LoggerError> {
    let mut logger = ChartLogger::new(level);
    if let Some(filename) = file {
        logger = logger.with_file(filename)?;
    }
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
