//! Rolling File Logger
//!
//! Writes tracing output to stderr and to one log file per day
//! (`<app>.<YYYY-MM-DD>.log`), keeping at most `max_files` of them.
//! Records emitted through the `log` facade are bridged into tracing.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use chrono::{Local, NaiveDate};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Files kept when the caller does not say otherwise.
pub const DEFAULT_MAX_FILES: usize = 7;

static ACTIVE_LOG: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    InvalidLevel(String),
    AlreadyInitialized,
    NotInitialized,
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "log file error: {}", e),
            LoggerError::InvalidLevel(level) => write!(f, "invalid log level: {}", level),
            LoggerError::AlreadyInitialized => write!(f, "logger already initialized"),
            LoggerError::NotInitialized => write!(f, "logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// File writer that switches to a new file when the local date changes
/// and deletes the oldest files past the retention limit.
pub struct RollingFileWriter {
    dir: PathBuf,
    app_name: String,
    max_files: usize,
    current_date: NaiveDate,
    file: File,
}

impl RollingFileWriter {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str, max_files: usize) -> Result<Self, LoggerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let today = Local::now().date_naive();
        let file = open_log_file(&dir, app_name, today)?;
        let writer = Self {
            dir,
            app_name: app_name.to_string(),
            max_files: max_files.max(1),
            current_date: today,
            file,
        };
        writer.prune()?;
        Ok(writer)
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        log_file_path(&self.dir, &self.app_name, self.current_date)
    }

    fn roll_to(&mut self, date: NaiveDate) -> io::Result<()> {
        if date == self.current_date {
            return Ok(());
        }
        self.file.flush()?;
        self.file = open_log_file(&self.dir, &self.app_name, date)?;
        self.current_date = date;
        self.prune()
    }

    fn prune(&self) -> io::Result<()> {
        let files = list_log_files(&self.dir, &self.app_name)?;
        if files.len() <= self.max_files {
            return Ok(());
        }
        let excess = files.len() - self.max_files;
        for old in files.into_iter().take(excess) {
            fs::remove_file(old)?;
        }
        Ok(())
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.roll_to(Local::now().date_naive())?;
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn log_file_path(dir: &Path, app_name: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{}.log", app_name, date.format("%Y-%m-%d")))
}

fn open_log_file(dir: &Path, app_name: &str, date: NaiveDate) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(dir, app_name, date))
}

/// Log files belonging to `app_name`, oldest first.
fn list_log_files(dir: &Path, app_name: &str) -> io::Result<Vec<PathBuf>> {
    let prefix = format!("{}.", app_name);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(&prefix) && name.ends_with(".log") {
            files.push(path);
        }
    }
    // Date suffix is ISO formatted, so name order is age order.
    files.sort();
    Ok(files)
}

/// Parse a level name (`error`, `warn`, `info`, `debug`, `trace`, `off`).
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    let parsed = log::LevelFilter::from_str(level.trim())
        .map_err(|_| LoggerError::InvalidLevel(level.to_string()))?;
    Ok(match parsed {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    })
}

/// Install the global logger at `info` with the default retention.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, "info", DEFAULT_MAX_FILES)
}

/// Install the global logger.
///
/// Can only succeed once per process; later calls return
/// [`LoggerError::AlreadyInitialized`].
pub fn init_logger_with(
    log_dir: impl Into<PathBuf>,
    app_name: &str,
    level: &str,
    max_files: usize,
) -> Result<(), LoggerError> {
    let level = parse_level(level)?;
    let writer = RollingFileWriter::new(log_dir, app_name, max_files)?;
    let path = writer.current_path();

    tracing_subscriber::registry()
        .with(level)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(writer)),
        )
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    let _ = ACTIVE_LOG.set(path);
    Ok(())
}

/// File the logger was opened on, if initialized.
pub fn active_log_file() -> Option<&'static Path> {
    ACTIVE_LOG.get().map(PathBuf::as_path)
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn warn(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::warn!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", message);
    Ok(())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    if ACTIVE_LOG.get().is_some() {
        Ok(())
    } else {
        Err(LoggerError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_writer_creates_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingFileWriter::new(dir.path(), "crm", 3).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        let path = writer.current_path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("crm."));
        assert!(name.ends_with(".log"));
        assert_eq!(fs::read_to_string(path).unwrap(), "hello\n");
    }

    #[test]
    fn test_prune_keeps_newest_files() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=5 {
            File::create(log_file_path(dir.path(), "crm", date(2020, 1, day))).unwrap();
        }
        File::create(dir.path().join("other.2020-01-01.log")).unwrap();

        let writer = RollingFileWriter::new(dir.path(), "crm", 3).unwrap();

        let remaining = list_log_files(dir.path(), "crm").unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.contains(&writer.current_path()));
        assert!(!log_file_path(dir.path(), "crm", date(2020, 1, 1)).exists());
        assert!(dir.path().join("other.2020-01-01.log").exists());
    }

    #[test]
    fn test_roll_switches_file_on_new_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingFileWriter::new(dir.path(), "crm", 2).unwrap();
        let first = writer.current_path();

        writer.roll_to(date(2999, 12, 31)).unwrap();

        assert_ne!(writer.current_path(), first);
        assert!(writer.current_path().exists());
        assert_eq!(list_log_files(dir.path(), "crm").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::WARN);
        assert!(matches!(parse_level("loud"), Err(LoggerError::InvalidLevel(_))));
    }

    #[test]
    fn test_helpers_require_init() {
        if active_log_file().is_none() {
            assert!(matches!(info("x"), Err(LoggerError::NotInitialized)));
        }
    }
}
