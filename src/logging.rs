//! Logging setup
//!
//! Installs a tracing subscriber that writes to stdout and to a size-capped
//! log file. When the file reaches its cap it is renamed to `<file>.1`
//! (older backups shift up) and a fresh file is started. With no backups
//! configured the file is never rotated.

use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, fmt::time::ChronoLocal, prelude::*, EnvFilter, Registry};

use crate::config::LogConfig;
use crate::error::{Result, TourboostError};
use crate::utils::ensure_parent;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Keeps the subscriber installed and the file writer alive.
///
/// Dropping it restores the previous default subscriber and flushes pending
/// log lines.
pub struct LogGuard {
    _default: DefaultGuard,
    _worker: WorkerGuard,
}

/// Install the stdout + file subscriber as the current thread's default.
///
/// `RUST_LOG` overrides the configured level.
pub fn init(config: &LogConfig) -> Result<LogGuard> {
    config.validate()?;
    let writer = RotatingFileWriter::open(&config.file, config.max_bytes, config.backups)?;
    let (file_writer, worker) = tracing_appender::non_blocking(writer);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| TourboostError::ConfigError(format!("log level '{}': {}", config.level, e)))?,
    };

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()));
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()));

    let subscriber = Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer);
    let default = tracing::subscriber::set_default(subscriber);

    Ok(LogGuard {
        _default: default,
        _worker: worker,
    })
}

/// File writer that rotates once the file would exceed `max_bytes`.
///
/// `backups == 0` disables rotation and the file grows without bound.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    backups: usize,
}

impl RotatingFileWriter {
    /// Open `path` for appending, creating parent directories
    pub fn open(path: &Path, max_bytes: u64, backups: usize) -> Result<Self> {
        ensure_parent(path)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            written,
            max_bytes,
            backups,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        for index in (1..self.backups).rev() {
            let from = backup_path(&self.path, index);
            if from.exists() {
                fs::rename(&from, backup_path(&self.path, index + 1))?;
            }
        }
        fs::rename(&self.path, backup_path(&self.path, 1))?;
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.backups > 0 && self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// `<path>.<index>`
pub fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
