//! File sink behind the client log relay.
//!
//! Every accepted line goes to `server.log`; error lines are also copied to
//! `error.log`. Writes are appends of whole lines, serialized through a mutex
//! so concurrent requests never interleave within a line.

use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub const SERVER_LOG: &str = "server.log";
pub const ERROR_LOG: &str = "error.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Unknown log level '{}'", other)),
        }
    }
}

/// Render one relay line: `YYYY-MM-DD HH:MM:SS [LEVEL]: message`
pub fn format_line(at: DateTime<Local>, level: LogLevel, message: &str) -> String {
    format!(
        "{} [{}]: {}\n",
        at.format("%Y-%m-%d %H:%M:%S"),
        level.label(),
        message
    )
}

#[derive(Debug)]
pub struct LogSink {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LogSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the log directory if it does not exist yet
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    pub async fn record(&self, level: LogLevel, message: &str) -> std::io::Result<()> {
        let line = format_line(Local::now(), level, message);

        let _guard = self.write_lock.lock().await;
        self.ensure_dir().await?;
        append(&self.dir.join(SERVER_LOG), &line).await?;

        if level == LogLevel::Error {
            append(&self.dir.join(ERROR_LOG), &line).await?;
        }

        Ok(())
    }
}

async fn append(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_level_parsing() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" error ".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("debug".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_line_format() {
        let at = Local.with_ymd_and_hms(2024, 5, 2, 14, 3, 9).unwrap();
        assert_eq!(
            format_line(at, LogLevel::Warn, "disk almost full"),
            "2024-05-02 14:03:09 [WARN]: disk almost full\n"
        );
    }

    #[tokio::test]
    async fn test_error_lines_go_to_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("logs"));

        sink.record(LogLevel::Info, "member saved").await.unwrap();
        sink.record(LogLevel::Error, "save failed").await.unwrap();

        let server = std::fs::read_to_string(dir.path().join("logs").join(SERVER_LOG)).unwrap();
        let errors = std::fs::read_to_string(dir.path().join("logs").join(ERROR_LOG)).unwrap();

        assert_eq!(server.lines().count(), 2);
        assert!(server.contains("[INFO]: member saved"));
        assert!(server.contains("[ERROR]: save failed"));
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.contains("[ERROR]: save failed"));
    }
}
