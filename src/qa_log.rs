//! Newline-delimited JSON answer log.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_LOG_PATH: &str = "outputs/qa_log.jsonl";

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to write log {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub question: String,
    pub answer: String,
}

impl LogEntry {
    /// Stamps the entry with the current local time.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Replaces whatever is at `path` with one JSON object per entry.
pub fn write_log(path: &Path, entries: &[LogEntry]) -> Result<(), LogError> {
    let io_err = |source| LogError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    for entry in entries {
        let json = serde_json::to_string(entry)?;
        writeln!(writer, "{}", json).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    log::info!("Wrote {} answers to {}", entries.len(), path.display());
    Ok(())
}

pub fn read_log(path: &Path) -> std::io::Result<Vec<LogEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}
