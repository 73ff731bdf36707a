use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::ansi;
use crate::clipboard::SystemClipboard;
use crate::decode::encode_message;
use crate::model::{LogData, LogItem, LogLevel};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("log host call failed: {0}")]
    Host(String),
    #[error("log payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("log host did not answer within {0:?}")]
    Timeout(Duration),
    #[error("log fetch worker stopped without a result")]
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("host refused the clipboard write")]
    Rejected,
    #[error("clipboard error: {0}")]
    Backend(String),
}

/// Capabilities the embedding application exposes to the log viewer.
pub trait LogHost: Send + Sync {
    /// JSON text of a `LogData[]` array.
    fn get_plugin_logs(&self) -> Result<String, FetchError>;
    fn copy_to_clipboard(&self, data: &str) -> Result<(), ClipboardError>;
}

/// Serves every `*.log` / `*.txt` file below a directory as one log source.
pub struct DirectoryHost {
    root: PathBuf,
    clipboard: SystemClipboard,
}

impl DirectoryHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), clipboard: SystemClipboard::new() }
    }

    pub fn collect(&self) -> Result<Vec<LogData>, FetchError> {
        if !self.root.is_dir() {
            return Err(FetchError::Host(format!("log directory not found: {}", self.root.display())));
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_log_file(e.path()))
            .map(|e| e.into_path())
            .collect();
        files.sort();

        let names = source_names(&self.root, &files);
        let mut sources = Vec::with_capacity(files.len());
        for (path, name) in files.iter().zip(names) {
            let bytes = match fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    warn!("skipping unreadable log {}: {}", path.display(), e);
                    continue;
                }
            };
            debug!("read log source {} ({} bytes)", name, bytes.len());
            sources.push(LogData { name, logs: items_from_bytes(&bytes) });
        }
        sources.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sources)
    }
}

impl LogHost for DirectoryHost {
    fn get_plugin_logs(&self) -> Result<String, FetchError> {
        let sources = self.collect()?;
        info!("collected {} log source(s) from {}", sources.len(), self.root.display());
        Ok(serde_json::to_string(&sources)?)
    }

    fn copy_to_clipboard(&self, data: &str) -> Result<(), ClipboardError> {
        self.clipboard.set_text(data)
    }
}

/// Serves a previously captured JSON payload verbatim.
pub struct SnapshotHost {
    path: PathBuf,
    clipboard: SystemClipboard,
}

impl SnapshotHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), clipboard: SystemClipboard::new() }
    }
}

impl LogHost for SnapshotHost {
    fn get_plugin_logs(&self) -> Result<String, FetchError> {
        fs::read_to_string(&self.path).map_err(|e| FetchError::Host(format!("{}: {}", self.path.display(), e)))
    }

    fn copy_to_clipboard(&self, data: &str) -> Result<(), ClipboardError> {
        self.clipboard.set_text(data)
    }
}

fn stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default()
}

/// File stem per path, or the root-relative path without extension where stems collide.
fn source_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
    let stems: Vec<String> = files.iter().map(|p| stem(p)).collect();
    files
        .iter()
        .zip(&stems)
        .map(|(path, s)| {
            if stems.iter().filter(|other| *other == s).count() < 2 {
                return s.clone();
            }
            let rel = path.strip_prefix(root).unwrap_or(path).with_extension("");
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

fn is_log_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("log") || e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

fn items_from_bytes(bytes: &[u8]) -> Vec<LogItem> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .map(|line| LogItem {
            level: classify_line(&String::from_utf8_lossy(line)),
            message: encode_message(line),
        })
        .collect()
}

/// Guess a severity from the visible text of a raw log line.
pub fn classify_line(line: &str) -> LogLevel {
    let text = ansi::strip(line).to_lowercase();
    if ["error", "fatal", "panic", "[e]"].iter().any(|k| text.contains(k)) {
        LogLevel::Error
    } else if text.contains("warn") {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}
