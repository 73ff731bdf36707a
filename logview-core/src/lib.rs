pub mod model;
pub mod decode;
pub mod search;
pub mod ansi;
pub mod host;
pub mod clipboard;
pub mod viewer;
pub mod modal;
pub mod jobs;
pub mod settings;
pub mod logging;

pub use model::{LogData, LogItem, LogLevel, parse_log_payload};
pub use decode::{decode_message, encode_message, DecodeError};
pub use search::filter_lines;
pub use ansi::{AnsiColor, AnsiSpan, AnsiStyle};
pub use host::{ClipboardError, DirectoryHost, FetchError, LogHost, SnapshotHost, classify_line};
pub use clipboard::SystemClipboard;
pub use viewer::{CopyFeedback, CopyIcon, LevelCounts, StatusKind, StatusMessage, ViewerState};
pub use modal::{ModalEvent, ModalPhase, ModalState, ViewerOptions};
pub use jobs::{FetchJob, JobRunner};
pub use settings::{ViewerSettings, SettingsStore, default_logs_dir};
pub use logging::init_logging;
