use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::decode::{decode_message, DecodeError};
use crate::host::{ClipboardError, LogHost};
use crate::model::{LogData, LogLevel};
use crate::search::filter_lines;

pub const DEFAULT_FONT_SIZE: f32 = 16.0;
pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_secs(2);
/// Smallest size handed to the renderer; the stored size itself is never clamped.
pub const MIN_RENDER_FONT_SIZE: f32 = 1.0;
pub const UNDECODABLE_PLACEHOLDER: &str = "<undecodable log entry>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelCounts {
    pub errors: usize,
    pub warnings: usize,
}

impl LevelCounts {
    pub fn of(data: &LogData) -> Self {
        Self { errors: data.count_level(LogLevel::Error), warnings: data.count_level(LogLevel::Warning) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyIcon {
    #[default]
    Idle,
    Copied,
}

/// Copy button state with a single revert deadline. A new trigger replaces the old deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyFeedback {
    icon: CopyIcon,
    revert_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn icon(&self) -> CopyIcon {
        self.icon
    }

    pub fn revert_at(&self) -> Option<Instant> {
        self.revert_at
    }

    pub fn trigger(&mut self, now: Instant, hold: Duration) {
        self.icon = CopyIcon::Copied;
        self.revert_at = Some(now + hold);
    }

    /// Returns true when the icon changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.revert_at {
            Some(at) if now >= at => {
                self.icon = CopyIcon::Idle;
                self.revert_at = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// State of the detail view for one selected log source.
///
/// Built fresh on every selection, so search text, font size and copy feedback
/// never leak from a previous visit.
#[derive(Debug, Clone)]
pub struct ViewerState {
    source: LogData,
    lines: Vec<Result<String, DecodeError>>,
    query: String,
    visible: Vec<usize>,
    counts: LevelCounts,
    copy: CopyFeedback,
    copy_hold: Duration,
    font_size: f32,
    status: Option<StatusMessage>,
}

impl ViewerState {
    pub fn new(source: LogData) -> Self {
        Self::with_options(source, DEFAULT_FONT_SIZE, DEFAULT_COPY_FEEDBACK)
    }

    pub fn with_options(source: LogData, font_size: f32, copy_hold: Duration) -> Self {
        let lines: Vec<Result<String, DecodeError>> = source.logs.iter().map(|l| decode_message(&l.message)).collect();
        let failed = lines.iter().filter(|l| l.is_err()).count();
        let status = if failed > 0 {
            warn!("{}: {} log entr{} could not be decoded", source.name, failed, if failed == 1 { "y" } else { "ies" });
            Some(StatusMessage {
                kind: StatusKind::Warning,
                text: format!("{failed} entr{} could not be decoded", if failed == 1 { "y" } else { "ies" }),
            })
        } else {
            None
        };
        let counts = LevelCounts::of(&source);
        let visible = (0..lines.len()).collect();
        Self { source, lines, query: String::new(), visible, counts, copy: CopyFeedback::default(), copy_hold, font_size, status }
    }

    pub fn source(&self) -> &LogData {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn counts(&self) -> LevelCounts {
        self.counts
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.visible = filter_lines(&self.lines, &self.query);
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    /// Level and display text of every visible entry, in source order.
    pub fn visible_lines(&self) -> impl Iterator<Item = (LogLevel, &str)> + '_ {
        self.visible.iter().map(move |&i| {
            let text = match &self.lines[i] {
                Ok(t) => t.as_str(),
                Err(_) => UNDECODABLE_PLACEHOLDER,
            };
            (self.source.logs[i].level, text)
        })
    }

    /// Text the copy button sends: visible decoded lines joined by '\n'. Undecodable entries are left out.
    pub fn clipboard_payload(&self) -> String {
        self.visible
            .iter()
            .filter_map(|&i| self.lines[i].as_ref().ok().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn copy_to_clipboard(&mut self, host: &dyn LogHost, now: Instant) -> Result<(), ClipboardError> {
        let payload = self.clipboard_payload();
        match host.copy_to_clipboard(&payload) {
            Ok(()) => {
                info!("copied {} bytes of {} to clipboard", payload.len(), self.source.name);
                self.copy.trigger(now, self.copy_hold);
                if matches!(self.status, Some(StatusMessage { kind: StatusKind::Error, .. })) {
                    self.status = None;
                }
                Ok(())
            }
            Err(e) => {
                warn!("failed to copy logs to clipboard: {}", e);
                self.status = Some(StatusMessage { kind: StatusKind::Error, text: format!("Copy failed: {e}") });
                Err(e)
            }
        }
    }

    pub fn copy_feedback(&self) -> &CopyFeedback {
        &self.copy
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.copy.tick(now)
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn render_font_size(&self) -> f32 {
        self.font_size.max(MIN_RENDER_FONT_SIZE)
    }

    pub fn increase_font(&mut self) {
        self.font_size += 1.0;
    }

    pub fn decrease_font(&mut self) {
        self.font_size -= 1.0;
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn dismiss_status(&mut self) {
        self.status = None;
    }
}
