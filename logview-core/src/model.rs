use serde::{Deserialize, Serialize};

use crate::decode::decoded_len;
use crate::host::FetchError;

/// Severity of a single log entry. Encoded on the wire by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl TryFrom<u8> for LogLevel {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, String> {
        match v {
            0 => Ok(LogLevel::Info),
            1 => Ok(LogLevel::Warning),
            2 => Ok(LogLevel::Error),
            other => Err(format!("unknown log level ordinal {other}")),
        }
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> u8 {
        match level {
            LogLevel::Info => 0,
            LogLevel::Warning => 1,
            LogLevel::Error => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogItem {
    pub level: LogLevel,
    /// Base64 of the raw line, ANSI escapes included.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogData {
    pub name: String,
    pub logs: Vec<LogItem>,
}

impl LogData {
    pub fn count_level(&self, level: LogLevel) -> usize {
        self.logs.iter().filter(|l| l.level == level).count()
    }

    /// Total size of the decoded text, newlines excluded.
    pub fn text_size(&self) -> u64 {
        self.logs.iter().map(|l| decoded_len(&l.message) as u64).sum()
    }
}

/// Parse the JSON text returned by the host's log fetch call.
pub fn parse_log_payload(text: &str) -> Result<Vec<LogData>, FetchError> {
    serde_json::from_str(text).map_err(FetchError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payload_with_ordinal_levels() {
        let json = r#"[
            {"name": "Plugin A", "logs": [
                {"level": 2, "message": "Ym9vbQ=="},
                {"level": 0, "message": "b2s="}
            ]},
            {"name": "Plugin B", "logs": []}
        ]"#;
        let data = parse_log_payload(json).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].name, "Plugin A");
        assert_eq!(data[0].logs[0].level, LogLevel::Error);
        assert_eq!(data[0].logs[1].level, LogLevel::Info);
        assert!(data[1].logs.is_empty());
    }

    #[test]
    fn levels_serialize_as_ordinals() {
        let item = LogItem { level: LogLevel::Warning, message: "eA==".into() };
        let text = serde_json::to_string(&item).unwrap();
        assert_eq!(text, r#"{"level":1,"message":"eA=="}"#);
        assert!(LogLevel::Info < LogLevel::Warning && LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn rejects_unknown_level_and_non_json() {
        let bad_level = r#"[{"name": "x", "logs": [{"level": 7, "message": ""}]}]"#;
        assert!(matches!(parse_log_payload(bad_level), Err(FetchError::Malformed(_))));
        assert!(matches!(parse_log_payload("<html>"), Err(FetchError::Malformed(_))));
        assert!(matches!(parse_log_payload(r#"{"name": "x"}"#), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn counts_levels_over_all_entries() {
        let data = LogData {
            name: "p".into(),
            logs: vec![
                LogItem { level: LogLevel::Error, message: String::new() },
                LogItem { level: LogLevel::Warning, message: String::new() },
                LogItem { level: LogLevel::Error, message: String::new() },
            ],
        };
        assert_eq!(data.count_level(LogLevel::Error), 2);
        assert_eq!(data.count_level(LogLevel::Warning), 1);
        assert_eq!(data.count_level(LogLevel::Info), 0);
    }

    #[test]
    fn text_size_sums_decoded_lengths() {
        let data = LogData {
            name: "p".into(),
            logs: vec![
                LogItem { level: LogLevel::Info, message: "Ym9vbQ==".into() },
                LogItem { level: LogLevel::Info, message: "b2s=".into() },
            ],
        };
        assert_eq!(data.text_size(), 6);
    }
}
