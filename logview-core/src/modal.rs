use std::time::Duration;

use tracing::{debug, error, info};

use crate::host::FetchError;
use crate::model::{parse_log_payload, LogData};
use crate::viewer::{ViewerState, DEFAULT_COPY_FEEDBACK, DEFAULT_FONT_SIZE};

/// Which view the log dialog shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Loading,
    Selecting,
    Viewing,
    Failed,
}

#[derive(Debug)]
pub enum ModalEvent {
    /// Raw answer of the host fetch call.
    FetchResolved(Result<String, FetchError>),
    Select(usize),
    Back,
    Retry,
}

impl ModalEvent {
    /// Short name for logs; never includes the fetched payload.
    pub fn kind(&self) -> &'static str {
        match self {
            ModalEvent::FetchResolved(Ok(_)) => "fetch-ok",
            ModalEvent::FetchResolved(Err(_)) => "fetch-err",
            ModalEvent::Select(_) => "select",
            ModalEvent::Back => "back",
            ModalEvent::Retry => "retry",
        }
    }
}

/// Root state of the dialog. Sources are loaded once per fetch and never mutated.
#[derive(Debug)]
pub enum ModalState {
    Loading,
    Selecting { sources: Vec<LogData> },
    Viewing { sources: Vec<LogData>, viewer: Box<ViewerState> },
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerOptions {
    pub font_size: f32,
    pub copy_hold: Duration,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self { font_size: DEFAULT_FONT_SIZE, copy_hold: DEFAULT_COPY_FEEDBACK }
    }
}

impl ModalState {
    pub fn phase(&self) -> ModalPhase {
        match self {
            ModalState::Loading => ModalPhase::Loading,
            ModalState::Selecting { .. } => ModalPhase::Selecting,
            ModalState::Viewing { .. } => ModalPhase::Viewing,
            ModalState::Failed { .. } => ModalPhase::Failed,
        }
    }

    /// Transition function of the dialog. Events that do not apply to the current phase leave it unchanged.
    pub fn reduce(self, event: ModalEvent, options: &ViewerOptions) -> ModalState {
        match (self, event) {
            (ModalState::Loading, ModalEvent::FetchResolved(result)) => {
                match result.and_then(|text| parse_log_payload(&text)) {
                    Ok(sources) => {
                        info!("loaded {} log source(s)", sources.len());
                        ModalState::Selecting { sources }
                    }
                    Err(e) => {
                        error!("failed to load plugin logs: {}", e);
                        ModalState::Failed { reason: e.to_string() }
                    }
                }
            }
            (ModalState::Selecting { sources }, ModalEvent::Select(idx)) => match sources.get(idx).cloned() {
                Some(selected) => {
                    debug!("viewing log source {}", selected.name);
                    let viewer = ViewerState::with_options(selected, options.font_size, options.copy_hold);
                    ModalState::Viewing { sources, viewer: Box::new(viewer) }
                }
                None => ModalState::Selecting { sources },
            },
            (ModalState::Viewing { sources, viewer }, ModalEvent::Back) => {
                debug!("leaving log source {}", viewer.name());
                ModalState::Selecting { sources }
            }
            (ModalState::Failed { .. }, ModalEvent::Retry) => {
                info!("retrying log fetch");
                ModalState::Loading
            }
            (state, event) => {
                debug!("ignoring {} event while {:?}", event.kind(), state.phase());
                state
            }
        }
    }

    pub fn sources(&self) -> Option<&[LogData]> {
        match self {
            ModalState::Selecting { sources } | ModalState::Viewing { sources, .. } => Some(sources.as_slice()),
            _ => None,
        }
    }

    pub fn viewer(&self) -> Option<&ViewerState> {
        match self {
            ModalState::Viewing { viewer, .. } => Some(&**viewer),
            _ => None,
        }
    }

    pub fn viewer_mut(&mut self) -> Option<&mut ViewerState> {
        match self {
            ModalState::Viewing { viewer, .. } => Some(&mut **viewer),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ModalState::Failed { reason } => Some(reason.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::encode_message;
    use crate::model::{LogItem, LogLevel};

    fn payload() -> String {
        let data = vec![
            LogData {
                name: "Plugin A".into(),
                logs: vec![LogItem { level: LogLevel::Error, message: encode_message(b"boom") }],
            },
            LogData { name: "Plugin B".into(), logs: vec![] },
        ];
        serde_json::to_string(&data).unwrap()
    }

    fn step(state: ModalState, event: ModalEvent) -> ModalState {
        state.reduce(event, &ViewerOptions::default())
    }

    #[test]
    fn loading_select_view_back() {
        let state = step(ModalState::Loading, ModalEvent::FetchResolved(Ok(payload())));
        assert_eq!(state.phase(), ModalPhase::Selecting);
        let names: Vec<_> = state.sources().unwrap().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["Plugin A", "Plugin B"]);

        let state = step(state, ModalEvent::Select(0));
        assert_eq!(state.phase(), ModalPhase::Viewing);
        let viewer = state.viewer().unwrap();
        assert_eq!(viewer.name(), "Plugin A");
        assert_eq!(viewer.counts().errors, 1);
        assert_eq!(viewer.counts().warnings, 0);
        assert_eq!(viewer.visible_lines().next().map(|(_, t)| t), Some("boom"));

        let state = step(state, ModalEvent::Back);
        assert_eq!(state.phase(), ModalPhase::Selecting);
        assert_eq!(state.sources().unwrap().len(), 2);
        assert!(state.viewer().is_none());
    }

    #[test]
    fn reselect_gets_fresh_viewer() {
        let mut state = step(ModalState::Loading, ModalEvent::FetchResolved(Ok(payload())));
        state = step(state, ModalEvent::Select(0));
        if let Some(v) = state.viewer_mut() {
            v.set_query("zzz");
            v.increase_font();
        }
        state = step(state, ModalEvent::Back);
        state = step(state, ModalEvent::Select(0));
        let viewer = state.viewer().unwrap();
        assert_eq!(viewer.query(), "");
        assert_eq!(viewer.font_size(), DEFAULT_FONT_SIZE);
        assert_eq!(viewer.visible_indices().len(), 1);
    }

    #[test]
    fn fetch_errors_fail_and_retry_reloads() {
        let state = step(ModalState::Loading, ModalEvent::FetchResolved(Err(FetchError::Host("down".into()))));
        assert_eq!(state.phase(), ModalPhase::Failed);
        assert!(state.failure().unwrap().contains("down"));

        let state = step(state, ModalEvent::Retry);
        assert_eq!(state.phase(), ModalPhase::Loading);

        let state = step(state, ModalEvent::FetchResolved(Ok("not json".into())));
        assert_eq!(state.phase(), ModalPhase::Failed);
    }

    #[test]
    fn empty_list_is_loaded_not_loading() {
        let state = step(ModalState::Loading, ModalEvent::FetchResolved(Ok("[]".into())));
        assert_eq!(state.phase(), ModalPhase::Selecting);
        assert_eq!(state.sources().map(|s| s.len()), Some(0));
    }

    #[test]
    fn stray_events_are_ignored() {
        let state = step(ModalState::Loading, ModalEvent::Select(0));
        assert_eq!(state.phase(), ModalPhase::Loading);

        let state = step(state, ModalEvent::FetchResolved(Ok(payload())));
        let state = step(state, ModalEvent::Select(9));
        assert_eq!(state.phase(), ModalPhase::Selecting);

        // fetch resolves only once; a late answer does not replace the list
        let state = step(state, ModalEvent::FetchResolved(Ok("[]".into())));
        assert_eq!(state.sources().unwrap().len(), 2);

        let state = step(state, ModalEvent::Retry);
        assert_eq!(state.phase(), ModalPhase::Selecting);
    }

    #[test]
    fn event_kind_hides_payload() {
        let event = ModalEvent::FetchResolved(Ok(payload()));
        assert_eq!(event.kind(), "fetch-ok");
        assert!(!event.kind().contains("Plugin A"));
        assert_eq!(ModalEvent::FetchResolved(Err(FetchError::Disconnected)).kind(), "fetch-err");
        assert_eq!(ModalEvent::Select(3).kind(), "select");
        assert_eq!(ModalEvent::Back.kind(), "back");
        assert_eq!(ModalEvent::Retry.kind(), "retry");
    }

    #[test]
    fn viewer_uses_configured_options() {
        let options = ViewerOptions { font_size: 12.0, copy_hold: Duration::from_millis(500) };
        let state = ModalState::Loading.reduce(ModalEvent::FetchResolved(Ok(payload())), &options);
        let state = state.reduce(ModalEvent::Select(1), &options);
        assert_eq!(state.viewer().unwrap().font_size(), 12.0);
    }
}
