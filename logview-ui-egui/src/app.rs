use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::{egui, App};
use logview_core::{FetchJob, JobRunner, LogHost, ModalEvent, ModalPhase, ModalState, ViewerOptions, ViewerSettings};
use tracing::debug;

pub struct LogsViewApp {
	pub host: Arc<dyn LogHost>,
	pub settings: ViewerSettings,
	pub options: ViewerOptions,
	pub modal: ModalState,
	pub fetch: Option<FetchJob>,
}

impl LogsViewApp {
	pub fn new(host: Arc<dyn LogHost>, settings: ViewerSettings) -> Self {
		let options = settings.viewer_options();
		let mut app = Self { host, settings, options, modal: ModalState::Loading, fetch: None };
		app.start_fetch();
		app
	}

	fn start_fetch(&mut self) {
		self.fetch = Some(JobRunner::spawn_fetch(self.host.clone(), self.settings.fetch_timeout()));
	}

	pub fn dispatch(&mut self, event: ModalEvent) {
		let state = std::mem::replace(&mut self.modal, ModalState::Loading);
		let was = state.phase();
		self.modal = state.reduce(event, &self.options);
		if was != ModalPhase::Loading && self.modal.phase() == ModalPhase::Loading {
			self.start_fetch();
		}
	}

	fn poll_fetch(&mut self) {
		let result = match self.fetch.as_mut().and_then(|job| job.poll()) {
			Some(r) => r,
			None => return,
		};
		self.fetch = None;
		self.dispatch(ModalEvent::FetchResolved(result));
	}
}

impl App for LogsViewApp {
	fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
		self.poll_fetch();
		let now = Instant::now();
		if let Some(viewer) = self.modal.viewer_mut() {
			if viewer.tick(now) { debug!("copy icon reverted"); }
			if let Some(at) = viewer.copy_feedback().revert_at() { ctx.request_repaint_after(at.saturating_duration_since(now)); }
		}
		if self.fetch.is_some() { ctx.request_repaint_after(Duration::from_millis(100)); }

		let mut event = None;
		egui::CentralPanel::default().show(ctx, |ui| {
			event = match &mut self.modal {
				ModalState::Viewing { viewer, .. } => crate::ui::viewer::render_viewer(viewer, self.host.as_ref(), ui),
				other => crate::ui::selector::render_selector(other, ui),
			};
		});
		if let Some(event) = event { self.dispatch(event); }
	}
}
