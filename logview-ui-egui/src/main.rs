#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod app;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use logview_core::{DirectoryHost, LogHost, SettingsStore, SnapshotHost, ViewerSettings};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
	let diagnostics = logview_core::init_logging();
	info!("writing diagnostics to {}", diagnostics.display());
	let store = SettingsStore::new()?;
	let mut settings = store.load().unwrap_or_else(|e| {
		warn!("ignoring settings: {e:#}");
		ViewerSettings::default()
	});
	if let Some(arg) = std::env::args_os().nth(1).map(PathBuf::from) {
		if arg.is_dir() { settings.logs_dir = Some(arg.display().to_string()); settings.snapshot_file = None; }
		else { settings.snapshot_file = Some(arg.display().to_string()); }
	}
	let host = build_host(&settings)?;

	let title = format!("Plugin Logs ({})", option_env!("GIT_COMMIT_HASH").unwrap_or("unknown"));
	let native_options = eframe::NativeOptions {
		viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]),
		..Default::default()
	};
	eframe::run_native(
		&title,
		native_options,
		Box::new(move |_cc| Ok(Box::new(app::LogsViewApp::new(host, settings)))),
	).map_err(|e| anyhow::anyhow!("viewer window failed: {e}"))?;
	Ok(())
}

fn build_host(settings: &ViewerSettings) -> anyhow::Result<Arc<dyn LogHost>> {
	if let Some(file) = &settings.snapshot_file {
		info!("serving logs from snapshot {}", file);
		return Ok(Arc::new(SnapshotHost::new(file)));
	}
	let dir = settings.logs_dir.clone().map(PathBuf::from)
		.or_else(logview_core::default_logs_dir)
		.ok_or_else(|| anyhow::anyhow!("no log directory configured and no platform data directory available"))?;
	info!("serving logs from {}", dir.display());
	Ok(Arc::new(DirectoryHost::new(dir)))
}
