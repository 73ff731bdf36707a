use eframe::egui;
use logview_core::{ModalEvent, ModalState};

pub fn render_selector(state: &ModalState, ui: &mut egui::Ui) -> Option<ModalEvent> {
	ui.heading("Plugin Logs");
	ui.separator();
	match state {
		ModalState::Loading => {
			ui.centered_and_justified(|ui| { ui.add(egui::Spinner::new().size(32.0)); });
			None
		}
		ModalState::Failed { reason } => {
			let mut retry = false;
			ui.vertical_centered(|ui| {
				ui.add_space(24.0);
				ui.colored_label(egui::Color32::RED, "Could not load plugin logs");
				ui.label(reason);
				ui.add_space(8.0);
				retry = ui.button("Retry").clicked();
			});
			retry.then_some(ModalEvent::Retry)
		}
		ModalState::Selecting { sources } => {
			if sources.is_empty() {
				ui.weak("No log sources");
				return None;
			}
			let mut picked = None;
			egui::ScrollArea::vertical().id_salt("log-sources").auto_shrink([false, false]).show(ui, |ui| {
				for (i, source) in sources.iter().enumerate() {
					ui.add_space(12.0);
					ui.horizontal(|ui| {
						if ui.add(egui::Button::new(&source.name).min_size(egui::vec2(220.0, 28.0))).clicked() { picked = Some(i); }
						ui.weak(format!("{} lines · {}", source.logs.len(), humansize::format_size(source.text_size(), humansize::BINARY)));
					});
				}
			});
			picked.map(ModalEvent::Select)
		}
		ModalState::Viewing { .. } => None,
	}
}
