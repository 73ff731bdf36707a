use std::time::Instant;

use eframe::egui::{self, Color32, FontId};
use logview_core::{CopyIcon, LogHost, ModalEvent, StatusKind, ViewerState};

const WARNING_COLOR: Color32 = Color32::from_rgb(255, 175, 0);

pub fn render_viewer(viewer: &mut ViewerState, host: &dyn LogHost, ui: &mut egui::Ui) -> Option<ModalEvent> {
	let mut back = false;
	ui.horizontal(|ui| {
		back = ui.button("⏴ Back").clicked();
		ui.heading(format!("{} output", viewer.name()));
		ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
			let counts = viewer.counts();
			let warn_col = if counts.warnings > 0 { WARNING_COLOR } else { ui.visuals().text_color() };
			ui.colored_label(warn_col, egui::RichText::new(format!("{} Warnings", counts.warnings)).size(12.0));
			let err_col = if counts.errors > 0 { Color32::RED } else { ui.visuals().text_color() };
			ui.colored_label(err_col, egui::RichText::new(format!("{} Errors", counts.errors)).size(12.0));
		});
	});
	ui.separator();

	ui.horizontal(|ui| {
		let mut query = viewer.query().to_string();
		let search = egui::TextEdit::singleline(&mut query).hint_text("Type here to search...").desired_width(320.0);
		if ui.add(search).changed() { viewer.set_query(query); }
		ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
			let icon = match viewer.copy_feedback().icon() { CopyIcon::Idle => "📋", CopyIcon::Copied => "✔" };
			if ui.button(icon).on_hover_text("Copy visible lines").clicked() {
				let _ = viewer.copy_to_clipboard(host, Instant::now());
			}
			if ui.button("+").on_hover_text("Larger text").clicked() { viewer.increase_font(); }
			if ui.button("-").on_hover_text("Smaller text").clicked() { viewer.decrease_font(); }
			ui.weak(format!("{} / {} lines", viewer.visible_indices().len(), viewer.source().logs.len()));
		});
	});

	if let Some(status) = viewer.status().cloned() {
		ui.horizontal(|ui| {
			let col = match status.kind { StatusKind::Error => Color32::RED, StatusKind::Warning => WARNING_COLOR };
			ui.colored_label(col, &status.text);
			if ui.small_button("✖").clicked() { viewer.dismiss_status(); }
		});
	}
	ui.add_space(6.0);

	let size = viewer.render_font_size();
	let row_height = ui.fonts(|f| f.row_height(&FontId::monospace(size)));
	let total = viewer.visible_indices().len();
	let visuals = ui.visuals().clone();
	egui::ScrollArea::both().id_salt("log-lines").auto_shrink([false, false]).show_rows(ui, row_height, total, |ui, rows| {
		for (_, text) in viewer.visible_lines().skip(rows.start).take(rows.len()) {
			let job = crate::ui::ansi::layout_line(text, size, &visuals);
			ui.add(egui::Label::new(job).selectable(true).extend());
		}
	});

	back.then_some(ModalEvent::Back)
}
