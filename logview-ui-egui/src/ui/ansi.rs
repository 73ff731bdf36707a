use eframe::egui::{self, text::LayoutJob, Color32, FontId, Stroke, TextFormat};
use logview_core::{ansi, AnsiColor};

fn to_color32(c: AnsiColor) -> Color32 {
	let (r, g, b) = c.to_rgb();
	Color32::from_rgb(r, g, b)
}

/// One log line as a monospace layout job with ANSI colours applied. No wrapping.
pub fn layout_line(text: &str, size: f32, visuals: &egui::Visuals) -> LayoutJob {
	let mut job = LayoutJob::default();
	job.wrap.max_width = f32::INFINITY;
	for span in ansi::parse(text) {
		let style = span.style;
		let mut color = match style.fg {
			Some(fg) => to_color32(fg),
			None if style.bold => visuals.strong_text_color(),
			None => visuals.text_color(),
		};
		if style.dim { color = color.gamma_multiply(0.6); }
		let mut format = TextFormat { font_id: FontId::monospace(size), color, italics: style.italic, ..Default::default() };
		if let Some(bg) = style.bg { format.background = to_color32(bg); }
		if style.underline { format.underline = Stroke::new(1.0, color); }
		job.append(&span.text, 0.0, format);
	}
	if job.sections.is_empty() {
		job.append("", 0.0, TextFormat { font_id: FontId::monospace(size), color: visuals.text_color(), ..Default::default() });
	}
	job
}
