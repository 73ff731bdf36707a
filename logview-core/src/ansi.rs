//! Minimal ANSI escape handling for log lines.
//!
//! Only SGR (`ESC [ ... m`) affects styling. Every other CSI or OSC sequence is
//! consumed and dropped so it never shows up as garbage in the viewer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    /// 0-15 are the basic and bright palette, 16-255 the xterm extended palette.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl AnsiColor {
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            AnsiColor::Rgb(r, g, b) => (r, g, b),
            AnsiColor::Indexed(i) => indexed_to_rgb(i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnsiStyle {
    pub fg: Option<AnsiColor>,
    pub bg: Option<AnsiColor>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiSpan {
    pub text: String,
    pub style: AnsiStyle,
}

const BASIC: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 49, 49),
    (13, 188, 121),
    (229, 229, 16),
    (36, 114, 200),
    (188, 63, 188),
    (17, 168, 205),
    (229, 229, 229),
    (102, 102, 102),
    (241, 76, 76),
    (35, 209, 139),
    (245, 245, 67),
    (59, 142, 234),
    (214, 112, 214),
    (41, 184, 219),
    (255, 255, 255),
];

fn indexed_to_rgb(i: u8) -> (u8, u8, u8) {
    match i {
        0..=15 => BASIC[i as usize],
        16..=231 => {
            let n = i - 16;
            let scale = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (scale(n / 36), scale((n / 6) % 6), scale(n % 6))
        }
        _ => {
            let v = 8 + (i - 232) * 10;
            (v, v, v)
        }
    }
}

/// Split `input` into styled spans. Adjacent text with the same style is merged.
pub fn parse(input: &str) -> Vec<AnsiSpan> {
    let mut spans: Vec<AnsiSpan> = Vec::new();
    let mut style = AnsiStyle::default();
    let mut text = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            text.push(c);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                let mut params = String::new();
                let mut terminator = None;
                for p in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&p) {
                        terminator = Some(p);
                        break;
                    }
                    params.push(p);
                }
                if terminator == Some('m') {
                    let next = apply_sgr(style, &params);
                    if next != style {
                        flush(&mut spans, &mut text, style);
                        style = next;
                    }
                }
            }
            Some(']') => {
                chars.next();
                // OSC ends with BEL or ST (ESC \)
                while let Some(p) = chars.next() {
                    if p == '\x07' {
                        break;
                    }
                    if p == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }
    flush(&mut spans, &mut text, style);
    spans
}

/// Visible text of `input` with every escape sequence removed.
pub fn strip(input: &str) -> String {
    parse(input).into_iter().map(|s| s.text).collect()
}

fn flush(spans: &mut Vec<AnsiSpan>, text: &mut String, style: AnsiStyle) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => spans.push(AnsiSpan { text: text.clone(), style }),
    }
    text.clear();
}

fn apply_sgr(mut style: AnsiStyle, params: &str) -> AnsiStyle {
    let codes: Vec<u16> = if params.is_empty() {
        vec![0]
    } else {
        params.split(';').map(|p| p.parse().unwrap_or(0)).collect()
    };
    let mut it = codes.into_iter();
    while let Some(code) = it.next() {
        match code {
            0 => style = AnsiStyle::default(),
            1 => style.bold = true,
            2 => style.dim = true,
            3 => style.italic = true,
            4 => style.underline = true,
            22 => {
                style.bold = false;
                style.dim = false;
            }
            23 => style.italic = false,
            24 => style.underline = false,
            30..=37 => style.fg = Some(AnsiColor::Indexed((code - 30) as u8)),
            90..=97 => style.fg = Some(AnsiColor::Indexed((code - 90 + 8) as u8)),
            40..=47 => style.bg = Some(AnsiColor::Indexed((code - 40) as u8)),
            100..=107 => style.bg = Some(AnsiColor::Indexed((code - 100 + 8) as u8)),
            39 => style.fg = None,
            49 => style.bg = None,
            38 | 48 => {
                let color = match it.next() {
                    Some(5) => it.next().map(|n| AnsiColor::Indexed(n.min(255) as u8)),
                    Some(2) => {
                        let r = it.next().unwrap_or(0).min(255) as u8;
                        let g = it.next().unwrap_or(0).min(255) as u8;
                        let b = it.next().unwrap_or(0).min(255) as u8;
                        Some(AnsiColor::Rgb(r, g, b))
                    }
                    _ => None,
                };
                if code == 38 {
                    style.fg = color;
                } else {
                    style.bg = color;
                }
            }
            _ => {}
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_unstyled_span() {
        let spans = parse("hello world");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "hello world");
        assert_eq!(spans[0].style, AnsiStyle::default());
    }

    #[test]
    fn colors_and_reset() {
        let spans = parse("\x1b[31mred\x1b[0m plain \x1b[1;92mbold green\x1b[m");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].text, "red");
        assert_eq!(spans[0].style.fg, Some(AnsiColor::Indexed(1)));
        assert_eq!(spans[1].text, " plain ");
        assert_eq!(spans[1].style, AnsiStyle::default());
        assert_eq!(spans[2].text, "bold green");
        assert!(spans[2].style.bold);
        assert_eq!(spans[2].style.fg, Some(AnsiColor::Indexed(10)));
    }

    #[test]
    fn extended_colors() {
        let spans = parse("\x1b[38;5;208ma\x1b[48;2;1;2;3mb");
        assert_eq!(spans[0].style.fg, Some(AnsiColor::Indexed(208)));
        assert_eq!(spans[1].style.fg, Some(AnsiColor::Indexed(208)));
        assert_eq!(spans[1].style.bg, Some(AnsiColor::Rgb(1, 2, 3)));
        assert_eq!(AnsiColor::Indexed(16).to_rgb(), (0, 0, 0));
        assert_eq!(AnsiColor::Indexed(231).to_rgb(), (255, 255, 255));
        assert_eq!(AnsiColor::Indexed(232).to_rgb(), (8, 8, 8));
    }

    #[test]
    fn non_sgr_sequences_are_dropped() {
        assert_eq!(strip("\x1b[2Kclear\x1b]0;title\x07 done\x1b"), "clear done");
        assert_eq!(strip("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn redundant_codes_do_not_split_spans() {
        let spans = parse("a\x1b[0mb\x1b[39mc");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "abc");
    }
}
