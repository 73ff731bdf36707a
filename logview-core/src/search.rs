use crate::decode::DecodeError;

/// Indices of the lines that contain `query`, compared case-insensitively, in original order.
/// An empty query selects every line. Lines that failed to decode never match a non-empty query.
pub fn filter_lines(lines: &[Result<String, DecodeError>], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..lines.len()).collect();
    }
    let needle = query.to_lowercase();
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(text) if text.to_lowercase().contains(&needle) => Some(i),
            _ => None,
        })
        .collect()
}
