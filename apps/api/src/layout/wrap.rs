//! Greedy word wrap driven by a `TextMeasure`.

use crate::layout::font_metrics::TextMeasure;
use crate::layout::page::StyleRole;

/// Wraps `text` to `max_width` millimetres. See [`wrap_hanging`].
pub fn wrap_text(text: &str, max_width: f32, role: StyleRole, measure: &dyn TextMeasure) -> Vec<String> {
    wrap_hanging(text, max_width, max_width, role, measure)
}

/// Greedy word wrap where the first line may be narrower than the rest
/// (a run-in label occupies its start).
///
/// Whitespace runs collapse to single spaces. A word wider than the line is
/// placed alone on its own line; words are never split. Empty input yields no lines.
pub fn wrap_hanging(
    text: &str,
    first_width: f32,
    rest_width: f32,
    role: StyleRole,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let limit = if lines.is_empty() { first_width } else { rest_width };
        let candidate = format!("{current} {word}");
        if measure.measure(&candidate, role) > limit {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
