//! Shared rendering utilities.
//!
//! Text helpers here count `char`s, not bytes, so titles with accents and
//! symbols such as `★` measure and slice correctly.

use crate::ui::theme::Theme;
use std::ops::Range;

/// Positions the cursor at a 1-indexed row and column.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Number of `char`s in `text`.
#[must_use]
pub fn display_len(text: &str) -> usize {
    text.chars().count()
}

/// Shortens `text` to at most `width` chars, ending with `…` when cut.
///
/// ```
/// use cinematch::ui::helpers::truncate;
///
/// assert_eq!(truncate("Alphaville", 6), "Alpha…");
/// assert_eq!(truncate("Alpha", 6), "Alpha");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if display_len(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Greedy word wrap into at most `max_lines` lines of `width` chars.
///
/// Words longer than `width` are split. If the text does not fit, the last
/// line is truncated with `…`.
#[must_use]
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return vec![];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        loop {
            let current_len = display_len(&current);
            let word_len = display_len(&word);
            let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };

            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&word);
                break;
            }

            if current.is_empty() {
                // A single word wider than the line.
                let head: String = word.chars().take(width).collect();
                word = word.chars().skip(width).collect();
                lines.push(head);
                if word.is_empty() {
                    break;
                }
            } else {
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let cut = truncate(last, width.saturating_sub(1));
            *last = if cut.ends_with('…') { cut } else { format!("{cut}…") };
        }
    }
    lines
}

/// Slice of a list of `len` items that fits `capacity` rows while keeping
/// `selected` visible, roughly centered.
#[must_use]
pub fn visible_window(len: usize, selected: usize, capacity: usize) -> Range<usize> {
    if capacity == 0 || len == 0 {
        return 0..0;
    }
    let mut start = selected.saturating_sub(capacity / 2);
    let end = (start + capacity).min(len);
    if end - start < capacity && len >= capacity {
        start = end - capacity;
    }
    start..end
}

/// Turns sorted match indices into half-open `(start, end)` runs.
#[must_use]
pub fn coalesce_indices(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end += 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

/// Prints `text` with the given char ranges in the match highlight colors.
///
/// Selected rows are printed plain so the selection background stays intact.
/// Ranges past the end of `text` (e.g. after truncation) are ignored.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, is_selected: bool) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.clamp(current_pos, chars.len());
        let end = end.clamp(start, chars.len());

        let normal: String = chars[current_pos..start].iter().collect();
        print!("{normal}");

        if start < end {
            let highlighted: String = chars[start..end].iter().collect();
            print!(
                "{}{}{highlighted}{}",
                Theme::fg(&theme.colors.match_highlight_fg),
                Theme::bg(&theme.colors.match_highlight_bg),
                Theme::reset()
            );
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        current_pos = end;
    }

    let remaining: String = chars[current_pos..].iter().collect();
    print!("{remaining}");
}
