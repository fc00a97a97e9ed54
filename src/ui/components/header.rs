//! Header component renderer.

use crate::ui::helpers::{display_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the centered title bar with the loading indicator on the right.
///
/// Returns the next available row.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title_len = display_len(&header.title);
    let status = header.status.as_deref().map(|s| format!("⟳ {s} "));
    let status_len = status.as_deref().map_or(0, display_len);
    let padding = cols.saturating_sub(title_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{}", header.title);

    let used = padding + title_len;
    match status {
        Some(status) if used + status_len <= cols => {
            print!("{}", " ".repeat(cols - used - status_len));
            print!("{}{status}", Theme::fg(&theme.colors.loading_fg));
        }
        _ => print!("{}", " ".repeat(cols.saturating_sub(used))),
    }

    print!("{}", Theme::reset());
    row + 1
}
