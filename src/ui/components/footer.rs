//! Footer component renderer.

use crate::ui::helpers::{display_len, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the notice line, if any, directly above `row`.
///
/// Returns the row the notice occupies, so the border can go above it.
pub fn render_notice(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let Some(notice) = &footer.notice else {
        return row;
    };
    let notice_row = row.saturating_sub(1);
    let text = truncate(&format!(" ! {notice}"), cols);

    position_cursor(notice_row, 1);
    print!("{}", Theme::fg(&theme.colors.notice_fg));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(display_len(&text))));
    print!("{}", Theme::reset());
    notice_row
}

/// Renders centered key hints, truncated to the pane width.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text = truncate(&footer.keybindings, cols);
    let text_len = display_len(&help_text);
    let padding = cols.saturating_sub(text_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(padding));
    print!("{help_text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + text_len)));
    print!("{}", Theme::reset());
    row + 1
}
