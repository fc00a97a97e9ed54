//! Search result list renderer.

use crate::ui::helpers::{self, display_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ResultItem;

/// Renders each result on its own row and returns the next free row.
pub fn render_results(row: usize, items: &[ResultItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_result(current_row, item, theme, cols);
    }
    current_row
}

/// Selected rows get the selection colors across the full width; other rows
/// show the query matches highlighted.
fn render_result(row: usize, item: &ResultItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
        print!(" ▸ ");
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!("   ");
    }

    helpers::render_highlighted_text(&item.title, &item.highlight_ranges, theme, item.is_selected);

    let line_len = 3 + display_len(&item.title);
    print!("{}", " ".repeat(cols.saturating_sub(line_len)));
    print!("{}", Theme::reset());
    row + 1
}
