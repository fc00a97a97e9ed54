//! Selected movie panel renderer.
//!
//! ```text
//! ▸ Alpha                                  ♥ liked
//!   ★ 8.0/10   Drama  Crime
//!   A summary wrapped to the pane width,
//!   at most three lines long.
//!   Poster: https://example.org/alpha.jpg
//! ```

use crate::ui::helpers::{display_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::MoviePanel;

/// Renders the panel and returns the row after its trailing blank line.
pub fn render_movie_panel(row: usize, panel: &MoviePanel, theme: &Theme, cols: usize) -> usize {
    let mut row = render_title_line(row, panel, theme, cols);

    position_cursor(row, 1);
    print!("  {}{}{}", Theme::fg(&theme.colors.rating_fg), panel.rating, Theme::reset());
    print!("  ");
    for genre in &panel.genres {
        print!(
            " {}{} {genre} {}",
            Theme::fg(&theme.colors.genre_fg),
            Theme::bg(&theme.colors.genre_bg),
            Theme::reset()
        );
    }
    row += 1;

    for line in &panel.summary {
        position_cursor(row, 1);
        print!("  {}{line}{}", Theme::fg(&theme.colors.text_normal), Theme::reset());
        row += 1;
    }

    position_cursor(row, 1);
    print!("  {}Poster: {}{}", Theme::fg(&theme.colors.text_dim), panel.poster, Theme::reset());
    row + 2
}

fn render_title_line(row: usize, panel: &MoviePanel, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if panel.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
        print!(" ▸ ");
    } else {
        print!("{}", Theme::fg(&theme.colors.header_fg));
        print!("   ");
    }
    print!("{}{}", Theme::bold(), panel.title);

    let marker = super::vote_marker(panel.vote);
    let used = 3 + display_len(&panel.title) + display_len(marker);
    print!("{}", " ".repeat(cols.saturating_sub(used + 1)));
    if !marker.is_empty() {
        print!("{}{marker}", Theme::fg(super::vote_color(panel.vote, theme)));
    }
    print!(" {}", Theme::reset());
    row + 1
}
