//! Recommendation list renderer.

use crate::ui::helpers::{display_len, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{RecommendationItem, RecommendationList};

/// Renders the heading and one row per recommendation.
///
/// Returns the next free row.
pub fn render_recommendations(row: usize, list: &RecommendationList, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print!(" {}", truncate(&list.heading, cols.saturating_sub(1)));
    print!("{}", Theme::reset());

    let mut current_row = row + 1;
    let title_width = list.items.iter().map(|item| display_len(&item.title)).max().unwrap_or(0);
    for item in &list.items {
        current_row = render_item(current_row, item, title_width, theme, cols);
    }
    current_row
}

/// ```text
///  ▸ Beta        ★ 7.5/10  87% match  Drama • Crime       ♥
/// ```
fn render_item(row: usize, item: &RecommendationItem, title_width: usize, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let (base_fg, prefix) = if item.is_selected {
        print!("{}", Theme::bg(&theme.colors.selection_bg));
        (&theme.colors.selection_fg, " ▸ ")
    } else {
        (&theme.colors.text_normal, "   ")
    };

    let title = format!("{:<title_width$}", item.title);
    let stats = format!("  {}  {}  ", item.rating, item.match_label);
    let marker = super::vote_marker(item.vote);

    let fixed = display_len(prefix) + display_len(&title) + display_len(&stats) + display_len(marker) + 1;
    let genres = truncate(&item.genres, cols.saturating_sub(fixed));

    print!("{}{prefix}{title}", Theme::fg(base_fg));
    print!("{}{stats}", Theme::fg(&theme.colors.rating_fg));
    print!("{}{genres}", Theme::fg(if item.is_selected { base_fg } else { &theme.colors.text_dim }));
    print!("{}", " ".repeat(cols.saturating_sub(fixed + display_len(&genres))));
    if !marker.is_empty() {
        print!("{}{marker}", Theme::fg(super::vote_color(item.vote, theme)));
    }
    print!(" {}", Theme::reset());
    row + 1
}
