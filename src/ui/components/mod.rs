//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar with loading indicator
//! - [`search`]: Search input box
//! - [`results`]: Search result list with match highlighting
//! - [`movie`]: Selected movie panel
//! - [`recommendations`]: Recommendation list
//! - [`empty`]: Empty state message
//! - [`footer`]: Key hints and notices
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines]
//! [Results]            (while a search has results)
//! [Movie panel]        (once a movie is selected)
//! [Recommendations]
//! [Notice]             (optional)
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod movie;
mod recommendations;
mod results;
mod search;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::{render_footer, render_notice};
use header::render_header;
use movie::render_movie_panel;
use recommendations::render_recommendations;
use results::render_results;
use search::render_search_bar;

/// Renders a horizontal border line and returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

fn vote_marker(vote: Option<bool>) -> &'static str {
    match vote {
        Some(true) => "♥ liked",
        Some(false) => "✗ disliked",
        None => "",
    }
}

fn vote_color(vote: Option<bool>, theme: &Theme) -> &str {
    if vote == Some(false) {
        &theme.colors.dislike_fg
    } else {
        &theme.colors.like_fg
    }
}

/// Renders the full layout for a view model.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // Start at row 2 (skip blank line at row 1)

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_search_bar(current_row, &vm.search_bar, theme, cols);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    }

    if !vm.results.is_empty() {
        current_row = render_results(current_row, &vm.results, theme, cols) + 1;
    }
    if let Some(panel) = &vm.movie {
        current_row = render_movie_panel(current_row, panel, theme, cols);
    }
    if let Some(list) = &vm.recommendations {
        let _current_row = render_recommendations(current_row, list, theme, cols);
    }

    let footer_start = rows.saturating_sub(1);
    let border_row = render_notice(footer_start, &vm.footer, theme, cols).saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}
