//! Application state and view model computation.
//!
//! [`AppState`] is the single source of truth for everything the plugin
//! shows: the query and its results, the selected movie and its
//! recommendations, the outstanding requests and the user's votes. It is
//! mutated only by [`handle_event`](crate::app::handle_event); rendering reads
//! it through [`AppState::compute_viewmodel`].

use super::modes::{InputMode, Phase};
use super::pending::{Pending, PendingRequests};
use crate::domain::{MovieDetails, Recommendation, SessionId};
use crate::gateway::Operation;
use crate::ui::helpers::{coalesce_indices, truncate, visible_window, wrap_text};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    EmptyState, FooterInfo, HeaderInfo, MoviePanel, RecommendationItem, RecommendationList, ResultItem,
    SearchBarInfo, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::HashMap;

/// Queries shorter than this many characters never reach the service.
pub const MIN_QUERY_LEN: usize = 2;

/// Rows taken by the header, search box, borders and footer.
const CHROME_ROWS: usize = 9;
const SUMMARY_MAX_LINES: usize = 3;
const PANEL_FIXED_ROWS: usize = 4;

/// The movie the user most recently picked.
///
/// `seq` increases with every selection, so responses belonging to an older
/// pick can be recognized and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub seq: u64,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Identity sent with recommend and feedback calls.
    pub session_id: SessionId,

    /// Live content of the search box.
    pub query: String,

    /// Titles for the most recent applied search, in service order.
    pub search_results: Vec<String>,

    /// Highlighted index within `search_results`.
    pub result_cursor: usize,

    pub selected_movie: Option<MovieDetails>,

    pub recommendations: Vec<Recommendation>,

    /// Title `recommendations` were fetched for.
    pub recommendations_for: Option<String>,

    /// Highlighted index within the browse list: the selected movie (when
    /// present) followed by the recommendations.
    pub browse_cursor: usize,

    pub input_mode: InputMode,

    pub selection: Option<Selection>,

    pub next_selection_seq: u64,

    /// Bumped by every selection and clear; searches issued under an older
    /// epoch are never applied.
    pub search_epoch: u64,

    pub pending: PendingRequests,

    /// Logical clock in seconds, advanced by timer ticks.
    pub clock_secs: f64,

    pub request_timeout_secs: f64,

    /// Whether a host timer is currently armed.
    pub tick_scheduled: bool,

    /// Last vote per title, for the vote marker only.
    pub votes: HashMap<String, bool>,

    /// Non-blocking message shown above the footer.
    pub notice: Option<String>,

    pub theme: Theme,
}

/// Placeholder state before the plugin is loaded.
///
/// Carries an empty session id; [`crate::initialize`] mints the real one.
impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionId::from(String::new()), Theme::default(), crate::DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl AppState {
    #[must_use]
    pub fn new(session_id: SessionId, theme: Theme, request_timeout_secs: f64) -> Self {
        Self {
            session_id,
            query: String::new(),
            search_results: Vec::new(),
            result_cursor: 0,
            selected_movie: None,
            recommendations: Vec::new(),
            recommendations_for: None,
            browse_cursor: 0,
            input_mode: InputMode::Search,
            selection: None,
            next_selection_seq: 0,
            search_epoch: 0,
            pending: PendingRequests::new(),
            clock_secs: 0.0,
            request_timeout_secs,
            tick_scheduled: false,
            votes: HashMap::new(),
            notice: None,
            theme,
        }
    }

    /// Whether the response to `pending` would still be applied.
    ///
    /// A search is awaited while it belongs to the current epoch and its tag
    /// is the live query; a detail or recommend lookup while it belongs to
    /// the live selection. Feedback responses change nothing.
    #[must_use]
    pub fn awaits(&self, pending: &Pending) -> bool {
        match pending.operation {
            Operation::Search => pending.search_epoch == self.search_epoch && pending.tag == self.query,
            Operation::MovieDetails | Operation::Recommend => matches!(
                (&self.selection, pending.selection_seq),
                (Some(selection), Some(seq)) if selection.seq == seq
            ),
            Operation::Feedback => false,
        }
    }

    fn awaits_any(&self, operation: Operation) -> bool {
        self.pending
            .iter()
            .any(|pending| pending.operation == operation && self.awaits(pending))
    }

    /// True while an awaited search, detail or recommend call is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending
            .iter()
            .any(|pending| pending.operation.blocks_ui() && self.awaits(pending))
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.awaits_any(Operation::MovieDetails) {
            return Phase::Selecting;
        }
        if self.awaits_any(Operation::Recommend) {
            return Phase::Recommending;
        }

        let editing = !self.query.is_empty()
            && self
                .selected_movie
                .as_ref()
                .map_or(true, |movie| movie.title != self.query);

        if editing {
            Phase::Typing
        } else if self.selected_movie.is_some() {
            Phase::Viewing
        } else {
            Phase::Idle
        }
    }

    #[must_use]
    pub fn query_len(&self) -> usize {
        self.query.chars().count()
    }

    #[must_use]
    pub fn highlighted_result(&self) -> Option<&str> {
        self.search_results.get(self.result_cursor).map(String::as_str)
    }

    /// Number of entries in the browse list.
    #[must_use]
    pub fn browse_len(&self) -> usize {
        usize::from(self.selected_movie.is_some()) + self.recommendations.len()
    }

    /// Title of the browse entry at `index`, and whether it is a
    /// recommendation rather than the selected movie.
    #[must_use]
    pub fn browse_entry(&self, index: usize) -> Option<(&str, bool)> {
        match &self.selected_movie {
            Some(movie) if index == 0 => Some((movie.title.as_str(), false)),
            Some(_) => self
                .recommendations
                .get(index - 1)
                .map(|rec| (rec.title.as_str(), true)),
            None => self.recommendations.get(index).map(|rec| (rec.title.as_str(), true)),
        }
    }

    #[must_use]
    pub fn highlighted_browse_entry(&self) -> Option<(&str, bool)> {
        self.browse_entry(self.browse_cursor)
    }

    /// Moves the cursor of the focused list down, wrapping to the top.
    pub fn move_cursor_down(&mut self) {
        let (cursor, len) = self.focused_cursor();
        if len == 0 {
            return;
        }
        *cursor = (*cursor + 1) % len;
    }

    /// Moves the cursor of the focused list up, wrapping to the bottom.
    pub fn move_cursor_up(&mut self) {
        let (cursor, len) = self.focused_cursor();
        if len == 0 {
            return;
        }
        *cursor = if *cursor == 0 { len - 1 } else { *cursor - 1 };
    }

    fn focused_cursor(&mut self) -> (&mut usize, usize) {
        match self.input_mode {
            InputMode::Search => {
                let len = self.search_results.len();
                (&mut self.result_cursor, len)
            }
            InputMode::Browse => {
                let len = self.browse_len();
                (&mut self.browse_cursor, len)
            }
        }
    }

    /// Keeps both cursors inside their lists after the lists change.
    pub fn clamp_cursors(&mut self) {
        self.result_cursor = self.result_cursor.min(self.search_results.len().saturating_sub(1));
        self.browse_cursor = self.browse_cursor.min(self.browse_len().saturating_sub(1));
    }

    /// Computes a renderable view model for a pane of `rows` x `cols`.
    ///
    /// The body between the search box and the footer is shared between the
    /// result list, the movie panel and the recommendations. With a movie on
    /// screen the result list gets at most half of it.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let footer = self.compute_footer();
        let chrome = CHROME_ROWS + usize::from(footer.notice.is_some());
        let mut remaining = rows.saturating_sub(chrome);

        let has_detail = self.selected_movie.is_some() || !self.recommendations.is_empty();
        let results = if self.search_results.is_empty() {
            vec![]
        } else {
            let capacity = if has_detail { (remaining / 2).max(1) } else { remaining };
            let items = self.compute_results(capacity, cols);
            remaining = remaining.saturating_sub(items.len() + 1);
            items
        };

        let movie = self.selected_movie.as_ref().map(|movie| {
            let panel = self.compute_movie_panel(movie, remaining, cols);
            remaining = remaining.saturating_sub(PANEL_FIXED_ROWS + panel.summary.len());
            panel
        });

        let recommendations = if self.recommendations.is_empty() {
            None
        } else {
            Some(self.compute_recommendations(remaining.saturating_sub(1), cols))
        };

        let empty_state = if results.is_empty() && movie.is_none() && recommendations.is_none() && !self.is_loading() {
            Some(self.compute_empty_state())
        } else {
            None
        };

        UIViewModel {
            header: self.compute_header(),
            search_bar: self.compute_search_bar(),
            results,
            movie,
            recommendations,
            empty_state,
            footer,
        }
    }

    fn compute_results(&self, capacity: usize, cols: usize) -> Vec<ResultItem> {
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let window = visible_window(self.search_results.len(), self.result_cursor, capacity);
        let width = cols.saturating_sub(4);

        self.search_results[window.clone()]
            .iter()
            .zip(window)
            .map(|(title, index)| {
                let highlight_ranges = matcher
                    .fuzzy_indices(title, &self.query)
                    .map_or_else(Vec::new, |(_score, indices)| coalesce_indices(&indices));
                ResultItem {
                    title: truncate(title, width),
                    is_selected: self.input_mode == InputMode::Search && index == self.result_cursor,
                    highlight_ranges,
                }
            })
            .collect()
    }

    fn compute_movie_panel(&self, movie: &MovieDetails, available: usize, cols: usize) -> MoviePanel {
        let width = cols.saturating_sub(4);
        let summary_room = available.saturating_sub(PANEL_FIXED_ROWS).min(SUMMARY_MAX_LINES);
        let summary = movie
            .summary
            .as_deref()
            .map_or_else(Vec::new, |text| wrap_text(text, width, summary_room));

        let poster = if movie.poster_url.is_empty() {
            "no poster".to_string()
        } else {
            truncate(&movie.poster_url, width.saturating_sub(8))
        };

        MoviePanel {
            title: truncate(&movie.title, width),
            rating: format!("★ {}", movie.rating_label()),
            genres: movie.genres.clone(),
            summary,
            poster,
            vote: self.votes.get(&movie.title).copied(),
            is_selected: self.input_mode == InputMode::Browse && self.browse_cursor == 0,
        }
    }

    fn compute_recommendations(&self, capacity: usize, cols: usize) -> RecommendationList {
        let offset = usize::from(self.selected_movie.is_some());
        let highlighted = self.browse_cursor.checked_sub(offset);
        let window = visible_window(self.recommendations.len(), highlighted.unwrap_or(0), capacity);
        let title_width = (cols / 3).max(12);

        let items = self.recommendations[window.clone()]
            .iter()
            .zip(window)
            .map(|(rec, index)| RecommendationItem {
                title: truncate(&rec.title, title_width),
                genres: rec.genres.join(" • "),
                rating: format!("★ {}", rec.rating_label()),
                match_label: format!("{}% match", rec.match_percent()),
                vote: self.votes.get(&rec.title).copied(),
                is_selected: self.input_mode == InputMode::Browse && highlighted == Some(index),
            })
            .collect();

        let heading = self
            .recommendations_for
            .as_ref()
            .map_or_else(|| "Recommendations".to_string(), |title| format!("Because you picked {title}"));

        RecommendationList { heading, items }
    }

    fn compute_header(&self) -> HeaderInfo {
        let status = match self.phase() {
            Phase::Selecting => Some("loading movie…".to_string()),
            Phase::Recommending => Some("finding recommendations…".to_string()),
            _ if self.is_loading() => Some("searching…".to_string()),
            _ => None,
        };
        HeaderInfo {
            title: " CineMatch ".to_string(),
            status,
        }
    }

    fn compute_search_bar(&self) -> SearchBarInfo {
        let hint = (self.query_len() < MIN_QUERY_LEN).then(|| format!("type at least {MIN_QUERY_LEN} characters"));
        SearchBarInfo {
            query: self.query.clone(),
            focused: self.input_mode == InputMode::Search,
            hint,
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        if self.query_len() < MIN_QUERY_LEN {
            EmptyState {
                message: "Search for a movie".to_string(),
                subtitle: "Start typing a title to see matches".to_string(),
            }
        } else {
            EmptyState {
                message: format!("No movies match \"{}\"", self.query),
                subtitle: "Try a different title".to_string(),
            }
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Search => "Type to search  Enter: select  ↑/↓ or Ctrl+n/p: navigate  Esc: clear  Tab: browse",
            InputMode::Browse => "j/k: navigate  l/+: like  d/-: dislike  Enter: open  /: search  q: quit",
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
            notice: self.notice.clone(),
        }
    }
}
