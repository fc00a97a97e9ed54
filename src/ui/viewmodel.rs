//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They hold display-ready strings: text is already truncated,
//! wrapped and formatted, so the components only lay it out.

/// Complete UI view model for one frame.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    pub search_bar: SearchBarInfo,

    /// Visible window of the search results.
    pub results: Vec<ResultItem>,

    /// Panel for the selected movie, if any.
    pub movie: Option<MoviePanel>,

    /// Recommendations for the selected movie, if any.
    pub recommendations: Option<RecommendationList>,

    /// Shown when there is nothing else in the body.
    pub empty_state: Option<EmptyState>,

    pub footer: FooterInfo,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    /// Loading indicator text while a blocking request is outstanding.
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    pub query: String,
    /// Whether key input currently goes to the search box.
    pub focused: bool,
    /// Placeholder shown after the query while it is too short to search.
    pub hint: Option<String>,
}

/// One row of the search result list.
#[derive(Debug, Clone)]
pub struct ResultItem {
    pub title: String,
    pub is_selected: bool,
    /// Character ranges `(start, end)` matching the query.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct MoviePanel {
    pub title: String,
    /// e.g. `"★ 8.0/10"`.
    pub rating: String,
    /// Rendered as chips.
    pub genres: Vec<String>,
    /// Summary already wrapped to the pane width.
    pub summary: Vec<String>,
    /// Poster URL or a placeholder.
    pub poster: String,
    /// `Some(true)` liked, `Some(false)` disliked.
    pub vote: Option<bool>,
    pub is_selected: bool,
}

#[derive(Debug, Clone)]
pub struct RecommendationList {
    pub heading: String,
    pub items: Vec<RecommendationItem>,
}

#[derive(Debug, Clone)]
pub struct RecommendationItem {
    pub title: String,
    /// Genres joined with `" • "`.
    pub genres: String,
    pub rating: String,
    /// e.g. `"87% match"`.
    pub match_label: String,
    pub vote: Option<bool>,
    pub is_selected: bool,
}

#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Key hints for the current input mode.
    pub keybindings: String,
    /// Non-blocking notice, e.g. a failed detail lookup.
    pub notice: Option<String>,
}
