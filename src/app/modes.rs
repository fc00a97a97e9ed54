//! Input focus and interaction phase types.
//!
//! [`InputMode`] decides how keys are interpreted; [`Phase`] is the
//! interaction's conceptual position, derived from state for display and
//! logging.

/// Which part of the UI receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Typing into the search box.
    ///
    /// Printable characters edit the query, Up/Down or Ctrl+p/Ctrl+n move the
    /// result cursor and Enter selects the highlighted result.
    #[default]
    Search,

    /// Navigating the selected movie and its recommendations.
    ///
    /// j/k move, l/d (or +/-) vote, Enter selects a recommendation.
    Browse,
}

/// Conceptual phase of the interaction, derived by [`AppState::phase`].
///
/// [`AppState::phase`]: crate::app::AppState::phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing typed, nothing selected.
    Idle,
    /// A query is being edited or searched.
    Typing,
    /// A movie detail lookup is in flight.
    Selecting,
    /// Recommendations for the selected movie are in flight.
    Recommending,
    /// A movie is selected and nothing is loading for it.
    Viewing,
}

impl Phase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Typing => "typing",
            Self::Selecting => "selecting",
            Self::Recommending => "recommending",
            Self::Viewing => "viewing",
        }
    }
}
