//! Event handling and state transition logic.
//!
//! [`handle_event`] is the reducer of the plugin: it takes the current
//! [`AppState`] and one [`Event`], mutates the state and returns whether a
//! re-render is needed together with the [`Action`]s the shim must perform.
//!
//! # Request orchestration
//!
//! Every request is recorded in the pending table before it is emitted. When
//! its outcome arrives (a response, a dispatch failure or a timeout) the entry
//! is removed and the outcome is applied only if it still matches the live
//! state:
//!
//! - a search applies if its query equals the live query and no selection or
//!   clear happened since it was issued
//! - a detail or recommend lookup applies if it belongs to the live selection
//!
//! A successful detail lookup chains exactly one recommend call for the same
//! selection. Feedback never touches the loading indicator; its outcome is
//! only logged.

use super::actions::Action;
use super::modes::InputMode;
use super::pending::Pending;
use super::state::{AppState, Selection, MIN_QUERY_LEN};
use crate::domain::{CinematchError, Result};
use crate::gateway::{decode, ApiRequest, ApiResponse, HttpResponse, Operation, OutgoingRequest, RequestContext, RequestId};

/// Interval of the host timer that drives request timeouts.
pub const TICK_INTERVAL_SECS: f64 = 1.0;

/// Events from the user, the host timer and the network.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Appends a character to the query.
    Char(char),
    /// Removes the last character of the query.
    Backspace,
    /// Replaces the whole query.
    QueryChanged(String),
    /// Clears the query and the search results.
    ClearSearch,

    /// Moves the cursor of the focused list down.
    CursorDown,
    /// Moves the cursor of the focused list up.
    CursorUp,

    /// Selects the highlighted search result, or the highlighted
    /// recommendation while browsing.
    SelectHighlighted,
    /// Selects a movie by title.
    SelectMovie(String),

    /// Votes on the highlighted browse entry.
    Feedback { liked: bool },
    /// Votes on a movie by title.
    SubmitFeedback { title: String, liked: bool },

    FocusSearch,
    FocusBrowse,
    ToggleFocus,
    /// Hides the plugin pane.
    CloseFocus,

    /// The host timer fired after `elapsed_secs`.
    Tick { elapsed_secs: f64 },

    /// The host delivered the result of a `web_request`.
    Response(HttpResponse),

    /// A request could not be issued at all.
    DispatchFailed { id: RequestId, reason: String },
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns `(should_render, actions)`.
///
/// # Errors
///
/// The current transitions are infallible; the `Result` keeps the reducer's
/// signature uniform with the shim, which logs any error and skips rendering.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event, phase = state.phase().label()).entered();

    match event {
        Event::Char(c) => {
            let mut query = state.query.clone();
            query.push(*c);
            Ok(change_query(state, query))
        }
        Event::Backspace => {
            let mut query = state.query.clone();
            if query.pop().is_none() {
                return Ok((false, vec![]));
            }
            Ok(change_query(state, query))
        }
        Event::QueryChanged(query) => Ok(change_query(state, query.clone())),
        Event::ClearSearch => {
            tracing::debug!(query = %state.query, "clearing search");
            state.query.clear();
            state.search_results.clear();
            state.result_cursor = 0;
            state.search_epoch += 1;
            Ok((true, vec![]))
        }
        Event::CursorDown => {
            state.move_cursor_down();
            Ok((true, vec![]))
        }
        Event::CursorUp => {
            state.move_cursor_up();
            Ok((true, vec![]))
        }
        Event::SelectHighlighted => {
            let title = match state.input_mode {
                InputMode::Search => state.highlighted_result().map(str::to_string),
                InputMode::Browse => state
                    .highlighted_browse_entry()
                    .and_then(|(title, is_recommendation)| is_recommendation.then(|| title.to_string())),
            };
            let Some(title) = title else {
                tracing::debug!(mode = ?state.input_mode, "nothing selectable highlighted");
                return Ok((false, vec![]));
            };
            Ok((true, select_movie(state, title)))
        }
        Event::SelectMovie(title) => Ok((true, select_movie(state, title.clone()))),
        Event::Feedback { liked } => {
            let Some((title, _)) = state.highlighted_browse_entry() else {
                tracing::debug!("no movie highlighted to vote on");
                return Ok((false, vec![]));
            };
            let title = title.to_string();
            Ok((true, submit_feedback(state, title, *liked)))
        }
        Event::SubmitFeedback { title, liked } => Ok((true, submit_feedback(state, title.clone(), *liked))),
        Event::FocusSearch => {
            state.input_mode = InputMode::Search;
            Ok((true, vec![]))
        }
        Event::FocusBrowse => {
            state.input_mode = InputMode::Browse;
            Ok((true, vec![]))
        }
        Event::ToggleFocus => {
            state.input_mode = match state.input_mode {
                InputMode::Search => InputMode::Browse,
                InputMode::Browse => InputMode::Search,
            };
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::Tick { elapsed_secs } => Ok(handle_tick(state, *elapsed_secs)),
        Event::Response(response) => Ok(handle_response(state, response)),
        Event::DispatchFailed { id, reason } => {
            let Some(pending) = state.pending.resolve(*id) else {
                return Ok((false, vec![]));
            };
            tracing::warn!(request_id = %id, operation = %pending.operation, reason = %reason, "request could not be dispatched");
            Ok(apply_outcome(state, pending, Err(CinematchError::Config(reason.clone()))))
        }
    }
}

fn change_query(state: &mut AppState, query: String) -> (bool, Vec<Action>) {
    state.query = query;
    state.result_cursor = 0;

    if state.query_len() < MIN_QUERY_LEN {
        tracing::trace!(query = %state.query, "query too short to search");
        state.search_results.clear();
        return (true, vec![]);
    }

    let request = ApiRequest::search(state.query.clone());
    let mut actions = vec![issue(state, request, None)];
    actions.extend(ensure_tick(state));
    (true, actions)
}

fn select_movie(state: &mut AppState, title: String) -> Vec<Action> {
    state.next_selection_seq += 1;
    let seq = state.next_selection_seq;

    tracing::debug!(title = %title, selection_seq = seq, "movie selected");

    state.query.clone_from(&title);
    state.search_results.clear();
    state.result_cursor = 0;
    state.search_epoch += 1;
    state.notice = None;
    state.input_mode = InputMode::Browse;
    state.browse_cursor = 0;
    state.selection = Some(Selection {
        seq,
        title: title.clone(),
    });

    let mut actions = vec![issue(state, ApiRequest::movie_details(title), Some(seq))];
    actions.extend(ensure_tick(state));
    actions
}

fn submit_feedback(state: &mut AppState, title: String, liked: bool) -> Vec<Action> {
    tracing::debug!(title = %title, liked, "submitting feedback");
    state.votes.insert(title.clone(), liked);

    let request = ApiRequest::feedback(title, state.session_id.clone(), liked);
    let mut actions = vec![issue(state, request, None)];
    actions.extend(ensure_tick(state));
    actions
}

/// Records `request` in the pending table and wraps it in a send action.
fn issue(state: &mut AppState, request: ApiRequest, selection_seq: Option<u64>) -> Action {
    let tag = match &request {
        ApiRequest::Search { query } => query.clone(),
        ApiRequest::MovieDetails { title } | ApiRequest::Recommend { title, .. } | ApiRequest::Feedback { title, .. } => {
            title.clone()
        }
    };
    let operation = request.operation();

    let id = state.pending.issue(Pending {
        operation,
        tag,
        search_epoch: state.search_epoch,
        selection_seq,
        deadline: state.clock_secs + state.request_timeout_secs,
    });

    tracing::debug!(request_id = %id, operation = %operation, outstanding = state.pending.len(), "request issued");

    Action::Send(OutgoingRequest { id, request })
}

fn ensure_tick(state: &mut AppState) -> Option<Action> {
    if state.pending.is_empty() || state.tick_scheduled {
        return None;
    }
    state.tick_scheduled = true;
    Some(Action::ScheduleTick(TICK_INTERVAL_SECS))
}

fn handle_tick(state: &mut AppState, elapsed_secs: f64) -> (bool, Vec<Action>) {
    state.tick_scheduled = false;
    state.clock_secs += elapsed_secs;

    let expired = state.pending.expire(state.clock_secs);
    let mut should_render = false;
    let mut actions = vec![];

    for (id, pending) in expired {
        tracing::warn!(request_id = %id, operation = %pending.operation, tag = %pending.tag, "request timed out");
        let after_secs = state.request_timeout_secs;
        let (render, follow_up) = apply_outcome(state, pending, Err(CinematchError::Timeout { after_secs }));
        should_render |= render;
        actions.extend(follow_up);
    }

    actions.extend(ensure_tick(state));
    (should_render, actions)
}

fn handle_response(state: &mut AppState, response: &HttpResponse) -> (bool, Vec<Action>) {
    let Some(context) = RequestContext::from_map(&response.context) else {
        tracing::debug!(status = response.status, "ignoring response without request context");
        return (false, vec![]);
    };

    let Some(pending) = state.pending.resolve(context.id) else {
        tracing::debug!(request_id = %context.id, operation = %context.operation, "discarding late response");
        return (false, vec![]);
    };

    if pending.operation != context.operation {
        tracing::warn!(
            request_id = %context.id,
            expected = %pending.operation,
            received = %context.operation,
            "response operation does not match request"
        );
        return (pending.operation.blocks_ui(), vec![]);
    }

    tracing::debug!(request_id = %context.id, operation = %pending.operation, status = response.status, "response received");

    let outcome = decode(pending.operation, response.status, &response.body);
    apply_outcome(state, pending, outcome)
}

/// Applies the outcome of a resolved request to the state.
fn apply_outcome(state: &mut AppState, pending: Pending, outcome: Result<ApiResponse>) -> (bool, Vec<Action>) {
    match pending.operation {
        Operation::Search => {
            apply_search(state, &pending, outcome);
            (true, vec![])
        }
        Operation::MovieDetails => (true, apply_movie_details(state, &pending, outcome)),
        Operation::Recommend => {
            apply_recommendations(state, &pending, outcome);
            (true, vec![])
        }
        Operation::Feedback => {
            match outcome {
                Ok(_) => tracing::debug!(title = %pending.tag, "feedback recorded"),
                Err(e) => tracing::warn!(title = %pending.tag, error = %e, "feedback submission failed"),
            }
            (false, vec![])
        }
    }
}

fn apply_search(state: &mut AppState, pending: &Pending, outcome: Result<ApiResponse>) {
    if !state.awaits(pending) {
        tracing::debug!(tag = %pending.tag, query = %state.query, "discarding stale search result");
        return;
    }

    match outcome {
        Ok(ApiResponse::SearchResults(titles)) => {
            tracing::debug!(query = %pending.tag, results = titles.len(), "search results applied");
            state.search_results = titles;
            state.clamp_cursors();
        }
        Ok(other) => {
            tracing::warn!(payload = ?other, "unexpected payload for search");
        }
        Err(e) => {
            tracing::warn!(query = %pending.tag, error = %e, "search failed");
            state.search_results.clear();
            state.result_cursor = 0;
        }
    }
}

fn apply_movie_details(state: &mut AppState, pending: &Pending, outcome: Result<ApiResponse>) -> Vec<Action> {
    if !state.awaits(pending) {
        tracing::debug!(title = %pending.tag, selection_seq = ?pending.selection_seq, "discarding superseded movie details");
        return vec![];
    }

    match outcome {
        Ok(ApiResponse::MovieDetails(movie)) => {
            tracing::debug!(title = %movie.title, "movie details loaded");
            state.selected_movie = Some(movie);
            state.recommendations.clear();
            state.recommendations_for = None;
            state.clamp_cursors();

            let request = ApiRequest::recommend(pending.tag.clone(), state.session_id.clone());
            let mut actions = vec![issue(state, request, pending.selection_seq)];
            actions.extend(ensure_tick(state));
            actions
        }
        Ok(other) => {
            tracing::warn!(payload = ?other, "unexpected payload for movie details");
            vec![]
        }
        Err(e) => {
            tracing::warn!(title = %pending.tag, error = %e, "movie details lookup failed");
            state.selected_movie = None;
            state.notice = Some(match e {
                CinematchError::NotFound(_) => format!("\"{}\" was not found", pending.tag),
                other => format!("Could not load \"{}\": {other}", pending.tag),
            });
            state.clamp_cursors();
            vec![]
        }
    }
}

fn apply_recommendations(state: &mut AppState, pending: &Pending, outcome: Result<ApiResponse>) {
    if !state.awaits(pending) {
        tracing::debug!(title = %pending.tag, selection_seq = ?pending.selection_seq, "discarding superseded recommendations");
        return;
    }

    match outcome {
        Ok(ApiResponse::Recommendations(recommendations)) => {
            tracing::debug!(title = %pending.tag, count = recommendations.len(), "recommendations applied");
            state.recommendations = recommendations;
            state.recommendations_for = Some(pending.tag.clone());
        }
        Ok(other) => {
            tracing::warn!(payload = ?other, "unexpected payload for recommendations");
        }
        Err(CinematchError::Application(message)) => {
            tracing::warn!(title = %pending.tag, error = %message, "service returned no recommendations");
            state.recommendations.clear();
            state.recommendations_for = None;
        }
        Err(e) => {
            tracing::warn!(title = %pending.tag, error = %e, "recommendation fetch failed");
            state.recommendations.clear();
            state.recommendations_for = None;
            state.notice = Some(format!("Recommendations unavailable: {e}"));
        }
    }
    state.clamp_cursors();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::Phase;
    use crate::domain::SessionId;
    use crate::ui::theme::Theme;

    const MOVIE_ALPHA: &str = r#"{"movie":{"title":"Alpha","genres":["Drama"],"rating":0.8,"summary":"s","poster_url":"u"}}"#;
    const MOVIE_BETA: &str = r#"{"movie":{"title":"Beta","genres":[],"rating":0.7,"poster_url":""}}"#;
    const RECS_ALPHA: &str = r#"{"recommendations":[
        {"title":"Beta","genres":["Drama","Crime"],"rating":0.75,"similarity_score":0.87,"poster_url":"p1"},
        {"title":"Gamma","genres":["Drama"],"rating":0.7,"similarity_score":0.81,"poster_url":"p2"}]}"#;

    fn state() -> AppState {
        AppState::new(SessionId::from("user_test12345".to_string()), Theme::default(), 10.0)
    }

    fn run(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    fn sends(actions: &[Action]) -> Vec<OutgoingRequest> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::Send(outgoing) => Some(outgoing.clone()),
                _ => None,
            })
            .collect()
    }

    fn only_send(actions: &[Action]) -> OutgoingRequest {
        let mut sent = sends(actions);
        assert_eq!(sent.len(), 1, "expected exactly one request in {actions:?}");
        sent.remove(0)
    }

    fn respond(outgoing: &OutgoingRequest, status: u16, body: &str) -> Event {
        Event::Response(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
            context: RequestContext::new(outgoing.id, outgoing.request.operation()).to_map(),
        })
    }

    fn type_query(state: &mut AppState, text: &str) -> Vec<Action> {
        let mut actions = vec![];
        for c in text.chars() {
            actions.extend(run(state, Event::Char(c)).1);
        }
        actions
    }

    #[test]
    fn short_queries_never_search() {
        let mut state = state();
        let (render, actions) = run(&mut state, Event::Char('a'));
        assert!(render);
        assert!(sends(&actions).is_empty());

        state.search_results = vec!["stale".to_string()];
        let (_, actions) = run(&mut state, Event::QueryChanged("é".to_string()));
        assert!(sends(&actions).is_empty());
        assert!(state.search_results.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn two_characters_issue_one_search_tagged_with_the_query() {
        let mut state = state();
        let actions = type_query(&mut state, "ab");
        let search = only_send(&actions);
        assert_eq!(search.request, ApiRequest::search("ab"));
        assert!(actions.contains(&Action::ScheduleTick(TICK_INTERVAL_SECS)));
        assert!(state.is_loading());

        run(&mut state, respond(&search, 200, r#"["Alpha","Abyss"]"#));
        assert_eq!(state.search_results, vec!["Alpha", "Abyss"]);
        assert!(!state.is_loading());
    }

    #[test]
    fn only_the_live_query_is_applied() {
        let mut state = state();
        let first = only_send(&type_query(&mut state, "ab"));
        let second = only_send(&run(&mut state, Event::Char('c')).1);

        run(&mut state, respond(&second, 200, r#"["Abc"]"#));
        run(&mut state, respond(&first, 200, r#"["Ab old"]"#));

        assert_eq!(state.query, "abc");
        assert_eq!(state.search_results, vec!["Abc"]);
    }

    #[test]
    fn search_failure_clears_results() {
        let mut state = state();
        let search = only_send(&type_query(&mut state, "ab"));
        state.search_results = vec!["previous".to_string()];

        let (render, _) = run(&mut state, respond(&search, 500, "boom"));
        assert!(render);
        assert!(state.search_results.is_empty());
        assert!(!state.is_loading());
        assert!(state.notice.is_none());
    }

    #[test]
    fn selection_loads_details_then_recommendations() {
        let mut state = state();
        let search = only_send(&type_query(&mut state, "ab"));
        run(&mut state, respond(&search, 200, r#"["Alpha","Abyss"]"#));

        let (_, actions) = run(&mut state, Event::SelectHighlighted);
        let details = only_send(&actions);
        assert_eq!(details.request, ApiRequest::movie_details("Alpha"));
        assert_eq!(state.query, "Alpha");
        assert!(state.search_results.is_empty());
        assert_eq!(state.input_mode, InputMode::Browse);
        assert_eq!(state.phase(), Phase::Selecting);

        let (_, actions) = run(&mut state, respond(&details, 200, MOVIE_ALPHA));
        assert_eq!(state.selected_movie.as_ref().map(|m| m.title.as_str()), Some("Alpha"));
        let recommend = only_send(&actions);
        assert_eq!(
            recommend.request,
            ApiRequest::recommend("Alpha", SessionId::from("user_test12345".to_string()))
        );
        assert_eq!(state.phase(), Phase::Recommending);

        run(&mut state, respond(&recommend, 200, RECS_ALPHA));
        assert_eq!(state.recommendations.len(), 2);
        assert!(!state.is_loading());
        assert_eq!(state.phase(), Phase::Viewing);
    }

    #[test]
    fn cursor_picks_which_result_is_selected() {
        let mut state = state();
        let search = only_send(&type_query(&mut state, "ab"));
        run(&mut state, respond(&search, 200, r#"["Alpha","Abyss"]"#));
        run(&mut state, Event::CursorDown);

        let details = only_send(&run(&mut state, Event::SelectHighlighted).1);
        assert_eq!(details.request, ApiRequest::movie_details("Abyss"));
    }

    #[test]
    fn enter_without_results_does_nothing() {
        let mut state = state();
        let (render, actions) = run(&mut state, Event::SelectHighlighted);
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn detail_not_found_clears_the_movie_and_skips_recommendations() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Zeta".to_string())).1);

        let (render, actions) = run(&mut state, respond(&details, 200, r#"{"error":"Movie not found"}"#));
        assert!(render);
        assert!(sends(&actions).is_empty());
        assert!(state.selected_movie.is_none());
        assert!(!state.is_loading());
        assert!(state.notice.as_deref().is_some_and(|n| n.contains("Zeta")));
    }

    #[test]
    fn recommendation_error_leaves_the_list_empty() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let recommend = only_send(&run(&mut state, respond(&details, 200, MOVIE_ALPHA)).1);

        run(&mut state, respond(&recommend, 200, r#"{"error":"no similar movies"}"#));
        assert!(state.recommendations.is_empty());
        assert!(state.selected_movie.is_some());
        assert!(!state.is_loading());
    }

    #[test]
    fn recommendation_transport_failure_clears_and_notifies() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let recommend = only_send(&run(&mut state, respond(&details, 200, MOVIE_ALPHA)).1);
        state.recommendations = vec![];

        run(&mut state, respond(&recommend, 502, ""));
        assert!(state.recommendations.is_empty());
        assert!(state.notice.is_some());
        assert!(!state.is_loading());
    }

    #[test]
    fn clear_keeps_the_selected_movie() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let recommend = only_send(&run(&mut state, respond(&details, 200, MOVIE_ALPHA)).1);
        run(&mut state, respond(&recommend, 200, RECS_ALPHA));

        run(&mut state, Event::ClearSearch);
        assert!(state.query.is_empty());
        assert!(state.search_results.is_empty());
        assert!(state.selected_movie.is_some());
        assert_eq!(state.recommendations.len(), 2);
    }

    #[test]
    fn feedback_does_not_block_or_touch_state() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let recommend = only_send(&run(&mut state, respond(&details, 200, MOVIE_ALPHA)).1);
        run(&mut state, respond(&recommend, 200, RECS_ALPHA));

        run(&mut state, Event::CursorDown);
        let (_, actions) = run(&mut state, Event::Feedback { liked: true });
        let feedback = only_send(&actions);
        assert_eq!(
            feedback.request,
            ApiRequest::feedback("Beta", SessionId::from("user_test12345".to_string()), true)
        );
        assert!(!state.is_loading());
        assert_eq!(state.votes.get("Beta"), Some(&true));

        let before = (state.query.clone(), state.selected_movie.clone(), state.recommendations.clone());
        let (render, actions) = run(&mut state, respond(&feedback, 500, ""));
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(before, (state.query.clone(), state.selected_movie.clone(), state.recommendations.clone()));
        assert!(state.notice.is_none());
    }

    #[test]
    fn every_press_sends_its_own_feedback() {
        let mut state = state();
        let first = only_send(&run(&mut state, Event::SubmitFeedback { title: "Beta".to_string(), liked: true }).1);
        let second = only_send(&run(&mut state, Event::SubmitFeedback { title: "Beta".to_string(), liked: false }).1);
        assert_ne!(first.id, second.id);
        assert_eq!(state.votes.get("Beta"), Some(&false));
    }

    #[test]
    fn superseded_selection_is_ignored() {
        let mut state = state();
        let first = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let second = only_send(&run(&mut state, Event::SelectMovie("Beta".to_string())).1);

        let (_, actions) = run(&mut state, respond(&first, 200, MOVIE_ALPHA));
        assert!(sends(&actions).is_empty());
        assert!(state.selected_movie.is_none());

        let recommend = only_send(&run(&mut state, respond(&second, 200, MOVIE_BETA)).1);
        assert_eq!(
            recommend.request,
            ApiRequest::recommend("Beta", SessionId::from("user_test12345".to_string()))
        );
    }

    #[test]
    fn superseded_lookup_does_not_keep_the_ui_loading() {
        let mut state = state();
        let _alpha = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let beta = only_send(&run(&mut state, Event::SelectMovie("Beta".to_string())).1);

        let recommend = only_send(&run(&mut state, respond(&beta, 200, MOVIE_BETA)).1);
        run(&mut state, respond(&recommend, 200, r#"{"recommendations":[]}"#));

        assert_eq!(state.pending.len(), 1);
        assert_eq!(state.phase(), Phase::Viewing);
        assert!(!state.is_loading());
        assert!(state.compute_viewmodel(24, 80).header.status.is_none());
    }

    #[test]
    fn recommendations_keep_the_title_they_were_fetched_for() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let recommend = only_send(&run(&mut state, respond(&details, 200, MOVIE_ALPHA)).1);
        run(&mut state, respond(&recommend, 200, RECS_ALPHA));

        let zeta = only_send(&run(&mut state, Event::SelectMovie("Zeta".to_string())).1);
        let (_, actions) = run(&mut state, respond(&zeta, 200, r#"{"error":"Movie not found"}"#));
        assert!(sends(&actions).is_empty());
        assert!(state.selected_movie.is_none());

        let heading = state.compute_viewmodel(30, 80).recommendations.map(|list| list.heading);
        assert_eq!(heading.as_deref(), Some("Because you picked Alpha"));
    }

    #[test]
    fn recommendations_for_a_superseded_selection_are_ignored() {
        let mut state = state();
        let alpha = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let alpha_recs = only_send(&run(&mut state, respond(&alpha, 200, MOVIE_ALPHA)).1);
        let beta = only_send(&run(&mut state, Event::SelectMovie("Beta".to_string())).1);

        let (_, actions) = run(&mut state, respond(&alpha_recs, 200, RECS_ALPHA));
        assert!(sends(&actions).is_empty());
        assert!(state.recommendations.is_empty());
        assert!(state.recommendations_for.is_none());
        assert_eq!(state.phase(), Phase::Selecting);

        let beta_recs = only_send(&run(&mut state, respond(&beta, 200, MOVIE_BETA)).1);
        assert_eq!(
            beta_recs.request,
            ApiRequest::recommend("Beta", SessionId::from("user_test12345".to_string()))
        );
        run(&mut state, respond(&beta_recs, 200, r#"{"recommendations":[
            {"title":"Delta","genres":["Drama"],"rating":0.6,"similarity_score":0.5,"poster_url":"p"}]}"#));
        let titles: Vec<&str> = state.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Delta"]);
        assert_eq!(state.recommendations_for.as_deref(), Some("Beta"));
        assert_eq!(state.selected_movie.as_ref().map(|m| m.title.as_str()), Some("Beta"));
    }

    #[test]
    fn search_issued_before_selection_never_returns() {
        let mut state = state();
        // A search whose tag will equal the selected title.
        let search = only_send(&run(&mut state, Event::QueryChanged("Alpha".to_string())).1);
        run(&mut state, Event::SelectMovie("Alpha".to_string()));

        run(&mut state, respond(&search, 200, r#"["Alpha","Alphaville"]"#));
        assert_eq!(state.query, "Alpha");
        assert!(state.search_results.is_empty());
    }

    #[test]
    fn requests_time_out_and_late_responses_are_dropped() {
        let mut state = AppState::new(SessionId::from("user_t".to_string()), Theme::default(), 2.0);
        let actions = type_query(&mut state, "ab");
        let search = only_send(&actions);
        state.search_results = vec!["previous".to_string()];

        let (render, actions) = run(&mut state, Event::Tick { elapsed_secs: 1.0 });
        assert!(!render);
        assert_eq!(actions, vec![Action::ScheduleTick(TICK_INTERVAL_SECS)]);
        assert!(state.is_loading());

        let (render, actions) = run(&mut state, Event::Tick { elapsed_secs: 1.0 });
        assert!(render);
        assert!(actions.is_empty());
        assert!(!state.is_loading());
        assert!(state.search_results.is_empty());

        let (render, _) = run(&mut state, respond(&search, 200, r#"["late"]"#));
        assert!(!render);
        assert!(state.search_results.is_empty());
    }

    #[test]
    fn detail_timeout_behaves_like_a_network_failure() {
        let mut state = AppState::new(SessionId::from("user_t".to_string()), Theme::default(), 1.0);
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);

        let (_, actions) = run(&mut state, Event::Tick { elapsed_secs: 1.0 });
        assert!(sends(&actions).is_empty());
        assert!(state.selected_movie.is_none());
        assert!(state.notice.is_some());

        let (_, actions) = run(&mut state, respond(&details, 200, MOVIE_ALPHA));
        assert!(actions.is_empty());
        assert!(state.selected_movie.is_none());
    }

    #[test]
    fn only_one_timer_is_armed_at_a_time() {
        let mut state = state();
        let actions = type_query(&mut state, "abc");
        let ticks = actions.iter().filter(|a| matches!(a, Action::ScheduleTick(_))).count();
        assert_eq!(ticks, 1);
        assert_eq!(sends(&actions).len(), 2);
    }

    #[test]
    fn dispatch_failure_resolves_the_request() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);

        run(
            &mut state,
            Event::DispatchFailed {
                id: details.id,
                reason: "invalid api_url".to_string(),
            },
        );
        assert!(!state.is_loading());
        assert!(state.selected_movie.is_none());
        assert!(state.notice.is_some());
    }

    #[test]
    fn enter_on_a_recommendation_selects_it() {
        let mut state = state();
        let details = only_send(&run(&mut state, Event::SelectMovie("Alpha".to_string())).1);
        let recommend = only_send(&run(&mut state, respond(&details, 200, MOVIE_ALPHA)).1);
        run(&mut state, respond(&recommend, 200, RECS_ALPHA));

        // The selected movie itself is not re-selectable.
        let (_, actions) = run(&mut state, Event::SelectHighlighted);
        assert!(actions.is_empty());

        run(&mut state, Event::CursorDown);
        run(&mut state, Event::CursorDown);
        let next = only_send(&run(&mut state, Event::SelectHighlighted).1);
        assert_eq!(next.request, ApiRequest::movie_details("Gamma"));
        assert_eq!(state.query, "Gamma");
    }

    #[test]
    fn foreign_responses_are_ignored() {
        let mut state = state();
        let (render, actions) = run(
            &mut state,
            Event::Response(HttpResponse {
                status: 200,
                body: b"[]".to_vec(),
                context: std::collections::BTreeMap::new(),
            }),
        );
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn focus_events_switch_input_mode() {
        let mut state = state();
        run(&mut state, Event::ToggleFocus);
        assert_eq!(state.input_mode, InputMode::Browse);
        run(&mut state, Event::FocusSearch);
        assert_eq!(state.input_mode, InputMode::Search);
        run(&mut state, Event::FocusBrowse);
        assert_eq!(state.input_mode, InputMode::Browse);
        assert_eq!(run(&mut state, Event::CloseFocus).1, vec![Action::CloseFocus]);
    }
}
