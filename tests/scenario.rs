//! End-to-end flows through the reducer and the gateway, answered by a fake
//! recommendation service.

use cinematch::gateway::{HttpMethod, HttpRequest, HttpResponse, OutgoingRequest};
use cinematch::{handle_event, initialize, Action, AppState, Config, Event, Gateway, InputMode, Phase};

/// Canned answers keyed by request URL path and query.
fn fake_service(request: &HttpRequest) -> (u16, String) {
    let url = request.url.strip_prefix("http://localhost:5000").unwrap_or(&request.url);
    let body = match url {
        "/search?query=ab" => r#"["Alpha","Abyss"]"#.to_string(),
        "/movie_details?movie=Alpha" => r#"{"movie":{"title":"Alpha","genres":["Drama","Sci-Fi"],
            "rating":0.82,"summary":"A quiet film about signals.","poster_url":"https://img/alpha.jpg"}}"#
            .to_string(),
        "/movie_details?movie=Nothing" => r#"{"error":"Movie not found"}"#.to_string(),
        "/feedback" => r#"{"message":"Feedback recorded"}"#.to_string(),
        other if other.starts_with("/recommend?movie=Alpha&user_id=user_") => r#"{"recommendations":[
            {"title":"Beta","genres":["Drama"],"rating":0.75,"similarity_score":0.87,"poster_url":"p1"},
            {"title":"Gamma","genres":["Sci-Fi"],"rating":0.7,"similarity_score":0.81,"poster_url":"p2"}]}"#
            .to_string(),
        other => return (404, format!("no route for {other}")),
    };
    (200, body)
}

struct Harness {
    state: AppState,
    gateway: Gateway,
    in_flight: Vec<(OutgoingRequest, HttpRequest)>,
}

impl Harness {
    fn new() -> Self {
        let config = Config::default();
        Self {
            state: initialize(&config),
            gateway: Gateway::new(&config.api_url).unwrap(),
            in_flight: Vec::new(),
        }
    }

    fn send(&mut self, event: Event) -> Vec<Action> {
        let (_, actions) = handle_event(&mut self.state, &event).unwrap();
        for action in &actions {
            if let Action::Send(outgoing) = action {
                let http = self.gateway.build(outgoing, None).unwrap();
                self.in_flight.push((outgoing.clone(), http));
            }
        }
        actions
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send(Event::Char(c));
        }
    }

    /// Answers every in-flight request, including ones issued while answering.
    fn settle(&mut self) -> Vec<HttpRequest> {
        let mut served = Vec::new();
        while !self.in_flight.is_empty() {
            let (_, http) = self.in_flight.remove(0);
            let (status, body) = fake_service(&http);
            self.send(Event::Response(HttpResponse {
                status,
                body: body.into_bytes(),
                context: http.context.clone(),
            }));
            served.push(http);
        }
        served
    }
}

#[test]
fn search_select_and_recommend() {
    let mut harness = Harness::new();

    harness.type_text("a");
    assert!(harness.in_flight.is_empty());

    harness.type_text("b");
    assert_eq!(harness.in_flight.len(), 1);
    assert!(harness.state.is_loading());
    harness.settle();
    assert_eq!(harness.state.search_results, vec!["Alpha", "Abyss"]);
    assert!(!harness.state.is_loading());

    harness.send(Event::SelectHighlighted);
    assert_eq!(harness.state.phase(), Phase::Selecting);
    assert_eq!(harness.state.input_mode, InputMode::Browse);
    let served = harness.settle();

    assert_eq!(served.len(), 2);
    let session = harness.state.session_id.as_str().to_string();
    assert!(served[1].url.ends_with(&format!("user_id={session}")));

    let movie = harness.state.selected_movie.as_ref().unwrap();
    assert_eq!(movie.title, "Alpha");
    assert!(harness.state.search_results.is_empty());
    let titles: Vec<&str> = harness.state.recommendations.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Beta", "Gamma"]);
    assert_eq!(harness.state.phase(), Phase::Viewing);

    let vm = harness.state.compute_viewmodel(40, 100);
    assert_eq!(vm.movie.as_ref().map(|m| m.rating.as_str()), Some("★ 8.2/10"));
    let recs = vm.recommendations.unwrap();
    assert_eq!(recs.items.len(), 2);
    assert!(vm.header.status.is_none());
}

#[test]
fn liking_a_recommendation_posts_feedback_without_loading() {
    let mut harness = Harness::new();
    harness.send(Event::SelectMovie("Alpha".to_string()));
    harness.settle();

    harness.send(Event::CursorDown);
    harness.send(Event::Feedback { liked: true });
    assert!(!harness.state.is_loading());

    let (_, http) = harness.in_flight.last().unwrap().clone();
    assert_eq!(http.method, HttpMethod::Post);
    let body: serde_json::Value = serde_json::from_slice(&http.body).unwrap();
    assert_eq!(body["movie_title"], "Beta");
    assert_eq!(body["liked"], true);
    assert_eq!(body["user_id"], harness.state.session_id.as_str());

    let before = harness.state.recommendations.clone();
    harness.settle();
    assert_eq!(harness.state.recommendations, before);
    assert_eq!(harness.state.votes.get("Beta"), Some(&true));
}

#[test]
fn unknown_movie_shows_nothing_and_skips_recommendations() {
    let mut harness = Harness::new();
    harness.send(Event::SelectMovie("Nothing".to_string()));
    let served = harness.settle();

    assert_eq!(served.len(), 1);
    assert!(harness.state.selected_movie.is_none());
    assert!(harness.state.recommendations.is_empty());
    assert!(!harness.state.is_loading());
}

#[test]
fn invalid_base_url_fails_every_dispatch() {
    let mut state = initialize(&Config::default());
    let gateway = Gateway::new("not a url");
    assert!(gateway.is_err());

    let (_, actions) = handle_event(&mut state, &Event::SelectMovie("Alpha".to_string())).unwrap();
    let id = actions
        .iter()
        .find_map(|action| match action {
            Action::Send(outgoing) => Some(outgoing.id),
            _ => None,
        })
        .unwrap();

    handle_event(
        &mut state,
        &Event::DispatchFailed {
            id,
            reason: "api_url is not a valid URL".to_string(),
        },
    )
    .unwrap();
    assert!(!state.is_loading());
    assert!(state.selected_movie.is_none());
}
