//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the CineMatch library and the Zellij plugin
//! system. All behaviour lives in the library; this file maps host events to
//! library events and library actions to host calls.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`, validate `api_url`
//! 2. **Subscribe**: Register for `Key`, `WebRequestResult`, `Timer`, `PermissionRequestResult`
//! 3. **Update**: Translate events, delegate to `handle_event`, execute actions
//! 4. **Render**: Call library render function
//!
//! # Action Mapping
//!
//! - `Send` → `web_request` (a request that cannot be built is fed back as `DispatchFailed`)
//! - `ScheduleTick` → `set_timeout`
//! - `CloseFocus` → `hide_self`
//!
//! # Keybindings
//!
//! Search mode:
//! - Printable characters: Edit the query
//! - `Backspace`: Delete last character
//! - `Up`/`Down`, `Ctrl+p`/`Ctrl+n`: Move through results
//! - `Enter`: Select highlighted result
//! - `Esc`: Clear search
//! - `Tab`: Switch to browse mode
//!
//! Browse mode:
//! - `j`/`k`, `Up`/`Down`: Move through the selected movie and recommendations
//! - `l`/`+`: Like, `d`/`-`: Dislike
//! - `Enter`: Select highlighted recommendation
//! - `/`, `Tab`: Switch to search mode
//! - `q`, `Esc`: Close plugin

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_family = "wasm")]
mod plugin {
    use std::collections::BTreeMap;
    use zellij_tile::prelude::*;

    use cinematch::gateway::{HttpMethod, HttpResponse, OutgoingRequest, RequestContext, TraceContext};
    use cinematch::{handle_event, Action, AppState, Config, Event, Gateway, InputMode};

    /// Plugin state wrapper.
    ///
    /// Wraps the library's `AppState` with the request gateway built from the
    /// configured `api_url`.
    pub struct State {
        app: AppState,

        /// Error text if `api_url` did not parse; every dispatch then fails.
        gateway: Result<Gateway, String>,
    }

    /// Placeholder until `load` runs; the session id is minted there.
    impl Default for State {
        fn default() -> Self {
            Self {
                app: AppState::default(),
                gateway: Err("plugin has not been loaded".to_string()),
            }
        }
    }

    impl ZellijPlugin for State {
        fn load(&mut self, configuration: BTreeMap<String, String>) {
            let config = Config::from_zellij(&configuration);
            cinematch::observability::init_tracing(&config);

            let span = tracing::debug_span!("plugin_load");
            let _guard = span.entered();

            tracing::debug!(
                api_url = %config.api_url,
                request_timeout_secs = config.request_timeout_secs,
                "parsed configuration"
            );
            self.app = cinematch::initialize(&config);
            self.gateway = Gateway::new(&config.api_url).map_err(|e| {
                tracing::warn!(error = %e, "invalid api_url, requests will fail");
                e.to_string()
            });
            if let Ok(gateway) = &self.gateway {
                tracing::debug!(base_url = %gateway.base_url(), "gateway ready");
            }

            request_permission(&[PermissionType::WebAccess]);
            subscribe(&[
                EventType::Key,
                EventType::WebRequestResult,
                EventType::Timer,
                EventType::PermissionRequestResult,
            ]);

            tracing::debug!(session_id = %self.app.session_id, "plugin load complete");
        }

        fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
            // Responses are handled inside the trace of the span that sent the request.
            let _trace = match &event {
                zellij_tile::prelude::Event::WebRequestResult(_, _, _, context) => RequestContext::from_map(context)
                    .and_then(|ctx| ctx.trace_context)
                    .and_then(|trace| trace.attach()),
                _ => None,
            };

            let event_name = Self::get_event_name(&event);
            let span = tracing::debug_span!("plugin_update_event", otel.name = %format!("plugin_update::{event_name}"));
            let _guard = span.entered();

            let our_event = match event {
                zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                    Some(event) => event,
                    None => return false,
                },
                zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                    tracing::debug!(status, body_len = body.len(), "web request result");
                    Event::Response(HttpResponse { status, body, context })
                }
                zellij_tile::prelude::Event::Timer(elapsed_secs) => Event::Tick { elapsed_secs },
                zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                    match status {
                        PermissionStatus::Granted => tracing::debug!("web access granted"),
                        PermissionStatus::Denied => {
                            tracing::warn!("web access denied - requests will fail");
                        }
                    }
                    return false;
                }
                _ => return false,
            };

            self.dispatch(our_event)
        }

        fn render(&mut self, rows: usize, cols: usize) {
            cinematch::ui::render(&self.app, rows, cols);
        }
    }

    impl State {
        /// Runs an event through the reducer and executes the resulting actions,
        /// feeding failed dispatches back in.
        fn dispatch(&mut self, event: Event) -> bool {
            let mut queue = vec![event];
            let mut should_render = false;
            while let Some(event) = queue.pop() {
                match handle_event(&mut self.app, &event) {
                    Ok((render, actions)) => {
                        should_render |= render;
                        for action in &actions {
                            if let Some(failed) = self.execute_action(action) {
                                queue.push(failed);
                            }
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "error handling event"),
                }
            }
            should_render
        }

        fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
            match event {
                zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
                zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
                zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
                zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
                _ => "Other".to_string(),
            }
        }

        fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
            tracing::debug!(bare_key = ?key.bare_key, mode = ?self.app.input_mode, "key event");

            if key.has_modifiers(&[KeyModifier::Ctrl]) {
                return match key.bare_key {
                    BareKey::Char('n') => Some(Event::CursorDown),
                    BareKey::Char('p') => Some(Event::CursorUp),
                    _ => None,
                };
            }

            Some(match self.app.input_mode {
                InputMode::Search => match key.bare_key {
                    BareKey::Down => Event::CursorDown,
                    BareKey::Up => Event::CursorUp,
                    BareKey::Enter => Event::SelectHighlighted,
                    BareKey::Esc => Event::ClearSearch,
                    BareKey::Tab => Event::FocusBrowse,
                    BareKey::Backspace => Event::Backspace,
                    BareKey::Char(c) => Event::Char(c),
                    _ => return None,
                },
                InputMode::Browse => match key.bare_key {
                    BareKey::Down | BareKey::Char('j') => Event::CursorDown,
                    BareKey::Up | BareKey::Char('k') => Event::CursorUp,
                    BareKey::Enter => Event::SelectHighlighted,
                    BareKey::Char('l' | '+') => Event::Feedback { liked: true },
                    BareKey::Char('d' | '-') => Event::Feedback { liked: false },
                    BareKey::Char('/') | BareKey::Tab => Event::FocusSearch,
                    BareKey::Char('q') | BareKey::Esc => Event::CloseFocus,
                    _ => return None,
                },
            })
        }

        /// Executes an action, returning the event to feed back if it failed.
        #[tracing::instrument(level = "debug", skip(self))]
        fn execute_action(&self, action: &Action) -> Option<Event> {
            match action {
                Action::Send(outgoing) => self.send(outgoing).err(),
                Action::ScheduleTick(secs) => {
                    set_timeout(*secs);
                    None
                }
                Action::CloseFocus => {
                    hide_self();
                    None
                }
            }
        }

        fn send(&self, outgoing: &OutgoingRequest) -> Result<(), Event> {
            let failed = |reason: String| Event::DispatchFailed { id: outgoing.id, reason };

            let gateway = self.gateway.as_ref().map_err(|reason| failed(reason.clone()))?;
            let request = gateway
                .build(outgoing, TraceContext::from_current())
                .map_err(|e| failed(e.to_string()))?;

            tracing::debug!(id = %outgoing.id, url = %request.url, "sending web request");
            let verb = match request.method {
                HttpMethod::Get => HttpVerb::Get,
                HttpMethod::Post => HttpVerb::Post,
            };
            web_request(request.url, verb, request.headers, request.body, request.context);
            Ok(())
        }
    }
}

#[cfg(target_family = "wasm")]
use {plugin::State, zellij_tile::prelude::*};

#[cfg(target_family = "wasm")]
register_plugin!(State);

#[cfg(not(target_family = "wasm"))]
fn main() {
    eprintln!("cinematch is a Zellij plugin; build it with `cargo build --target wasm32-wasip1` and load the .wasm from Zellij");
}
