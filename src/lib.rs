//! CineMatch: a Zellij plugin for searching movies and getting recommendations.
//!
//! CineMatch talks to a remote recommendation service over HTTP and provides:
//! - Incremental title search as you type
//! - A detail panel for the selected movie
//! - Personalized recommendations for the selected movie
//! - Like/dislike feedback on any movie shown, sent in the background
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! │  - key mapping, web_request, set_timeout            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling and request orchestration         │
//! │  - Pending requests, stale suppression, timeouts    │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                                       │
//! ┌───────────────┐                       ┌───────────────┐
//! │ UI Layer      │                       │ Gateway       │
//! │ (ui/)         │                       │ (gateway/)    │
//! │ - Rendering   │                       │ - URLs/bodies │
//! │ - Theming     │                       │ - Decoding    │
//! │ - Components  │                       │ - Trace ctx   │
//! └───────────────┘                       └───────────────┘
//!         │                                       │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - Errors, movies, session id (domain/)             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/cinematch.wasm" {
//!         api_url "http://localhost:5000"
//!         request_timeout "10"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use cinematch::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for c in "al".chars() {
//!     let (_render, actions) = handle_event(&mut state, &Event::Char(c))?;
//!     for action in actions {
//!         if let Action::Send(request) = action {
//!             // The shim turns this into a web_request.
//!             assert_eq!(request.request.operation().name(), "search");
//!         }
//!     }
//! }
//! # Ok::<(), cinematch::CinematchError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod gateway;
pub mod infrastructure;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, Phase};
pub use domain::{CinematchError, MovieDetails, Recommendation, Result, SessionId};
pub use gateway::Gateway;
pub use ui::Theme;

use std::collections::BTreeMap;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Plugin configuration parsed from Zellij's configuration system.
///
/// ```kdl
/// plugin location="file:/path/to/cinematch.wasm" {
///     api_url "https://movies.example.org/api"
///     request_timeout "5"
///     theme_file "~/.config/cinematch/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the recommendation service. Default: `http://localhost:5000`
    pub api_url: String,

    /// Seconds before an outstanding request fails with a timeout. Default: 10
    pub request_timeout_secs: f64,

    /// Built-in theme name; ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file, `~` already expanded.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            theme_name: None,
            theme_file: None,
            trace_level: DEFAULT_TRACE_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Parses the configuration map Zellij hands to `load`.
    ///
    /// Missing, blank or invalid values fall back to their defaults; a
    /// `request_timeout` must be a positive number of seconds.
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let request_timeout_secs = value("request_timeout")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            api_url: value("api_url").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout_secs,
            theme_name: value("theme"),
            theme_file: value("theme_file").map(|path| infrastructure::expand_tilde(&path)),
            trace_level: value("trace_level").unwrap_or_else(|| DEFAULT_TRACE_LEVEL.to_string()),
        }
    }

    /// Loads the configured theme, falling back to the default one.
    #[must_use]
    pub fn load_theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Creates the initial state for a new plugin session.
///
/// Mints the session id used for every recommend and feedback call made by
/// this plugin instance.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    let session_id = SessionId::generate();
    tracing::debug!(
        session_id = %session_id,
        api_url = %config.api_url,
        request_timeout_secs = config.request_timeout_secs,
        "initializing cinematch plugin"
    );

    AppState::new(session_id, config.load_theme(), config.request_timeout_secs)
}
