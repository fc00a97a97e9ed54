//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the domain and gateway
//! layers, with a unidirectional data flow:
//!
//! ```text
//! Key / Timer / WebRequestResult → Event → handle_event → AppState mutation → Actions
//!                 ↑                                                              ↓
//!                 └─────────────── web_request / set_timeout ────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and request orchestration
//! - [`modes`]: Input focus and interaction phase types
//! - [`pending`]: Outstanding request table with deadlines
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```
//! use cinematch::app::{handle_event, Action, AppState, Event};
//! use cinematch::domain::SessionId;
//! use cinematch::ui::Theme;
//!
//! let mut state = AppState::new(SessionId::generate(), Theme::default(), 10.0);
//! handle_event(&mut state, &Event::Char('a'))?;
//! let (_, actions) = handle_event(&mut state, &Event::Char('b'))?;
//! assert!(actions.iter().any(|a| matches!(a, Action::Send(_))));
//! # Ok::<(), cinematch::CinematchError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod pending;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, Phase};
pub use state::AppState;
