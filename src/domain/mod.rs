//! Domain layer for the Cinematch plugin.
//!
//! Core types independent of Zellij APIs and of the HTTP wire details.
//!
//! # Organization
//!
//! - [`error`]: Error taxonomy and result alias
//! - [`movie`]: Movie detail and recommendation records
//! - [`session`]: Anonymous per-session identity

pub mod error;
pub mod movie;
pub mod session;

pub use error::{CinematchError, Result};
pub use movie::{MovieDetails, Recommendation};
pub use session::SessionId;
