//! Infrastructure layer for filesystem interactions in the plugin sandbox.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir};
