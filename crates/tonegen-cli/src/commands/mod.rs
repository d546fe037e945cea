//! CLI command implementations.

pub mod config;
pub mod devices;
pub mod note;
pub mod play;
pub mod preview;
