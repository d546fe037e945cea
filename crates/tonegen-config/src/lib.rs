//! Configuration for tonegen.
//!
//! A single TOML file configures the output stream, the engine's timing
//! constants and the scope cadence. Every field has a default, so a partial
//! (or missing) file is fine.
//!
//! # Example
//!
//! ```rust,no_run
//! use tonegen_config::{ToneConfig, paths};
//!
//! let config = ToneConfig::load_or_default(None).unwrap();
//! println!("sample rate: {}", config.audio.sample_rate);
//!
//! config.save(paths::user_config_file()).unwrap();
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
pub mod paths;

pub use config::{AudioSection, ScopeSection, TimingSection, ToneConfig};
pub use error::ConfigError;
pub use paths::{CONFIG_FILE_NAME, ensure_user_config_dir, user_config_dir, user_config_file};
