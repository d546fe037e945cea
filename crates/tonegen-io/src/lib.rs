//! Audio output layer for tonegen.
//!
//! This crate provides:
//!
//! - **Backend abstraction**: [`AudioBackend`] with a cpal implementation,
//!   [`CpalBackend`]
//! - **Device discovery**: [`list_output_devices`] and [`default_output_device`]
//! - **Engine output**: [`open_output`] wires a [`Renderer`](tonegen_synth::Renderer)
//!   into an output stream and hands back a [`ToneOutput`] the engine attaches to
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tonegen_engine::ToneEngine;
//! use tonegen_io::{BackendStreamConfig, CpalBackend, open_output};
//!
//! let backend = CpalBackend::new();
//! let output = open_output(&backend, &BackendStreamConfig::default(), 2048)?;
//!
//! let mut engine = ToneEngine::default();
//! output.attach(&mut engine);
//! engine.play();
//! // Sound continues until `output` is dropped.
//! ```

pub mod backend;
pub mod cpal_backend;
mod device;
mod output;

pub use backend::{AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle};
pub use cpal_backend::CpalBackend;
pub use device::{AudioDevice, default_output_device, list_output_devices};
pub use output::{ToneOutput, open_output};
pub use tonegen_synth::ScopeReader;

/// Error types for audio output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio output device available on the system.
    #[error("No audio output device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}

/// Convenience result type for audio output operations.
pub type Result<T> = std::result::Result<T, Error>;
