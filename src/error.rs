//! Error types for the gunshot synthesizer.
//!
//! This module provides a unified error type [`GunshotError`] that covers
//! all error conditions that can occur during input validation, geometry
//! resolution, rendering and file I/O.

use thiserror::Error;

/// Result type alias using [`GunshotError`].
pub type Result<T> = std::result::Result<T, GunshotError>;

/// Unified error type for all synthesis operations.
#[derive(Error, Debug)]
pub enum GunshotError {
    // ============ Validation Errors ============
    /// Degenerate scene geometry (coincident gun and microphone, zero direction)
    #[error("Invalid geometry: {message}")]
    Geometry { message: String },

    /// Out-of-range ballistic or synthesis parameter
    #[error("Invalid parameter '{name}': {message}")]
    Parameter { name: String, message: String },

    // ============ Rendering Errors ============
    /// The mixer refused to place a source waveform
    #[error(transparent)]
    Render(#[from] RenderError),

    // ============ I/O Errors ============
    /// Error reading a shot description file
    #[error("Failed to read shot file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed shot description
    #[error("Failed to parse shot description: {source}")]
    ConfigParse {
        #[source]
        source: serde_json::Error,
    },

    /// Error writing rendered audio
    #[error("Audio output error: {message}")]
    AudioOutput { message: String },
}

/// Failures raised by the mixer while laying out arrivals.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A source would start before the first output sample
    #[error("Non-causal arrival of {source_kind} at sample offset {offset}")]
    NonCausal { source_kind: String, offset: i64 },

    /// A source does not fit into the fixed output window
    #[error("Output window of {window} samples is too short: {source_kind} ends at sample {end}")]
    WindowTooShort {
        source_kind: String,
        window: usize,
        end: usize,
    },

    /// A buffer would exceed the sample limit (or its length is not finite)
    #[error("Buffer for {what} needs {samples} samples, limit is {limit}")]
    BufferTooLarge {
        what: String,
        samples: f64,
        limit: usize,
    },

    /// Summation produced NaN or infinite samples
    #[error("Non-finite sample at index {index}")]
    NonFinite { index: usize },
}

impl GunshotError {
    /// Create a geometry error
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
        }
    }

    /// Create a parameter error
    pub fn parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an audio output error
    pub fn audio_output(message: impl Into<String>) -> Self {
        Self::AudioOutput {
            message: message.into(),
        }
    }
}
