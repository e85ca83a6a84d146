//! # Gunshot Core
//!
//! Physically based synthesis of anechoic gunshot recordings.
//!
//! A gunshot heard downrange is two distinct sounds:
//! - The ballistic shock wave ("crack"), an N-wave radiated by the supersonic
//!   bullet along its Mach cone
//! - The muzzle blast ("bang"), a spherical blast wave radiated from the muzzle
//!
//! Given the bullet's ballistics and the gun/microphone geometry, this library
//! computes both, delays and attenuates them to the microphone and mixes them
//! into a dry, normalized signal meant to be convolved with a room model
//! downstream.
//!
//! ## Architecture
//!
//! Data flows strictly downstream through these modules:
//!
//! - [`params`] - Ballistic parameters, scene geometry, rendering configuration
//! - [`geometry`] - Trajectory and closest-approach resolver
//! - [`source`] - Shock-wave and muzzle-blast source models
//! - [`propagation`] - Travel-time delay, spreading loss and air absorption
//! - [`render`] - Mixer and normalization
//! - [`synth`] - The pipeline driver
//! - [`audio`] - WAV and raw PCM output (CLI only)
//!
//! ## Usage
//!
//! ### Library
//!
//! ```no_run
//! use glam::DVec3;
//! use gunshot_core::{synthesize, BallisticParameters, Geometry, SynthesisConfig};
//!
//! let ballistics = BallisticParameters::new(900.0).with_deceleration(5.0);
//! let geometry = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(50.0, 5.0, 0.0));
//! let config = SynthesisConfig::new().with_sample_rate(44_100);
//!
//! let shot = synthesize(&ballistics, &geometry, &config)?;
//! assert_eq!(shot.signal.peak(), 1.0);
//! # Ok::<(), gunshot_core::GunshotError>(())
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! gunshot rifle.json -o rifle.wav
//! gunshot rifle.json --raw | ffmpeg -f f32le -ac 1 -ar 96000 -i - rifle.flac
//! ```

pub mod error;
pub mod geometry;
pub mod params;
pub mod propagation;
pub mod render;
pub mod source;
pub mod synth;

#[cfg(feature = "cli")]
pub mod audio;

#[cfg(feature = "cli")]
pub mod logging;

// Re-export main types for convenience
pub use error::{GunshotError, RenderError, Result};
pub use params::{BallisticParameters, Geometry, Shot, ShotFile, SynthesisConfig};
pub use render::RenderedSignal;
pub use source::SourceKind;
pub use synth::{synthesize, synthesize_batch, synthesize_shot, ArrivalReport, Gunshot};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmGunshot;

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 96_000;

/// Default speed of sound in m/s
pub const DEFAULT_SPEED_OF_SOUND: f64 = 343.0;
