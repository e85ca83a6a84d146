//! Acoustic source models.
//!
//! Both physical sources of a gunshot are reduced to an [`AcousticEvent`]:
//! a waveform emitted from a point at a given time. Waveform amplitudes are
//! pressures (Pa) referenced to 1 m from the source; the propagation engine
//! applies spreading loss and delay uniformly to every event.
//!
//! - [`shock`] - Ballistic N-wave radiated by the supersonic bullet
//! - [`blast`] - Friedlander muzzle blast radiated from the muzzle

pub mod blast;
pub mod shock;

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

pub use blast::{FriedlanderWave, MuzzleBlastModel};
pub use shock::{NWave, ShockWaveModel};

/// Ambient pressure in Pa.
pub const AMBIENT_PRESSURE: f64 = 101.0e3;

/// Which physical mechanism produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Ballistic shock wave ("crack")
    Shock,
    /// Muzzle blast ("bang")
    Blast,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Shock => write!(f, "shock"),
            SourceKind::Blast => write!(f, "blast"),
        }
    }
}

/// Closed-form source waveform, evaluated in local time `t ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceWaveform {
    NWave(NWave),
    Friedlander(FriedlanderWave),
}

impl SourceWaveform {
    /// Pressure at local time `t` (Pa at 1 m). Zero outside `[0, duration]`.
    pub fn value_at(&self, t: f64) -> f64 {
        match self {
            SourceWaveform::NWave(w) => w.value_at(t),
            SourceWaveform::Friedlander(w) => w.value_at(t),
        }
    }

    /// Length of the non-zero part of the waveform (s).
    pub fn duration(&self) -> f64 {
        match self {
            SourceWaveform::NWave(w) => w.duration,
            SourceWaveform::Friedlander(w) => w.duration(),
        }
    }

    /// Peak absolute pressure (Pa at 1 m).
    pub fn peak(&self) -> f64 {
        match self {
            SourceWaveform::NWave(w) => w.peak,
            SourceWaveform::Friedlander(w) => w.peak,
        }
    }
}

/// A waveform emitted from a point in space at a point in time.
#[derive(Debug, Clone, Copy)]
pub struct AcousticEvent {
    pub kind: SourceKind,
    /// Emission point
    pub position: DVec3,
    /// Shot-clock time of local waveform time zero (s)
    pub emission_time: f64,
    pub waveform: SourceWaveform,
}
