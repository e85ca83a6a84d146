//! Muzzle blast.
//!
//! The propellant gases leaving the barrel drive a spherical blast wave.
//! Its pressure history is modelled with the Friedlander waveform
//!
//! ```text
//! p(t) = Pp · (1 − t/τ) · e^(−t/τ),   t ≥ 0
//! ```
//!
//! sized by the blast scaling length `ℓ`, which grows with the square root
//! of the released energy. Peak pressure follows the near-field scaling law
//! `Pp = P0 · (0.89·(ℓ/r) + 1.61·(ℓ/r)²)` evaluated at the 1 m reference
//! distance, and the positive phase lasts a fixed number of acoustic
//! transit times across `ℓ`.

use tracing::debug;

use crate::geometry::ResolvedGeometry;

use super::{AcousticEvent, SourceKind, SourceWaveform, AMBIENT_PRESSURE};

/// Scaling length (m) of the reference cartridge.
pub const REFERENCE_SCALING_LENGTH: f64 = 0.05;

/// Positive-phase duration in units of `ℓ / c`.
pub const POSITIVE_PHASE_SCALE: f64 = 5.0;

/// The waveform is evaluated for this many positive-phase durations.
pub const TAIL_FACTOR: f64 = 10.0;

/// Friedlander blast waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriedlanderWave {
    /// Peak overpressure (Pa at 1 m)
    pub peak: f64,
    /// Positive-phase duration τ (s)
    pub positive_phase: f64,
}

impl FriedlanderWave {
    pub fn new(peak: f64, positive_phase: f64) -> Self {
        Self {
            peak,
            positive_phase,
        }
    }

    /// Evaluated length of the waveform (s).
    pub fn duration(&self) -> f64 {
        TAIL_FACTOR * self.positive_phase
    }

    /// Pressure at local time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        if t < 0.0 || t > self.duration() || self.positive_phase <= 0.0 {
            return 0.0;
        }
        let x = t / self.positive_phase;
        self.peak * (1.0 - x) * (-x).exp()
    }
}

/// Muzzle blast model for one charge.
#[derive(Debug, Clone, Copy)]
pub struct MuzzleBlastModel {
    speed_of_sound: f64,
    propellant_energy: f64,
}

impl MuzzleBlastModel {
    pub fn new(propellant_energy: f64, speed_of_sound: f64) -> Self {
        Self {
            speed_of_sound,
            propellant_energy,
        }
    }

    /// Blast scaling length `ℓ` (m).
    pub fn scaling_length(&self) -> f64 {
        REFERENCE_SCALING_LENGTH * self.propellant_energy.sqrt()
    }

    /// Peak overpressure referenced to 1 m (Pa).
    pub fn peak_pressure(&self) -> f64 {
        let l = self.scaling_length();
        AMBIENT_PRESSURE * (0.89 * l + 1.61 * l * l)
    }

    /// Positive-phase duration τ (s).
    pub fn positive_phase(&self) -> f64 {
        POSITIVE_PHASE_SCALE * self.scaling_length() / self.speed_of_sound
    }

    pub fn waveform(&self) -> FriedlanderWave {
        FriedlanderWave::new(self.peak_pressure(), self.positive_phase())
    }

    /// Emit the blast event: the muzzle fires at shot-clock zero.
    pub fn emit(&self, resolved: &ResolvedGeometry) -> AcousticEvent {
        let waveform = self.waveform();
        debug!(
            scaling_length = self.scaling_length(),
            peak = waveform.peak,
            positive_phase_ms = waveform.positive_phase * 1e3,
            "Muzzle blast emitted"
        );

        AcousticEvent {
            kind: SourceKind::Blast,
            position: resolved.trajectory.origin(),
            emission_time: 0.0,
            waveform: SourceWaveform::Friedlander(waveform),
        }
    }
}
