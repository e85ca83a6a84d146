//! Ballistic shock wave (N-wave).
//!
//! A supersonic bullet drags a Mach cone whose far-field signature is the
//! N-wave: an abrupt rise to `+ΔP`, a linear fall to `−ΔP` and an abrupt
//! return to ambient. Amplitude and length follow Whitham's slender-body
//! theory:
//!
//! ```text
//! ΔP = 0.53 · P0 · σ · g · (M² − 1)^⅛ / b^¾
//! T  = 1.82 · σ · g · b^¼ / ((M² − 1)^⅜ · c)
//! g  = d_ref / l_ref^¼
//! ```
//!
//! where `b` is the miss distance and `σ` the caliber/shape factor. The rise
//! time is limited by the molecular mean free path: `τr = λ · P0 / (c · ΔP)`.
//! `ΔP` vanishes as `M → 1⁺`, so the crack fades out continuously at the
//! sonic boundary.

use tracing::debug;

use crate::geometry::ResolvedGeometry;
use crate::params::{REFERENCE_DIAMETER, REFERENCE_LENGTH};
use crate::propagation::MIN_PROPAGATION_DISTANCE;

use super::{AcousticEvent, SourceKind, SourceWaveform, AMBIENT_PRESSURE};

/// Whitham overpressure coefficient.
pub const PRESSURE_COEFFICIENT: f64 = 0.53;

/// Whitham N-wave length coefficient.
pub const LENGTH_COEFFICIENT: f64 = 1.82;

/// Molecular mean free path of air (m).
pub const MEAN_FREE_PATH: f64 = 68.0e-9;

/// Upper bound on the N-wave length (s). Only reached just above Mach 1,
/// where the amplitude is already negligible.
pub const MAX_DURATION: f64 = 10.0e-3;

/// Miss distances below this (m) are evaluated at this distance.
pub const MIN_MISS_DISTANCE: f64 = 0.01;

/// Mach number of `speed` for the given speed of sound.
pub fn mach_number(speed: f64, speed_of_sound: f64) -> f64 {
    speed / speed_of_sound
}

/// Half-angle of the Mach cone in radians, or `None` when subsonic.
pub fn cone_angle(mach: f64) -> Option<f64> {
    (mach > 1.0).then(|| (1.0 / mach).asin())
}

/// Piecewise-linear N-wave with finite rise time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NWave {
    /// Peak overpressure (Pa at 1 m)
    pub peak: f64,
    /// Total length (s)
    pub duration: f64,
    /// Rise time of each shock front (s), at most a quarter of the length
    pub rise_time: f64,
}

impl NWave {
    pub fn new(peak: f64, duration: f64, rise_time: f64) -> Self {
        let duration = duration.max(0.0);
        Self {
            peak,
            duration,
            rise_time: rise_time.clamp(0.0, duration / 4.0),
        }
    }

    /// Pressure at local time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        let (td, tr) = (self.duration, self.rise_time);
        if td <= 0.0 || t < 0.0 || t > td {
            return 0.0;
        }

        if t < tr {
            // Bow shock
            self.peak * t / tr
        } else if t <= td - tr {
            self.peak * (1.0 - 2.0 * (t - tr) / (td - 2.0 * tr))
        } else {
            // Tail shock
            self.peak * (-1.0 + (t - td + tr) / tr)
        }
    }
}

/// Whitham N-wave model for one projectile.
#[derive(Debug, Clone, Copy)]
pub struct ShockWaveModel {
    speed_of_sound: f64,
    shape_factor: f64,
}

impl ShockWaveModel {
    pub fn new(shape_factor: f64, speed_of_sound: f64) -> Self {
        Self {
            speed_of_sound,
            shape_factor,
        }
    }

    fn geometry_term(&self) -> f64 {
        self.shape_factor * REFERENCE_DIAMETER / REFERENCE_LENGTH.powf(0.25)
    }

    /// Peak overpressure (Pa) at `miss_distance`; zero unless supersonic.
    pub fn overpressure(&self, mach: f64, miss_distance: f64) -> f64 {
        if mach <= 1.0 {
            return 0.0;
        }
        let b = miss_distance.max(MIN_MISS_DISTANCE);
        PRESSURE_COEFFICIENT * AMBIENT_PRESSURE * self.geometry_term() * (mach * mach - 1.0).powf(0.125)
            / b.powf(0.75)
    }

    /// N-wave length (s) at `miss_distance`; zero unless supersonic.
    pub fn duration(&self, mach: f64, miss_distance: f64) -> f64 {
        if mach <= 1.0 {
            return 0.0;
        }
        let b = miss_distance.max(MIN_MISS_DISTANCE);
        let length = LENGTH_COEFFICIENT * self.geometry_term() * b.powf(0.25)
            / (mach * mach - 1.0).powf(0.375);
        (length / self.speed_of_sound).min(MAX_DURATION)
    }

    /// Shock-front rise time (s) for a given overpressure.
    pub fn rise_time(&self, overpressure: f64) -> f64 {
        if overpressure <= 0.0 {
            return f64::INFINITY;
        }
        MEAN_FREE_PATH * AMBIENT_PRESSURE / (self.speed_of_sound * overpressure)
    }

    /// Whether the Mach cone sweeps over the microphone.
    ///
    /// The cone reaches a point at miss distance `b` from the wavefront
    /// emitted `b / √(M² − 1)` before the closest point; that emission point
    /// must lie on the flown part of the trajectory.
    pub fn reaches(&self, mach: f64, along_track: f64, miss_distance: f64) -> bool {
        if mach <= 1.0 {
            return false;
        }
        along_track - miss_distance / (mach * mach - 1.0).sqrt() >= 0.0
    }

    /// Emit the shock-wave event for a resolved scene, or `None` when no
    /// N-wave reaches the microphone.
    ///
    /// The N-wave is centred on the closest-approach time plus the travel
    /// time from the closest point, so the event is emitted half a period
    /// before the bullet passes.
    pub fn emit(&self, resolved: &ResolvedGeometry) -> Option<AcousticEvent> {
        let cpa = &resolved.closest_approach;

        let Some(pass_time) = cpa.time else {
            debug!(
                max_range = ?resolved.trajectory.max_range(),
                "Bullet halts before the closest point, no shock wave"
            );
            return None;
        };

        let mach = mach_number(cpa.speed, self.speed_of_sound);
        if mach <= 1.0 {
            debug!(
                mach,
                supersonic_until = ?resolved.trajectory.supersonic_until(self.speed_of_sound),
                "Bullet is subsonic at closest approach, no shock wave"
            );
            return None;
        }

        if !self.reaches(mach, cpa.along_track, cpa.miss_distance) {
            debug!(
                mach,
                cone_angle_deg = ?cone_angle(mach).map(f64::to_degrees),
                "Microphone lies outside the Mach cone, no shock wave"
            );
            return None;
        }

        let overpressure = self.overpressure(mach, cpa.miss_distance);
        let duration = self.duration(mach, cpa.miss_distance);
        let rise_time = self.rise_time(overpressure);

        // Refer the amplitude to 1 m; spreading loss restores `overpressure`
        let reference_peak = overpressure * cpa.miss_distance.max(MIN_PROPAGATION_DISTANCE);
        let waveform = NWave::new(reference_peak, duration, rise_time);

        debug!(
            mach,
            overpressure,
            duration_us = duration * 1e6,
            rise_time_us = waveform.rise_time * 1e6,
            "Shock wave emitted"
        );

        Some(AcousticEvent {
            kind: SourceKind::Shock,
            position: cpa.point,
            emission_time: pass_time - duration / 2.0,
            waveform: SourceWaveform::NWave(waveform),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::resolve;
    use crate::params::{BallisticParameters, Geometry};
    use approx::assert_relative_eq;
    use glam::DVec3;

    const C: f64 = 343.0;

    fn model() -> ShockWaveModel {
        ShockWaveModel::new(1.0, C)
    }

    #[test]
    fn test_nwave_shape() {
        let wave = NWave::new(1.0, 1.0e-3, 0.1e-3);
        assert_eq!(wave.value_at(0.0), 0.0);
        assert_relative_eq!(wave.value_at(0.05e-3), 0.5, epsilon = 1e-9);
        assert_relative_eq!(wave.value_at(0.1e-3), 1.0, epsilon = 1e-9);
        assert_relative_eq!(wave.value_at(0.5e-3), 0.0, epsilon = 1e-9);
        assert_relative_eq!(wave.value_at(0.9e-3), -1.0, epsilon = 1e-9);
        assert_relative_eq!(wave.value_at(0.95e-3), -0.5, epsilon = 1e-9);
        assert_relative_eq!(wave.value_at(1.0e-3), 0.0, epsilon = 1e-9);
        assert_eq!(wave.value_at(1.1e-3), 0.0);
        assert_eq!(wave.value_at(-0.1e-3), 0.0);
    }

    #[test]
    fn test_rise_time_is_capped() {
        let wave = NWave::new(1.0, 1.0e-3, 5.0e-3);
        assert_relative_eq!(wave.rise_time, 0.25e-3);

        let instant = NWave::new(1.0, 1.0e-3, 0.0);
        assert_relative_eq!(instant.value_at(0.0), 1.0);
        assert_relative_eq!(instant.value_at(0.5e-3), 0.0, epsilon = 1e-12);
        assert!(instant.value_at(1.0e-3).is_finite());
    }

    #[test]
    fn test_sonic_boundary_is_silent() {
        let model = model();
        assert_eq!(model.overpressure(1.0, 5.0), 0.0);
        assert_eq!(model.overpressure(0.8, 5.0), 0.0);
        assert_eq!(model.duration(1.0, 5.0), 0.0);
        assert!(cone_angle(1.0).is_none());
    }

    #[test]
    fn test_amplitude_vanishes_approaching_mach_one() {
        let model = model();
        let mut previous = f64::INFINITY;
        for &mach in &[2.0, 1.5, 1.1, 1.01, 1.0001, 1.000_001] {
            let p = model.overpressure(mach, 5.0);
            assert!(p > 0.0 && p < previous, "mach {mach}: {p}");
            previous = p;
        }
        assert!(model.overpressure(1.0 + 1e-12, 5.0) < 0.04 * model.overpressure(2.0, 5.0));
    }

    #[test]
    fn test_monotonic_in_mach_and_caliber() {
        let model = model();
        assert!(model.overpressure(3.0, 5.0) > model.overpressure(2.0, 5.0));
        assert!(model.duration(3.0, 5.0) < model.duration(2.0, 5.0));

        let heavy = ShockWaveModel::new(1.5, C);
        assert!(heavy.overpressure(2.0, 5.0) > model.overpressure(2.0, 5.0));
        // Louder shocks have steeper fronts
        assert!(
            heavy.rise_time(heavy.overpressure(2.0, 5.0))
                < model.rise_time(model.overpressure(2.0, 5.0))
        );
    }

    #[test]
    fn test_miss_distance_scaling() {
        let model = model();
        let near = model.overpressure(2.5, 5.0);
        let far = model.overpressure(2.5, 10.0);
        assert_relative_eq!(far / near, 2.0f64.powf(-0.75), epsilon = 1e-12);
        assert!(model.duration(2.5, 10.0) > model.duration(2.5, 5.0));
    }

    #[test]
    fn test_reference_bullet_magnitude() {
        // 7.62 mm at Mach 2.6 passing 5 m away: a few hundred pascals
        let p = model().overpressure(2.6, 5.0);
        assert!(p > 200.0 && p < 600.0, "{p}");
        let t = model().duration(2.6, 5.0);
        assert!(t > 30e-6 && t < 200e-6, "{t}");
    }

    #[test]
    fn test_mach_cone_gate() {
        let model = model();
        // Mach 2: cone reaches b / √3 before the closest point
        assert!(model.reaches(2.0, 10.0, 5.0));
        assert!(!model.reaches(2.0, 2.0, 5.0));
        assert!(!model.reaches(2.0, 0.0, 5.0));
    }

    #[test]
    fn test_emit_event() {
        let ballistics = BallisticParameters::new(900.0).with_deceleration(5.0);
        let geometry = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(50.0, 5.0, 0.0));
        let resolved = resolve(&geometry, &ballistics, C).unwrap();
        let event = model().emit(&resolved).unwrap();

        assert_eq!(event.kind, SourceKind::Shock);
        assert_eq!(event.position, resolved.closest_approach.point);

        let pass = resolved.closest_approach.time.unwrap();
        let duration = event.waveform.duration();
        assert_relative_eq!(event.emission_time + duration / 2.0, pass, epsilon = 1e-12);

        let mach = mach_number(resolved.closest_approach.speed, C);
        assert_relative_eq!(event.waveform.peak(), model().overpressure(mach, 5.0) * 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_emit_silent_cases() {
        let geometry = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(50.0, 5.0, 0.0));

        let sonic = BallisticParameters::new(C);
        let resolved = resolve(&geometry, &sonic, C).unwrap();
        assert!(model().emit(&resolved).is_none());

        let stops = BallisticParameters::new(600.0).with_deceleration(10_000.0);
        let resolved = resolve(&geometry, &stops, C).unwrap();
        assert!(resolved.closest_approach.time.is_none());
        assert!(model().emit(&resolved).is_none());

        let behind = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(-20.0, 5.0, 0.0));
        let resolved = resolve(&behind, &BallisticParameters::new(900.0), C).unwrap();
        assert!(model().emit(&resolved).is_none());
    }
}
