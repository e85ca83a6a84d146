//! Air absorption.
//!
//! High frequencies are absorbed faster than low ones, so a distant shot
//! sounds duller. The effect is approximated by a one-pole low-pass whose
//! cutoff falls inversely with distance:
//!
//! ```text
//! f_c = K / r          clamped to [MIN_CUTOFF, 0.45 · fs]
//! y[n] = α·x[n] + (1 − α)·y[n−1],   α = 1 − e^(−2π·f_c/fs)
//! ```

use std::f64::consts::PI;

use super::MIN_PROPAGATION_DISTANCE;

/// Cutoff-distance product `K` (Hz·m): 20 kHz at 50 m.
pub const ABSORPTION_CONSTANT: f64 = 1.0e6;

/// Lowest cutoff frequency (Hz).
pub const MIN_CUTOFF: f64 = 20.0;

/// Cutoffs at or above this fraction of the sample rate leave the signal
/// untouched.
pub const MAX_CUTOFF_RATIO: f64 = 0.45;

/// The filter is considered settled after this many time constants.
pub const SETTLING_TIME_CONSTANTS: f64 = 7.0;

/// Low-pass cutoff (Hz) for a propagation distance, or `None` when the
/// cutoff is above the audible band of the output.
pub fn cutoff_for_distance(distance: f64, sample_rate: f64) -> Option<f64> {
    let cutoff = (ABSORPTION_CONSTANT / distance.max(MIN_PROPAGATION_DISTANCE)).max(MIN_CUTOFF);
    (cutoff < MAX_CUTOFF_RATIO * sample_rate).then_some(cutoff)
}

/// First-order low-pass with unity DC gain, starting from rest.
#[derive(Debug, Clone)]
pub struct OnePoleLowPass {
    cutoff_hz: f64,
    alpha: f64,
    state: f64,
}

impl OnePoleLowPass {
    pub fn new(cutoff_hz: f64, sample_rate: f64) -> Self {
        let alpha = 1.0 - (-2.0 * PI * cutoff_hz / sample_rate).exp();
        Self {
            cutoff_hz,
            alpha: alpha.clamp(1e-10, 1.0),
            state: 0.0,
        }
    }

    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Time constant `1 / (2π·f_c)` in seconds.
    pub fn time_constant(&self) -> f64 {
        1.0 / (2.0 * PI * self.cutoff_hz)
    }

    /// Length of tail (s) the filter adds to a finite input.
    pub fn settling_time(&self) -> f64 {
        SETTLING_TIME_CONSTANTS * self.time_constant()
    }

    pub fn process(&mut self, x: f64) -> f64 {
        self.state += self.alpha * (x - self.state);
        self.state
    }

    pub fn process_in_place(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cutoff_falls_with_distance() {
        let fs = 96_000.0;
        assert!(cutoff_for_distance(10.0, fs).is_none());
        let at_50 = cutoff_for_distance(50.0, fs).unwrap();
        let at_100 = cutoff_for_distance(100.0, fs).unwrap();
        assert_relative_eq!(at_50, 20_000.0);
        assert!(at_100 < at_50);
        assert_eq!(cutoff_for_distance(1.0e6, fs), Some(MIN_CUTOFF));
    }

    #[test]
    fn test_unity_dc_gain() {
        let mut lpf = OnePoleLowPass::new(1_000.0, 48_000.0);
        let mut y = 0.0;
        for _ in 0..2_000 {
            y = lpf.process(1.0);
        }
        assert_relative_eq!(y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_attenuates_high_frequencies() {
        let mut lpf = OnePoleLowPass::new(1_000.0, 48_000.0);
        let mut nyquist: Vec<f64> = (0..512).map(|n| if n % 2 == 0 { 1.0 } else { -1.0 }).collect();
        lpf.process_in_place(&mut nyquist);
        let peak = nyquist[256..].iter().fold(0.0f64, |m, x| m.max(x.abs()));
        assert!(peak < 0.1, "{peak}");
    }

    #[test]
    fn test_settling_time() {
        let lpf = OnePoleLowPass::new(1_000.0, 48_000.0);
        assert_relative_eq!(lpf.time_constant(), 1.0 / (2.0 * PI * 1_000.0));
        assert_relative_eq!(lpf.settling_time(), 7.0 * lpf.time_constant());
        assert_eq!(lpf.cutoff_hz(), 1_000.0);
    }
}
