//! Mixing and normalization.
//!
//! The mixer lays every [`Arrival`] onto a shared timeline, sums them and
//! normalizes the result. It never truncates: an arrival that would start
//! before sample 0, run past a fixed window or exceed the sample limit is an
//! error.

use tracing::debug;

use crate::error::{RenderError, Result};
use crate::propagation::{checked_sample_count, Arrival, MAX_BUFFER_SAMPLES};
use crate::source::SourceKind;

/// Final anechoic output.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSignal {
    pub sample_rate: u32,
    /// Samples in [-1, 1]
    pub samples: Vec<f32>,
}

impl RenderedSignal {
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Peak absolute amplitude.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Whether every sample is zero.
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    /// Index of the first sample whose magnitude reaches `threshold`.
    pub fn onset(&self, threshold: f32) -> Option<usize> {
        self.samples.iter().position(|s| s.abs() >= threshold)
    }
}

/// Output of [`Mixer::mix`]: the summed pressure timeline plus one track
/// per source kind, all in Pa.
#[derive(Debug, Clone, Default)]
pub struct MixedBuffers {
    pub mix: Vec<f64>,
    pub shock: Vec<f64>,
    pub blast: Vec<f64>,
}

impl MixedBuffers {
    fn track_mut(&mut self, kind: SourceKind) -> &mut Vec<f64> {
        match kind {
            SourceKind::Shock => &mut self.shock,
            SourceKind::Blast => &mut self.blast,
        }
    }
}

/// Lays arrivals onto the output timeline.
#[derive(Debug, Clone, Copy)]
pub struct Mixer {
    /// Fixed output length in samples
    window: Option<usize>,
}

impl Mixer {
    /// Mixer that sizes the buffer to fit every arrival.
    pub fn new() -> Self {
        Self { window: None }
    }

    /// Mixer with a fixed output length in samples.
    pub fn with_window(samples: usize) -> Self {
        Self {
            window: Some(samples),
        }
    }

    /// Mixer for a window given in seconds, if any.
    pub fn for_window(window: Option<f64>, sample_rate: u32) -> Result<Self> {
        match window {
            Some(seconds) => {
                let samples = checked_sample_count("window", (seconds * sample_rate as f64).ceil())?;
                Ok(Self::with_window(samples))
            }
            None => Ok(Self::new()),
        }
    }

    /// Buffer length needed for `arrivals`, checking causality, window fit
    /// and the sample limit.
    pub fn buffer_len(&self, arrivals: &[Arrival]) -> Result<usize> {
        if let Some(window) = self.window {
            checked_sample_count("window", window as f64)?;
        }
        let mut required = 0usize;
        for arrival in arrivals {
            if arrival.start_index < 0 {
                return Err(RenderError::NonCausal {
                    source_kind: arrival.kind.to_string(),
                    offset: arrival.start_index,
                }
                .into());
            }
            let end = arrival.end_index();
            if end as f64 > MAX_BUFFER_SAMPLES as f64 {
                return Err(RenderError::BufferTooLarge {
                    what: arrival.kind.to_string(),
                    samples: end as f64,
                    limit: MAX_BUFFER_SAMPLES,
                }
                .into());
            }
            let end = end as usize;
            if let Some(window) = self.window {
                if end > window {
                    return Err(RenderError::WindowTooShort {
                        source_kind: arrival.kind.to_string(),
                        window,
                        end,
                    }
                    .into());
                }
            }
            required = required.max(end);
        }
        Ok(self.window.unwrap_or(required))
    }

    /// Sum all arrivals at their sample offsets.
    pub fn mix(&self, arrivals: &[Arrival]) -> Result<MixedBuffers> {
        let len = self.buffer_len(arrivals)?;
        let mut buffers = MixedBuffers {
            mix: vec![0.0; len],
            shock: vec![0.0; len],
            blast: vec![0.0; len],
        };

        for arrival in arrivals {
            let start = arrival.start_index as usize;
            let end = start + arrival.samples.len();
            for (out, &s) in buffers.mix[start..end].iter_mut().zip(&arrival.samples) {
                *out += s;
            }
            for (out, &s) in buffers.track_mut(arrival.kind)[start..end]
                .iter_mut()
                .zip(&arrival.samples)
            {
                *out += s;
            }
        }

        if let Some(index) = buffers.mix.iter().position(|s| !s.is_finite()) {
            return Err(RenderError::NonFinite { index }.into());
        }

        debug!(samples = len, arrivals = arrivals.len(), "Mixed arrivals");
        Ok(buffers)
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

/// Peak absolute value of `samples`, or `None` for an all-zero buffer.
pub fn peak_of(samples: &[f64]) -> Option<f64> {
    let peak = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    (peak > 0.0).then_some(peak)
}

/// Divide `samples` by `peak` (if any) and convert to `f32`.
///
/// `peak` must be at least the largest magnitude in `samples`; the result
/// then stays within [-1, 1] without clamping. `x / x` is exactly 1.0, so
/// the peak sample lands on ±1.0.
pub fn to_output(samples: &[f64], peak: Option<f64>) -> Vec<f32> {
    match peak {
        Some(peak) => samples.iter().map(|&s| (s / peak) as f32).collect(),
        None => samples.iter().map(|&s| s as f32).collect(),
    }
}

/// Normalize a pressure buffer into a [`RenderedSignal`].
pub fn normalize(samples: &[f64], sample_rate: u32) -> RenderedSignal {
    RenderedSignal::new(sample_rate, to_output(samples, peak_of(samples)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GunshotError;

    fn arrival(kind: SourceKind, start_index: i64, samples: Vec<f64>) -> Arrival {
        Arrival {
            kind,
            distance: 1.0,
            gain: 1.0,
            arrival_time: 0.0,
            start_index,
            samples,
            peak_pressure: 1.0,
            cutoff_hz: None,
        }
    }

    #[test]
    fn test_mix_at_offsets() {
        let arrivals = vec![
            arrival(SourceKind::Shock, 2, vec![1.0, -1.0]),
            arrival(SourceKind::Blast, 3, vec![0.5, 0.25, 0.125]),
        ];
        let buffers = Mixer::new().mix(&arrivals).unwrap();
        assert_eq!(buffers.mix, vec![0.0, 0.0, 1.0, -0.5, 0.25, 0.125]);
        assert_eq!(buffers.shock, vec![0.0, 0.0, 1.0, -1.0, 0.0, 0.0]);
        assert_eq!(buffers.blast, vec![0.0, 0.0, 0.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_non_causal_arrival_is_rejected() {
        let arrivals = vec![arrival(SourceKind::Shock, -1, vec![1.0])];
        let err = Mixer::new().mix(&arrivals).unwrap_err();
        assert!(matches!(
            err,
            GunshotError::Render(RenderError::NonCausal { offset: -1, .. })
        ));
    }

    #[test]
    fn test_fixed_window() {
        let arrivals = vec![arrival(SourceKind::Blast, 1, vec![1.0, 2.0])];
        let buffers = Mixer::with_window(8).mix(&arrivals).unwrap();
        assert_eq!(buffers.mix.len(), 8);

        let err = Mixer::with_window(2).mix(&arrivals).unwrap_err();
        assert!(matches!(
            err,
            GunshotError::Render(RenderError::WindowTooShort { window: 2, end: 3, .. })
        ));
    }

    #[test]
    fn test_window_in_seconds() {
        let mixer = Mixer::for_window(Some(0.5), 1_000).unwrap();
        let buffers = mixer.mix(&[]).unwrap();
        assert_eq!(buffers.mix.len(), 500);
        let unbounded = Mixer::for_window(None, 1_000).unwrap();
        assert!(unbounded.mix(&[]).unwrap().mix.is_empty());
    }

    #[test]
    fn test_oversized_buffers_are_rejected() {
        let err = Mixer::for_window(Some(1e15), 96_000).unwrap_err();
        assert!(matches!(
            err,
            GunshotError::Render(RenderError::BufferTooLarge { .. })
        ));

        let err = Mixer::with_window(usize::MAX).mix(&[]).unwrap_err();
        assert!(matches!(
            err,
            GunshotError::Render(RenderError::BufferTooLarge { .. })
        ));

        let far = arrival(SourceKind::Blast, MAX_BUFFER_SAMPLES as i64, vec![1.0]);
        let err = Mixer::new().mix(&[far]).unwrap_err();
        assert!(matches!(
            err,
            GunshotError::Render(RenderError::BufferTooLarge { .. })
        ));
    }

    #[test]
    fn test_to_output_with_shared_peak() {
        // Components scaled by the largest peak stay within range
        let shock = [0.0, 2.0, -2.0];
        let blast = [0.0, -1.5, 1.0];
        let out = to_output(&shock, Some(2.0));
        assert_eq!(out, vec![0.0, 1.0, -1.0]);
        let out = to_output(&blast, Some(2.0));
        assert_eq!(out, vec![0.0, -0.75, 0.5]);
    }

    #[test]
    fn test_non_finite_sum_is_rejected() {
        let arrivals = vec![arrival(SourceKind::Blast, 0, vec![0.0, f64::NAN])];
        let err = Mixer::new().mix(&arrivals).unwrap_err();
        assert!(matches!(err, GunshotError::Render(RenderError::NonFinite { index: 1 })));
    }

    #[test]
    fn test_normalize_peak_is_exactly_one() {
        let signal = normalize(&[0.0, 3.7e-3, -1.234e-2, 5.0e-3], 48_000);
        assert_eq!(signal.peak(), 1.0);
        assert_eq!(signal.samples[2], -1.0);
        assert!(signal.samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_normalize_silence_is_untouched() {
        let signal = normalize(&[0.0; 16], 48_000);
        assert!(signal.is_silent());
        assert_eq!(signal.peak(), 0.0);
        assert_eq!(signal.samples.len(), 16);
    }

    #[test]
    fn test_signal_helpers() {
        let signal = RenderedSignal::new(4, vec![0.0, 0.1, -0.8, 1.0]);
        assert_eq!(signal.duration(), 1.0);
        assert_eq!(signal.onset(0.5), Some(2));
        assert_eq!(signal.onset(2.0), None);
    }
}
