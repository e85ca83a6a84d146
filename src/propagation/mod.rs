//! Propagation and retardation.
//!
//! Turns an [`AcousticEvent`] into the signal the microphone records:
//!
//! 1. Delay by the acoustic travel time: `arrival = emission + r / c`
//! 2. Spherical spreading: `gain = 1 / max(r, ε)`
//! 3. Optional air absorption (see [`absorption`])
//!
//! The waveform is sampled directly on the output grid at its fractional
//! arrival time, each sample averaging the waveform over one sample period.

pub mod absorption;

use glam::DVec3;
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::params::SynthesisConfig;
use crate::source::{AcousticEvent, SourceKind, SourceWaveform};

pub use absorption::{cutoff_for_distance, OnePoleLowPass};

/// Distances below this (m) are clamped for spreading loss.
pub const MIN_PROPAGATION_DISTANCE: f64 = 1.0e-3;

/// Sub-sample evaluations averaged into each output sample.
pub const SUBSAMPLES: usize = 8;

/// Longest buffer, in samples, that any stage will allocate.
pub const MAX_BUFFER_SAMPLES: usize = 1 << 26;

/// Convert a sample count computed in `f64` to `usize`, rejecting counts
/// that are not finite or exceed [`MAX_BUFFER_SAMPLES`].
pub fn checked_sample_count(what: &str, samples: f64) -> Result<usize> {
    if !(samples.is_finite() && samples <= MAX_BUFFER_SAMPLES as f64) {
        return Err(RenderError::BufferTooLarge {
            what: what.to_string(),
            samples,
            limit: MAX_BUFFER_SAMPLES,
        }
        .into());
    }
    Ok(samples.max(0.0) as usize)
}

/// A source waveform as it arrives at the microphone.
#[derive(Debug, Clone)]
pub struct Arrival {
    pub kind: SourceKind,
    /// Source-to-microphone distance (m)
    pub distance: f64,
    /// Spreading gain `1 / max(r, ε)`
    pub gain: f64,
    /// Shot-clock time at which the waveform onset reaches the microphone (s)
    pub arrival_time: f64,
    /// Output sample index of `samples[0]`; negative if non-causal
    pub start_index: i64,
    /// Retarded, attenuated pressure samples (Pa)
    pub samples: Vec<f64>,
    /// Peak of the arriving waveform before air absorption (Pa)
    pub peak_pressure: f64,
    /// Air-absorption cutoff applied, if any (Hz)
    pub cutoff_hz: Option<f64>,
}

impl Arrival {
    /// One past the last output sample index covered.
    pub fn end_index(&self) -> i64 {
        self.start_index + self.samples.len() as i64
    }
}

/// Per-call propagation settings.
#[derive(Debug, Clone, Copy)]
pub struct PropagationModel {
    speed_of_sound: f64,
    sample_rate: f64,
    air_absorption: bool,
}

impl PropagationModel {
    pub fn new(speed_of_sound: f64, sample_rate: u32, air_absorption: bool) -> Self {
        Self {
            speed_of_sound,
            sample_rate: sample_rate as f64,
            air_absorption,
        }
    }

    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self::new(config.speed_of_sound, config.sample_rate, config.air_absorption)
    }

    /// Acoustic travel time over `distance` (s).
    pub fn travel_time(&self, distance: f64) -> f64 {
        distance / self.speed_of_sound
    }

    /// Spreading gain at `distance`; clamped near the source.
    pub fn spreading_gain(distance: f64) -> f64 {
        1.0 / distance.max(MIN_PROPAGATION_DISTANCE)
    }

    /// Propagate one event to the microphone.
    ///
    /// Fails when the arrival would end beyond [`MAX_BUFFER_SAMPLES`].
    pub fn propagate(&self, event: &AcousticEvent, microphone: DVec3) -> Result<Arrival> {
        let fs = self.sample_rate;
        let distance = (microphone - event.position).length();
        let gain = Self::spreading_gain(distance);
        let arrival_time = event.emission_time + self.travel_time(distance);
        let start = (arrival_time * fs).floor();

        let mut filter = if self.air_absorption {
            cutoff_for_distance(distance, fs).map(|cutoff| OnePoleLowPass::new(cutoff, fs))
        } else {
            None
        };
        let tail = filter.as_ref().map_or(0.0, OnePoleLowPass::settling_time);

        let len = ((event.waveform.duration() + tail) * fs).ceil() + 2.0;
        let what = event.kind.to_string();
        let len = checked_sample_count(&what, len)?;
        // Only the end matters here; negative starts are left to the mixer
        checked_sample_count(&what, start + len as f64)?;
        let start_index = start as i64;
        let mut samples: Vec<f64> = (0..len)
            .map(|n| {
                let t = (start_index + n as i64) as f64 / fs - arrival_time;
                gain * box_sample(&event.waveform, t, 1.0 / fs)
            })
            .collect();

        if let Some(filter) = filter.as_mut() {
            filter.process_in_place(&mut samples);
        }

        let peak_pressure = event.waveform.peak() * gain;

        debug!(
            kind = %event.kind,
            distance,
            arrival_time,
            start_index,
            peak_pressure,
            cutoff_hz = ?filter.as_ref().map(OnePoleLowPass::cutoff_hz),
            "Propagated event"
        );

        Ok(Arrival {
            kind: event.kind,
            distance,
            gain,
            arrival_time,
            start_index,
            samples,
            peak_pressure,
            cutoff_hz: filter.as_ref().map(OnePoleLowPass::cutoff_hz),
        })
    }
}

/// Mean of the waveform over `[t − dt/2, t + dt/2]`.
fn box_sample(waveform: &SourceWaveform, t: f64, dt: f64) -> f64 {
    let step = dt / SUBSAMPLES as f64;
    let start = t - dt / 2.0 + step / 2.0;
    let sum: f64 = (0..SUBSAMPLES)
        .map(|k| waveform.value_at(start + k as f64 * step))
        .sum();
    sum / SUBSAMPLES as f64
}
