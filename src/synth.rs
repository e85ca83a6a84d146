//! Synthesis pipeline.
//!
//! [`synthesize`] runs the stages in order:
//!
//! 1. Validate parameters and configuration
//! 2. Resolve the scene geometry
//! 3. Emit the shock-wave (if any) and muzzle-blast events
//! 4. Propagate each event to the microphone
//! 5. Mix and normalize
//!
//! Every call is independent: no state survives between invocations, so
//! identical inputs give identical output.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::geometry::{resolve, ResolvedGeometry};
use crate::params::{
    validate_ballistics, validate_config, BallisticParameters, Geometry, Shot, SynthesisConfig,
};
use crate::propagation::{Arrival, PropagationModel};
use crate::render::{peak_of, to_output, Mixer, RenderedSignal};
use crate::source::{MuzzleBlastModel, ShockWaveModel, SourceKind};

/// Summary of one source as heard at the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrivalReport {
    pub kind: SourceKind,
    /// Shot-clock time at which the waveform onset reaches the microphone (s)
    pub arrival_time: f64,
    /// Time of the first output sample covering this source (s)
    pub start_time: f64,
    /// Source-to-microphone distance (m)
    pub distance: f64,
    /// Peak pressure at the microphone before normalization (Pa)
    pub peak_pressure: f64,
}

impl ArrivalReport {
    fn from_arrival(arrival: &Arrival, sample_rate: u32) -> Self {
        Self {
            kind: arrival.kind,
            arrival_time: arrival.arrival_time,
            start_time: arrival.start_index as f64 / sample_rate as f64,
            distance: arrival.distance,
            peak_pressure: arrival.peak_pressure,
        }
    }
}

/// A rendered gunshot.
#[derive(Debug, Clone)]
pub struct Gunshot {
    /// Normalized mix of every source
    pub signal: RenderedSignal,
    /// Shock-wave component, sharing one gain with `blast_track`
    pub shock_track: RenderedSignal,
    /// Muzzle-blast component, sharing one gain with `shock_track`
    pub blast_track: RenderedSignal,
    /// Ratio of the track gain to the mix gain, at most 1.
    ///
    /// The tracks are scaled by the largest of the mix, shock and blast
    /// peaks so neither leaves [-1, 1] when the sources partly cancel in the
    /// mix. `shock_track + blast_track == signal * track_scale`.
    pub track_scale: f64,
    /// One entry per source that reached the microphone, in emission order
    pub arrivals: Vec<ArrivalReport>,
}

impl Gunshot {
    /// Report for the given source, if it reached the microphone.
    pub fn arrival(&self, kind: SourceKind) -> Option<&ArrivalReport> {
        self.arrivals.iter().find(|a| a.kind == kind)
    }

    pub fn has_shock(&self) -> bool {
        self.arrival(SourceKind::Shock).is_some()
    }

    pub fn sample_rate(&self) -> u32 {
        self.signal.sample_rate
    }
}

/// Synthesize the anechoic recording of one shot.
pub fn synthesize(
    ballistics: &BallisticParameters,
    geometry: &Geometry,
    config: &SynthesisConfig,
) -> Result<Gunshot> {
    validate_ballistics(ballistics)?;
    validate_config(config)?;

    let resolved = resolve(geometry, ballistics, config.speed_of_sound)?;
    let arrivals = propagate_sources(ballistics, &resolved, geometry, config)?;

    let mixer = Mixer::for_window(config.window, config.sample_rate)?;
    let buffers = mixer.mix(&arrivals)?;

    let peak = peak_of(&buffers.mix);
    let track_peak = [&buffers.mix, &buffers.shock, &buffers.blast]
        .into_iter()
        .filter_map(|track| peak_of(track))
        .reduce(f64::max);
    let track_scale = match (peak, track_peak) {
        (Some(mix), Some(tracks)) => mix / tracks,
        _ => 1.0,
    };

    let fs = config.sample_rate;
    let gunshot = Gunshot {
        signal: RenderedSignal::new(fs, to_output(&buffers.mix, peak)),
        shock_track: RenderedSignal::new(fs, to_output(&buffers.shock, track_peak)),
        blast_track: RenderedSignal::new(fs, to_output(&buffers.blast, track_peak)),
        track_scale,
        arrivals: arrivals
            .iter()
            .map(|a| ArrivalReport::from_arrival(a, fs))
            .collect(),
    };

    info!(
        samples = gunshot.signal.samples.len(),
        duration_ms = gunshot.signal.duration() * 1e3,
        shock = gunshot.has_shock(),
        peak_pa = ?peak,
        "Rendered gunshot"
    );

    Ok(gunshot)
}

/// Synthesize a [`Shot`] with the given configuration.
pub fn synthesize_shot(shot: &Shot, config: &SynthesisConfig) -> Result<Gunshot> {
    synthesize(&shot.ballistics, &shot.geometry, config)
}

/// Synthesize many independent shots with one configuration.
///
/// Results are returned in input order; a failing shot does not affect the
/// others. With the `parallel` feature the shots are rendered on the rayon
/// thread pool.
pub fn synthesize_batch(shots: &[Shot], config: &SynthesisConfig) -> Vec<Result<Gunshot>> {
    #[cfg(feature = "parallel")]
    let results: Vec<Result<Gunshot>> = {
        use rayon::prelude::*;
        shots
            .par_iter()
            .map(|shot| synthesize_shot(shot, config))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<Gunshot>> = shots
        .iter()
        .map(|shot| synthesize_shot(shot, config))
        .collect();

    for (index, result) in results.iter().enumerate() {
        if let Err(e) = result {
            warn!(index, error = %e, "Batch entry failed");
        }
    }

    results
}

/// Emit both sources and propagate them to the microphone.
fn propagate_sources(
    ballistics: &BallisticParameters,
    resolved: &ResolvedGeometry,
    geometry: &Geometry,
    config: &SynthesisConfig,
) -> Result<Vec<Arrival>> {
    let c = config.speed_of_sound;
    let shock = ShockWaveModel::new(ballistics.caliber_shape_factor, c).emit(resolved);
    let blast = MuzzleBlastModel::new(ballistics.propellant_energy, c).emit(resolved);

    let propagation = PropagationModel::from_config(config);
    let mic = geometry.microphone_position;

    let arrivals: Vec<Arrival> = shock
        .iter()
        .chain(std::iter::once(&blast))
        .map(|event| propagation.propagate(event, mic))
        .collect::<Result<_>>()?;

    debug!(sources = arrivals.len(), "Propagated sources");
    Ok(arrivals)
}
