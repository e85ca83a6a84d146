//! Core input types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_SAMPLE_RATE, DEFAULT_SPEED_OF_SOUND};

/// Diameter of the reference projectile (7.62 mm) in meters.
pub const REFERENCE_DIAMETER: f64 = 0.00762;

/// Length of the reference projectile in meters.
pub const REFERENCE_LENGTH: f64 = 0.0284;

/// Meters per inch, for caliber conversion.
const METERS_PER_INCH: f64 = 0.0254;

/// Convert a caliber given in inches (e.g. `0.308`) to a diameter in meters.
pub fn caliber_to_meters(caliber: f64) -> f64 {
    caliber * METERS_PER_INCH
}

fn unit() -> f64 {
    1.0
}

/// Ballistic description of a single shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallisticParameters {
    /// Projectile exit speed in m/s.
    #[serde(alias = "uexit")]
    pub muzzle_velocity: f64,
    /// Constant along-track deceleration in m/s².
    #[serde(default)]
    pub deceleration: f64,
    /// Shock strength of the projectile relative to the reference 7.62 mm bullet.
    #[serde(default = "unit")]
    pub caliber_shape_factor: f64,
    /// Propellant charge relative to the reference cartridge.
    #[serde(default = "unit")]
    pub propellant_energy: f64,
}

impl BallisticParameters {
    /// Create parameters for a reference projectile fired at `muzzle_velocity`
    /// with no deceleration.
    pub fn new(muzzle_velocity: f64) -> Self {
        Self {
            muzzle_velocity,
            deceleration: 0.0,
            caliber_shape_factor: 1.0,
            propellant_energy: 1.0,
        }
    }

    /// Set the along-track deceleration (m/s²).
    pub fn with_deceleration(mut self, deceleration: f64) -> Self {
        self.deceleration = deceleration;
        self
    }

    /// Set the caliber/shape factor.
    pub fn with_caliber_shape_factor(mut self, factor: f64) -> Self {
        self.caliber_shape_factor = factor;
        self
    }

    /// Set the relative propellant energy.
    pub fn with_propellant_energy(mut self, energy: f64) -> Self {
        self.propellant_energy = energy;
        self
    }

    /// Shape factor of a projectile with the given diameter and length (meters).
    ///
    /// The N-wave strength of a slender body scales with `d / l^¼`; the result
    /// is that ratio normalized to the reference projectile, so a 7.62 × 28.4 mm
    /// bullet yields 1.0.
    pub fn shape_factor_from_dimensions(diameter: f64, length: f64) -> f64 {
        (diameter / length.powf(0.25)) / (REFERENCE_DIAMETER / REFERENCE_LENGTH.powf(0.25))
    }
}

/// Positions and aim of the scene. Coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(alias = "xgun")]
    pub gun_position: DVec3,
    /// Barrel axis; normalized during resolution.
    #[serde(alias = "ngun")]
    pub trajectory_direction: DVec3,
    #[serde(alias = "xmic")]
    pub microphone_position: DVec3,
}

impl Geometry {
    pub fn new(gun_position: DVec3, trajectory_direction: DVec3, microphone_position: DVec3) -> Self {
        Self {
            gun_position,
            trajectory_direction,
            microphone_position,
        }
    }

    /// The same scene with gun and microphone exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            gun_position: self.microphone_position,
            trajectory_direction: self.trajectory_direction,
            microphone_position: self.gun_position,
        }
    }
}

/// Rendering configuration, passed into every synthesis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Speed of sound in m/s.
    pub speed_of_sound: f64,
    /// Apply the distance-dependent air-absorption low-pass.
    pub air_absorption: bool,
    /// Fixed output length in seconds. When unset the buffer is sized to fit
    /// every arrival.
    pub window: Option<f64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            air_absorption: true,
            window: None,
        }
    }
}

impl SynthesisConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output sample rate (Hz).
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the speed of sound (m/s).
    pub fn with_speed_of_sound(mut self, speed_of_sound: f64) -> Self {
        self.speed_of_sound = speed_of_sound;
        self
    }

    /// Enable or disable air absorption.
    pub fn with_air_absorption(mut self, enabled: bool) -> Self {
        self.air_absorption = enabled;
        self
    }

    /// Render into a fixed window of `seconds`.
    pub fn with_window(mut self, seconds: f64) -> Self {
        self.window = Some(seconds);
        self
    }
}

/// One gun/bullet/microphone configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub ballistics: BallisticParameters,
    pub geometry: Geometry,
}

impl Shot {
    pub fn new(ballistics: BallisticParameters, geometry: Geometry) -> Self {
        Self { ballistics, geometry }
    }
}
