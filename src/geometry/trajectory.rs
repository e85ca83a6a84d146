//! Straight-line bullet trajectory with constant deceleration.

use glam::DVec3;

/// Kinematic state of the bullet at a given time.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryState {
    pub position: DVec3,
    /// Distance travelled from the muzzle (m)
    pub distance: f64,
    /// Speed (m/s)
    pub speed: f64,
    pub time_s: f64,
}

/// Bullet path: `s(t) = v0·t − ½·a·t²` along a unit direction.
///
/// With a positive deceleration the bullet halts at `t = v0 / a` and stays
/// there; no part of the model moves it backwards.
#[derive(Debug, Clone, Copy)]
pub struct Trajectory {
    origin: DVec3,
    direction: DVec3,
    muzzle_velocity: f64,
    deceleration: f64,
}

impl Trajectory {
    /// Create a trajectory. `direction` must already be normalized.
    pub fn new(origin: DVec3, direction: DVec3, muzzle_velocity: f64, deceleration: f64) -> Self {
        debug_assert!((direction.length() - 1.0).abs() < 1e-9);
        Self {
            origin,
            direction,
            muzzle_velocity,
            deceleration,
        }
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    pub fn muzzle_velocity(&self) -> f64 {
        self.muzzle_velocity
    }

    /// Time at which the bullet stops, if it ever does.
    pub fn halt_time(&self) -> Option<f64> {
        (self.deceleration > 0.0).then(|| self.muzzle_velocity / self.deceleration)
    }

    /// Total distance the bullet covers, if bounded.
    pub fn max_range(&self) -> Option<f64> {
        (self.deceleration > 0.0)
            .then(|| self.muzzle_velocity * self.muzzle_velocity / (2.0 * self.deceleration))
    }

    /// Bullet speed at time `t` (clamped to zero once halted).
    pub fn speed_at(&self, t: f64) -> f64 {
        (self.muzzle_velocity - self.deceleration * t.max(0.0)).max(0.0)
    }

    /// Distance from the muzzle at time `t`.
    pub fn distance_at(&self, t: f64) -> f64 {
        let t = match self.halt_time() {
            Some(halt) => t.clamp(0.0, halt),
            None => t.max(0.0),
        };
        self.muzzle_velocity * t - 0.5 * self.deceleration * t * t
    }

    /// Full kinematic state at time `t`.
    pub fn state_at(&self, t: f64) -> TrajectoryState {
        let distance = self.distance_at(t);
        TrajectoryState {
            position: self.origin + self.direction * distance,
            distance,
            speed: self.speed_at(t),
            time_s: t,
        }
    }

    /// Time at which the bullet has covered `distance`, or `None` when it
    /// halts first.
    pub fn time_at_distance(&self, distance: f64) -> Option<f64> {
        if distance <= 0.0 {
            return Some(0.0);
        }
        let v0 = self.muzzle_velocity;
        let discriminant = v0 * v0 - 2.0 * self.deceleration * distance;
        if discriminant < 0.0 {
            return None;
        }
        // Rationalized root of ½·a·t² − v0·t + s = 0, stable for a → 0
        Some(2.0 * distance / (v0 + discriminant.sqrt()))
    }

    /// Bullet speed after covering `distance` (zero if it never gets there).
    pub fn speed_at_distance(&self, distance: f64) -> f64 {
        let v0 = self.muzzle_velocity;
        (v0 * v0 - 2.0 * self.deceleration * distance.max(0.0)).max(0.0).sqrt()
    }

    /// Last instant at which the bullet is faster than `speed_of_sound`.
    ///
    /// `None` means the bullet never drops below it (no deceleration), and
    /// `Some(0.0)` that it is never supersonic.
    pub fn supersonic_until(&self, speed_of_sound: f64) -> Option<f64> {
        if self.muzzle_velocity <= speed_of_sound {
            return Some(0.0);
        }
        (self.deceleration > 0.0)
            .then(|| (self.muzzle_velocity - speed_of_sound) / self.deceleration)
    }
}
