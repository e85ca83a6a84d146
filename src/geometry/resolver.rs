//! Reduce a scene to closest-approach and muzzle-path quantities.

use glam::DVec3;
use tracing::debug;

use crate::error::{GunshotError, Result};
use crate::params::{BallisticParameters, Geometry};

use super::{Trajectory, COINCIDENCE_TOLERANCE};

/// Where the bullet passes nearest to the microphone.
#[derive(Debug, Clone, Copy)]
pub struct ClosestApproach {
    /// Closest point of the trajectory ray to the microphone
    pub point: DVec3,
    /// Perpendicular distance from the trajectory to the microphone (m).
    /// Equals the muzzle distance when the microphone is behind the gun.
    pub miss_distance: f64,
    /// Path length from the muzzle to the closest point (m, ≥ 0)
    pub along_track: f64,
    /// When the bullet reaches the closest point; `None` if it halts first
    pub time: Option<f64>,
    /// Bullet speed at the closest point (0 if never reached)
    pub speed: f64,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedGeometry {
    pub trajectory: Trajectory,
    pub closest_approach: ClosestApproach,
    /// Signed projection of the muzzle→microphone vector onto the bore axis
    pub projected_distance: f64,
    /// Straight-line muzzle-to-microphone distance (m)
    pub muzzle_distance: f64,
    /// Acoustic travel time over `muzzle_distance` (s)
    pub muzzle_travel_time: f64,
}

/// Resolve the scene geometry for one shot.
///
/// Fails when the microphone coincides with the gun, or when the trajectory
/// direction is zero or non-finite.
pub fn resolve(
    geometry: &Geometry,
    ballistics: &BallisticParameters,
    speed_of_sound: f64,
) -> Result<ResolvedGeometry> {
    let gun = geometry.gun_position;
    let mic = geometry.microphone_position;

    if !gun.is_finite() || !mic.is_finite() {
        return Err(GunshotError::geometry("positions must be finite"));
    }

    let direction = geometry.trajectory_direction;
    if !direction.is_finite() {
        return Err(GunshotError::geometry("trajectory direction must be finite"));
    }
    let length = direction.length();
    if length <= COINCIDENCE_TOLERANCE {
        return Err(GunshotError::geometry("trajectory direction is a zero vector"));
    }
    let direction = direction / length;

    let to_mic = mic - gun;
    let muzzle_distance = to_mic.length();
    if muzzle_distance <= COINCIDENCE_TOLERANCE {
        return Err(GunshotError::geometry(format!(
            "microphone coincides with the gun at {gun}"
        )));
    }

    let trajectory = Trajectory::new(
        gun,
        direction,
        ballistics.muzzle_velocity,
        ballistics.deceleration,
    );

    let projected_distance = to_mic.dot(direction);
    // The trajectory is a ray: behind the gun the muzzle is the closest point
    let along_track = projected_distance.max(0.0);
    let point = gun + direction * along_track;
    let miss_distance = (mic - point).length();

    let time = trajectory.time_at_distance(along_track);
    let speed = match time {
        Some(_) => trajectory.speed_at_distance(along_track),
        None => 0.0,
    };

    let resolved = ResolvedGeometry {
        trajectory,
        closest_approach: ClosestApproach {
            point,
            miss_distance,
            along_track,
            time,
            speed,
        },
        projected_distance,
        muzzle_distance,
        muzzle_travel_time: muzzle_distance / speed_of_sound,
    };

    debug!(
        miss_distance,
        along_track,
        pass_time = ?time,
        pass_speed = speed,
        muzzle_distance,
        "Resolved scene geometry"
    );

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rifle() -> BallisticParameters {
        BallisticParameters::new(900.0).with_deceleration(5.0)
    }

    #[test]
    fn test_closest_approach() {
        let geometry = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(50.0, 5.0, 0.0));
        let resolved = resolve(&geometry, &rifle(), 343.0).unwrap();
        let cpa = resolved.closest_approach;

        assert_relative_eq!(cpa.point.x, 50.0, epsilon = 1e-12);
        assert_relative_eq!(cpa.miss_distance, 5.0, epsilon = 1e-12);
        assert_relative_eq!(cpa.along_track, 50.0, epsilon = 1e-12);

        let expected_speed = (900.0f64 * 900.0 - 2.0 * 5.0 * 50.0).sqrt();
        assert_relative_eq!(cpa.speed, expected_speed, epsilon = 1e-9);
        let t = cpa.time.unwrap();
        assert_relative_eq!(resolved.trajectory.distance_at(t), 50.0, epsilon = 1e-9);

        assert_relative_eq!(resolved.muzzle_distance, 2525.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(resolved.muzzle_travel_time, 2525.0f64.sqrt() / 343.0, epsilon = 1e-12);
    }

    #[test]
    fn test_direction_is_normalized() {
        let geometry = Geometry::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 10.0), DVec3::new(3.0, 0.0, 40.0));
        let resolved = resolve(&geometry, &rifle(), 343.0).unwrap();
        assert_relative_eq!(resolved.trajectory.direction().length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(resolved.closest_approach.miss_distance, 3.0, epsilon = 1e-12);
        assert_relative_eq!(resolved.closest_approach.along_track, 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_microphone_behind_gun() {
        let geometry = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(-30.0, 40.0, 0.0));
        let resolved = resolve(&geometry, &rifle(), 343.0).unwrap();
        let cpa = resolved.closest_approach;

        assert_eq!(cpa.point, DVec3::ZERO);
        assert_eq!(cpa.along_track, 0.0);
        assert_eq!(cpa.time, Some(0.0));
        assert_eq!(cpa.speed, 900.0);
        assert_relative_eq!(cpa.miss_distance, 50.0, epsilon = 1e-12);
        assert_relative_eq!(resolved.projected_distance, -30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bullet_halts_before_closest_point() {
        let ballistics = BallisticParameters::new(100.0).with_deceleration(100.0);
        let geometry = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(80.0, 1.0, 0.0));
        let cpa = resolve(&geometry, &ballistics, 343.0).unwrap().closest_approach;
        assert!(cpa.time.is_none());
        assert_eq!(cpa.speed, 0.0);
    }

    #[test]
    fn test_degenerate_geometry() {
        let coincident = Geometry::new(DVec3::ONE, DVec3::X, DVec3::ONE);
        assert!(matches!(
            resolve(&coincident, &rifle(), 343.0),
            Err(GunshotError::Geometry { .. })
        ));

        let no_direction = Geometry::new(DVec3::ZERO, DVec3::ZERO, DVec3::X);
        assert!(matches!(
            resolve(&no_direction, &rifle(), 343.0),
            Err(GunshotError::Geometry { .. })
        ));

        let nan_mic = Geometry::new(DVec3::ZERO, DVec3::X, DVec3::new(f64::NAN, 0.0, 0.0));
        assert!(resolve(&nan_mic, &rifle(), 343.0).is_err());
    }
}
