//! Parameter validation.
//!
//! Geometry is validated by the resolver, which needs the same vector
//! arithmetic to detect degenerate scenes.

use crate::error::{GunshotError, Result};

use super::{BallisticParameters, SynthesisConfig};

fn require_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(GunshotError::parameter(name, format!("must be finite (got {value})")));
    }
    if value <= 0.0 {
        return Err(GunshotError::parameter(name, format!("must be positive (got {value})")));
    }
    Ok(())
}

/// Validate ballistic parameters.
///
/// Checks:
/// - Muzzle velocity, shape factor and propellant energy are positive
/// - Deceleration is non-negative
/// - Every value is finite
pub fn validate_ballistics(ballistics: &BallisticParameters) -> Result<()> {
    require_positive("muzzle_velocity", ballistics.muzzle_velocity)?;
    require_positive("caliber_shape_factor", ballistics.caliber_shape_factor)?;
    require_positive("propellant_energy", ballistics.propellant_energy)?;

    let deceleration = ballistics.deceleration;
    if !deceleration.is_finite() || deceleration < 0.0 {
        return Err(GunshotError::parameter(
            "deceleration",
            format!("must be finite and non-negative (got {deceleration})"),
        ));
    }

    Ok(())
}

/// Validate a synthesis configuration.
pub fn validate_config(config: &SynthesisConfig) -> Result<()> {
    if config.sample_rate == 0 {
        return Err(GunshotError::parameter("sample_rate", "must be positive"));
    }
    require_positive("speed_of_sound", config.speed_of_sound)?;
    if let Some(window) = config.window {
        require_positive("window", window)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_inputs() {
        let ballistics = BallisticParameters::new(900.0).with_deceleration(5.0);
        assert!(validate_ballistics(&ballistics).is_ok());
        assert!(validate_config(&SynthesisConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let cases = [
            BallisticParameters::new(0.0),
            BallisticParameters::new(-10.0),
            BallisticParameters::new(900.0).with_caliber_shape_factor(0.0),
            BallisticParameters::new(900.0).with_propellant_energy(-1.0),
            BallisticParameters::new(900.0).with_deceleration(-0.5),
            BallisticParameters::new(f64::NAN),
            BallisticParameters::new(900.0).with_deceleration(f64::INFINITY),
        ];
        for ballistics in cases {
            let err = validate_ballistics(&ballistics).unwrap_err();
            assert!(matches!(err, GunshotError::Parameter { .. }), "{ballistics:?}");
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let zero_rate = SynthesisConfig::new().with_sample_rate(0);
        assert!(matches!(
            validate_config(&zero_rate),
            Err(GunshotError::Parameter { ref name, .. }) if name == "sample_rate"
        ));

        let no_sound = SynthesisConfig::new().with_speed_of_sound(0.0);
        assert!(validate_config(&no_sound).is_err());

        let empty_window = SynthesisConfig::new().with_window(0.0);
        assert!(validate_config(&empty_window).is_err());
    }
}
