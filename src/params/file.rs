//! JSON shot descriptions.
//!
//! ```json
//! {
//!   "label": "rifle-50m",
//!   "ballistics": { "muzzle_velocity": 900.0, "deceleration": 5.0 },
//!   "geometry": {
//!     "gun_position": [0.0, 0.0, 0.0],
//!     "trajectory_direction": [1.0, 0.0, 0.0],
//!     "microphone_position": [50.0, 5.0, 0.0]
//!   },
//!   "synthesis": { "sample_rate": 44100 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GunshotError, Result};

use super::{BallisticParameters, Geometry, Shot, SynthesisConfig};

/// A shot together with its optional label and rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub ballistics: BallisticParameters,
    pub geometry: Geometry,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

impl ShotFile {
    /// Parse a shot description from a JSON string.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|source| GunshotError::ConfigParse { source })
    }

    /// Serialize the shot description as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| GunshotError::ConfigParse { source })
    }

    /// Load a shot description file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GunshotError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// The ballistics and geometry of this file.
    pub fn shot(&self) -> Shot {
        Shot::new(self.ballistics, self.geometry)
    }
}
