//! Synthesis inputs: ballistics, scene geometry and rendering configuration.
//!
//! Every value that shapes a rendering is passed in explicitly through these
//! types; there is no module-level mutable state. A complete shot can be
//! described in a JSON document (see [`ShotFile`]).

mod file;
mod types;
mod validate;

pub use file::ShotFile;
pub use types::*;
pub use validate::{validate_ballistics, validate_config};
