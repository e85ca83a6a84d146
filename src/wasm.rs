//! WASM bindings for Gunshot Core.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmGunshot } from 'gunshot_core';
//!
//! await init();
//!
//! const shot = new WasmGunshot(JSON.stringify({
//!   ballistics: { muzzle_velocity: 900, deceleration: 5 },
//!   geometry: {
//!     gun_position: [0, 0, 0],
//!     trajectory_direction: [1, 0, 0],
//!     microphone_position: [50, 5, 0],
//!   },
//!   synthesis: { sample_rate: 48000 },
//! }));
//!
//! const buffer = audioCtx.createBuffer(1, shot.length, shot.sample_rate);
//! buffer.copyToChannel(shot.samples(), 0);
//! ```

use wasm_bindgen::prelude::*;

use crate::params::ShotFile;
use crate::source::SourceKind;
use crate::synth::{synthesize, Gunshot};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A gunshot rendered from a JSON shot description.
#[wasm_bindgen]
pub struct WasmGunshot {
    gunshot: Gunshot,
}

#[wasm_bindgen]
impl WasmGunshot {
    /// Render the shot described by `shot_json`.
    ///
    /// The JSON layout matches the CLI's shot files; the `synthesis` section
    /// is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(shot_json: &str) -> Result<WasmGunshot, JsValue> {
        let file = ShotFile::from_json(shot_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let gunshot = synthesize(&file.ballistics, &file.geometry, &file.synthesis)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGunshot { gunshot })
    }

    /// Normalized mix as a new Float32Array.
    #[wasm_bindgen]
    pub fn samples(&self) -> Vec<f32> {
        self.gunshot.signal.samples.clone()
    }

    /// Shock-wave component, scaled like the mix.
    #[wasm_bindgen]
    pub fn shock_samples(&self) -> Vec<f32> {
        self.gunshot.shock_track.samples.clone()
    }

    /// Muzzle-blast component, scaled like the mix.
    #[wasm_bindgen]
    pub fn blast_samples(&self) -> Vec<f32> {
        self.gunshot.blast_track.samples.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn sample_rate(&self) -> u32 {
        self.gunshot.sample_rate()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.gunshot.signal.samples.len()
    }

    /// Shock-wave arrival time in seconds, or `undefined` if there is none.
    #[wasm_bindgen]
    pub fn shock_arrival(&self) -> Option<f64> {
        self.gunshot
            .arrival(SourceKind::Shock)
            .map(|a| a.arrival_time)
    }

    /// Muzzle-blast arrival time in seconds.
    #[wasm_bindgen]
    pub fn blast_arrival(&self) -> Option<f64> {
        self.gunshot
            .arrival(SourceKind::Blast)
            .map(|a| a.arrival_time)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default sample rate.
#[wasm_bindgen]
pub fn default_sample_rate() -> u32 {
    crate::DEFAULT_SAMPLE_RATE
}
