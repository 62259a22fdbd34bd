//! Procedural hill height field
//!
//! Elevation is a sum of sine waves whose amplitude grows with distance,
//! giving a difficulty ramp that levels off at a cap. The function is pure,
//! so the terrain stream, spawners and tests can all sample it independently.

use serde::{Deserialize, Serialize};

/// One sinusoidal component of the terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// Spatial frequency (radians per pixel)
    pub frequency: f32,
    /// Amplitude at zero difficulty (pixels)
    pub amplitude: f32,
}

impl Wave {
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }
}

/// Deterministic terrain elevation function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightField {
    /// Mean ground elevation (screen y, larger is lower)
    pub base_elevation: f32,
    pub waves: [Wave; 3],
    /// Distance over which difficulty grows by 1.0
    pub difficulty_distance: f32,
    pub difficulty_cap: f32,
}

impl Default for HeightField {
    fn default() -> Self {
        Self {
            base_elevation: 400.0,
            waves: [
                Wave::new(0.01, 50.0),
                Wave::new(0.03, 25.0),
                Wave::new(0.005, 100.0),
            ],
            difficulty_distance: 5000.0,
            difficulty_cap: 2.0,
        }
    }
}

impl HeightField {
    /// Roughness multiplier minus one at `x`, clamped to `[0, difficulty_cap]`
    #[inline]
    pub fn difficulty(&self, x: f32) -> f32 {
        (x / self.difficulty_distance).clamp(0.0, self.difficulty_cap)
    }

    /// Terrain elevation at horizontal coordinate `x`
    pub fn height(&self, x: f32) -> f32 {
        let scale = 1.0 + self.difficulty(x);
        self.base_elevation
            + self
                .waves
                .iter()
                .map(|w| (x * w.frequency).sin() * w.amplitude * scale)
                .sum::<f32>()
    }
}
