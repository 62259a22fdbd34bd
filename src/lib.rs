//! Hill Climb - A side-scrolling vehicle physics arcade game
//!
//! Core modules:
//! - `sim`: Simulation (terrain streaming, vehicle physics, camera, pickups)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `appearance`: Render-facing vehicle geometry and sprite fallback

pub mod appearance;
pub mod settings;
pub mod sim;

pub use appearance::{VehicleAppearance, WheelPose};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;

    /// World pixels per displayed meter of distance
    pub const PIXELS_PER_METER: f32 = 10.0;
}

/// Absolute tilt of an orientation angle (radians) in degrees, folded to [0, 180]
///
/// Upright is 0, upside down is 180, regardless of how many turns the body made.
#[inline]
pub fn tilt_degrees(angle: f32) -> f32 {
    let deg = angle.to_degrees().rem_euclid(360.0);
    if deg > 180.0 { 360.0 - deg } else { deg }
}
