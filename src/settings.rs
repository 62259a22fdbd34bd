//! Game settings and tuning
//!
//! Every balance constant lives here so a run can be re-tuned from a JSON file
//! without touching the simulation. Defaults reproduce the classic feel.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::HeightField;

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

/// Terrain generation and streaming window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Elevation function sampled by the stream
    pub height_field: HeightField,
    /// Horizontal spacing between samples
    pub segment_width: f32,
    /// First grid index sampled at startup (inclusive)
    pub initial_first: i64,
    /// Last grid index sampled at startup (exclusive)
    pub initial_last: i64,
    /// Extra terrain kept ahead of the right viewport edge
    pub lookahead_margin: f32,
    /// Terrain kept behind the camera before eviction
    pub trailing_margin: f32,
    /// Elevation reported for queries outside the window
    pub fallback_height: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            height_field: HeightField::default(),
            segment_width: 20.0,
            initial_first: -50,
            initial_last: 200,
            lookahead_margin: 500.0,
            trailing_margin: 500.0,
            fallback_height: 400.0,
        }
    }
}

/// Vehicle physics tuning (all rates are per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub spawn: Vec2,
    pub wheel_radius: f32,
    /// Distance between the two contact points
    pub wheel_base: f32,
    pub gravity: f32,
    /// Horizontal velocity multiplier applied every tick
    pub drag: f32,
    pub angular_damping: f32,
    pub thrust: f32,
    pub brake: f32,
    pub jump_force: f32,
    /// Extra jump impulse per unit of horizontal speed
    pub jump_speed_bonus: f32,
    pub jump_bonus_cap: f32,
    /// Angular acceleration from pitch input while airborne
    pub pitch_accel: f32,
    pub max_landing_speed: f32,
    pub max_tilt_degrees: f32,
    pub fuel_capacity: f32,
    pub fuel_per_tick: f32,
    /// Fraction of vertical speed returned on ground contact
    pub restitution: f32,
    pub landing_spin_damping: f32,
    pub suspension_stiffness: f32,
    pub suspension_decay: f32,
    pub wheel_spin_ratio: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(100.0, 300.0),
            wheel_radius: 20.0,
            wheel_base: 40.0,
            gravity: 0.5,
            drag: 0.99,
            angular_damping: 0.95,
            thrust: 0.3,
            brake: 0.2,
            jump_force: 12.0,
            jump_speed_bonus: 0.5,
            jump_bonus_cap: 5.0,
            pitch_accel: 0.005,
            max_landing_speed: 15.0,
            max_tilt_degrees: 75.0,
            fuel_capacity: 100.0,
            fuel_per_tick: 0.05,
            restitution: 0.3,
            landing_spin_damping: 0.5,
            suspension_stiffness: 0.3,
            suspension_decay: 0.8,
            wheel_spin_ratio: 0.1,
        }
    }
}

/// Camera follow and shake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Fraction of the remaining distance covered per tick
    pub follow: f32,
    /// How far left of the target the viewport origin sits
    pub horizontal_offset: f32,
    pub crash_shake_amount: f32,
    pub crash_shake_ticks: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            follow: 0.1,
            horizontal_offset: 200.0,
            crash_shake_amount: 15.0,
            crash_shake_ticks: 30,
        }
    }
}

/// Collectibles, spawning and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupSettings {
    pub coin_radius: f32,
    pub fuel_radius: f32,
    pub landmark_radius: f32,
    pub refuel_amount: f32,
    pub coin_score: u64,
    pub initial_coins: u32,
    pub initial_coin_range: (f32, f32),
    pub initial_fuel_cans: u32,
    pub initial_fuel_range: (f32, f32),
    /// Height above ground for seeded coins
    pub coin_height: f32,
    /// Height above ground for seeded fuel cans
    pub fuel_height: f32,
    /// Height above ground for periodically spawned items
    pub spawn_height: f32,
    pub spawn_interval_ticks: u32,
    /// Spawn distance beyond the right viewport edge
    pub spawn_ahead: (f32, f32),
    pub coin_chance: f64,
    pub milestone_meters: u64,
    pub milestone_banner_ticks: u32,
    pub landmark_lead: f32,
    pub landmark_height: f32,
}

impl Default for PickupSettings {
    fn default() -> Self {
        Self {
            coin_radius: 30.0,
            fuel_radius: 40.0,
            landmark_radius: 40.0,
            refuel_amount: 30.0,
            coin_score: 10,
            initial_coins: 10,
            initial_coin_range: (200.0, 5000.0),
            initial_fuel_cans: 5,
            initial_fuel_range: (300.0, 5000.0),
            coin_height: 50.0,
            fuel_height: 40.0,
            spawn_height: 50.0,
            spawn_interval_ticks: 60,
            spawn_ahead: (100.0, 500.0),
            coin_chance: 0.7,
            milestone_meters: 100,
            milestone_banner_ticks: 180,
            landmark_lead: 100.0,
            landmark_height: 30.0,
        }
    }
}

/// Complete game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for pickup placement and camera shake
    pub seed: u64,
    /// Optional vehicle sprite; missing files fall back to primitive shapes
    pub sprite_path: Option<PathBuf>,
    /// Edge length the sprite is scaled to
    pub sprite_size: f32,
    pub viewport: ViewportSettings,
    pub terrain: TerrainSettings,
    pub vehicle: VehicleTuning,
    pub camera: CameraSettings,
    pub pickups: PickupSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            sprite_path: None,
            sprite_size: 80.0,
            viewport: ViewportSettings::default(),
            terrain: TerrainSettings::default(),
            vehicle: VehicleTuning::default(),
            camera: CameraSettings::default(),
            pickups: PickupSettings::default(),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Validation(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to access `{}`: {source}", path.display())
            }
            Self::Parse {
                path: Some(path),
                source,
            } => write!(f, "failed to parse `{}`: {source}", path.display()),
            Self::Parse { path: None, source } => write!(f, "invalid settings JSON: {source}"),
            Self::Validation(message) => write!(f, "{message}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|source| SettingsError::Parse { path: None, source })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self)
            .map_err(|source| SettingsError::Parse { path: None, source })
    }

    /// Read and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        settings.validate()?;
        log::info!("Loaded settings from `{}`", path.display());
        Ok(settings)
    }

    /// Load a settings file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(error) => {
                log::warn!("Using default settings: {error}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to `{}`", path.display());
        Ok(())
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |message: String| Err(SettingsError::Validation(message));

        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }

        let terrain = &self.terrain;
        if terrain.segment_width <= 0.0 {
            return invalid(format!(
                "terrain.segment_width must be positive, got {}",
                terrain.segment_width
            ));
        }
        if terrain.initial_last - terrain.initial_first < 2 {
            return invalid(format!(
                "terrain initial range {}..{} must hold at least two samples",
                terrain.initial_first, terrain.initial_last
            ));
        }
        if terrain.lookahead_margin < 0.0 || terrain.trailing_margin < 0.0 {
            return invalid("terrain margins must not be negative".to_string());
        }
        if terrain.height_field.difficulty_distance <= 0.0 {
            return invalid(format!(
                "terrain.height_field.difficulty_distance must be positive, got {}",
                terrain.height_field.difficulty_distance
            ));
        }

        let vehicle = &self.vehicle;
        for (name, value) in [
            ("vehicle.drag", vehicle.drag),
            ("vehicle.angular_damping", vehicle.angular_damping),
            ("vehicle.landing_spin_damping", vehicle.landing_spin_damping),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return invalid(format!("{name} must be in (0, 1], got {value}"));
            }
        }
        if !(0.0..1.0).contains(&vehicle.suspension_decay) {
            return invalid(format!(
                "vehicle.suspension_decay must be in [0, 1), got {}",
                vehicle.suspension_decay
            ));
        }
        if vehicle.wheel_base <= 0.0 || vehicle.wheel_radius <= 0.0 {
            return invalid("vehicle wheel geometry must be positive".to_string());
        }
        if vehicle.fuel_capacity <= 0.0 || vehicle.fuel_per_tick < 0.0 {
            return invalid("vehicle fuel capacity must be positive and burn non-negative".to_string());
        }

        if !(self.camera.follow > 0.0 && self.camera.follow <= 1.0) {
            return invalid(format!(
                "camera.follow must be in (0, 1], got {}",
                self.camera.follow
            ));
        }

        let pickups = &self.pickups;
        if !(0.0..=1.0).contains(&pickups.coin_chance) {
            return invalid(format!(
                "pickups.coin_chance must be a probability, got {}",
                pickups.coin_chance
            ));
        }
        for (name, (lo, hi)) in [
            ("pickups.initial_coin_range", pickups.initial_coin_range),
            ("pickups.initial_fuel_range", pickups.initial_fuel_range),
            ("pickups.spawn_ahead", pickups.spawn_ahead),
        ] {
            if !(lo.is_finite() && hi.is_finite()) {
                return invalid(format!("{name} must be finite, got ({lo}, {hi})"));
            }
            if lo > hi {
                return invalid(format!("{name} is empty: {lo} > {hi}"));
            }
        }
        if pickups.milestone_meters == 0 {
            return invalid("pickups.milestone_meters must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.seed = 99;
        settings.vehicle.gravity = 0.6;
        let json = settings.to_json().unwrap();
        let parsed = Settings::from_json(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let parsed = Settings::from_json(r#"{ "vehicle": { "thrust": 0.5 } }"#).unwrap();
        assert_eq!(parsed.vehicle.thrust, 0.5);
        assert_eq!(parsed.vehicle.gravity, VehicleTuning::default().gravity);
        assert_eq!(parsed.terrain, TerrainSettings::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Settings::from_json(r#"{ "vehicle": { "drag": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Validation(_)));

        let err = Settings::from_json(r#"{ "terrain": { "segment_width": 0.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("segment_width"));

        let err = Settings::from_json(r#"{ "terrain": { "initial_first": 0, "initial_last": 1 } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Validation(_)));

        let mut settings = Settings::default();
        settings.pickups.spawn_ahead = (f32::NAN, 500.0);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("spawn_ahead"));
        settings.pickups.spawn_ahead = (500.0, 100.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse { path: None, .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("definitely/not/here/settings.json");
        assert!(matches!(
            Settings::load(path),
            Err(SettingsError::Io { .. })
        ));
        assert_eq!(Settings::load_or_default(path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("hill_climb_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.camera.follow = 0.25;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
