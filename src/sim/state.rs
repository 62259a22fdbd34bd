//! Game state and simulation context
//!
//! `GameState` owns every subsystem of a run. It is created from settings,
//! mutated only by `tick`, and read by whatever draws the frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::CameraRig;
use super::pickups::Pickups;
use super::terrain::TerrainStream;
use super::vehicle::{CrashCause, VehicleBody};
use crate::consts::PIXELS_PER_METER;
use crate::settings::{Settings, SettingsError};

/// Why the run is over
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameOverReason {
    Crashed(CrashCause),
    OutOfFuel,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    /// Simulation advancing every tick
    Running,
    /// Run ended; the last frame stays on screen until restart
    GameOver(GameOverReason),
}

/// Exhaust intensity, by ground speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustLevel {
    Idle,
    Cruise,
    Boost,
}

impl ExhaustLevel {
    pub fn from_speed(speed: f32) -> Self {
        if speed < 2.0 {
            ExhaustLevel::Idle
        } else if speed < 5.0 {
            ExhaustLevel::Cruise
        } else {
            ExhaustLevel::Boost
        }
    }
}

/// Things that happened during a tick, for effects, audio and HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Engine working with wheels on the ground
    Exhaust { pos: Vec2, level: ExhaustLevel },
    Landed { pos: Vec2 },
    CoinCollected { total: u32 },
    Refueled { fuel: f32 },
    LandmarkVisited,
    Milestone { meters: u64 },
    Crashed { pos: Vec2, cause: CrashCause },
    OutOfFuel,
    Restarted,
}

/// Distance behind the vehicle centre where exhaust leaves the body
const EXHAUST_OFFSET: f32 = 35.0;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub vehicle: VehicleBody,
    pub terrain: TerrainStream,
    pub camera: CameraRig,
    pub pickups: Pickups,
    /// Furthest-right distance marker, in meters
    pub distance_m: u64,
    pub coins: u32,
    pub score: u64,
    pub last_milestone: u64,
    /// Ticks left on the milestone banner
    pub milestone_ticks: u32,
    /// Events since the last `drain_events`
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run with `settings.seed`
    ///
    /// Settings that fail validation are replaced by the defaults (with a
    /// warning); use `try_new` to handle the error instead.
    pub fn new(settings: Settings) -> Self {
        match Self::try_new(settings) {
            Ok(state) => state,
            Err(error) => {
                log::warn!("Invalid settings, starting with defaults: {error}");
                Self::start(Settings::default())
            }
        }
    }

    /// Start a run, rejecting settings that would break the simulation
    pub fn try_new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::start(settings))
    }

    fn start(settings: Settings) -> Self {
        let seed = settings.seed;
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = TerrainStream::new(&settings.terrain, &settings.viewport);
        let pickups = Pickups::seeded(&settings.pickups, terrain.height_field(), &mut rng);

        log::info!("New run with seed {seed}");

        Self {
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::Running,
            vehicle: VehicleBody::spawn(&settings.vehicle),
            camera: CameraRig::new(&settings.camera, &settings.viewport, seed.wrapping_add(1)),
            terrain,
            pickups,
            distance_m: 0,
            coins: 0,
            score: 0,
            last_milestone: 0,
            milestone_ticks: 0,
            events: Vec::new(),
            settings,
        }
    }

    /// Restart from scratch with the same settings and seed
    pub fn reset(&mut self) {
        *self = Self::new(self.settings.clone());
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    /// HUD difficulty level, 1 through 10
    pub fn level(&self) -> u32 {
        ((self.vehicle.pos.x / 1000.0) as i64 + 1).clamp(1, 10) as u32
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit_exhaust(&mut self) {
        let v = &self.vehicle;
        let pos = v.pos - Vec2::from_angle(v.angle) * EXHAUST_OFFSET;
        let level = ExhaustLevel::from_speed(v.speed());
        self.events.push(GameEvent::Exhaust { pos, level });
    }

    /// Recompute distance and score; returns a newly reached milestone
    pub(crate) fn update_progress(&mut self) -> Option<u64> {
        self.distance_m = (self.vehicle.pos.x / PIXELS_PER_METER).max(0.0) as u64;
        self.score = self.distance_m + self.coins as u64 * self.settings.pickups.coin_score;

        let step = self.settings.pickups.milestone_meters;
        let milestone = self.distance_m / step * step;
        if milestone > self.last_milestone && milestone > 0 {
            self.last_milestone = milestone;
            Some(milestone)
        } else {
            None
        }
    }

    /// Enter game over if the vehicle crashed or ran dry
    pub(crate) fn check_game_over(&mut self) {
        let reason = match self.vehicle.crash_cause() {
            Some(cause) => GameOverReason::Crashed(cause),
            None if self.vehicle.is_out_of_fuel() => GameOverReason::OutOfFuel,
            None => return,
        };

        match reason {
            GameOverReason::Crashed(cause) => {
                self.events.push(GameEvent::Crashed {
                    pos: self.vehicle.pos,
                    cause,
                });
                let cam = &self.settings.camera;
                self.camera.shake(cam.crash_shake_amount, cam.crash_shake_ticks);
            }
            GameOverReason::OutOfFuel => self.events.push(GameEvent::OutOfFuel),
        }

        log::info!(
            "Game over ({:?}) after {} ticks: {} m, {} coins, score {}",
            reason,
            self.time_ticks,
            self.distance_m,
            self.coins,
            self.score
        );
        self.phase = GamePhase::GameOver(reason);
    }
}
