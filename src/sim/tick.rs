//! Fixed timestep simulation tick
//!
//! One tick runs, in order: vehicle physics, terrain window, camera,
//! progress/milestones, pickups, game-over check. Each subsystem is mutated
//! by exactly one step and only read by the others.

use super::pickups::SpawnKind;
use super::state::{GameEvent, GamePhase, GameState};
use super::vehicle::DriveInput;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held driving controls
    pub drive: DriveInput,
    /// Start a new run (only honoured after game over)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_game_over() {
        if input.restart {
            state.reset();
            state.events.push(GameEvent::Restarted);
        } else {
            // Physics is frozen; the camera settles and any shake plays out
            state.camera.update(state.vehicle.pos);
        }
        return;
    }

    state.time_ticks += 1;

    // --- VEHICLE ---
    let step = state
        .vehicle
        .update(&input.drive, &state.terrain, &state.settings.vehicle);
    if step.accelerating && state.vehicle.on_ground() {
        state.emit_exhaust();
    }
    if step.just_landed && !state.vehicle.is_crashed() {
        state.events.push(GameEvent::Landed {
            pos: state.vehicle.pos,
        });
    }

    // --- TERRAIN & CAMERA ---
    state.terrain.advance(state.camera.position.x);
    state.camera.update(state.vehicle.pos);

    // --- PROGRESS ---
    if let Some(meters) = state.update_progress() {
        log::info!("Milestone: {meters} m");
        state.events.push(GameEvent::Milestone { meters });
        state.milestone_ticks = state.settings.pickups.milestone_banner_ticks;
        let x = state.vehicle.pos.x + state.settings.pickups.landmark_lead;
        state
            .pickups
            .place_landmark(x, &state.terrain, &state.settings.pickups);
    }
    state.milestone_ticks = state.milestone_ticks.saturating_sub(1);

    // --- PICKUPS ---
    update_pickups(state);

    state.check_game_over();
}

fn update_pickups(state: &mut GameState) {
    let settings = state.settings.pickups;

    state.pickups.spin_coins();
    let got = state.pickups.collect(state.vehicle.pos, &settings);
    for _ in 0..got.coins {
        state.coins += 1;
        state.events.push(GameEvent::CoinCollected { total: state.coins });
    }
    for _ in 0..got.fuel_cans {
        state
            .vehicle
            .refuel(settings.refuel_amount, state.settings.vehicle.fuel_capacity);
        state.events.push(GameEvent::Refueled {
            fuel: state.vehicle.fuel,
        });
    }
    for _ in 0..got.landmarks {
        state.events.push(GameEvent::LandmarkVisited);
    }
    if got.coins > 0 {
        // Keep the score in step with the coin count
        state.update_progress();
    }

    let right_edge = state.camera.position.x + state.settings.viewport.width;
    let spawned = state
        .pickups
        .tick_spawner(right_edge, &state.terrain, &settings, &mut state.rng);
    if spawned == Some(SpawnKind::FuelCan) {
        log::debug!("Fuel can spawned (fuel {:.1})", state.vehicle.fuel);
    }

    let (window_start, _) = state.terrain.span();
    state.pickups.prune_behind(window_start);
}

/// Converts variable frame times into a whole number of fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many ticks to run
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }

    /// Drop any banked time (after a pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Run as many ticks as `frame_dt` covers; returns the tick count
pub fn run_frame(
    state: &mut GameState,
    input: &TickInput,
    clock: &mut FixedTimestep,
    frame_dt: f32,
) -> u32 {
    let steps = clock.steps(frame_dt);
    for _ in 0..steps {
        tick(state, input);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::pickups::{Coin, FuelCan};
    use crate::sim::state::GameOverReason;
    use crate::sim::terrain::GroundQuery;
    use crate::sim::vehicle::{ContactState, CrashCause};
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(Settings::default())
    }

    fn gas() -> TickInput {
        TickInput {
            drive: DriveInput {
                accelerate: true,
                ..Default::default()
            },
            restart: false,
        }
    }

    #[test]
    fn test_first_tick_order() {
        let mut s = state();
        tick(&mut s, &TickInput::default());
        assert_eq!(s.time_ticks, 1);
        assert_eq!(s.vehicle.pos.y, 300.5);
        // Camera followed the vehicle's new position
        let goal = s.vehicle.pos - Vec2::new(200.0, 350.0);
        assert!((s.camera.position - goal * 0.1).length() < 1e-3);
        // Terrain window trimmed to the camera's trailing margin
        assert_eq!(s.terrain.span().0, -500.0);
    }

    #[test]
    fn test_vehicle_settles_and_drives() {
        let mut s = state();
        for _ in 0..120 {
            tick(&mut s, &TickInput::default());
        }
        assert!(s.vehicle.on_ground());
        assert!(!s.is_game_over());

        let start_x = s.vehicle.pos.x;
        let mut exhaust = 0;
        for _ in 0..60 {
            tick(&mut s, &gas());
            exhaust += s
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Exhaust { .. }))
                .count();
        }
        assert!(s.vehicle.pos.x > start_x);
        assert!(exhaust > 0);
    }

    #[test]
    fn test_terrain_follows_camera() {
        let mut s = state();
        s.camera.position.x = 10_000.0;
        tick(&mut s, &TickInput::default());
        let (first, last) = s.terrain.span();
        assert!(first <= 9_500.0);
        assert!(last >= 11_700.0);
    }

    #[test]
    fn test_coin_pickup_scores() {
        let mut s = state();
        s.pickups.coins.push(Coin {
            pos: Vec2::new(100.0, 300.5),
            spin: 0.0,
        });
        tick(&mut s, &TickInput::default());
        assert_eq!(s.coins, 1);
        // 10 m driven plus one coin
        assert_eq!(s.score, 20);
        assert!(s.events.contains(&GameEvent::CoinCollected { total: 1 }));
    }

    #[test]
    fn test_fuel_can_refuels() {
        let mut s = state();
        s.vehicle.fuel = 50.0;
        s.pickups.fuel_cans.push(FuelCan {
            pos: Vec2::new(100.0, 310.0),
        });
        tick(&mut s, &TickInput::default());
        assert_eq!(s.vehicle.fuel, 80.0);
        assert!(s.events.contains(&GameEvent::Refueled { fuel: 80.0 }));
    }

    #[test]
    fn test_crash_ends_run_and_freezes_physics() {
        let mut s = state();
        let ground = s.terrain.ground_height(120.0);
        s.vehicle.pos.y = ground - 21.0;
        s.vehicle.vel.y = 20.0;
        tick(&mut s, &TickInput::default());
        assert!(matches!(
            s.phase,
            GamePhase::GameOver(GameOverReason::Crashed(CrashCause::HardLanding { .. }))
        ));
        assert!(s.camera.is_shaking());

        let frozen = s.vehicle.clone();
        let ticks = s.time_ticks;
        for _ in 0..10 {
            tick(&mut s, &gas());
        }
        assert_eq!(s.vehicle, frozen);
        assert_eq!(s.time_ticks, ticks);
    }

    #[test]
    fn test_shake_plays_out_after_game_over() {
        let mut s = state();
        s.vehicle.contact = ContactState::Crashed(CrashCause::Tilt { degrees: 80.0 });
        tick(&mut s, &TickInput::default());
        assert!(s.is_game_over());
        for _ in 0..40 {
            tick(&mut s, &TickInput::default());
        }
        assert!(!s.camera.is_shaking());
    }

    #[test]
    fn test_out_of_fuel_ends_run() {
        let mut s = state();
        s.vehicle.fuel = 0.04;
        tick(&mut s, &gas());
        assert_eq!(s.vehicle.fuel, 0.0);
        assert_eq!(s.phase, GamePhase::GameOver(GameOverReason::OutOfFuel));
        assert!(s.events.contains(&GameEvent::OutOfFuel));
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut s = state();
        s.vehicle.fuel = 0.0;
        tick(&mut s, &TickInput::default());
        assert!(s.is_game_over());

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut s, &restart);
        assert!(!s.is_game_over());
        assert_eq!(s.vehicle.fuel, 100.0);
        assert_eq!(s.time_ticks, 0);
        assert_eq!(s.events, vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_milestone_places_landmark() {
        let mut s = state();
        s.vehicle.pos.x = 1005.0;
        s.vehicle.pos.y = 0.0;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.last_milestone, 100);
        assert!(s.events.contains(&GameEvent::Milestone { meters: 100 }));
        assert_eq!(s.milestone_ticks, 179);
        assert_eq!(s.pickups.landmarks.len(), 1);
        assert!((s.pickups.landmarks[0].pos.x - 1105.0).abs() < 1e-3);
    }

    #[test]
    fn test_fixed_timestep_accumulates() {
        let mut clock = FixedTimestep::new();
        assert_eq!(clock.steps(SIM_DT), 1);
        assert_eq!(clock.steps(0.04), 2);
        assert!(clock.alpha() > 0.0 && clock.alpha() < 1.0);
        assert_eq!(clock.steps(0.02), 1);
        assert_eq!(clock.steps(0.0), 0);
    }

    #[test]
    fn test_fixed_timestep_caps_long_frames() {
        let mut clock = FixedTimestep::new();
        let steps = clock.steps(10.0);
        assert!(steps <= MAX_SUBSTEPS);
        // A long hitch counts the same as the largest allowed frame
        assert_eq!(steps, FixedTimestep::new().steps(MAX_FRAME_DT));
        assert!(steps >= 5);
        clock.reset();
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_run_frame_ticks() {
        let mut s = state();
        let mut clock = FixedTimestep::new();
        let n = run_frame(&mut s, &TickInput::default(), &mut clock, 0.05);
        assert_eq!(s.time_ticks, n as u64);
        assert!(n >= 2);
    }
}
