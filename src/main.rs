//! Hill Climb headless runner
//!
//! Drives the simulation with a simple autopilot at a fixed display rate and
//! logs what happens. Usage: `hill-climb [settings.json] [ticks]`.
//! Verbosity follows `RUST_LOG` (try `RUST_LOG=debug`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use hill_climb::VehicleAppearance;
    use hill_climb::settings::Settings;
    use hill_climb::sim::{
        DriveInput, FixedTimestep, GameEvent, GameState, TickInput, VehicleBody, run_frame,
    };

    /// Display frame time the runner pretends to render at
    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_TICKS: u64 = 3600;
    /// Lean (radians) the autopilot tolerates before pitching back
    const LEVEL_TOLERANCE: f32 = 0.05;

    /// Hold the throttle and keep the nose level in the air
    fn autopilot(vehicle: &VehicleBody) -> DriveInput {
        let airborne = !vehicle.on_ground();
        DriveInput {
            accelerate: true,
            pitch_up: airborne && vehicle.angle > LEVEL_TOLERANCE,
            pitch_down: airborne && vehicle.angle < -LEVEL_TOLERANCE,
            ..Default::default()
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Exhaust { .. } => {}
            GameEvent::Landed { pos } => log::debug!("Landed at x={:.0}", pos.x),
            GameEvent::CoinCollected { total } => log::info!("Coin! ({total} total)"),
            GameEvent::Refueled { fuel } => log::info!("Refueled to {fuel:.0}"),
            GameEvent::LandmarkVisited => log::info!("Landmark reached"),
            GameEvent::Milestone { .. } => {}
            GameEvent::Crashed { pos, cause } => {
                log::warn!("Crashed at x={:.0}: {:?}", pos.x, cause)
            }
            GameEvent::OutOfFuel => log::warn!("Out of fuel"),
            GameEvent::Restarted => log::info!("Restarted"),
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load_or_default(&PathBuf::from(path)),
            None => Settings::default(),
        };
        let max_ticks = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TICKS);

        let appearance = VehicleAppearance::from_settings(&settings);
        log::info!(
            "Hill Climb (headless) starting, {} body",
            if appearance.is_sprite() { "sprite" } else { "primitive" }
        );

        let mut state = GameState::new(settings);
        let mut clock = FixedTimestep::new();
        let mut ticks = 0u64;
        let mut runs = 1u32;
        let mut best_score = 0u64;

        while ticks < max_ticks {
            best_score = best_score.max(state.score);
            let input = if state.is_game_over() {
                TickInput {
                    restart: true,
                    ..Default::default()
                }
            } else {
                TickInput {
                    drive: autopilot(&state.vehicle),
                    restart: false,
                }
            };

            ticks += run_frame(&mut state, &input, &mut clock, FRAME_DT) as u64;
            for event in state.drain_events() {
                if event == GameEvent::Restarted {
                    runs += 1;
                }
                log_event(&event);
            }
        }
        best_score = best_score.max(state.score);

        match serde_json::to_string(&state.vehicle) {
            Ok(json) => log::debug!("Final vehicle: {json}"),
            Err(e) => log::warn!("Could not serialize vehicle: {e}"),
        }
        let (first, last) = state.terrain.span();
        log::info!(
            "{} ticks over {} run(s): {} m, {} coins, fuel {:.1}, level {}, best score {}",
            ticks,
            runs,
            state.distance_m,
            state.coins,
            state.vehicle.fuel,
            state.level(),
            best_score
        );
        log::info!(
            "Terrain window [{first:.0}, {last:.0}] with {} samples, {} pickups live",
            state.terrain.len(),
            state.pickups.len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is used as a library; a host page drives `sim::tick`
}
