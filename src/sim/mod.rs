//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Terrain derived from a pure height function
//! - No rendering, input or platform dependencies

pub mod camera;
pub mod height;
pub mod pickups;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod vehicle;

pub use camera::CameraRig;
pub use height::{HeightField, Wave};
pub use pickups::{Coin, Collected, FuelCan, Landmark, Pickups, SpawnKind};
pub use state::{ExhaustLevel, GameEvent, GameOverReason, GamePhase, GameState};
pub use terrain::{FlatGround, GroundQuery, TerrainStream};
pub use tick::{FixedTimestep, TickInput, run_frame, tick};
pub use vehicle::{ContactState, CrashCause, DriveInput, VehicleBody, VehicleStep};
