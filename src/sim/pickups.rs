//! Collectibles: coins, fuel cans and milestone landmarks
//!
//! Items are plain positions collected by proximity to the vehicle centre.
//! Consumed items and anything left behind the terrain window are dropped.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::height::HeightField;
use super::terrain::GroundQuery;
use crate::settings::PickupSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    /// Spin phase for the flipping animation
    pub spin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCan {
    pub pos: Vec2,
}

/// Marker dropped at each distance milestone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub pos: Vec2,
}

/// Kind of item produced by the periodic spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Coin,
    FuelCan,
}

/// Items picked up during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collected {
    pub coins: u32,
    pub fuel_cans: u32,
    pub landmarks: u32,
}

impl Collected {
    pub fn is_empty(&self) -> bool {
        self.coins == 0 && self.fuel_cans == 0 && self.landmarks == 0
    }
}

/// Spin rate of coins (radians per tick)
const COIN_SPIN_RATE: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct Pickups {
    pub coins: Vec<Coin>,
    pub fuel_cans: Vec<FuelCan>,
    pub landmarks: Vec<Landmark>,
    spawn_timer: u32,
}

impl Pickups {
    /// Scatter the opening coins and fuel cans along the first stretch of road
    ///
    /// Heights come straight from the height field because the terrain window
    /// does not reach that far yet.
    pub fn seeded(settings: &PickupSettings, field: &HeightField, rng: &mut Pcg32) -> Self {
        let mut pickups = Self::default();

        let (lo, hi) = settings.initial_coin_range;
        for _ in 0..settings.initial_coins {
            let x = rng.random_range(lo..=hi);
            pickups.coins.push(Coin {
                pos: Vec2::new(x, field.height(x) - settings.coin_height),
                spin: 0.0,
            });
        }

        let (lo, hi) = settings.initial_fuel_range;
        for _ in 0..settings.initial_fuel_cans {
            let x = rng.random_range(lo..=hi);
            pickups.fuel_cans.push(FuelCan {
                pos: Vec2::new(x, field.height(x) - settings.fuel_height),
            });
        }

        pickups
    }

    pub fn len(&self) -> usize {
        self.coins.len() + self.fuel_cans.len() + self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn spin_coins(&mut self) {
        for coin in &mut self.coins {
            coin.spin += COIN_SPIN_RATE;
        }
    }

    /// Remove every item within reach of `center` and report what was taken
    pub fn collect(&mut self, center: Vec2, settings: &PickupSettings) -> Collected {
        let mut collected = Collected::default();

        self.coins.retain(|c| {
            let hit = c.pos.distance(center) < settings.coin_radius;
            collected.coins += hit as u32;
            !hit
        });
        self.fuel_cans.retain(|f| {
            let hit = f.pos.distance(center) < settings.fuel_radius;
            collected.fuel_cans += hit as u32;
            !hit
        });
        self.landmarks.retain(|l| {
            let hit = l.pos.distance(center) < settings.landmark_radius;
            collected.landmarks += hit as u32;
            !hit
        });

        collected
    }

    pub fn place_landmark(&mut self, x: f32, ground: &impl GroundQuery, settings: &PickupSettings) {
        self.landmarks.push(Landmark {
            pos: Vec2::new(x, ground.ground_height(x) - settings.landmark_height),
        });
    }

    /// Count one tick toward the next spawn; spawns just past the viewport's right edge
    pub fn tick_spawner(
        &mut self,
        right_edge: f32,
        ground: &impl GroundQuery,
        settings: &PickupSettings,
        rng: &mut Pcg32,
    ) -> Option<SpawnKind> {
        self.spawn_timer += 1;
        if self.spawn_timer <= settings.spawn_interval_ticks {
            return None;
        }
        self.spawn_timer = 0;

        let (lo, hi) = settings.spawn_ahead;
        let x = right_edge + rng.random_range(lo..=hi);
        let pos = Vec2::new(x, ground.ground_height(x) - settings.spawn_height);

        let kind = if rng.random_bool(settings.coin_chance) {
            self.coins.push(Coin { pos, spin: 0.0 });
            SpawnKind::Coin
        } else {
            self.fuel_cans.push(FuelCan { pos });
            SpawnKind::FuelCan
        };
        log::debug!("Spawned {:?} at x={:.0}", kind, x);
        Some(kind)
    }

    /// Forget items left behind `min_x`
    pub fn prune_behind(&mut self, min_x: f32) {
        self.coins.retain(|c| c.pos.x >= min_x);
        self.fuel_cans.retain(|f| f.pos.x >= min_x);
        self.landmarks.retain(|l| l.pos.x >= min_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::FlatGround;
    use rand::SeedableRng;

    const GROUND: FlatGround = FlatGround { height: 400.0 };

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_seeded_population() {
        let settings = PickupSettings::default();
        let field = HeightField::default();
        let p = Pickups::seeded(&settings, &field, &mut rng());
        assert_eq!(p.coins.len(), 10);
        assert_eq!(p.fuel_cans.len(), 5);
        for c in &p.coins {
            assert!((200.0..=5000.0).contains(&c.pos.x));
            assert!((c.pos.y - (field.height(c.pos.x) - 50.0)).abs() < 1e-3);
        }
        for f in &p.fuel_cans {
            assert!((300.0..=5000.0).contains(&f.pos.x));
        }
    }

    #[test]
    fn test_seeding_is_reproducible() {
        let settings = PickupSettings::default();
        let field = HeightField::default();
        let a = Pickups::seeded(&settings, &field, &mut rng());
        let b = Pickups::seeded(&settings, &field, &mut rng());
        assert_eq!(a.coins, b.coins);
        assert_eq!(a.fuel_cans, b.fuel_cans);
    }

    #[test]
    fn test_collect_by_proximity() {
        let settings = PickupSettings::default();
        let mut p = Pickups::default();
        p.coins.push(Coin {
            pos: Vec2::new(100.0, 100.0),
            spin: 0.0,
        });
        p.coins.push(Coin {
            pos: Vec2::new(200.0, 100.0),
            spin: 0.0,
        });
        p.fuel_cans.push(FuelCan {
            pos: Vec2::new(135.0, 100.0),
        });

        let got = p.collect(Vec2::new(110.0, 100.0), &settings);
        assert_eq!(
            got,
            Collected {
                coins: 1,
                fuel_cans: 1,
                landmarks: 0
            }
        );
        assert_eq!(p.coins.len(), 1);
        assert!(p.fuel_cans.is_empty());

        // Nothing within reach
        assert!(p.collect(Vec2::new(110.0, 100.0), &settings).is_empty());
    }

    #[test]
    fn test_spawner_interval() {
        let settings = PickupSettings::default();
        let mut p = Pickups::default();
        let mut r = rng();
        let mut spawned = Vec::new();
        for tick in 0..200 {
            if let Some(kind) = p.tick_spawner(1200.0, &GROUND, &settings, &mut r) {
                spawned.push((tick, kind));
            }
        }
        let ticks: Vec<_> = spawned.iter().map(|(t, _)| *t).collect();
        assert_eq!(ticks, vec![60, 121, 182]);
        assert_eq!(p.len(), 3);
        for c in &p.coins {
            assert!((1300.0..=1700.0).contains(&c.pos.x));
            assert_eq!(c.pos.y, 350.0);
        }
    }

    #[test]
    fn test_landmark_and_prune() {
        let settings = PickupSettings::default();
        let mut p = Pickups::default();
        p.place_landmark(500.0, &GROUND, &settings);
        assert_eq!(p.landmarks[0].pos, Vec2::new(500.0, 370.0));
        p.coins.push(Coin {
            pos: Vec2::new(-50.0, 0.0),
            spin: 0.0,
        });
        p.prune_behind(0.0);
        assert!(p.coins.is_empty());
        assert_eq!(p.landmarks.len(), 1);
    }

    #[test]
    fn test_coins_spin() {
        let mut p = Pickups::default();
        p.coins.push(Coin {
            pos: Vec2::ZERO,
            spin: 0.0,
        });
        p.spin_coins();
        p.spin_coins();
        assert!((p.coins[0].spin - 0.2).abs() < 1e-6);
    }
}
