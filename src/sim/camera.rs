//! Damped follow camera with screen shake
//!
//! The viewport origin chases a point up-left of the vehicle with first-order
//! smoothing. Shake jitter is sampled once per tick so every draw in a frame
//! agrees on the offset.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::{CameraSettings, ViewportSettings};

#[derive(Debug, Clone)]
pub struct CameraRig {
    /// World position of the viewport's top-left corner
    pub position: Vec2,
    follow: f32,
    /// Target minus this offset is where the viewport origin settles
    anchor: Vec2,
    viewport_width: f32,
    shake_amount: f32,
    shake_ticks: u32,
    jitter: Vec2,
    rng: Pcg32,
}

impl CameraRig {
    pub fn new(camera: &CameraSettings, viewport: &ViewportSettings, seed: u64) -> Self {
        Self {
            position: Vec2::ZERO,
            follow: camera.follow,
            anchor: Vec2::new(camera.horizontal_offset, (viewport.height / 2.0).floor()),
            viewport_width: viewport.width,
            shake_amount: 0.0,
            shake_ticks: 0,
            jitter: Vec2::ZERO,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Move a fixed fraction of the way toward the framing for `target`
    pub fn update(&mut self, target: Vec2) {
        let goal = target - self.anchor;
        self.position += (goal - self.position) * self.follow;

        if self.shake_ticks > 0 {
            self.shake_ticks -= 1;
        }
        if self.shake_ticks > 0 {
            self.jitter = self.sample_jitter();
        } else {
            self.shake_amount = 0.0;
            self.jitter = Vec2::ZERO;
        }
    }

    /// Start a shake of `amount` pixels lasting `duration` ticks
    pub fn shake(&mut self, amount: f32, duration: u32) {
        self.shake_amount = amount.abs();
        self.shake_ticks = duration;
        self.jitter = if duration > 0 {
            self.sample_jitter()
        } else {
            Vec2::ZERO
        };
    }

    fn sample_jitter(&mut self) -> Vec2 {
        let a = self.shake_amount;
        Vec2::new(self.rng.random_range(-a..=a), self.rng.random_range(-a..=a))
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_ticks > 0
    }

    pub fn shake_amount(&self) -> f32 {
        self.shake_amount
    }

    pub fn shake_ticks(&self) -> u32 {
        self.shake_ticks
    }

    /// This tick's shake offset (zero when still)
    pub fn jitter(&self) -> Vec2 {
        self.jitter
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position + self.jitter
    }

    /// Inverse of `world_to_screen`, ignoring shake
    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    /// World-space x range on screen, widened by `margin` on both sides
    pub fn visible_x_range(&self, margin: f32) -> (f32, f32) {
        (
            self.position.x - margin,
            self.position.x + self.viewport_width + margin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(&CameraSettings::default(), &ViewportSettings::default(), 7)
    }

    #[test]
    fn test_follow_moves_ten_percent() {
        let mut cam = rig();
        let target = Vec2::new(10_200.0, 5_350.0);
        // Framing goal: 200 left of target, half a viewport above it
        let goal = Vec2::new(10_000.0, 5_000.0);
        cam.update(target);
        assert!((cam.position - goal * 0.1).length() < 1e-3);
        assert!(cam.position.length() < goal.length() * 0.5);
    }

    #[test]
    fn test_follow_converges_without_overshoot() {
        let mut cam = rig();
        let target = Vec2::new(500.0, 650.0);
        let goal = target - Vec2::new(200.0, 350.0);
        let mut last = (goal - cam.position).length();
        for _ in 0..200 {
            cam.update(target);
            let d = (goal - cam.position).length();
            assert!(d <= last);
            last = d;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn test_world_to_screen_round_trip() {
        let mut cam = rig();
        cam.update(Vec2::new(1000.0, 300.0));
        let p = Vec2::new(1234.0, 456.0);
        let s = cam.world_to_screen(p);
        assert_eq!(s, p - cam.position);
        assert!((cam.screen_to_world(s) - p).length() < 1e-3);
    }

    #[test]
    fn test_shake_jitter_bounded_and_coherent() {
        let mut cam = rig();
        cam.shake(15.0, 30);
        assert!(cam.is_shaking());
        let p = Vec2::new(50.0, 50.0);
        for _ in 0..28 {
            cam.update(Vec2::ZERO);
            let j = cam.jitter();
            assert!(j.x.abs() <= 15.0 && j.y.abs() <= 15.0);
            // Same offset for every draw within a tick
            assert_eq!(cam.world_to_screen(p), cam.world_to_screen(p));
            let offset = cam.world_to_screen(p) - (p - cam.position);
            assert!((offset - j).length() < 1e-3, "offset {offset:?} vs jitter {j:?}");
        }
    }

    #[test]
    fn test_shake_decays_to_zero() {
        let mut cam = rig();
        cam.shake(15.0, 3);
        let mut ticks = cam.shake_ticks();
        for _ in 0..5 {
            cam.update(Vec2::ZERO);
            assert!(cam.shake_ticks() <= ticks);
            ticks = cam.shake_ticks();
        }
        assert!(!cam.is_shaking());
        assert_eq!(cam.shake_amount(), 0.0);
        assert_eq!(cam.jitter(), Vec2::ZERO);
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(cam.world_to_screen(p), p - cam.position);
    }

    #[test]
    fn test_visible_range() {
        let cam = rig();
        assert_eq!(cam.visible_x_range(100.0), (-100.0, 1300.0));
    }
}
