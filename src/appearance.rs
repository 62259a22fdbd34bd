//! Render-facing vehicle geometry
//!
//! Nothing here feeds back into the simulation. A renderer picks the sprite
//! or the primitive body, then draws wheels from `wheel_poses` either way.

use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::settings::{Settings, VehicleTuning};
use crate::sim::VehicleBody;

/// How the vehicle body is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleAppearance {
    /// Image scaled to a `size` x `size` box, rotated with the body
    Sprite { path: PathBuf, size: f32 },
    /// Flat-shaded quad from `body_outline`
    Primitive,
}

impl VehicleAppearance {
    /// Use the sprite if the file is there, otherwise fall back to primitives
    pub fn resolve(path: Option<&Path>, size: f32) -> Self {
        match path {
            Some(path) if path.is_file() => {
                log::info!("Vehicle sprite: {}", path.display());
                VehicleAppearance::Sprite {
                    path: path.to_path_buf(),
                    size,
                }
            }
            Some(path) => {
                log::warn!(
                    "Vehicle sprite {} not found, drawing primitive body",
                    path.display()
                );
                VehicleAppearance::Primitive
            }
            None => VehicleAppearance::Primitive,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::resolve(settings.sprite_path.as_deref(), settings.sprite_size)
    }

    pub fn is_sprite(&self) -> bool {
        matches!(self, VehicleAppearance::Sprite { .. })
    }
}

/// Primitive body corners relative to the body centre, before rotation
pub const BODY_CORNERS: [Vec2; 4] = [
    Vec2::new(-25.0, -20.0),
    Vec2::new(25.0, -20.0),
    Vec2::new(25.0, 10.0),
    Vec2::new(-25.0, 10.0),
];

/// Sprites sit slightly above the body centre
const SPRITE_LIFT: f32 = 10.0;

/// Suspension spring mount, below the body line
const SPRING_MOUNT_DROP: f32 = 10.0;

/// World-space corners of the primitive body
pub fn body_outline(vehicle: &VehicleBody) -> [Vec2; 4] {
    let rot = Vec2::from_angle(vehicle.angle);
    BODY_CORNERS.map(|corner| vehicle.pos + rot.rotate(corner))
}

/// Sprite centre and rotation in degrees (counter-clockwise on screen)
pub fn sprite_anchor(vehicle: &VehicleBody) -> (Vec2, f32) {
    (
        vehicle.pos - Vec2::new(0.0, SPRITE_LIFT),
        -vehicle.angle.to_degrees(),
    )
}

/// Where to draw one wheel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelPose {
    pub center: Vec2,
    /// Top of the suspension spring on the body
    pub mount: Vec2,
    pub radius: f32,
    /// Spoke rotation (radians)
    pub spin: f32,
    pub suspension: f32,
}

/// Rear and front wheels, in that order
pub fn wheel_poses(vehicle: &VehicleBody, tuning: &VehicleTuning) -> [WheelPose; 2] {
    let dir = Vec2::from_angle(vehicle.angle);
    let half = tuning.wheel_base * 0.5;

    let pose = |offset: f32, suspension: f32, spin: f32| {
        let on_body = vehicle.pos + dir * offset;
        WheelPose {
            center: on_body + Vec2::new(0.0, suspension),
            mount: on_body + Vec2::new(0.0, SPRING_MOUNT_DROP),
            radius: tuning.wheel_radius,
            spin,
            suspension,
        }
    };

    [
        pose(-half, vehicle.suspension_rear, vehicle.rear_wheel_spin),
        pose(half, vehicle.suspension_front, vehicle.front_wheel_spin),
    ]
}
