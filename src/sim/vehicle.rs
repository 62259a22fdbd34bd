//! Two-contact vehicle body
//!
//! The vehicle is a point mass with an orientation and two ground contact
//! points (rear and front wheel) half a wheelbase either side of its centre.
//! Each tick integrates with symplectic Euler, clamps the contacts onto the
//! terrain, and re-derives pose from where the wheels ended up. There is no
//! rotational inertia: on the ground the body simply lies along its wheels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::GroundQuery;
use crate::settings::VehicleTuning;
use crate::tilt_degrees;

/// Why the run ended in a crash
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Touched down faster than the safe landing speed
    HardLanding { speed: f32 },
    /// Came to rest on the ground tilted past the limit
    Tilt { degrees: f32 },
}

/// Ground contact state machine
///
/// `Airborne` and `Grounded` alternate on contact; `Crashed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContactState {
    Airborne,
    Grounded,
    Crashed(CrashCause),
}

/// Player intent for a single tick (held keys)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub accelerate: bool,
    pub brake: bool,
    pub jump: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
}

/// What happened during one vehicle update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleStep {
    /// Throttle was open and fuel was burnt this tick
    pub accelerating: bool,
    /// Went from airborne to grounded this tick
    pub just_landed: bool,
    /// Set on the tick the vehicle crashed
    pub crash: Option<CrashCause>,
}

/// The player's vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleBody {
    /// Body centre (world pixels, y down)
    pub pos: Vec2,
    /// Velocity (pixels per tick)
    pub vel: Vec2,
    /// Orientation (radians, 0 = level, positive = nose down)
    pub angle: f32,
    pub angular_vel: f32,
    pub fuel: f32,
    pub suspension_front: f32,
    pub suspension_rear: f32,
    /// Visual wheel rotation (radians)
    pub front_wheel_spin: f32,
    pub rear_wheel_spin: f32,
    pub contact: ContactState,
}

impl VehicleBody {
    /// A fresh vehicle at the spawn point: full tank, at rest, falling
    pub fn spawn(tuning: &VehicleTuning) -> Self {
        Self {
            pos: tuning.spawn,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            fuel: tuning.fuel_capacity,
            suspension_front: 0.0,
            suspension_rear: 0.0,
            front_wheel_spin: 0.0,
            rear_wheel_spin: 0.0,
            contact: ContactState::Airborne,
        }
    }

    pub fn on_ground(&self) -> bool {
        self.contact == ContactState::Grounded
    }

    /// Jumping is only possible with wheels on the ground
    pub fn can_jump(&self) -> bool {
        self.on_ground()
    }

    pub fn is_crashed(&self) -> bool {
        matches!(self.contact, ContactState::Crashed(_))
    }

    pub fn crash_cause(&self) -> Option<CrashCause> {
        match self.contact {
            ContactState::Crashed(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel <= 0.0
    }

    /// Horizontal speed (pixels per tick)
    pub fn speed(&self) -> f32 {
        self.vel.x.abs()
    }

    /// Current absolute tilt in degrees
    pub fn tilt(&self) -> f32 {
        tilt_degrees(self.angle)
    }

    /// Add fuel from a pickup, capped at `capacity`
    pub fn refuel(&mut self, amount: f32, capacity: f32) {
        self.fuel = (self.fuel + amount).min(capacity);
    }

    /// Rear and front contact points, half a wheelbase either side of centre
    pub fn contact_points(&self, tuning: &VehicleTuning) -> [Vec2; 2] {
        let half = Vec2::from_angle(self.angle) * (tuning.wheel_base * 0.5);
        [self.pos - half, self.pos + half]
    }

    /// Advance one fixed tick
    ///
    /// A crashed vehicle is frozen: the call returns an empty step and
    /// leaves every field untouched.
    pub fn update(
        &mut self,
        input: &DriveInput,
        ground: &impl GroundQuery,
        tuning: &VehicleTuning,
    ) -> VehicleStep {
        if self.is_crashed() {
            return VehicleStep::default();
        }

        let was_grounded = self.on_ground();
        let mut step = VehicleStep::default();

        // --- INPUT ---
        if input.accelerate && self.fuel > 0.0 {
            if was_grounded {
                self.vel.x += tuning.thrust;
            }
            // The engine burns fuel whether or not the wheels have grip
            self.fuel = (self.fuel - tuning.fuel_per_tick).max(0.0);
            step.accelerating = true;
        }
        if input.brake && was_grounded {
            self.vel.x -= tuning.brake;
        }
        if input.jump && self.can_jump() {
            let bonus = (self.vel.x.abs() * tuning.jump_speed_bonus).min(tuning.jump_bonus_cap);
            self.vel.y = -(tuning.jump_force + bonus);
            self.contact = ContactState::Airborne;
        }
        if !was_grounded {
            if input.pitch_up {
                self.angular_vel -= tuning.pitch_accel;
            }
            if input.pitch_down {
                self.angular_vel += tuning.pitch_accel;
            }
        }

        // --- INTEGRATION ---
        self.vel.y += tuning.gravity;
        self.vel.x *= tuning.drag;
        self.pos += self.vel;
        self.angle += self.angular_vel;
        self.angular_vel *= tuning.angular_damping;

        // --- GROUND CONTACT ---
        let [rear, front] = self.contact_points(tuning);
        let mut clamped = [rear, front];
        let mut grounded = false;
        let mut crash = None;
        // Front first, matching the order contacts are reported in
        for contact in clamped.iter_mut().rev() {
            let surface = ground.ground_height(contact.x) - tuning.wheel_radius;
            if contact.y > surface {
                contact.y = surface;
                grounded = true;
                if self.vel.y > tuning.max_landing_speed {
                    crash.get_or_insert(CrashCause::HardLanding { speed: self.vel.y });
                }
            }
        }
        let [rear_c, front_c] = clamped;

        if grounded {
            self.suspension_front = (front.y - front_c.y) * tuning.suspension_stiffness;
            self.suspension_rear = (rear.y - rear_c.y) * tuning.suspension_stiffness;

            let mid = (front_c + rear_c) * 0.5;
            let lift = (self.suspension_front + self.suspension_rear) * 0.5;
            self.pos = Vec2::new(mid.x, mid.y - lift);

            let axle = front_c - rear_c;
            self.angle = axle.y.atan2(axle.x);
            self.vel.y *= -tuning.restitution;
            self.angular_vel *= tuning.landing_spin_damping;
        } else {
            self.suspension_front *= tuning.suspension_decay;
            self.suspension_rear *= tuning.suspension_decay;
        }

        // Flips are fine in the air; only touching down past the limit ends the run
        if grounded {
            let tilt = tilt_degrees(self.angle);
            if tilt > tuning.max_tilt_degrees {
                crash.get_or_insert(CrashCause::Tilt { degrees: tilt });
            }

            let spin = self.vel.x * tuning.wheel_spin_ratio;
            self.front_wheel_spin += spin;
            self.rear_wheel_spin += spin;
        }

        step.just_landed = grounded && !was_grounded;
        step.crash = crash;
        self.contact = match crash {
            Some(cause) => {
                log::debug!("Vehicle crashed at {:?}: {:?}", self.pos, cause);
                ContactState::Crashed(cause)
            }
            None if grounded => ContactState::Grounded,
            None => ContactState::Airborne,
        };

        step
    }
}
