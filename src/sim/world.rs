//! Rigid body world
//!
//! The simulation only talks to physics through [`RigidBodyWorld`], so a
//! full physics engine can stand in for the built-in [`BallWorld`].

use glam::{Quat, Vec3};

use crate::consts::{BALL_MASS, BALL_RADIUS};
use crate::settings::FieldConfig;

/// Rebound speed (m/s) below which ground contact counts as rolling
const MIN_BOUNCE_SPEED: f32 = 0.2;

/// Ball rigid-body state
#[derive(Debug, Clone)]
pub struct BallBody {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Angular velocity (rad/s)
    pub spin: Vec3,
    pub rotation: Quat,
    pub radius: f32,
    pub mass: f32,
    /// Held balls (waiting for the next pitch) do not integrate
    pub active: bool,
}

impl Default for BallBody {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            spin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            radius: BALL_RADIUS,
            mass: BALL_MASS,
            active: false,
        }
    }
}

impl BallBody {
    /// Hold the ball still at `pos` until the next launch
    pub fn park(&mut self, pos: Vec3) {
        self.pos = pos;
        self.vel = Vec3::ZERO;
        self.spin = Vec3::ZERO;
        self.rotation = Quat::IDENTITY;
        self.active = false;
    }

    /// Release the ball from `pos` with the given velocity
    pub fn launch(&mut self, pos: Vec3, vel: Vec3, spin: Vec3) {
        self.pos = pos;
        self.vel = vel;
        self.spin = spin;
        self.active = true;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// What the ball touched during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactKind {
    Ground,
}

/// A contact pair reported by the world
#[derive(Debug, Clone, Copy)]
pub struct BodyContact {
    pub kind: ContactKind,
    pub point: Vec3,
    pub normal: Vec3,
    /// Closing speed along the normal before response
    pub impact_speed: f32,
}

/// Physics collaborator contract
pub trait RigidBodyWorld {
    /// Advance by exactly one fixed step
    fn step(&mut self, dt: f32);
    fn ball(&self) -> &BallBody;
    fn ball_mut(&mut self) -> &mut BallBody;
    /// Instantaneous impulse (N·s) applied at a world point
    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3);
    /// Contacts generated by the most recent step
    fn contacts(&self) -> &[BodyContact];
    fn gravity(&self) -> Vec3;
}

/// Built-in single-ball world: gravity, damping, ground bounce
#[derive(Debug, Clone)]
pub struct BallWorld {
    pub ball: BallBody,
    pub gravity: Vec3,
    pub restitution: f32,
    pub ground_friction: f32,
    pub rolling_resistance: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    contacts: Vec<BodyContact>,
}

impl BallWorld {
    pub fn new(field: &FieldConfig) -> Self {
        Self {
            ball: BallBody::default(),
            gravity: Vec3::new(0.0, field.gravity, 0.0),
            restitution: field.restitution,
            ground_friction: field.ground_friction,
            rolling_resistance: field.rolling_resistance,
            linear_damping: field.linear_damping,
            angular_damping: field.angular_damping,
            contacts: Vec::new(),
        }
    }
}

impl RigidBodyWorld for BallWorld {
    fn step(&mut self, dt: f32) {
        self.contacts.clear();
        let ball = &mut self.ball;
        if !ball.active {
            return;
        }

        // Semi-implicit Euler
        ball.vel += self.gravity * dt;
        ball.vel *= (1.0 - self.linear_damping * dt).max(0.0);
        ball.spin *= (1.0 - self.angular_damping * dt).max(0.0);
        ball.pos += ball.vel * dt;

        let spin_rate = ball.spin.length();
        if spin_rate > 1e-4 {
            let dq = Quat::from_axis_angle(ball.spin / spin_rate, spin_rate * dt);
            ball.rotation = (dq * ball.rotation).normalize();
        }

        // Ground plane at y = 0
        if ball.pos.y < ball.radius && ball.vel.y < 0.0 {
            let impact_speed = -ball.vel.y;
            ball.pos.y = ball.radius;
            ball.vel.y = impact_speed * self.restitution;
            if ball.vel.y >= MIN_BOUNCE_SPEED {
                // Real bounce: friction bites once per impact
                ball.vel.x *= self.ground_friction;
                ball.vel.z *= self.ground_friction;
            } else {
                // Rolling: kill micro-bounces, decelerate per second of contact
                ball.vel.y = 0.0;
                let keep = (1.0 - self.rolling_resistance * dt).max(0.0);
                ball.vel.x *= keep;
                ball.vel.z *= keep;
            }
            self.contacts.push(BodyContact {
                kind: ContactKind::Ground,
                point: Vec3::new(ball.pos.x, 0.0, ball.pos.z),
                normal: Vec3::Y,
                impact_speed,
            });
        }
    }

    fn ball(&self) -> &BallBody {
        &self.ball
    }

    fn ball_mut(&mut self) -> &mut BallBody {
        &mut self.ball
    }

    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) {
        let ball = &mut self.ball;
        ball.vel += impulse / ball.mass;
        // Off-center hits add spin: I = 2/5 m r² for a solid sphere
        let arm = point - ball.pos;
        let inertia = 0.4 * ball.mass * ball.radius * ball.radius;
        if inertia > 0.0 {
            ball.spin += arm.cross(impulse) / inertia;
        }
        ball.active = true;
    }

    fn contacts(&self) -> &[BodyContact] {
        &self.contacts
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn world() -> BallWorld {
        BallWorld::new(&FieldConfig::default())
    }

    #[test]
    fn test_parked_ball_does_not_move() {
        let mut w = world();
        w.ball.park(Vec3::new(0.0, 1.8, -20.0));
        for _ in 0..120 {
            w.step(SIM_DT);
        }
        assert_eq!(w.ball.pos, Vec3::new(0.0, 1.8, -20.0));
    }

    #[test]
    fn test_gravity_pulls_ball_down() {
        let mut w = world();
        w.ball.launch(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::ZERO);
        for _ in 0..60 {
            w.step(SIM_DT);
        }
        assert!(w.ball.pos.y < 10.0);
        assert!(w.ball.vel.y < 0.0);
    }

    #[test]
    fn test_ground_bounce_reports_contact() {
        let mut w = world();
        w.ball.launch(Vec3::new(0.0, 0.05, 0.0), Vec3::new(0.0, -5.0, -3.0), Vec3::ZERO);
        w.step(SIM_DT);
        assert_eq!(w.contacts().len(), 1);
        assert_eq!(w.contacts()[0].kind, ContactKind::Ground);
        assert!(w.ball.vel.y > 0.0);
        assert!(w.ball.pos.y >= w.ball.radius);
    }

    #[test]
    fn test_rolling_ball_slows_gradually() {
        let mut w = world();
        w.ball.launch(Vec3::new(0.0, BALL_RADIUS, 0.0), Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
        w.step(SIM_DT);
        assert_eq!(w.contacts().len(), 1);
        // One tick of rolling costs a sliver of speed, not a bounce's worth
        assert!(w.ball.vel.z < -9.8);

        for _ in 0..119 {
            w.step(SIM_DT);
        }
        let after_one_second = -w.ball.vel.z;
        assert!(after_one_second < 10.0 * 0.5);
        assert!(after_one_second > 1.0);
        assert_eq!(w.ball.pos.y, BALL_RADIUS);
    }

    #[test]
    fn test_bounce_applies_friction_once() {
        let mut w = world();
        w.ball.launch(Vec3::new(0.0, 0.05, 0.0), Vec3::new(0.0, -5.0, -10.0), Vec3::ZERO);
        w.step(SIM_DT);
        let expected = 10.0 * (1.0 - w.linear_damping * SIM_DT) * w.ground_friction;
        assert!((w.ball.vel.z + expected).abs() < 1e-3);
    }

    #[test]
    fn test_center_impulse_changes_velocity_only() {
        let mut w = world();
        w.ball.launch(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, Vec3::ZERO);
        let pos = w.ball.pos;
        w.apply_impulse(Vec3::new(0.0, 0.0, -1.45), pos);
        assert!((w.ball.vel.z + 10.0).abs() < 1e-4);
        assert_eq!(w.ball.spin, Vec3::ZERO);
    }
}
