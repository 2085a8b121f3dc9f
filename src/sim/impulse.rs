//! Contact quality to launch impulse

use glam::{Vec2, Vec3};

use super::contact::ContactQuality;
use super::world::RigidBodyWorld;
use crate::consts::MPS_TO_MPH;
use crate::settings::ImpulseConfig;

/// Base impulse magnitude for a quality tier (N·s)
pub fn base_magnitude(quality: ContactQuality, config: &ImpulseConfig) -> f32 {
    match quality {
        ContactQuality::Miss => 0.0,
        ContactQuality::Weak => config.weak,
        ContactQuality::Good => config.good,
        ContactQuality::Perfect => config.perfect,
    }
}

/// Launch impulse for a resolved contact
///
/// `aim` is the PCI offset normalized to [-1, 1]. The ball goes where the
/// batter aimed (left aim pulls left, high aim lofts), always mostly
/// downfield (-z), and `timing_precision` adds loft and strength.
pub fn launch_impulse(
    quality: ContactQuality,
    aim: Vec2,
    timing_precision: f32,
    config: &ImpulseConfig,
) -> Vec3 {
    let magnitude = base_magnitude(quality, config);
    if magnitude <= 0.0 {
        return Vec3::ZERO;
    }
    let aim = aim.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    let precision = timing_precision.clamp(0.0, 1.0);

    let lateral = aim.x * config.lateral_gain;
    let vertical = aim.y * config.vertical_gain + config.base_loft + precision * config.timing_loft;
    let forward = (config.forward - aim.x.abs() * config.lateral_penalty).max(0.1);
    let dir = Vec3::new(lateral, vertical, -forward).normalize();

    dir * magnitude * (config.base_fraction + precision * config.spread_fraction)
}

/// Clamp the incoming pitch speed, then apply the impulse at the ball
pub fn apply_contact<W: RigidBodyWorld + ?Sized>(world: &mut W, impulse: Vec3, max_pre_contact_speed: f32) {
    let ball = world.ball_mut();
    ball.vel = ball.vel.clamp_length_max(max_pre_contact_speed);
    let point = ball.pos;
    world.apply_impulse(impulse, point);
}

/// Ball speed in display units (mph)
#[inline]
pub fn exit_velocity_mph(vel: Vec3) -> f32 {
    vel.length() * MPS_TO_MPH
}
