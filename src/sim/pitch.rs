//! Pitch generation
//!
//! Every pitch is a weighted archetype draw, a random aim point inside a
//! shrunken strike zone, a straight-line launch toward it, and a per-archetype
//! break added on top.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::zone::StrikeZone;
use crate::lerp;
use crate::settings::PitchConfig;

/// Pitch archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchKind {
    Fastball,
    Curve,
    Drop,
}

impl PitchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchKind::Fastball => "Fastball",
            PitchKind::Curve => "Curve",
            PitchKind::Drop => "Drop",
        }
    }

    /// Cosmetic spin rate (rad/s)
    fn spin_rate(&self) -> f32 {
        match self {
            PitchKind::Fastball => 230.0,
            PitchKind::Curve => 270.0,
            PitchKind::Drop => 180.0,
        }
    }
}

/// A generated pitch; only `velocity` and `spin` outlive the launch
#[derive(Debug, Clone, Copy)]
pub struct Pitch {
    pub kind: PitchKind,
    /// Aim point inside the strike zone
    pub target: Vec3,
    pub speed: f32,
    /// Lateral/vertical velocity added after aiming
    pub break_vel: Vec2,
    pub velocity: Vec3,
    pub spin: Vec3,
}

/// Weighted archetype draw
pub fn choose_kind<R: Rng + ?Sized>(rng: &mut R, config: &PitchConfig) -> PitchKind {
    let total = config.fastball_weight + config.curve_weight + config.drop_weight;
    if total <= 0.0 {
        return PitchKind::Fastball;
    }
    let roll = rng.random::<f32>() * total;
    if roll < config.fastball_weight {
        PitchKind::Fastball
    } else if roll < config.fastball_weight + config.curve_weight {
        PitchKind::Curve
    } else {
        PitchKind::Drop
    }
}

/// Random aim point strictly inside the zone, shrunk by `aim_inset`
pub fn choose_target<R: Rng + ?Sized>(rng: &mut R, config: &PitchConfig, zone: &StrikeZone) -> Vec3 {
    let usable = zone.half_extents() * config.aim_inset.clamp(0.0, 0.95);
    let u = Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * 2.0 - Vec2::ONE;
    zone.to_world(u * usable)
}

/// Archetype-specific break on top of the straight-line launch
fn break_for<R: Rng + ?Sized>(rng: &mut R, kind: PitchKind, config: &PitchConfig) -> Vec2 {
    let mag = config.break_magnitude;
    let lateral = (rng.random::<f32>() * 2.0 - 1.0) * mag;
    let vertical = (rng.random::<f32>() * 2.0 - 1.0) * mag * 0.5;
    match kind {
        PitchKind::Fastball => Vec2::new(lateral, vertical) * config.fastball_break_scale,
        PitchKind::Curve => Vec2::new(lateral * config.curve_lateral_scale, vertical * 0.5),
        PitchKind::Drop => Vec2::new(
            lateral * 0.5,
            -(vertical.abs() + mag * config.drop_vertical_bias),
        ),
    }
}

/// Generate the next pitch from `spawn` toward the zone
pub fn generate_pitch<R: Rng + ?Sized>(
    rng: &mut R,
    config: &PitchConfig,
    zone: &StrikeZone,
    spawn: Vec3,
    gravity: f32,
) -> Pitch {
    let kind = choose_kind(rng, config);
    let target = choose_target(rng, config, zone);
    let speed = lerp(config.speed_min, config.speed_max, rng.random::<f32>());

    let dir = (target - spawn).try_normalize().unwrap_or(Vec3::Z);
    let mut velocity = dir * speed;

    if config.compensate_gravity && velocity.z.abs() > 1e-3 {
        let flight_time = ((target.z - spawn.z) / velocity.z).abs();
        velocity.y -= 0.5 * gravity * flight_time;
    }

    let break_vel = break_for(rng, kind, config);
    velocity.x += break_vel.x;
    velocity.y += break_vel.y;

    // Spin axis perpendicular to travel and break (cosmetic)
    let spin_axis = dir
        .cross(Vec3::new(break_vel.x, break_vel.y, 0.0))
        .try_normalize()
        .unwrap_or(Vec3::X);
    let spin = spin_axis * kind.spin_rate();

    Pitch {
        kind,
        target,
        speed,
        break_vel,
        velocity,
        spin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRAVITY;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn zone() -> StrikeZone {
        StrikeZone::new(Vec3::new(0.0, 1.3, -2.0), 1.2, 1.5, 0.4)
    }

    const SPAWN: Vec3 = Vec3::new(0.0, 1.8, -20.0);

    #[test]
    fn test_same_seed_same_pitch() {
        let config = PitchConfig::default();
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            let pa = generate_pitch(&mut a, &config, &zone(), SPAWN, GRAVITY);
            let pb = generate_pitch(&mut b, &config, &zone(), SPAWN, GRAVITY);
            assert_eq!(pa.kind, pb.kind);
            assert_eq!(pa.velocity, pb.velocity);
        }
    }

    #[test]
    fn test_targets_strictly_inside_zone() {
        let config = PitchConfig::default();
        let z = zone();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            let p = generate_pitch(&mut rng, &config, &z, SPAWN, GRAVITY);
            let d = (p.target - z.center).abs();
            assert!(d.x < z.width / 2.0);
            assert!(d.y < z.height / 2.0);
            assert!(p.velocity.is_finite());
            assert!(p.velocity.z > 0.0, "pitch must travel toward the batter");
            assert!(p.speed >= config.speed_min && p.speed <= config.speed_max);
        }
    }

    #[test]
    fn test_archetype_mix_follows_weights() {
        let config = PitchConfig::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut counts = [0u32; 3];
        let n = 10_000;
        for _ in 0..n {
            match choose_kind(&mut rng, &config) {
                PitchKind::Fastball => counts[0] += 1,
                PitchKind::Curve => counts[1] += 1,
                PitchKind::Drop => counts[2] += 1,
            }
        }
        let frac = |c: u32| c as f32 / n as f32;
        assert!((frac(counts[0]) - 0.45).abs() < 0.03);
        assert!((frac(counts[1]) - 0.30).abs() < 0.03);
        assert!((frac(counts[2]) - 0.25).abs() < 0.03);
    }

    #[test]
    fn test_break_shapes_per_archetype() {
        let config = PitchConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let fb = break_for(&mut rng, PitchKind::Fastball, &config);
            assert!(fb.length() <= config.break_magnitude * config.fastball_break_scale * 1.2);
            let drop = break_for(&mut rng, PitchKind::Drop, &config);
            assert!(drop.y < 0.0);
            let curve = break_for(&mut rng, PitchKind::Curve, &config);
            assert!(curve.x.abs() <= config.break_magnitude * config.curve_lateral_scale);
        }
    }

    #[test]
    fn test_zero_weights_throw_fastballs() {
        let config = PitchConfig {
            fastball_weight: 0.0,
            curve_weight: 0.0,
            drop_weight: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(choose_kind(&mut rng, &config), PitchKind::Fastball);
    }

    #[test]
    fn test_unbroken_pitch_crosses_near_target() {
        // With break disabled and no damping, ballistic flight should cross the aim point
        let config = PitchConfig {
            break_magnitude: 0.0,
            ..Default::default()
        };
        let z = zone();
        let mut rng = Pcg32::seed_from_u64(11);
        let p = generate_pitch(&mut rng, &config, &z, SPAWN, GRAVITY);
        let t = (p.target.z - SPAWN.z) / p.velocity.z;
        let y = SPAWN.y + p.velocity.y * t + 0.5 * GRAVITY * t * t;
        let x = SPAWN.x + p.velocity.x * t;
        assert!((y - p.target.y).abs() < 1e-3);
        assert!((x - p.target.x).abs() < 1e-3);
    }
}
