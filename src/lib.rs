//! Batting Cage - swing/contact resolution core for a batting simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pitch, swing, contact, impulse, outcome)
//! - `settings`: Tunables and difficulty presets

pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings};

use glam::{Vec2, Vec3};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz keeps the contact window sampling stable)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock frame delta accepted (tab stalls, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Regulation baseball (meters, kilograms)
    pub const BALL_RADIUS: f32 = 0.0366;
    pub const BALL_MASS: f32 = 0.145;

    /// Gravity (m/s², +y is up)
    pub const GRAVITY: f32 = -9.81;

    /// m/s -> mph for exit velocity display
    pub const MPS_TO_MPH: f32 = 2.236_936;
}

/// Milliseconds elapsed after `ticks` fixed steps
#[inline]
pub fn ticks_to_ms(ticks: u64) -> f64 {
    ticks as f64 * consts::SIM_DT as f64 * 1000.0
}

/// Horizontal (ground plane) part of a 3D vector
#[inline]
pub fn ground_xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
