//! Session tunables and difficulty presets
//!
//! Selected once at session start (optionally swapped by a difficulty
//! selector) and read-only from the simulation's point of view.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Rookie,
    #[default]
    Pro,
    AllStar,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Rookie => "Rookie",
            Difficulty::Pro => "Pro",
            Difficulty::AllStar => "All-Star",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rookie" | "easy" => Some(Difficulty::Rookie),
            "pro" | "normal" => Some(Difficulty::Pro),
            "allstar" | "all-star" | "hard" => Some(Difficulty::AllStar),
            _ => None,
        }
    }

    /// Pitch speed multiplier
    pub fn speed_scale(&self) -> f32 {
        match self {
            Difficulty::Rookie => 0.8,
            Difficulty::Pro => 1.0,
            Difficulty::AllStar => 1.15,
        }
    }

    /// Break magnitude multiplier
    pub fn break_scale(&self) -> f32 {
        match self {
            Difficulty::Rookie => 0.6,
            Difficulty::Pro => 1.0,
            Difficulty::AllStar => 1.3,
        }
    }

    /// Contact threshold multiplier (bigger = more forgiving)
    pub fn contact_scale(&self) -> f32 {
        match self {
            Difficulty::Rookie => 1.3,
            Difficulty::Pro => 1.0,
            Difficulty::AllStar => 0.8,
        }
    }

    /// Whether contact is also measured against the bat sweet spot
    pub fn models_bat(&self) -> bool {
        matches!(self, Difficulty::AllStar)
    }
}

/// Field geometry and rigid-body tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Strike zone center (world, meters)
    pub zone_center: Vec3,
    pub zone_width: f32,
    pub zone_height: f32,
    pub zone_depth: f32,
    /// Where the pitcher releases the ball
    pub pitch_spawn: Vec3,
    /// Origin of the foul lines
    pub home_plate: Vec3,
    /// Ball is out of play once it gets this far behind the batter (+z)
    pub behind_z: f32,
    /// Ball is out of play beyond this lateral distance
    pub max_lateral: f32,
    /// Ball is out of play beyond this distance downfield (-z)
    pub max_depth: f32,
    /// Ball is out of play below this height
    pub floor_y: f32,
    pub gravity: f32,
    /// Ground bounce coefficient
    pub restitution: f32,
    /// Tangential speed kept per bounce (0..1)
    pub ground_friction: f32,
    /// Fraction of rolling speed lost per second on the ground
    pub rolling_resistance: f32,
    /// Velocity damping per second while airborne
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            zone_center: Vec3::new(0.0, 1.3, -2.0),
            zone_width: 1.2,
            zone_height: 1.5,
            zone_depth: 0.4,
            pitch_spawn: Vec3::new(0.0, 1.8, -20.0),
            home_plate: Vec3::ZERO,
            behind_z: 3.0,
            max_lateral: 120.0,
            max_depth: 150.0,
            floor_y: -1.0,
            gravity: GRAVITY,
            restitution: 0.45,
            ground_friction: 0.7,
            rolling_resistance: 1.5,
            linear_damping: 0.05,
            angular_damping: 0.3,
        }
    }
}

/// Pitch generator tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Release speed range (m/s)
    pub speed_min: f32,
    pub speed_max: f32,
    /// Base break magnitude (m/s added to lateral/vertical velocity)
    pub break_magnitude: f32,
    /// Archetype draw weights
    pub fastball_weight: f32,
    pub curve_weight: f32,
    pub drop_weight: f32,
    /// Fraction of each zone half-extent the aim point may use
    pub aim_inset: f32,
    pub fastball_break_scale: f32,
    pub curve_lateral_scale: f32,
    pub drop_vertical_bias: f32,
    /// Raise the launch so an unbroken pitch crosses its aim point under gravity
    pub compensate_gravity: bool,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            speed_min: 20.0,
            speed_max: 28.0,
            break_magnitude: 0.35,
            fastball_weight: 0.45,
            curve_weight: 0.30,
            drop_weight: 0.25,
            aim_inset: 0.7,
            fastball_break_scale: 0.2,
            curve_lateral_scale: 1.8,
            drop_vertical_bias: 1.4,
            compensate_gravity: true,
        }
    }
}

/// Physical bat model used for the sweet-spot distance check
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BatConfig {
    /// Pivot-to-sweet-spot distance (m)
    pub radius: f32,
    /// Total yaw swept across the contact window (radians)
    pub sweep: f32,
}

impl Default for BatConfig {
    fn default() -> Self {
        Self {
            radius: 0.85,
            sweep: 1.6,
        }
    }
}

/// Swing timing tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingConfig {
    pub duration_ms: f64,
    /// Contact-eligible window as fractions of the swing
    pub window_start: f32,
    pub window_end: f32,
    /// Measured from the swing trigger
    pub cooldown_ms: f64,
    /// Ignore swing triggers unless a pitch is in flight
    pub require_pitch_in_flight: bool,
    /// PCI meters per pointer pixel
    pub pointer_sensitivity: f32,
    pub bat: Option<BatConfig>,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            duration_ms: 320.0,
            window_start: 0.22,
            window_end: 0.74,
            cooldown_ms: 700.0,
            require_pitch_in_flight: true,
            pointer_sensitivity: 0.0025,
            bat: None,
        }
    }
}

/// Contact resolver thresholds (meters)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Largest |ball.z - zone.z| that can still produce contact
    pub timing_tolerance: f32,
    /// How far past the zone plane the ball may be and still be hit
    pub pass_epsilon: f32,
    pub pci_outer: f32,
    pub bat_outer: f32,
    pub perfect_pci: f32,
    pub perfect_timing: f32,
    pub perfect_bat: f32,
    pub good_pci: f32,
    pub good_timing: f32,
    pub good_bat: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            timing_tolerance: 0.45,
            pass_epsilon: 0.1,
            pci_outer: 0.55,
            bat_outer: 0.6,
            perfect_pci: 0.15,
            perfect_timing: 0.12,
            perfect_bat: 0.18,
            good_pci: 0.32,
            good_timing: 0.28,
            good_bat: 0.35,
        }
    }
}

impl ContactConfig {
    fn scaled(&self, k: f32) -> Self {
        Self {
            timing_tolerance: self.timing_tolerance * k,
            pass_epsilon: self.pass_epsilon,
            pci_outer: self.pci_outer * k,
            bat_outer: self.bat_outer * k,
            perfect_pci: self.perfect_pci * k,
            perfect_timing: self.perfect_timing * k,
            perfect_bat: self.perfect_bat * k,
            good_pci: self.good_pci * k,
            good_timing: self.good_timing * k,
            good_bat: self.good_bat * k,
        }
    }
}

/// Impulse mapper tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseConfig {
    /// Base impulse per quality tier (N·s)
    pub weak: f32,
    pub good: f32,
    pub perfect: f32,
    pub lateral_gain: f32,
    pub vertical_gain: f32,
    /// Upward bias on every launch
    pub base_loft: f32,
    /// Extra loft at perfect timing
    pub timing_loft: f32,
    pub forward: f32,
    /// Forward reduction per unit of lateral aim extremity
    pub lateral_penalty: f32,
    pub base_fraction: f32,
    pub spread_fraction: f32,
    /// Pre-contact speed ceiling (m/s)
    pub max_pre_contact_speed: f32,
}

impl Default for ImpulseConfig {
    fn default() -> Self {
        Self {
            weak: 4.3,
            good: 5.8,
            perfect: 7.6,
            lateral_gain: 0.55,
            vertical_gain: 0.45,
            base_loft: 0.25,
            timing_loft: 0.2,
            forward: 1.0,
            lateral_penalty: 0.35,
            base_fraction: 0.75,
            spread_fraction: 0.25,
            max_pre_contact_speed: 40.0,
        }
    }
}

/// Landing classification and pitch lifecycle tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    /// Fair iff |lateral| <= |forward| * foul_ratio
    pub foul_ratio: f32,
    pub home_run_distance: f32,
    /// Height above the ball radius that counts as touching down
    pub landing_epsilon: f32,
    /// How long a landed ball stays in play before the next pitch cycle
    pub result_hold_ms: f64,
    pub pitch_delay_min_ms: f64,
    pub pitch_delay_max_ms: f64,
    pub score_fair: u32,
    pub score_home_run: u32,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            foul_ratio: 1.05,
            home_run_distance: 48.0,
            landing_epsilon: 0.05,
            result_hold_ms: 1500.0,
            pitch_delay_min_ms: 900.0,
            pitch_delay_max_ms: 1800.0,
            score_fair: 1,
            score_home_run: 4,
        }
    }
}

/// Preset-scaled values a settings file sets by hand
#[derive(Debug, Default)]
struct PresetOverrides {
    speed: bool,
    break_magnitude: bool,
    contact: bool,
    bat: bool,
}

impl PresetOverrides {
    fn from_json(value: &serde_json::Value) -> Self {
        let has = |section: &str, key: &str| {
            value.get(section).and_then(|s| s.get(key)).is_some()
        };
        Self {
            speed: has("pitch", "speed_min") || has("pitch", "speed_max"),
            break_magnitude: has("pitch", "break_magnitude"),
            contact: value.get("contact").is_some(),
            bat: has("swing", "bat"),
        }
    }
}

/// Complete tunable set for a session
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub pitch: PitchConfig,
    #[serde(default)]
    pub swing: SwingConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub impulse: ImpulseConfig,
    #[serde(default)]
    pub outcome: OutcomeConfig,
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset scaling)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_difficulty(difficulty);
        settings
    }

    /// Re-derive preset-dependent values from the defaults
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.apply_preset(&PresetOverrides::default());
    }

    /// Parse settings from JSON (missing sections and fields fall back to
    /// defaults)
    ///
    /// The stored `difficulty` preset is applied to every preset-scaled
    /// value the file does not set explicitly.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let mut settings = Self::deserialize(&value)?;
        settings.apply_preset(&PresetOverrides::from_json(&value));
        Ok(settings.sanitized())
    }

    fn apply_preset(&mut self, explicit: &PresetOverrides) {
        let difficulty = self.difficulty;
        let base_pitch = PitchConfig::default();
        if !explicit.speed {
            self.pitch.speed_min = base_pitch.speed_min * difficulty.speed_scale();
            self.pitch.speed_max = base_pitch.speed_max * difficulty.speed_scale();
        }
        if !explicit.break_magnitude {
            self.pitch.break_magnitude = base_pitch.break_magnitude * difficulty.break_scale();
        }
        if !explicit.contact {
            self.contact = ContactConfig::default().scaled(difficulty.contact_scale());
        }
        if !explicit.bat {
            self.swing.bat = difficulty.models_bat().then(BatConfig::default);
        }
    }

    /// Load settings from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Fix up inconsistent values so every invariant the sim relies on holds
    pub fn sanitized(mut self) -> Self {
        let p = &mut self.pitch;
        if p.speed_min > p.speed_max {
            log::warn!("speed_min > speed_max, swapping");
            std::mem::swap(&mut p.speed_min, &mut p.speed_max);
        }
        p.speed_min = p.speed_min.max(1.0);
        p.speed_max = p.speed_max.max(p.speed_min);
        p.aim_inset = p.aim_inset.clamp(0.0, 0.95);
        for w in [&mut p.fastball_weight, &mut p.curve_weight, &mut p.drop_weight] {
            *w = w.max(0.0);
        }
        if p.fastball_weight + p.curve_weight + p.drop_weight <= 0.0 {
            log::warn!("All pitch weights are zero, throwing fastballs only");
            p.fastball_weight = 1.0;
        }

        let s = &mut self.swing;
        s.window_start = s.window_start.clamp(0.0, 1.0);
        s.window_end = s.window_end.clamp(s.window_start, 1.0);
        s.duration_ms = s.duration_ms.max(1.0);
        if s.cooldown_ms < s.duration_ms {
            log::warn!("Swing cooldown shorter than swing, raising to {} ms", s.duration_ms);
            s.cooldown_ms = s.duration_ms;
        }

        let c = &mut self.contact;
        c.timing_tolerance = c.timing_tolerance.max(1e-3);
        c.pass_epsilon = c.pass_epsilon.max(0.0);
        c.good_timing = c.good_timing.min(c.timing_tolerance);
        c.perfect_timing = c.perfect_timing.min(c.good_timing);
        c.good_pci = c.good_pci.min(c.pci_outer);
        c.perfect_pci = c.perfect_pci.min(c.good_pci);
        c.good_bat = c.good_bat.min(c.bat_outer);
        c.perfect_bat = c.perfect_bat.min(c.good_bat);

        let o = &mut self.outcome;
        if o.pitch_delay_min_ms > o.pitch_delay_max_ms {
            std::mem::swap(&mut o.pitch_delay_min_ms, &mut o.pitch_delay_max_ms);
        }
        o.pitch_delay_min_ms = o.pitch_delay_min_ms.max(0.0);

        let f = &mut self.field;
        f.zone_width = f.zone_width.max(0.01);
        f.zone_height = f.zone_height.max(0.01);
        f.restitution = f.restitution.clamp(0.0, 1.0);
        f.ground_friction = f.ground_friction.clamp(0.0, 1.0);
        f.rolling_resistance = f.rolling_resistance.max(0.0);

        self
    }
}
