//! Simulation state
//!
//! Everything mutable lives in one owned [`SimState`]; `tick` is its only
//! mutator.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::contact::{Contact, ContactQuality};
use super::outcome::{LandingOutcome, OutcomeTracker, SessionStats};
use super::pitch::{Pitch, PitchKind};
use super::swing::{Swing, SwingTimeline};
use super::world::{BallWorld, RigidBodyWorld};
use super::zone::{Pci, PciTier, StrikeZone};
use crate::settings::Settings;
use crate::{lerp, ticks_to_ms};

/// Labels on the result stream consumed by HUD and audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultLabel {
    Miss,
    Weak,
    Good,
    Perfect,
    Foul,
    Fair,
    HomeRun,
}

impl From<ContactQuality> for ResultLabel {
    fn from(quality: ContactQuality) -> Self {
        match quality {
            ContactQuality::Miss => ResultLabel::Miss,
            ContactQuality::Weak => ResultLabel::Weak,
            ContactQuality::Good => ResultLabel::Good,
            ContactQuality::Perfect => ResultLabel::Perfect,
        }
    }
}

impl From<LandingOutcome> for ResultLabel {
    fn from(outcome: LandingOutcome) -> Self {
        match outcome {
            LandingOutcome::Foul => ResultLabel::Foul,
            LandingOutcome::Fair => ResultLabel::Fair,
            LandingOutcome::HomeRun => ResultLabel::HomeRun,
        }
    }
}

/// One entry on the result stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultEvent {
    pub label: ResultLabel,
    /// Post-contact ball speed (mph), for contact grades only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_velocity: Option<f32>,
}

/// Events emitted during a tick (drained by the presentation layer)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    PitchLaunched { kind: PitchKind, speed: f32 },
    Result(ResultEvent),
}

/// Where the current pitch is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PitchPhase {
    /// Ball parked at the spawn point until `launch_at_ms`
    Scheduled { launch_at_ms: f64 },
    /// Ball released and live
    InFlight,
    /// Batted ball has landed; next cycle starts at `reset_at_ms` at the latest
    Resolved { reset_at_ms: f64 },
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct SimState<W: RigidBodyWorld = BallWorld> {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    pub zone: StrikeZone,
    pub timeline: SwingTimeline,
    pub pci: Pci,
    pub swing: Swing,
    pub tracker: OutcomeTracker,
    pub pitch_phase: PitchPhase,
    /// Most recent pitch generated
    pub last_pitch: Option<Pitch>,
    /// Contact resolved for the current pitch, if any
    pub contact: Option<Contact>,
    pub stats: SessionStats,
    pub world: W,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<SimEvent>,
}

impl SimState<BallWorld> {
    /// Create a session with the built-in ball world
    pub fn new(seed: u64, settings: Settings) -> Self {
        let world = BallWorld::new(&settings.field);
        Self::with_world(seed, settings, world)
    }
}

impl<W: RigidBodyWorld> SimState<W> {
    /// Create a session driving an external physics world
    pub fn with_world(seed: u64, settings: Settings, world: W) -> Self {
        let settings = settings.sanitized();
        let zone = StrikeZone::from_field(&settings.field);
        let timeline = SwingTimeline::from_config(&settings.swing);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            zone,
            timeline,
            pci: Pci::default(),
            swing: Swing::default(),
            tracker: OutcomeTracker::default(),
            pitch_phase: PitchPhase::Scheduled { launch_at_ms: 0.0 },
            last_pitch: None,
            contact: None,
            stats: SessionStats::default(),
            world,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.park_ball();
        state.schedule_next_pitch(0.0);
        state
    }

    /// Monotonic simulation time (ms)
    #[inline]
    pub fn time_ms(&self) -> f64 {
        ticks_to_ms(self.time_ticks)
    }

    pub fn pitch_in_flight(&self) -> bool {
        self.pitch_phase == PitchPhase::InFlight
    }

    /// Ball position and orientation for rendering
    pub fn ball_pose(&self) -> (Vec3, Quat) {
        let ball = self.world.ball();
        (ball.pos, ball.rotation)
    }

    pub fn pci_world(&self) -> Vec3 {
        self.pci.world(&self.zone)
    }

    /// PCI color tier; `Far` unless an unhit pitch is in flight
    pub fn pci_tier(&self) -> PciTier {
        if !self.pitch_in_flight() || self.tracker.ball_was_hit {
            return PciTier::Far;
        }
        self.pci
            .tier(&self.zone, self.world.ball().pos, &self.settings.contact)
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub(crate) fn emit_result(&mut self, label: ResultLabel, exit_velocity: Option<f32>) {
        self.emit(SimEvent::Result(ResultEvent {
            label,
            exit_velocity,
        }));
    }

    /// Swap tunables (difficulty change); restarts the pitch cycle
    ///
    /// Rigid-body tunables stay with the world it was built with.
    pub fn set_settings(&mut self, settings: Settings) {
        // Grade a ball still in the air under the rules it was hit under
        self.settle_hit();
        self.settings = settings.sanitized();
        self.zone = StrikeZone::from_field(&self.settings.field);
        self.timeline = SwingTimeline::from_config(&self.settings.swing);
        self.pci.reclamp(&self.zone);
        log::info!("Settings changed to {}", self.settings.difficulty.as_str());
        let now = self.time_ms();
        self.reset_pitch(now);
    }

    /// Clear all per-pitch state and schedule the next launch
    ///
    /// A batted ball that has not come down yet is graded where it is first.
    pub fn reset_pitch(&mut self, now_ms: f64) {
        self.settle_hit();
        self.swing.reset_for_pitch();
        self.tracker.reset();
        self.contact = None;
        self.park_ball();
        self.schedule_next_pitch(now_ms);
    }

    fn settle_hit(&mut self) {
        let landing = self.tracker.finish(
            self.world.ball(),
            self.settings.field.home_plate,
            &self.settings.outcome,
            &mut self.stats,
        );
        if let Some(landing) = landing {
            self.emit_result(landing.outcome.into(), None);
        }
    }

    fn park_ball(&mut self) {
        let spawn = self.settings.field.pitch_spawn;
        self.world.ball_mut().park(spawn);
    }

    /// Pick a random delay and overwrite any pending launch
    fn schedule_next_pitch(&mut self, now_ms: f64) {
        let o = &self.settings.outcome;
        let (min, max) = (o.pitch_delay_min_ms, o.pitch_delay_max_ms);
        let delay = lerp(min as f32, max as f32, self.rng.random::<f32>()) as f64;
        self.pitch_phase = PitchPhase::Scheduled {
            launch_at_ms: now_ms + delay,
        };
        log::debug!("Next pitch in {delay:.0} ms");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_schedules_first_pitch() {
        let state = SimState::new(42, Settings::default());
        let o = &state.settings.outcome;
        match state.pitch_phase {
            PitchPhase::Scheduled { launch_at_ms } => {
                assert!(launch_at_ms >= o.pitch_delay_min_ms);
                assert!(launch_at_ms <= o.pitch_delay_max_ms);
            }
            other => panic!("unexpected phase {other:?}"),
        }
        assert!(!state.world.ball().active);
        assert_eq!(state.ball_pose().0, state.settings.field.pitch_spawn);
        assert_eq!(state.pci_tier(), PciTier::Far);
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let a = SimState::new(7, Settings::default());
        let b = SimState::new(7, Settings::default());
        assert_eq!(a.pitch_phase, b.pitch_phase);
    }

    #[test]
    fn test_result_labels_serialize_screaming() {
        let json = serde_json::to_string(&ResultEvent {
            label: ResultLabel::HomeRun,
            exit_velocity: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"label":"HOME_RUN"}"#);
    }

    #[test]
    fn test_set_settings_reclamps_pci() {
        let mut state = SimState::new(1, Settings::default());
        let zone = state.zone;
        state.pci.set(&zone, glam::Vec2::new(0.6, 0.75));

        let mut smaller = Settings::default();
        smaller.field.zone_width = 0.6;
        smaller.field.zone_height = 0.8;
        state.set_settings(smaller);
        assert_eq!(state.pci.offset(), glam::Vec2::new(0.3, 0.4));
    }
}
