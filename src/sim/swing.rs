//! Swing timing state machine
//!
//! A swing runs for a fixed duration once triggered. Its normalized progress
//! `t` is mapped onto a small phase table; only the `Contact` phase polls the
//! contact resolver.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::settings::{BatConfig, SwingConfig};

/// Swing phases in the order they occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingPhase {
    /// Bat loading back, too early to hit anything
    Load,
    /// Contact-eligible window
    Contact,
    /// Bat past the plate
    FollowThrough,
}

/// One row of the phase table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpan {
    pub phase: SwingPhase,
    pub start: f32,
    pub end: f32,
    /// Whether `t == end` still belongs to this phase
    pub inclusive_end: bool,
}

impl PhaseSpan {
    fn contains(&self, t: f32) -> bool {
        t >= self.start && (t < self.end || (self.inclusive_end && t <= self.end))
    }
}

/// Phase boundaries for one swing configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingTimeline {
    pub spans: [PhaseSpan; 3],
}

impl SwingTimeline {
    pub fn new(window_start: f32, window_end: f32) -> Self {
        let start = window_start.clamp(0.0, 1.0);
        let end = window_end.clamp(start, 1.0);
        Self {
            spans: [
                PhaseSpan {
                    phase: SwingPhase::Load,
                    start: 0.0,
                    end: start,
                    inclusive_end: false,
                },
                PhaseSpan {
                    phase: SwingPhase::Contact,
                    start,
                    end,
                    inclusive_end: true,
                },
                PhaseSpan {
                    phase: SwingPhase::FollowThrough,
                    start: end,
                    end: 1.0,
                    inclusive_end: true,
                },
            ],
        }
    }

    pub fn from_config(config: &SwingConfig) -> Self {
        Self::new(config.window_start, config.window_end)
    }

    /// Phase at normalized progress `t` (clamped to [0, 1])
    pub fn phase_at(&self, t: f32) -> SwingPhase {
        let t = t.clamp(0.0, 1.0);
        self.spans
            .iter()
            .find(|span| span.contains(t))
            .map(|span| span.phase)
            .unwrap_or(SwingPhase::FollowThrough)
    }

    pub fn span(&self, phase: SwingPhase) -> PhaseSpan {
        match phase {
            SwingPhase::Load => self.spans[0],
            SwingPhase::Contact => self.spans[1],
            SwingPhase::FollowThrough => self.spans[2],
        }
    }

    /// Middle of the contact window
    pub fn window_mid(&self) -> f32 {
        let contact = self.span(SwingPhase::Contact);
        (contact.start + contact.end) * 0.5
    }
}

/// Result of advancing a swing by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwingStep {
    Idle,
    Active { t: f32, phase: SwingPhase },
    /// The swing just completed this tick
    Finished,
}

/// Per-pitch swing state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swing {
    pub active: bool,
    pub start_ms: f64,
    pub cooldown_until_ms: f64,
    pub used_this_pitch: bool,
    pub contact_resolved: bool,
    /// Set when a swing finishes without contact, cleared when consumed
    pub miss_queued: bool,
}

impl Swing {
    /// Start a swing if every guard allows it; rejected triggers change nothing
    pub fn try_trigger(&mut self, now_ms: f64, pitch_in_flight: bool, config: &SwingConfig) -> bool {
        if now_ms < self.cooldown_until_ms {
            log::trace!("Swing ignored: cooling down for {:.0} ms", self.cooldown_until_ms - now_ms);
            return false;
        }
        if self.active {
            log::trace!("Swing ignored: already swinging");
            return false;
        }
        if self.used_this_pitch {
            log::trace!("Swing ignored: already swung at this pitch");
            return false;
        }
        if config.require_pitch_in_flight && !pitch_in_flight {
            log::trace!("Swing ignored: no pitch in flight");
            return false;
        }

        self.active = true;
        self.start_ms = now_ms;
        self.cooldown_until_ms = now_ms + config.cooldown_ms;
        self.used_this_pitch = true;
        self.contact_resolved = false;
        self.miss_queued = false;
        true
    }

    /// Normalized progress of the active swing
    pub fn progress(&self, now_ms: f64, duration_ms: f64) -> Option<f32> {
        if !self.active {
            return None;
        }
        let elapsed = (now_ms - self.start_ms).max(0.0);
        Some((elapsed / duration_ms.max(1.0)) as f32)
    }

    /// Advance to `now_ms`; finishing without contact queues a miss
    pub fn advance(&mut self, now_ms: f64, duration_ms: f64, timeline: &SwingTimeline) -> SwingStep {
        let Some(t) = self.progress(now_ms, duration_ms) else {
            return SwingStep::Idle;
        };
        if t >= 1.0 {
            self.active = false;
            if !self.contact_resolved {
                self.miss_queued = true;
            }
            return SwingStep::Finished;
        }
        SwingStep::Active {
            t,
            phase: timeline.phase_at(t),
        }
    }

    /// Whether the resolver should be polled for this step
    pub fn wants_contact(&self, step: SwingStep) -> bool {
        !self.contact_resolved
            && matches!(
                step,
                SwingStep::Active {
                    phase: SwingPhase::Contact,
                    ..
                }
            )
    }

    /// Latch the first successful contact for this pitch
    pub fn mark_resolved(&mut self) {
        self.contact_resolved = true;
        self.miss_queued = false;
    }

    /// Consume a queued miss
    pub fn take_queued_miss(&mut self) -> bool {
        std::mem::take(&mut self.miss_queued)
    }

    /// Clear per-pitch flags; cooldown persists
    ///
    /// A swing still in progress runs out its duration but can no longer
    /// hit or miss anything.
    pub fn reset_for_pitch(&mut self) {
        self.contact_resolved = self.active;
        self.used_this_pitch = false;
        self.miss_queued = false;
    }
}

/// Bat sweet spot at swing progress `t`
///
/// The sweet spot sweeps a horizontal arc around a pivot beside the PCI and
/// passes exactly through the PCI at the middle of the contact window; early
/// in the window it trails behind the plate (+z), late it is out front (-z).
pub fn sweet_spot(pci_world: Vec3, t: f32, timeline: &SwingTimeline, bat: &BatConfig) -> Vec3 {
    let contact = timeline.span(SwingPhase::Contact);
    let width = (contact.end - contact.start).max(1e-3);
    let yaw = (timeline.window_mid() - t) / width * bat.sweep;
    let pivot = pci_world + Vec3::X * bat.radius;
    pivot + Vec3::new(-yaw.cos(), 0.0, yaw.sin()) * bat.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SwingConfig {
        SwingConfig::default()
    }

    fn timeline() -> SwingTimeline {
        SwingTimeline::from_config(&config())
    }

    #[test]
    fn test_phase_table() {
        let tl = timeline();
        assert_eq!(tl.phase_at(0.0), SwingPhase::Load);
        assert_eq!(tl.phase_at(0.21), SwingPhase::Load);
        assert_eq!(tl.phase_at(0.22), SwingPhase::Contact);
        assert_eq!(tl.phase_at(0.5), SwingPhase::Contact);
        assert_eq!(tl.phase_at(0.74), SwingPhase::Contact);
        assert_eq!(tl.phase_at(0.75), SwingPhase::FollowThrough);
        assert_eq!(tl.phase_at(1.0), SwingPhase::FollowThrough);
        assert!((tl.window_mid() - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_full_swing_without_contact_queues_miss() {
        let cfg = config();
        let tl = timeline();
        let mut swing = Swing::default();
        assert!(swing.try_trigger(1000.0, true, &cfg));

        let mut saw_contact_phase = false;
        let mut now = 1000.0;
        loop {
            now += 1000.0 / 120.0;
            match swing.advance(now, cfg.duration_ms, &tl) {
                SwingStep::Active { phase, .. } => {
                    if phase == SwingPhase::Contact {
                        saw_contact_phase = true;
                    }
                }
                SwingStep::Finished => break,
                SwingStep::Idle => panic!("swing went idle without finishing"),
            }
        }
        assert!(saw_contact_phase);
        assert!(!swing.active);
        assert!(swing.take_queued_miss());
        assert!(!swing.take_queued_miss());
        assert_eq!(swing.advance(now + 10.0, cfg.duration_ms, &tl), SwingStep::Idle);
    }

    #[test]
    fn test_resolved_swing_queues_no_miss() {
        let cfg = config();
        let tl = timeline();
        let mut swing = Swing::default();
        assert!(swing.try_trigger(0.0, true, &cfg));
        swing.mark_resolved();
        assert_eq!(swing.advance(cfg.duration_ms, cfg.duration_ms, &tl), SwingStep::Finished);
        assert!(!swing.take_queued_miss());
    }

    #[test]
    fn test_trigger_during_cooldown_ignored() {
        let cfg = config();
        let mut swing = Swing {
            cooldown_until_ms: 5000.0,
            ..Default::default()
        };
        let before = swing.clone();
        assert!(!swing.try_trigger(4000.0, true, &cfg));
        assert_eq!(swing.active, before.active);
        assert_eq!(swing.start_ms, before.start_ms);
        assert_eq!(swing.used_this_pitch, before.used_this_pitch);
    }

    #[test]
    fn test_trigger_guards() {
        let cfg = config();
        let mut swing = Swing::default();
        // No pitch in flight
        assert!(!swing.try_trigger(0.0, false, &cfg));
        assert!(swing.try_trigger(0.0, true, &cfg));
        // Already active
        assert!(!swing.try_trigger(cfg.cooldown_ms + 1.0, true, &cfg));

        // Used this pitch, even after the swing and cooldown are over
        let tl = timeline();
        swing.advance(cfg.duration_ms + 1.0, cfg.duration_ms, &tl);
        assert!(!swing.try_trigger(cfg.cooldown_ms + 1.0, true, &cfg));

        swing.reset_for_pitch();
        assert!(swing.try_trigger(cfg.cooldown_ms + 1.0, true, &cfg));
    }

    #[test]
    fn test_reset_mid_swing_detaches_from_pitch() {
        let cfg = config();
        let tl = timeline();
        let mut swing = Swing::default();
        swing.try_trigger(0.0, true, &cfg);
        swing.reset_for_pitch();

        let step = swing.advance(cfg.duration_ms * 0.5, cfg.duration_ms, &tl);
        assert!(!swing.wants_contact(step));
        assert_eq!(swing.advance(cfg.duration_ms, cfg.duration_ms, &tl), SwingStep::Finished);
        assert!(!swing.take_queued_miss());
        assert!(!swing.used_this_pitch);
    }

    #[test]
    fn test_pitch_not_required_when_configured() {
        let cfg = SwingConfig {
            require_pitch_in_flight: false,
            ..config()
        };
        let mut swing = Swing::default();
        assert!(swing.try_trigger(0.0, false, &cfg));
    }

    #[test]
    fn test_wants_contact_only_in_window_until_resolved() {
        let cfg = config();
        let tl = timeline();
        let mut swing = Swing::default();
        swing.try_trigger(0.0, true, &cfg);

        let load = swing.advance(cfg.duration_ms * 0.1, cfg.duration_ms, &tl);
        assert!(!swing.wants_contact(load));
        let window = swing.advance(cfg.duration_ms * 0.5, cfg.duration_ms, &tl);
        assert!(swing.wants_contact(window));
        swing.mark_resolved();
        assert!(!swing.wants_contact(window));
    }

    #[test]
    fn test_sweet_spot_hits_pci_mid_window() {
        let tl = timeline();
        let bat = BatConfig::default();
        let pci = Vec3::new(0.1, 1.2, -2.0);
        let mid = sweet_spot(pci, tl.window_mid(), &tl, &bat);
        assert!((mid - pci).length() < 1e-5);

        let early = sweet_spot(pci, 0.22, &tl, &bat);
        let late = sweet_spot(pci, 0.74, &tl, &bat);
        assert!(early.z > pci.z);
        assert!(late.z < pci.z);
        assert!(((early - pci.with_x(pci.x + bat.radius)).length() - bat.radius).abs() < 1e-4);
    }
}
