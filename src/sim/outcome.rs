//! Landing classification and session counters

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::world::{BallBody, BodyContact, ContactKind};
use crate::ground_xz;
use crate::settings::OutcomeConfig;

/// Where a batted ball came down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingOutcome {
    Foul,
    Fair,
    HomeRun,
}

impl LandingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandingOutcome::Foul => "FOUL",
            LandingOutcome::Fair => "FAIR",
            LandingOutcome::HomeRun => "HOME_RUN",
        }
    }
}

/// A classified landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub outcome: LandingOutcome,
    pub position: Vec3,
    /// Horizontal distance from home plate (m)
    pub distance: f32,
}

/// Classify a landing spot against the foul lines and the fence
///
/// Fair requires the ball to land downfield (-z from home) and inside the
/// foul lines: `|lateral| <= |forward| * foul_ratio`.
pub fn classify_landing(position: Vec3, home: Vec3, config: &OutcomeConfig) -> Landing {
    let rel = ground_xz(position - home);
    let lateral = rel.x;
    let forward = rel.y;
    let distance = rel.length();

    let fair = forward < 0.0 && lateral.abs() <= forward.abs() * config.foul_ratio;
    let outcome = if !fair {
        LandingOutcome::Foul
    } else if distance > config.home_run_distance {
        LandingOutcome::HomeRun
    } else {
        LandingOutcome::Fair
    };

    Landing {
        outcome,
        position,
        distance,
    }
}

/// Session counters for the scoreboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub hits: u32,
    pub homeruns: u32,
    pub fouls: u32,
    pub outs: u32,
    pub score: u32,
    /// Pitches thrown this session
    #[serde(default)]
    pub pitches: u32,
}

impl SessionStats {
    pub fn record_landing(&mut self, outcome: LandingOutcome, config: &OutcomeConfig) {
        match outcome {
            LandingOutcome::Foul => self.fouls += 1,
            LandingOutcome::Fair => {
                self.hits += 1;
                self.score += config.score_fair;
            }
            LandingOutcome::HomeRun => {
                self.hits += 1;
                self.homeruns += 1;
                self.score += config.score_home_run;
            }
        }
    }

    /// Swing and miss
    pub fn record_miss(&mut self) {
        self.outs += 1;
    }
}

/// Watches a batted ball until it first comes down
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeTracker {
    pub ball_was_hit: bool,
    pub landed: bool,
}

impl OutcomeTracker {
    pub fn mark_hit(&mut self) {
        self.ball_was_hit = true;
        self.landed = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the tracker still needs polling this pitch
    pub fn pending(&self) -> bool {
        self.ball_was_hit && !self.landed
    }

    /// Poll once per tick; returns the landing exactly once per hit ball
    ///
    /// A ground contact reported by the world counts as touching down, as
    /// does a ball at resting height that is not rising.
    pub fn poll(
        &mut self,
        ball: &BallBody,
        contacts: &[BodyContact],
        home: Vec3,
        config: &OutcomeConfig,
        stats: &mut SessionStats,
    ) -> Option<Landing> {
        if !self.pending() {
            return None;
        }
        let hit_ground = contacts.iter().any(|c| c.kind == ContactKind::Ground);
        let touching = ball.pos.y <= ball.radius + config.landing_epsilon;
        let rising = ball.vel.y > 0.0 && ball.pos.y > ball.radius;
        if !hit_ground && (!touching || rising) {
            return None;
        }

        Some(self.land(ball, home, config, stats))
    }

    /// Grade a batted ball that never came down (left the field on the fly)
    pub fn finish(
        &mut self,
        ball: &BallBody,
        home: Vec3,
        config: &OutcomeConfig,
        stats: &mut SessionStats,
    ) -> Option<Landing> {
        self.pending().then(|| self.land(ball, home, config, stats))
    }

    fn land(
        &mut self,
        ball: &BallBody,
        home: Vec3,
        config: &OutcomeConfig,
        stats: &mut SessionStats,
    ) -> Landing {
        self.landed = true;
        let landing = classify_landing(ball.pos, home, config);
        stats.record_landing(landing.outcome, config);
        log::info!(
            "{} at {:.1} m ({:.1}, {:.1})",
            landing.outcome.as_str(),
            landing.distance,
            landing.position.x,
            landing.position.z
        );
        landing
    }
}
