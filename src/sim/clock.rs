//! Fixed timestep accumulator
//!
//! Turns variable wall-clock frame deltas into a whole number of `SIM_DT`
//! ticks so contact checks run at the same temporal resolution on every
//! display.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    accumulator: f32,
    /// Total ticks emitted since creation
    pub ticks: u64,
}

impl FixedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a frame delta (seconds) and return how many ticks to run
    ///
    /// Deltas are clamped to `MAX_FRAME_DT`; anything still left over after
    /// `MAX_SUBSTEPS` ticks is dropped instead of carried into the next frame.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.1} ms of simulation time", self.accumulator * 1000.0);
            self.accumulator %= SIM_DT;
        }

        self.ticks += substeps as u64;
        substeps
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }
}
