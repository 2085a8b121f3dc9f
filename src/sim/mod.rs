//! Deterministic simulation module
//!
//! All batting logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Physics only through the `RigidBodyWorld` contract
//! - No rendering, audio, or platform dependencies

pub mod clock;
pub mod contact;
pub mod impulse;
pub mod outcome;
pub mod pitch;
pub mod state;
pub mod swing;
pub mod tick;
pub mod world;
pub mod zone;

pub use clock::FixedClock;
pub use contact::{Contact, ContactQuality, ContactSample, resolve_contact};
pub use impulse::{apply_contact, exit_velocity_mph, launch_impulse};
pub use outcome::{Landing, LandingOutcome, OutcomeTracker, SessionStats, classify_landing};
pub use pitch::{Pitch, PitchKind, generate_pitch};
pub use state::{PitchPhase, ResultEvent, ResultLabel, SimEvent, SimState};
pub use swing::{Swing, SwingPhase, SwingStep, SwingTimeline, sweet_spot};
pub use tick::{TickInput, predicted_crossing, tick};
pub use world::{BallBody, BallWorld, BodyContact, ContactKind, RigidBodyWorld};
pub use zone::{Pci, PciTier, StrikeZone};
