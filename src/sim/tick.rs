//! Fixed timestep simulation tick
//!
//! Order per tick: input -> pitch schedule -> world step -> swing/contact ->
//! landing -> pitch lifecycle.

use glam::{Vec2, Vec3};

use super::contact::{ContactSample, resolve_contact};
use super::impulse::{apply_contact, exit_velocity_mph, launch_impulse};
use super::pitch::generate_pitch;
use super::state::{PitchPhase, ResultLabel, SimEvent, SimState};
use super::swing::{SwingPhase, SwingStep, sweet_spot};
use super::world::RigidBodyWorld;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer movement since the last tick (pixels, screen y down)
    pub pointer_delta: Vec2,
    /// Cursor raycast onto the zone plane, as a zone offset (meters)
    pub pci_target: Option<Vec2>,
    /// Swing trigger (key/button press)
    pub swing: bool,
    /// Abandon the current pitch and schedule a new one
    pub reset: bool,
    /// Demo mode - AI aims and swings
    pub auto_bat: bool,
}

/// Advance the simulation by one fixed timestep
pub fn tick<W: RigidBodyWorld>(state: &mut SimState<W>, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    let now = state.time_ms();

    let mut input = input.clone();
    if input.auto_bat {
        auto_bat(state, &mut input);
    }

    // --- INPUT ---
    let zone = state.zone;
    if input.pointer_delta != Vec2::ZERO {
        let sensitivity = state.settings.swing.pointer_sensitivity;
        let delta = Vec2::new(input.pointer_delta.x, -input.pointer_delta.y) * sensitivity;
        state.pci.nudge(&zone, delta);
    }
    if let Some(target) = input.pci_target {
        state.pci.set(&zone, target);
    }
    if input.reset {
        log::debug!("Pitch reset requested");
        state.reset_pitch(now);
    }
    if input.swing {
        let in_flight = state.pitch_in_flight() && !state.tracker.ball_was_hit;
        if state.swing.try_trigger(now, in_flight, &state.settings.swing) {
            log::debug!("Swing at {now:.0} ms");
        }
    }

    // --- PITCH SCHEDULE ---
    if let PitchPhase::Scheduled { launch_at_ms } = state.pitch_phase {
        if now >= launch_at_ms {
            launch_pitch(state);
        }
    }

    // --- PHYSICS ---
    state.world.step(dt);

    // --- SWING / CONTACT ---
    let step = state
        .swing
        .advance(now, state.settings.swing.duration_ms, &state.timeline);
    if state.swing.wants_contact(step) {
        try_contact(state, step);
    }
    if state.swing.take_queued_miss() {
        state.stats.record_miss();
        state.emit_result(ResultLabel::Miss, None);
        log::info!("Swing and a miss");
    }

    // --- LANDING ---
    let home = state.settings.field.home_plate;
    let landing = state.tracker.poll(
        state.world.ball(),
        state.world.contacts(),
        home,
        &state.settings.outcome,
        &mut state.stats,
    );
    if let Some(landing) = landing {
        state.emit_result(landing.outcome.into(), None);
        state.pitch_phase = PitchPhase::Resolved {
            reset_at_ms: now + state.settings.outcome.result_hold_ms,
        };
    }

    // --- LIFECYCLE ---
    let expired = match state.pitch_phase {
        PitchPhase::Scheduled { .. } => false,
        PitchPhase::InFlight => out_of_play(state),
        PitchPhase::Resolved { reset_at_ms } => now >= reset_at_ms || out_of_play(state),
    };
    // Let a swing at this pitch finish (and grade its miss) before moving on
    if expired && !state.swing.active {
        state.reset_pitch(now);
    }
}

/// Release the ball with a freshly generated pitch
fn launch_pitch<W: RigidBodyWorld>(state: &mut SimState<W>) {
    let spawn = state.settings.field.pitch_spawn;
    let gravity = state.world.gravity().y;
    let pitch = generate_pitch(&mut state.rng, &state.settings.pitch, &state.zone, spawn, gravity);

    state.world.ball_mut().launch(spawn, pitch.velocity, pitch.spin);
    state.pitch_phase = PitchPhase::InFlight;
    state.last_pitch = Some(pitch);
    state.stats.pitches += 1;
    state.emit(SimEvent::PitchLaunched {
        kind: pitch.kind,
        speed: pitch.speed,
    });
    log::info!(
        "Pitch {}: {} at {:.1} m/s",
        state.stats.pitches,
        pitch.kind.as_str(),
        pitch.speed
    );
}

/// Poll the contact resolver once; on success latch, launch, and report
fn try_contact<W: RigidBodyWorld>(state: &mut SimState<W>, step: SwingStep) {
    if !state.pitch_in_flight() || state.tracker.ball_was_hit {
        return;
    }
    let SwingStep::Active { t, .. } = step else {
        return;
    };

    let pci_world = state.pci_world();
    let sample = ContactSample {
        ball: state.world.ball().pos,
        pci_world,
        zone_z: state.zone.plane_z(),
        sweet_spot: state
            .settings
            .swing
            .bat
            .map(|bat| sweet_spot(pci_world, t, &state.timeline, &bat)),
    };
    let Some(contact) = resolve_contact(&sample, &state.settings.contact) else {
        return;
    };

    state.swing.mark_resolved();
    let aim = state.pci.normalized(&state.zone);
    let impulse = launch_impulse(
        contact.quality,
        aim,
        contact.timing_precision,
        &state.settings.impulse,
    );
    apply_contact(
        &mut state.world,
        impulse,
        state.settings.impulse.max_pre_contact_speed,
    );
    state.tracker.mark_hit();
    state.contact = Some(contact);

    let exit_velocity = exit_velocity_mph(state.world.ball().vel);
    state.emit_result(contact.quality.into(), Some(exit_velocity));
    log::debug!(
        "{} contact: timing {:.3} m, aim {:.3} m, exit {:.1} mph",
        contact.quality.as_str(),
        contact.timing_distance,
        contact.pci_distance,
        exit_velocity
    );
}

/// Ball left the playable volume or came to rest
fn out_of_play<W: RigidBodyWorld>(state: &SimState<W>) -> bool {
    let field = &state.settings.field;
    let ball = state.world.ball();
    let rel = ball.pos - field.home_plate;
    let resting = ball.pos.y <= ball.radius + 1e-3 && ball.speed() < 0.1;

    rel.z > field.behind_z
        || rel.z < -field.max_depth
        || rel.x.abs() > field.max_lateral
        || ball.pos.y < field.floor_y
        || resting
}

/// Time (s) and position at which the current pitch reaches the zone plane
fn plane_crossing<W: RigidBodyWorld>(state: &SimState<W>) -> Option<(f32, Vec3)> {
    let ball = state.world.ball();
    if !state.pitch_in_flight() || ball.vel.z <= 0.0 {
        return None;
    }
    let t = (state.zone.plane_z() - ball.pos.z) / ball.vel.z;
    if t < 0.0 {
        return None;
    }
    let pos = ball.pos + ball.vel * t + 0.5 * state.world.gravity() * t * t;
    Some((t, pos))
}

/// Predicted position where the current pitch crosses the zone plane
pub fn predicted_crossing<W: RigidBodyWorld>(state: &SimState<W>) -> Option<Vec3> {
    plane_crossing(state).map(|(_, pos)| pos)
}

/// Demo batter: aim at the predicted plane crossing and time the swing so
/// the contact window opens as the ball arrives (mid-window with a bat,
/// when the sweet spot sweeps through the PCI)
fn auto_bat<W: RigidBodyWorld>(state: &SimState<W>, input: &mut TickInput) {
    if state.tracker.ball_was_hit || state.swing.used_this_pitch {
        return;
    }
    let Some((time_to_plane, crossing)) = plane_crossing(state) else {
        return;
    };

    // Oscillating error so the demo produces a spread of grades
    let phase = state.time_ticks as f32 * 0.013;
    let aim_error = Vec2::new(phase.sin(), (phase * 0.7).cos()) * 0.12;
    let timing_error_ms = (phase * 1.3).sin() as f64 * 25.0;

    let offset = Vec2::new(crossing.x - state.zone.center.x, crossing.y - state.zone.center.y);
    input.pci_target = Some(offset + aim_error);

    let swing = &state.settings.swing;
    let contact_at = if swing.bat.is_some() {
        state.timeline.window_mid()
    } else {
        state.timeline.span(SwingPhase::Contact).start
    };
    let lead_ms = swing.duration_ms * contact_at as f64 + timing_error_ms;
    if time_to_plane as f64 * 1000.0 <= lead_ms {
        input.swing = true;
    }
}
