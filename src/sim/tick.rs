//! Fixed timestep simulation tick
//!
//! Advances the whole sim by one step. The phase order keeps the trail
//! buffer single-writer: external events first, then the head append, then
//! the wave/color overlays, then the exact-length trim, and only afterwards
//! the cosmetic tasks and the streaming pass.

use glam::Vec3;

use super::state::SimState;

/// External inputs for a single tick. The environment owns motion and
/// collision detection; the sim just consumes the results.
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Runner world position this tick
    pub position: Vec3,
    /// Runner forward direction (normalized here if it isn't)
    pub forward: Vec3,
    /// Signed lateral direction of a strafe that just ended, if any
    pub strafe_stop: Option<f32>,
    /// Gates the runner passed through this tick
    pub gate_triggers: Vec<u32>,
    /// Projectile hits on gates: (projectile id, gate id)
    pub projectile_hits: Vec<(u32, u32)>,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
            strafe_stop: None,
            gate_triggers: Vec::new(),
            projectile_hits: Vec::new(),
        }
    }
}

/// Advance the simulation by one fixed timestep.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.head_position = input.position;
    let forward = input.forward.normalize_or_zero();
    if forward != Vec3::ZERO {
        state.forward = forward;
    }

    // 1. External events. Gate payloads may move the length target or start
    // a color sweep; consumed gates go straight back to their pools.
    if let Some(direction) = input.strafe_stop {
        state.effects.trigger_wave(direction);
    }
    for &(projectile_id, gate_id) in &input.projectile_hits {
        state.launcher.retire(projectile_id);
        if let Some(gate) = state.world.gate_mut(gate_id) {
            gate.on_shot();
        }
    }
    for &gate_id in &input.gate_triggers {
        if let Some(kind) = state.world.consume_gate(gate_id) {
            log::debug!("gate {gate_id} triggered: {kind:?}");
            state.apply_gate(kind);
        }
    }

    // 2. Head append once the runner has moved past the add threshold
    if state.head_position.distance(state.last_added) >= state.config.min_add_distance {
        let color = state.effects.current_color();
        state.trail.append(state.head_position, color);
        state.last_added = state.head_position;
    }

    // 3. Wave and color overlays across the buffer
    state
        .effects
        .tick_overlays(dt, &mut state.trail, state.forward);

    // 4. Exact-length trim
    state.trail.trim_to_target();

    // 5. Cosmetic tasks, after the trim so they never see mid-trim geometry
    state.effects.tick_pulses(dt);
    state
        .launcher
        .tick(dt, state.head_position, state.forward);

    // 6. Streaming window around the new runner position
    state.world.tick(state.head_position.z, dt);
}
