//! Aggregate simulation state
//!
//! Owns the trail buffer, its effect overlays, the streaming world, and the
//! projectile launcher. Components are wired together here explicitly at
//! construction; nothing reaches for a global instance.

use glam::Vec3;

use super::effects::TrailEffectEngine;
use super::gate::GateKind;
use super::path::{PathBuffer, PathPoint};
use super::projectile::ProjectileLauncher;
use super::world::StreamingWorldManager;
use crate::config::{ConfigError, SimConfig};

#[derive(Debug)]
pub struct SimState {
    pub config: SimConfig,
    pub trail: PathBuffer,
    pub effects: TrailEffectEngine,
    pub world: StreamingWorldManager,
    pub launcher: ProjectileLauncher,
    pub time_ticks: u64,
    /// Runner pose, written once per tick from the environment feed
    pub(crate) head_position: Vec3,
    pub(crate) forward: Vec3,
    /// Head position at the last trail append
    pub(crate) last_added: Vec3,
}

impl SimState {
    /// Validate the config and build a fully wired simulation.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "sim init: trail {} units, segments {} units, window -{}..+{}, seed {}",
            config.initial_trail_length,
            config.segment_length,
            config.destroy_behind_distance,
            config.spawn_ahead_distance,
            config.seed,
        );
        let trail = PathBuffer::new(Vec3::ZERO, config.initial_color, config.initial_trail_length);
        let effects = TrailEffectEngine::new(&config);
        let world = StreamingWorldManager::new(&config);
        let launcher = ProjectileLauncher::new(&config);
        Ok(Self {
            config,
            trail,
            effects,
            world,
            launcher,
            time_ticks: 0,
            head_position: Vec3::ZERO,
            forward: Vec3::Z,
            last_added: Vec3::ZERO,
        })
    }

    /// Rendering sink: the trail polyline, newest point first.
    pub fn trail_points(&self) -> impl Iterator<Item = &PathPoint> {
        self.trail.points()
    }

    pub fn head_position(&self) -> Vec3 {
        self.head_position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Apply a consumed gate's payload to the trail.
    pub(crate) fn apply_gate(&mut self, kind: GateKind) {
        match kind {
            GateKind::Length { value } => self.change_length(value as f32),
            GateKind::Color { color } => self.effects.request_color(color),
        }
    }

    /// Grow or shrink the trail target, firing the matching pulse when the
    /// target actually moved.
    pub fn change_length(&mut self, delta: f32) {
        if delta > 0.0 {
            if self.trail.grow_by(delta) && self.trail.len() >= 2 {
                if let Some(head) = self.trail.head() {
                    self.effects
                        .pulse_on_grow(self.head_position, head.position, self.forward);
                }
            }
        } else if delta < 0.0 {
            let old_tail = self.trail.tail().map(|p| p.position);
            if self.trail.shrink_by(-delta) {
                // Shrinks bite immediately rather than waiting for motion
                self.trail.trim_to_target();
                if let (Some(from), Some(to)) =
                    (old_tail, self.trail.tail().map(|p| p.position))
                {
                    self.effects.pulse_on_shrink(from, to);
                }
            }
        }
    }
}
