//! Corridor streaming
//!
//! Keeps a moving window of pooled segments and gates around the runner:
//! segments spawn strictly ahead in increasing forward order and are
//! recycled once they fall fully behind the destroy distance. All
//! procedural decisions draw from one seeded RNG, so a given seed produces
//! the same corridor every run.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::gate::{Gate, GateKind};
use super::pool::{Poolable, ResourcePool};
use crate::config::SimConfig;
use crate::consts::GATE_HEIGHT;

/// One corridor floor piece. Purely structural: a forward-axis origin plus
/// pool membership.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Segment {
    pub position: f32,
}

impl Segment {
    /// Forward-axis range this segment covers.
    pub fn span(&self, segment_length: f32) -> (f32, f32) {
        (self.position, self.position + segment_length)
    }
}

impl Poolable for Segment {
    fn reset(&mut self) {}
}

#[derive(Debug)]
pub struct StreamingWorldManager {
    next_spawn: f32,
    next_gate_id: u32,
    segments: Vec<Segment>,
    gates: Vec<Gate>,
    segment_pool: ResourcePool<Segment>,
    length_gate_pool: ResourcePool<Gate>,
    color_gate_pool: ResourcePool<Gate>,
    rng: Pcg32,
    config: SimConfig,
}

impl StreamingWorldManager {
    pub fn new(config: &SimConfig) -> Self {
        let mut world = Self {
            next_spawn: 0.0,
            next_gate_id: 1,
            segments: Vec::new(),
            gates: Vec::new(),
            segment_pool: ResourcePool::new(config.segment_pool_capacity),
            length_gate_pool: ResourcePool::new(config.length_gate_pool_capacity),
            color_gate_pool: ResourcePool::new(config.color_gate_pool_capacity),
            rng: Pcg32::seed_from_u64(config.seed),
            config: config.clone(),
        };
        // Cover the window before the first tick
        world.fill_ahead(0.0);
        world
    }

    pub fn active_segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn active_gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate_mut(&mut self, id: u32) -> Option<&mut Gate> {
        self.gates.iter_mut().find(|g| g.id == id)
    }

    /// One streaming pass: spawn ahead, recycle behind, ease gate displays.
    pub fn tick(&mut self, runner_z: f32, dt: f32) {
        self.fill_ahead(runner_z);
        self.recycle_behind(runner_z);
        for gate in &mut self.gates {
            gate.tick_display(dt, self.config.gate_display_ease_rate);
        }
    }

    /// Spawn segments until the window ahead of the runner is covered. A
    /// loop rather than a single spawn: the runner may cross more than one
    /// segment boundary in a tick.
    fn fill_ahead(&mut self, runner_z: f32) {
        while runner_z + self.config.spawn_ahead_distance
            > self.next_spawn - self.config.segment_length
        {
            if !self.spawn_segment() {
                break;
            }
        }
    }

    fn spawn_segment(&mut self) -> bool {
        let mut segment = match self.segment_pool.acquire() {
            Ok(segment) => segment,
            Err(err) => {
                // Soft backpressure: leave next_spawn alone and retry once
                // something has been recycled.
                log::warn!("segment spawn at {} deferred: {err}", self.next_spawn);
                return false;
            }
        };
        let origin = self.next_spawn;
        segment.position = origin;
        self.next_spawn += self.config.segment_length;
        self.segments.push(segment);

        let count = self
            .rng
            .random_range(self.config.min_gates_per_segment..=self.config.max_gates_per_segment);
        for _ in 0..count {
            self.spawn_gate(origin);
        }
        log::debug!("spawned segment at {origin} with {count} gates");
        true
    }

    fn spawn_gate(&mut self, segment_origin: f32) {
        let is_color = self.rng.random::<f32>() < self.config.color_gate_chance;
        let pool = if is_color {
            &mut self.color_gate_pool
        } else {
            &mut self.length_gate_pool
        };
        let mut gate = match pool.acquire() {
            Ok(gate) => gate,
            Err(err) => {
                // Skip just this gate; the segment stands
                log::warn!("gate spawn skipped: {err}");
                return;
            }
        };
        let z = segment_origin
            + self.rng.random_range(
                self.config.gate_edge_margin
                    ..self.config.segment_length - self.config.gate_edge_margin,
            );
        let x = self
            .rng
            .random_range(-self.config.gate_lateral_extent..=self.config.gate_lateral_extent);
        let kind = if is_color {
            GateKind::Color {
                color: Rgba::from_hsv(
                    self.rng.random::<f32>(),
                    self.rng.random_range(0.5..=1.0),
                    self.rng.random_range(0.5..=1.0),
                    1.0,
                ),
            }
        } else {
            GateKind::Length {
                value: self
                    .rng
                    .random_range(self.config.min_gate_value..=self.config.max_gate_value),
            }
        };
        let id = self.next_gate_id;
        self.next_gate_id += 1;
        gate.activate(id, kind, Vec3::new(x, GATE_HEIGHT, z));
        self.gates.push(gate);
    }

    /// Release everything that has fallen behind the destroy distance.
    /// Reverse iteration: releases mutate the lists being scanned.
    fn recycle_behind(&mut self, runner_z: f32) {
        let behind = runner_z - self.config.destroy_behind_distance;
        for i in (0..self.segments.len()).rev() {
            if self.segments[i].position + self.config.segment_length < behind {
                let segment = self.segments.remove(i);
                log::debug!("recycling segment at {}", segment.position);
                self.release_segment(segment);
            }
        }
        for i in (0..self.gates.len()).rev() {
            if self.gates[i].position.z < behind {
                let gate = self.gates.remove(i);
                self.release_gate(gate);
            }
        }
    }

    /// Consume a triggered gate: deactivate it, drop it from the active
    /// list, return it to its pool. Returns the payload to apply, or None
    /// for an unknown or already-spent gate (a second trigger in the same
    /// tick finds nothing).
    pub fn consume_gate(&mut self, id: u32) -> Option<GateKind> {
        let index = self.gates.iter().position(|g| g.id == id && g.is_active())?;
        let mut gate = self.gates.remove(index);
        gate.deactivate();
        let kind = gate.kind;
        self.release_gate(gate);
        Some(kind)
    }

    fn release_segment(&mut self, segment: Segment) {
        if let Err(err) = self.segment_pool.release(segment) {
            debug_assert!(false, "segment release: {err}");
            log::warn!("segment release: {err}");
        }
    }

    fn release_gate(&mut self, gate: Gate) {
        let pool = match gate.kind {
            GateKind::Length { .. } => &mut self.length_gate_pool,
            GateKind::Color { .. } => &mut self.color_gate_pool,
        };
        if let Err(err) = pool.release(gate) {
            debug_assert!(false, "gate release: {err}");
            log::warn!("gate release: {err}");
        }
    }

    #[cfg(test)]
    fn pool_totals(&self) -> (usize, usize, usize) {
        (
            self.segment_pool.total_created(),
            self.length_gate_pool.total_created(),
            self.color_gate_pool.total_created(),
        )
    }
}
