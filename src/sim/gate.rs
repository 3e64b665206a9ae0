//! Gate obstacles
//!
//! A gate is a one-shot trigger: length gates grow or shrink the trail by
//! their (shootable) value, color gates repaint it. The two variants live in
//! a single tagged `GateKind`; dispatch is a match on the discriminator.
//! Gates are pooled: `Poolable::reset` deactivates them, and an inactive
//! gate ignores shots and triggers so a recycled instance cannot fire twice
//! in the tick it is returned.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::pool::Poolable;
use crate::consts::GATE_ALPHA;

/// Tint for non-negative length payloads
pub const POSITIVE_TINT: Rgba = Rgba::new(0.0, 1.0, 0.0, GATE_ALPHA);
/// Tint for negative length payloads
pub const NEGATIVE_TINT: Rgba = Rgba::new(1.0, 0.0, 0.0, GATE_ALPHA);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// Applies `value` to the trail's target length on trigger.
    /// Incremented by projectile hits while the gate is live.
    Length { value: i32 },
    /// Repaints the trail via a color sweep. Immutable once spawned.
    Color { color: Rgba },
}

/// Payload presentation for the environment's UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDisplay {
    pub label: String,
    pub color: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    pub kind: GateKind,
    pub position: Vec3,
    active: bool,
    display_color: Rgba,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            id: 0,
            kind: GateKind::Length { value: 0 },
            position: Vec3::ZERO,
            active: false,
            display_color: POSITIVE_TINT,
        }
    }
}

impl Poolable for Gate {
    fn reset(&mut self) {
        self.active = false;
    }
}

impl Gate {
    /// Configure a pooled instance for a fresh spawn.
    pub fn activate(&mut self, id: u32, kind: GateKind, position: Vec3) {
        self.id = id;
        self.kind = kind;
        self.position = position;
        self.active = true;
        self.display_color = self.target_color();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The collision box contract: once deactivated the gate must be inert,
    /// so a second trigger in the same tick finds nothing to do.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Color the payload renders at, before easing.
    pub fn target_color(&self) -> Rgba {
        match self.kind {
            GateKind::Length { value } => {
                if value >= 0 {
                    POSITIVE_TINT
                } else {
                    NEGATIVE_TINT
                }
            }
            GateKind::Color { color } => color.with_alpha(GATE_ALPHA),
        }
    }

    pub fn display(&self) -> GateDisplay {
        let label = match self.kind {
            GateKind::Length { value } => format!("{value:+}"),
            GateKind::Color { .. } => "Color".to_string(),
        };
        GateDisplay {
            label,
            color: self.display_color,
        }
    }

    /// Projectile hit: length gates gain one point while live.
    pub fn on_shot(&mut self) {
        if !self.active {
            return;
        }
        if let GateKind::Length { value } = &mut self.kind {
            *value += 1;
        }
    }

    /// Ease the displayed color toward the payload tint.
    pub fn tick_display(&mut self, dt: f32, ease_rate: f32) {
        self.display_color = self
            .display_color
            .lerp(self.target_color(), (dt * ease_rate).min(1.0));
    }
}
