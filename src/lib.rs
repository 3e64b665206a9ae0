//! Trail Runner - headless simulation core for an endless corridor runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trail buffer, effects, world streaming)
//! - `config`: Data-driven tuning, validated at startup
//!
//! The environment owns rendering, input, and collision detection; it feeds
//! the runner's pose and trigger events in through [`sim::TickInput`] and
//! reads the trail polyline and gate display payloads back out.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};

use glam::Vec3;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Trail target length never clamps below this
    pub const MIN_TRAIL_LENGTH: f32 = 1.0;

    /// Tolerance for exact-length trims
    pub const TRIM_EPSILON: f32 = 1e-4;

    /// Gate payloads render translucent
    pub const GATE_ALPHA: f32 = 0.5;

    /// Height above the corridor floor at which gates sit
    pub const GATE_HEIGHT: f32 = 2.0;
}

/// Lateral axis for a given forward direction (up × forward, normalized)
#[inline]
pub fn right_axis(forward: Vec3) -> Vec3 {
    Vec3::Y.cross(forward).normalize_or_zero()
}
