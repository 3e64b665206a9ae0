//! Deterministic simulation module
//!
//! All runner logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod color;
pub mod effects;
pub mod gate;
pub mod path;
pub mod pool;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod world;

pub use color::Rgba;
pub use effects::{Pulse, PulseKind, TrailEffectEngine};
pub use gate::{Gate, GateDisplay, GateKind};
pub use path::{PathBuffer, PathPoint};
pub use pool::{PoolError, Poolable, ResourcePool};
pub use projectile::{Projectile, ProjectileLauncher};
pub use state::SimState;
pub use tick::{TickInput, tick};
pub use world::{Segment, StreamingWorldManager};
