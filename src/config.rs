//! Simulation tuning
//!
//! Every knob the environment supplies at startup. Values are constant after
//! validation; nothing in `sim` reads ambient globals or re-reads config at
//! runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::color::Rgba;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("gate value range is inverted: min {min} > max {max}")]
    InvalidGateValueRange { min: i32, max: i32 },
    #[error("gates-per-segment range is inverted: min {min} > max {max}")]
    InvalidGateCountRange { min: u32, max: u32 },
    #[error("segment length must be positive (got {0})")]
    NonPositiveSegmentLength(f32),
    #[error("gate edge margin {margin} leaves no interior in a segment of length {segment_length}")]
    MarginTooWide { margin: f32, segment_length: f32 },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// All tunables for one simulation instance.
///
/// Defaults mirror the reference tuning: a 5-unit trail through 50-unit
/// segments, a 100-unit streaming window each way, and up to 3 gates per
/// segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // Trail
    pub initial_trail_length: f32,
    /// Minimum head travel before a new trail point is appended
    pub min_add_distance: f32,
    pub initial_color: Rgba,

    // Wave effect (post-strafe lateral ripple)
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub wave_decay_rate: f32,

    // Color sweep
    pub color_transition_speed: f32,

    // Growth/shrink pulse markers
    pub pulse_speed: f32,
    pub pulse_scale: f32,

    // Gate display easing (units: fraction per second toward target)
    pub gate_display_ease_rate: f32,

    // Streaming window
    pub segment_length: f32,
    pub spawn_ahead_distance: f32,
    pub destroy_behind_distance: f32,
    pub min_gates_per_segment: u32,
    pub max_gates_per_segment: u32,
    pub min_gate_value: i32,
    pub max_gate_value: i32,
    pub color_gate_chance: f32,
    /// Gates spawn at a lateral offset within ±this
    pub gate_lateral_extent: f32,
    /// Gates keep this much forward distance from both segment edges
    pub gate_edge_margin: f32,

    // Pool capacities per entity kind
    pub segment_pool_capacity: usize,
    pub length_gate_pool_capacity: usize,
    pub color_gate_pool_capacity: usize,

    // Projectiles
    pub shoot_interval: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,

    /// Seed for all procedural decisions (gate counts, placement, payloads)
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_trail_length: 5.0,
            min_add_distance: 0.5,
            initial_color: Rgba::WHITE,
            wave_amplitude: 0.3,
            wave_frequency: 2.0,
            wave_decay_rate: 2.0,
            color_transition_speed: 2.0,
            pulse_speed: 10.0,
            pulse_scale: 2.0,
            gate_display_ease_rate: 5.0,
            segment_length: 50.0,
            spawn_ahead_distance: 100.0,
            destroy_behind_distance: 100.0,
            min_gates_per_segment: 0,
            max_gates_per_segment: 3,
            min_gate_value: -10,
            max_gate_value: 10,
            color_gate_chance: 0.2,
            gate_lateral_extent: 3.0,
            gate_edge_margin: 10.0,
            segment_pool_capacity: 10,
            length_gate_pool_capacity: 50,
            color_gate_pool_capacity: 50,
            shoot_interval: 0.5,
            projectile_speed: 20.0,
            projectile_lifetime: 5.0,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Fail fast on inverted or degenerate ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_gate_value > self.max_gate_value {
            return Err(ConfigError::InvalidGateValueRange {
                min: self.min_gate_value,
                max: self.max_gate_value,
            });
        }
        if self.min_gates_per_segment > self.max_gates_per_segment {
            return Err(ConfigError::InvalidGateCountRange {
                min: self.min_gates_per_segment,
                max: self.max_gates_per_segment,
            });
        }
        if self.segment_length <= 0.0 {
            return Err(ConfigError::NonPositiveSegmentLength(self.segment_length));
        }
        if self.gate_edge_margin * 2.0 >= self.segment_length {
            return Err(ConfigError::MarginTooWide {
                margin: self.gate_edge_margin,
                segment_length: self.segment_length,
            });
        }
        Ok(())
    }

    /// Load and validate a config from JSON.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_gate_value_range_fails_fast() {
        let config = SimConfig {
            min_gate_value: 5,
            max_gate_value: -5,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGateValueRange { min: 5, max: -5 })
        ));
    }

    #[test]
    fn test_inverted_gate_count_range_fails_fast() {
        let config = SimConfig {
            min_gates_per_segment: 4,
            max_gates_per_segment: 1,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGateCountRange { .. })
        ));
    }

    #[test]
    fn test_margin_must_fit_segment() {
        let config = SimConfig {
            segment_length: 10.0,
            gate_edge_margin: 5.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MarginTooWide { .. })));
    }

    #[test]
    fn test_from_json_roundtrip() {
        let config = SimConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = SimConfig::from_json(&json).unwrap();
        assert_eq!(parsed.segment_length, config.segment_length);
        assert_eq!(parsed.seed, config.seed);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let parsed = SimConfig::from_json(r#"{"seed": 7, "segment_length": 25.0}"#).unwrap();
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.segment_length, 25.0);
        assert_eq!(parsed.max_gates_per_segment, 3);
    }
}
