//! Transient trail effects
//!
//! Wave, color sweep, and growth/shrink pulses overlay the trail buffer
//! without touching its length invariants. Each effect is an explicit state
//! struct advanced once per tick; completion is a predicate on
//! `elapsed`/`progress`, not a coroutine exit. At most one wave and one
//! color sweep run at a time (a new trigger replaces the old one); pulses
//! are independent fire-and-forget markers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::path::PathBuffer;
use crate::config::SimConfig;
use crate::right_axis;

/// Decaying lateral ripple fired when a strafe ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaveEffect {
    /// Signed lateral direction of the strafe that just ended
    pub direction: f32,
    pub elapsed: f32,
}

impl WaveEffect {
    /// The exponential envelope has decayed below ~5% at 3 time constants.
    fn finished(&self, decay_rate: f32) -> bool {
        self.elapsed > 3.0 / decay_rate
    }
}

/// Color sweep from tail to head.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColorTransition {
    pub target: Rgba,
    pub progress: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseKind {
    Growth,
    Shrink,
}

/// One-shot marker travelling along the trail. Purely cosmetic: it reads
/// positions at spawn time and never feeds back into the buffer.
#[derive(Debug, Clone, Copy)]
pub struct Pulse {
    pub kind: PulseKind,
    start: Vec3,
    end: Vec3,
    journey: f32,
}

impl Pulse {
    pub fn position(&self) -> Vec3 {
        self.start.lerp(self.end, self.journey.min(1.0))
    }

    /// Marker scale, easing from `base` down to 0.1 over the journey.
    pub fn scale(&self, base: f32) -> f32 {
        base + (0.1 - base) * self.journey.min(1.0)
    }
}

#[derive(Debug)]
pub struct TrailEffectEngine {
    current_color: Rgba,
    wave: Option<WaveEffect>,
    color: Option<ColorTransition>,
    pulses: Vec<Pulse>,
    wave_amplitude: f32,
    wave_frequency: f32,
    wave_decay_rate: f32,
    color_speed: f32,
    pulse_speed: f32,
    pulse_scale: f32,
}

impl TrailEffectEngine {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            current_color: config.initial_color,
            wave: None,
            color: None,
            pulses: Vec::new(),
            wave_amplitude: config.wave_amplitude,
            wave_frequency: config.wave_frequency,
            wave_decay_rate: config.wave_decay_rate,
            color_speed: config.color_transition_speed,
            pulse_speed: config.pulse_speed,
            pulse_scale: config.pulse_scale,
        }
    }

    /// Color newly appended head points should carry.
    pub fn current_color(&self) -> Rgba {
        self.current_color
    }

    pub fn wave_active(&self) -> bool {
        self.wave.is_some()
    }

    pub fn color_active(&self) -> bool {
        self.color.is_some()
    }

    pub fn pulses(&self) -> &[Pulse] {
        self.pulses.as_slice()
    }

    pub fn pulse_base_scale(&self) -> f32 {
        self.pulse_scale
    }

    /// Strafe-release: start (or restart) the lateral ripple.
    pub fn trigger_wave(&mut self, direction: f32) {
        self.wave = Some(WaveEffect {
            direction,
            elapsed: 0.0,
        });
    }

    /// Start or retarget the tail-to-head color sweep. Points already
    /// converted by an in-flight sweep keep their color; only the sweep
    /// threshold restarts.
    pub fn request_color(&mut self, target: Rgba) {
        if self.color.is_none() && target == self.current_color {
            return;
        }
        self.color = Some(ColorTransition {
            target,
            progress: 0.0,
        });
    }

    /// Growth marker: runner head toward the trail head, offset back along
    /// the forward axis.
    pub fn pulse_on_grow(&mut self, runner_head: Vec3, trail_head: Vec3, forward: Vec3) {
        self.pulses.push(Pulse {
            kind: PulseKind::Growth,
            start: runner_head,
            end: trail_head - forward * 2.0,
            journey: 0.0,
        });
    }

    /// Shrink marker: old tail toward the post-trim tail.
    pub fn pulse_on_shrink(&mut self, old_tail: Vec3, new_tail: Vec3) {
        self.pulses.push(Pulse {
            kind: PulseKind::Shrink,
            start: old_tail,
            end: new_tail,
            journey: 0.0,
        });
    }

    /// Advance the wave and color overlays across the buffer. Runs between
    /// the head append and the trim; it only displaces and recolors points,
    /// never adds or removes them.
    pub fn tick_overlays(&mut self, dt: f32, buffer: &mut PathBuffer, forward: Vec3) {
        self.tick_wave(dt, buffer, forward);
        self.tick_color(dt, buffer);
    }

    fn tick_wave(&mut self, dt: f32, buffer: &mut PathBuffer, forward: Vec3) {
        let Some(mut wave) = self.wave else {
            return;
        };
        wave.elapsed += dt;
        let count = buffer.len();
        if count >= 2 {
            let right = right_axis(forward);
            let envelope = self.wave_amplitude
                * wave.direction
                * (-wave.elapsed * self.wave_decay_rate).exp();
            for (i, point) in buffer.points_mut().enumerate() {
                // 0 at the tail, 1 at the head
                let along = (count - 1 - i) as f32 / (count - 1) as f32;
                let offset =
                    (along * self.wave_frequency + wave.elapsed * 3.0).sin() * envelope * dt;
                point.position += right * offset;
            }
        }
        self.wave = if wave.finished(self.wave_decay_rate) {
            None
        } else {
            Some(wave)
        };
    }

    fn tick_color(&mut self, dt: f32, buffer: &mut PathBuffer) {
        let Some(mut sweep) = self.color else {
            return;
        };
        sweep.progress += dt * self.color_speed;
        let count = buffer.len();
        if count > 0 {
            let span = (count.saturating_sub(1)).max(1) as f32;
            for (i, point) in buffer.points_mut().enumerate() {
                let from_tail = (count - 1 - i) as f32 / span;
                // Points ahead of the sweep keep whatever color they have,
                // so retargeting mid-sweep never reverts converted points.
                if from_tail <= sweep.progress {
                    point.color = sweep.target;
                }
            }
        }
        if sweep.progress >= 1.0 {
            self.current_color = sweep.target;
            self.color = None;
        } else {
            self.color = Some(sweep);
        }
    }

    /// Advance the cosmetic pulse markers. Runs after the trim so pulse
    /// endpoints never see mid-trim geometry.
    pub fn tick_pulses(&mut self, dt: f32) {
        for pulse in &mut self.pulses {
            pulse.journey += dt * self.pulse_speed;
        }
        self.pulses.retain(|p| p.journey <= 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_buffer(count: usize) -> PathBuffer {
        let mut buffer = PathBuffer::new(Vec3::ZERO, Rgba::WHITE, 100.0);
        for i in 1..count {
            buffer.append(Vec3::new(0.0, 0.0, i as f32), Rgba::WHITE);
        }
        buffer
    }

    fn engine() -> TrailEffectEngine {
        TrailEffectEngine::new(&SimConfig::default())
    }

    #[test]
    fn test_wave_displaces_points_laterally() {
        let mut engine = engine();
        let mut buffer = straight_buffer(5);
        engine.trigger_wave(1.0);
        engine.tick_overlays(0.1, &mut buffer, Vec3::Z);
        let displaced = buffer.points().filter(|p| p.position.x != 0.0).count();
        assert!(displaced > 0);
        // Lateral only: forward and vertical coordinates untouched
        for point in buffer.points() {
            assert_eq!(point.position.y, 0.0);
            assert_eq!(point.position.z.fract(), 0.0);
        }
    }

    #[test]
    fn test_wave_decays_to_idle() {
        let mut engine = engine();
        let mut buffer = straight_buffer(4);
        engine.trigger_wave(-1.0);
        assert!(engine.wave_active());
        // Default decay rate 2.0: done after 1.5s
        for _ in 0..200 {
            engine.tick_overlays(0.01, &mut buffer, Vec3::Z);
        }
        assert!(!engine.wave_active());
    }

    #[test]
    fn test_wave_retrigger_restarts_envelope() {
        let mut engine = engine();
        let mut buffer = straight_buffer(4);
        engine.trigger_wave(1.0);
        for _ in 0..100 {
            engine.tick_overlays(0.01, &mut buffer, Vec3::Z);
        }
        engine.trigger_wave(-1.0);
        assert!(engine.wave_active());
        assert_eq!(engine.wave.unwrap().elapsed, 0.0);
    }

    #[test]
    fn test_color_sweep_converts_tail_first() {
        let mut engine = engine();
        let mut buffer = straight_buffer(5);
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        engine.request_color(red);
        // speed 2.0, dt 0.1 -> progress 0.2: tail converted, head not
        engine.tick_overlays(0.1, &mut buffer, Vec3::Z);
        assert_eq!(buffer.tail().unwrap().color, red);
        assert_eq!(buffer.head().unwrap().color, Rgba::WHITE);
    }

    #[test]
    fn test_color_sweep_completion_is_idempotent() {
        let mut engine = engine();
        let mut buffer = straight_buffer(5);
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        engine.request_color(red);
        engine.tick_overlays(0.6, &mut buffer, Vec3::Z);
        assert!(!engine.color_active());
        assert_eq!(engine.current_color(), red);
        assert!(buffer.points().all(|p| p.color == red));
        // Further ticks change nothing
        engine.tick_overlays(0.6, &mut buffer, Vec3::Z);
        assert_eq!(engine.current_color(), red);
        assert!(buffer.points().all(|p| p.color == red));
    }

    #[test]
    fn test_color_retarget_keeps_converted_points() {
        let mut engine = engine();
        let mut buffer = straight_buffer(5);
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
        engine.request_color(red);
        engine.tick_overlays(0.1, &mut buffer, Vec3::Z);
        assert_eq!(buffer.tail().unwrap().color, red);
        // Retarget mid-sweep: the red tail stays red until the new sweep
        // reaches it, nothing snaps back to white
        engine.request_color(blue);
        assert!(engine.color_active());
        assert_eq!(buffer.tail().unwrap().color, red);
        engine.tick_overlays(0.6, &mut buffer, Vec3::Z);
        assert!(buffer.points().all(|p| p.color == blue));
        assert_eq!(engine.current_color(), blue);
    }

    #[test]
    fn test_color_request_same_color_is_ignored() {
        let mut engine = engine();
        engine.request_color(Rgba::WHITE);
        assert!(!engine.color_active());
    }

    #[test]
    fn test_pulse_travels_and_self_terminates() {
        let mut engine = engine();
        engine.pulse_on_grow(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 9.0), Vec3::Z);
        assert_eq!(engine.pulses().len(), 1);
        let start = engine.pulses()[0].position();
        assert_eq!(start, Vec3::new(0.0, 0.0, 10.0));
        // speed 10: journey crosses 1 after ~0.1s
        engine.tick_pulses(0.05);
        let mid = engine.pulses()[0].position();
        assert!(mid.z < start.z);
        engine.tick_pulses(0.2);
        assert!(engine.pulses().is_empty());
    }

    #[test]
    fn test_pulse_scale_eases_down() {
        let mut engine = engine();
        engine.pulse_on_shrink(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0));
        let base = engine.pulse_base_scale();
        assert_eq!(engine.pulses()[0].scale(base), base);
        engine.tick_pulses(0.05);
        assert!(engine.pulses()[0].scale(base) < base);
    }
}
