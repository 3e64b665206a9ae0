//! Trail polyline buffer
//!
//! Ordered newest-first (index 0 is the point closest to the runner). The
//! buffer grows at the head as the runner advances and is trimmed at the
//! tail so cumulative arc length tracks `target_length` exactly: whole tail
//! segments are dropped while they fit in the excess, then the last retained
//! segment is shortened in place by linear interpolation. Point-granularity
//! truncation would make the rendered length jump in steps; the interpolated
//! trim keeps it continuous.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::color::Rgba;
use crate::consts::{MIN_TRAIL_LENGTH, TRIM_EPSILON};

/// One vertex of the trail polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub position: Vec3,
    pub color: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathBuffer {
    points: VecDeque<PathPoint>,
    target_length: f32,
}

impl PathBuffer {
    pub fn new(head: Vec3, color: Rgba, target_length: f32) -> Self {
        let mut points = VecDeque::with_capacity(64);
        points.push_back(PathPoint {
            position: head,
            color,
        });
        Self {
            points,
            target_length: target_length.max(MIN_TRAIL_LENGTH),
        }
    }

    /// Push a new head point. The caller is responsible for only calling
    /// this once the head has moved at least the configured add distance,
    /// so normal per-tick jitter cannot create zero-length segments.
    pub fn append(&mut self, position: Vec3, color: Rgba) {
        self.points.push_front(PathPoint { position, color });
    }

    /// Cumulative polyline length. Zero-length segments contribute nothing.
    pub fn arc_length(&self) -> f32 {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| a.position.distance(b.position))
            .sum()
    }

    pub fn target_length(&self) -> f32 {
        self.target_length
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Head-to-tail iteration, newest first.
    pub fn points(&self) -> impl Iterator<Item = &PathPoint> {
        self.points.iter()
    }

    /// Mutable head-to-tail iteration, used by the effect engine only.
    pub(crate) fn points_mut(&mut self) -> impl Iterator<Item = &mut PathPoint> {
        self.points.iter_mut()
    }

    pub fn head(&self) -> Option<&PathPoint> {
        self.points.front()
    }

    pub fn tail(&self) -> Option<&PathPoint> {
        self.points.back()
    }

    /// Raise the target length by `delta`, clamped to the minimum.
    /// Returns whether the target actually changed.
    pub fn grow_by(&mut self, delta: f32) -> bool {
        let next = (self.target_length + delta).max(MIN_TRAIL_LENGTH);
        let changed = next != self.target_length;
        self.target_length = next;
        changed
    }

    /// Lower the target length by `delta`, clamped to the minimum.
    pub fn shrink_by(&mut self, delta: f32) -> bool {
        self.grow_by(-delta)
    }

    /// Trim from the tail until the arc length equals the target, shortening
    /// the last retained segment in place. With fewer than two points there
    /// is no arc length to speak of and the call is a no-op.
    pub fn trim_to_target(&mut self) {
        if self.points.len() < 2 {
            return;
        }
        let mut excess = self.arc_length() - self.target_length;
        while excess > TRIM_EPSILON && self.points.len() >= 2 {
            let tail = self.points[self.points.len() - 1].position;
            let prev = self.points[self.points.len() - 2].position;
            let segment = tail.distance(prev);
            if segment <= excess {
                self.points.pop_back();
                excess -= segment;
            } else {
                // segment > excess > 0, so the division is safe
                if let Some(last) = self.points.back_mut() {
                    last.position = tail.lerp(prev, excess / segment);
                }
                excess = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buffer_along_z(zs: &[f32], target: f32) -> PathBuffer {
        // zs are given tail-to-head so the head ends up at the front
        let mut buffer = PathBuffer::new(Vec3::new(0.0, 0.0, zs[0]), Rgba::WHITE, target);
        for &z in &zs[1..] {
            buffer.append(Vec3::new(0.0, 0.0, z), Rgba::WHITE);
        }
        buffer
    }

    #[test]
    fn test_append_and_arc_length() {
        let buffer = buffer_along_z(&[0.0, 1.0, 3.0], 10.0);
        assert_eq!(buffer.len(), 3);
        assert!((buffer.arc_length() - 3.0).abs() < 1e-6);
        assert_eq!(buffer.head().unwrap().position.z, 3.0);
        assert_eq!(buffer.tail().unwrap().position.z, 0.0);
    }

    #[test]
    fn test_trim_noop_below_two_points() {
        let mut buffer = PathBuffer::new(Vec3::ZERO, Rgba::WHITE, 1.0);
        buffer.trim_to_target();
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_trim_noop_when_under_target() {
        let mut buffer = buffer_along_z(&[0.0, 1.0, 2.0], 5.0);
        buffer.trim_to_target();
        assert_eq!(buffer.len(), 3);
        assert!((buffer.arc_length() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_trim_removes_whole_tail_segments() {
        // 4 unit segments, target 2: two whole tail segments go
        let mut buffer = buffer_along_z(&[0.0, 1.0, 2.0, 3.0, 4.0], 2.0);
        buffer.trim_to_target();
        assert_eq!(buffer.len(), 3);
        assert!((buffer.arc_length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_trim_shortens_last_segment_in_place() {
        // arc 3.0, target 2.5: the tail point slides half a unit forward
        let mut buffer = buffer_along_z(&[0.0, 1.0, 2.0, 3.0], 2.5);
        buffer.trim_to_target();
        assert_eq!(buffer.len(), 4);
        assert!((buffer.arc_length() - 2.5).abs() < 1e-4);
        assert!((buffer.tail().unwrap().position.z - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_trim_tolerates_zero_length_segment() {
        let mut buffer = buffer_along_z(&[0.0, 1.0], 1.5);
        // Coincident point, transiently legal; contributes nothing
        buffer.append(Vec3::new(0.0, 0.0, 1.0), Rgba::WHITE);
        buffer.append(Vec3::new(0.0, 0.0, 3.0), Rgba::WHITE);
        assert!((buffer.arc_length() - 3.0).abs() < 1e-6);
        buffer.trim_to_target();
        let arc = buffer.arc_length();
        assert!(arc.is_finite());
        assert!((arc - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_grow_and_shrink_clamp_at_minimum() {
        let mut buffer = PathBuffer::new(Vec3::ZERO, Rgba::WHITE, 2.0);
        assert!(buffer.shrink_by(10.0));
        assert_eq!(buffer.target_length(), 1.0);
        // Already at the floor: no change to report
        assert!(!buffer.shrink_by(3.0));
        assert!(buffer.grow_by(4.0));
        assert_eq!(buffer.target_length(), 5.0);
        assert!(!buffer.grow_by(0.0));
    }

    #[test]
    fn test_growth_converges_to_new_target() {
        // Target 5 grown by 3: forward motion converges the arc to 8
        let mut buffer = PathBuffer::new(Vec3::ZERO, Rgba::WHITE, 5.0);
        assert!(buffer.grow_by(3.0));
        let mut z = 0.0;
        for _ in 0..40 {
            z += 0.5;
            buffer.append(Vec3::new(0.0, 0.0, z), Rgba::WHITE);
            buffer.trim_to_target();
        }
        assert!((buffer.arc_length() - 8.0).abs() < 1e-3);
    }

    proptest! {
        /// After a trim, arc length never exceeds the target; when there was
        /// an excess to remove it matches the target exactly.
        #[test]
        fn prop_trim_is_exact(
            steps in proptest::collection::vec((0.1f32..2.0, -1.0f32..1.0), 2..40),
            target in 1.0f32..20.0,
        ) {
            let mut buffer = PathBuffer::new(Vec3::ZERO, Rgba::WHITE, target);
            let mut pos = Vec3::ZERO;
            for (dz, dx) in steps {
                pos += Vec3::new(dx, 0.0, dz);
                buffer.append(pos, Rgba::WHITE);
            }
            let before = buffer.arc_length();
            buffer.trim_to_target();
            let after = buffer.arc_length();
            prop_assert!(after <= target + 1e-3);
            if before > target {
                prop_assert!((after - target).abs() < 1e-3, "arc {} vs target {}", after, target);
            } else {
                prop_assert!((after - before).abs() < 1e-5);
            }
        }
    }
}
