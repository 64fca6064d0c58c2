//! Collision detection and resolution
//!
//! Every entity collides as the axis-aligned box of its sprite, centred on
//! its position. Tests are discrete: a bullet moving faster than a target is
//! wide can pass through it between frames. That approximation is accepted.

use glam::Vec2;

use super::state::{Projectile, Target, Vehicle};
use crate::tuning::Tuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounding box of a `size` sprite rotated by `degrees` about its centre
    pub fn rotated(center: Vec2, size: Vec2, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let extent = Vec2::new(size.x * cos + size.y * sin, size.x * sin + size.y * cos);
        Self::centered(center, extent)
    }

    /// Inclusive overlap test (touching edges count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Outcome of one frame of target processing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Positions of targets destroyed by bullets, in scan order
    pub destroyed_at: Vec<Vec2>,
    /// Tank position if it touched a target (scan stopped there)
    pub vehicle_hit: Option<Vec2>,
    /// Number of targets moved this frame
    pub processed: usize,
}

/// Move every target, then test it against the tank and the live bullets.
///
/// A tank hit stops the scan immediately: targets after it are neither moved
/// nor tested this frame. Each bullet destroys at most one target and each
/// target consumes at most one bullet. Removals are collected during the scan
/// and applied once it ends.
pub fn resolve_targets(
    vehicle: &Vehicle,
    targets: &mut Vec<Target>,
    projectiles: &mut Vec<Projectile>,
    tuning: &Tuning,
) -> CollisionReport {
    let arena = tuning.arena();
    let vehicle_box = vehicle.bounds(tuning);
    let projectile_boxes: Vec<Aabb> = projectiles.iter().map(|p| p.bounds(tuning)).collect();

    let mut report = CollisionReport::default();
    let mut dead_targets = Vec::new();
    let mut spent = vec![false; projectiles.len()];

    for (idx, target) in targets.iter_mut().enumerate() {
        target.advance(arena);
        report.processed += 1;

        let target_box = target.bounds(tuning);
        if vehicle_box.intersects(&target_box) {
            report.vehicle_hit = Some(vehicle.pos);
            break;
        }

        let hit = projectile_boxes
            .iter()
            .enumerate()
            .find(|&(p_idx, bullet_box)| !spent[p_idx] && target_box.intersects(bullet_box))
            .map(|(p_idx, _)| p_idx);

        if let Some(p_idx) = hit {
            spent[p_idx] = true;
            dead_targets.push(idx);
            report.destroyed_at.push(target.pos);
        }
    }

    // Compact after the scan, highest index first
    for idx in dead_targets.into_iter().rev() {
        targets.remove(idx);
    }
    let mut p_idx = 0;
    projectiles.retain(|_| {
        let keep = !spent[p_idx];
        p_idx += 1;
        keep
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Badge;
    use proptest::prelude::*;

    fn still_target(x: f32, y: f32) -> Target {
        Target {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            badge: Badge::Go,
        }
    }

    fn resting_bullet(x: f32, y: f32) -> Projectile {
        Projectile {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            created_at: 0.0,
            angle: 0.0,
        }
    }

    #[test]
    fn test_touching_edges_intersect() {
        let a = Aabb::centered(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Aabb::centered(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::centered(Vec2::new(10.1, 0.0), Vec2::splat(10.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rotated_box_grows() {
        let flat = Aabb::rotated(Vec2::ZERO, Vec2::splat(40.0), 0.0);
        assert!((flat.max.x - flat.min.x - 40.0).abs() < 1e-4);
        let diagonal = Aabb::rotated(Vec2::ZERO, Vec2::splat(40.0), 45.0);
        let size = diagonal.max - diagonal.min;
        let expected = 40.0 * std::f32::consts::SQRT_2;
        assert!((size.x - expected).abs() < 1e-3);
        assert!((size.y - expected).abs() < 1e-3);
        assert_eq!(diagonal.min + diagonal.max, Vec2::ZERO);
    }

    #[test]
    fn test_bullet_destroys_one_target() {
        let tuning = Tuning::default();
        let tank = Vehicle::new(Vec2::new(1500.0, 900.0));
        // Two overlapping targets share one bullet: only the first is destroyed
        let mut targets = vec![still_target(300.0, 300.0), still_target(310.0, 300.0)];
        let mut bullets = vec![resting_bullet(305.0, 300.0)];

        let report = resolve_targets(&tank, &mut targets, &mut bullets, &tuning);

        assert_eq!(report.destroyed_at, vec![Vec2::new(300.0, 300.0)]);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].pos, Vec2::new(310.0, 300.0));
        assert!(bullets.is_empty());
        assert_eq!(report.processed, 2);
    }

    #[test]
    fn test_two_bullets_two_targets() {
        let tuning = Tuning::default();
        let tank = Vehicle::new(Vec2::new(1500.0, 900.0));
        let mut targets = vec![still_target(300.0, 300.0), still_target(600.0, 300.0)];
        let mut bullets = vec![
            resting_bullet(600.0, 300.0),
            resting_bullet(1000.0, 1000.0),
            resting_bullet(300.0, 300.0),
        ];

        let report = resolve_targets(&tank, &mut targets, &mut bullets, &tuning);

        assert_eq!(report.destroyed_at.len(), 2);
        assert!(targets.is_empty());
        assert_eq!(bullets, vec![resting_bullet(1000.0, 1000.0)]);
    }

    #[test]
    fn test_vehicle_hit_stops_scan() {
        let tuning = Tuning::default();
        let tank = Vehicle::new(Vec2::new(500.0, 500.0));
        let mut targets = vec![
            still_target(100.0, 100.0),
            still_target(510.0, 500.0),
            Target {
                pos: Vec2::new(900.0, 900.0),
                vel: Vec2::new(1.0, 1.0),
                badge: Badge::Go,
            },
        ];
        let mut bullets = vec![resting_bullet(100.0, 100.0)];

        let report = resolve_targets(&tank, &mut targets, &mut bullets, &tuning);

        assert_eq!(report.vehicle_hit, Some(Vec2::new(500.0, 500.0)));
        assert_eq!(report.processed, 2);
        // Earlier destruction still applies
        assert_eq!(targets.len(), 2);
        assert!(bullets.is_empty());
        // Target after the hit was not moved
        assert_eq!(targets[1].pos, Vec2::new(900.0, 900.0));
    }

    #[test]
    fn test_no_collisions_moves_everything() {
        let tuning = Tuning::default();
        let tank = Vehicle::new(Vec2::new(960.0, 540.0));
        let mut targets = vec![Target {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(2.0, 0.0),
            badge: Badge::Go,
        }];
        let mut bullets = vec![resting_bullet(1800.0, 1000.0)];
        let report = resolve_targets(&tank, &mut targets, &mut bullets, &tuning);
        assert_eq!(
            report,
            CollisionReport {
                destroyed_at: Vec::new(),
                vehicle_hit: None,
                processed: 1,
            }
        );
        assert_eq!(targets[0].pos, Vec2::new(102.0, 100.0));
        assert_eq!(bullets.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_intersection_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            aw in 0.0f32..80.0, ah in 0.0f32..80.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            bw in 0.0f32..80.0, bh in 0.0f32..80.0,
        ) {
            let a = Aabb::centered(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Aabb::centered(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn prop_overlapping_boxes_are_detected(
            cx in -100.0f32..100.0, cy in -100.0f32..100.0,
            dx in -20.0f32..20.0, dy in -20.0f32..20.0,
        ) {
            // Centres within the combined half extents always overlap
            let a = Aabb::centered(Vec2::new(cx, cy), Vec2::splat(48.0));
            let b = Aabb::centered(Vec2::new(cx + dx, cy + dy), Vec2::splat(40.0));
            prop_assert!(a.intersects(&b));
            prop_assert!(b.intersects(&a));
        }
    }
}
