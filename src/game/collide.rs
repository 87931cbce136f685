//! Axis-aligned overlap tests shared by the collision passes.
//!
//! Every entity is a box described by its `Transform` translation (center)
//! and a configured size; tests run in world space.

use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;

/// The bounding box of an entity centered at `center`.
pub(super) fn bounds(center: Vec2, size: Vec2) -> Aabb2d {
    Aabb2d::new(center, size / 2.0)
}

/// Whether two centered boxes overlap.
pub(super) fn overlap(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> bool {
    bounds(a_center, a_size).intersects(&bounds(b_center, b_size))
}

/// Whether a box has fully left the vertical view band: above the top by
/// more than its own height, or fully below the bottom.
pub(super) fn outside_vertical_view(
    center_y: f32,
    height: f32,
    view_bottom: f32,
    view_top: f32,
) -> bool {
    let half = height / 2.0;
    center_y - half > view_top + height || center_y + half < view_bottom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_intersect() {
        assert!(overlap(
            Vec2::ZERO,
            Vec2::new(10.0, 10.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        assert!(!overlap(
            Vec2::ZERO,
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(8.0, 8.0),
        ));
    }

    #[test]
    fn box_inside_view_is_kept() {
        assert!(!outside_vertical_view(0.0, 15.0, -400.0, 400.0));
        // Straddling the bottom edge still counts as visible.
        assert!(!outside_vertical_view(-398.0, 15.0, -400.0, 400.0));
    }

    #[test]
    fn box_above_view_is_culled_only_past_own_height() {
        // Top edge just above the view top: kept.
        assert!(!outside_vertical_view(405.0, 15.0, -400.0, 400.0));
        // A full height above: culled.
        assert!(outside_vertical_view(425.0, 15.0, -400.0, 400.0));
    }

    #[test]
    fn box_below_view_is_culled() {
        assert!(outside_vertical_view(-410.0, 15.0, -400.0, 400.0));
    }
}
