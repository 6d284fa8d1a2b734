//! Collision detection for axis-aligned squares
//!
//! Rectangles are given as top-left position plus (width, height). Edges that
//! touch count as overlapping.

use glam::Vec2;

/// Check whether two axis-aligned boxes overlap
///
/// Returns true unless the boxes are strictly separated on the X or the Y axis,
/// so boxes sharing an edge or a corner are reported as overlapping.
pub fn aabb_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    let a_right_of_b = pos_a.x > pos_b.x + size_b.x;
    let a_left_of_b = pos_a.x + size_a.x < pos_b.x;
    let a_below_b = pos_a.y > pos_b.y + size_b.y;
    let a_above_b = pos_a.y + size_a.y < pos_b.y;

    !(a_right_of_b || a_left_of_b || a_below_b || a_above_b)
}
