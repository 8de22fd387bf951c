//! Corner ejection
//!
//! When a ball is pressed into two adjacent walls at once, the solver resolves
//! both contacts in the same step and the normals can cancel the velocity
//! instead of reflecting it. The ball then sits in the corner forever. We catch
//! that case after each step and throw the ball back out at 45 degrees.

use glam::Vec2;

use super::arena::ArenaBounds;
use crate::consts::{CORNER_NUDGE_PX, CORNER_TOLERANCE_PX, EJECT_MIN_SPEED};

/// One of the four arena corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Unit signs of the escape direction (y grows downward)
    pub fn escape_signs(self) -> Vec2 {
        match self {
            Corner::TopLeft => Vec2::new(1.0, 1.0),
            Corner::TopRight => Vec2::new(-1.0, 1.0),
            Corner::BottomLeft => Vec2::new(1.0, -1.0),
            Corner::BottomRight => Vec2::new(-1.0, -1.0),
        }
    }
}

/// Distance from the ball's rim to each wall, in pixels
#[derive(Debug, Clone, Copy)]
struct EdgeGaps {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl EdgeGaps {
    fn new(pos: Vec2, radius: f32, bounds: &ArenaBounds) -> Self {
        Self {
            left: pos.x - radius - bounds.left(),
            top: pos.y - radius - bounds.top(),
            right: bounds.right() - (pos.x + radius),
            bottom: bounds.bottom() - (pos.y + radius),
        }
    }
}

/// Whether a rim gap counts as touching the wall.
///
/// A gap below `-radius` means the center has left the arena; that reading
/// is not trusted and the edge is ignored until a later frame.
#[inline]
fn touches(gap: f32, radius: f32) -> bool {
    gap <= CORNER_TOLERANCE_PX && gap >= -radius
}

/// Find the corner a ball is wedged into, if any
pub fn detect_corner(pos: Vec2, radius: f32, bounds: &ArenaBounds) -> Option<Corner> {
    let g = EdgeGaps::new(pos, radius, bounds);
    let left = touches(g.left, radius);
    let top = touches(g.top, radius);
    let right = touches(g.right, radius);
    let bottom = touches(g.bottom, radius);

    match (left, top, right, bottom) {
        (true, true, _, _) => Some(Corner::TopLeft),
        (_, true, true, _) => Some(Corner::TopRight),
        (true, _, _, true) => Some(Corner::BottomLeft),
        (_, _, true, true) => Some(Corner::BottomRight),
        _ => None,
    }
}

/// Result of ejecting a ball from a corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ejection {
    pub corner: Corner,
    /// New center in pixels
    pub pos: Vec2,
    /// New velocity in units per second
    pub vel: Vec2,
}

/// Compute the corrected position and velocity for a cornered ball.
///
/// Speed is kept but never below `EJECT_MIN_SPEED`, split evenly across both
/// axes away from the corner. The ball is placed `CORNER_NUDGE_PX` beyond the
/// tolerance band on both axes so the next frame does not see it again.
pub fn eject(pos: Vec2, vel: Vec2, radius: f32, bounds: &ArenaBounds) -> Option<Ejection> {
    let corner = detect_corner(pos, radius, bounds)?;
    let signs = corner.escape_signs();

    let speed = vel.length().max(EJECT_MIN_SPEED);
    let component = speed / std::f32::consts::SQRT_2;
    let new_vel = signs * component;

    let clearance = radius + CORNER_TOLERANCE_PX + CORNER_NUDGE_PX;
    let x = if signs.x > 0.0 {
        bounds.left() + clearance
    } else {
        bounds.right() - clearance
    };
    let y = if signs.y > 0.0 {
        bounds.top() + clearance
    } else {
        bounds.bottom() - clearance
    };

    Some(Ejection {
        corner,
        pos: Vec2::new(x, y),
        vel: new_vel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: ArenaBounds = ArenaBounds {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_detect_each_corner() {
        let r = 20.0;
        assert_eq!(detect_corner(Vec2::new(20.0, 20.0), r, &BOUNDS), Some(Corner::TopLeft));
        assert_eq!(detect_corner(Vec2::new(780.0, 21.0), r, &BOUNDS), Some(Corner::TopRight));
        assert_eq!(detect_corner(Vec2::new(21.5, 580.0), r, &BOUNDS), Some(Corner::BottomLeft));
        assert_eq!(detect_corner(Vec2::new(779.0, 579.0), r, &BOUNDS), Some(Corner::BottomRight));
    }

    #[test]
    fn test_single_wall_is_not_a_corner() {
        let r = 20.0;
        assert_eq!(detect_corner(Vec2::new(20.0, 300.0), r, &BOUNDS), None);
        assert_eq!(detect_corner(Vec2::new(400.0, 580.0), r, &BOUNDS), None);
        assert_eq!(detect_corner(Vec2::new(400.0, 300.0), r, &BOUNDS), None);
    }

    #[test]
    fn test_center_outside_arena_is_skipped() {
        // Center beyond the left wall: that edge is implausible, no correction
        assert_eq!(detect_corner(Vec2::new(-5.0, 20.0), 20.0, &BOUNDS), None);
    }

    #[test]
    fn test_stalled_ball_gets_floor_speed() {
        let e = eject(Vec2::new(20.0, 20.0), Vec2::ZERO, 20.0, &BOUNDS).unwrap();
        assert_eq!(e.corner, Corner::TopLeft);
        assert!((e.vel.length() - EJECT_MIN_SPEED).abs() < 1e-4);
        assert!(e.vel.x > 0.0 && e.vel.y > 0.0);
        assert!((e.vel.x - e.vel.y).abs() < 1e-5);
    }

    #[test]
    fn test_fast_ball_keeps_speed() {
        let vel = Vec2::new(30.0, 40.0);
        let e = eject(Vec2::new(780.0, 580.0), vel, 20.0, &BOUNDS).unwrap();
        assert_eq!(e.corner, Corner::BottomRight);
        assert!((e.vel.length() - 50.0).abs() < 1e-3);
        assert!(e.vel.x < 0.0 && e.vel.y < 0.0);
    }

    proptest! {
        #[test]
        fn prop_ejection_clears_band_and_floor(
            corner in 0usize..4,
            dx in -10.0f32..CORNER_TOLERANCE_PX,
            dy in -10.0f32..CORNER_TOLERANCE_PX,
            radius in 12.0f32..80.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            // Place the rim `dx`/`dy` px from the two walls of the chosen corner
            let x = match corner { 0 | 2 => radius + dx, _ => BOUNDS.width - radius - dx };
            let y = match corner { 0 | 1 => radius + dy, _ => BOUNDS.height - radius - dy };
            let pos = Vec2::new(x, y);

            let e = eject(pos, Vec2::new(vx, vy), radius, &BOUNDS);
            prop_assert!(e.is_some());
            let e = e.unwrap();

            prop_assert!(e.vel.length() >= EJECT_MIN_SPEED - 1e-3);
            let gaps = EdgeGaps::new(e.pos, radius, &BOUNDS);
            let (gx, gy) = match e.corner {
                Corner::TopLeft => (gaps.left, gaps.top),
                Corner::TopRight => (gaps.right, gaps.top),
                Corner::BottomLeft => (gaps.left, gaps.bottom),
                Corner::BottomRight => (gaps.right, gaps.bottom),
            };
            prop_assert!(gx > CORNER_TOLERANCE_PX);
            prop_assert!(gy > CORNER_TOLERANCE_PX);
            prop_assert_eq!(detect_corner(e.pos, radius, &BOUNDS), None);
        }
    }
}
