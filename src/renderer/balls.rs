//! Ball drawing
//!
//! Each ball is drawn in its own frame (translated to its center, rotated by
//! its angle) so the holes turn with the body. The hole layout is shared by
//! every style so switching styles does not make the holes jump.

use glam::Vec2;

use super::color::{Rgba, colors};
use super::surface::{CompositeOp, Surface};
use crate::settings::GraphicsStyle;
use crate::sim::BallView;

/// Size tier of a ball, by radius in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Large,
    Medium,
    Small,
}

impl SizeTier {
    pub const LARGE_MIN_RADIUS: f32 = 55.0;
    pub const MEDIUM_MIN_RADIUS: f32 = 25.0;

    pub fn for_radius(radius: f32) -> Self {
        if radius >= Self::LARGE_MIN_RADIUS {
            SizeTier::Large
        } else if radius >= Self::MEDIUM_MIN_RADIUS {
            SizeTier::Medium
        } else {
            SizeTier::Small
        }
    }
}

/// Placement of the two holes along the ball's local x axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleGeometry {
    /// Distance of each hole center from the ball center
    pub offset: f32,
    pub radius: f32,
}

/// Hole diameter equals the gap between the holes in every tier
pub fn hole_geometry(tier: SizeTier) -> HoleGeometry {
    match tier {
        SizeTier::Large => HoleGeometry {
            offset: 20.0,
            radius: 10.0,
        },
        SizeTier::Medium => HoleGeometry {
            offset: 10.0,
            radius: 5.0,
        },
        SizeTier::Small => HoleGeometry {
            offset: 7.5,
            radius: 3.75,
        },
    }
}

const RIM_WIDTH: f32 = 2.0;
const HOLE_RING_WIDTH: f32 = 1.5;
/// Spin cross arms reach this fraction of the radius
const CROSS_REACH: f32 = 0.8;

fn hole_centers(g: &HoleGeometry) -> [Vec2; 2] {
    [Vec2::new(-g.offset, 0.0), Vec2::new(g.offset, 0.0)]
}

/// Colored disc, white rim, holes drawn as rings
pub fn draw_outlined<S: Surface>(surface: &mut S, radius: f32, color: Rgba) {
    surface.fill_circle(Vec2::ZERO, radius, color);
    surface.stroke_circle(Vec2::ZERO, radius, colors::WHITE, RIM_WIDTH);

    let g = hole_geometry(SizeTier::for_radius(radius));
    for c in hole_centers(&g) {
        surface.stroke_circle(c, g.radius, colors::WHITE, HOLE_RING_WIDTH);
    }
}

/// Translucent gray disc with the holes erased
pub fn draw_cutout<S: Surface>(surface: &mut S, radius: f32) {
    surface.fill_circle(Vec2::ZERO, radius, colors::CUTOUT_GRAY);

    let g = hole_geometry(SizeTier::for_radius(radius));
    surface.set_composite(CompositeOp::DestinationOut);
    for c in hole_centers(&g) {
        surface.fill_circle(c, g.radius, colors::WHITE);
    }
    surface.set_composite(CompositeOp::SourceOver);
}

/// Colored disc, white rim, and a cross so the rotation is visible
pub fn draw_spin_cross<S: Surface>(surface: &mut S, radius: f32, color: Rgba) {
    surface.fill_circle(Vec2::ZERO, radius, color);
    surface.stroke_circle(Vec2::ZERO, radius, colors::WHITE, RIM_WIDTH);

    let reach = radius * CROSS_REACH;
    surface.stroke_line(
        Vec2::new(-reach, 0.0),
        Vec2::new(reach, 0.0),
        colors::WHITE,
        RIM_WIDTH,
    );
    surface.stroke_line(
        Vec2::new(0.0, -reach),
        Vec2::new(0.0, reach),
        colors::WHITE,
        RIM_WIDTH,
    );
}

/// Draw one ball at its position and angle
pub fn draw_ball<S: Surface>(surface: &mut S, ball: &BallView, style: GraphicsStyle) {
    surface.save();
    surface.translate(ball.pos);
    surface.rotate(ball.angle);
    match style {
        GraphicsStyle::Outlined => draw_outlined(surface, ball.radius, ball.color),
        GraphicsStyle::Cutout => draw_cutout(surface, ball.radius),
        GraphicsStyle::SpinCross => draw_spin_cross(surface, ball.radius, ball.color),
    }
    surface.restore();
}

/// Clear the simulation surface and draw every ball
pub fn draw_scene<'a, S, I>(surface: &mut S, size: Vec2, balls: I, style: GraphicsStyle)
where
    S: Surface,
    I: IntoIterator<Item = &'a BallView>,
{
    surface.clear(size.x, size.y);
    for ball in balls {
        draw_ball(surface, ball, style);
    }
}
