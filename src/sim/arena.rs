//! Arena walls
//!
//! Four fixed cuboids whose inner faces line up with the canvas edges. The
//! walls are thick so a fast ball cannot tunnel through between steps.

use rapier2d::prelude::*;

use super::world::PhysicsWorld;
use crate::consts::WALL_THICKNESS;
use crate::px_to_units;

/// Inner extent of the arena in pixels: `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        0.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        0.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.height
    }
}

/// The four boundary bodies of one arena
#[derive(Debug)]
pub struct Arena {
    pub bounds: ArenaBounds,
    pub thickness: f32,
    walls: [RigidBodyHandle; 4],
}

impl Arena {
    /// Build the walls around `[0,width] x [0,height]` px.
    ///
    /// Thickness below `WALL_THICKNESS` is raised to it. The side walls are
    /// extended by one thickness at each end so the corners are closed.
    pub fn build(world: &mut PhysicsWorld, width: f32, height: f32, thickness: f32) -> Self {
        let t = thickness.max(WALL_THICKNESS);
        let half_t = t / 2.0;

        // (center x, center y, half width, half height) in px
        let rects = [
            // Top
            (width / 2.0, -half_t, width / 2.0 + t, half_t),
            // Bottom
            (width / 2.0, height + half_t, width / 2.0 + t, half_t),
            // Left
            (-half_t, height / 2.0, half_t, height / 2.0 + t),
            // Right
            (width + half_t, height / 2.0, half_t, height / 2.0 + t),
        ];

        let walls = rects.map(|(cx, cy, hw, hh)| {
            let body = RigidBodyBuilder::fixed()
                .translation(vector![px_to_units(cx), px_to_units(cy)])
                .build();
            let collider = ColliderBuilder::cuboid(px_to_units(hw), px_to_units(hh))
                .density(0.0)
                .friction(0.0)
                .friction_combine_rule(CoefficientCombineRule::Min)
                .restitution(1.0)
                .restitution_combine_rule(CoefficientCombineRule::Max)
                .build();
            world.insert(body, collider)
        });

        log::debug!("Arena built: {}x{} px, walls {} px thick", width, height, t);

        Self {
            bounds: ArenaBounds::new(width, height),
            thickness: t,
            walls,
        }
    }

    /// Remove all four walls from the world
    pub fn destroy(self, world: &mut PhysicsWorld) {
        for handle in self.walls {
            world.remove(handle);
        }
    }

    pub fn walls(&self) -> &[RigidBodyHandle; 4] {
        &self.walls
    }
}
