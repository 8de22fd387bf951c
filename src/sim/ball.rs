//! Ball entities and the body factory

use glam::Vec2;
use rand::Rng;
use rapier2d::prelude::*;
use serde::Serialize;

use super::world::PhysicsWorld;
use crate::consts::*;
use crate::px_to_units;
use crate::renderer::color::Rgba;

/// Everything needed to create one ball
#[derive(Debug, Clone, PartialEq)]
pub struct BallSpec {
    /// Center in pixels
    pub x: f32,
    pub y: f32,
    /// Radius in pixels
    pub radius: f32,
    pub color: Rgba,
    /// Launch at `BALL_SPAWN_SPEED` in a random direction
    pub should_move: bool,
}

/// A registry entry: the body handle plus what the renderer needs
#[derive(Debug, Clone)]
pub struct Ball {
    pub handle: RigidBodyHandle,
    /// Radius in pixels
    pub radius: f32,
    pub color: Rgba,
}

/// Renderer-facing view of a ball, in pixels
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BallView {
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub color: Rgba,
}

/// Serializable state of one ball (simulation units)
#[derive(Debug, Clone, Serialize)]
pub struct BallSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    pub radius_px: f32,
    pub density: f32,
}

/// Velocity of magnitude `speed` at a uniformly random heading
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> Vec2 {
    let heading = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::from_angle(heading) * speed
}

/// Create one dynamic ball in `world`
pub fn spawn_ball<R: Rng + ?Sized>(world: &mut PhysicsWorld, rng: &mut R, spec: &BallSpec) -> Ball {
    let vel = if spec.should_move {
        random_velocity(rng, BALL_SPAWN_SPEED)
    } else {
        Vec2::ZERO
    };

    let body = RigidBodyBuilder::dynamic()
        .translation(vector![px_to_units(spec.x), px_to_units(spec.y)])
        .linvel(vector![vel.x, vel.y])
        .angvel(0.0)
        .linear_damping(0.0)
        .angular_damping(0.0)
        .ccd_enabled(true)
        .build();
    let collider = ColliderBuilder::ball(px_to_units(spec.radius))
        .density(BALL_DENSITY)
        .friction(BALL_FRICTION)
        .restitution(BALL_RESTITUTION)
        .restitution_combine_rule(CoefficientCombineRule::Max)
        .build();

    let handle = world.insert(body, collider);
    Ball {
        handle,
        radius: spec.radius,
        color: spec.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::color::colors;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spec(should_move: bool) -> BallSpec {
        BallSpec {
            x: 300.0,
            y: 150.0,
            radius: BALL_RADIUS_MEDIUM,
            color: colors::BALL_RED,
            should_move,
        }
    }

    #[test]
    fn test_random_velocity_has_fixed_speed() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_velocity(&mut rng, 5.0);
            assert!((v.length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_spawn_moving_ball() {
        let mut world = PhysicsWorld::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let ball = spawn_ball(&mut world, &mut rng, &spec(true));

        let pos = world.position(ball.handle).unwrap();
        assert!((pos - Vec2::new(10.0, 5.0)).length() < 1e-4);
        let speed = world.velocity(ball.handle).unwrap().length();
        assert!((speed - BALL_SPAWN_SPEED).abs() < 1e-3);
        assert_eq!(world.angular_velocity(ball.handle), Some(0.0));
        assert_eq!(world.density(ball.handle), Some(BALL_DENSITY));
    }

    #[test]
    fn test_spawn_still_ball() {
        let mut world = PhysicsWorld::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let ball = spawn_ball(&mut world, &mut rng, &spec(false));
        assert_eq!(world.velocity(ball.handle), Some(Vec2::ZERO));
        assert_eq!(world.angular_velocity(ball.handle), Some(0.0));
        assert_eq!(ball.radius, BALL_RADIUS_MEDIUM);
    }
}
