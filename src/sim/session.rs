//! Simulation session
//!
//! Owns the physics world, the arena and the ball registry. The registry is
//! only ever replaced as a whole: `rebuild` destroys every ball before any new
//! one is created, and nothing can observe the world in between.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::{Arena, ArenaBounds};
use super::ball::{Ball, BallSnapshot, BallView, spawn_ball};
use super::layout::init_game;
use super::world::PhysicsWorld;
use crate::consts::WALL_THICKNESS;
use crate::settings::Settings;
use crate::{units_to_px, vec_px_to_units, vec_units_to_px};

pub struct SimulationSession {
    world: PhysicsWorld,
    arena: Option<Arena>,
    balls: Vec<Ball>,
    rng: Pcg32,
    /// Frames stepped since the last rebuild
    pub frames: u64,
}

impl SimulationSession {
    /// Create a session with its arena built and no balls yet
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let mut world = PhysicsWorld::new();
        let arena = Arena::build(&mut world, width, height, WALL_THICKNESS);
        Self {
            world,
            arena: Some(arena),
            balls: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            frames: 0,
        }
    }

    /// Tear down the arena and build one for new canvas dimensions
    pub fn resize(&mut self, width: f32, height: f32) {
        if let Some(arena) = self.arena.take() {
            arena.destroy(&mut self.world);
        }
        self.arena = Some(Arena::build(&mut self.world, width, height, WALL_THICKNESS));
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.arena
            .as_ref()
            .map(|a| a.bounds)
            .unwrap_or(ArenaBounds::new(0.0, 0.0))
    }

    /// Destroy every ball and lay out a fresh set for `settings`
    pub fn rebuild(&mut self, settings: &Settings) {
        for ball in self.balls.drain(..) {
            self.world.remove(ball.handle);
        }

        let bounds = self.bounds();
        let specs = init_game(bounds.width, bounds.height, settings.start_style);
        let mut balls = Vec::with_capacity(specs.len());
        for spec in &specs {
            balls.push(spawn_ball(&mut self.world, &mut self.rng, spec));
        }
        self.balls = balls;
        self.frames = 0;

        log::info!(
            "Restarted with {} balls (start style: {})",
            self.balls.len(),
            settings.start_style.as_str()
        );
    }

    /// Advance the physics world by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.world.step(dt);
        self.frames += 1;
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Visit each ball in registry order with its pixel-space view
    pub fn for_each_ball(&self, mut f: impl FnMut(&BallView)) {
        for ball in &self.balls {
            if let Some(view) = self.view(ball) {
                f(&view);
            }
        }
    }

    fn view(&self, ball: &Ball) -> Option<BallView> {
        Some(BallView {
            pos: vec_units_to_px(self.world.position(ball.handle)?),
            angle: self.world.angle(ball.handle)?,
            radius: ball.radius,
            color: ball.color,
        })
    }

    pub fn views(&self) -> Vec<BallView> {
        let mut out = Vec::with_capacity(self.balls.len());
        self.for_each_ball(|v| out.push(*v));
        out
    }

    pub fn snapshot(&self) -> Vec<BallSnapshot> {
        self.balls
            .iter()
            .filter_map(|ball| {
                Some(BallSnapshot {
                    pos: self.world.position(ball.handle)?,
                    vel: self.world.velocity(ball.handle)?,
                    angle: self.world.angle(ball.handle)?,
                    angular_vel: self.world.angular_velocity(ball.handle)?,
                    radius_px: ball.radius,
                    density: self.world.density(ball.handle)?,
                })
            })
            .collect()
    }

    /// Ball center in pixels
    pub fn ball_position_px(&self, index: usize) -> Option<Vec2> {
        let ball = self.balls.get(index)?;
        self.world.position(ball.handle).map(vec_units_to_px)
    }

    /// Ball velocity in units per second
    pub fn ball_velocity(&self, index: usize) -> Option<Vec2> {
        let ball = self.balls.get(index)?;
        self.world.velocity(ball.handle)
    }

    /// Overwrite a ball's state (pixels for position, units/s for velocity)
    pub fn set_ball_state(&mut self, index: usize, pos_px: Vec2, vel: Vec2) {
        if let Some(ball) = self.balls.get(index) {
            self.world.set_position(ball.handle, vec_px_to_units(pos_px));
            self.world.set_velocity(ball.handle, vel);
        }
    }

    /// Total kinetic energy proxy: sum of speed squared (units²/s²)
    pub fn speed_squared_sum(&self) -> f32 {
        self.balls
            .iter()
            .filter_map(|b| self.world.velocity(b.handle))
            .map(|v| v.length_squared())
            .sum()
    }

    /// Number of bodies in the world, walls included
    pub fn body_count(&self) -> usize {
        self.world.body_count()
    }

    /// Rim-to-center distance of a ball in pixels, as the world stores it
    pub fn collider_radius_px(&self, index: usize) -> Option<f32> {
        let ball = self.balls.get(index)?;
        let body = self.world.bodies.get(ball.handle)?;
        let collider = self.world.colliders.get(*body.colliders().first()?)?;
        collider.shape().as_ball().map(|b| units_to_px(b.radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::StartStyle;

    fn settings(style: StartStyle) -> Settings {
        Settings {
            start_style: style,
            ..Settings::default()
        }
    }

    #[test]
    fn test_rebuild_replaces_registry() {
        let mut session = SimulationSession::new(1920.0, 1080.0, 42);
        assert_eq!(session.body_count(), 4);

        session.rebuild(&settings(StartStyle::Old));
        assert_eq!(session.ball_count(), 9);
        assert_eq!(session.body_count(), 13);
        let first: Vec<_> = session.balls().iter().map(|b| b.handle).collect();

        session.rebuild(&settings(StartStyle::Old));
        assert_eq!(session.ball_count(), 9);
        assert_eq!(session.body_count(), 13);
        assert!(session.balls().iter().all(|b| !first.contains(&b.handle)));
    }

    #[test]
    fn test_radius_and_density_stable_across_restarts() {
        let mut session = SimulationSession::new(1920.0, 1080.0, 3);
        session.rebuild(&settings(StartStyle::New));
        let before = session.snapshot();

        for _ in 0..30 {
            session.step(SIM_DT);
        }
        session.rebuild(&settings(StartStyle::New));
        let after = session.snapshot();

        assert_eq!(before.len(), after.len());
        for (i, (a, b)) in before.iter().zip(&after).enumerate() {
            assert_eq!(a.radius_px, b.radius_px);
            assert_eq!(a.density, b.density);
            let stored = session.collider_radius_px(i).unwrap();
            assert!((stored - b.radius_px).abs() < 1e-3);
        }
    }

    #[test]
    fn test_scenario_new_start_style() {
        let mut session = SimulationSession::new(1920.0, 1080.0, 11);
        session.rebuild(&settings(StartStyle::New));

        let snap = session.snapshot();
        let moving: Vec<_> = snap.iter().filter(|s| s.vel.length() > 0.0).collect();
        assert_eq!(moving.len(), 1);
        assert_eq!(moving[0].radius_px, BALL_RADIUS_SMALL);
        for s in snap.iter().filter(|s| s.vel.length() == 0.0) {
            assert_eq!(s.angular_vel, 0.0);
        }
    }

    #[test]
    fn test_scenario_old_start_style() {
        let mut session = SimulationSession::new(1920.0, 1080.0, 11);
        session.rebuild(&settings(StartStyle::Old));

        let snap = session.snapshot();
        assert_eq!(snap.len(), 9);
        for s in &snap {
            assert!((s.vel.length() - BALL_SPAWN_SPEED).abs() < 1e-3);
        }
    }

    #[test]
    fn test_resize_keeps_four_walls() {
        let mut session = SimulationSession::new(800.0, 600.0, 1);
        session.resize(1024.0, 768.0);
        assert_eq!(session.body_count(), 4);
        assert_eq!(session.bounds(), ArenaBounds::new(1024.0, 768.0));
    }

    #[test]
    fn test_views_in_pixels() {
        let mut session = SimulationSession::new(1920.0, 1080.0, 5);
        session.rebuild(&settings(StartStyle::New));
        let views = session.views();
        assert_eq!(views.len(), 9);
        assert!((views[0].pos - Vec2::new(480.0, 216.0)).length() < 1e-2);
        assert_eq!(views[0].radius, BALL_RADIUS_LARGE);
    }
}
