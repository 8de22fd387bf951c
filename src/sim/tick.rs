//! Fixed timestep simulation tick
//!
//! One call per display frame: advance the world by `SIM_DT` (not by the
//! measured frame time, so runs are reproducible), then pull any ball wedged
//! in a corner back into play.

use super::corner::{Corner, eject};
use super::session::SimulationSession;
use crate::consts::SIM_DT;

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// (ball index, corner) for every ejection this frame
    pub ejections: Vec<(usize, Corner)>,
}

/// Advance the session by one frame
pub fn tick(session: &mut SimulationSession) -> TickReport {
    session.step(SIM_DT);
    correct_corners(session)
}

/// Apply corner ejection to every ball
pub fn correct_corners(session: &mut SimulationSession) -> TickReport {
    let bounds = session.bounds();
    let mut report = TickReport::default();

    for index in 0..session.ball_count() {
        let radius = session.balls()[index].radius;
        let (Some(pos), Some(vel)) = (session.ball_position_px(index), session.ball_velocity(index))
        else {
            continue;
        };

        if let Some(e) = eject(pos, vel, radius, &bounds) {
            session.set_ball_state(index, e.pos, e.vel);
            report.ejections.push((index, e.corner));
            log::debug!(
                "Ball {} ejected from {:?} at {:.1} units/s",
                index,
                e.corner,
                e.vel.length()
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::{Settings, StartStyle};
    use glam::Vec2;

    fn session(style: StartStyle, seed: u64) -> SimulationSession {
        let mut s = SimulationSession::new(1280.0, 720.0, seed);
        s.rebuild(&Settings {
            start_style: style,
            ..Settings::default()
        });
        s
    }

    #[test]
    fn test_tick_advances_one_frame() {
        let mut s = session(StartStyle::New, 1);
        let before = s.ball_position_px(2).unwrap();
        tick(&mut s);
        assert_eq!(s.frames, 1);
        let after = s.ball_position_px(2).unwrap();
        // The moving ball travels speed * dt
        let expected = crate::units_to_px(BALL_SPAWN_SPEED * SIM_DT);
        assert!(((after - before).length() - expected).abs() < 0.5);
    }

    #[test]
    fn test_cornered_ball_is_ejected() {
        let mut s = session(StartStyle::New, 2);
        let r = s.balls()[0].radius;
        // Stalled in the top-left corner
        s.set_ball_state(0, Vec2::new(r + 0.5, r + 0.5), Vec2::ZERO);

        let report = correct_corners(&mut s);
        assert_eq!(report.ejections, vec![(0, Corner::TopLeft)]);

        let vel = s.ball_velocity(0).unwrap();
        assert!(vel.length() >= EJECT_MIN_SPEED - 1e-3);
        assert!(vel.x > 0.0 && vel.y > 0.0);
        let pos = s.ball_position_px(0).unwrap();
        assert!(pos.x - r > CORNER_TOLERANCE_PX);
        assert!(pos.y - r > CORNER_TOLERANCE_PX);

        // Not re-detected on the next pass
        assert!(correct_corners(&mut s).ejections.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = session(StartStyle::Old, 99);
        let mut b = session(StartStyle::Old, 99);
        for _ in 0..120 {
            tick(&mut a);
            tick(&mut b);
        }
        for i in 0..a.ball_count() {
            let pa = a.ball_position_px(i).unwrap();
            let pb = b.ball_position_px(i).unwrap();
            assert!((pa - pb).length() < 1e-4);
        }
    }

    #[test]
    fn test_balls_stay_in_arena() {
        let mut s = session(StartStyle::Old, 7);
        for _ in 0..600 {
            tick(&mut s);
        }
        let bounds = s.bounds();
        s.for_each_ball(|b| {
            assert!(b.pos.x > -1.0 && b.pos.x < bounds.width + 1.0);
            assert!(b.pos.y > -1.0 && b.pos.y < bounds.height + 1.0);
        });
    }
}
