//! Starting grid
//!
//! Three rows of three balls (large, medium, small), spaced by fractions of the
//! canvas so the layout works at any resolution.

use super::ball::BallSpec;
use crate::consts::*;
use crate::renderer::color::{Rgba, colors};
use crate::settings::StartStyle;

/// Horizontal position of each size column, as a fraction of canvas width
const COLUMN_FRACTIONS: [f32; 3] = [0.25, 0.5, 0.75];
/// Vertical position of each row, as a fraction of canvas height
const ROW_FRACTIONS: [f32; 3] = [0.2, 0.5, 0.8];
/// Radius per column
const COLUMN_RADII: [f32; 3] = [BALL_RADIUS_LARGE, BALL_RADIUS_MEDIUM, BALL_RADIUS_SMALL];
/// Color per row
const ROW_COLORS: [Rgba; 3] = [colors::BALL_RED, colors::BALL_AMBER, colors::BALL_TEAL];

/// Column holding the small balls
pub const SMALL_COLUMN: usize = 2;

/// Lay out the nine starting balls for a `width` x `height` canvas.
///
/// `Old` starts every ball moving. `New` starts only the top-row small ball,
/// leaving the rest for it to knock around.
pub fn init_game(width: f32, height: f32, style: StartStyle) -> Vec<BallSpec> {
    let mut specs = Vec::with_capacity(ROW_FRACTIONS.len() * COLUMN_FRACTIONS.len());

    for (row, row_frac) in ROW_FRACTIONS.iter().enumerate() {
        for (col, col_frac) in COLUMN_FRACTIONS.iter().enumerate() {
            let should_move = match style {
                StartStyle::Old => true,
                StartStyle::New => row == 0 && col == SMALL_COLUMN,
            };
            specs.push(BallSpec {
                x: width * col_frac,
                y: height * row_frac,
                radius: COLUMN_RADII[col],
                color: ROW_COLORS[row],
                should_move,
            });
        }
    }

    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_balls_inside_canvas() {
        let specs = init_game(1920.0, 1080.0, StartStyle::Old);
        assert_eq!(specs.len(), 9);
        for s in &specs {
            assert!(s.x - s.radius > 0.0 && s.x + s.radius < 1920.0);
            assert!(s.y - s.radius > 0.0 && s.y + s.radius < 1080.0);
        }
    }

    #[test]
    fn test_radius_ratios() {
        let specs = init_game(1920.0, 1080.0, StartStyle::New);
        let large = specs[0].radius;
        assert!((specs[1].radius / large - 0.5).abs() < 1e-6);
        assert!((specs[2].radius / large - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_movement_per_style() {
        let old = init_game(1920.0, 1080.0, StartStyle::Old);
        assert!(old.iter().all(|s| s.should_move));

        let new = init_game(1920.0, 1080.0, StartStyle::New);
        let moving: Vec<_> = new.iter().enumerate().filter(|(_, s)| s.should_move).collect();
        assert_eq!(moving.len(), 1);
        assert_eq!(moving[0].0, SMALL_COLUMN);
        assert_eq!(moving[0].1.radius, BALL_RADIUS_SMALL);
    }
}
