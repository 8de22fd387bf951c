//! Ball simulation
//!
//! Physics state lives in a `SimulationSession`; nothing in here draws.
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (registry order)

pub mod arena;
pub mod ball;
pub mod corner;
pub mod layout;
pub mod session;
pub mod tick;
pub mod world;

pub use arena::{Arena, ArenaBounds};
pub use ball::{Ball, BallSnapshot, BallSpec, BallView, spawn_ball};
pub use corner::{Corner, Ejection, detect_corner, eject};
pub use layout::init_game;
pub use session::SimulationSession;
pub use tick::{TickReport, correct_corners, tick};
pub use world::PhysicsWorld;
