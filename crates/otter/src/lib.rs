#![forbid(unsafe_code)]

//! Frame-driven circle collision simulator.
//!
//! `otter` backs the bouncing skill circles on the landing page. It is headless: the host owns
//! the clock and the drawing, and feeds timestamps into [`Simulation::frame`].

pub mod circle;
pub mod config;
pub mod error;
pub mod seed;
pub mod sim;

pub use circle::{Circle, CircleId, CircleSpec, CircleState, Navigation, Transform};
pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use seed::{SeedOptions, seed_circles};
pub use sim::{Frame, Simulation};
