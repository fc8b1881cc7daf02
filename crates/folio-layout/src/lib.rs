#![forbid(unsafe_code)]

//! Headless layout for the experience timeline.
//!
//! The pipeline is pure and synchronous: items are sorted chronologically, assigned a lane and a
//! color ([`assign`]), sized into bars along a vertical month axis ([`bars`]), and given cards
//! whose positions are searched against the cards placed earlier in the same call ([`cards`]).

pub mod assign;
pub mod bars;
pub mod cards;
pub mod config;
pub mod model;
pub mod svg;

mod layout;

pub use assign::{ColorSlotAssignment, assign};
pub use cards::{CardPlacer, PlacedCard, place};
pub use config::TimelineConfig;
pub use layout::{TimelineLayoutOptions, layout_timeline};
pub use model::TimelineLayout;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid timeline config: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
