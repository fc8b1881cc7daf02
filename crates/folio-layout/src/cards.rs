//! Summary card placement.
//!
//! Only the horizontal offset is searched. Cards are placed in chronological order and each one
//! moves right, a column at a time, until no card already placed with a nearby start month sits
//! in an overlapping horizontal band.

use crate::config::TimelineConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedCard {
    /// Epoch month of the source item's start date.
    pub start_month: i64,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
}

/// Finds the first free column for a card starting at `start_month`.
///
/// Every card in `already_placed` whose start month is within `nearby_window_months` of
/// `start_month` ends up at least `card_width` away horizontally.
pub fn place(
    start_month: i64,
    vertical_offset: f64,
    already_placed: &[PlacedCard],
    config: &TimelineConfig,
) -> PlacedCard {
    let nearby: Vec<f64> = already_placed
        .iter()
        .filter(|c| (c.start_month - start_month).abs() <= config.nearby_window_months)
        .map(|c| c.horizontal_offset)
        .collect();

    // Each nearby card blocks at most two columns, so one of the first `2n + 1` is free.
    let step = config.card_step();
    let horizontal_offset = (0..=2 * nearby.len())
        .map(|column| column as f64 * step)
        .find(|&candidate| {
            nearby
                .iter()
                .all(|&left| (left - candidate).abs() >= config.card_width)
        })
        .unwrap_or((2 * nearby.len() + 1) as f64 * step);

    PlacedCard {
        start_month,
        horizontal_offset,
        vertical_offset,
    }
}

/// Placement accumulator for a single layout pass.
///
/// Create one per layout call; later cards see the cards placed before them.
#[derive(Debug, Clone)]
pub struct CardPlacer<'a> {
    config: &'a TimelineConfig,
    placed: Vec<PlacedCard>,
}

impl<'a> CardPlacer<'a> {
    pub fn new(config: &'a TimelineConfig) -> Self {
        Self {
            config,
            placed: Vec::new(),
        }
    }

    pub fn place(&mut self, start_month: i64, vertical_offset: f64) -> PlacedCard {
        let card = place(start_month, vertical_offset, &self.placed, self.config);
        tracing::trace!(
            start_month,
            horizontal_offset = card.horizontal_offset,
            "placed card"
        );
        self.placed.push(card);
        card
    }

    pub fn placed(&self) -> &[PlacedCard] {
        &self.placed
    }
}
