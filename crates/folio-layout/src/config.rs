use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Colors handed out to timeline items in order. Fourteen entries; once all of them are held by
/// active items the layout falls back to [`DEFAULT_FALLBACK_COLOR`].
pub const DEFAULT_PALETTE: [&str; 14] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#bfef45",
    "#469990", "#9a6324", "#800000", "#808000", "#000075", "#a9a9a9",
];

pub const DEFAULT_FALLBACK_COLOR: &str = "#000000";

pub const DEFAULT_COLOR_COOLDOWN_DAYS: u64 = 32;
pub const DEFAULT_NEARBY_WINDOW_MONTHS: i64 = 3;
pub const DEFAULT_CARD_WIDTH: f64 = 320.0;
pub const DEFAULT_CARD_SPACING: f64 = 16.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub palette: Vec<String>,
    pub fallback_color: String,
    /// Days after an item ends before its color may be handed out again.
    pub color_cooldown_days: u64,
    /// Cards whose start months differ by at most this many months must not share a column.
    pub nearby_window_months: i64,

    pub card_width: f64,
    pub card_height: f64,
    pub card_spacing: f64,
    /// Horizontal gap between the last lane and the first card column.
    pub card_gutter: f64,
    /// Distance of a connector above the start edge of its bar.
    pub connector_inset: f64,

    pub lane_width: f64,
    pub bar_width: f64,
    pub month_height: f64,
    pub top_padding: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
            color_cooldown_days: DEFAULT_COLOR_COOLDOWN_DAYS,
            nearby_window_months: DEFAULT_NEARBY_WINDOW_MONTHS,
            card_width: DEFAULT_CARD_WIDTH,
            card_height: 96.0,
            card_spacing: DEFAULT_CARD_SPACING,
            card_gutter: 48.0,
            connector_inset: 12.0,
            lane_width: 28.0,
            bar_width: 12.0,
            month_height: 16.0,
            top_padding: 40.0,
        }
    }
}

impl TimelineConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("card_width", self.card_width),
            ("card_height", self.card_height),
            ("lane_width", self.lane_width),
            ("bar_width", self.bar_width),
            ("month_height", self.month_height),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a positive number, got {v}"),
                });
            }
        }
        let non_negative = [
            ("card_spacing", self.card_spacing),
            ("card_gutter", self.card_gutter),
            ("connector_inset", self.connector_inset),
            ("top_padding", self.top_padding),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a non-negative number, got {v}"),
                });
            }
        }
        if self.nearby_window_months < 0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "nearby_window_months must be non-negative, got {}",
                    self.nearby_window_months
                ),
            });
        }
        Ok(())
    }

    /// Horizontal distance between two adjacent card columns.
    pub fn card_step(&self) -> f64 {
        self.card_width + self.card_spacing
    }
}
