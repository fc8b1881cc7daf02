//! Vertical month axis and the bars drawn along it.
//!
//! The newest month sits at the top of the axis; every month below it is `month_height` lower.

use crate::config::TimelineConfig;
use crate::model::{BarLayout, YearTick};
use folio_core::{TimelineItem, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAxis {
    /// Epoch month at the top of the axis.
    pub latest: i64,
    /// Epoch month at the bottom of the axis.
    pub earliest: i64,
}

impl MonthAxis {
    pub fn from_items<'a>(
        items: impl IntoIterator<Item = &'a TimelineItem>,
        today: YearMonth,
    ) -> Option<Self> {
        let mut axis: Option<Self> = None;
        for item in items {
            let start = item.start.epoch_month();
            let end = item.effective_end(today).epoch_month();
            axis = Some(match axis {
                None => Self {
                    latest: end,
                    earliest: start,
                },
                Some(a) => Self {
                    latest: a.latest.max(end),
                    earliest: a.earliest.min(start),
                },
            });
        }
        axis
    }

    /// y of the top edge of `month`.
    pub fn month_top(&self, month: i64, config: &TimelineConfig) -> f64 {
        config.top_padding + (self.latest - month) as f64 * config.month_height
    }

    /// y of the bottom edge of `month`, where that month begins on a downward-older axis.
    pub fn month_bottom(&self, month: i64, config: &TimelineConfig) -> f64 {
        self.month_top(month, config) + config.month_height
    }

    /// Total height of the axis including the top padding.
    pub fn height(&self, config: &TimelineConfig) -> f64 {
        self.month_bottom(self.earliest, config)
    }

    /// One tick per calendar year, placed where the year begins and clamped to the axis.
    pub fn year_ticks(&self, config: &TimelineConfig) -> Vec<YearTick> {
        let (Some(first), Some(last)) = (
            YearMonth::from_epoch_month(self.earliest),
            YearMonth::from_epoch_month(self.latest),
        ) else {
            return Vec::new();
        };
        (first.year()..=last.year())
            .map(|year| {
                let january = i64::from(year) * 12;
                YearTick {
                    year,
                    y: self.month_bottom(january.max(self.earliest), config),
                }
            })
            .collect()
    }
}

/// The bar of `item` in lane `slot`.
pub fn bar_for(
    item: &TimelineItem,
    slot: usize,
    axis: &MonthAxis,
    config: &TimelineConfig,
    today: YearMonth,
) -> BarLayout {
    let duration_months = item.duration_months(today);
    let end = item.effective_end(today).epoch_month();
    BarLayout {
        x: slot as f64 * config.lane_width + (config.lane_width - config.bar_width) / 2.0,
        y: axis.month_top(end, config),
        width: config.bar_width,
        height: duration_months as f64 * config.month_height,
        duration_months,
        open_ended: item.is_current,
    }
}
