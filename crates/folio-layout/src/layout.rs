use crate::Result;
use crate::assign::{assign_sorted, chronological};
use crate::bars::{MonthAxis, bar_for};
use crate::cards::CardPlacer;
use crate::config::TimelineConfig;
use crate::model::{Bounds, CardLayout, ConnectorLayout, TimelineEntryLayout, TimelineLayout};
use folio_core::{TimelineItem, YearMonth};

#[derive(Debug, Clone)]
pub struct TimelineLayoutOptions {
    pub config: TimelineConfig,
    /// The month current items extend to. Injected so the layout stays a pure function.
    pub today: YearMonth,
}

impl TimelineLayoutOptions {
    pub fn new(today: YearMonth) -> Self {
        Self {
            config: TimelineConfig::default(),
            today,
        }
    }

    pub fn with_config(mut self, config: TimelineConfig) -> Self {
        self.config = config;
        self
    }
}

/// Lays out `items` as a vertical timeline.
///
/// An empty item list yields an empty layout; the caller renders an empty state.
pub fn layout_timeline(
    items: &[TimelineItem],
    options: &TimelineLayoutOptions,
) -> Result<TimelineLayout> {
    let config = &options.config;
    config.validate()?;
    let today = options.today;

    let sorted = chronological(items);
    let Some(axis) = MonthAxis::from_items(sorted.iter().copied(), today) else {
        tracing::debug!("no timeline items, emitting empty layout");
        return Ok(TimelineLayout::default());
    };
    let assignments = assign_sorted(&sorted, config, today);

    let lanes = assignments.iter().map(|a| a.slot + 1).max().unwrap_or(0);
    let cards_origin_x = lanes as f64 * config.lane_width + config.card_gutter;

    let mut bounds = Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: lanes as f64 * config.lane_width,
        max_y: axis.height(config),
    };
    let mut placer = CardPlacer::new(config);
    let mut entries = Vec::with_capacity(sorted.len());

    for (item, assignment) in sorted.iter().zip(assignments) {
        let bar = bar_for(item, assignment.slot, &axis, config, today);
        let start_edge = bar.y + bar.height;
        let placed = placer.place(
            item.start.epoch_month(),
            (start_edge - config.card_height).max(0.0),
        );
        let card = CardLayout {
            x: cards_origin_x + placed.horizontal_offset,
            y: placed.vertical_offset,
            width: config.card_width,
            height: config.card_height,
            horizontal_offset: placed.horizontal_offset,
            vertical_offset: placed.vertical_offset,
        };
        let connector_y = (start_edge - config.connector_inset)
            .max(bar.y)
            .max(card.y)
            .min(card.y + card.height);
        let connector = ConnectorLayout {
            x1: bar.x + bar.width,
            y1: connector_y,
            x2: card.x,
            y2: connector_y,
        };

        bounds.include_rect(bar.x, bar.y, bar.width, bar.height);
        bounds.include_rect(card.x, card.y, card.width, card.height);

        entries.push(TimelineEntryLayout {
            id: item.id().to_string(),
            kind: item.kind,
            label: item.label.clone(),
            subtitle: item.subtitle.clone(),
            start: item.start,
            end: item.end,
            is_current: item.is_current,
            slot: assignment.slot,
            color: assignment.color,
            bar,
            card,
            connector,
        });
    }

    tracing::debug!(
        entries = entries.len(),
        lanes,
        width = bounds.width(),
        height = bounds.height(),
        "laid out timeline"
    );

    Ok(TimelineLayout {
        entries,
        lanes,
        cards_origin_x,
        axis: axis.year_ticks(config),
        bounds,
    })
}
