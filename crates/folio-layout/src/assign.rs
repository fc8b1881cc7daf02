use crate::config::TimelineConfig;
use chrono::{Days, NaiveDate};
use folio_core::{CalendarDate, ItemId, TimelineItem, YearMonth};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSlotAssignment {
    /// Lane index; unique among items whose intervals overlap.
    pub slot: usize,
    pub color: String,
}

#[derive(Debug, Clone)]
struct Active<E, T> {
    end: E,
    value: T,
}

/// Day used for cooldown arithmetic. The timeline works at month resolution, so a full date
/// counts as the first of its month.
fn month_day(date: CalendarDate) -> NaiveDate {
    date.year_month().first_day()
}

/// Items in ascending start month. Items starting in the same month keep their input order.
///
/// Items are identified by [`ItemId`]; when several share one, only the first in input order is
/// kept.
pub(crate) fn chronological(items: &[TimelineItem]) -> Vec<&TimelineItem> {
    let mut seen: FxHashSet<ItemId> = FxHashSet::default();
    let mut sorted: Vec<&TimelineItem> = items
        .iter()
        .filter(|item| {
            let id = item.id();
            if seen.contains(&id) {
                tracing::warn!(item = %id, "duplicate timeline item id");
                return false;
            }
            seen.insert(id);
            true
        })
        .collect();
    sorted.sort_by_key(|item| item.start.epoch_month());
    sorted
}

/// Assigns lanes and colors to already sorted items; the output is parallel to `sorted`.
pub(crate) fn assign_sorted(
    sorted: &[&TimelineItem],
    config: &TimelineConfig,
    today: YearMonth,
) -> Vec<ColorSlotAssignment> {
    let mut active_slots: Vec<Active<i64, usize>> = Vec::new();
    let mut active_colors: Vec<Active<NaiveDate, String>> = Vec::new();
    let mut out = Vec::with_capacity(sorted.len());

    for item in sorted {
        let end = item.effective_end(today);

        // A lane stays busy through its item's whole end month.
        let start_month = item.start.epoch_month();
        active_slots.retain(|a| a.end >= start_month);
        let slot = (0..=active_slots.len())
            .find(|s| !active_slots.iter().any(|a| a.value == *s))
            .unwrap_or(active_slots.len());
        active_slots.push(Active {
            end: end.epoch_month(),
            value: slot,
        });

        let start_day = month_day(item.start);
        active_colors.retain(|a| {
            a.end
                .checked_add_days(Days::new(config.color_cooldown_days))
                .is_none_or(|cooled| cooled >= start_day)
        });
        let color = match config
            .palette
            .iter()
            .find(|c| !active_colors.iter().any(|a| &a.value == *c))
        {
            Some(c) => c.clone(),
            None => {
                tracing::debug!(
                    item = %item.id(),
                    active = active_colors.len(),
                    "palette exhausted, using fallback color"
                );
                config.fallback_color.clone()
            }
        };
        active_colors.push(Active {
            end: month_day(end),
            value: color.clone(),
        });

        tracing::trace!(item = %item.id(), slot, color = %color, "assigned lane");
        out.push(ColorSlotAssignment { slot, color });
    }
    out
}

/// Assigns every item a lane and a color, keyed by its composite id in chronological order.
///
/// When two items share an id only the first one in input order is laid out.
pub fn assign(
    items: &[TimelineItem],
    config: &TimelineConfig,
    today: YearMonth,
) -> IndexMap<ItemId, ColorSlotAssignment> {
    let sorted = chronological(items);
    let assignments = assign_sorted(&sorted, config, today);
    sorted.iter().map(|item| item.id()).zip(assignments).collect()
}
