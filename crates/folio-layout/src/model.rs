use folio_core::{CalendarDate, ItemKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub(crate) fn include_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x + width);
        self.max_y = self.max_y.max(y + height);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub duration_months: i64,
    /// Current items fade out at the top instead of ending.
    pub open_ended: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Offset from the first card column, as searched by the card placer.
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorLayout {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntryLayout {
    pub id: String,
    pub kind: ItemKind,
    pub label: String,
    pub subtitle: Option<String>,
    pub start: CalendarDate,
    pub end: Option<CalendarDate>,
    pub is_current: bool,
    pub slot: usize,
    pub color: String,
    pub bar: BarLayout,
    pub card: CardLayout,
    pub connector: ConnectorLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearTick {
    pub year: i32,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineLayout {
    /// Entries in chronological order of their start dates.
    pub entries: Vec<TimelineEntryLayout>,
    pub lanes: usize,
    pub cards_origin_x: f64,
    #[serde(default)]
    pub axis: Vec<YearTick>,
    pub bounds: Bounds,
}

impl TimelineLayout {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
