use crate::date::{CalendarDate, YearMonth};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One experience entry exactly as the content service serves it.
///
/// Every field is optional on the wire; [`ingest`] decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceRecord {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub school: Option<String>,
    pub degree: Option<String>,
    /// Served as either a number (`3.8`) or a string (`"3.8/4.0"`).
    pub gpa: Option<Value>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExperienceFeed {
    Bare(Vec<ExperienceRecord>),
    Data { data: Vec<ExperienceRecord> },
    Experiences { experiences: Vec<ExperienceRecord> },
}

/// Parses an experience feed: a bare array, or an envelope with a `data` or `experiences` array.
pub fn parse_experience_feed(json: &str) -> Result<Vec<ExperienceRecord>> {
    let value: Value = serde_json::from_str(json)?;
    if !(value.is_array() || value.is_object()) {
        return Err(Error::InvalidFeed {
            message: "expected an array of experience records or an object envelope".to_string(),
        });
    }
    let feed: ExperienceFeed = serde_json::from_value(value).map_err(|e| Error::InvalidFeed {
        message: format!("unrecognized experience feed shape: {e}"),
    })?;
    Ok(match feed {
        ExperienceFeed::Bare(records)
        | ExperienceFeed::Data { data: records }
        | ExperienceFeed::Experiences {
            experiences: records,
        } => records,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Job,
    School,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::School => "school",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "job" | "work" => Some(Self::Job),
            "school" | "education" => Some(Self::School),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of a timeline item: `(kind, title-or-school, start)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId {
    pub kind: ItemKind,
    pub label: String,
    pub start: CalendarDate,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.label, self.start)
    }
}

/// An experience entry that is guaranteed to be placeable on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub kind: ItemKind,
    /// Job title or school name.
    pub label: String,
    /// Company or degree.
    pub subtitle: Option<String>,
    pub location: Option<String>,
    pub gpa: Option<String>,
    pub start: CalendarDate,
    pub end: Option<CalendarDate>,
    pub is_current: bool,
    pub description: String,
}

impl TimelineItem {
    pub fn id(&self) -> ItemId {
        ItemId {
            kind: self.kind,
            label: self.label.clone(),
            start: self.start,
        }
    }

    /// The date the item extends to for layout purposes.
    ///
    /// Current items run to `today` regardless of a stale `end`. An end earlier than the start
    /// (possible when `today` predates the start) is lifted to the start.
    pub fn effective_end(&self, today: YearMonth) -> CalendarDate {
        let end = match (self.is_current, self.end) {
            (false, Some(end)) => end,
            _ => CalendarDate::YearMonth(today),
        };
        end.max(self.start)
    }

    pub fn duration_months(&self, today: YearMonth) -> i64 {
        (self.effective_end(today).epoch_month() - self.start.epoch_month()).max(0) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "camelCase")]
pub enum SkipReason {
    MissingStartDate,
    InvalidStartDate(String),
    InvalidEndDate(String),
    EndBeforeStart,
    MissingLabel,
    UnknownKind(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartDate => f.write_str("missing start date"),
            Self::InvalidStartDate(v) => write!(f, "invalid start date {v:?}"),
            Self::InvalidEndDate(v) => write!(f, "invalid end date {v:?}"),
            Self::EndBeforeStart => f.write_str("end date precedes start date"),
            Self::MissingLabel => f.write_str("missing title or school name"),
            Self::UnknownKind(v) => write!(f, "unknown experience type {v:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Position of the record in the source feed.
    pub index: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub items: Vec<TimelineItem>,
    pub skipped: Vec<SkippedRecord>,
}

fn non_blank(v: Option<&String>) -> Option<String> {
    v.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn gpa_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => non_blank(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn ingest_one(record: &ExperienceRecord) -> std::result::Result<TimelineItem, SkipReason> {
    let kind = match record.kind.as_deref() {
        Some(raw) => {
            ItemKind::from_wire(raw).ok_or_else(|| SkipReason::UnknownKind(raw.to_string()))?
        }
        None if record.school.is_some() => ItemKind::School,
        None => ItemKind::Job,
    };

    let (label, subtitle) = match kind {
        ItemKind::Job => (non_blank(record.title.as_ref()), non_blank(record.company.as_ref())),
        ItemKind::School => (non_blank(record.school.as_ref()), non_blank(record.degree.as_ref())),
    };
    let label = label.ok_or(SkipReason::MissingLabel)?;

    let start_raw = non_blank(record.start_date.as_ref()).ok_or(SkipReason::MissingStartDate)?;
    let start = CalendarDate::parse(&start_raw)
        .map_err(|_| SkipReason::InvalidStartDate(start_raw.clone()))?;

    let end = match non_blank(record.end_date.as_ref()) {
        None => None,
        Some(raw) => {
            Some(CalendarDate::parse(&raw).map_err(|_| SkipReason::InvalidEndDate(raw.clone()))?)
        }
    };
    // Month resolution: an end anywhere in the start month is fine.
    if end.is_some_and(|end| end.epoch_month() < start.epoch_month()) {
        return Err(SkipReason::EndBeforeStart);
    }

    Ok(TimelineItem {
        kind,
        label,
        subtitle,
        location: match kind {
            ItemKind::Job => non_blank(record.location.as_ref()),
            ItemKind::School => None,
        },
        gpa: match kind {
            ItemKind::School => gpa_text(record.gpa.as_ref()),
            ItemKind::Job => None,
        },
        start,
        is_current: record.current.unwrap_or(false) || end.is_none(),
        end,
        description: record
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Normalizes raw records into timeline items.
///
/// Records that cannot be placed on a timeline are skipped, never reported as errors; the caller
/// gets the list of skipped records alongside the usable ones.
pub fn ingest(records: &[ExperienceRecord]) -> Ingested {
    let mut out = Ingested::default();
    for (index, record) in records.iter().enumerate() {
        match ingest_one(record) {
            Ok(item) => out.items.push(item),
            Err(reason) => {
                tracing::warn!(index, %reason, "skipping experience record");
                out.skipped.push(SkippedRecord { index, reason });
            }
        }
    }
    tracing::debug!(
        items = out.items.len(),
        skipped = out.skipped.len(),
        "ingested experience feed"
    );
    out
}
