#![forbid(unsafe_code)]

//! Content model for the folio portfolio.
//!
//! The content service hands out loosely typed JSON (experience records, skill tags). This crate
//! turns it into strongly typed values once, at ingestion, so the layout engine and the circle
//! simulator never have to sniff formats again.

pub mod date;
pub mod error;
pub mod experience;
pub mod skills;

pub use date::{CalendarDate, YearMonth};
pub use error::{Error, Result};
pub use experience::{
    ExperienceRecord, Ingested, ItemId, ItemKind, SkipReason, SkippedRecord, TimelineItem, ingest,
    parse_experience_feed,
};
pub use skills::{SkillTag, parse_skill_feed};
