//! Core logic for the Better TISS calendar service.
//!
//! This crate turns the terse personal TISS calendar feed into a
//! human-readable one:
//! - `summary` parses the fixed `"123.456 VU Title - Extra"` summary shape
//! - `datasets` loads the room, shorthand, course and LectureTube tables
//! - `enrich` cross-references a parsed event against those tables
//! - `render` produces the localized summary and plain/HTML descriptions
//! - `rewrite` walks a whole calendar document and rewrites it in place
//! - `tiss` fetches and parses the upstream feed

pub mod datasets;
pub mod enrich;
pub mod error;
pub mod event;
pub mod render;
pub mod rewrite;
pub mod summary;
pub mod tiss;

pub use datasets::Datasets;
pub use error::{BetterCalError, BetterCalResult};
pub use event::{BilingualText, EnrichedEvent, Locale};
pub use rewrite::{rewrite_calendar, RewriteOptions};
pub use summary::{ParsedSummary, SummaryPattern};
