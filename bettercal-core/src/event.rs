//! Enriched event types produced by the calendar transform.
//!
//! These are the in-memory shape between parsing a raw TISS summary and
//! serializing the rewritten calendar entry. They are never persisted.

use serde::{Deserialize, Serialize};

/// One of the two display languages of the feed.
///
/// The locale only ever selects label vocabulary and which side of a
/// [`BilingualText`] is read; it never changes data values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    De,
    En,
}

impl Locale {
    /// Parse a locale query parameter. Anything that is not `en` is
    /// treated as German, the feed's native language.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("en") {
            Locale::En
        } else {
            Locale::De
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }
}

/// A piece of text with a German and an English rendering.
///
/// When only one rendering is known, both sides hold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub de: String,
    pub en: String,
}

impl BilingualText {
    pub fn new(de: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            de: de.into(),
            en: en.into(),
        }
    }

    /// A text with no translation, shown as-is in both locales.
    pub fn same(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            de: text.clone(),
            en: text,
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::De => &self.de,
            Locale::En => &self.en,
        }
    }
}

/// A fully enriched calendar event, ready for rendering.
///
/// Built by [`crate::enrich::enrich`], consumed by [`crate::render::render`].
/// Absent lookup data simply leaves the corresponding field `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    /// Course number in the `123.456` form.
    pub number: String,
    /// Course title, without the trailing `" - ..."` suffix.
    pub title: String,
    /// Two-letter session type code (VU, VO, UE, ...).
    pub session_type: String,
    /// Text after the last `" - "` separator of the original summary.
    pub suffix: Option<String>,
    /// Free-text description of the original event.
    pub description: String,

    /// Abbreviation substituted for the title in the summary.
    pub shorthand: Option<String>,

    /// Room display name as it appeared in the source event.
    pub room: Option<String>,
    /// Street address of the room's building.
    pub address: Option<String>,
    pub floor: Option<BilingualText>,
    /// Positional TISS room code, e.g. `HSEG02`.
    pub room_code: Option<String>,

    /// TISS course detail page.
    pub tiss_url: String,
    /// TUWEL (learning platform) course page.
    pub tuwel_url: Option<String>,
    /// TISS room reservation schedule.
    pub room_schedule_url: Option<String>,
    /// Campus map pin for the room.
    pub map_url: Option<String>,
    /// LectureTube live stream player.
    pub lecturetube_url: Option<String>,
}
