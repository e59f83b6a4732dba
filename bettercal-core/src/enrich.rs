//! Turning a parsed summary plus the lookup tables into an enriched event.

use crate::datasets::{self, Datasets};
use crate::event::EnrichedEvent;
use crate::summary::ParsedSummary;

/// Validity rules for synthesized shorthands.
///
/// The fallback heuristics can produce awkward abbreviations, so their
/// output is checked against a length window and a denylist. Both are
/// configuration rather than hard-coded law.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandRules {
    pub min_len: usize,
    pub max_len: usize,
    pub denylist: Vec<String>,
}

impl Default for ShorthandRules {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 6,
            denylist: vec!["SS".to_string(), "NAZI".to_string()],
        }
    }
}

impl ShorthandRules {
    fn is_valid(&self, candidate: &str) -> bool {
        let len = candidate.chars().count();
        len >= self.min_len
            && len <= self.max_len
            && !self.denylist.iter().any(|word| word == candidate)
    }
}

/// Enrich a parsed event against the lookup tables.
///
/// Never fails: missing lookup data simply leaves the corresponding
/// fields unset. Passing `shorthand_rules: None` disables abbreviation
/// entirely (`noshorthand` mode).
pub fn enrich(
    parsed: &ParsedSummary,
    room_name: Option<&str>,
    description: &str,
    datasets: &Datasets,
    shorthand_rules: Option<&ShorthandRules>,
) -> EnrichedEvent {
    let mut event = EnrichedEvent {
        number: parsed.course_number.clone(),
        title: parsed.title.clone(),
        session_type: parsed.session_type.clone(),
        suffix: parsed.suffix.clone(),
        description: description.to_string(),
        room: room_name.map(str::to_string),
        tiss_url: course_details_url(&parsed.course_number),
        ..EnrichedEvent::default()
    };

    if let Some(rules) = shorthand_rules {
        event.shorthand = resolve_shorthand(&parsed.title, datasets, rules);
    }

    if let Some(record) = room_name.and_then(|name| datasets.room(name)) {
        event.address = Some(record.address.clone());
        event.room_code = Some(record.room_code.clone());
        event.room_schedule_url = Some(record.schedule_url.clone());
        event.floor = record
            .floor
            .clone()
            .or_else(|| datasets::decode_floor_code(&record.room_code));
        event.map_url = Some(map_url(&record.room_code));
        if datasets.has_lecturetube(&record.room_code) {
            event.lecturetube_url = Some(datasets::player_url(&record.room_code));
        }
    }

    if let Some(course) = datasets.course(&parsed.course_number) {
        event.tuwel_url = course.tuwel_url.clone();
    }

    event
}

/// TISS course detail page for a `123.456` course number.
pub fn course_details_url(course_number: &str) -> String {
    format!(
        "https://tiss.tuwien.ac.at/course/courseDetails.xhtml?courseNr={}",
        course_number.trim().replace('.', "")
    )
}

fn map_url(room_code: &str) -> String {
    format!("https://tuw-maps.tuwien.ac.at/?q={room_code}#map")
}

fn resolve_shorthand(
    title: &str,
    datasets: &Datasets,
    rules: &ShorthandRules,
) -> Option<String> {
    if let Some(shorthand) = datasets.shorthand(title) {
        return Some(shorthand.to_uppercase());
    }
    synthesize_shorthand(title, rules)
}

/// Fallback shorthand synthesis for titles missing from the dictionary.
///
/// First the subsequence of uppercase letters in the title, then the
/// initials of capitalized words longer than one character. Either
/// candidate must pass the validity rules; otherwise the event keeps
/// its full title.
fn synthesize_shorthand(title: &str, rules: &ShorthandRules) -> Option<String> {
    let capitals: String = title.chars().filter(|c| c.is_uppercase()).collect();
    if rules.is_valid(&capitals) {
        return Some(capitals);
    }

    let initials: String = title
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|word| word.chars().count() > 1)
        .filter_map(|word| word.chars().next().filter(|c| c.is_uppercase()))
        .collect();
    if rules.is_valid(&initials) {
        return Some(initials);
    }

    None
}
