//! The fixed grammar of TISS event summaries.
//!
//! Every schedule entry in the personal feed starts with a course number
//! and a session type, e.g. `"182.692 VU Programmiersprachen - Project"`.
//! Anything that does not match this shape is not a course event and is
//! passed through the rewriter untouched.

use regex::Regex;

/// The parsed pieces of a course-event summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSummary {
    /// Course number, `XXX.XXX` with alphanumeric groups.
    pub course_number: String,
    /// Two-letter session type code.
    pub session_type: String,
    /// Course title.
    pub title: String,
    /// Text after the last `" - "` separator, if the title carried one.
    pub suffix: Option<String>,
}

/// Compiled matcher for the summary grammar.
///
/// Kept as its own type so the grammar can be swapped without touching
/// the enricher.
#[derive(Debug, Clone)]
pub struct SummaryPattern {
    regex: Regex,
}

impl SummaryPattern {
    pub fn new() -> Self {
        // Anchored at the start only; trailing garbage is part of the title.
        let regex = Regex::new(r"^([0-9A-Z]{3}\.[0-9A-Z]{3}) ([A-Z]{2}) (.*)")
            .expect("summary grammar is a valid regex");
        Self { regex }
    }

    /// Parse a raw summary. `None` means the summary does not describe a
    /// course event; that is an expected outcome, not an error.
    pub fn parse(&self, summary: &str) -> Option<ParsedSummary> {
        let caps = self.regex.captures(summary)?;

        let rest = &caps[3];
        let (title, suffix) = match rest.rsplit_once(" - ") {
            Some((title, suffix)) => (title.to_string(), Some(suffix.to_string())),
            None => (rest.to_string(), None),
        };

        Some(ParsedSummary {
            course_number: caps[1].to_string(),
            session_type: caps[2].to_string(),
            title,
            suffix,
        })
    }
}

impl Default for SummaryPattern {
    fn default() -> Self {
        Self::new()
    }
}
