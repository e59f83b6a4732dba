//! The calendar transform: walks a parsed document and rewrites it in place.
//!
//! One pass over the document: every VEVENT whose summary matches the
//! course grammar is enriched and has its summary, location and
//! description replaced; everything else passes through verbatim.
//! Afterwards one synthetic "registration opens" event is appended per
//! seen course with a known registration window, and the document
//! metadata is finalized.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};
use icalendar::{Calendar, CalendarComponent, Component, Event, EventLike, Property};

use crate::datasets::{CourseRecord, Datasets};
use crate::enrich::{course_details_url, enrich, ShorthandRules};
use crate::event::Locale;
use crate::render::{escape_html, render};
use crate::summary::SummaryPattern;

pub const PRODID: &str = "-//flofriday//Better TISS CAL//EN";
pub const CALENDAR_NAME: &str = "Better TISS";

const ALT_DESC_PROPERTY: &str = "X-ALT-DESC;FMTTYPE=text/html";
const REGISTRATION_CATEGORY: &str = "COURSE";

/// Behavioral knobs of one rewrite pass.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    pub locale: Locale,
    /// Put the HTML variant into DESCRIPTION for Google Calendar, which
    /// renders HTML there despite the standard saying plain text only.
    pub google_cal: bool,
    pub use_shorthand: bool,
    /// Whether google mode also keeps the `X-ALT-DESC` alternate.
    pub keep_alternate_description: bool,
    pub shorthand_rules: ShorthandRules,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            locale: Locale::De,
            google_cal: false,
            use_shorthand: true,
            keep_alternate_description: true,
            shorthand_rules: ShorthandRules::default(),
        }
    }
}

/// Rewrite the calendar in place. A document with zero matching events
/// is a no-op enrichment, never an error.
pub fn rewrite_calendar(calendar: &mut Calendar, datasets: &Datasets, options: &RewriteOptions) {
    let mut rewriter = CalendarRewriter {
        datasets,
        options,
        pattern: SummaryPattern::new(),
        seen_courses: BTreeSet::new(),
    };
    rewriter.walk_events(calendar);
    rewriter.insert_registrations(calendar);
    rewriter.finalize_metadata(calendar);
}

struct CalendarRewriter<'a> {
    datasets: &'a Datasets,
    options: &'a RewriteOptions,
    pattern: SummaryPattern,
    seen_courses: BTreeSet<String>,
}

impl CalendarRewriter<'_> {
    fn walk_events(&mut self, calendar: &mut Calendar) {
        for component in calendar.components.iter_mut() {
            // Enrichment only concerns events; todos, alarms and friends
            // pass through untouched.
            if let CalendarComponent::Event(event) = component {
                self.rewrite_event(event);
            }
        }
    }

    fn rewrite_event(&mut self, event: &mut Event) {
        let Some(summary) = event.get_summary().map(str::to_owned) else {
            return;
        };
        let Some(parsed) = self.pattern.parse(&summary) else {
            return;
        };

        let room = event.get_location().map(str::to_owned);
        let description = event.get_description().unwrap_or_default().to_owned();

        let rules = self
            .options
            .use_shorthand
            .then_some(&self.options.shorthand_rules);
        let enriched = enrich(&parsed, room.as_deref(), &description, self.datasets, rules);
        let rendered = render(&enriched, self.options.locale);

        event.summary(&rendered.summary);
        // An unknown room keeps the original location text.
        if let Some(address) = &enriched.address {
            event.location(address);
        }

        if self.options.google_cal {
            event.description(&rendered.html);
            if self.options.keep_alternate_description {
                event.add_property(ALT_DESC_PROPERTY, &rendered.html);
            }
        } else {
            event.description(&rendered.plain);
            if let Some(map_url) = &enriched.map_url {
                event.url(map_url);
            }
            event.add_property(ALT_DESC_PROPERTY, &rendered.html);
        }

        self.seen_courses.insert(parsed.course_number);
    }

    fn insert_registrations(&self, calendar: &mut Calendar) {
        // BTreeSet iteration keeps the synthetic events in course order.
        for number in &self.seen_courses {
            let Some(course) = self.datasets.course(number) else {
                continue;
            };
            let Some(start) = course.registration_start else {
                continue;
            };
            calendar.push(self.registration_event(number, course, start));
        }
    }

    fn registration_event(
        &self,
        number: &str,
        course: &CourseRecord,
        start: NaiveDateTime,
    ) -> Event {
        let locale = self.options.locale;
        let name = course.name.as_deref().unwrap_or(number);
        let summary = match locale {
            Locale::De => format!("Anmeldung {name}"),
            Locale::En => format!("Signup {name}"),
        };

        let course_url = if course.tiss_url.is_empty() {
            course_details_url(number)
        } else {
            course.tiss_url.clone()
        };

        let notice = match locale {
            Locale::De => "Die LVA-Anmeldung ist ab jetzt offen.",
            Locale::En => "Course registration is open from now on.",
        };
        let link_label = match locale {
            Locale::De => "LVA",
            Locale::En => "Lecture",
        };

        let mut event = Event::new();
        event.uid(&format!(
            "registration-{}@bettercal",
            number.replace('.', "")
        ));
        event.summary(&summary);
        event.starts(start);
        event.ends(registration_window_end(start));
        event.add_property("CATEGORIES", REGISTRATION_CATEGORY);
        if self.options.google_cal {
            event.description(&format!(
                "{notice}<br><br>{link_label}: <a href=\"{course_url}\">{}</a>",
                escape_html(name)
            ));
        } else {
            event.description(&format!("{notice}\n\n{link_label}:\n{course_url}\n"));
        }
        event.done()
    }

    fn finalize_metadata(&self, calendar: &mut Calendar) {
        set_calendar_property(calendar, "PRODID", PRODID);
        set_calendar_property(calendar, "NAME", CALENDAR_NAME);
        set_calendar_property(calendar, "X-WR-CALNAME", CALENDAR_NAME);
    }
}

/// A half-hour slot, stretched to 08:00 so a near-midnight registration
/// start does not end before anyone is awake.
fn registration_window_end(start: NaiveDateTime) -> NaiveDateTime {
    let end = start + Duration::minutes(30);
    match start.date().and_hms_opt(8, 0, 0) {
        Some(morning) if end < morning => morning,
        _ => end,
    }
}

/// Field-set assignment on the calendar's top-level property list.
fn set_calendar_property(calendar: &mut Calendar, key: &str, value: &str) {
    calendar
        .properties
        .retain(|property| !property.key().eq_ignore_ascii_case(key));
    calendar.properties.push(Property::new(key, value));
}
