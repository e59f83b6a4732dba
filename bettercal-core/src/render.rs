//! Rendering an enriched event into its localized textual variants.
//!
//! Each event is rendered once per request into a summary line, a
//! plain-text description and an HTML description. Google Calendar
//! ignores the rule that descriptions are plain text, so the rewriter
//! picks which variant ends up in DESCRIPTION; both are produced here.

use crate::event::{EnrichedEvent, Locale};

/// The rendered textual variants of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub summary: String,
    pub plain: String,
    pub html: String,
}

struct Labels {
    room: &'static str,
    floor: &'static str,
    details: &'static str,
    course: &'static str,
    room_schedule: &'static str,
    learning_platform: &'static str,
    stream: &'static str,
}

const DE: Labels = Labels {
    room: "Raum",
    floor: "Stock",
    details: "Details",
    course: "LVA",
    room_schedule: "Raum Reservierung",
    learning_platform: "TUWEL",
    stream: "LectureTube",
};

const EN: Labels = Labels {
    room: "Room",
    floor: "Floor",
    details: "Details",
    course: "Lecture",
    room_schedule: "Room-Schedule",
    learning_platform: "TUWEL",
    stream: "LectureTube",
};

impl Locale {
    fn labels(&self) -> &'static Labels {
        match self {
            Locale::De => &DE,
            Locale::En => &EN,
        }
    }
}

pub fn render(event: &EnrichedEvent, locale: Locale) -> Rendered {
    Rendered {
        summary: render_summary(event),
        plain: render_plain(event, locale),
        html: render_html(event, locale),
    }
}

/// `(shorthand | title) + " " + session type [+ " - " + suffix]`
fn render_summary(event: &EnrichedEvent) -> String {
    let mut summary = String::new();
    summary.push_str(event.shorthand.as_deref().unwrap_or(&event.title));
    summary.push(' ');
    summary.push_str(&event.session_type);
    if let Some(suffix) = &event.suffix {
        summary.push_str(" - ");
        summary.push_str(suffix);
    }
    summary
}

fn render_plain(event: &EnrichedEvent, locale: Locale) -> String {
    let labels = locale.labels();
    let mut text = String::new();

    // Without a shorthand the summary already carries the full title.
    if event.shorthand.is_some() {
        text.push_str(&event.title);
        text.push('\n');
    }

    if let Some(room) = &event.room {
        text.push_str(&format!("{}: {}\n", labels.room, room));
        if let Some(floor) = &event.floor {
            text.push_str(&format!("{}: {}\n", labels.floor, floor.get(locale)));
        }
    }

    text.push('\n');
    text.push_str(&event.description);

    let links = detail_links(event, labels);
    if !links.is_empty() {
        text.push_str("\n\n");
        for (label, url) in links {
            text.push_str(&format!("{label}:\n{url}\n"));
        }
    }

    text
}

fn render_html(event: &EnrichedEvent, locale: Locale) -> String {
    let labels = locale.labels();
    let mut text = String::new();

    if event.shorthand.is_some() {
        text.push_str(&format!("<b>{}</b><br>", escape_html(&event.title)));
    }

    text.push_str(&format!(
        "{}: <a href=\"{}\">{}</a>",
        labels.details, event.tiss_url, labels.course
    ));
    if let Some(url) = &event.room_schedule_url {
        text.push_str(&format!(", <a href=\"{url}\">{}</a>", labels.room_schedule));
    }
    if let Some(url) = &event.tuwel_url {
        text.push_str(&format!(", <a href=\"{url}\">{}</a>", labels.learning_platform));
    }
    if let Some(url) = &event.lecturetube_url {
        text.push_str(&format!(", <a href=\"{url}\">{}</a>", labels.stream));
    }
    text.push_str("<br>");

    if let Some(room) = &event.room {
        match &event.map_url {
            Some(map_url) => text.push_str(&format!(
                "{}: <a href=\"{}\">{}</a><br>",
                labels.room,
                map_url,
                escape_html(room)
            )),
            None => text.push_str(&format!("{}: {}<br>", labels.room, escape_html(room))),
        }
        if let Some(floor) = &event.floor {
            text.push_str(&format!(
                "{}: {}<br>",
                labels.floor,
                escape_html(floor.get(locale))
            ));
        }
    }

    text.push_str("<br>");
    text.push_str(&escape_html(&event.description));

    text
}

/// Detail links in display order; only the URLs we actually resolved.
fn detail_links<'a>(
    event: &'a EnrichedEvent,
    labels: &'static Labels,
) -> Vec<(&'static str, &'a str)> {
    let mut links = vec![(labels.course, event.tiss_url.as_str())];
    if let Some(url) = &event.tuwel_url {
        links.push((labels.learning_platform, url));
    }
    if let Some(url) = &event.room_schedule_url {
        links.push((labels.room_schedule, url));
    }
    if let Some(url) = &event.lecturetube_url {
        links.push((labels.stream, url));
    }
    links
}

/// Minimal HTML escaping for user-supplied text. URLs we construct
/// ourselves are trusted and emitted verbatim.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
