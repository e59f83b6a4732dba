//! Client for the TISS personal-calendar feed.
//!
//! One fetch attempt per request, no retries: a failure is mapped to a
//! typed error and surfaced to the caller.

use icalendar::parser::{read_calendar, unfold};
use icalendar::Calendar;
use tracing::debug;

use crate::error::{BetterCalError, BetterCalResult};
use crate::event::Locale;

pub const TISS_HOST: &str = "tiss.tuwien.ac.at";
pub const PERSONAL_CALENDAR_PATH: &str = "/events/rest/calendar/personal";

/// The upstream feed URL for a token/locale pair.
pub fn personal_calendar_url(token: &str, locale: Locale) -> String {
    format!(
        "https://{TISS_HOST}{PERSONAL_CALENDAR_PATH}?token={token}&locale={}",
        locale.as_tag()
    )
}

/// Fetch and parse the upstream calendar.
pub async fn fetch_calendar(url: &str) -> BetterCalResult<Calendar> {
    debug!(url, "fetching upstream calendar");

    let response = reqwest::get(url)
        .await
        .map_err(|e| BetterCalError::UpstreamUnreachable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BetterCalError::UpstreamRejected(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| BetterCalError::UpstreamUnreachable(e.to_string()))?;

    parse_calendar(&body)
}

/// Parse raw iCalendar text into the document model.
pub fn parse_calendar(content: &str) -> BetterCalResult<Calendar> {
    let unfolded = unfold(content);
    let parsed =
        read_calendar(&unfolded).map_err(|e| BetterCalError::NotACalendar(e.to_string()))?;
    Ok(parsed.into())
}
