//! The enriched personal calendar feed.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::warn;

use bettercal_core::rewrite::{rewrite_calendar, RewriteOptions};
use bettercal_core::tiss;
use bettercal_core::{BetterCalError, Locale};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/personal.ics", get(personal_ics))
}

const BROWSER_GUIDANCE: &str = "This is a calendar feed, not a web page. \
Add the address to your calendar app as a subscription instead of opening it in a browser.";

async fn personal_ics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(token) = params.get("token") else {
        return (StatusCode::BAD_REQUEST, "No token provided").into_response();
    };
    let Some(locale_tag) = params.get("locale") else {
        return (StatusCode::BAD_REQUEST, "No locale provided").into_response();
    };

    // Calendar clients never ask for html; an interactive browser does.
    if wants_html(&headers) {
        return (StatusCode::NOT_ACCEPTABLE, BROWSER_GUIDANCE).into_response();
    }

    let locale = Locale::from_tag(locale_tag);
    let options = RewriteOptions {
        locale,
        google_cal: params.contains_key("google"),
        use_shorthand: !params.contains_key("noshorthand"),
        ..RewriteOptions::default()
    };

    let url = tiss::personal_calendar_url(token, locale);
    let mut calendar = match tiss::fetch_calendar(&url).await {
        Ok(calendar) => calendar,
        Err(error) => return upstream_error_response(error),
    };

    rewrite_calendar(&mut calendar, &state.datasets, &options);

    // The calendar is worth more than the statistics row.
    if let Err(error) = state.usage.record(token).await {
        warn!(%error, "failed to record usage");
    }

    (
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        calendar.to_string(),
    )
        .into_response()
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn upstream_error_response(error: BetterCalError) -> Response {
    match error {
        BetterCalError::UpstreamRejected(_) => (
            StatusCode::BAD_REQUEST,
            "TISS rejected this token. Maybe it is invalid?",
        )
            .into_response(),
        BetterCalError::UpstreamUnreachable(_) => (
            StatusCode::BAD_REQUEST,
            "Could not contact TISS. Maybe TISS is down?",
        )
            .into_response(),
        BetterCalError::NotACalendar(_) => (
            StatusCode::BAD_REQUEST,
            "TISS didn't return an ical file, did you paste the correct url?",
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something unexpected went wrong, maybe create a GitHub issue?",
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn browsers_are_detected_by_their_accept_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        assert!(wants_html(&headers));
    }

    #[test]
    fn calendar_clients_are_not() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/calendar"));
        assert!(!wants_html(&headers));

        let empty = HeaderMap::new();
        assert!(!wants_html(&empty));
    }
}
