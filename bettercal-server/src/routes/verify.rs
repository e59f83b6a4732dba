//! Feed-URL validation endpoint backing the home page form.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use url::Url;

use bettercal_core::tiss::{self, PERSONAL_CALENDAR_PATH, TISS_HOST};
use bettercal_core::BetterCalError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/verify", get(verify))
}

#[derive(Deserialize)]
struct VerifyParams {
    url: Option<String>,
}

async fn verify(Query(params): Query<VerifyParams>) -> Response {
    let Some(raw) = params.url else {
        return (StatusCode::BAD_REQUEST, "No url provided").into_response();
    };

    if let Err(reason) = validate_feed_url(&raw) {
        return (StatusCode::BAD_REQUEST, reason).into_response();
    }

    // One upstream attempt, no retries.
    match tiss::fetch_calendar(&raw).await {
        Ok(_) => "Ok".into_response(),
        Err(BetterCalError::UpstreamRejected(_)) => (
            StatusCode::BAD_REQUEST,
            "TISS rejected this url. Maybe the token is invalid?",
        )
            .into_response(),
        Err(BetterCalError::UpstreamUnreachable(_)) => (
            StatusCode::BAD_REQUEST,
            "Could not contact TISS. Maybe TISS is down?",
        )
            .into_response(),
        Err(BetterCalError::NotACalendar(_)) => (
            StatusCode::BAD_REQUEST,
            "TISS didn't return an ical file, did you paste the correct url?",
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something unexpected went wrong, maybe create a GitHub issue?",
        )
            .into_response(),
    }
}

/// Check the URL shape before touching the network.
fn validate_feed_url(raw: &str) -> Result<(), &'static str> {
    let Ok(url) = Url::parse(raw) else {
        return Err("The url must point to the TISS calendar");
    };

    // A friendlier message when the user pasted the schedule page itself
    // instead of the export link at its bottom.
    if url.host_str() == Some(TISS_HOST) && url.path().starts_with("/events/personSchedule.xhtml")
    {
        return Err("Almost, the url we need is at the bottom of the page you submitted");
    }

    if url.scheme() != "https"
        || url.host_str() != Some(TISS_HOST)
        || url.path() != PERSONAL_CALENDAR_PATH
    {
        return Err("The url must point to the TISS calendar");
    }

    if !url.query_pairs().any(|(key, _)| key == "token") {
        return Err("The url doesn't contain a token");
    }

    Ok(())
}
