//! Aggregate usage statistics.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;
use crate::usage::{DailyUsage, Statistics};

pub fn router() -> Router<AppState> {
    Router::new().route("/statistics", get(statistics))
}

#[derive(Serialize)]
struct StatisticsResponse {
    #[serde(flatten)]
    totals: Statistics,
    series: Vec<DailyUsage>,
}

async fn statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let totals = state.usage.statistics().await?;
    let series = state.usage.series().await?;
    Ok(Json(StatisticsResponse { totals, series }))
}
