//! The HTML home page.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::routes::AppError;
use crate::state::AppState;

const HOME_TEMPLATE: &str = include_str!("../../templates/home.html");

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let stats = state.usage.statistics().await?;
    let page = HOME_TEMPLATE.replace("{{ total_users }}", &stats.total_users.to_string());
    Ok(Html(page))
}
