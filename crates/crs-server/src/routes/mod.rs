//! Route groups merged into the top-level `axum::Router`.

pub mod agent;
pub mod health;
pub mod inspect;

use crate::state::AppState;
use axum::Router;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .nest("/agent", agent::routes())
        .merge(inspect::routes())
        .with_state(state)
}
