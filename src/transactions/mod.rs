pub mod aggregate;
mod dto;
mod handlers;
pub mod model;
pub mod query;
pub mod repo;
mod repo_types;
mod services;
pub mod view;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::crud_routes())
        .merge(handlers::report_routes())
}
