pub mod error;
pub mod page;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::state::HttpState;

pub fn router(state: HttpState, max_upload_bytes: usize) -> Router {
    let site_assets = ServeDir::new(&state.static_dir);
    let predict_assets = ServeDir::new(state.static_dir.join("predict"));
    Router::new()
        .route("/", get(routes::home))
        .route("/predict", get(routes::index).post(routes::predict))
        .route("/predict/", get(routes::index).post(routes::predict))
        .nest_service("/static", site_assets)
        .nest_service("/predict/static", predict_assets)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
