use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use groups_shared::constants::API_PREFIX;

use crate::handlers::{files, groups, health};
use crate::state::AppState;

/// Multipart framing on top of the file payload itself
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .uploads
        .max_total_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES) as usize;

    let api_routes = Router::new()
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/groups/{id}",
            get(groups::get_group)
                .patch(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/groups/{id}/{kind}/{member_id}",
            post(groups::add_member).delete(groups::remove_member),
        )
        .route("/files", post(files::upload_files));

    Router::new()
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .with_state(state)
}
