pub mod config;
pub mod dto;
pub mod errors;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the service's `Router`, independent of where it gets served from
/// (a bound TCP listener in `main`, or `tower::ServiceExt::oneshot` in
/// tests).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::server_info))
        .route("/_cat/dbs", get(routes::cat_dbs))
        .route(
            "/:db",
            put(routes::create_db)
                .get(routes::get_db)
                .delete(routes::delete_db)
                .post(routes::post_doc),
        )
        .route("/:db/_all_docs", get(routes::all_docs))
        .route("/:db/_bulk_docs", post(routes::bulk_docs))
        .route("/:db/_bulk_gets", post(routes::bulk_gets))
        .route(
            "/:db/*id",
            get(routes::get_doc)
                .put(routes::put_doc)
                .delete(routes::delete_doc),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
