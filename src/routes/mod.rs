use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::events::{create_event, delete_event, get_event, list_events, update_event};
use crate::handlers::index;
use crate::state::AppState;

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

pub fn create_routes(state: AppState, allowed_origins: &str) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/eventos", event_routes())
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(allowed_origins))
        .with_state(state)
}
