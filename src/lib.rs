// src/lib.rs

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod errors;
pub mod htmx_handlers;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod response;
pub mod state;
pub mod submitter;

use crate::htmx_handlers::*;
use crate::middleware::track_form_update;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Buduje router panelu administracyjnego.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new(&app_state.static_dir);

    // Zmiany formularza muszą się zakończyć, zanim submit zrobi snapshot
    let form_updates = Router::new()
        .route(
            "/htmx/admin/product-form/fields/{field}",
            post(update_field_htmx_handler),
        )
        .route(
            "/htmx/admin/product-form/sizes/{size}",
            post(toggle_size_htmx_handler),
        )
        .route(
            "/htmx/admin/product-form/images/{color}",
            post(upload_image_htmx_handler),
        )
        .route_layer(from_fn_with_state(app_state.clone(), track_form_update));

    Router::new()
        .route("/", get(product_form_page_handler))
        .route("/htmx/admin/product-form", get(product_form_page_handler))
        .merge(form_updates)
        .route(
            "/htmx/admin/product-form/submit",
            post(submit_product_form_htmx_handler),
        )
        .nest_service("/static", static_service)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app_state)
}
