// src/middleware.rs

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Warstwa na trasach zmieniających formularz.
///
/// Blokada odczytu jest brana zanim handler zacznie czytać ciało żądania
/// (np. wolny upload pliku) i puszczana po zapisaniu zmiany w stanie.
/// Wysyłka formularza czeka na nią przed zrobieniem snapshotu.
pub async fn track_form_update(
    State(app_state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let _update = app_state.update_order.read().await;
    next.run(request).await
}
