/// Application routes configuration
use crate::handlers::{
    clear_search, close_detail, get_detail, get_favorite, get_tab, get_today, health,
    list_favorites, lookup_date, open_detail, request_summary, retry_tab, scroll, search,
    toggle_favorite, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        .route("/today", get(get_today))
        // Tabs
        .route("/tabs/:tab", get(get_tab))
        .route("/tabs/:tab/retry", post(retry_tab))
        .route("/scroll", post(scroll))
        // Explore
        .route("/explore/search", get(search).delete(clear_search))
        .route("/explore/date/:date", get(lookup_date))
        // Favorites
        .route("/favorites", get(list_favorites).post(toggle_favorite))
        .route("/favorites/:date", get(get_favorite))
        // Detail overlay
        .route("/detail", get(get_detail).post(open_detail).delete(close_detail))
        .route("/detail/summary", post(request_summary))
        .with_state(state)
}
