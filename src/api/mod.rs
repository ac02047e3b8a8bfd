//! API layer
//!
//! HTTP handlers for:
//! - Giveaway runs and entry previews
//! - CSV comment import
//! - Instagram comment acquisition

mod comments;
mod giveaway;

use axum::routing::post;
use axum::Router;

use crate::AppState;

/// Routes mounted under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/giveaway", post(giveaway::run_giveaway))
        .route("/giveaway/entries", post(giveaway::list_entries))
        .route("/comments/csv", post(comments::import_csv))
        .route("/instagram/comments", post(comments::fetch_instagram_comments))
}
