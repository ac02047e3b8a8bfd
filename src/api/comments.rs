//! Comment ingestion endpoints

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AccessToken;
use crate::error::AppError;
use crate::giveaway::Comment;
use crate::ingest::csv::parse_comments;
use crate::ingest::instagram::InstagramClient;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CsvImportResponse {
    pub comments: Vec<Comment>,
    pub total: usize,
}

/// POST /api/comments/csv - Parse an uploaded CSV into comments
///
/// The body is the raw CSV text; required columns are `username` and
/// `comment_text`, with `timestamp` optional.
pub async fn import_csv(
    State(_state): State<AppState>,
    body: String,
) -> Result<Json<CsvImportResponse>, AppError> {
    let comments = parse_comments(&body)?;
    tracing::info!(total = comments.len(), "CSV import parsed");

    Ok(Json(CsvImportResponse {
        total: comments.len(),
        comments,
    }))
}

#[derive(Debug, Deserialize)]
pub struct InstagramCommentsRequest {
    pub post_url: String,
}

#[derive(Debug, Serialize)]
pub struct InstagramCommentsResponse {
    pub media_id: String,
    pub permalink: Option<String>,
    pub comments: Vec<Comment>,
    pub total: usize,
}

/// POST /api/instagram/comments - Fetch every comment on a post
///
/// Requires a bearer access token for the Graph API; the token is
/// forwarded upstream, never stored.
pub async fn fetch_instagram_comments(
    State(state): State<AppState>,
    AccessToken(token): AccessToken,
    Json(request): Json<InstagramCommentsRequest>,
) -> Result<Json<InstagramCommentsResponse>, AppError> {
    let client = InstagramClient::new(state.http.clone(), &state.config.instagram);
    let fetched = client.fetch_post_comments(&token, &request.post_url).await?;

    tracing::info!(
        media_id = %fetched.media_id,
        total = fetched.comments.len(),
        "Instagram comments fetched"
    );

    Ok(Json(InstagramCommentsResponse {
        media_id: fetched.media_id,
        permalink: fetched.permalink,
        total: fetched.comments.len(),
        comments: fetched.comments,
    }))
}
