//! Giveaway endpoints
//!
//! The engine has no persistence: every submission re-derives entries
//! and re-draws winners from the posted comments.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::giveaway::{
    derive_entries, entry_stats, select_winners, Comment, Criteria, Entry, EntryStats, Winner,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GiveawayRequest {
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub criteria: Criteria,
}

#[derive(Debug, Serialize)]
pub struct GiveawayResponse {
    pub winners: Vec<Winner>,
    pub stats: EntryStats,
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<Entry>,
    pub stats: EntryStats,
}

/// POST /api/giveaway - Run a drawing
///
/// Derives the entry pool from the posted comments and criteria, then
/// draws winners. An empty pool is a defined result (`winners: []`),
/// not an error; the caller reports "no entries found".
pub async fn run_giveaway(
    State(_state): State<AppState>,
    Json(request): Json<GiveawayRequest>,
) -> Result<Json<GiveawayResponse>, AppError> {
    request.criteria.validate()?;

    let entries = derive_entries(&request.comments, &request.criteria);
    let stats = entry_stats(&entries);
    let winners = select_winners(&entries, &request.criteria, &mut rand::thread_rng());

    tracing::info!(
        total_entries = stats.total_entries,
        unique_users = stats.unique_users,
        winners = winners.len(),
        "Drawing complete"
    );

    Ok(Json(GiveawayResponse { winners, stats }))
}

/// POST /api/giveaway/entries - Preview the derived entry pool
///
/// Same derivation as the drawing endpoint, without sampling. Used for
/// display and debugging before committing to a draw.
pub async fn list_entries(
    State(_state): State<AppState>,
    Json(request): Json<GiveawayRequest>,
) -> Result<Json<EntriesResponse>, AppError> {
    request.criteria.validate()?;

    let entries = derive_entries(&request.comments, &request.criteria);
    let stats = entry_stats(&entries);

    Ok(Json(EntriesResponse { entries, stats }))
}
