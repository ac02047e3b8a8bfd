//! Giveaway domain models
//!
//! A `Comment` is the canonical flattened shape every comment source
//! (Graph API, CSV upload, manual JSON) is resolved into before the
//! engine sees it. Timestamps are carried as opaque strings for display;
//! the engine never interprets them.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single comment, from any source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    /// Absent username means the comment cannot produce entries
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Parent comment id when this comment is a reply
    #[serde(default)]
    pub reply_to_id: Option<String>,
}

/// How a single comment maps to entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMode {
    /// One entry per unique @-mentioned handle across all of a user's comments
    #[default]
    ByTag,
    /// One entry per comment that still has text once mentions are stripped
    ByComment,
}

/// Policy configuration for one giveaway run
///
/// Immutable per run; all defaults are applied during deserialization so
/// the engine always sees a fully resolved policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criteria {
    /// Maximum number of winners to draw
    #[serde(default = "default_number_of_winners")]
    pub number_of_winners: u32,
    #[serde(default)]
    pub counting_mode: CountingMode,
    /// Cap each user at exactly one eligible entry
    #[serde(default)]
    pub unique_entries_only: bool,
    /// Cap per user when not unique-only; 0 means unlimited
    #[serde(default)]
    pub max_entries_per_user: u32,
    /// Qualification floor: minimum unique tags per user (by_tag mode)
    #[serde(default)]
    pub min_tags_required: Option<u32>,
    /// Qualification floor: minimum qualifying comments per user (by_comment mode)
    #[serde(default)]
    pub min_comments_required: Option<u32>,
    /// Bonus usernames entered directly, one entry each, in both modes
    #[serde(default)]
    pub manual_entries: Vec<String>,
}

fn default_number_of_winners() -> u32 {
    1
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            number_of_winners: 1,
            counting_mode: CountingMode::default(),
            unique_entries_only: false,
            max_entries_per_user: 0,
            min_tags_required: None,
            min_comments_required: None,
            manual_entries: Vec::new(),
        }
    }
}

impl Criteria {
    /// Reject values the serde defaults cannot rule out
    pub fn validate(&self) -> Result<(), AppError> {
        if self.number_of_winners == 0 {
            return Err(AppError::Validation(
                "number_of_winners must be at least 1".to_string(),
            ));
        }
        if self.min_tags_required == Some(0) || self.min_comments_required == Some(0) {
            return Err(AppError::Validation(
                "qualification floors must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// One unit of chance in the drawing, attributable to exactly one username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub username: String,
    /// The comment text that earned this entry
    #[serde(default)]
    pub source_text: Option<String>,
    /// Tags attached for display; in by_tag mode exactly the one earning tag
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A drawn winner, in draw order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Winner {
    pub username: String,
    /// How many eligible entries this user held
    pub total_entries: u32,
    /// The user's eligible entries, for detail display
    pub selected_entries: Vec<Entry>,
}

/// Read-only byproducts of a derived entry list, for UI reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryStats {
    pub total_entries: u32,
    pub unique_users: u32,
    pub entries_per_user: std::collections::BTreeMap<String, u32>,
}
