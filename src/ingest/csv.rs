//! CSV comment ingestion
//!
//! Accepts exports with at minimum `username` and `comment_text` columns
//! (header match is case-insensitive, `timestamp` optional) and produces
//! canonical comment records. Quoted fields with doubled quotes and
//! comma delimiters follow standard CSV rules.

use crate::error::AppError;
use crate::giveaway::Comment;

/// Parse CSV text into comments.
///
/// Fails fast when required columns are missing; rows without a username
/// or comment text are skipped silently, matching how unresolvable
/// comments are treated everywhere else.
pub fn parse_comments(data: &str) -> Result<Vec<Comment>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Unreadable CSV header: {e}")))?;
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let username_idx = normalized.iter().position(|h| h == "username");
    let text_idx = normalized.iter().position(|h| h == "comment_text");
    let timestamp_idx = normalized.iter().position(|h| h == "timestamp");

    let (Some(username_idx), Some(text_idx)) = (username_idx, text_idx) else {
        return Err(AppError::Validation(
            "CSV must have \"username\" and \"comment_text\" columns".to_string(),
        ));
    };

    let mut comments = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| AppError::Validation(format!("Malformed CSV row {}: {e}", row + 1)))?;

        let username = record.get(username_idx).map(str::trim).unwrap_or_default();
        let text = record.get(text_idx).map(str::trim).unwrap_or_default();
        if username.is_empty() || text.is_empty() {
            continue;
        }
        let timestamp = timestamp_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        comments.push(Comment {
            id: format!("csv-{}", row + 1),
            text: text.to_string(),
            username: Some(username.to_string()),
            timestamp,
            reply_to_id: None,
        });
    }

    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_basic_rows() {
        let data = "username,comment_text,timestamp\n\
                    alice,@bob nice!,2024-01-01T00:00:00Z\n\
                    carol,no tag,\n";
        let comments = parse_comments(data).unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].username.as_deref(), Some("alice"));
        assert_eq!(comments[0].text, "@bob nice!");
        assert_eq!(
            comments[0].timestamp.as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        assert_eq!(comments[1].timestamp, None);
        assert_eq!(comments[1].id, "csv-2");
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let data = "Username, Comment_Text\nalice,hello\n";
        let comments = parse_comments(data).unwrap();
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn test_quoted_fields_with_doubled_quotes() {
        let data = "username,comment_text\n\
                    alice,\"love it, really\"\n\
                    bob,\"she said \"\"wow\"\"\"\n";
        let comments = parse_comments(data).unwrap();

        assert_eq!(comments[0].text, "love it, really");
        assert_eq!(comments[1].text, "she said \"wow\"");
    }

    #[test]
    fn test_missing_required_column_fails_fast() {
        let data = "user,comment_text\nalice,hello\n";
        let err = parse_comments(data).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rows_without_username_or_text_are_skipped() {
        let data = "username,comment_text\n\
                    ,orphaned\n\
                    alice,\n\
                    bob,kept\n";
        let comments = parse_comments(data).unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].username.as_deref(), Some("bob"));
        assert_eq!(comments[0].id, "csv-3");
    }
}
