//! Entry derivation
//!
//! Turns raw comments plus a counting policy into the flat, weighted
//! entry list the selector draws from. Manual entries come first, then
//! derived entries in stable input order.

use std::collections::{HashMap, HashSet};

use super::model::{Comment, CountingMode, Criteria, Entry};
use super::tags::{extract_tags, strip_mentions};

/// Derive the entry pool for one giveaway run.
///
/// Manual entries are unconditional: one entry per listed username in
/// both modes, never subject to the qualification floor. Comments without
/// a resolvable username are skipped silently.
pub fn derive_entries(comments: &[Comment], criteria: &Criteria) -> Vec<Entry> {
    let mut entries = Vec::new();

    for username in &criteria.manual_entries {
        let username = username.trim();
        if !username.is_empty() {
            entries.push(Entry {
                username: username.to_string(),
                source_text: None,
                tags: Vec::new(),
                timestamp: None,
            });
        }
    }

    let derived = match criteria.counting_mode {
        CountingMode::ByTag => derive_by_tag(comments, criteria),
        CountingMode::ByComment => derive_by_comment(comments, criteria),
    };
    entries.extend(derived);

    entries
}

/// One entry per (username, unique tag) pair across all of a user's
/// comments. The entry's source text is the comment that first introduced
/// that tag; input order breaks ties.
fn derive_by_tag(comments: &[Comment], criteria: &Criteria) -> Vec<Entry> {
    let mut seen: HashMap<String, HashSet<String>> = HashMap::new();
    let mut derived = Vec::new();

    for comment in comments {
        let Some(username) = comment.username.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        let tags = extract_tags(&comment.text);
        if tags.is_empty() {
            continue;
        }
        let user_tags = seen.entry(username.to_string()).or_default();
        for tag in tags {
            // First comment to introduce a tag wins source attribution
            if user_tags.insert(tag.clone()) {
                derived.push(Entry {
                    username: username.to_string(),
                    source_text: Some(comment.text.clone()),
                    tags: vec![tag],
                    timestamp: comment.timestamp.clone(),
                });
            }
        }
    }

    apply_floor(derived, criteria.min_tags_required)
}

/// One entry per comment whose text, with all mentions stripped, still
/// has non-empty residue. Pure tag-only comments contribute nothing, so
/// spamming mentions does not inflate entry counts in this mode.
fn derive_by_comment(comments: &[Comment], criteria: &Criteria) -> Vec<Entry> {
    let mut derived = Vec::new();

    for comment in comments {
        let Some(username) = comment.username.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        if strip_mentions(&comment.text).trim().is_empty() {
            continue;
        }
        derived.push(Entry {
            username: username.to_string(),
            source_text: Some(comment.text.clone()),
            tags: extract_tags(&comment.text),
            timestamp: comment.timestamp.clone(),
        });
    }

    apply_floor(derived, criteria.min_comments_required)
}

/// Qualification floor: drop every derived entry of users whose total
/// falls below the configured minimum. Runs after full accumulation; the
/// decision needs each user's complete tally.
fn apply_floor(derived: Vec<Entry>, floor: Option<u32>) -> Vec<Entry> {
    let Some(floor) = floor else {
        return derived;
    };

    let mut per_user: HashMap<&str, u32> = HashMap::new();
    for entry in &derived {
        *per_user.entry(entry.username.as_str()).or_default() += 1;
    }
    let qualified: HashSet<String> = per_user
        .into_iter()
        .filter(|&(_, count)| count >= floor)
        .map(|(username, _)| username.to_string())
        .collect();

    derived
        .into_iter()
        .filter(|entry| qualified.contains(&entry.username))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, username: Option<&str>, text: &str) -> Comment {
        Comment {
            id: id.to_string(),
            text: text.to_string(),
            username: username.map(str::to_string),
            timestamp: None,
            reply_to_id: None,
        }
    }

    fn criteria(mode: CountingMode) -> Criteria {
        Criteria {
            counting_mode: mode,
            ..Criteria::default()
        }
    }

    #[test]
    fn test_by_tag_spec_example() {
        let comments = vec![
            comment("1", Some("alice"), "@bob nice!"),
            comment("2", Some("alice"), "@carol cool"),
            comment("3", Some("carol"), "no tag"),
        ];
        let entries = derive_entries(&comments, &criteria(CountingMode::ByTag));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].username, "alice");
        assert_eq!(entries[0].tags, vec!["bob"]);
        assert_eq!(entries[1].username, "alice");
        assert_eq!(entries[1].tags, vec!["carol"]);
    }

    #[test]
    fn test_by_tag_counts_distinct_handles_not_mentions() {
        let comments = vec![
            comment("1", Some("alice"), "@bob you rock"),
            comment("2", Some("alice"), "@bob again! @dave too"),
        ];
        let entries = derive_entries(&comments, &criteria(CountingMode::ByTag));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tags, vec!["bob"]);
        assert_eq!(entries[1].tags, vec!["dave"]);
    }

    #[test]
    fn test_by_tag_source_text_is_first_introducing_comment() {
        let comments = vec![
            comment("1", Some("alice"), "@bob first"),
            comment("2", Some("alice"), "@bob second"),
        ];
        let entries = derive_entries(&comments, &criteria(CountingMode::ByTag));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_text.as_deref(), Some("@bob first"));
    }

    #[test]
    fn test_by_tag_is_case_sensitive() {
        let comments = vec![comment("1", Some("alice"), "@Bob and @bob")];
        let entries = derive_entries(&comments, &criteria(CountingMode::ByTag));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_by_comment_spec_example() {
        let comments = vec![
            comment("1", Some("alice"), "@bob nice!"),
            comment("2", Some("alice"), "@carol cool"),
            comment("3", Some("carol"), "no tag"),
        ];
        let entries = derive_entries(&comments, &criteria(CountingMode::ByComment));

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].username, "carol");
        assert_eq!(entries[2].source_text.as_deref(), Some("no tag"));
    }

    #[test]
    fn test_by_comment_excludes_tag_only_comments() {
        let comments = vec![
            comment("1", Some("alice"), "@alice @bob"),
            comment("2", Some("bob"), "  @carol  "),
            comment("3", Some("carol"), "@dave love this"),
        ];
        let entries = derive_entries(&comments, &criteria(CountingMode::ByComment));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "carol");
    }

    #[test]
    fn test_comment_without_username_is_skipped() {
        let comments = vec![
            comment("1", None, "@bob hi"),
            comment("2", Some(""), "@bob hi"),
            comment("3", Some("carol"), "@dave hi"),
        ];
        let entries = derive_entries(&comments, &criteria(CountingMode::ByTag));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "carol");
    }

    #[test]
    fn test_manual_entries_come_first_in_both_modes() {
        let comments = vec![comment("1", Some("alice"), "@bob hi")];
        for mode in [CountingMode::ByTag, CountingMode::ByComment] {
            let criteria = Criteria {
                counting_mode: mode,
                manual_entries: vec!["  vip  ".to_string(), "".to_string(), "  ".to_string()],
                ..Criteria::default()
            };
            let entries = derive_entries(&comments, &criteria);

            assert_eq!(entries[0].username, "vip");
            assert!(entries[0].source_text.is_none());
            // Blank manual names are dropped
            assert_eq!(
                entries.iter().filter(|e| e.username == "vip").count(),
                1
            );
        }
    }

    #[test]
    fn test_min_tags_floor_drops_users_below() {
        let comments = vec![
            comment("1", Some("alice"), "@bob @carol"),
            comment("2", Some("dave"), "@erin"),
        ];
        let criteria = Criteria {
            min_tags_required: Some(2),
            ..criteria(CountingMode::ByTag)
        };
        let entries = derive_entries(&comments, &criteria);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.username == "alice"));
    }

    #[test]
    fn test_min_comments_floor_sees_full_tally() {
        let comments = vec![
            comment("1", Some("alice"), "one"),
            comment("2", Some("bob"), "only"),
            comment("3", Some("alice"), "two"),
        ];
        let criteria = Criteria {
            min_comments_required: Some(2),
            ..criteria(CountingMode::ByComment)
        };
        let entries = derive_entries(&comments, &criteria);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.username == "alice"));
    }

    #[test]
    fn test_floor_never_drops_manual_entries() {
        let comments = vec![comment("1", Some("alice"), "@bob")];
        let criteria = Criteria {
            min_tags_required: Some(5),
            manual_entries: vec!["vip".to_string()],
            ..criteria(CountingMode::ByTag)
        };
        let entries = derive_entries(&comments, &criteria);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "vip");
    }
}
