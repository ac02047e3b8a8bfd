//! @-mention extraction
//!
//! A tag is an "@" followed by one or more ASCII word characters
//! (letters, digits, underscore). Matching is case-sensitive and does no
//! Unicode normalization, so `@Bob` and `@bob` are distinct handles.

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Extract every @-mentioned handle from `text`, "@" stripped,
/// in order of appearance. Duplicates are preserved; deduplication is a
/// counting-policy concern, not an extraction concern.
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '@' {
            continue;
        }
        let mut handle = String::new();
        while let Some(&next) = chars.peek() {
            if !is_word_char(next) {
                break;
            }
            handle.push(next);
            chars.next();
        }
        if !handle.is_empty() {
            tags.push(handle);
        }
    }

    tags
}

/// Return `text` with every @-mention substring removed.
///
/// Used by comment-counting mode to decide whether a comment has any
/// content beyond its mentions.
pub fn strip_mentions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '@' {
            // Only a mention if at least one word character follows
            if chars.peek().is_some_and(|&next| is_word_char(next)) {
                while chars.peek().is_some_and(|&next| is_word_char(next)) {
                    chars.next();
                }
                continue;
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_handles_without_at() {
        assert_eq!(extract_tags("@bob nice!"), vec!["bob"]);
        assert_eq!(extract_tags("hey @alice_1 and @bob2"), vec!["alice_1", "bob2"]);
    }

    #[test]
    fn test_preserves_duplicates_and_case() {
        assert_eq!(extract_tags("@Bob @bob @Bob"), vec!["Bob", "bob", "Bob"]);
    }

    #[test]
    fn test_bare_at_is_not_a_tag() {
        assert!(extract_tags("email me @ home").is_empty());
        assert!(extract_tags("no mentions here").is_empty());
    }

    #[test]
    fn test_mention_stops_at_non_word_char() {
        assert_eq!(extract_tags("@bob! @carol,@dave"), vec!["bob", "carol", "dave"]);
    }

    #[test]
    fn test_unicode_text_around_mentions() {
        assert_eq!(extract_tags("gagné 🎉 @bob"), vec!["bob"]);
        // Non-ASCII letters terminate the handle
        assert_eq!(extract_tags("@boé"), vec!["bo"]);
    }

    #[test]
    fn test_strip_removes_only_mentions() {
        assert_eq!(strip_mentions("@bob nice!"), " nice!");
        assert_eq!(strip_mentions("@alice @bob"), " ");
        assert_eq!(strip_mentions("no tag"), "no tag");
    }

    #[test]
    fn test_strip_keeps_bare_at() {
        assert_eq!(strip_mentions("meet @ noon"), "meet @ noon");
    }
}
