//! Entry statistics for UI reporting

use std::collections::BTreeMap;

use super::model::{Entry, EntryStats};

/// Summarize an entry list: total entries, distinct users, and per-user
/// entry counts. Pure read-only byproduct of a derived list.
pub fn entry_stats(entries: &[Entry]) -> EntryStats {
    let mut entries_per_user: BTreeMap<String, u32> = BTreeMap::new();
    for entry in entries {
        *entries_per_user.entry(entry.username.clone()).or_default() += 1;
    }

    EntryStats {
        total_entries: entries.len() as u32,
        unique_users: entries_per_user.len() as u32,
        entries_per_user,
    }
}
