//! Winner selection
//!
//! Weighted sampling without replacement over the eligible entry pool.
//! Each draw is a uniform pick over the remaining entries, so a user
//! with N entries is N times as likely to win as a user with one; once a
//! user wins, every one of their entries leaves the pool, so nobody can
//! win twice.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::model::{Criteria, Entry, Winner};

/// Draw winners from `entries` according to `criteria`.
///
/// The random source is injected so test suites can pass a seeded
/// generator and reproduce draws. Returns winners in draw order; an
/// empty eligible pool yields an empty list, never an error.
pub fn select_winners<R: Rng + ?Sized>(
    entries: &[Entry],
    criteria: &Criteria,
    rng: &mut R,
) -> Vec<Winner> {
    let eligible = eligible_entries(entries, criteria);
    if eligible.is_empty() {
        return Vec::new();
    }

    let mut entries_by_user: HashMap<&str, Vec<&Entry>> = HashMap::new();
    for entry in &eligible {
        entries_by_user
            .entry(entry.username.as_str())
            .or_default()
            .push(entry);
    }

    // Never more winners than distinct eligible participants
    let target = (criteria.number_of_winners as usize).min(entries_by_user.len());

    let mut pool: Vec<&Entry> = eligible.iter().collect();
    let mut winners = Vec::with_capacity(target);
    let mut won: HashSet<String> = HashSet::new();

    for _ in 0..target {
        if pool.is_empty() {
            break;
        }
        // The removal step below makes a duplicate draw impossible, but the
        // retry guard keeps a bad pool state from looping forever.
        let max_attempts = pool.len() * 2;
        let mut attempts = 0;
        while attempts < max_attempts {
            let index = rng.gen_range(0..pool.len());
            let username = pool[index].username.clone();
            if won.contains(&username) {
                attempts += 1;
                continue;
            }

            let user_entries = &entries_by_user[username.as_str()];
            winners.push(Winner {
                username: username.clone(),
                total_entries: user_entries.len() as u32,
                selected_entries: user_entries.iter().map(|e| (*e).clone()).collect(),
            });
            won.insert(username.clone());
            pool.retain(|entry| entry.username != username);
            break;
        }
    }

    winners
}

/// Apply uniqueness/cap constraints to produce the sampling pool.
///
/// `unique_entries_only` keeps the first-encountered entry per username;
/// otherwise a positive `max_entries_per_user` keeps at most that many
/// per username, in input order.
fn eligible_entries(entries: &[Entry], criteria: &Criteria) -> Vec<Entry> {
    if criteria.unique_entries_only {
        let mut seen = HashSet::new();
        entries
            .iter()
            .filter(|entry| seen.insert(entry.username.clone()))
            .cloned()
            .collect()
    } else if criteria.max_entries_per_user > 0 {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        entries
            .iter()
            .filter(|entry| {
                let count = counts.entry(entry.username.as_str()).or_default();
                *count += 1;
                *count <= criteria.max_entries_per_user
            })
            .cloned()
            .collect()
    } else {
        entries.to_vec()
    }
}
