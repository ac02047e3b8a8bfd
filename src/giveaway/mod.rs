//! Giveaway engine
//!
//! The pure core of the service: turning raw comments plus a counting
//! policy into a weighted entry pool, and drawing winners from that pool
//! without replacement. Everything here is synchronous and side-effect
//! free; randomness is injected by the caller.
//!
//! Data flows one way: comments -> entries -> eligible entries -> winners.

mod derive;
mod model;
mod select;
mod stats;
mod tags;

pub use derive::derive_entries;
pub use model::{Comment, CountingMode, Criteria, Entry, EntryStats, Winner};
pub use select::select_winners;
pub use stats::entry_stats;
pub use tags::{extract_tags, strip_mentions};
