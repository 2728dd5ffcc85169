use std::collections::HashMap;
use tracing::debug;

use crate::types::{EventCandidate, Fingerprint};

/// Combines candidate lists into one record per fingerprint.
///
/// The first-seen candidate (earlier list, then earlier position) is kept;
/// later duplicates only fill in its absent fields. Output order is the
/// order in which fingerprints were first seen.
pub fn merge_events<I>(groups: I) -> Vec<EventCandidate>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = EventCandidate>,
{
    let mut index: HashMap<Fingerprint, usize> = HashMap::new();
    let mut merged: Vec<EventCandidate> = Vec::new();

    for group in groups {
        for event in group {
            if !event.is_addressable() {
                debug!("Dropping {} record with neither title nor link", event.source);
                continue;
            }
            let key = event.fingerprint();
            match index.get(&key) {
                Some(&position) => {
                    debug!("Merging duplicate {}", key);
                    merged[position].backfill_from(event);
                }
                None => {
                    index.insert(key, merged.len());
                    merged.push(event);
                }
            }
        }
    }

    merged
}
