//! Consistency filter: drop replies whose chain does not reach a root.
//!
//! A retained reply always has its parent retained as well, so the emitted
//! rows never carry a dangling `in_reply_to_id`.

use std::collections::HashMap;

use crate::{Post, WorkingSet};

/// Counts from one filter pass, for progress output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub retained: usize,
    pub dropped: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Resolution {
    InProgress,
    Resolved,
    Orphaned,
}

/// Returns a new set with every post whose parent chain resolves inside `set`.
///
/// Roots are always kept. A reply is kept iff its parent is present and itself
/// kept; a parent loop without a root is dropped. Input order is preserved.
#[must_use]
pub fn filter_consistent(set: &WorkingSet) -> WorkingSet {
    filter_consistent_with_report(set).0
}

/// [`filter_consistent`] plus retained/dropped counts.
#[must_use]
pub fn filter_consistent_with_report(set: &WorkingSet) -> (WorkingSet, FilterReport) {
    let mut memo: HashMap<&str, Resolution> = HashMap::with_capacity(set.len());
    for post in set {
        resolve(set, post, &mut memo);
    }

    let filtered =
        set.retain_cloned(|p| memo.get(p.id.as_str()).copied() == Some(Resolution::Resolved));
    let report =
        FilterReport { retained: filtered.len(), dropped: set.len().saturating_sub(filtered.len()) };
    for post in set {
        if !filtered.contains(&post.id) {
            tracing::debug!(
                post_id = %post.id,
                parent_id = post.parent_id.as_deref().unwrap_or(""),
                "dropping reply with unreachable parent"
            );
        }
    }
    (filtered, report)
}

/// Iterative ascent with memoization; each post is resolved at most once.
fn resolve<'a>(set: &'a WorkingSet, start: &'a Post, memo: &mut HashMap<&'a str, Resolution>) {
    let mut path: Vec<&'a str> = Vec::new();
    let mut current = start;

    let outcome = loop {
        match memo.get(current.id.as_str()) {
            Some(Resolution::Resolved) => break Resolution::Resolved,
            Some(Resolution::Orphaned) => break Resolution::Orphaned,
            Some(Resolution::InProgress) => break Resolution::Orphaned,
            None => {},
        }
        memo.insert(current.id.as_str(), Resolution::InProgress);
        path.push(current.id.as_str());

        let Some(parent_id) = current.parent_id.as_deref() else {
            break Resolution::Resolved;
        };
        match set.get(parent_id) {
            Some(parent) => current = parent,
            None => break Resolution::Orphaned,
        }
    };

    for id in path {
        memo.insert(id, outcome);
    }
}
