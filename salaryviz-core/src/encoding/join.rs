use crate::data::record::RecordId;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Identity of a rendered mark across successive encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "snake_case")]
pub enum MarkKey {
    /// Scatter point
    Record(RecordId),
    /// Histogram bar, by bin position
    Bin(usize),
    /// Chord group or sankey node, by position in its label list
    Group(usize),
    /// Chord ribbon or sankey link between two groups
    Link(usize, usize),
}

/// Keyed difference between the marks currently rendered and the marks of a new encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinDiff<K> {
    /// Keys only present in the new encoding, in new order
    pub enter: Vec<K>,
    /// Keys present in both, in new order
    pub update: Vec<K>,
    /// Keys only present in the previous state, in previous order
    pub exit: Vec<K>,
}

impl<K> JoinDiff<K> {
    pub fn is_unchanged(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

/// Match `next` against `previous` by key.
///
/// A key repeated in `next` only updates once; the repeats enter. A key repeated in `previous`
/// only matches once; the repeats exit.
pub fn join<K>(previous: &[K], next: &[K]) -> JoinDiff<K>
where
    K: Eq + Hash + Clone,
{
    let available: HashSet<&K, RandomState> = previous.iter().collect();

    let mut matched: HashSet<&K, RandomState> = HashSet::default();
    let mut enter = Vec::new();
    let mut update = Vec::new();
    for key in next {
        if available.contains(key) && matched.insert(key) {
            update.push(key.clone());
        } else {
            enter.push(key.clone());
        }
    }

    let mut exit = Vec::new();
    let mut kept: HashSet<&K, RandomState> = HashSet::default();
    for key in previous {
        if !matched.contains(key) || !kept.insert(key) {
            exit.push(key.clone());
        }
    }

    JoinDiff {
        enter,
        update,
        exit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[u32]) -> Vec<MarkKey> {
        ids.iter().map(|i| MarkKey::Record(RecordId(*i))).collect()
    }

    #[test]
    fn test_identical_states_only_update() {
        let keys = records(&[0, 1, 2]);
        let diff = join(&keys, &keys);
        assert_eq!(diff.update, keys);
        assert!(diff.enter.is_empty());
        assert!(diff.exit.is_empty());
        assert!(diff.is_unchanged());
    }

    #[test]
    fn test_enter_update_exit() {
        let diff = join(&records(&[0, 1, 2]), &records(&[3, 2, 1]));
        assert_eq!(diff.enter, records(&[3]));
        assert_eq!(diff.update, records(&[2, 1]));
        assert_eq!(diff.exit, records(&[0]));
    }

    #[test]
    fn test_first_render_enters_everything() {
        let diff = join(&[], &[MarkKey::Bin(0), MarkKey::Bin(1)]);
        assert_eq!(diff.enter, vec![MarkKey::Bin(0), MarkKey::Bin(1)]);
        assert!(diff.update.is_empty());
        let diff = join(&[MarkKey::Group(0)], &[]);
        assert_eq!(diff.exit, vec![MarkKey::Group(0)]);
    }

    #[test]
    fn test_duplicate_keys() {
        let diff = join(&[1, 1, 2], &[1, 1]);
        assert_eq!(diff.update, vec![1]);
        assert_eq!(diff.enter, vec![1]);
        assert_eq!(diff.exit, vec![1, 2]);
    }
}
