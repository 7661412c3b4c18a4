//! Work Tracker
//!
//! Accumulates, per conversation turn, the design files written and the
//! packages installed by tool calls. The orchestrator reads the snapshot once
//! `submit_work` arrives and clears it after validation, whatever the outcome.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

/// Latest source recorded for one design file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    pub filename: String,
    pub source: String,
}

/// Everything a turn has changed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWork {
    /// Keyed by filename; iteration order is the filename order.
    pub files: BTreeMap<String, TrackedFile>,
    pub dependencies: BTreeSet<String>,
}

impl PendingWork {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dependencies.is_empty()
    }
}

/// In-memory, turn-scoped change ledger.
///
/// Lock poisoning is recovered rather than propagated: every write leaves the
/// map in a consistent state, so the inner value is still sound.
#[derive(Debug, Default)]
pub struct WorkTracker {
    turns: RwLock<HashMap<String, PendingWork>>,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn write<R>(&self, f: impl FnOnce(&mut HashMap<String, PendingWork>) -> R) -> R {
        let mut guard = self
            .turns
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    fn read<R>(&self, f: impl FnOnce(&HashMap<String, PendingWork>) -> R) -> R {
        let guard = self
            .turns
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Record the latest source for `filename`. A second write in the same
    /// turn replaces the first.
    pub fn record_file_change(&self, turn_id: &str, filename: &str, source: impl Into<String>) {
        let source = source.into();
        self.write(|turns| {
            turns.entry(turn_id.to_string()).or_default().files.insert(
                filename.to_string(),
                TrackedFile {
                    filename: filename.to_string(),
                    source,
                },
            );
        });
        tracing::debug!(turn_id, filename, "Tracked file change");
    }

    pub fn record_dependency(&self, turn_id: &str, package_name: &str) {
        self.write(|turns| {
            turns
                .entry(turn_id.to_string())
                .or_default()
                .dependencies
                .insert(package_name.to_string());
        });
        tracing::debug!(turn_id, package_name, "Tracked dependency");
    }

    /// Drop a file from the turn (it was deleted). Returns whether it was tracked.
    pub fn forget_file(&self, turn_id: &str, filename: &str) -> bool {
        self.write(|turns| {
            turns
                .get_mut(turn_id)
                .map(|work| work.files.remove(filename).is_some())
                .unwrap_or(false)
        })
    }

    /// Move a tracked file to its new name. Returns `false` if `old` was not
    /// tracked in this turn; nothing is recorded in that case.
    pub fn rename_file(&self, turn_id: &str, old: &str, new: &str) -> bool {
        self.write(|turns| {
            let Some(work) = turns.get_mut(turn_id) else {
                return false;
            };
            match work.files.remove(old) {
                Some(tracked) => {
                    work.files.insert(
                        new.to_string(),
                        TrackedFile {
                            filename: new.to_string(),
                            source: tracked.source,
                        },
                    );
                    true
                }
                None => false,
            }
        })
    }

    /// Snapshot of the turn's pending work, or `None` if nothing was recorded.
    pub fn get_pending_work(&self, turn_id: &str) -> Option<PendingWork> {
        self.read(|turns| turns.get(turn_id).cloned())
    }

    pub fn clear(&self, turn_id: &str) {
        if self.write(|turns| turns.remove(turn_id)).is_some() {
            tracing::debug!(turn_id, "Cleared pending work");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_turn_is_none() {
        let tracker = WorkTracker::new();
        assert!(tracker.get_pending_work("nope").is_none());
    }

    #[test]
    fn test_second_write_overwrites() {
        let tracker = WorkTracker::new();
        tracker.record_file_change("t1", "hero.tsx", "v1");
        tracker.record_file_change("t1", "hero.tsx", "v2");

        let work = tracker.get_pending_work("t1").unwrap();
        assert_eq!(work.files.len(), 1);
        assert_eq!(work.files["hero.tsx"].source, "v2");
    }

    #[test]
    fn test_turns_are_isolated() {
        let tracker = WorkTracker::new();
        tracker.record_file_change("t1", "a.tsx", "X");
        tracker.record_file_change("t2", "a.tsx", "Y");

        assert_eq!(tracker.get_pending_work("t1").unwrap().files["a.tsx"].source, "X");
        assert_eq!(tracker.get_pending_work("t2").unwrap().files["a.tsx"].source, "Y");
    }

    #[test]
    fn test_dependencies_deduplicate() {
        let tracker = WorkTracker::new();
        tracker.record_dependency("t1", "recharts");
        tracker.record_dependency("t1", "recharts");
        tracker.record_dependency("t1", "clsx");

        let work = tracker.get_pending_work("t1").unwrap();
        assert!(work.files.is_empty());
        assert_eq!(
            work.dependencies.into_iter().collect::<Vec<_>>(),
            vec!["clsx".to_string(), "recharts".to_string()]
        );
    }

    #[test]
    fn test_clear_only_affects_one_turn() {
        let tracker = WorkTracker::new();
        tracker.record_file_change("t1", "a.tsx", "X");
        tracker.record_file_change("t2", "b.tsx", "Y");

        tracker.clear("t1");
        assert!(tracker.get_pending_work("t1").is_none());
        assert!(tracker.get_pending_work("t2").is_some());

        // clearing twice is harmless
        tracker.clear("t1");
    }

    #[test]
    fn test_rename_and_forget() {
        let tracker = WorkTracker::new();
        tracker.record_file_change("t1", "old.tsx", "src");

        assert!(tracker.rename_file("t1", "old.tsx", "new.tsx"));
        let work = tracker.get_pending_work("t1").unwrap();
        assert!(!work.files.contains_key("old.tsx"));
        assert_eq!(work.files["new.tsx"].filename, "new.tsx");
        assert_eq!(work.files["new.tsx"].source, "src");

        assert!(!tracker.rename_file("t1", "missing.tsx", "other.tsx"));
        assert!(tracker.forget_file("t1", "new.tsx"));
        assert!(!tracker.forget_file("t1", "new.tsx"));
        assert!(tracker.get_pending_work("t1").unwrap().is_empty());
    }
}
