use id_arena::Id;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::file_manager::DirectoryId;
use crate::notes::NotesReader;

pub type ReaderId = Id<NotesReader>;

/// What the cache knows about one directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheEntry {
    /// Never looked at
    #[default]
    Unresolved,
    /// Final answer: the reader governing this directory, or none
    Resolved(Option<ReaderId>),
    /// Same answer as another directory
    Redirect(DirectoryId),
}

impl CacheEntry {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, CacheEntry::Unresolved)
    }
}

/// Directory-keyed answers to "which notes apply here"
#[derive(Debug, Default)]
pub struct DirectoryCache {
    entries: FxHashMap<DirectoryId, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a directory, counting a hit for any known entry and a miss
    /// otherwise
    pub fn lookup(&mut self, dir: DirectoryId) -> CacheEntry {
        let entry = self.peek(dir);
        if entry.is_unresolved() {
            self.misses += 1;
        } else {
            self.hits += 1;
        }
        entry
    }

    /// Look up a directory without touching the counters
    pub fn peek(&self, dir: DirectoryId) -> CacheEntry {
        self.entries.get(&dir).copied().unwrap_or_default()
    }

    /// Record the answer for a directory that has none yet.
    ///
    /// Returns `false`, leaving the existing entry in place, if the
    /// directory was already answered.
    pub fn record(&mut self, dir: DirectoryId, entry: CacheEntry) -> bool {
        let slot = self.entries.entry(dir).or_default();
        if !slot.is_unresolved() {
            debug!(
                "Keeping existing cache entry {:?} for {:?} (offered {:?})",
                slot, dir, entry
            );
            return false;
        }
        *slot = entry;
        true
    }

    /// Point a directory visited during a walk at the walk's final
    /// directory, or at "no notes" when the walk found nothing
    pub fn compress(&mut self, dir: DirectoryId, target: Option<DirectoryId>) {
        let entry = match target {
            Some(target) => {
                debug_assert_ne!(dir, target, "redirecting a directory to itself");
                CacheEntry::Redirect(target)
            }
            None => CacheEntry::Resolved(None),
        };
        self.entries.insert(dir, entry);
    }

    /// Follow redirects from `dir` to the final answer without counting
    pub fn resolved(&self, mut dir: DirectoryId) -> Option<Option<ReaderId>> {
        // Each redirect points at a resolved directory, so this is short.
        for _ in 0..=self.entries.len() {
            match self.peek(dir) {
                CacheEntry::Unresolved => return None,
                CacheEntry::Resolved(reader) => return Some(reader),
                CacheEntry::Redirect(next) => dir = next,
            }
        }
        None
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
