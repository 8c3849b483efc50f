use serde::Serialize;

/// Counters describing the work the manager has done
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Directory-wide notes files loaded
    pub header_notes_loaded: usize,
    /// Framework public notes loaded
    pub public_framework_notes_loaded: usize,
    /// Framework private notes loaded
    pub private_framework_notes_loaded: usize,
    pub frameworks_searched: usize,
    /// Ordinary directories probed for a directory-wide notes file
    pub directories_searched: usize,
    /// Directory lookups answered by the cache
    pub directory_cache_hits: usize,
    /// Directory lookups that had to go to disk
    pub directory_cache_misses: usize,
}

impl Statistics {
    /// Total number of notes files loaded through implicit lookup
    pub fn notes_loaded(&self) -> usize {
        self.header_notes_loaded
            + self.public_framework_notes_loaded
            + self.private_framework_notes_loaded
    }

    /// Total number of disk probes
    pub fn probes(&self) -> usize {
        self.frameworks_searched + self.directories_searched
    }
}
