//! Construction-time configuration shared by the engine and both front-ends.

/// Behaviour switches a table carries for its whole lifetime (both can be
/// flipped later through the table's setters).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TableFlags {
    /// Skip the uniqueness check on unchecked `insert`; several entries may
    /// then share a key and lookups return the most recently inserted one.
    pub allow_duplicates: bool,
    /// Let removals shrink the bucket array. Bulk removals by set operations
    /// shrink regardless.
    pub allow_shrink: bool,
}

/// Table configuration: reserve hint plus [`TableFlags`].
///
/// ```
/// use chain_hashmap::{ChainHashMap, TableConfig};
///
/// let cfg = TableConfig::new().reserve(100).allow_shrink(true);
/// let map: ChainHashMap<u32, &str> = ChainHashMap::with_config(cfg);
/// assert!(map.allow_shrink());
/// assert!(map.bucket_count() >= 131);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TableConfig {
    pub(crate) reserve: usize,
    pub(crate) flags: TableFlags,
}

impl TableConfig {
    pub const fn new() -> Self {
        Self {
            reserve: 0,
            flags: TableFlags {
                allow_duplicates: false,
                allow_shrink: false,
            },
        }
    }

    /// Pre-size for `entries` and never shrink below that size.
    pub const fn reserve(mut self, entries: usize) -> Self {
        self.reserve = entries;
        self
    }

    pub const fn allow_duplicates(mut self, allow: bool) -> Self {
        self.flags.allow_duplicates = allow;
        self
    }

    pub const fn allow_shrink(mut self, allow: bool) -> Self {
        self.flags.allow_shrink = allow;
        self
    }

    pub const fn flags(&self) -> TableFlags {
        self.flags
    }

    pub const fn reserved(&self) -> usize {
        self.reserve
    }
}
