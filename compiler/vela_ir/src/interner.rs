//! Sharded string interner.
//!
//! O(1) interning and lookup with per-shard locking so distinct parser
//! instances can share one interner across threads.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Name;

/// Per-shard storage for interned strings.
#[derive(Debug)]
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<Box<str>, u32>,
    /// Storage for string contents, indexed by local index.
    strings: Vec<Box<str>>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        shard.map.insert("".into(), 0);
        shard.strings.push("".into());
        shard
    }
}

/// Sharded string interner for concurrent access.
///
/// Shard selection hashes the string; `lookup` is lock-read-only on the
/// owning shard. The empty string is pre-interned as `Name::EMPTY`.
#[derive(Debug)]
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });
        Self {
            shards,
            total_count: AtomicUsize::new(1),
        }
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&self, s: &str) -> Name {
        if s.is_empty() {
            return Name::EMPTY;
        }
        let shard_idx = Self::shard_for(s);

        {
            let shard = self.shards[shard_idx].read();
            if let Some(&local) = shard.map.get(s) {
                return Name::new(shard_idx as u32, local);
            }
        }

        let mut shard = self.shards[shard_idx].write();
        // Re-check: another thread may have interned between the locks.
        if let Some(&local) = shard.map.get(s) {
            return Name::new(shard_idx as u32, local);
        }
        let local = u32::try_from(shard.strings.len()).unwrap_or(Name::MAX_LOCAL);
        assert!(local <= Name::MAX_LOCAL, "interner shard overflow");
        shard.strings.push(s.into());
        shard.map.insert(s.into(), local);
        self.total_count.fetch_add(1, Ordering::Relaxed);
        Name::new(shard_idx as u32, local)
    }

    /// Resolve a `Name` back to its string.
    pub fn lookup(&self, name: Name) -> String {
        let shard = self.shards[name.shard()].read();
        shard.strings[name.local()].to_string()
    }

    /// Run a closure over the resolved string without allocating.
    pub fn with_str<T>(&self, name: Name, f: impl FnOnce(&str) -> T) -> T {
        let shard = self.shards[name.shard()].read();
        f(&shard.strings[name.local()])
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Whether only the pre-interned empty string is present.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn shard_for(s: &str) -> usize {
        use std::hash::{Hash, Hasher};
        let mut hasher = rustc_hash::FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) % Name::NUM_SHARDS
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedups() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        let c = interner.intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.lookup(a), "foo");
        assert_eq!(interner.lookup(c), "bar");
    }

    #[test]
    fn empty_is_preinterned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }
}
