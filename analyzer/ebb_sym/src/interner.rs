//! String interner backing [`Name`] tokens.
//!
//! Interning is O(1) amortized and thread-safe behind a single
//! `parking_lot::RwLock`. The analyzer interns identifiers once (checker
//! construction caches its reserved names), so a sharded table would buy
//! nothing here.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Table exceeded `u32::MAX` distinct strings.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => {
                write!(
                    f,
                    "interner exceeded capacity: {count} strings, max is {}",
                    u32::MAX
                )
            }
        }
    }
}

impl std::error::Error for InternError {}

struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::raw`.
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Interned strings live for the lifetime of the process (`Box::leak`); the
/// interner is expected to be created once per analysis and hold a bounded
/// identifier population.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as
    /// [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut table = InternTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        table.map.insert("", 0);
        table.strings.push("");
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern a string, returning its identity token.
    ///
    /// # Panics
    /// Panics if the table exceeds `u32::MAX` distinct strings.
    pub fn intern(&self, s: &str) -> Name {
        match self.try_intern(s) {
            Ok(name) => name,
            Err(err) => panic!("{err}"),
        }
    }

    /// Intern a string, failing on table overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&idx) = self.table.read().map.get(s) {
            return Ok(Name::from_raw(idx));
        }

        let mut table = self.table.write();
        // Re-check under the write lock: another thread may have interned it.
        if let Some(&idx) = table.map.get(s) {
            return Ok(Name::from_raw(idx));
        }

        let count = table.strings.len();
        let Ok(idx) = u32::try_from(count) else {
            return Err(InternError::Overflow { count });
        };
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.map.insert(leaked, idx);
        table.strings.push(leaked);
        Ok(Name::from_raw(idx))
    }

    /// Look up a previously interned token, without interning.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).map(|&idx| Name::from_raw(idx))
    }

    /// Resolve a token back to its string.
    ///
    /// Returns `None` for tokens not produced by this interner.
    pub fn resolve(&self, name: Name) -> Option<&'static str> {
        self.table.read().strings.get(name.raw() as usize).copied()
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Whether the interner holds only the pre-interned empty string.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
