//! Node kind tags and the kind-name table

use std::fmt;

/// Stable integer tag identifying the grammar production a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(pub u16);

impl Kind {
    /// Position of this kind in its [`KindTable`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind tag → display name mapping owned by the grammar layer.
///
/// Built once before any node exists and shared immutably afterwards
/// (normally behind the `Arc` a [`Parser`](crate::Parser) holds).
///
/// # Example
///
/// ```
/// use exprtree::{Kind, KindTable};
///
/// let kinds = KindTable::new(["JexlScript", "Block", "Reference"]);
/// assert_eq!(kinds.name(Kind(1)), Some("Block"));
/// assert_eq!(kinds.display(Kind(9)), "#9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindTable {
    names: Box<[&'static str]>,
}

impl KindTable {
    /// Create a table; the nth name belongs to `Kind(n)`.
    pub fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Display name for a kind, if the table has one.
    pub fn name(&self, kind: Kind) -> Option<&'static str> {
        self.names.get(kind.index()).copied()
    }

    /// Display name for a kind, falling back to the numeric tag.
    pub fn display(&self, kind: Kind) -> String {
        match self.name(kind) {
            Some(name) => name.to_string(),
            None => kind.to_string(),
        }
    }

    /// Look a kind up by display name.
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| u16::try_from(i).ok())
            .map(Kind)
    }

    /// Number of kinds in the table
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
