//! Tree construction and debug-dump configuration

use std::borrow::Cow;

/// Configuration shared by every tree a [`Parser`](crate::Parser) builds.
///
/// Controls how strictly finished trees are validated and how
/// [`NodeRef::dump`](crate::NodeRef::dump) renders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Text added to the dump prefix for each level of nesting
    pub indent: Cow<'static, str>,

    /// Reject finished trees whose nodes have empty child slots
    pub require_dense: bool,

    /// Maximum nesting depth accepted when a build finishes
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            indent: Cow::Borrowed(" "),
            require_dense: true,
            max_depth: 1000,
        }
    }
}

impl TreeConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom dump indent unit.
    pub fn with_indent(mut self, indent: impl Into<Cow<'static, str>>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Allow finished trees to keep interior gaps.
    pub fn allow_sparse(mut self) -> Self {
        self.require_dense = false;
        self
    }

    /// Create a configuration with a custom depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
