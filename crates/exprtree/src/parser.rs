//! The parser-side handle every tree keeps a reference to

use std::fmt;
use std::sync::Arc;

use crate::builder::TreeBuilder;
use crate::config::TreeConfig;
use crate::introspect::Introspector;
use crate::kind::KindTable;
use crate::tree::{Ast, Node};

/// What nodes need from the parser that created them.
///
/// The grammar-driven parser proper lives outside this crate. It owns one
/// `Parser` (behind an `Arc`) and hands it to every tree it builds, which
/// gives nodes the kind-name table for display and the resolver for
/// dynamic member lookup without either being global state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use exprtree::{BasicIntrospector, KindTable, Parser};
///
/// let parser = Parser::new(
///     Arc::new(KindTable::new(["Script", "Block"])),
///     BasicIntrospector::shared(),
/// );
/// assert_eq!(parser.kinds().len(), 2);
/// ```
pub struct Parser {
    kinds: Arc<KindTable>,
    introspector: Arc<dyn Introspector>,
    config: TreeConfig,
}

impl Parser {
    /// Create a parser handle with the default [`TreeConfig`].
    pub fn new(kinds: Arc<KindTable>, introspector: Arc<dyn Introspector>) -> Arc<Self> {
        Self::with_config(kinds, introspector, TreeConfig::default())
    }

    /// Create a parser handle with a custom configuration.
    pub fn with_config(
        kinds: Arc<KindTable>,
        introspector: Arc<dyn Introspector>,
        config: TreeConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            kinds,
            introspector,
            config,
        })
    }

    /// The kind-name table
    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    /// The resolver concrete node kinds use for member lookup
    pub fn introspector(&self) -> &dyn Introspector {
        self.introspector.as_ref()
    }

    /// Tree configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Start an empty tree owned by this parser.
    pub fn tree<N: Node>(self: &Arc<Self>) -> Ast<N> {
        Ast::new(Arc::clone(self))
    }

    /// Start a node-stack builder for a new tree.
    pub fn builder<N: Node>(self: &Arc<Self>) -> TreeBuilder<N> {
        TreeBuilder::new(Arc::clone(self))
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("kinds", &self.kinds)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
