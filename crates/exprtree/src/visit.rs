//! Visitor protocol for external tree walks
//!
//! A [`Visitor`] sees one node per call and decides per kind what to do,
//! usually by matching on [`NodeRef::data`]. Walking further is the
//! visitor's choice: it recurses with [`NodeRef::accept_children`] or by
//! accepting individual children.

use crate::error::EvalError;
use crate::tree::{Node, NodeRef};

/// An operation applied to nodes through [`NodeRef::accept`].
pub trait Visitor<N: Node> {
    /// Traversal state threaded through the walk
    type Data;

    /// What a single visit produces
    type Output;

    /// Handle one node.
    fn visit(&mut self, node: NodeRef<'_, N>, data: Self::Data) -> Result<Self::Output, EvalError>;
}

/// Visitor that records every node in pre-order, then descends.
///
/// Handy for tests and for flattening a tree into kind names.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use exprtree::{BasicIntrospector, Kind, KindTable, Node, Parser, PreorderNames};
///
/// struct Tag(u16);
///
/// impl Node for Tag {
///     fn kind(&self) -> Kind {
///         Kind(self.0)
///     }
/// }
///
/// let parser = Parser::new(
///     Arc::new(KindTable::new(["Block", "Identifier"])),
///     BasicIntrospector::shared(),
/// );
/// let mut ast = parser.tree();
/// let root = ast.create(Tag(0));
/// let x = ast.create(Tag(1));
/// ast.add_child(root, x, 0).unwrap();
///
/// let mut names = PreorderNames::default();
/// ast.node(root).unwrap().accept(&mut names, ()).unwrap();
/// assert_eq!(names.names, vec!["Block", "Identifier"]);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreorderNames {
    /// Kind display names in visit order
    pub names: Vec<String>,
}

impl<N: Node> Visitor<N> for PreorderNames {
    type Data = ();
    type Output = ();

    fn visit(&mut self, node: NodeRef<'_, N>, data: ()) -> Result<(), EvalError> {
        self.names.push(node.to_string());
        node.accept_children(self, data)
    }
}
