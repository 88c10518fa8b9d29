//! The node capability and borrowed node handles

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use tracing::trace;

use super::{Ast, NodeId};
use crate::context::Context;
use crate::error::{EvalError, IndexError};
use crate::introspect::Introspector;
use crate::kind::{Kind, KindTable};
use crate::parser::Parser;
use crate::value::Value;
use crate::visit::Visitor;

/// Behaviour every node kind provides.
///
/// Implement this for the grammar's closed set of node kinds, usually one
/// enum with a variant per production. Only [`kind`](Node::kind) is
/// required; every other method has a base default:
///
/// - `interpret` runs the children as statements, see
///   [`NodeRef::interpret_children`]
/// - `value`, `set_value` and `execute` return [`Value::Null`]
/// - `accept` hands the node straight to the visitor
/// - `open` and `close` do nothing
///
/// The evaluation methods receive the node as a [`NodeRef`] so that an
/// override can reach its children, its parent and the introspector. An
/// override that only wants to extend the default can call the matching
/// `NodeRef` helper itself.
pub trait Node: Sized {
    /// Grammar production tag
    fn kind(&self) -> Kind;

    /// Called when the builder opens this node's scope.
    fn open(&mut self) {}

    /// Called when the builder closes this node's scope, after its
    /// children are attached.
    fn close(&mut self) {}

    /// Double dispatch entry point for visitors.
    fn accept<V: Visitor<Self>>(
        node: NodeRef<'_, Self>,
        visitor: &mut V,
        data: V::Data,
    ) -> Result<V::Output, EvalError> {
        visitor.visit(node, data)
    }

    /// Run the node as a statement; `false` stops the enclosing sequence.
    fn interpret(node: NodeRef<'_, Self>, ctx: &mut dyn Context) -> Result<bool, EvalError> {
        node.interpret_children(ctx)
    }

    /// Compute the node's value.
    fn value(_node: NodeRef<'_, Self>, _ctx: &mut dyn Context) -> Result<Value, EvalError> {
        Ok(Value::Null)
    }

    /// Assign through the node (for lvalue kinds).
    fn set_value(
        _node: NodeRef<'_, Self>,
        _ctx: &mut dyn Context,
        _value: Value,
    ) -> Result<Value, EvalError> {
        Ok(Value::Null)
    }

    /// Apply the node to an already resolved receiver, e.g. a method call
    /// on `target`.
    fn execute(
        _node: NodeRef<'_, Self>,
        _target: &Value,
        _ctx: &mut dyn Context,
    ) -> Result<Value, EvalError> {
        Ok(Value::Null)
    }
}

/// A node borrowed from its [`Ast`].
///
/// Cheap to copy. Everything that walks a finished tree goes through this
/// type: navigation, visitors, evaluation and debug output.
pub struct NodeRef<'a, N> {
    ast: &'a Ast<N>,
    id: NodeId,
}

impl<N> Clone for NodeRef<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NodeRef<'_, N> {}

impl<'a, N: Node> NodeRef<'a, N> {
    pub(crate) fn new(ast: &'a Ast<N>, id: NodeId) -> Self {
        Self { ast, id }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Identity
    // ═══════════════════════════════════════════════════════════════════

    /// Arena handle of this node
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The node's payload
    pub fn data(self) -> &'a N {
        self.ast.data(self.id)
    }

    /// Grammar production tag
    pub fn kind(self) -> Kind {
        self.data().kind()
    }

    /// The tree this node belongs to
    pub fn ast(self) -> &'a Ast<N> {
        self.ast
    }

    /// The parser that created this node
    pub fn parser(self) -> &'a Parser {
        self.ast.parser()
    }

    /// The kind-name table of the originating parser
    pub fn kinds(self) -> &'a KindTable {
        self.parser().kinds()
    }

    /// The originating parser's member resolver.
    pub fn introspector(self) -> &'a dyn Introspector {
        self.parser().introspector()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Navigation
    // ═══════════════════════════════════════════════════════════════════

    /// The node named by this node's upward link.
    pub fn parent(self) -> Option<Self> {
        self.ast
            .parent_of(self.id)
            .map(|id| NodeRef::new(self.ast, id))
    }

    /// Parent, grandparent and so on up to the root.
    ///
    /// Finite: [`Ast::set_parent`] refuses links that would loop.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'a, N>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// The child in slot `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` past the allocated slots, `Absent` for an empty slot.
    pub fn child(self, index: usize) -> Result<Self, IndexError> {
        self.ast
            .child(self.id, index)
            .map(|id| NodeRef::new(self.ast, id))
    }

    /// Number of allocated child slots, empty ones included.
    pub fn child_count(self) -> usize {
        self.ast.child_slots(self.id).len()
    }

    /// Populated children in slot order.
    pub fn children(self) -> Children<'a, N> {
        Children {
            ast: self.ast,
            slots: self.ast.child_slots(self.id).iter(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Visitors
    // ═══════════════════════════════════════════════════════════════════

    /// Hand this node to `visitor` and return its result unchanged.
    pub fn accept<V: Visitor<N>>(
        self,
        visitor: &mut V,
        data: V::Data,
    ) -> Result<V::Output, EvalError> {
        N::accept(self, visitor, data)
    }

    /// Visit every populated child in slot order with a copy of `data`.
    ///
    /// Each child's result is dropped and `data` itself is returned, so
    /// visitors that accumulate keep their state in `self`. The first
    /// failing child aborts the walk.
    pub fn accept_children<V>(self, visitor: &mut V, data: V::Data) -> Result<V::Data, EvalError>
    where
        V: Visitor<N>,
        V::Data: Clone,
    {
        for child in self.children() {
            trace!(parent = %self, child = %child, "visit child");
            child.accept(visitor, data.clone())?;
        }
        Ok(data)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Evaluation
    // ═══════════════════════════════════════════════════════════════════

    /// Run this node as a statement.
    pub fn interpret(self, ctx: &mut dyn Context) -> Result<bool, EvalError> {
        N::interpret(self, ctx)
    }

    /// Compute this node's value.
    pub fn value(self, ctx: &mut dyn Context) -> Result<Value, EvalError> {
        N::value(self, ctx)
    }

    /// Assign `value` through this node.
    pub fn set_value(self, ctx: &mut dyn Context, value: Value) -> Result<Value, EvalError> {
        N::set_value(self, ctx, value)
    }

    /// Apply this node to `target`.
    pub fn execute(self, target: &Value, ctx: &mut dyn Context) -> Result<Value, EvalError> {
        N::execute(self, target, ctx)
    }

    /// Base statement semantics: interpret every child slot in order and
    /// stop at the first one that yields `false`.
    ///
    /// Returns `true` when every child did, including when there are none.
    /// Errors, an empty slot included, end the loop immediately.
    pub fn interpret_children(self, ctx: &mut dyn Context) -> Result<bool, EvalError> {
        for index in 0..self.child_count() {
            let child = self.child(index)?;
            if !child.interpret(ctx)? {
                trace!(node = %self, stopped_at = index, "interpret short-circuited");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<N: Node> fmt::Display for NodeRef<'_, N> {
    /// The kind's display name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kinds().name(self.kind()) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.kind()),
        }
    }
}

impl<N: Node> fmt::Debug for NodeRef<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self, self.id)
    }
}

/// Iterator over the populated children of a node.
pub struct Children<'a, N> {
    ast: &'a Ast<N>,
    slots: slice::Iter<'a, Option<NodeId>>,
}

impl<'a, N: Node> Iterator for Children<'a, N> {
    type Item = NodeRef<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        let ast = self.ast;
        self.slots
            .by_ref()
            .find_map(|slot| slot.map(|id| NodeRef::new(ast, id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<N: Node> FusedIterator for Children<'_, N> {}
