//! Node-stack tree builder for bottom-up parsers
//!
//! Grammar actions push finished nodes onto a stack. When a production
//! completes, its node pops the nodes produced inside its scope and adopts
//! them as children, in the order they were produced, then goes on the
//! stack itself. When parsing ends exactly one node, the root, remains.

use std::sync::Arc;

use tracing::debug;

use crate::error::TreeError;
use crate::parser::Parser;
use crate::tree::{Ast, Node, NodeId};

/// Builds an [`Ast`] through a stack of open node scopes.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use exprtree::{BasicIntrospector, Kind, KindTable, Node, Parser};
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
///     Arc::new(KindTable::new(["Add", "Number"])),
///     BasicIntrospector::shared(),
/// );
/// let mut b = parser.builder();
///
/// // Add(Number, Number)
/// let add = b.create(Tag(0));
/// b.open_node_scope(add).unwrap();
/// for _ in 0..2 {
///     let n = b.create(Tag(1));
///     b.open_node_scope(n).unwrap();
///     b.close_node_scope(n, 0).unwrap();
/// }
/// b.close_node_scope(add, 2).unwrap();
///
/// let ast = b.finish().unwrap();
/// assert_eq!(ast.root().unwrap().child_count(), 2);
/// ```
pub struct TreeBuilder<N> {
    ast: Ast<N>,

    /// Closed nodes not yet adopted by a parent
    nodes: Vec<NodeId>,

    /// Stack marks of enclosing open scopes
    marks: Vec<usize>,

    /// Stack height when the innermost open scope began
    mark: usize,

    node_created: bool,
}

impl<N: Node> TreeBuilder<N> {
    /// Create a builder for a new tree owned by `parser`.
    pub fn new(parser: Arc<Parser>) -> Self {
        Self {
            ast: Ast::new(parser),
            nodes: Vec::new(),
            marks: Vec::new(),
            mark: 0,
            node_created: false,
        }
    }

    /// Allocate a node in the tree under construction.
    pub fn create(&mut self, data: N) -> NodeId {
        self.ast.create(data)
    }

    /// The tree under construction
    pub fn ast(&self) -> &Ast<N> {
        &self.ast
    }

    /// Whether the last scope closed actually produced a node.
    pub fn node_created(&self) -> bool {
        self.node_created
    }

    /// Drop all stack state; nodes already created stay in the arena.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.marks.clear();
        self.mark = 0;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Node Stack
    // ═══════════════════════════════════════════════════════════════════

    /// Push a closed node.
    pub fn push_node(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    /// Pop the most recent closed node, leaving its scope if it was the
    /// last one in it.
    pub fn pop_node(&mut self) -> Result<NodeId, TreeError> {
        let id = self.nodes.pop().ok_or(TreeError::StackUnderflow {
            wanted: 1,
            available: 0,
        })?;
        if self.nodes.len() < self.mark {
            self.mark = self.marks.pop().unwrap_or(0);
        }
        Ok(id)
    }

    /// The most recent closed node
    pub fn peek_node(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Nodes pushed since the innermost open scope began.
    pub fn node_arity(&self) -> usize {
        self.nodes.len().saturating_sub(self.mark)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scopes
    // ═══════════════════════════════════════════════════════════════════

    /// Begin the scope of `id`; nodes pushed from here on are its
    /// candidate children.
    pub fn open_node_scope(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.ast.data_mut(id)?.open();
        self.marks.push(self.mark);
        self.mark = self.nodes.len();
        Ok(())
    }

    /// Close the scope of `id`, adopting the top `arity` nodes as its
    /// children, and push `id`.
    ///
    /// On error the stack, the open scopes and the tree are unchanged.
    pub fn close_node_scope(&mut self, id: NodeId, arity: usize) -> Result<(), TreeError> {
        self.check_adoption(id, arity)?;
        self.mark = self.marks.pop().unwrap_or(0);
        self.adopt(id, arity)
    }

    /// Close the scope of `id`. When `condition` holds, every node pushed
    /// inside the scope becomes a child and `id` is pushed; otherwise the
    /// scope is abandoned and its nodes stay on the stack.
    pub fn close_node_scope_if(&mut self, id: NodeId, condition: bool) -> Result<(), TreeError> {
        if condition {
            let arity = self.node_arity();
            self.check_adoption(id, arity)?;
            self.mark = self.marks.pop().unwrap_or(0);
            self.adopt(id, arity)
        } else {
            self.mark = self.marks.pop().unwrap_or(0);
            self.node_created = false;
            Ok(())
        }
    }

    /// Abandon the scope of `id`, discarding the nodes pushed inside it.
    pub fn clear_node_scope(&mut self, _id: NodeId) -> Result<(), TreeError> {
        while self.nodes.len() > self.mark {
            self.pop_node()?;
        }
        self.mark = self.marks.pop().unwrap_or(0);
        Ok(())
    }

    /// Fail unless the top `arity` nodes are distinct, detached and not
    /// `id` or one of its ancestors, by slot or by parent link.
    fn check_adoption(&self, id: NodeId, arity: usize) -> Result<(), TreeError> {
        let Some(start) = self.nodes.len().checked_sub(arity) else {
            return Err(TreeError::StackUnderflow {
                wanted: arity,
                available: self.nodes.len(),
            });
        };
        self.ast.node(id)?;
        let children = &self.nodes[start..];
        for (offset, &child) in children.iter().enumerate() {
            if children[..offset].contains(&child) {
                return Err(TreeError::AlreadyAttached { child, parent: id });
            }
            self.ast.check_attach(id, child)?;
            self.ast.check_link(child, id)?;
        }
        Ok(())
    }

    fn adopt(&mut self, id: NodeId, arity: usize) -> Result<(), TreeError> {
        for index in (0..arity).rev() {
            let child = self.pop_node()?;
            self.ast.set_parent(child, Some(id))?;
            self.ast.add_child(id, child, index)?;
        }
        self.ast.data_mut(id)?.close();
        self.push_node(id);
        self.node_created = true;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Completion
    // ═══════════════════════════════════════════════════════════════════

    /// Finish the build: the single node left on the stack becomes the
    /// root, and the tree is validated against the parser's config.
    ///
    /// # Errors
    ///
    /// - `NoSingleRoot` unless exactly one node remains
    /// - whatever [`Ast::validate`] reports
    pub fn finish(mut self) -> Result<Ast<N>, TreeError> {
        let root = match self.nodes.as_slice() {
            [root] => *root,
            other => return Err(TreeError::NoSingleRoot(other.len())),
        };
        self.ast.set_root(root)?;
        self.ast.validate()?;
        debug!(nodes = self.ast.len(), root = %root, "finished tree");
        Ok(self.ast)
    }
}
