//! Arena-backed syntax trees
//!
//! An [`Ast`] owns every node of one parse result. Nodes are addressed by
//! [`NodeId`]; a node's children are ids stored in an index-addressable
//! slot array, and its parent is an id that observes the parent without
//! owning it. Dropping the `Ast` drops every node at once.
//!
//! Mutation (`create`, `add_child`, `set_parent`) needs `&mut Ast`, while
//! evaluation and visiting go through [`NodeRef`], which borrows the tree
//! shared. A finished tree can therefore be evaluated from many threads at
//! once, and can never be restructured while any evaluation is running.

mod dump;
mod node;

pub use node::{Children, Node, NodeRef};

use std::fmt;
use std::num::TryFromIntError;
use std::sync::Arc;

use crate::error::{IndexError, TreeError};
use crate::parser::Parser;

/// Handle to a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for NodeId {
    type Error = TryFromIntError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        u32::try_from(index).map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Slot<N> {
    data: N,

    /// Upward link as set by `set_parent`
    parent: Option<NodeId>,

    /// Child slots; `None` is a slot that was allocated but never filled
    children: Vec<Option<NodeId>>,

    /// The (node, index) slot currently holding this node
    owner: Option<(NodeId, usize)>,
}

/// One parse result: an arena of nodes plus its root.
pub struct Ast<N> {
    parser: Arc<Parser>,
    slots: Vec<Slot<N>>,
    root: Option<NodeId>,
}

impl<N: Node> Ast<N> {
    /// Create an empty tree owned by `parser`.
    pub fn new(parser: Arc<Parser>) -> Self {
        Self {
            parser,
            slots: Vec::new(),
            root: None,
        }
    }

    /// The parser that created this tree
    pub fn parser(&self) -> &Arc<Parser> {
        &self.parser
    }

    // ═══════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════

    /// Allocate a detached node. Its kind tag comes from `data`.
    ///
    /// # Panics
    ///
    /// If the arena already holds `u32::MAX + 1` nodes.
    pub fn create(&mut self, data: N) -> NodeId {
        let id = NodeId::try_from(self.slots.len())
            .expect("a tree holds at most u32::MAX + 1 nodes");
        self.slots.push(Slot {
            data,
            parent: None,
            children: Vec::new(),
            owner: None,
        });
        id
    }

    /// Set or clear the upward link of `id`.
    ///
    /// The link is not checked against the child slots, but it may not
    /// loop: the parent chain always ends at a node without a parent.
    ///
    /// # Errors
    ///
    /// - `Index` if either id is unknown
    /// - `Cycle` if `parent` is `id` or reaches `id` through its own links
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), TreeError> {
        self.slot(id)?;
        if let Some(p) = parent {
            self.check_link(id, p)?;
        }
        self.slot_mut(id)?.parent = parent;
        Ok(())
    }

    /// Put `child` into slot `index` of `id`.
    ///
    /// Storage grows to exactly `index + 1` slots when needed, leaving any
    /// new slots in between empty. An existing occupant of the slot is
    /// replaced and becomes detached.
    ///
    /// # Errors
    ///
    /// - `Index` if either id is unknown
    /// - `Cycle` if `child` is `id` or one of its ancestors
    /// - `AlreadyAttached` if `child` occupies some other slot
    pub fn add_child(&mut self, id: NodeId, child: NodeId, index: usize) -> Result<(), TreeError> {
        self.slot(id)?;
        if self.slot(child)?.owner == Some((id, index)) {
            return Ok(());
        }
        self.check_attach(id, child)?;

        let children = &mut self.slot_mut(id)?.children;
        if index >= children.len() {
            children.resize(index + 1, None);
        }
        let replaced = children[index].replace(child);

        if let Some(old) = replaced {
            self.slot_mut(old)?.owner = None;
        }
        self.slot_mut(child)?.owner = Some((id, index));
        Ok(())
    }

    /// Mark `id` as the root of the tree.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), IndexError> {
        self.slot(id)?;
        self.root = Some(id);
        Ok(())
    }

    /// Mutable access to a node's payload.
    pub fn data_mut(&mut self, id: NodeId) -> Result<&mut N, IndexError> {
        Ok(&mut self.slot_mut(id)?.data)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Borrow a node for navigation, visiting and evaluation.
    pub fn node(&self, id: NodeId) -> Result<NodeRef<'_, N>, IndexError> {
        self.slot(id)?;
        Ok(NodeRef::new(self, id))
    }

    /// The root node, once one has been set
    pub fn root(&self) -> Option<NodeRef<'_, N>> {
        self.root.map(|id| NodeRef::new(self, id))
    }

    /// The upward link of `id`.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, IndexError> {
        Ok(self.slot(id)?.parent)
    }

    /// The child in slot `index` of `id`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` past the allocated slots, `Absent` for an empty slot.
    pub fn child(&self, id: NodeId, index: usize) -> Result<NodeId, IndexError> {
        let children = &self.slot(id)?.children;
        match children.get(index) {
            Some(Some(child)) => Ok(*child),
            Some(None) => Err(IndexError::Absent { index }),
            None => Err(IndexError::OutOfBounds {
                index,
                len: children.len(),
            }),
        }
    }

    /// Number of allocated child slots of `id`, empty ones included.
    pub fn child_count(&self, id: NodeId) -> Result<usize, IndexError> {
        Ok(self.slot(id)?.children.len())
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check the finished shape of the tree under the root against the
    /// parser's [`TreeConfig`](crate::TreeConfig).
    ///
    /// # Errors
    ///
    /// - `SparseChildren` for an empty slot when dense children are required
    /// - `TooDeep` when nesting exceeds the configured depth
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            return Ok(());
        };
        let config = self.parser.config();

        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            if depth > config.max_depth {
                return Err(TreeError::TooDeep {
                    max: config.max_depth,
                });
            }
            for (index, child) in self.slot(id)?.children.iter().enumerate() {
                match child {
                    Some(child) => stack.push((*child, depth + 1)),
                    None if config.require_dense => {
                        return Err(TreeError::SparseChildren { node: id, index })
                    }
                    None => {}
                }
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════

    pub(crate) fn data(&self, id: NodeId) -> &N {
        &self.slots[id.index()].data
    }

    pub(crate) fn child_slots(&self, id: NodeId) -> &[Option<NodeId>] {
        &self.slots[id.index()].children
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    fn slot(&self, id: NodeId) -> Result<&Slot<N>, IndexError> {
        self.slots
            .get(id.index())
            .ok_or(IndexError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot<N>, IndexError> {
        self.slots
            .get_mut(id.index())
            .ok_or(IndexError::UnknownNode(id))
    }

    /// Whether `child` could be put into any slot of `id` right now.
    pub(crate) fn check_attach(&self, id: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.slot(id)?;
        if let Some((parent, _)) = self.slot(child)?.owner {
            return Err(TreeError::AlreadyAttached { child, parent });
        }
        if self.is_ancestor_or_self(child, id) {
            return Err(TreeError::Cycle { parent: id, child });
        }
        Ok(())
    }

    /// Whether `id` could link upwards to `parent` without a loop.
    pub(crate) fn check_link(&self, id: NodeId, parent: NodeId) -> Result<(), TreeError> {
        self.slot(id)?;
        let mut current = Some(parent);
        while let Some(link) = current {
            if link == id {
                return Err(TreeError::Cycle { parent, child: id });
            }
            current = self.slot(link)?.parent;
        }
        Ok(())
    }

    /// Walk the slot-ownership chain upwards from `from` looking for `target`.
    fn is_ancestor_or_self(&self, target: NodeId, from: NodeId) -> bool {
        let mut current = Some(from);
        while let Some(id) = current {
            if id == target {
                return true;
            }
            current = self.slots[id.index()].owner.map(|(parent, _)| parent);
        }
        false
    }
}

impl<N: fmt::Debug> fmt::Debug for Ast<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ast")
            .field("root", &self.root)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
