//! Error types for tree construction and evaluation

use thiserror::Error;

use crate::tree::NodeId;
use crate::value::Value;

/// Child or node addressing failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Index past the allocated child slots
    #[error("child index {index} out of bounds for node with {len} slots")]
    OutOfBounds {
        /// Requested index
        index: usize,
        /// Allocated slot count
        len: usize,
    },

    /// Slot allocated but never populated
    #[error("child slot {index} is empty")]
    Absent {
        /// Requested index
        index: usize,
    },

    /// Node id not issued by this tree
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// Structural failure while building a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Addressing failure
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Attaching `child` under `parent` would close a loop
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// Would-be parent
        parent: NodeId,
        /// Would-be child
        child: NodeId,
    },

    /// Child already occupies a slot of another node
    #[error("{child} is already a child of {parent}")]
    AlreadyAttached {
        /// The node being attached
        child: NodeId,
        /// Its current owner
        parent: NodeId,
    },

    /// Construction finished with an interior gap
    #[error("{node} has no child in slot {index}")]
    SparseChildren {
        /// Node with the gap
        node: NodeId,
        /// First empty slot
        index: usize,
    },

    /// Tree nests deeper than the configured limit
    #[error("tree depth exceeds {max}")]
    TooDeep {
        /// Configured limit
        max: usize,
    },

    /// Builder asked to pop more nodes than it holds
    #[error("node stack underflow: wanted {wanted}, have {available}")]
    StackUnderflow {
        /// Nodes requested
        wanted: usize,
        /// Nodes on the stack
        available: usize,
    },

    /// Builder finished without exactly one root
    #[error("expected a single root node, found {0}")]
    NoSingleRoot(usize),
}

/// Binding context failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Name not bound
    #[error("undefined variable: {name}")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Binding exists but cannot be written
    #[error("cannot assign to read-only variable: {name}")]
    ReadOnly {
        /// Variable name
        name: String,
    },
}

/// Failure during `interpret`, `value`, `set_value` or `execute`.
///
/// The base node defaults never produce one; concrete node kinds and the
/// collaborators they call do. Every traversal helper in this crate passes
/// these through untouched.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Child access failed mid-evaluation
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Binding context rejected a read or write
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Operand of the wrong type
    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type
        expected: String,
        /// Actual type received
        got: String,
    },

    /// `set_value` on a node kind that is not an lvalue
    #[error("{kind} is not assignable")]
    NotAssignable {
        /// Kind display name
        kind: String,
    },

    /// Resolver found no readable or writable property
    #[error("unknown property `{name}` on {type_name}")]
    UnknownProperty {
        /// Property name
        name: String,
        /// Receiver type
        type_name: String,
    },

    /// Resolver found no method with that name
    #[error("unknown method `{name}` on {type_name}")]
    UnknownMethod {
        /// Method name
        name: String,
        /// Receiver type
        type_name: String,
    },

    /// Method called with the wrong number of arguments
    #[error("`{name}` takes {expected} argument(s) but {got} were supplied")]
    ArityMismatch {
        /// Method name
        name: String,
        /// Expected argument count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Error raised by host code behind a context or resolver
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl EvalError {
    /// Shorthand for a [`EvalError::TypeError`] against a runtime value.
    pub fn type_error(expected: impl Into<String>, got: &Value) -> Self {
        EvalError::TypeError {
            expected: expected.into(),
            got: type_name(got).to_string(),
        }
    }
}

/// Result type alias for evaluation
pub type Result<T, E = EvalError> = std::result::Result<T, E>;

/// Human-readable type name of a value, for error messages.
pub fn type_name(value: &Value) -> &str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::List(_) => "list",
        Value::Map(_) => "map",
        Value::Object(obj) => obj.type_name(),
    }
}
