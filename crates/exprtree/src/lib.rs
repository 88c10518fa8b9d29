//! # exprtree
//!
//! The syntax-tree substrate of an expression-language interpreter.
//!
//! A grammar-driven parser builds trees bottom-up, attaching children by
//! index as productions complete. Finished trees are then walked many
//! times, by external visitors or by the recursive evaluation protocol,
//! each time against a fresh binding context.
//!
//! ## Architecture
//!
//! - **Tree**: [`Ast`] arena with index-addressed child slots and
//!   non-owning parent links; [`NodeRef`] for navigation
//! - **Node capability**: the [`Node`] trait, implemented by the grammar's
//!   closed set of node kinds, with base defaults for evaluation
//! - **Visitors**: [`Visitor`] double dispatch via [`NodeRef::accept`]
//! - **Builder**: [`TreeBuilder`] node-scope stack for parser actions
//! - **Collaborators**: [`Context`] bindings and the [`Introspector`]
//!   member resolver reached through the originating [`Parser`]
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use exprtree::{
//!     BasicIntrospector, Context, Environment, EvalError, Kind, KindTable, Node, NodeRef,
//!     Parser, Value,
//! };
//!
//! enum Expr {
//!     Block,
//!     Var(&'static str),
//! }
//!
//! impl Node for Expr {
//!     fn kind(&self) -> Kind {
//!         match self {
//!             Expr::Block => Kind(0),
//!             Expr::Var(_) => Kind(1),
//!         }
//!     }
//!
//!     fn value(node: NodeRef<'_, Self>, ctx: &mut dyn Context) -> Result<Value, EvalError> {
//!         match node.data() {
//!             Expr::Var(name) => Ok(ctx.get(name).unwrap_or_default()),
//!             Expr::Block => Ok(Value::Null),
//!         }
//!     }
//! }
//!
//! let parser = Parser::new(
//!     Arc::new(KindTable::new(["Block", "Var"])),
//!     BasicIntrospector::shared(),
//! );
//! let mut ast = parser.tree();
//! let block = ast.create(Expr::Block);
//! let x = ast.create(Expr::Var("x"));
//! ast.set_parent(x, Some(block)).unwrap();
//! ast.add_child(block, x, 0).unwrap();
//!
//! let mut env = Environment::with_vars([("x", Value::Int(7))]);
//! let node = ast.node(x).unwrap();
//! assert_eq!(node.value(&mut env).unwrap(), Value::Int(7));
//! assert_eq!(node.parent().unwrap().to_string(), "Block");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod introspect;
pub mod kind;
pub mod parser;
pub mod tree;
pub mod value;
pub mod visit;

// Re-export main types
pub use builder::TreeBuilder;
pub use config::TreeConfig;
pub use context::{Binding, Context, Environment, ScopeGuard};
pub use error::{ContextError, EvalError, IndexError, Result, TreeError};
pub use introspect::{BasicIntrospector, Introspector};
pub use kind::{Kind, KindTable};
pub use parser::Parser;
pub use tree::{Ast, Children, Node, NodeId, NodeRef};
pub use value::{ObjectValue, Value};
pub use visit::{PreorderNames, Visitor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
