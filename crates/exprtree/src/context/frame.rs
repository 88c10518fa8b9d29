//! Nested evaluation scopes opened by block-like nodes

use std::ops::{Deref, DerefMut};

use tracing::trace;

use super::Context;
use crate::tree::NodeId;

/// An open scope of a [`Context`], closed again when the guard drops.
///
/// A node kind that introduces a scope opens one around its body and
/// evaluates the body against the guard. Names first bound inside the
/// scope disappear when it closes, even if the body fails part way.
///
/// # Example
///
/// ```
/// use exprtree::{Context, Environment, ScopeGuard, Value};
///
/// let mut env = Environment::with_vars([("total", Value::Int(0))]);
///
/// {
///     let mut scope = ScopeGuard::enter(&mut env);
///     scope.set("tmp", Value::Int(2)).unwrap();
///     scope.set("total", Value::Int(2)).unwrap();
///     assert!(scope.contains("tmp"));
/// }
/// assert!(!env.contains("tmp"));
/// assert_eq!(env.get("total"), Some(Value::Int(2)));
/// ```
pub struct ScopeGuard<'a> {
    ctx: &'a mut dyn Context,
    owner: Option<NodeId>,
}

impl<'a> ScopeGuard<'a> {
    /// Open a scope on `ctx`.
    pub fn enter(ctx: &'a mut dyn Context) -> Self {
        ctx.enter_scope();
        trace!("enter scope");
        Self { ctx, owner: None }
    }

    /// Open a scope on `ctx` on behalf of node `owner`.
    pub fn for_node(ctx: &'a mut dyn Context, owner: NodeId) -> Self {
        ctx.enter_scope();
        trace!(owner = %owner, "enter scope");
        Self {
            ctx,
            owner: Some(owner),
        }
    }

    /// The node that opened this scope, if any
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        trace!(owner = ?self.owner, "exit scope");
        self.ctx.exit_scope();
    }
}

impl<'a> Deref for ScopeGuard<'a> {
    type Target = dyn Context + 'a;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'a> DerefMut for ScopeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}
