//! Binding contexts nodes read and write variables through

mod frame;

pub use frame::ScopeGuard;

use crate::error::ContextError;
use crate::value::Value;

/// Name → value bindings supplied fresh for each evaluation.
///
/// Nodes borrow a context for the duration of one `interpret`/`value`/
/// `set_value`/`execute` call and never keep it. Each concurrent
/// evaluation of a tree gets its own context.
pub trait Context {
    /// Look up a variable. `None` when unbound.
    fn get(&self, name: &str) -> Option<Value>;

    /// Assign a variable, creating it if the context allows that.
    fn set(&mut self, name: &str, value: Value) -> Result<(), ContextError>;

    /// Check if a variable is bound.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Open a nested scope. Contexts without scoping ignore this.
    ///
    /// Prefer [`ScopeGuard`], which pairs it with [`exit_scope`](Self::exit_scope).
    fn enter_scope(&mut self) {}

    /// Close the innermost scope, forgetting names first bound in it.
    fn exit_scope(&mut self) {}
}

/// A single variable binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The binding's name
    pub name: String,

    /// The bound value
    pub value: Value,

    /// Whether expressions may assign to this binding
    pub read_only: bool,
}

/// The stock [`Context`]: flat bindings with frame boundaries.
///
/// Assignment to an unbound name defines it in the current frame;
/// assignment to a bound name updates the innermost binding.
///
/// # Example
///
/// ```
/// use exprtree::{Context, Environment, Value};
///
/// let mut env = Environment::new();
/// env.define("x", Value::Int(1));
///
/// env.push_frame();
/// env.define("x", Value::Int(10)); // Shadows outer x
/// assert_eq!(env.get("x"), Some(Value::Int(10)));
///
/// env.pop_frame();
/// assert_eq!(env.get("x"), Some(Value::Int(1)));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    /// All bindings in a flat array (most recent at end)
    bindings: Vec<Binding>,

    /// Frame boundaries (indices into bindings)
    frames: Vec<usize>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            frames: vec![0], // global scope
        }
    }

    /// Create an environment pre-populated with bindings.
    pub fn with_vars<K: Into<String>>(vars: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut env = Self::new();
        for (name, value) in vars {
            env.define(name, value);
        }
        env
    }

    // ═══════════════════════════════════════════════════════════════════
    // Frame Management
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a new scope.
    pub fn push_frame(&mut self) {
        self.frames.push(self.bindings.len());
    }

    /// Exit the current scope, dropping the bindings it defined.
    ///
    /// Does nothing at global scope.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            if let Some(boundary) = self.frames.pop() {
                self.bindings.truncate(boundary);
            }
        }
    }

    /// Get the current scope depth (number of frames).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Definition and Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Define a binding in the current scope, shadowing any outer one.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.push(Binding {
            name: name.into(),
            value,
            read_only: false,
        });
    }

    /// Define a binding expressions cannot assign to.
    pub fn define_read_only(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.push(Binding {
            name: name.into(),
            value,
            read_only: true,
        });
    }

    /// Look up the innermost binding by name.
    pub fn get_binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().rev().find(|b| b.name == name)
    }

    /// Assign to an existing binding.
    ///
    /// # Errors
    ///
    /// - `UndefinedVariable` if the binding doesn't exist
    /// - `ReadOnly` if the binding was defined read-only
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), ContextError> {
        match self.bindings.iter_mut().rev().find(|b| b.name == name) {
            Some(binding) if binding.read_only => Err(ContextError::ReadOnly {
                name: name.to_string(),
            }),
            Some(binding) => {
                binding.value = value;
                Ok(())
            }
            None => Err(ContextError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    /// Iterate over all bindings, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Context for Environment {
    fn get(&self, name: &str) -> Option<Value> {
        self.get_binding(name).map(|b| b.value.clone())
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), ContextError> {
        match self.assign(name, value.clone()) {
            Err(ContextError::UndefinedVariable { .. }) => {
                self.define(name, value);
                Ok(())
            }
            other => other,
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.get_binding(name).is_some()
    }

    fn enter_scope(&mut self) {
        self.push_frame();
    }

    fn exit_scope(&mut self) {
        self.pop_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_defines_unbound_name() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1)).unwrap();
        assert_eq!(env.get("x"), Some(Value::Int(1)));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_set_updates_innermost() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1));
        env.push_frame();
        env.define("x", Value::Int(2));
        env.set("x", Value::Int(3)).unwrap();
        env.pop_frame();
        assert_eq!(env.get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_read_only_rejects_assignment() {
        let mut env = Environment::new();
        env.define_read_only("pi", Value::Float(2.5));
        let err = env.set("pi", Value::Int(3)).unwrap_err();
        assert_eq!(
            err,
            ContextError::ReadOnly {
                name: "pi".to_string()
            }
        );
    }

    #[test]
    fn test_assign_undefined() {
        let mut env = Environment::new();
        assert!(matches!(
            env.assign("nope", Value::Null),
            Err(ContextError::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn test_pop_global_frame_is_noop() {
        let mut env = Environment::with_vars([("a", Value::Bool(true))]);
        env.pop_frame();
        assert_eq!(env.depth(), 1);
        assert!(env.contains("a"));
    }
}
