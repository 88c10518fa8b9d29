//! Runtime values produced and consumed by node evaluation

mod display;
mod impls;
mod object;

pub use object::ObjectValue;

use std::sync::Arc;

use indexmap::IndexMap;

/// A runtime value.
///
/// Scalars are stored inline; strings and containers are `Arc`-wrapped so
/// that cloning a value out of a binding context is cheap and values can be
/// shared by concurrent evaluations of the same tree.
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// Absent result; what every base evaluation default returns
    #[default]
    Null,

    /// `true` or `false`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Immutable string
    String(Arc<str>),

    /// Ordered list
    List(Arc<Vec<Value>>),

    /// String-keyed map, insertion ordered
    Map(Arc<IndexMap<String, Value>>),

    /// Host object with named fields, resolved through an introspector
    Object(Arc<ObjectValue>),
}
