//! Reflective property and method resolution against runtime values
//!
//! Concrete node kinds that read `a.b`, write `a.b = v` or call
//! `a.m(args)` do not know the shape of `a` ahead of time. They ask the
//! [`Introspector`] of the parser that built them, which they reach through
//! [`NodeRef::introspector`](crate::NodeRef::introspector).

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{type_name, EvalError};
use crate::value::Value;

/// Resolves dynamic member references against runtime values.
///
/// Implementations must be shareable across threads: one resolver serves
/// every tree its parser built, and trees may be evaluated concurrently.
pub trait Introspector: Send + Sync {
    /// Read property `name` of `target`.
    fn property(&self, target: &Value, name: &str) -> Result<Value, EvalError>;

    /// Write property `name` of `target` in place.
    fn set_property(&self, target: &mut Value, name: &str, value: Value) -> Result<(), EvalError>;

    /// Call method `name` on `target`.
    fn invoke(&self, target: &Value, name: &str, args: &[Value]) -> Result<Value, EvalError>;
}

/// Built-in members understood by [`BasicIntrospector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Size,
    IsEmpty,
    Get,
    Contains,
    ContainsKey,
    ToUpperCase,
    ToLowerCase,
    Trim,
}

impl Method {
    fn arity(self) -> usize {
        match self {
            Method::Get | Method::Contains | Method::ContainsKey => 1,
            _ => 0,
        }
    }
}

/// Resolver for the crate's own [`Value`] model.
///
/// - properties: map keys (missing keys read as null), object fields,
///   and list elements addressed by decimal index
/// - methods: `size`/`length`, `isEmpty`, `get`, `contains`,
///   `containsKey`, and on strings `toUpperCase`, `toLowerCase`, `trim`
///
/// Successful method lookups are cached per (receiver type, name). Misses
/// are not, so the cache never holds more than one entry per built-in
/// member of each receiver type, whatever names scripts ask for.
#[derive(Debug, Default)]
pub struct BasicIntrospector {
    methods: DashMap<(String, String), Method>,
}

impl BasicIntrospector {
    /// Create a resolver with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver ready to hand to a [`Parser`](crate::Parser).
    pub fn shared() -> Arc<dyn Introspector> {
        Arc::new(Self::new())
    }

    /// Number of cached method resolutions
    pub fn cache_len(&self) -> usize {
        self.methods.len()
    }

    fn resolve_method(&self, target: &Value, name: &str) -> Option<Method> {
        let key = (type_name(target).to_string(), name.to_string());
        if let Some(hit) = self.methods.get(&key) {
            return Some(*hit);
        }

        let method = lookup_method(target, name);
        debug!(receiver = %key.0, member = name, found = method.is_some(), "resolved method");
        if let Some(method) = method {
            self.methods.insert(key, method);
        }
        method
    }
}

fn lookup_method(target: &Value, name: &str) -> Option<Method> {
    let method = match name {
        "size" | "length" => Method::Size,
        "isEmpty" => Method::IsEmpty,
        "get" => Method::Get,
        "contains" => Method::Contains,
        "containsKey" => Method::ContainsKey,
        "toUpperCase" => Method::ToUpperCase,
        "toLowerCase" => Method::ToLowerCase,
        "trim" => Method::Trim,
        _ => return None,
    };

    let supported = match target {
        Value::String(_) => !matches!(method, Method::Get | Method::ContainsKey),
        Value::List(_) => !matches!(
            method,
            Method::ContainsKey | Method::ToUpperCase | Method::ToLowerCase | Method::Trim
        ),
        Value::Map(_) => matches!(
            method,
            Method::Size | Method::IsEmpty | Method::Get | Method::ContainsKey
        ),
        _ => false,
    };
    supported.then_some(method)
}

fn list_index(name: &str) -> Option<usize> {
    name.parse().ok()
}

impl Introspector for BasicIntrospector {
    fn property(&self, target: &Value, name: &str) -> Result<Value, EvalError> {
        let found = match target {
            Value::Map(entries) => Some(entries.get(name).cloned().unwrap_or_default()),
            Value::Object(obj) => obj.get(name).cloned(),
            Value::List(items) => {
                list_index(name).map(|i| items.get(i).cloned().unwrap_or_default())
            }
            _ => None,
        };

        found.ok_or_else(|| EvalError::UnknownProperty {
            name: name.to_string(),
            type_name: type_name(target).to_string(),
        })
    }

    fn set_property(&self, target: &mut Value, name: &str, value: Value) -> Result<(), EvalError> {
        match target {
            Value::Map(entries) => {
                Arc::make_mut(entries).insert(name.to_string(), value);
                Ok(())
            }
            Value::Object(obj) => {
                Arc::make_mut(obj).set(name, value);
                Ok(())
            }
            Value::List(items) => match list_index(name) {
                Some(i) if i < items.len() => {
                    Arc::make_mut(items)[i] = value;
                    Ok(())
                }
                _ => Err(EvalError::UnknownProperty {
                    name: name.to_string(),
                    type_name: "list".to_string(),
                }),
            },
            other => Err(EvalError::UnknownProperty {
                name: name.to_string(),
                type_name: type_name(other).to_string(),
            }),
        }
    }

    fn invoke(&self, target: &Value, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let method = self
            .resolve_method(target, name)
            .ok_or_else(|| EvalError::UnknownMethod {
                name: name.to_string(),
                type_name: type_name(target).to_string(),
            })?;

        if args.len() != method.arity() {
            return Err(EvalError::ArityMismatch {
                name: name.to_string(),
                expected: method.arity(),
                got: args.len(),
            });
        }

        call_method(method, target, args)
    }
}

fn call_method(method: Method, target: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let value = match (method, target) {
        (Method::Size, Value::String(s)) => Value::Int(s.chars().count() as i64),
        (Method::Size, Value::List(items)) => Value::Int(items.len() as i64),
        (Method::Size, Value::Map(entries)) => Value::Int(entries.len() as i64),

        (Method::IsEmpty, Value::String(s)) => Value::Bool(s.is_empty()),
        (Method::IsEmpty, Value::List(items)) => Value::Bool(items.is_empty()),
        (Method::IsEmpty, Value::Map(entries)) => Value::Bool(entries.is_empty()),

        (Method::Get, Value::List(items)) => {
            let index = args[0]
                .as_i64()
                .ok_or_else(|| EvalError::type_error("integer", &args[0]))?;
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or_default()
        }
        (Method::Get, Value::Map(entries)) => {
            let key = args[0]
                .as_str()
                .ok_or_else(|| EvalError::type_error("string", &args[0]))?;
            entries.get(key).cloned().unwrap_or_default()
        }

        (Method::Contains, Value::List(items)) => Value::Bool(items.contains(&args[0])),
        (Method::Contains, Value::String(s)) => {
            let needle = args[0]
                .as_str()
                .ok_or_else(|| EvalError::type_error("string", &args[0]))?;
            Value::Bool(s.contains(needle))
        }
        (Method::ContainsKey, Value::Map(entries)) => {
            let key = args[0]
                .as_str()
                .ok_or_else(|| EvalError::type_error("string", &args[0]))?;
            Value::Bool(entries.contains_key(key))
        }

        (Method::ToUpperCase, Value::String(s)) => Value::string(s.to_uppercase()),
        (Method::ToLowerCase, Value::String(s)) => Value::string(s.to_lowercase()),
        (Method::Trim, Value::String(s)) => Value::string(s.trim()),

        // lookup_method only admits the pairs above
        (_, other) => return Err(EvalError::type_error("string, list or map", other)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectValue;

    #[test]
    fn test_map_property_missing_key_is_null() {
        let intro = BasicIntrospector::new();
        let map = Value::map([("a", Value::Int(1))]);
        assert_eq!(intro.property(&map, "a").unwrap(), Value::Int(1));
        assert_eq!(intro.property(&map, "b").unwrap(), Value::Null);
    }

    #[test]
    fn test_object_property_missing_field_fails() {
        let intro = BasicIntrospector::new();
        let obj = Value::object(ObjectValue::new("Customer").with_field("id", Value::Int(9)));
        assert_eq!(intro.property(&obj, "id").unwrap(), Value::Int(9));
        let err = intro.property(&obj, "email").unwrap_err();
        assert_eq!(err.to_string(), "unknown property `email` on Customer");
    }

    #[test]
    fn test_list_property_by_index() {
        let intro = BasicIntrospector::new();
        let list = Value::list(vec![Value::Int(4), Value::Int(5)]);
        assert_eq!(intro.property(&list, "1").unwrap(), Value::Int(5));
        assert_eq!(intro.property(&list, "7").unwrap(), Value::Null);
        assert!(intro.property(&list, "first").is_err());
    }

    #[test]
    fn test_set_property_copies_on_write() {
        let intro = BasicIntrospector::new();
        let original = Value::map([("a", Value::Int(1))]);
        let mut target = original.clone();
        intro.set_property(&mut target, "a", Value::Int(2)).unwrap();
        assert_eq!(intro.property(&target, "a").unwrap(), Value::Int(2));
        assert_eq!(intro.property(&original, "a").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_set_property_on_scalar_fails() {
        let intro = BasicIntrospector::new();
        let mut target = Value::Int(1);
        assert!(matches!(
            intro.set_property(&mut target, "x", Value::Null),
            Err(EvalError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_invoke_builtin_methods() {
        let intro = BasicIntrospector::new();
        let s = Value::string(" Hello ");
        assert_eq!(intro.invoke(&s, "length", &[]).unwrap(), Value::Int(7));
        assert_eq!(intro.invoke(&s, "trim", &[]).unwrap(), Value::string("Hello"));

        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(intro.invoke(&list, "size", &[]).unwrap(), Value::Int(2));
        assert_eq!(
            intro.invoke(&list, "contains", &[Value::Int(2)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            intro.invoke(&list, "get", &[Value::Int(0)]).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn test_invoke_arity_and_unknown() {
        let intro = BasicIntrospector::new();
        let map = Value::map([("k", Value::Null)]);
        assert!(matches!(
            intro.invoke(&map, "get", &[]),
            Err(EvalError::ArityMismatch { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            intro.invoke(&map, "toUpperCase", &[]),
            Err(EvalError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn test_method_cache_keeps_only_resolved_members() {
        let intro = BasicIntrospector::new();
        let s = Value::string("x");
        intro.invoke(&s, "size", &[]).unwrap();
        intro.invoke(&s, "size", &[]).unwrap();
        assert_eq!(intro.cache_len(), 1);

        for i in 0..50 {
            let _ = intro.invoke(&s, &format!("member{i}"), &[]);
            let obj = Value::object(ObjectValue::new(format!("Host{i}")));
            let _ = intro.invoke(&obj, "size", &[]);
        }
        assert_eq!(intro.cache_len(), 1);
        assert_eq!(intro.invoke(&s, "size", &[]).unwrap(), Value::Int(1));
    }
}
