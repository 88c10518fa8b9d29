//! Host objects exposed to expressions

use indexmap::IndexMap;

use super::Value;

/// A host object: a type name plus ordered named fields.
///
/// Nodes never inspect these directly. Property reads and writes go
/// through an [`Introspector`](crate::Introspector), which is free to map
/// member names onto fields however it likes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    type_name: String,
    fields: IndexMap<String, Value>,
}

impl ObjectValue {
    /// Create an object with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// The object's type name (e.g. "Customer")
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Fields in definition order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_definition_order() {
        let obj = ObjectValue::new("Point")
            .with_field("y", Value::Int(2))
            .with_field("x", Value::Int(1));
        let names: Vec<_> = obj.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["y", "x"]);
    }

    #[test]
    fn test_set_replaces_field() {
        let mut obj = ObjectValue::new("Point").with_field("x", Value::Int(1));
        assert_eq!(obj.set("x", Value::Int(5)), Some(Value::Int(1)));
        assert_eq!(obj.get("x"), Some(&Value::Int(5)));
        assert_eq!(obj.set("z", Value::Null), None);
    }
}
