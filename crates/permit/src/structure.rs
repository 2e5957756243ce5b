//! Named, ordered field store held by a token

use std::fmt;

use indexmap::IndexMap;

use crate::error::StructureError;
use crate::value::Value;

/// A named collection of typed fields.
///
/// Uses IndexMap to preserve insertion order, so iteration and display
/// are predictable across duplicates of the same token.
///
/// # Example
///
/// ```
/// use permit::{Structure, Value};
///
/// let mut s = Structure::new_empty("Token");
/// s.set("role", Value::from("admin")).unwrap();
///
/// assert_eq!(s.get_string("role"), Ok(Some("admin")));
/// assert_eq!(s.get("missing"), None);
/// ```
#[derive(Clone, PartialEq)]
pub struct Structure {
    name: String,
    fields: IndexMap<String, Value>,
}

impl Structure {
    /// Create an empty structure with the given name.
    pub fn new_empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// The structure's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the structure.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Check if a field exists and holds a value of exactly the named type
    /// (see [`Value::type_name`]).
    ///
    /// No widening is applied: an `I32` field is not reported as `"i64"`
    /// even though [`get_i64`](Self::get_i64) reads it.
    pub fn has_field_typed(&self, name: &str, type_name: &str) -> bool {
        self.get(name).is_some_and(|v| v.type_name() == type_name)
    }

    /// Get a string field.
    ///
    /// Returns `Ok(None)` if the field is absent and `TypeMismatch` if it
    /// holds another type.
    pub fn get_string(&self, name: &str) -> Result<Option<&str>, StructureError> {
        self.get_typed(name, "String", Value::as_str)
    }

    /// Get a boolean field.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, StructureError> {
        self.get_typed(name, "bool", Value::as_bool)
    }

    /// Get an integer field as i64 (widening from narrower integer types).
    ///
    /// An integer that does not fit, such as a `U64` above `i64::MAX`,
    /// yields `OutOfRange` rather than `TypeMismatch`.
    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, StructureError> {
        self.get_integer(name, "i64", Value::as_i64)
    }

    /// Get a non-negative integer field as u64.
    ///
    /// A negative integer yields `OutOfRange`.
    pub fn get_u64(&self, name: &str) -> Result<Option<u64>, StructureError> {
        self.get_integer(name, "u64", Value::as_u64)
    }

    /// Get a float field.
    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, StructureError> {
        self.get_typed(name, "f64", Value::as_f64)
    }

    fn get_integer<T>(
        &self,
        name: &str,
        expected: &'static str,
        extract: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<Option<T>, StructureError> {
        match self.get(name) {
            Some(value) if value.is_integer() => match extract(value) {
                Some(n) => Ok(Some(n)),
                None => Err(StructureError::OutOfRange {
                    field: name.to_string(),
                    expected,
                    value: format!("{}", value),
                }),
            },
            _ => self.get_typed(name, expected, extract),
        }
    }

    fn get_typed<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, StructureError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => match extract(value) {
                Some(v) => Ok(Some(v)),
                None => Err(StructureError::TypeMismatch {
                    field: name.to_string(),
                    expected,
                    got: value.type_name(),
                }),
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Mutation
    // ═══════════════════════════════════════════════════════════════════

    /// Set a field, returning the previous value if there was one.
    ///
    /// Replacing a field keeps its original position.
    ///
    /// # Errors
    ///
    /// - `InvalidFieldName` if `name` is empty
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, StructureError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StructureError::InvalidFieldName(name));
        }
        Ok(self.fields.insert(name, value.into()))
    }

    /// Add a field (builder pattern).
    ///
    /// # Errors
    ///
    /// - `InvalidFieldName` if `name` is empty
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, StructureError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Remove a field, returning its value.
    ///
    /// Remaining fields keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    /// Remove all fields. The name is kept.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All field names in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the structure has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Structure {
    /// Pairs with an empty name are skipped.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            let name = name.into();
            if !name.is_empty() {
                self.fields.insert(name, value.into());
            }
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (k, v) in &self.fields {
            write!(f, ", {}={:?}", k, v)?;
        }
        write!(f, ";")
    }
}

impl fmt::Debug for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_empty() {
        let s = Structure::new_empty("Token");
        assert_eq!(s.name(), "Token");
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut s = Structure::new_empty("Token");
        assert_eq!(s.set("role", "user"), Ok(None));
        assert_eq!(s.set("role", "admin"), Ok(Some(Value::from("user"))));
        assert_eq!(s.get("role"), Some(&Value::from("admin")));
    }

    #[test]
    fn test_set_empty_name_rejected() {
        let mut s = Structure::new_empty("Token");
        assert_eq!(
            s.set("", true),
            Err(StructureError::InvalidFieldName(String::new()))
        );
        assert!(s.is_empty());
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut s = Structure::new_empty("Token")
            .with_field("a", 1i64)
            .and_then(|s| s.with_field("b", 2i64))
            .unwrap();
        s.set("a", 10i64).unwrap();
        assert_eq!(s.field_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut s = Structure::new_empty("Token");
        s.extend([("a", 1i64), ("b", 2i64), ("c", 3i64)]);
        assert_eq!(s.remove("b"), Some(Value::I64(2)));
        assert_eq!(s.remove("b"), None);
        assert_eq!(s.field_names(), vec!["a", "c"]);
    }

    #[test]
    fn test_typed_getters() {
        let mut s = Structure::new_empty("Token");
        s.set("user", "alice").unwrap();
        s.set("admin", true).unwrap();
        s.set("uid", 1000u32).unwrap();
        s.set("score", 0.5f64).unwrap();

        assert_eq!(s.get_string("user"), Ok(Some("alice")));
        assert_eq!(s.get_bool("admin"), Ok(Some(true)));
        assert_eq!(s.get_i64("uid"), Ok(Some(1000)));
        assert_eq!(s.get_u64("uid"), Ok(Some(1000)));
        assert_eq!(s.get_f64("score"), Ok(Some(0.5)));
        assert_eq!(s.get_string("missing"), Ok(None));
    }

    #[test]
    fn test_typed_getter_mismatch() {
        let mut s = Structure::new_empty("Token");
        s.set("admin", true).unwrap();
        assert_eq!(
            s.get_string("admin"),
            Err(StructureError::TypeMismatch {
                field: "admin".to_string(),
                expected: "String",
                got: "bool",
            })
        );
    }

    #[test]
    fn test_has_field_typed() {
        let mut s = Structure::new_empty("Token");
        s.set("role", "admin").unwrap();
        assert!(s.has_field("role"));
        assert!(s.has_field_typed("role", "String"));
        assert!(!s.has_field_typed("role", "bool"));
        assert!(!s.has_field_typed("missing", "String"));
    }

    #[test]
    fn test_set_name() {
        let mut s = Structure::new_empty("Token");
        s.set("role", "admin").unwrap();
        s.set_name("Session");
        assert_eq!(s.name(), "Session");
        assert_eq!(s.to_string(), "Session, role=\"admin\";");
    }

    #[test]
    fn test_integer_out_of_range() {
        let mut s = Structure::new_empty("Token");
        s.set("big", u64::MAX).unwrap();
        s.set("quota", -5i64).unwrap();

        assert_eq!(
            s.get_i64("big"),
            Err(StructureError::OutOfRange {
                field: "big".to_string(),
                expected: "i64",
                value: "18446744073709551615u64".to_string(),
            })
        );
        assert_eq!(
            s.get_u64("quota"),
            Err(StructureError::OutOfRange {
                field: "quota".to_string(),
                expected: "u64",
                value: "-5".to_string(),
            })
        );
        assert_eq!(s.get_u64("big"), Ok(Some(u64::MAX)));
    }

    #[test]
    fn test_integer_getter_on_non_integer() {
        let mut s = Structure::new_empty("Token");
        s.set("role", "admin").unwrap();
        assert_eq!(
            s.get_i64("role"),
            Err(StructureError::TypeMismatch {
                field: "role".to_string(),
                expected: "i64",
                got: "String",
            })
        );
    }

    #[test]
    fn test_has_field_typed_is_exact() {
        let mut s = Structure::new_empty("Token");
        s.set("uid", 7i32).unwrap();
        assert_eq!(s.get_i64("uid"), Ok(Some(7)));
        assert!(s.has_field_typed("uid", "i32"));
        assert!(!s.has_field_typed("uid", "i64"));
    }

    #[test]
    fn test_clear_keeps_name() {
        let mut s = Structure::new_empty("Token");
        s.set("role", "admin").unwrap();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.name(), "Token");
    }

    #[test]
    fn test_extend_skips_empty_names() {
        let mut s = Structure::new_empty("Token");
        s.extend([("", "x"), ("role", "admin")]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_display() {
        let mut s = Structure::new_empty("Token");
        assert_eq!(s.to_string(), "Token;");
        s.set("role", "admin").unwrap();
        s.set("allowed", true).unwrap();
        assert_eq!(s.to_string(), "Token, role=\"admin\", allowed=true;");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = Structure::new_empty("Token");
        a.set("role", "user").unwrap();
        let mut b = a.clone();
        b.set("role", "admin").unwrap();
        assert_eq!(a.get_string("role"), Ok(Some("user")));
        assert_eq!(b.get_string("role"), Ok(Some("admin")));
    }
}
