//! Context builder and typed accessors
//!
//! The context is the [`Case`] serialized to an order-preserving JSON tree with
//! every boolean turned into the string `"true"` or `"false"`. Renderers read
//! it through [`Node`], which tracks the dotted path of every lookup so a
//! missing key can be reported precisely.

use crate::case::Case;
use crate::error::{CompileError, Result};
use crate::template::format_number;
use serde_json::Value;

/// Build the normalized context for `case`
pub fn build_context(case: &Case) -> Result<Value> {
    let value = serde_json::to_value(case)?;
    Ok(normalize(value))
}

/// Recursively replace booleans by their string form
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Bool(b) => Value::String(if b { "true" } else { "false" }.to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

/// Borrowed view into the context with the path that led to it
#[derive(Debug, Clone)]
pub struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: "case".to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    fn child(&self, key: &str, value: &'a Value) -> Node<'a> {
        Node {
            value,
            path: format!("{}.{}", self.path, key),
        }
    }

    fn missing(&self, key: &str) -> CompileError {
        CompileError::schema(self.path.clone(), key)
    }

    /// Required child
    pub fn get(&self, key: &str) -> Result<Node<'a>> {
        match self.value.get(key) {
            Some(v) => Ok(self.child(key, v)),
            None => Err(self.missing(key)),
        }
    }

    /// Optional child; absent and `null` are both `None`
    pub fn opt(&self, key: &str) -> Option<Node<'a>> {
        match self.value.get(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(self.child(key, v)),
        }
    }

    /// Leaf value in its canonical string form
    pub fn str(&self, key: &str) -> Result<String> {
        self.get(key)?.as_string()
    }

    /// Optional leaf in canonical string form
    pub fn opt_str(&self, key: &str) -> Result<Option<String>> {
        self.opt(key).map(|n| n.as_string()).transpose()
    }

    pub fn as_string(&self) -> Result<String> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(match n.as_f64() {
                Some(f) if n.is_f64() => format_number(f),
                _ => n.to_string(),
            }),
            _ => Err(CompileError::schema(self.path.clone(), "<scalar>")),
        }
    }

    pub fn f64(&self, key: &str) -> Result<f64> {
        self.get(key)?.as_f64()
    }

    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>> {
        self.opt(key).map(|n| n.as_f64()).transpose()
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self.value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| CompileError::schema(self.path.clone(), "<number>"))
    }

    /// Normalized boolean leaf (`"true"` / `"false"`)
    pub fn flag(&self, key: &str) -> Result<bool> {
        let node = self.get(key)?;
        match node.value {
            Value::String(s) if s == "true" => Ok(true),
            Value::String(s) if s == "false" => Ok(false),
            _ => Err(CompileError::schema(node.path, "<flag>")),
        }
    }

    /// Feature switch: only an explicit `enabled == "false"` disables
    pub fn enabled(&self) -> Result<bool> {
        Ok(self.str("enabled")? != "false")
    }

    /// Variant tag of an internally tagged enum
    pub fn tag(&self) -> Result<String> {
        self.str("type")
    }

    pub fn seq(&self, key: &str) -> Result<Vec<Node<'a>>> {
        let node = self.get(key)?;
        node.items()
    }

    pub fn items(&self) -> Result<Vec<Node<'a>>> {
        match self.value {
            Value::Array(items) => Ok(items
                .iter()
                .enumerate()
                .map(|(i, v)| Node {
                    value: v,
                    path: format!("{}[{}]", self.path, i),
                })
                .collect()),
            _ => Err(CompileError::schema(self.path.clone(), "<sequence>")),
        }
    }

    /// Entries of a map child in stored order
    pub fn entries(&self, key: &str) -> Result<Vec<(String, Node<'a>)>> {
        self.get(key)?.members()
    }

    /// This node's own map entries in stored order
    pub fn members(&self) -> Result<Vec<(String, Node<'a>)>> {
        match self.value {
            Value::Object(map) => Ok(map
                .iter()
                .map(|(k, v)| (k.clone(), self.child(k, v)))
                .collect()),
            _ => Err(CompileError::schema(self.path.clone(), "<map>")),
        }
    }

    /// Three-component vector leaf
    pub fn point(&self, key: &str) -> Result<[f64; 3]> {
        let items = self.seq(key)?;
        if items.len() != 3 {
            return Err(CompileError::schema(format!("{}.{}", self.path, key), "<3 components>"));
        }
        Ok([items[0].as_f64()?, items[1].as_f64()?, items[2].as_f64()?])
    }

    pub fn opt_point(&self, key: &str) -> Result<Option<[f64; 3]>> {
        match self.opt(key) {
            Some(_) => self.point(key).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_booleans_recursively() {
        let v = normalize(json!({
            "enabled": true,
            "list": [false, {"inner": true}],
            "n": 3
        }));
        assert_eq!(v["enabled"], json!("true"));
        assert_eq!(v["list"][0], json!("false"));
        assert_eq!(v["list"][1]["inner"], json!("true"));
        assert_eq!(v["n"], json!(3));
    }

    #[test]
    fn test_missing_key_reports_path() {
        let v = json!({"objects": [{"mk": 1}]});
        let root = Node::root(&v);
        let objects = root.seq("objects").unwrap();
        let err = objects[0].str("label").unwrap_err();
        match err {
            CompileError::SchemaMismatch { scope, key } => {
                assert_eq!(scope, "case.objects[0]");
                assert_eq!(key, "label");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_leaf_forms() {
        let v = normalize(json!({"a": 2, "b": 2.5, "c": 1000.0, "d": true, "p": [1, 2.0, 3]}));
        let root = Node::root(&v);
        assert_eq!(root.str("a").unwrap(), "2");
        assert_eq!(root.str("b").unwrap(), "2.5");
        assert_eq!(root.str("c").unwrap(), "1000.0");
        assert!(root.flag("d").unwrap());
        assert_eq!(root.point("p").unwrap(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_enabled_only_false_disables() {
        let on = normalize(json!({"enabled": true}));
        let off = normalize(json!({"enabled": false}));
        assert!(Node::root(&on).enabled().unwrap());
        assert!(!Node::root(&off).enabled().unwrap());
        let missing = json!({});
        assert!(Node::root(&missing).enabled().is_err());
    }
}
