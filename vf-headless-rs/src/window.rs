//! `window`: an empty property bag the rendering library may read or extend.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    properties: Map<String, Value>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.properties.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.properties.clone())
    }
}
