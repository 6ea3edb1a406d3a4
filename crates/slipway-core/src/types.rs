//! Shared types used across Slipway crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a single cluster object.
///
/// Compared structurally; two refs are the same object iff kind, name,
/// and namespace all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

impl ResourceRef {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// A live pod as reported by the cluster port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    pub namespace: String,
    pub ready: bool,
    /// Whether this pod belongs to the new (canary) variant. Populated by
    /// the classifier; listings from the port leave it false.
    #[serde(default)]
    pub new_variant: bool,
}

impl Pod {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, ready: bool) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ready,
            new_variant: false,
        }
    }
}

/// Ordered set of `key=value` pairs rendered into the selector string
/// handed to the cluster port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    pairs: Vec<(String, String)>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `key=value` pair, preserving insertion order.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
