// Inputman InputId Type
// Opaque identifier for one physical or logical input

use std::borrow::Borrow;
use std::fmt;

/// Names a single input: a physical key code (`KeyD`), a logical key (`+`),
/// or a synthesized mouse button name (`Mouse1`).
///
/// This is a newtype wrapper around `String`. Equality is exact string
/// equality; no case folding or layout translation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct InputId(String);

impl InputId {
    /// Create an InputId from anything string-like
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the owned name
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for InputId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for InputId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&String> for InputId {
    fn from(name: &String) -> Self {
        Self(name.clone())
    }
}

impl Borrow<str> for InputId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InputId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for InputId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for InputId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
