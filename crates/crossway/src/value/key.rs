//! Dictionary keys

use std::fmt;
use std::rc::Rc;

use crate::foreign::ArrayKey;

use super::HostValue;

/// A host dict key.
///
/// Keys are restricted to the two kinds both runtimes can index by, so a
/// dict always converts to a foreign array without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostKey {
    /// Integer key
    Int(i64),

    /// String key
    Str(Rc<str>),
}

impl HostKey {
    /// Create a string key.
    pub fn string(s: impl Into<String>) -> Self {
        HostKey::Str(Rc::from(s.into()))
    }

    /// The key as a host value.
    pub fn to_value(&self) -> HostValue {
        match self {
            HostKey::Int(n) => HostValue::Int(*n),
            HostKey::Str(s) => HostValue::Str(Rc::clone(s)),
        }
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKey::Int(n) => write!(f, "{}", n),
            HostKey::Str(s) => write!(f, "{:?}", s.as_ref()),
        }
    }
}

impl From<i64> for HostKey {
    fn from(n: i64) -> Self {
        HostKey::Int(n)
    }
}

impl From<&str> for HostKey {
    fn from(s: &str) -> Self {
        HostKey::Str(Rc::from(s))
    }
}

impl From<String> for HostKey {
    fn from(s: String) -> Self {
        HostKey::string(s)
    }
}

impl From<&HostKey> for ArrayKey {
    fn from(key: &HostKey) -> Self {
        match key {
            HostKey::Int(n) => ArrayKey::Int(*n),
            HostKey::Str(s) => ArrayKey::normalize(s),
        }
    }
}

impl From<&ArrayKey> for HostKey {
    fn from(key: &ArrayKey) -> Self {
        match key {
            ArrayKey::Int(n) => HostKey::Int(*n),
            ArrayKey::Str(s) => HostKey::Str(Rc::clone(s)),
        }
    }
}
