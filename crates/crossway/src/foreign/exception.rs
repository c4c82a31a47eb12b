//! Foreign exceptions

use std::fmt;

use super::{ForeignValue, SlotBusy};

/// An exception raised inside the foreign runtime.
#[derive(Debug, Clone)]
pub struct ForeignException {
    /// Foreign exception class name
    pub class_name: String,

    /// The thrown value: a message string or an exception object
    pub payload: ForeignValue,
}

impl ForeignException {
    /// The dedicated foreign-side class for failures raised by host code.
    pub const HOST_EXCEPTION_CLASS: &'static str = "HostException";

    /// Create an exception with an arbitrary payload.
    pub fn new(class_name: impl Into<String>, payload: ForeignValue) -> Self {
        Self {
            class_name: class_name.into(),
            payload,
        }
    }

    /// Create an exception carrying a message string.
    pub fn with_message(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(class_name, ForeignValue::string(message))
    }

    /// Wrap a failure that originated in host code.
    pub fn from_host(payload: ForeignValue) -> Self {
        Self::new(Self::HOST_EXCEPTION_CLASS, payload)
    }

    /// Check if this exception wraps a host failure
    pub fn is_host_exception(&self) -> bool {
        self.class_name == Self::HOST_EXCEPTION_CLASS
    }

    /// The exception's message.
    ///
    /// String payloads are the message; object payloads are asked for
    /// their visible `message` property.
    pub fn message(&self) -> String {
        match &self.payload {
            ForeignValue::Object(object) => object
                .property("message")
                .map(|m| m.to_string())
                .unwrap_or_default(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ForeignException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class_name, self.message())
    }
}

impl std::error::Error for ForeignException {}

impl From<SlotBusy> for ForeignException {
    fn from(busy: SlotBusy) -> Self {
        ForeignException::with_message("Error", busy.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_payload_is_message() {
        let exception = ForeignException::with_message("Exception", "boom");
        assert_eq!(exception.message(), "boom");
        assert_eq!(exception.to_string(), "Exception: boom");
        assert!(!exception.is_host_exception());
    }

    #[test]
    fn test_from_host_uses_dedicated_class() {
        let exception = ForeignException::from_host(ForeignValue::string("bad"));
        assert!(exception.is_host_exception());
        assert_eq!(exception.class_name, "HostException");
    }
}
