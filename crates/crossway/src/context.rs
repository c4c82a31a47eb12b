//! Bridge configuration

/// Limits shared by every adapter created from one [`Bridge`].
///
/// [`Bridge`]: crate::Bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Maximum nesting of cross-runtime calls (host -> foreign -> host ...)
    pub max_call_depth: usize,

    /// Maximum container nesting the value converter will walk
    pub max_conversion_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            max_conversion_depth: 512,
        }
    }
}

impl BridgeConfig {
    /// Create a configuration with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cross-runtime call depth limit.
    pub fn with_max_call_depth(mut self, max_depth: usize) -> Self {
        self.max_call_depth = max_depth;
        self
    }

    /// Set the conversion nesting limit.
    pub fn with_max_conversion_depth(mut self, max_depth: usize) -> Self {
        self.max_conversion_depth = max_depth;
        self
    }
}
