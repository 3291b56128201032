//! Channel configuration for monitor communication

/// Channel buffer configuration
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Collector channel buffer size (workers -> monitor)
    pub collector_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            collector_buffer: 10_000,
        }
    }
}

impl ChannelConfig {
    /// Create a new channel config with a custom collector buffer size
    pub fn with_collector_buffer(mut self, size: usize) -> Self {
        self.collector_buffer = size.max(1);
        self
    }
}
