use chrono::{DateTime, Utc};

/// Time source injected into resolution and caching.
///
/// Tests substitute a fixed clock so TTL expiry and override activity windows
/// are deterministic instead of sleep-based.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
