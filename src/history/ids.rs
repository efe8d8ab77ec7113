use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Injected identifier generator, so tests can produce stable ids and
/// embedders can swap in their own scheme.
pub trait IdSource: Send + Sync {
    fn new_id(&self) -> String;
}

/// Default id source: random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Wall-clock milliseconds with a monotonic clamp: a value returned is
/// never smaller than any value returned before it, even if the system
/// clock steps backwards mid-session.
#[derive(Debug, Default)]
pub struct Clock {
    last: AtomicU64,
}

impl Clock {
    pub fn now_ms(&self) -> u64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last.fetch_max(wall, Ordering::SeqCst).max(wall)
    }
}

#[cfg(test)]
pub(crate) struct SeqIds {
    prefix: &'static str,
    next: AtomicU64,
}

#[cfg(test)]
impl SeqIds {
    pub(crate) fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }
}

#[cfg(test)]
impl IdSource for SeqIds {
    fn new_id(&self) -> String {
        format!("{}-{}", self.prefix, self.next.fetch_add(1, Ordering::SeqCst))
    }
}
