//! Unique resource naming.
//!
//! Every generated mesh and material needs a name that never collides with
//! another page loaded at the same time. The generator is injected into the
//! loader so tests can start from a known value.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically increasing identifier source.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Take the next identifier.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Take the next identifier and format it behind `prefix`.
    pub fn unique_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id())
    }
}
