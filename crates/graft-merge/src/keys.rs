//! Generation of fresh identifiers for engine-created records.
//!
//! Loot keys and forced-spawn template keys must be unique within a run and
//! across runs, so the default generator uses time-ordered UUID v7 values in
//! upper-case simple form. Created slots get 24-character hex ids like the
//! host's own records. Tests substitute [`SequentialKeys`] for stable output.

use std::fmt::Write;

use rand::Rng;
use uuid::Uuid;

/// Source of fresh identifiers.
pub trait KeyGenerator {
    /// A key for a loot entry, forced-spawn root or trader stock entry.
    fn key(&mut self) -> String;

    /// An id for a created slot.
    fn slot_id(&mut self) -> String;
}

/// Time-ordered random keys (UUID v7) and random 12-byte hex slot ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOrderedKeys;

impl KeyGenerator for TimeOrderedKeys {
    fn key(&mut self) -> String {
        Uuid::now_v7().simple().to_string().to_uppercase()
    }

    fn slot_id(&mut self) -> String {
        let mut bytes = [0_u8; 12];
        rand::rng().fill(&mut bytes);
        bytes.iter().fold(String::with_capacity(24), |mut hex, b| {
            let _ = write!(hex, "{b:02x}");
            hex
        })
    }
}

/// Deterministic keys (`KEY000001`, `KEY000002`, ...) for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct SequentialKeys {
    next: u64,
}

impl SequentialKeys {
    /// Start a fresh sequence.
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    fn advance(&mut self) -> u64 {
        self.next = self.next.saturating_add(1);
        self.next
    }
}

impl KeyGenerator for SequentialKeys {
    fn key(&mut self) -> String {
        format!("KEY{:06}", self.advance())
    }

    fn slot_id(&mut self) -> String {
        format!("{:024x}", self.advance())
    }
}
