//! Identifier generators for registry entries, pickles and test plans.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use crate::config::{self, IdGeneratorKind};

/// Source of unique string identifiers.
///
/// One generator is shared by a builder, a pickle compilation and a plan
/// assembly when ids must be unique across all of them.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Issue the next identifier.
    fn new_id(&self) -> String;
}

/// Deterministic generator issuing `"0"`, `"1"`, `"2"`, ...
///
/// The counter is atomic, but sharing one instance across concurrent
/// operations makes the interleaving of ids nondeterministic.
///
/// # Examples
/// ```
/// use cukeplan::ids::{IdGenerator, IncrementingIdGenerator};
/// let ids = IncrementingIdGenerator::new();
/// assert_eq!(ids.new_id(), "0");
/// assert_eq!(ids.new_id(), "1");
/// ```
#[derive(Debug, Default)]
pub struct IncrementingIdGenerator {
    next: AtomicUsize,
}

impl IncrementingIdGenerator {
    /// Start counting from zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for IncrementingIdGenerator {
    fn new_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Random version 4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// The generator selected by [`config::id_generator_kind`].
#[must_use]
pub fn default_generator() -> Arc<dyn IdGenerator> {
    match config::id_generator_kind() {
        IdGeneratorKind::Uuid => Arc::new(UuidIdGenerator),
        IdGeneratorKind::Incrementing => Arc::new(IncrementingIdGenerator::new()),
    }
}
