//! Runtime configuration for cukeplan.
//!
//! The module exposes the choice of default identifier generator. The
//! `CUKEPLAN_ID_GENERATOR` environment variable selects it (`uuid` or
//! `incrementing`), and an in-process override takes precedence so test
//! suites can pin deterministic ids.

use std::sync::atomic::{AtomicU8, Ordering};

const ENV_ID_GENERATOR: &str = "CUKEPLAN_ID_GENERATOR";

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_UUID: u8 = 1;
const OVERRIDE_INCREMENTING: u8 = 2;

static ID_GENERATOR_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

/// Identifier strategy used when callers do not inject a generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdGeneratorKind {
    /// Random UUIDs.
    #[default]
    Uuid,
    /// A counter starting at zero.
    Incrementing,
}

fn parse_id_generator(value: &str) -> Option<IdGeneratorKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "uuid" | "random" => Some(IdGeneratorKind::Uuid),
        "incrementing" | "counter" | "sequential" => Some(IdGeneratorKind::Incrementing),
        _ => None,
    }
}

fn env_id_generator() -> Option<IdGeneratorKind> {
    let value = std::env::var(ENV_ID_GENERATOR).ok()?;
    let parsed = parse_id_generator(&value);
    if parsed.is_none() {
        log::warn!("ignoring unrecognised {ENV_ID_GENERATOR} value `{value}`");
    }
    parsed
}

fn override_state() -> Option<IdGeneratorKind> {
    match ID_GENERATOR_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_UUID => Some(IdGeneratorKind::Uuid),
        OVERRIDE_INCREMENTING => Some(IdGeneratorKind::Incrementing),
        _ => None,
    }
}

/// Determine which identifier generator to use by default.
#[must_use]
pub fn id_generator_kind() -> IdGeneratorKind {
    override_state()
        .or_else(env_id_generator)
        .unwrap_or_default()
}

/// Override the default identifier generator for the current process.
///
/// Call [`clear_id_generator_override`] to fall back to the environment.
pub fn set_id_generator_kind(kind: IdGeneratorKind) {
    let value = match kind {
        IdGeneratorKind::Uuid => OVERRIDE_UUID,
        IdGeneratorKind::Incrementing => OVERRIDE_INCREMENTING,
    };
    ID_GENERATOR_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override.
pub fn clear_id_generator_override() {
    ID_GENERATOR_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
