//! The keybinding domain entity: parsing, validation, id/hash derivation.

pub mod error;
pub mod grammar;
pub mod model;

#[cfg(test)]
mod tests;

pub use error::GrammarError;
pub use model::{Keybinding, Mode, RawKeybinding};

use std::collections::BTreeMap;

use crate::hashing;

/// The outcome of [`parse`]: either a validated [`Keybinding`], or a
/// reason it was rejected (spec.md §4.4: `Parse(raw) -> Keybinding | Invalid`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The record validated successfully.
    Valid(Keybinding),
    /// The record was rejected; no I/O was performed.
    Invalid(String),
}

/// Parses and validates a raw (deserialized) keybinding record.
///
/// - `keys` and `command` are required.
/// - `mode` defaults to `"n"` when absent.
/// - `id` is generated from `(keys, command, mode, plugin)` when absent.
/// - records with an empty `keys`/`command`, an unknown `mode`, or a
///   key-grammar violation are rejected (spec.md §8 "Validation").
pub fn parse(raw: RawKeybinding) -> ParseOutcome {
    if raw.keys.trim().is_empty() {
        return ParseOutcome::Invalid("keys must not be empty".to_string());
    }
    if raw.command.trim().is_empty() {
        return ParseOutcome::Invalid("command must not be empty".to_string());
    }

    if let Err(e) = grammar::validate_keys(&raw.keys) {
        return ParseOutcome::Invalid(e.to_string());
    }

    let mode_str = raw.mode.clone().unwrap_or_else(|| "n".to_string());
    let mode = match Mode::parse(&mode_str) {
        Some(mode) => mode,
        None => return ParseOutcome::Invalid(format!("unknown mode: {mode_str}")),
    };

    let metadata: BTreeMap<String, String> = raw.metadata.unwrap_or_default();

    let id = raw.id.unwrap_or_else(|| {
        hashing::derive_id(&raw.keys, &raw.command, mode.as_str(), raw.plugin.as_deref())
    });

    ParseOutcome::Valid(Keybinding {
        id,
        keys: raw.keys,
        command: raw.command,
        description: raw.description,
        mode,
        plugin: raw.plugin,
        metadata,
    })
}

/// Derives the stable id of an already-parsed keybinding (spec.md §4.4 `Id`).
pub fn id_of(kb: &Keybinding) -> String {
    hashing::derive_id(&kb.keys, &kb.command, kb.mode.as_str(), kb.plugin.as_deref())
}

/// Computes the content hash of an already-parsed keybinding (spec.md §4.4 `Hash`).
pub fn hash_of(kb: &Keybinding) -> String {
    hashing::content_hash(
        &kb.keys,
        &kb.command,
        kb.description.as_deref(),
        kb.mode.as_str(),
        kb.plugin.as_deref(),
        &kb.metadata,
    )
}
