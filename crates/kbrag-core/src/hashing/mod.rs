//! Content hashing.
//!
//! Grounded in the teacher's `src/hashing/mod.rs` (BLAKE3-based hashing
//! of cache keys): the fields differ entirely — we hash the semantically
//! meaningful fields of a keybinding, not a tenant/context/embedding
//! tuple — but the "hash a canonical byte join, return a stable string"
//! shape is the same.

use std::collections::BTreeMap;

/// Computes the content hash of a keybinding's fields (spec.md §3):
/// `(keys|command|description|mode|plugin|sorted(metadata))`.
///
/// `metadata` is sorted by key first so that map-iteration order never
/// affects the hash (spec.md §3: "ordered-key-irrelevant mapping").
pub fn content_hash(
    keys: &str,
    command: &str,
    description: Option<&str>,
    mode: &str,
    plugin: Option<&str>,
    metadata: &BTreeMap<String, String>,
) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(keys.as_bytes());
    hasher.update(b"|");
    hasher.update(command.as_bytes());
    hasher.update(b"|");
    hasher.update(description.unwrap_or("").as_bytes());
    hasher.update(b"|");
    hasher.update(mode.as_bytes());
    hasher.update(b"|");
    hasher.update(plugin.unwrap_or("").as_bytes());
    hasher.update(b"|");
    for (k, v) in metadata {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b";");
    }
    hasher.finalize().to_hex().to_string()
}

/// Derives the stable `id` of a keybinding from `(keys, command, mode,
/// plugin)` (spec.md §3/§4.4): a *subset* of the fields that feed
/// [`content_hash`], so id-stable mutations (e.g. editing `description`)
/// still change the hash.
pub fn derive_id(keys: &str, command: &str, mode: &str, plugin: Option<&str>) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(keys.as_bytes());
    hasher.update(b"|");
    hasher.update(command.as_bytes());
    hasher.update(b"|");
    hasher.update(mode.as_bytes());
    hasher.update(b"|");
    hasher.update(plugin.unwrap_or("").as_bytes());
    let digest = hasher.finalize().to_hex().to_string();
    format!("kb_{}", &digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn id_is_deterministic() {
        let a = derive_id("dw", ":normal dw<CR>", "n", Some("core"));
        let b = derive_id("dw", ":normal dw<CR>", "n", Some("core"));
        assert_eq!(a, b);
    }

    #[test]
    fn id_ignores_description_and_metadata() {
        let a = derive_id("dw", "delete word", "n", None);
        let b = derive_id("dw", "delete word", "n", None);
        assert_eq!(a, b);
    }

    #[test]
    fn id_is_sensitive_to_keys_command_mode_plugin() {
        let base = derive_id("dw", "delete word", "n", Some("core"));
        assert_ne!(base, derive_id("dW", "delete word", "n", Some("core")));
        assert_ne!(base, derive_id("dw", "delete WORD", "n", Some("core")));
        assert_ne!(base, derive_id("dw", "delete word", "v", Some("core")));
        assert_ne!(base, derive_id("dw", "delete word", "n", Some("other")));
    }

    #[test]
    fn hash_is_sensitive_to_every_field() {
        let base_meta = meta(&[("source", "user")]);
        let base = content_hash("dw", "delete word", Some("desc"), "n", Some("p"), &base_meta);

        assert_ne!(
            base,
            content_hash("dW", "delete word", Some("desc"), "n", Some("p"), &base_meta)
        );
        assert_ne!(
            base,
            content_hash("dw", "delete WORD", Some("desc"), "n", Some("p"), &base_meta)
        );
        assert_ne!(
            base,
            content_hash("dw", "delete word", Some("other"), "n", Some("p"), &base_meta)
        );
        assert_ne!(
            base,
            content_hash("dw", "delete word", Some("desc"), "v", Some("p"), &base_meta)
        );
        assert_ne!(
            base,
            content_hash("dw", "delete word", Some("desc"), "n", Some("q"), &base_meta)
        );

        let changed_meta = meta(&[("source", "builtin")]);
        assert_ne!(
            base,
            content_hash("dw", "delete word", Some("desc"), "n", Some("p"), &changed_meta)
        );
    }

    #[test]
    fn hash_ignores_metadata_key_order() {
        let m1 = meta(&[("a", "1"), ("b", "2")]);
        let m2 = meta(&[("b", "2"), ("a", "1")]);
        assert_eq!(
            content_hash("dw", "x", None, "n", None, &m1),
            content_hash("dw", "x", None, "n", None, &m2)
        );
    }

    #[test]
    fn equal_records_hash_equal() {
        let m = meta(&[("source", "user")]);
        let a = content_hash("dw", "delete word", Some("d"), "n", Some("p"), &m);
        let b = content_hash("dw", "delete word", Some("d"), "n", Some("p"), &m);
        assert_eq!(a, b);
    }
}
