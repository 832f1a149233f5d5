use crate::keybinding::Keybinding;

/// The soft cap on rendered content length before embedding (spec.md
/// §4.4: "Truncate at a word boundary to ≤ ~1000 characters").
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Renders a keybinding to the text fed into `LLMClient::embed` (spec.md
/// §4.4 "Content rendering"): join non-empty of `keys`, `command`,
/// `description`, `mode:<m>`, `plugin:<p>`, then each `k:v` from
/// metadata; collapse whitespace; lowercase; truncate at a word
/// boundary.
pub fn render(kb: &Keybinding) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !kb.keys.trim().is_empty() {
        parts.push(kb.keys.clone());
    }
    if !kb.command.trim().is_empty() {
        parts.push(kb.command.clone());
    }
    if let Some(description) = &kb.description {
        if !description.trim().is_empty() {
            parts.push(description.clone());
        }
    }
    parts.push(format!("mode:{}", kb.mode.as_str()));
    if let Some(plugin) = &kb.plugin {
        if !plugin.trim().is_empty() {
            parts.push(format!("plugin:{plugin}"));
        }
    }
    for (k, v) in &kb.metadata {
        parts.push(format!("{k}:{v}"));
    }

    let joined = parts.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.to_lowercase();

    truncate_at_word_boundary(&lowered, MAX_CONTENT_CHARS)
}

fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(boundary) if boundary > 0 => truncated[..boundary].to_string(),
        _ => truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinding::Mode;
    use std::collections::BTreeMap;

    fn kb() -> Keybinding {
        Keybinding {
            id: "kb_1".to_string(),
            keys: "dw".to_string(),
            command: "delete word".to_string(),
            description: Some("Delete from cursor to next word".to_string()),
            mode: Mode::Normal,
            plugin: Some("core".to_string()),
            metadata: BTreeMap::from([("tag".to_string(), "frequent".to_string())]),
        }
    }

    #[test]
    fn render_includes_every_non_empty_field() {
        let text = render(&kb());
        assert!(text.contains("dw"));
        assert!(text.contains("delete word"));
        assert!(text.contains("mode:n"));
        assert!(text.contains("plugin:core"));
        assert!(text.contains("tag:frequent"));
    }

    #[test]
    fn render_lowercases_and_collapses_whitespace() {
        let mut k = kb();
        k.description = Some("  Delete   THE word  ".to_string());
        let text = render(&k);
        assert!(!text.contains("  "));
        assert_eq!(text, text.to_lowercase());
    }

    #[test]
    fn render_skips_absent_optional_fields() {
        let mut k = kb();
        k.description = None;
        k.plugin = None;
        k.metadata.clear();
        let text = render(&k);
        assert!(!text.contains("plugin:"));
    }

    #[test]
    fn render_truncates_long_content_at_word_boundary() {
        let mut k = kb();
        k.description = Some("word ".repeat(400));
        let text = render(&k);
        assert!(text.chars().count() <= MAX_CONTENT_CHARS);
        assert!(!text.ends_with(' '));
    }
}
