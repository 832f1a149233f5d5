use super::*;
use std::collections::BTreeMap;

fn raw(keys: &str, command: &str) -> RawKeybinding {
    RawKeybinding {
        id: None,
        keys: keys.to_string(),
        command: command.to_string(),
        description: None,
        mode: None,
        plugin: None,
        metadata: None,
    }
}

#[test]
fn parse_defaults_mode_to_normal() {
    let outcome = parse(raw("dw", "delete word"));
    match outcome {
        ParseOutcome::Valid(kb) => assert_eq!(kb.mode, Mode::Normal),
        ParseOutcome::Invalid(e) => panic!("expected valid, got {e}"),
    }
}

#[test]
fn parse_generates_id_when_absent() {
    let outcome = parse(raw("dw", "delete word"));
    match outcome {
        ParseOutcome::Valid(kb) => assert!(!kb.id.is_empty()),
        ParseOutcome::Invalid(e) => panic!("expected valid, got {e}"),
    }
}

#[test]
fn parse_preserves_explicit_id() {
    let mut r = raw("dw", "delete word");
    r.id = Some("explicit".to_string());
    match parse(r) {
        ParseOutcome::Valid(kb) => assert_eq!(kb.id, "explicit"),
        ParseOutcome::Invalid(e) => panic!("expected valid, got {e}"),
    }
}

#[test]
fn parse_rejects_empty_keys() {
    let r = raw("", "delete word");
    assert!(matches!(parse(r), ParseOutcome::Invalid(_)));
}

#[test]
fn parse_rejects_empty_command() {
    let r = raw("dw", "");
    assert!(matches!(parse(r), ParseOutcome::Invalid(_)));
}

#[test]
fn parse_rejects_unknown_mode() {
    let mut r = raw("dw", "delete word");
    r.mode = Some("z".to_string());
    assert!(matches!(parse(r), ParseOutcome::Invalid(_)));
}

#[test]
fn parse_rejects_bad_key_grammar_without_io() {
    let mut r = raw("<<bad>>", "x");
    r.mode = Some("n".to_string());
    match parse(r) {
        ParseOutcome::Invalid(msg) => assert!(msg.contains("doubled") || msg.contains("angle")),
        ParseOutcome::Valid(_) => panic!("expected invalid"),
    }
}

#[test]
fn id_is_a_pure_function_of_keys_command_mode_plugin() {
    let kb = Keybinding {
        id: "ignored".to_string(),
        keys: "dw".to_string(),
        command: "delete word".to_string(),
        description: Some("desc".to_string()),
        mode: Mode::Normal,
        plugin: Some("core".to_string()),
        metadata: BTreeMap::new(),
    };
    assert_eq!(id_of(&kb), id_of(&kb));
}

#[test]
fn hash_changes_when_any_field_changes() {
    let mut kb = Keybinding {
        id: "kb_1".to_string(),
        keys: "dw".to_string(),
        command: "delete word".to_string(),
        description: Some("desc".to_string()),
        mode: Mode::Normal,
        plugin: Some("core".to_string()),
        metadata: BTreeMap::from([("source".to_string(), "user".to_string())]),
    };
    let base = hash_of(&kb);

    kb.description = Some("other".to_string());
    assert_ne!(base, hash_of(&kb));

    kb.description = Some("desc".to_string());
    kb.metadata
        .insert("tag".to_string(), "frequent".to_string());
    assert_ne!(base, hash_of(&kb));
}

#[test]
fn round_trip_through_json_preserves_mode() {
    let kb = Keybinding {
        id: "kb_1".to_string(),
        keys: "<leader>w".to_string(),
        command: ":w<CR>".to_string(),
        description: Some("save file".to_string()),
        mode: Mode::Normal,
        plugin: None,
        metadata: BTreeMap::new(),
    };
    let json = serde_json::to_string(&kb).unwrap();
    let back: Keybinding = serde_json::from_str(&json).unwrap();
    assert_eq!(back.mode, kb.mode);
    assert_eq!(back.keys, kb.keys);
}
