//! The fixed, enumerable stopword/synonym/intent data `QueryProcessor`
//! runs against (spec.md §4.5, Open Question resolved in SPEC_FULL.md
//! §9.1: "fixed, documented Rust data... not regex or embedded
//! comments").

/// Words discarded during tokenization; too common to carry intent.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "the", "to", "of", "in", "on", "for", "with", "is", "are", "how", "do", "i",
    "can", "you", "me", "my", "this", "that", "it",
];

/// Bidirectional synonym groups. Every word in a group is treated as
/// interchangeable with every other word in the same group.
pub const SYNONYM_GROUPS: &[&[&str]] = &[
    &["delete", "remove", "erase"],
    &["copy", "yank", "duplicate"],
    &["save", "write", "persist"],
    &["quit", "close", "exit"],
    &["undo", "revert"],
    &["redo", "repeat"],
    &["find", "search", "locate"],
    &["replace", "substitute"],
    &["jump", "go", "move", "navigate"],
    &["select", "highlight"],
    &["split", "window"],
    &["line", "row"],
    &["word", "token"],
];

/// One of the spec's ten fixed intent categories (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Cursor/viewport movement.
    Movement,
    /// Text mutation.
    Editing,
    /// Finding text or files.
    Search,
    /// Window/split/tab management.
    Window,
    /// Buffer management.
    Buffer,
    /// Reading/writing files.
    FileIo,
    /// Recording/playing macros.
    Macro,
    /// Marks and jumplists.
    Mark,
    /// Indentation/formatting.
    Format,
    /// Visual-mode selection operations.
    Visual,
}

impl Intent {
    /// Every intent, in the order spec.md §4.5 lists them.
    pub const ALL: &'static [Intent] = &[
        Intent::Movement,
        Intent::Editing,
        Intent::Search,
        Intent::Window,
        Intent::Buffer,
        Intent::FileIo,
        Intent::Macro,
        Intent::Mark,
        Intent::Format,
        Intent::Visual,
    ];

    /// The lowercase spec-facing name of this intent, e.g. `"file-io"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Movement => "movement",
            Intent::Editing => "editing",
            Intent::Search => "search",
            Intent::Window => "window",
            Intent::Buffer => "buffer",
            Intent::FileIo => "file-io",
            Intent::Macro => "macro",
            Intent::Mark => "mark",
            Intent::Format => "format",
            Intent::Visual => "visual",
        }
    }

    /// The fixed keyword set that votes for this intent.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Intent::Movement => &[
                "move", "jump", "go", "navigate", "cursor", "scroll", "top", "bottom", "line",
                "word", "paragraph",
            ],
            Intent::Editing => &[
                "delete", "remove", "insert", "change", "replace", "yank", "copy", "paste",
                "undo", "redo",
            ],
            Intent::Search => &["search", "find", "locate", "pattern", "match", "grep"],
            Intent::Window => &["window", "split", "pane", "tab", "resize"],
            Intent::Buffer => &["buffer", "file", "switch", "next", "previous"],
            Intent::FileIo => &["save", "write", "open", "read", "quit", "close"],
            Intent::Macro => &["macro", "record", "replay", "register"],
            Intent::Mark => &["mark", "jumplist", "bookmark"],
            Intent::Format => &["indent", "format", "align", "reflow"],
            Intent::Visual => &["visual", "select", "highlight", "block"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonym_groups_are_bidirectional_by_construction() {
        // A "bidirectional pair" here means membership in the same group;
        // verify no word appears in two different groups (that would make
        // the relation ambiguous, not bidirectional).
        let mut seen = std::collections::HashMap::new();
        for (idx, group) in SYNONYM_GROUPS.iter().enumerate() {
            for word in *group {
                if let Some(prev) = seen.insert(*word, idx) {
                    panic!("{word} appears in groups {prev} and {idx}");
                }
            }
        }
    }

    #[test]
    fn every_intent_has_a_nonempty_keyword_set() {
        for intent in Intent::ALL {
            assert!(!intent.keywords().is_empty(), "{:?}", intent);
        }
    }

    #[test]
    fn stopwords_are_nonempty_and_lowercase() {
        assert!(!STOPWORDS.is_empty());
        for word in STOPWORDS {
            assert_eq!(*word, word.to_lowercase());
        }
    }

    #[test]
    fn intent_as_str_round_trips_through_all() {
        for intent in Intent::ALL {
            assert!(!intent.as_str().is_empty());
        }
    }
}
