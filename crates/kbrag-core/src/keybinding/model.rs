use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The wire shape accepted by `SyncKeybindings`/`UpdateKeybindings`
/// (spec.md §6): `id` is optional, everything else matches [`Keybinding`]
/// loosely (mode arrives as a raw string so [`super::parse`] can reject
/// unknown values with a useful message instead of a serde error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawKeybinding {
    /// Stable id; computed when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The key sequence, vim-notation (e.g. `<leader>w`, `dd`, `<C-v>`).
    pub keys: String,
    /// The bound command or description of effect.
    pub command: String,
    /// Free-text human description.
    #[serde(default)]
    pub description: Option<String>,
    /// One of the allowed mode strings; defaults to `"n"`.
    #[serde(default)]
    pub mode: Option<String>,
    /// Originating plugin name.
    #[serde(default)]
    pub plugin: Option<String>,
    /// Arbitrary provenance/tags.
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// The editor mode a keybinding is active in (spec.md §3): one of
/// `{n, i, v, x, s, o, c, t, "", !, ic}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// `n` - normal mode.
    Normal,
    /// `i` - insert mode.
    Insert,
    /// `v` - visual mode.
    Visual,
    /// `x` - visual-block mode.
    VisualBlock,
    /// `s` - select mode.
    Select,
    /// `o` - operator-pending mode.
    OperatorPending,
    /// `c` - command-line mode.
    CommandLine,
    /// `t` - terminal mode.
    Terminal,
    /// `""` - applies in all modes.
    AllModes,
    /// `!` - normal and visual/operator-pending combined (vim's `map!` shorthand).
    NormalVisualOperator,
    /// `ic` - insert and command-line combined.
    InsertCommandLine,
}

impl Mode {
    /// Parses one of the spec's allowed mode strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "n" => Some(Mode::Normal),
            "i" => Some(Mode::Insert),
            "v" => Some(Mode::Visual),
            "x" => Some(Mode::VisualBlock),
            "s" => Some(Mode::Select),
            "o" => Some(Mode::OperatorPending),
            "c" => Some(Mode::CommandLine),
            "t" => Some(Mode::Terminal),
            "" => Some(Mode::AllModes),
            "!" => Some(Mode::NormalVisualOperator),
            "ic" => Some(Mode::InsertCommandLine),
            _ => None,
        }
    }

    /// The canonical spec.md string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "n",
            Mode::Insert => "i",
            Mode::Visual => "v",
            Mode::VisualBlock => "x",
            Mode::Select => "s",
            Mode::OperatorPending => "o",
            Mode::CommandLine => "c",
            Mode::Terminal => "t",
            Mode::AllModes => "",
            Mode::NormalVisualOperator => "!",
            Mode::InsertCommandLine => "ic",
        }
    }
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Mode::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown mode: {raw}")))
    }
}

/// A validated keybinding record — the primary domain entity (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keybinding {
    /// Deterministic id derived from `(keys, command, mode, plugin)`.
    pub id: String,
    /// The key sequence, vim-notation.
    pub keys: String,
    /// The bound command or description of effect.
    pub command: String,
    /// Free-text human description.
    #[serde(default)]
    pub description: Option<String>,
    /// The editor mode this binding is active in.
    pub mode: Mode,
    /// Originating plugin name.
    #[serde(default)]
    pub plugin: Option<String>,
    /// Provenance (`source`) and arbitrary tags.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Keybinding {
    /// The `metadata["source"]` value, if present (e.g. `user`, `builtin`,
    /// `general`, `llm_generated`).
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").map(String::as_str)
    }
}
