//! The stable, versionable prompt template (spec.md §4.6).

/// Version tag for the prompt template; bump when the shape of the
/// expected sections or recommendation-line format changes, since the
/// parser in [`super::parse`] is coupled to this exact format.
pub const PROMPT_VERSION: &str = "v1";

/// Builds the prompt sent to [`crate::llm::LLMClient::generate`].
///
/// `query` is the user's natural-language phrase; `context` is the
/// rendered vector-search hints (candidate keybindings already found by
/// [`crate::router::CollectionRouter::search_all`]) the model should
/// ground its answer in.
pub fn build(query: &str, context: &str) -> String {
    format!(
        "You are a vim/neovim keybinding assistant. A user is searching for a \
keybinding using this natural-language query:\n\n\"{query}\"\n\n\
Here are candidate keybindings retrieved from a vector search, for context:\n\n\
{context}\n\n\
Respond with exactly four uppercase section headers, in this order: \
ANALYSIS, RECOMMENDATIONS, REASONING, ALTERNATIVES.\n\n\
Under ANALYSIS, briefly restate what the user is trying to do.\n\n\
Under RECOMMENDATIONS, list each suggested keybinding on its own line, in \
this exact pipe-delimited shape (replace the angle-bracketed fields; keep \
the literal words Keys/Command/Description/Mode/Score/Explanation):\n\n\
N. Keys: <k> | Command: <c> | Description: <d> | Mode: <m> | Score: <0.0-1.0> | Explanation: <e>\n\n\
Under REASONING, explain in one paragraph why these recommendations fit.\n\n\
Under ALTERNATIVES, note any keybindings that are close but less ideal.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_includes_query_and_context_and_section_headers() {
        let prompt = build("delete a word", "dw - delete word");
        assert!(prompt.contains("delete a word"));
        assert!(prompt.contains("dw - delete word"));
        for header in ["ANALYSIS", "RECOMMENDATIONS", "REASONING", "ALTERNATIVES"] {
            assert!(prompt.contains(header));
        }
    }
}
