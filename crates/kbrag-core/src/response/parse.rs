//! Splits an LLM response into its four labeled sections and parses
//! `RECOMMENDATIONS` lines (spec.md §4.6).
//!
//! The strict regex and the three fallback patterns are compiled once
//! via `std::sync::LazyLock`, matching the pack's preference for
//! `LazyLock` over `once_cell` (see SPEC_FULL.md §4.6).

use std::sync::LazyLock;

use regex::Regex;

use super::model::{GeneratedSections, ParsedRecommendation};

const SECTION_HEADERS: &[&str] = &["ANALYSIS", "RECOMMENDATIONS", "REASONING", "ALTERNATIVES"];

static STRICT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\d+\.\s*Keys:\s*(?P<keys>[^|]+?)\s*\|\s*Command:\s*(?P<command>[^|]+?)\s*\|\s*Description:\s*(?P<description>[^|]*?)\s*\|\s*Mode:\s*(?P<mode>[^|]+?)\s*\|\s*Score:\s*(?P<score>[0-9.]+)\s*\|\s*Explanation:\s*(?P<explanation>.*?)\s*$",
    )
    .expect("strict recommendation regex is valid")
});

static COLON_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+\.\s*)?(?P<keys>\S+)\s*:\s*(?P<description>.+?)\s*$")
        .expect("colon-form regex is valid")
});

static DASH_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+\.\s*)?(?P<keys>\S+)\s*-\s*(?P<description>.+?)\s*$")
        .expect("dash-form regex is valid")
});

/// Default score assigned to a recommendation recovered by a fallback
/// parser (spec.md §4.6).
pub const FALLBACK_SCORE: f64 = 0.7;

/// Parses a raw LLM response into its four sections and recommendation
/// list (spec.md §4.6).
pub fn parse_response(raw: &str) -> GeneratedSections {
    let sections = split_sections(raw);

    let mut used_fallback = false;
    let mut recommendations = Vec::new();

    if let Some(body) = sections.get("RECOMMENDATIONS") {
        recommendations = parse_strict_lines(body);
        if recommendations.is_empty() {
            recommendations = parse_fallback_lines(body);
            used_fallback = !recommendations.is_empty();
        }
    }

    // spec.md §4.6: "If zero recommendations parse, run the fallback
    // pattern over the entire response".
    if recommendations.is_empty() {
        recommendations = parse_fallback_lines(raw);
        used_fallback = !recommendations.is_empty();
    }

    GeneratedSections {
        analysis: sections.get("ANALYSIS").cloned(),
        recommendations,
        reasoning: sections.get("REASONING").cloned(),
        alternatives: sections.get("ALTERNATIVES").cloned(),
        used_fallback,
    }
}

/// Splits `raw` by the four uppercase section headers, each of which may
/// appear alone on its own line.
fn split_sections(raw: &str) -> std::collections::HashMap<&'static str, String> {
    let mut sections = std::collections::HashMap::new();
    let mut current: Option<&'static str> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if let Some(header) = SECTION_HEADERS.iter().find(|h| trimmed.eq_ignore_ascii_case(h)) {
            if let Some(name) = current.take() {
                sections.insert(name, buffer.join("\n").trim().to_string());
                buffer.clear();
            }
            current = Some(header);
            continue;
        }
        if current.is_some() {
            buffer.push(line);
        }
    }
    if let Some(name) = current.take() {
        sections.insert(name, buffer.join("\n").trim().to_string());
    }

    sections
}

fn parse_strict_lines(body: &str) -> Vec<ParsedRecommendation> {
    let mut out = Vec::new();
    for (idx, line) in body.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        if let Some(caps) = STRICT_LINE.captures(line) {
            let score: f64 = caps["score"].parse().unwrap_or(FALLBACK_SCORE);
            out.push(ParsedRecommendation {
                rank: idx + 1,
                keys: caps["keys"].trim().to_string(),
                command: non_empty(&caps["command"]),
                description: non_empty(&caps["description"]),
                mode: non_empty(&caps["mode"]),
                score: score.clamp(0.0, 1.0),
                explanation: caps["explanation"].trim().to_string(),
            });
        }
    }
    out
}

/// Recovers recommendations from loosely-formatted text using, in
/// order: colon-form (`keys: description`), dash-form (`keys -
/// description`), else "first whitespace-delimited token is keys"
/// (spec.md §4.6).
fn parse_fallback_lines(body: &str) -> Vec<ParsedRecommendation> {
    let mut out = Vec::new();
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let trimmed = line.trim();
        if SECTION_HEADERS.iter().any(|h| trimmed.eq_ignore_ascii_case(h)) {
            continue;
        }

        let recommendation = if let Some(caps) = COLON_FORM.captures(trimmed) {
            Some((caps["keys"].to_string(), caps["description"].to_string()))
        } else if let Some(caps) = DASH_FORM.captures(trimmed) {
            Some((caps["keys"].to_string(), caps["description"].to_string()))
        } else {
            trimmed
                .split_whitespace()
                .next()
                .map(|keys| (keys.to_string(), trimmed.to_string()))
        };

        if let Some((keys, description)) = recommendation {
            if keys.is_empty() {
                continue;
            }
            out.push(ParsedRecommendation {
                rank: out.len() + 1,
                keys,
                command: None,
                description: non_empty(&description),
                mode: None,
                score: FALLBACK_SCORE,
                explanation: description,
            });
        }
    }
    out
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strict_recommendation_lines() {
        let raw = "ANALYSIS\nUser wants to delete a word.\n\nRECOMMENDATIONS\n1. Keys: dw | Command: delete word | Description: deletes to next word | Mode: n | Score: 0.9 | Explanation: exact match\n\nREASONING\nDw is the canonical delete-word binding.\n\nALTERNATIVES\nNone.\n";
        let sections = parse_response(raw);
        assert!(!sections.used_fallback);
        assert_eq!(sections.recommendations.len(), 1);
        let rec = &sections.recommendations[0];
        assert_eq!(rec.keys, "dw");
        assert_eq!(rec.command.as_deref(), Some("delete word"));
        assert_eq!(rec.score, 0.9);
        assert_eq!(sections.analysis.as_deref(), Some("User wants to delete a word."));
    }

    #[test]
    fn falls_back_to_colon_form() {
        let raw = "RECOMMENDATIONS\ndw: delete a word\n";
        let sections = parse_response(raw);
        assert!(sections.used_fallback);
        assert_eq!(sections.recommendations[0].keys, "dw");
        assert_eq!(sections.recommendations[0].score, FALLBACK_SCORE);
    }

    #[test]
    fn falls_back_to_dash_form() {
        let raw = "RECOMMENDATIONS\ndw - delete a word\n";
        let sections = parse_response(raw);
        assert!(sections.used_fallback);
        assert_eq!(sections.recommendations[0].keys, "dw");
    }

    #[test]
    fn falls_back_to_first_token_when_nothing_else_matches() {
        let raw = "RECOMMENDATIONS\ndw deletes a word nicely\n";
        let sections = parse_response(raw);
        assert!(sections.used_fallback);
        assert_eq!(sections.recommendations[0].keys, "dw");
    }

    #[test]
    fn empty_response_yields_no_recommendations() {
        let sections = parse_response("");
        assert!(sections.is_empty());
        assert!(!sections.used_fallback);
    }

    #[test]
    fn fallback_runs_over_whole_response_when_no_recommendations_section() {
        let raw = "dw - delete a word\n";
        let sections = parse_response(raw);
        assert!(sections.used_fallback);
        assert_eq!(sections.recommendations[0].keys, "dw");
    }
}
