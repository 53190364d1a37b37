//! Compiled patterns shared by the fence helpers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Keywords that open a mermaid diagram definition.
pub const DIAGRAM_KEYWORDS: &[&str] = &[
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "erDiagram",
    "gantt",
    "journey",
];

/// `language-mermaid` as a whole whitespace-delimited token.
pub static MERMAID_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|\s)language-mermaid(\s|$)").expect("mermaid class pattern should be valid")
});

/// A diagram keyword at the start of the text, followed by an ASCII word
/// boundary (`graphé` counts, `graphql` does not).
pub static DIAGRAM_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"^\s*({})(?-u:\b)", DIAGRAM_KEYWORDS.join("|"));
    Regex::new(&pattern).expect("diagram keyword pattern should be valid")
});

/// The id of the first `language-<id>` token in a class string.
pub static LANGUAGE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)language-(\S+)").expect("language token pattern should be valid")
});

/// The first triple-backtick fence: optional tag, line break, lazy body.
pub static FIRST_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_-]+)?\s*\n(.*?)```").expect("fence pattern should be valid")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_keyword_pattern_lists_every_keyword() {
        for keyword in DIAGRAM_KEYWORDS {
            assert!(DIAGRAM_KEYWORD.is_match(keyword), "{keyword} should match");
        }
    }

    #[test]
    fn test_language_token_takes_first() {
        let caps = LANGUAGE_TOKEN.captures("hljs language-ts language-js").unwrap();
        assert_eq!(&caps[1], "ts");
        assert!(LANGUAGE_TOKEN.captures("xlanguage-ts").is_none());
    }
}
