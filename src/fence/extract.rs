//! First fenced block extraction, used by the copy action.

use serde::Serialize;

use super::patterns::FIRST_FENCE;

/// The first fenced block of a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstFence {
    pub code: String,
    pub lang: Option<String>,
}

/// Extract the first triple-backtick block of `markdown`.
///
/// The body is returned exactly as written. An empty language tag becomes
/// `None`. When the document has no fence the whole input comes back as
/// `code`, so callers always have something to copy.
pub fn extract_first_fence(markdown: &str) -> FirstFence {
    let Some(caps) = FIRST_FENCE.captures(markdown) else {
        return FirstFence {
            code: markdown.to_string(),
            lang: None,
        };
    };
    FirstFence {
        code: caps
            .get(2)
            .map_or_else(String::new, |body| body.as_str().to_string()),
        lang: caps
            .get(1)
            .map(|tag| tag.as_str())
            .filter(|tag| !tag.is_empty())
            .map(ToString::to_string),
    }
}

/// Text for the copy action: the first fence's code, or the whole
/// document when that code is empty.
pub fn copy_text(markdown: &str) -> String {
    let fence = extract_first_fence(markdown);
    if fence.code.is_empty() {
        markdown.to_string()
    } else {
        fence.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_fence_returns_whole_input() {
        assert_eq!(
            extract_first_fence("no fences here"),
            FirstFence {
                code: "no fences here".to_string(),
                lang: None,
            }
        );
    }

    #[test]
    fn test_fence_with_language() {
        assert_eq!(
            extract_first_fence("text\n```bash\necho hi\n```\nmore"),
            FirstFence {
                code: "echo hi\n".to_string(),
                lang: Some("bash".to_string()),
            }
        );
    }

    #[test]
    fn test_only_first_fence_is_captured() {
        let fence = extract_first_fence("```\nfirst\n```\n```\nsecond\n```");
        assert_eq!(fence.code, "first\n");
        assert_eq!(fence.lang, None);
    }

    #[test]
    fn test_body_is_not_trimmed_or_dedented() {
        let fence = extract_first_fence("```yaml\n  key: value\n\n    nested: 1\n```");
        assert_eq!(fence.code, "  key: value\n\n    nested: 1\n");
        assert_eq!(fence.lang.as_deref(), Some("yaml"));
    }

    #[test]
    fn test_trailing_spaces_after_tag_are_allowed() {
        let fence = extract_first_fence("```sql   \nselect 1;\n```");
        assert_eq!(fence.code, "select 1;\n");
        assert_eq!(fence.lang.as_deref(), Some("sql"));
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_input() {
        let md = "```rust\nfn main() {}\n";
        assert_eq!(extract_first_fence(md).code, md);
    }

    #[test]
    fn test_copy_text_prefers_fence_code() {
        assert_eq!(copy_text("Run:\n```sh\nls -la\n```"), "ls -la\n");
    }

    #[test]
    fn test_copy_text_falls_back_when_fence_is_empty() {
        let md = "Empty:\n```text\n```";
        assert_eq!(copy_text(md), md);
    }

    proptest! {
        #[test]
        fn prop_fence_free_input_is_returned_whole(md in "[^`]{0,64}") {
            let fence = extract_first_fence(&md);
            prop_assert_eq!(fence.code, md);
            prop_assert_eq!(fence.lang, None);
        }
    }
}
