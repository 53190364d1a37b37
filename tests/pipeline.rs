use snipdeck::diagram::{DiagramError, DiagramOutput, DiagramRenderer, NoDiagrams};
use snipdeck::fence::{Classification, FenceKind, classify_fence, copy_text, extract_first_fence};
use snipdeck::node::{Node, extract_text};
use snipdeck::render::{Block, RenderOptions, classify_document, document_text, render_markdown};

const KUBECTL: &str = include_str!("fixtures/kubectl.md");
const DIAGRAMS: &str = include_str!("fixtures/diagrams.md");
const PROSE: &str = include_str!("fixtures/prose.md");

struct Rejects;

impl DiagramRenderer for Rejects {
    fn render(&self, _source: &str) -> Result<String, DiagramError> {
        Err(DiagramError::Disabled)
    }
}

struct Accepts;

impl DiagramRenderer for Accepts {
    fn render(&self, source: &str) -> Result<String, DiagramError> {
        Ok(format!("<svg data-lines=\"{}\"/>", source.lines().count()))
    }
}

#[test]
fn test_copy_takes_first_fence_only() {
    let fence = extract_first_fence(KUBECTL);
    assert_eq!(fence.lang.as_deref(), Some("bash"));
    assert_eq!(
        fence.code,
        "kubectl logs -f deploy/api --all-containers --since=10m | grep -i error\n"
    );
    assert_eq!(copy_text(KUBECTL), fence.code);
}

#[test]
fn test_copy_without_fence_takes_whole_note() {
    assert_eq!(copy_text(PROSE), PROSE);
}

#[test]
fn test_classify_document_matches_signals() {
    let classified = classify_document(DIAGRAMS);
    let kinds: Vec<FenceKind> = classified.iter().map(Classification::kind).collect();
    assert_eq!(kinds, vec![FenceKind::Diagram, FenceKind::Diagram, FenceKind::Code]);
    assert_eq!(
        classified[2],
        Classification::Code {
            text: "print('graph')\n".to_string(),
            language_hint: Some("python".to_string()),
        }
    );
}

#[test]
fn test_failed_diagrams_fall_back_to_source() {
    let options = RenderOptions {
        diagrams: &Rejects,
        shell_colors: true,
    };
    let blocks = render_markdown(DIAGRAMS, &options);
    let fallbacks: Vec<&str> = blocks
        .iter()
        .filter_map(|block| match block {
            Block::Diagram {
                output: DiagramOutput::Fallback(text),
                ..
            } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(fallbacks.len(), 2);
    assert!(fallbacks[0].starts_with("[Mermaid render failed]\nflowchart LR"));
    assert!(fallbacks[1].contains("Gateway->>Cloud: batch"));
}

#[test]
fn test_rendered_diagrams_keep_order_with_prose() {
    let options = RenderOptions {
        diagrams: &Accepts,
        shell_colors: true,
    };
    let blocks = render_markdown(DIAGRAMS, &options);
    let kinds: Vec<&str> = blocks
        .iter()
        .map(|block| match block {
            Block::Prose { .. } => "prose",
            Block::Code { .. } => "code",
            Block::Diagram { .. } => "diagram",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["prose", "diagram", "prose", "diagram", "prose", "code"]
    );
    assert_eq!(
        blocks[1],
        Block::Diagram {
            source: "flowchart LR\n  Sensor --> Gateway --> Cloud".to_string(),
            output: DiagramOutput::Svg("<svg data-lines=\"2\"/>".to_string()),
        }
    );
}

#[test]
fn test_render_json_shape() {
    let options = RenderOptions {
        diagrams: &NoDiagrams,
        shell_colors: false,
    };
    let blocks = render_markdown("```mermaid\n```\n", &options);
    let json = serde_json::to_value(&blocks).unwrap();
    assert_eq!(json[0]["kind"], "diagram");
    assert_eq!(json[0]["output"]["kind"], "blank");
}

#[test]
fn test_search_text_contains_code_and_prose() {
    let text = document_text(KUBECTL);
    assert!(text.contains("Tail logs from every pod"));
    assert!(text.contains("kubectl rollout restart"));
}

#[test]
fn test_reference_classification_and_fence_cases() {
    assert_eq!(extract_text(&Node::text("abc")), "abc");
    assert_eq!(extract_text(&Node::Number(42.0)), "42");
    assert!(classify_fence("language-mermaid", "").is_diagram());
    assert!(classify_fence("language-js", "flowchart LR\n  a --> b").is_diagram());
    assert!(!classify_fence("language-python", "print('graph')").is_diagram());
}
