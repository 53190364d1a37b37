//! Markdown to node tree conversion with comrak.
//!
//! The tree mirrors the HTML a browser-side renderer would emit: a fenced
//! block becomes `<pre><code class="language-x">…</code></pre>`, inline
//! code is a bare `<code>`, and containers are named after their HTML tag.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};

use crate::node::{Element, Node};

/// Parse Markdown and build its rendered node tree.
pub fn to_node(source: &str) -> Node {
    let _scope = crate::perf::scope("markdown.to_node");
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);
    convert(root)
}

/// All `pre` elements of a tree, in document order.
pub fn pre_blocks(node: &Node) -> Vec<&Element> {
    let mut blocks = Vec::new();
    collect_pre_blocks(node, &mut blocks);
    blocks
}

/// The class string a code block is classified by: the `pre` class
/// joined with its first child's class.
pub fn combined_class(pre: &Element) -> String {
    let child_class = pre
        .first_child()
        .and_then(Node::as_element)
        .map_or("", Element::class_name);
    format!("{} {}", pre.class_name(), child_class)
        .trim()
        .to_string()
}

fn collect_pre_blocks<'n>(node: &'n Node, blocks: &mut Vec<&'n Element>) {
    match node {
        Node::Element(element) if element.tag == "pre" => blocks.push(element),
        Node::Element(element) => collect_pre_blocks(&element.children, blocks),
        Node::Sequence(nodes) => {
            for child in nodes {
                collect_pre_blocks(child, blocks);
            }
        }
        Node::Text(_) | Node::Number(_) | Node::Empty => {}
    }
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM, as the snippet cards render it
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

fn convert<'a>(node: &'a AstNode<'a>) -> Node {
    let children = || Node::Sequence(node.children().map(convert).collect());

    match &node.data.borrow().value {
        NodeValue::Document => children(),
        NodeValue::Text(text) => Node::text(text.clone()),
        NodeValue::SoftBreak => Node::text("\n"),
        NodeValue::LineBreak => Node::element("br", None, Node::Empty),
        NodeValue::ThematicBreak => Node::element("hr", None, Node::Empty),
        NodeValue::Code(code) => Node::element("code", None, Node::text(code.literal.clone())),
        NodeValue::HtmlBlock(html) => Node::text(html.literal.clone()),
        NodeValue::HtmlInline(html) => Node::text(html.clone()),
        NodeValue::CodeBlock(code_block) => {
            let class = code_block
                .info
                .split_whitespace()
                .next()
                .map(|lang| format!("language-{lang}"));
            let code = Node::element(
                "code",
                class.as_deref(),
                Node::text(code_block.literal.clone()),
            );
            Node::element("pre", None, Node::Sequence(vec![code]))
        }
        NodeValue::Heading(heading) => {
            Node::element(&format!("h{}", heading.level), None, children())
        }
        NodeValue::List(list) => {
            let tag = match list.list_type {
                ListType::Bullet => "ul",
                ListType::Ordered => "ol",
            };
            Node::element(tag, None, children())
        }
        NodeValue::TaskItem(checked) => {
            let marker = if checked.is_some() { "[x] " } else { "[ ] " };
            Node::element(
                "li",
                Some("task-list-item"),
                Node::Sequence(vec![Node::text(marker), children()]),
            )
        }
        value => Node::element(tag_for(value), None, children()),
    }
}

fn tag_for(value: &NodeValue) -> &'static str {
    match value {
        NodeValue::Paragraph => "p",
        NodeValue::BlockQuote => "blockquote",
        NodeValue::Item(_) => "li",
        NodeValue::Table(_) => "table",
        NodeValue::TableRow(_) => "tr",
        NodeValue::TableCell => "td",
        NodeValue::Emph => "em",
        NodeValue::Strong => "strong",
        NodeValue::Strikethrough => "del",
        NodeValue::Link(_) => "a",
        NodeValue::Image(_) => "img",
        _ => "div",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::extract_text;

    #[test]
    fn test_fenced_block_becomes_pre_with_language_class() {
        let tree = to_node("Intro\n\n```rust title=main\nfn main() {}\n```\n");
        let blocks = pre_blocks(&tree);
        assert_eq!(blocks.len(), 1);
        assert_eq!(combined_class(blocks[0]), "language-rust");
        assert_eq!(extract_text(&blocks[0].children), "fn main() {}\n");
    }

    #[test]
    fn test_untagged_block_has_no_class() {
        let tree = to_node("```\nplain\n```\n");
        let blocks = pre_blocks(&tree);
        assert_eq!(combined_class(blocks[0]), "");
    }

    #[test]
    fn test_indented_block_is_a_pre() {
        let tree = to_node("para\n\n    indented code\n");
        let blocks = pre_blocks(&tree);
        assert_eq!(blocks.len(), 1);
        assert_eq!(extract_text(&blocks[0].children), "indented code\n");
    }

    #[test]
    fn test_inline_code_is_not_a_block() {
        let tree = to_node("Use `ls -la` here");
        assert!(pre_blocks(&tree).is_empty());
        assert_eq!(extract_text(&tree), "Use ls -la here");
    }

    #[test]
    fn test_blocks_are_in_document_order() {
        let tree = to_node("```a\n1\n```\n\n> ```b\n> 2\n> ```\n\n- item\n\n  ```c\n  3\n  ```\n");
        let classes: Vec<String> = pre_blocks(&tree).into_iter().map(combined_class).collect();
        assert_eq!(classes, vec!["language-a", "language-b", "language-c"]);
    }

    #[test]
    fn test_soft_breaks_keep_newlines() {
        let tree = to_node("one\ntwo");
        assert_eq!(extract_text(&tree), "one\ntwo");
    }

    #[test]
    fn test_task_items_carry_marker() {
        let tree = to_node("- [x] done\n- [ ] todo\n");
        let text = extract_text(&tree);
        assert!(text.contains("[x] done"));
        assert!(text.contains("[ ] todo"));
    }
}
