//! Lightweight colouring for shell command snippets.
//!
//! Syntax definitions treat a one-line `kubectl get pods -n prod` as a
//! string of words; this tokenizer picks out the parts a reader scans for
//! (prompt, command, subcommand, flags, quoted strings, variables, pipes,
//! comments) and wraps them in `span` nodes with highlight.js class names.
//! Extracting the text of the output gives back the input.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::highlight::{HighlightSpan, Rgb};
use crate::node::{Node, extract_text};

static PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([#$] )").expect("prompt pattern should be valid"));

static HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9:_-]+)(\s+)([a-zA-Z0-9:_-]+)?").expect("head pattern should be valid")
});

type Render = fn(&Captures<'_>, &mut Vec<Node>);

/// Token patterns, tried in order at each position; first match wins.
static TOKENS: Lazy<Vec<(Regex, Render)>> = Lazy::new(|| {
    let table: [(&str, Render); 11] = [
        // line continuation
        (r"\\\s*$", |m, out| {
            out.push(span("hljs-meta", "\\"));
            push_plain(out, &m[0][1..]);
        }),
        (r#""([^"\\]|\\.)*""#, |m, out| out.push(span("hljs-string", &m[0]))),
        (r"'([^'\\]|\\.)*'", |m, out| out.push(span("hljs-string", &m[0]))),
        (r"(https?://\S+)", |m, out| out.push(span("hljs-link", &m[1]))),
        // <placeholder>, raw or entity-escaped
        (r"&lt;[^&\n]+?&gt;|<[^>\n]+?>", |m, out| {
            out.push(span("hljs-string", &m[0]));
        }),
        (r"(^|[\s(])\$[A-Z_][A-Z0-9_]*", |m, out| {
            push_plain(out, &m[1]);
            out.push(span("hljs-variable", &m[0][m[1].len()..]));
        }),
        (r#"(?-u:\b)([A-Z_][A-Z0-9_]*)=([^\s"']+)"#, |m, out| {
            out.push(span("hljs-attr", &m[1]));
            push_plain(out, "=");
            out.push(span("hljs-string", &m[2]));
        }),
        (r"(^|\s)(--[a-z0-9-]+)", |m, out| {
            push_plain(out, &m[1]);
            out.push(span("hljs-attr", &m[2]));
        }),
        (r"(^|\s)(-[A-Za-z0-9][A-Za-z0-9-]*)", |m, out| {
            push_plain(out, &m[1]);
            out.push(span("hljs-attr", &m[2]));
        }),
        // pipeline target
        (r"\|\s*([A-Za-z0-9:_-]+)", |m, out| {
            push_plain(out, &m[0][..m[0].len() - m[1].len()]);
            out.push(span("hljs-built_in", &m[1]));
        }),
        (r"(\s#.*)$", |m, out| out.push(span("hljs-comment", &m[1]))),
    ];
    table
        .into_iter()
        .map(|(pattern, render)| {
            let regex = Regex::new(pattern).expect("shell token pattern should be valid");
            (regex, render)
        })
        .collect()
});

/// Colour a block of shell commands.
///
/// Lines are separated by `"\n"` text nodes (`\r\n` input is normalized).
pub fn colorize_cli(text: &str) -> Vec<Node> {
    let mut out = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            push_plain(&mut out, "\n");
        }
        colorize_line(line.strip_suffix('\r').unwrap_or(line), &mut out);
    }
    out
}

fn colorize_line(line: &str, out: &mut Vec<Node>) {
    if line.trim().is_empty() {
        push_plain(out, line);
        return;
    }

    let mut rest = line;
    if let Some(caps) = PROMPT.captures(rest) {
        push_plain(out, &caps[1]);
        out.push(span("hljs-meta", &caps[2]));
        rest = &rest[caps[0].len()..];
    }

    let mut pos = 0;
    if let Some(caps) = HEAD.captures(rest) {
        out.push(span("hljs-built_in", &caps[1]));
        push_plain(out, &caps[2]);
        if let Some(sub) = caps.get(3) {
            out.push(span("hljs-keyword", sub.as_str()));
        }
        pos = caps[0].len();
    }

    // Start of each pattern's leftmost match at or after `pos`; a pattern
    // is searched again only once `pos` has moved past that start.
    let mut next_start: Vec<Option<usize>> = TOKENS
        .iter()
        .map(|(regex, _)| regex.find_at(rest, pos).map(|m| m.start()))
        .collect();

    while pos < rest.len() {
        let mut matched = None;
        for ((regex, render), start) in TOKENS.iter().zip(next_start.iter_mut()) {
            if start.is_some_and(|at| at < pos) {
                *start = regex.find_at(rest, pos).map(|m| m.start());
            }
            if *start == Some(pos) {
                matched = regex
                    .captures_at(rest, pos)
                    .filter(|caps| caps.get(0).is_some_and(|m| m.start() == pos && m.end() > pos))
                    .map(|caps| (caps, render));
                break;
            }
        }

        if let Some((caps, render)) = matched {
            render(&caps, out);
            pos = caps.get(0).map_or(pos, |m| m.end());
        } else if let Some(ch) = rest[pos..].chars().next() {
            push_plain(out, &rest[pos..pos + ch.len_utf8()]);
            pos += ch.len_utf8();
        }
    }
}

fn span(class: &str, value: &str) -> Node {
    Node::element("span", Some(class), Node::text(value))
}

/// Append plain text, merging with a preceding text node.
fn push_plain(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Node::text(text));
    }
}

/// Terminal colour for a highlight.js class (monokai palette).
pub fn class_color(class_name: &str) -> Option<Rgb> {
    let (r, g, b) = match class_name {
        "hljs-meta" | "hljs-comment" => (0x75, 0x71, 0x5e),
        "hljs-built_in" => (0x66, 0xd9, 0xef),
        "hljs-keyword" => (0xf9, 0x26, 0x72),
        "hljs-string" => (0xe6, 0xdb, 0x74),
        "hljs-link" => (0xae, 0x81, 0xff),
        "hljs-variable" => (0xfd, 0x97, 0x1f),
        "hljs-attr" => (0xa6, 0xe2, 0x2e),
        _ => return None,
    };
    Some(Rgb { r, g, b })
}

/// Lay coloured nodes out as lines of spans.
pub fn to_lines(nodes: &[Node]) -> Vec<Vec<HighlightSpan>> {
    let mut lines = vec![Vec::new()];
    for node in nodes {
        let fg = node
            .as_element()
            .and_then(|element| class_color(element.class_name()));
        let text = extract_text(node);
        for (index, piece) in text.split('\n').enumerate() {
            if index > 0 {
                lines.push(Vec::new());
            }
            if !piece.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.push(HighlightSpan {
                    text: piece.to_string(),
                    fg,
                });
            }
        }
    }
    lines
}
