use regex::Regex;
use serde::Deserialize;

// One node of the editor's document tree. Unknown fields are ignored so
// any editor payload deserializes; a node with no type is not a block.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DocNode {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Vec<DocNode>,
}

// Node types that mark a block boundary in the output
const BLOCK_TYPES: [&str; 7] = [
    "paragraph",
    "heading",
    "blockquote",
    "codeBlock",
    "listItem",
    "bulletList",
    "orderedList",
];

/// Reduce a document tree to normalized plain text. Total: a missing
/// document yields the empty string and malformed nodes never panic.
pub fn extract_text(doc: Option<&DocNode>) -> String {
    let mut out = String::new();
    if let Some(node) = doc {
        walk(node, &mut out);
    }

    // NBSP to plain space
    let out = out.replace('\u{a0}', " ");

    // Trailing whitespace before a newline collapses into the newline;
    // blank lines themselves survive for the rule below
    let out = Regex::new(r"[^\S\n]+\n").unwrap().replace_all(&out, "\n");

    // Three or more blank-line separators squeeze down to one
    let out = Regex::new(r"\n{3,}").unwrap().replace_all(&out, "\n\n");

    out.trim().to_string()
}

fn walk(node: &DocNode, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in &node.content {
        walk(child, out);
    }
    // Block boundary after the whole subtree
    if let Some(kind) = &node.kind {
        if BLOCK_TYPES.contains(&kind.as_str()) {
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(t: &str) -> DocNode {
        DocNode {
            kind: Some("text".to_string()),
            text: Some(t.to_string()),
            content: vec![],
        }
    }

    fn block(kind: &str, content: Vec<DocNode>) -> DocNode {
        DocNode {
            kind: Some(kind.to_string()),
            text: None,
            content,
        }
    }

    fn doc(content: Vec<DocNode>) -> DocNode {
        DocNode {
            kind: Some("doc".to_string()),
            text: None,
            content,
        }
    }

    #[test]
    fn test_missing_document_is_empty() {
        assert_eq!(extract_text(None), "");
    }

    #[test]
    fn test_document_without_text_nodes_is_empty() {
        let d = doc(vec![block("paragraph", vec![]), block("paragraph", vec![])]);
        assert_eq!(extract_text(Some(&d)), "");
    }

    #[test]
    fn test_paragraphs_become_lines_in_document_order() {
        let d = doc(vec![
            block("paragraph", vec![text("Buy milk")]),
            block("paragraph", vec![text("Call the bank")]),
        ]);
        assert_eq!(extract_text(Some(&d)), "Buy milk\nCall the bank");
    }

    #[test]
    fn test_nested_list_blocks_do_not_stack_blank_lines() {
        let d = doc(vec![block(
            "bulletList",
            vec![
                block("listItem", vec![block("paragraph", vec![text("one")])]),
                block("listItem", vec![block("paragraph", vec![text("two")])]),
            ],
        )]);
        // listItem and paragraph both emit a newline; runs of three or
        // more collapse to a single blank line at most
        assert_eq!(extract_text(Some(&d)), "one\n\ntwo");
    }

    #[test]
    fn test_unknown_type_is_not_a_block() {
        let d = doc(vec![block(
            "paragraph",
            vec![text("Hello "), block("mention", vec![text("world")])],
        )]);
        assert_eq!(extract_text(Some(&d)), "Hello world");
    }

    #[test]
    fn test_nbsp_and_trailing_whitespace_normalize() {
        let d = doc(vec![
            block("paragraph", vec![text("a\u{a0}b   ")]),
            block("paragraph", vec![text("c")]),
        ]);
        assert_eq!(extract_text(Some(&d)), "a b\nc");
    }

    #[test]
    fn test_node_with_neither_text_nor_type() {
        let d = DocNode::default();
        assert_eq!(extract_text(Some(&d)), "");
    }

    #[test]
    fn test_deserializes_editor_json() {
        let raw = r#"{
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 1},
                 "content": [{"type": "text", "text": "Today"}]},
                {"type": "paragraph",
                 "content": [{"type": "text", "text": "Buy milk"}]}
            ]
        }"#;
        let d: DocNode = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(Some(&d)), "Today\nBuy milk");
    }
}
