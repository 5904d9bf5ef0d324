//! Integration tests for the AST projection

use pretty_assertions::assert_eq;
use serde_json::json;
use wikimark_core::{AstNode, Format, Markdown, PluginKind, Rendered};

fn ast(input: &str) -> Vec<AstNode> {
    let md = Markdown::with_plugins(Format::Ast, &PluginKind::ALL).unwrap();
    match md.render(input).unwrap() {
        Rendered::Ast(nodes) => nodes,
        other => panic!("expected AST output, got {other:?}"),
    }
}

fn to_json(node: &AstNode) -> serde_json::Value {
    serde_json::to_value(node).unwrap()
}

#[test]
fn test_heading_node() {
    let nodes = ast("# Hi");
    assert_eq!(
        to_json(&nodes[0]),
        json!({
            "type": "heading",
            "level": 1,
            "anchor": "hi",
            "children": [{"type": "text", "text": "Hi"}]
        })
    );
}

#[test]
fn test_paragraph_with_inline_nodes() {
    let nodes = ast("Text ==m== and $x$ with [a](/b \"t\")");
    assert_eq!(
        to_json(&nodes[0]),
        json!({
            "type": "paragraph",
            "children": [
                {"type": "text", "text": "Text "},
                {"type": "mark", "children": [{"type": "text", "text": "m"}]},
                {"type": "text", "text": " and "},
                {"type": "math_inline", "text": "x"},
                {"type": "text", "text": " with "},
                {
                    "type": "link",
                    "url": "/b",
                    "title": "t",
                    "children": [{"type": "text", "text": "a"}]
                }
            ]
        })
    );
}

#[test]
fn test_code_and_math_blocks_keep_text() {
    let nodes = ast("```py\nprint(1)\n```\n\n$$a^2$$");
    assert_eq!(
        to_json(&nodes[0]),
        json!({"type": "block_code", "text": "print(1)\n", "info": "py"})
    );
    assert_eq!(to_json(&nodes[1]), json!({"type": "math_block", "text": "a^2"}));
}

#[test]
fn test_ordered_list_params() {
    let nodes = ast("2. a\n3. b");
    let list = &nodes[0];
    assert_eq!(list.kind, "list");
    assert_eq!(list.param("ordered"), Some(&json!(true)));
    assert_eq!(list.param("tight"), Some(&json!(true)));
    assert_eq!(list.param("start"), Some(&json!(2)));
    assert_eq!(list.children.as_ref().map(Vec::len), Some(2));
}

#[test]
fn test_spoiler_and_thematic_break() {
    let nodes = ast(">! hidden\n\n***");
    assert_eq!(
        to_json(&nodes[0]),
        json!({
            "type": "spoiler_block",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "text", "text": "hidden"}]
            }]
        })
    );
    assert_eq!(to_json(&nodes[1]), json!({"type": "thematic_break"}));
}

#[test]
fn test_walk_visits_every_node() {
    let nodes = ast("> - [x] ==done==");
    let kinds: Vec<_> = nodes[0].walk().map(|node| node.kind).collect();
    assert_eq!(
        kinds,
        vec![
            "block_quote",
            "list",
            "task_list_item",
            "block_text",
            "mark",
            "text",
        ]
    );
}

#[test]
fn test_ast_into_string_is_json() {
    let md = Markdown::new(Format::Ast).unwrap();
    let out = md.render("hi").unwrap().into_string();
    assert_eq!(
        out,
        r#"[{"type":"paragraph","children":[{"type":"text","text":"hi"}]}]"#
    );
}

#[test]
fn test_render_inline_in_both_formats() {
    let html = Markdown::new(Format::Html).unwrap();
    let mut state = html.new_state();
    assert_eq!(
        html.render_inline("*a*", &mut state).unwrap(),
        Rendered::Html("<em>a</em>".into())
    );

    let ast = Markdown::new(Format::Ast).unwrap();
    let mut state = ast.new_state();
    let rendered = ast.render_inline("*a*", &mut state).unwrap();
    assert_eq!(
        serde_json::to_value(&rendered).unwrap(),
        json!([{"type": "emphasis", "children": [{"type": "text", "text": "a"}]}])
    );
}
