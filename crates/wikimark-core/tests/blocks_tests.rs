//! Integration tests for callout, spoiler, fold and formula blocks

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use wikimark_core::{Format, Markdown, PluginKind};

fn engine() -> Markdown {
    Markdown::with_plugins(Format::Html, &PluginKind::ALL).unwrap()
}

fn html(input: &str) -> String {
    engine().render(input).unwrap().into_string()
}

fn spoiler(body: &str) -> String {
    format!(
        "<div class=\"spoiler\">\n  <button class=\"spoiler-button\" onclick=\"toggle_spoiler(this)\">\
         <i class=\"far fa-eye\"></i></button>\n  <p>{body}</p>\n</div>\n\n"
    )
}

fn fold(summary: &str, body: &str) -> String {
    format!(
        "<details class=\"collapse-panel\">\n<summary class=\"collapse-header\">\n{summary}\n</summary>\n\
         <div class=\"collapse-content\"><p>{body}</p></div></details>\n"
    )
}

// ============================================================================
// Fancy Block Tests
// ============================================================================

#[test]
fn test_fancy_block_with_title() {
    assert_eq!(
        html(":::info\n#### Title\nBody\n:::"),
        "<div class=\"alert alert-primary mb-20\" role=\"alert\">\
         <h4 class=\"alert-heading\">Title</h4>\n<p>Body</p></div>\n"
    );
}

#[rstest]
#[case(":::info\nx\n:::", "alert alert-primary")]
#[case("::: blue\nx\n:::", "alert alert-primary")]
#[case(":::warning\nx\n:::", "alert alert-secondary")]
#[case("::: RED\nx\n:::", "alert alert-danger")]
#[case(":::: success\nx\n::::", "alert alert-success")]
#[case(":::\nx\n:::", "alert")]
#[case("::: none\nx\n:::", "alert")]
#[case(":::purple\nx\n:::", "alert")]
fn test_fancy_block_families(#[case] input: &str, #[case] class: &str) {
    let out = html(input);
    assert!(
        out.starts_with(&format!("<div class=\"{class} mb-20\" role=\"alert\">\n")),
        "unexpected output: {out}"
    );
}

#[test]
fn test_fancy_block_headings_stay_out_of_toc() {
    let input = ":::info\n## Title\ntext\n## Inside\n:::\n\n# Outside\n";
    let toc = engine().toc(input).unwrap();
    let texts: Vec<_> = toc.iter().map(|entry| entry.text.as_str()).collect();
    assert_eq!(texts, vec!["Outside"]);
    assert!(html(input).contains("<p>text\n## Inside</p>"));
}

#[test]
fn test_unclosed_fancy_block_runs_to_end() {
    assert_eq!(
        html(":::info\nBody"),
        "<div class=\"alert alert-primary mb-20\" role=\"alert\">\n<p>Body</p></div>\n"
    );
}

#[test]
fn test_empty_fancy_block() {
    assert_eq!(
        html(":::info\n:::"),
        "<div class=\"alert alert-primary mb-20\" role=\"alert\">\n</div>\n"
    );
}

#[test]
fn test_fancy_block_then_paragraph() {
    assert_eq!(
        html(":::\nA\n:::\n\nAfter"),
        "<div class=\"alert mb-20\" role=\"alert\">\n<p>A</p></div>\n<p>After</p>\n"
    );
}

#[test]
fn test_nested_fancy_blocks() {
    let out = html("::: info\n::: warning\nx\n:::\n:::");
    assert_eq!(
        out,
        "<div class=\"alert alert-primary mb-20\" role=\"alert\">\n\
         <div class=\"alert alert-secondary mb-20\" role=\"alert\">\n<p>x</p></div></div>\n"
    );
    assert!(!out.contains("\"alert mb-20\""));
}

#[test]
fn test_fancy_block_body_is_markup() {
    let out = html("::: success\n- one\n- **two**\n:::");
    assert!(out.contains("<ul>\n<li>one</li>\n<li><strong>two</strong></li>\n</ul>"));
}

#[test]
fn test_fancy_block_title_is_escaped() {
    let out = html(":::\n# Fish & Chips\nx\n:::");
    assert!(out.contains("<h4 class=\"alert-heading\">Fish &amp; Chips</h4>"));
}

#[test]
fn test_fancy_block_ast() {
    let md = Markdown::with_plugins(Format::Ast, &[PluginKind::FancyBlocks]).unwrap();
    let rendered = md.render(":::info\n#### Title\nBody\n:::").unwrap();
    let node = serde_json::to_value(&rendered.as_ast().unwrap()[0]).unwrap();
    assert_eq!(
        node,
        json!({
            "type": "fancy_block",
            "family": "info",
            "header": "Title",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "text", "text": "Body"}]
            }]
        })
    );
}

// ============================================================================
// Spoiler Tests
// ============================================================================

#[test]
fn test_spoiler_strips_prefix() {
    assert_eq!(html(">! secret text"), spoiler("secret text"));
}

#[test]
fn test_multi_line_spoiler() {
    assert_eq!(html(">! one\n>!two"), spoiler("one\ntwo"));
}

#[test]
fn test_spoiler_body_is_markup() {
    assert_eq!(html(">! the *butler*"), spoiler("the <em>butler</em>"));
}

#[test]
fn test_spoiler_then_quote() {
    let out = html(">! hidden\n> quoted");
    assert_eq!(
        out,
        format!("{}<blockquote>\n<p>quoted</p>\n</blockquote>\n", spoiler("hidden"))
    );
}

#[test]
fn test_spoiler_without_plugin_is_a_quote() {
    let md = Markdown::new(Format::Html).unwrap();
    assert_eq!(
        md.render(">! x").unwrap().into_string(),
        "<blockquote>\n<p>! x</p>\n</blockquote>\n"
    );
}

// ============================================================================
// Fold Tests
// ============================================================================

#[test]
fn test_fold_with_summary() {
    assert_eq!(html(">| #### Summary\n>| detail"), fold("Summary", "detail"));
}

#[test]
fn test_fold_without_heading_uses_ellipsis() {
    assert_eq!(html(">| just text"), fold("...", "just text"));
}

#[test]
fn test_fold_lines_are_right_trimmed() {
    assert_eq!(
        html(">| # Head\n>| a   \n>| b"),
        fold("Head", "a\nb")
    );
}

#[test]
fn test_fold_summary_is_escaped() {
    assert_eq!(html(">| ## A & B\n>| x"), fold("A &amp; B", "x"));
}

#[test]
fn test_fold_six_hashes_is_not_a_summary() {
    let out = html(">| ###### six\n>| x");
    assert!(out.contains("<summary class=\"collapse-header\">\n...\n</summary>"));
}

#[test]
fn test_fold_ast_header() {
    let md = Markdown::with_plugins(Format::Ast, &[PluginKind::Fold]).unwrap();
    let with = md.render(">| # Head\n>| body").unwrap();
    let without = md.render(">| body").unwrap();
    assert_eq!(with.as_ast().unwrap()[0].param("header"), Some(&json!("Head")));
    assert_eq!(without.as_ast().unwrap()[0].param("header"), Some(&json!(null)));
}

// ============================================================================
// Math Block Tests
// ============================================================================

#[test]
fn test_math_block_is_verbatim() {
    assert_eq!(html("$$a^2+b^2=c^2$$"), "\n\\[a^2+b^2=c^2\\]\n");
}

#[test]
fn test_multi_line_math_block_is_not_markup() {
    assert_eq!(
        html("$$\nx_1 * y_2 * z\n$$"),
        "\n\\[\nx_1 * y_2 * z\n\\]\n"
    );
}

#[test]
fn test_math_block_escapes_html() {
    assert_eq!(html("$$a<b$$"), "\n\\[a&lt;b\\]\n");
}

#[test]
fn test_math_block_between_paragraphs() {
    assert_eq!(
        html("before\n\n$$x$$\n\nafter"),
        "<p>before</p>\n\n\\[x\\]\n<p>after</p>\n"
    );
}
