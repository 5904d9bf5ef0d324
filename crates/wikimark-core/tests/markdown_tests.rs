//! Integration tests for the base block and inline parsers

use pretty_assertions::assert_eq;
use rstest::rstest;
use wikimark_core::{Format, Markdown, TocEntry};

fn html(input: &str) -> String {
    let md = Markdown::new(Format::Html).unwrap();
    md.render(input).unwrap().into_string()
}

fn toc_entry(level: u8, text: &str, anchor: &str) -> TocEntry {
    TocEntry {
        level,
        text: text.to_string(),
        anchor: anchor.to_string(),
    }
}

// ============================================================================
// Heading Tests
// ============================================================================

#[rstest]
#[case("# Hello World", "<h1 id=\"hello-world\">Hello World</h1>\n")]
#[case("### Three ###", "<h3 id=\"three\">Three</h3>\n")]
#[case("Title\n=====", "<h1 id=\"title\">Title</h1>\n")]
#[case("Sub\n---", "<h2 id=\"sub\">Sub</h2>\n")]
#[case("#hashtag", "<p>#hashtag</p>\n")]
#[case("####### Seven", "<p>####### Seven</p>\n")]
fn test_headings(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(html(input), expected);
}

#[test]
fn test_duplicate_headings_get_unique_anchors() {
    assert_eq!(
        html("# A\n# A"),
        "<h1 id=\"a\">A</h1>\n<h1 id=\"a-1\">A</h1>\n"
    );
}

#[test]
fn test_toc_collects_headings_in_order() {
    let md = Markdown::new(Format::Html).unwrap();
    let toc = md.toc("# Intro\n\ntext\n\n## Setup\n## Setup\n# !!!\n").unwrap();
    assert_eq!(
        toc,
        vec![
            toc_entry(1, "Intro", "intro"),
            toc_entry(2, "Setup", "setup"),
            toc_entry(2, "Setup", "setup-1"),
            toc_entry(1, "!!!", "section"),
        ]
    );
}

#[test]
fn test_toc_anchor_never_collides_with_literal_suffix() {
    let md = Markdown::new(Format::Html).unwrap();
    let anchors: Vec<String> = md
        .toc("# A\n# A\n# A-1\n")
        .unwrap()
        .into_iter()
        .map(|entry| entry.anchor)
        .collect();
    assert_eq!(anchors, vec!["a", "a-1", "a-1-1"]);
}

// ============================================================================
// Paragraph and Leaf Block Tests
// ============================================================================

#[test]
fn test_paragraphs_split_on_blank_lines() {
    assert_eq!(
        html("line one\nline two\n\nsecond"),
        "<p>line one\nline two</p>\n<p>second</p>\n"
    );
}

#[test]
fn test_empty_document() {
    assert_eq!(html(""), "");
    assert_eq!(html("\n\n  \n"), "");
}

#[test]
fn test_crlf_is_normalized() {
    assert_eq!(html("a\r\nb\r\n\r\nc"), html("a\nb\n\nc"));
}

#[test]
fn test_thematic_break() {
    assert_eq!(html("a\n\n---\n\nb"), "<p>a</p>\n<hr />\n<p>b</p>\n");
}

#[test]
fn test_fenced_code_block() {
    assert_eq!(
        html("```rust\nfn main() {}\n```"),
        "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
    );
}

#[test]
fn test_fenced_code_is_escaped_and_verbatim() {
    assert_eq!(
        html("~~~\n<b>*not em*</b>\n~~~"),
        "<pre><code>&lt;b&gt;*not em*&lt;/b&gt;\n</code></pre>\n"
    );
}

#[test]
fn test_unclosed_fence_runs_to_end() {
    assert_eq!(html("```\nno end"), "<pre><code>no end\n</code></pre>\n");
}

#[test]
fn test_block_quote() {
    assert_eq!(
        html("> quoted\n> text"),
        "<blockquote>\n<p>quoted\ntext</p>\n</blockquote>\n"
    );
}

#[test]
fn test_nested_block_quote() {
    assert_eq!(
        html("> > inner"),
        "<blockquote>\n<blockquote>\n<p>inner</p>\n</blockquote>\n</blockquote>\n"
    );
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_tight_unordered_list() {
    assert_eq!(html("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
}

#[rstest]
#[case("1. one", "<ol>\n<li>one</li>\n</ol>\n")]
#[case("3. three\n4. four", "<ol start=\"3\">\n<li>three</li>\n<li>four</li>\n</ol>\n")]
#[case("1) paren", "<ol>\n<li>paren</li>\n</ol>\n")]
fn test_ordered_lists(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(html(input), expected);
}

#[test]
fn test_loose_list_keeps_paragraphs() {
    assert_eq!(
        html("- a\n\n- b\n"),
        "<ul>\n<li><p>a</p>\n</li>\n<li><p>b</p>\n</li>\n</ul>\n"
    );
}

#[test]
fn test_nested_list() {
    assert_eq!(
        html("- a\n  - b\n- c"),
        "<ul>\n<li>a<ul>\n<li>b</li>\n</ul>\n</li>\n<li>c</li>\n</ul>\n"
    );
}

#[test]
fn test_lazy_continuation_line() {
    assert_eq!(html("- a\ncontinued"), "<ul>\n<li>a\ncontinued</li>\n</ul>\n");
}

#[test]
fn test_different_bullet_starts_new_list() {
    assert_eq!(
        html("- a\n+ b"),
        "<ul>\n<li>a</li>\n</ul>\n<ul>\n<li>b</li>\n</ul>\n"
    );
}

// ============================================================================
// Inline Tests
// ============================================================================

#[test]
fn test_emphasis_strong_and_code() {
    assert_eq!(
        html("*em* **strong** `code`"),
        "<p><em>em</em> <strong>strong</strong> <code>code</code></p>\n"
    );
}

#[test]
fn test_text_is_escaped() {
    assert_eq!(html("a < b & c > d"), "<p>a &lt; b &amp; c &gt; d</p>\n");
}

#[test]
fn test_link_with_title() {
    assert_eq!(
        html("[site](https://example.com \"Home\")"),
        "<p><a href=\"https://example.com\" title=\"Home\">site</a></p>\n"
    );
}

#[test]
fn test_auto_link() {
    assert_eq!(
        html("<https://example.com>"),
        "<p><a href=\"https://example.com\">https://example.com</a></p>\n"
    );
}

#[rstest]
#[case("[x](javascript:alert)")]
#[case("[x](JavaScript:alert)")]
#[case("[x](vbscript:msgbox)")]
#[case("[x](data:text/html)")]
fn test_harmful_links_are_neutralized(#[case] input: &str) {
    assert_eq!(html(input), "<p><a href=\"#harmful-link\">x</a></p>\n");
}

#[test]
fn test_hard_line_break() {
    assert_eq!(html("a  \nb"), "<p>a<br />\nb</p>\n");
    assert_eq!(html("a\\\nb"), "<p>a<br />\nb</p>\n");
}

#[test]
fn test_trailing_break_markers_are_dropped() {
    assert_eq!(html("a  "), "<p>a</p>\n");
}

#[test]
fn test_unmatched_delimiters_stay_literal() {
    assert_eq!(html("2 * 3 * 4"), "<p>2 * 3 * 4</p>\n");
    assert_eq!(html("snake_case_name"), "<p>snake_case_name</p>\n");
}
