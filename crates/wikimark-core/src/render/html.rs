//! HTML renderer.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::ast::{Block, FootnoteItem, Inline, ListKind};
use crate::error::Result;
use crate::markdown::Markdown;
use crate::plugins::{fancy_blocks, footnotes};
use crate::state::ParseState;

const HARMFUL_PROTOCOLS: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Render blocks to HTML, parsing leaf text as it is reached.
pub fn render_blocks(md: &Markdown, blocks: &[Block], state: &mut ParseState) -> Result<String> {
    let mut out = String::new();
    for block in blocks {
        render_block(md, block, state, &mut out)?;
    }
    Ok(out)
}

fn render_block(md: &Markdown, block: &Block, state: &mut ParseState, out: &mut String) -> Result<()> {
    match block {
        Block::Paragraph(p) => {
            out.push_str("<p>");
            render_text(md, &p.text, state, out)?;
            out.push_str("</p>\n");
        }
        Block::BlockText(p) => render_text(md, &p.text, state, out)?,
        Block::Heading(h) => {
            out.push_str(&format!(
                "<h{} id=\"{}\">",
                h.level,
                encode_double_quoted_attribute(&h.anchor)
            ));
            render_text(md, &h.text, state, out)?;
            out.push_str(&format!("</h{}>\n", h.level));
        }
        Block::ThematicBreak => out.push_str("<hr />\n"),
        Block::CodeBlock(code) => {
            out.push_str("<pre><code");
            if let Some(lang) = code.info.as_deref().and_then(|info| info.split_whitespace().next()) {
                out.push_str(&format!(
                    " class=\"language-{}\"",
                    encode_double_quoted_attribute(lang)
                ));
            }
            out.push('>');
            out.push_str(&encode_text(&code.code));
            out.push_str("</code></pre>\n");
        }
        Block::BlockQuote(quote) => {
            out.push_str("<blockquote>\n");
            out.push_str(&render_blocks(md, &quote.children, state)?);
            out.push_str("</blockquote>\n");
        }
        Block::List(list) => {
            let tag = match list.kind {
                ListKind::Ordered => "ol",
                ListKind::Unordered => "ul",
            };
            match list.start {
                Some(start) if start != 1 => out.push_str(&format!("<{tag} start=\"{start}\">\n")),
                _ => out.push_str(&format!("<{tag}>\n")),
            }
            out.push_str(&render_blocks(md, &list.items, state)?);
            out.push_str(&format!("</{tag}>\n"));
        }
        Block::ListItem(item) => {
            out.push_str("<li>");
            out.push_str(&render_blocks(md, &item.children, state)?);
            out.push_str("</li>\n");
        }
        Block::TaskListItem(item) => {
            let checkbox = if item.checked {
                r#"<input class="task-list-item-checkbox" type="checkbox" checked/>"#
            } else {
                r#"<input class="task-list-item-checkbox" type="checkbox"/>"#
            };
            let text = render_blocks(md, &item.children, state)?;
            let text = match text.strip_prefix("<p>") {
                Some(rest) => format!("<p>{checkbox}{rest}"),
                None => format!("{checkbox}{text}"),
            };
            out.push_str(&format!("<li class=\"task-list-item\">{text}</li>\n"));
        }
        Block::Footnotes(section) => {
            out.push_str("<hr/><section class=\"footnotes\">\n<ol>\n");
            for (i, child) in section.children.iter().enumerate() {
                match child {
                    Block::FootnoteItem(item) => render_footnote_item(md, item, i + 1, state, out)?,
                    other => render_block(md, other, state, out)?,
                }
            }
            out.push_str("</ol>\n</section>\n");
        }
        Block::FootnoteItem(item) => render_footnote_item(md, item, item.ordinal, state, out)?,
        Block::FancyBlock(fancy) => {
            let class = fancy_blocks::alert_class(&fancy.family);
            let header = match &fancy.header {
                Some(header) => format!(
                    "<h4 class=\"alert-heading\">{}</h4>",
                    render_inline_text(md, header, state)?
                ),
                None => String::new(),
            };
            let body = render_blocks(md, &fancy.children, state)?;
            out.push_str(&format!(
                "<div class=\"{class} mb-20\" role=\"alert\">{header}\n{}</div>\n",
                body.trim()
            ));
        }
        Block::SpoilerBlock(spoiler) => {
            let body = render_blocks(md, &spoiler.children, state)?;
            out.push_str(&format!(
                "<div class=\"spoiler\">\n  <button class=\"spoiler-button\" onclick=\"toggle_spoiler(this)\"><i class=\"far fa-eye\"></i></button>\n  <p>{}</p>\n</div>\n\n",
                unwrap_paragraph(&body)
            ));
        }
        Block::FoldBlock(fold) => {
            let header = match &fold.header {
                Some(header) => render_inline_text(md, header, state)?,
                None => "...".to_string(),
            };
            let body = render_blocks(md, &fold.children, state)?;
            out.push_str(&format!(
                "<details class=\"collapse-panel\">\n<summary class=\"collapse-header\">\n{header}\n</summary>\n<div class=\"collapse-content\"><p>{}</p></div></details>\n",
                unwrap_paragraph(&body)
            ));
        }
        Block::MathBlock(math) => {
            out.push_str(&format!("\n\\[{}\\]\n", encode_text(&math.text)));
        }
    }
    Ok(())
}

fn render_footnote_item(
    md: &Markdown,
    item: &FootnoteItem,
    position: usize,
    state: &mut ParseState,
    out: &mut String,
) -> Result<()> {
    let back = footnotes::back_links(&item.refs);
    let body = render_blocks(md, &item.children, state)?;
    let body = body.trim_end();
    let text = match body.strip_prefix("<p>") {
        Some(rest) => format!("<p>{back}{rest}"),
        None => format!("{back}{body}"),
    };
    // Only definitions with references are listed, so the list position
    // can fall behind the declaration ordinal.
    let value = if position == item.ordinal {
        String::new()
    } else {
        format!(" value=\"{}\"", item.ordinal)
    };
    out.push_str(&format!("<li id=\"fn-{}\"{value}>{text}</li>\n", item.ordinal));
    Ok(())
}

/// Trimmed HTML with one wrapping paragraph tag pair removed.
fn unwrap_paragraph(html: &str) -> &str {
    let html = html.trim();
    let html = html.strip_prefix("<p>").unwrap_or(html);
    html.strip_suffix("</p>").unwrap_or(html)
}

fn render_text(md: &Markdown, text: &str, state: &mut ParseState, out: &mut String) -> Result<()> {
    let inlines = md.inline().parse(text, state)?;
    render_inlines_into(&inlines, out);
    Ok(())
}

fn render_inline_text(md: &Markdown, text: &str, state: &mut ParseState) -> Result<String> {
    let mut out = String::new();
    render_text(md, text, state, &mut out)?;
    Ok(out)
}

/// Render inline nodes to HTML.
pub fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    render_inlines_into(inlines, &mut out);
    out
}

fn render_inlines_into(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        render_inline(inline, out);
    }
}

fn render_inline(inline: &Inline, out: &mut String) {
    match inline {
        Inline::Text(text) => out.push_str(&encode_text(text)),
        Inline::CodeSpan(code) => {
            out.push_str("<code>");
            out.push_str(&encode_text(code));
            out.push_str("</code>");
        }
        Inline::Emphasis(children) => wrap("em", children, out),
        Inline::Strong(children) => wrap("strong", children, out),
        Inline::Mark(children) => wrap("mark", children, out),
        Inline::Link(link) => {
            out.push_str(&format!("<a href=\"{}\"", safe_url(&link.url)));
            if let Some(title) = &link.title {
                out.push_str(&format!(" title=\"{}\"", encode_double_quoted_attribute(title)));
            }
            out.push('>');
            render_inlines_into(&link.children, out);
            out.push_str("</a>");
        }
        Inline::LineBreak => out.push_str("<br />\n"),
        Inline::FootnoteRef(r) => out.push_str(&format!(
            "<sup class=\"footnote-ref\" id=\"fnref-{}\"><a href=\"#fn-{}\">{}</a></sup>",
            r.index, r.ordinal, r.ordinal
        )),
        Inline::MathInline(math) => {
            out.push_str("\\(");
            out.push_str(&encode_text(math));
            out.push_str("\\)");
        }
    }
}

fn wrap(tag: &str, children: &[Inline], out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    render_inlines_into(children, out);
    out.push_str(&format!("</{tag}>"));
}

/// Escape a link destination, replacing script-capable schemes.
pub fn safe_url(url: &str) -> String {
    let lower = url.trim().to_ascii_lowercase();
    if HARMFUL_PROTOCOLS.iter().any(|p| lower.starts_with(p)) {
        return "#harmful-link".to_string();
    }
    encode_double_quoted_attribute(url).into_owned()
}
