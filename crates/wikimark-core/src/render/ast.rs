//! AST projection: blocks and their parsed inlines as [`AstNode`]s.

use serde_json::Value;

use super::AstNode;
use crate::ast::{Block, Inline, ListKind};
use crate::error::Result;
use crate::markdown::Markdown;
use crate::state::ParseState;

/// Project blocks, parsing leaf text as it is reached.
pub fn render_blocks(md: &Markdown, blocks: &[Block], state: &mut ParseState) -> Result<Vec<AstNode>> {
    blocks
        .iter()
        .map(|block| render_block(md, block, state))
        .collect()
}

fn render_block(md: &Markdown, block: &Block, state: &mut ParseState) -> Result<AstNode> {
    let node = AstNode::new(block.kind());
    let node = match block {
        Block::Paragraph(p) | Block::BlockText(p) => node.with_children(inlines(md, &p.text, state)?),
        Block::Heading(h) => node
            .with_children(inlines(md, &h.text, state)?)
            .with_param("level", h.level)
            .with_param("anchor", h.anchor.as_str()),
        Block::ThematicBreak => node,
        Block::CodeBlock(code) => {
            let node = node.with_text(code.code.as_str());
            match &code.info {
                Some(info) => node.with_param("info", info.as_str()),
                None => node,
            }
        }
        Block::BlockQuote(c) | Block::ListItem(c) | Block::Footnotes(c) | Block::SpoilerBlock(c) => {
            node.with_children(render_blocks(md, &c.children, state)?)
        }
        Block::List(list) => {
            let node = node
                .with_children(render_blocks(md, &list.items, state)?)
                .with_param("ordered", list.kind == ListKind::Ordered)
                .with_param("tight", list.tight);
            match list.start {
                Some(start) => node.with_param("start", start),
                None => node,
            }
        }
        Block::TaskListItem(item) => node
            .with_children(render_blocks(md, &item.children, state)?)
            .with_param("checked", item.checked),
        Block::FootnoteItem(item) => node
            .with_children(render_blocks(md, &item.children, state)?)
            .with_param("key", item.key.as_str())
            .with_param("ordinal", item.ordinal)
            .with_param("refs", item.refs.clone()),
        Block::FancyBlock(fancy) => node
            .with_children(render_blocks(md, &fancy.children, state)?)
            .with_param("family", fancy.family.as_str())
            .with_param("header", optional(fancy.header.as_deref())),
        Block::FoldBlock(fold) => node
            .with_children(render_blocks(md, &fold.children, state)?)
            .with_param("header", optional(fold.header.as_deref())),
        Block::MathBlock(math) => node.with_text(math.text.as_str()),
    };
    Ok(node)
}

fn optional(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

fn inlines(md: &Markdown, text: &str, state: &mut ParseState) -> Result<Vec<AstNode>> {
    let parsed = md.inline().parse(text, state)?;
    Ok(project_inlines(&parsed))
}

/// Project already-parsed inline nodes.
pub fn project_inlines(inlines: &[Inline]) -> Vec<AstNode> {
    inlines.iter().map(project_inline).collect()
}

fn project_inline(inline: &Inline) -> AstNode {
    let node = AstNode::new(inline.kind());
    match inline {
        Inline::Text(text) | Inline::CodeSpan(text) | Inline::MathInline(text) => {
            node.with_text(text.as_str())
        }
        Inline::Emphasis(children) | Inline::Strong(children) | Inline::Mark(children) => {
            node.with_children(project_inlines(children))
        }
        Inline::Link(link) => {
            let node = node
                .with_children(project_inlines(&link.children))
                .with_param("url", link.url.as_str());
            match &link.title {
                Some(title) => node.with_param("title", title.as_str()),
                None => node,
            }
        }
        Inline::LineBreak => node,
        Inline::FootnoteRef(r) => node
            .with_param("key", r.key.as_str())
            .with_param("ordinal", r.ordinal)
            .with_param("index", r.index),
    }
}
