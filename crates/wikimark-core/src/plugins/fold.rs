//! Collapsible blocks: consecutive lines prefixed with `>|`.
//!
//! A heading on the first line becomes the summary; without one the summary
//! is an ellipsis.

use regex::Captures;

use crate::ast::{Block, FoldBlock};
use crate::block::{BlockParser, BlockScope};
use crate::error::Result;
use crate::markdown::Markdown;
use crate::rules::Matched;
use crate::state::ParseState;

use super::{split_heading_line, strip_line_marker};

/// One or more `>|` lines.
pub const FOLD_BLOCK: &str = r"(?: {0,3}>\|[^\n]*(?:\n|$))+";

/// Insert `fold_block` ahead of `block_quote`.
pub fn register(md: &mut Markdown) -> Result<()> {
    md.block_mut().rules_mut().insert_before(
        "block_quote",
        BlockParser::rule("fold_block", FOLD_BLOCK, parse_fold_block)?,
    )?;
    Ok(())
}

fn parse_fold_block(
    scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let stripped = strip_line_marker(&caps[0], ">|");
    let (header, body) = split_heading_line(stripped.trim());
    let body = body
        .trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    let children = scope.parse(&body, state)?;
    Ok(Some(Matched::node(
        Block::FoldBlock(FoldBlock { header, children }),
        caps[0].len(),
    )))
}
