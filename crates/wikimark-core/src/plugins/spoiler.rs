//! Spoilers: consecutive lines prefixed with `>!`.

use regex::Captures;

use crate::ast::{Block, Container};
use crate::block::{BlockParser, BlockScope};
use crate::error::Result;
use crate::markdown::Markdown;
use crate::rules::Matched;
use crate::state::ParseState;

use super::strip_line_marker;

/// One or more `>!` lines.
pub const SPOILER_BLOCK: &str = r"(?: {0,3}>![^\n]*(?:\n|$))+";

/// Insert `spoiler_block` ahead of `block_quote`.
pub fn register(md: &mut Markdown) -> Result<()> {
    // Both start with `>`; the spoiler must win.
    md.block_mut().rules_mut().insert_before(
        "block_quote",
        BlockParser::rule("spoiler_block", SPOILER_BLOCK, parse_spoiler_block)?,
    )?;
    Ok(())
}

fn parse_spoiler_block(
    scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let text = strip_line_marker(&caps[0], ">!");
    let children = scope.parse(text.trim(), state)?;
    Ok(Some(Matched::node(
        Block::SpoilerBlock(Container { children }),
        caps[0].len(),
    )))
}
