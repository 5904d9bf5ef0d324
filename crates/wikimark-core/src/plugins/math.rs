//! Formulas: `$$…$$` blocks and `$…$` inline spans.
//!
//! The source between the delimiters is kept verbatim and rendered inside
//! `\[…\]` or `\(…\)` for a client-side formula renderer.

use regex::Captures;

use crate::ast::{Block, Inline, MathBlock};
use crate::block::{BlockParser, BlockScope};
use crate::error::Result;
use crate::inline::{Cursor, InlineParser, PUNCTUATION};
use crate::markdown::Markdown;
use crate::rules::Matched;
use crate::state::ParseState;

/// `$$` to `$$`, across lines, followed by the end of the line.
pub const MATH_BLOCK: &str = r"(?s) {0,3}\$\$((?:\\.|[^\\])*?)\$\$[ \t]*(?:\n+|$)";

/// `$` followed by non-space, closed by `$` preceded by non-space.
pub fn math_inline_pattern() -> String {
    format!(r"\$([^\s$](?:(?:\\\$|[^$])*(?:\\[{PUNCTUATION}]|[^\s$]))?)\$")
}

/// Append the `math_block` and `math_inline` rules.
pub fn register(md: &mut Markdown) -> Result<()> {
    md.block_mut()
        .rules_mut()
        .append(BlockParser::rule("math_block", MATH_BLOCK, parse_math_block)?)?;
    md.inline_mut().rules_mut().append(InlineParser::rule(
        "math_inline",
        &math_inline_pattern(),
        parse_math_inline,
    )?)?;
    Ok(())
}

fn parse_math_block(
    _scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let block = MathBlock {
        text: caps[1].to_string(),
    };
    Ok(Some(Matched::node(Block::MathBlock(block), caps[0].len())))
}

fn parse_math_inline(
    _parser: &InlineParser,
    _cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    Ok(Some(Matched::node(
        Inline::MathInline(caps[1].to_string()),
        caps[0].len(),
    )))
}
