//! Highlighted text: `==marked==`.

use regex::Captures;

use crate::ast::Inline;
use crate::error::Result;
use crate::inline::{Cursor, InlineParser, PUNCTUATION};
use crate::markdown::Markdown;
use crate::rules::Matched;
use crate::state::ParseState;

/// Opening `==` followed by non-space, closing `==` preceded by non-space.
pub fn mark_pattern() -> String {
    format!(r"==([^\s=](?:(?:\\=|[^=])*(?:\\[{PUNCTUATION}]|[^\s=]))?)==")
}

/// Insert the `mark` inline rule after `codespan`.
pub fn register(md: &mut Markdown) -> Result<()> {
    md.inline_mut().rules_mut().insert_after(
        "codespan",
        InlineParser::rule("mark", &mark_pattern(), parse_mark)?,
    )?;
    Ok(())
}

fn parse_mark(
    parser: &InlineParser,
    _cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let children = parser.parse(&caps[1], state)?;
    Ok(Some(Matched::node(Inline::Mark(children), caps[0].len())))
}
