//! Callout blocks fenced with `:::` (or `~~~`).
//!
//! ```text
//! ::: warning
//! #### Careful
//! Body text.
//! :::
//! ```
//!
//! The family keyword picks the alert class. A leading heading line becomes
//! the callout title; the body is parsed without heading rules so callouts
//! never add entries to the table of contents.
//!
//! Callouts nest: an inner fence carrying a family keyword opens a level,
//! and each bare closing fence closes the innermost open level.
//!
//! Tilde fences are claimed by fenced code first whenever that rule is
//! active.

use regex::Captures;

use crate::ast::{Block, FancyBlock};
use crate::block::{BlockParser, BlockScope};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::markdown::Markdown;
use crate::rules::Matched;
use crate::state::ParseState;

use super::split_heading_line;

/// Opening fence with an optional family keyword.
pub const FANCY_BLOCK: &str = r"( {0,3})(:{3,}|~{3,})([^:\n]*)(?:\n|$)";

const HEADING_RULES: &[&str] = &["atx_heading", "setext_heading"];

/// Append the `fancy_block` rule.
pub fn register(md: &mut Markdown) -> Result<()> {
    md.block_mut()
        .rules_mut()
        .append(BlockParser::rule("fancy_block", FANCY_BLOCK, parse_fancy_block)?)?;
    Ok(())
}

/// CSS classes for a family keyword.
pub fn alert_class(family: &str) -> &'static str {
    match family {
        "info" | "blue" => "alert alert-primary",
        "warning" | "yellow" => "alert alert-secondary",
        "danger" | "red" => "alert alert-danger",
        "success" | "green" => "alert alert-success",
        _ => "alert",
    }
}

fn parse_fancy_block(
    scope: &BlockScope<'_>,
    src: &str,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let fence = &caps[2];
    let family = caps[3].trim().to_lowercase();
    let opener_end = caps[0].len();

    // Without a closing fence the block runs to the end of input.
    let mut lexer = Lexer::new(&src[opener_end..]);
    let mut body = Vec::new();
    let mut end = src.len();
    let mut depth = 0usize;
    while let Some(line) = lexer.next_line() {
        if closes(line.text, fence) {
            if depth == 0 {
                lexer.skip_blank_lines();
                end = opener_end + lexer.offset();
                break;
            }
            depth -= 1;
        } else if opens(line.text, fence) {
            depth += 1;
        }
        body.push(line.text);
    }

    let mut text = body.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }

    let (header, text) = split_heading_line(&text);
    let names: Vec<&'static str> = scope
        .rule_names()
        .into_iter()
        .filter(|name| !HEADING_RULES.contains(name))
        .collect();
    let children = scope.parser().parse_with(text, state, Some(names.as_slice()))?;

    let block = FancyBlock {
        family,
        header,
        children,
    };
    Ok(Some(Matched::node(Block::FancyBlock(block), end)))
}

/// A closing line: the opening fence, optionally extended with more fence
/// characters, then only spaces.
fn closes(line: &str, fence: &str) -> bool {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    if indent > 3 {
        return false;
    }
    let Some(tail) = line[indent..].strip_prefix(fence) else {
        return false;
    };
    tail.trim_start_matches([':', '~']).trim_end_matches(' ').is_empty()
}

/// A nested opener: a fence of the same character followed by a family
/// keyword.
fn opens(line: &str, fence: &str) -> bool {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    let Some(fence_char) = fence.chars().next() else {
        return false;
    };
    if indent > 3 {
        return false;
    }
    let text = &line[indent..];
    let run = text.chars().take_while(|&c| c == fence_char).count();
    let family = text[run..].trim();
    run >= 3 && !family.is_empty() && !family.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_class_table() {
        assert_eq!(alert_class("info"), "alert alert-primary");
        assert_eq!(alert_class("blue"), "alert alert-primary");
        assert_eq!(alert_class("yellow"), "alert alert-secondary");
        assert_eq!(alert_class("red"), "alert alert-danger");
        assert_eq!(alert_class("green"), "alert alert-success");
        assert_eq!(alert_class("none"), "alert");
        assert_eq!(alert_class(""), "alert");
        assert_eq!(alert_class("purple"), "alert");
    }

    #[test]
    fn test_closing_fence() {
        assert!(closes(":::", ":::"));
        assert!(closes("   ::::  ", ":::"));
        assert!(!closes("::", ":::"));
        assert!(!closes("::: info", ":::"));
        assert!(!closes("    :::", ":::"));
    }

    #[test]
    fn test_nested_opener() {
        assert!(opens("::: warning", ":::"));
        assert!(opens("  ::::info", ":::"));
        assert!(!opens(":::", ":::"));
        assert!(!opens("~~~ info", ":::"));
        assert!(!opens("::: a:b", ":::"));
    }
}
