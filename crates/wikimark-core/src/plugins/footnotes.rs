//! Footnotes: `[^key]` references and `[^key]: text` definitions.
//!
//! Definitions are collected into the parse state while blocks are parsed
//! and produce no node. References resolve at render time, so they are
//! numbered in the order the renderer reaches them. Once the document is
//! rendered, an after-render hook builds one item per referenced definition
//! and appends the rendered footnotes section to the output.
//!
//! ```text
//! Text with a note.[^note]
//!
//! [^note]: First paragraph.
//!
//!     Indented continuation paragraphs belong to the note.
//! ```

use regex::Captures;

use crate::ast::{Block, Container, FootnoteItem, FootnoteRef, Inline, Paragraph};
use crate::block::{BlockParser, BlockScope};
use crate::error::Result;
use crate::inline::{Cursor, InlineParser};
use crate::lexer::lines;
use crate::markdown::{Markdown, Rendered};
use crate::rules::Matched;
use crate::state::{unikey, ParseState};

/// Inline reference: `[^key]`.
pub const INLINE_FOOTNOTE: &str = r"\[\^((?:\\.|[^\\\[\]])+)\]";

/// First line of a definition: `[^key]: text`.
pub const DEF_FOOTNOTE: &str = r"( {0,3})\[\^((?:\\.|[^\\\[\]])+)\]:[ \t]*([^\n]*)(?:\n|$)";

/// Insert the reference and definition rules and the footnotes section hook.
pub fn register(md: &mut Markdown) -> Result<()> {
    md.inline_mut().rules_mut().insert_before(
        "std_link",
        InlineParser::rule("footnote", INLINE_FOOTNOTE, parse_inline_footnote)?,
    )?;
    md.block_mut().rules_mut().insert_after(
        "list",
        BlockParser::rule("def_footnote", DEF_FOOTNOTE, parse_def_footnote)?,
    )?;
    md.add_after_render_hook(footnotes_hook);
    Ok(())
}

fn parse_inline_footnote(
    _parser: &InlineParser,
    _cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let consumed = caps[0].len();
    let key = unikey(&caps[1]);
    let Some(ordinal) = state.footnote_ordinal(&key) else {
        // Unknown keys stay literal.
        return Ok(Some(Matched::node(Inline::Text(caps[0].to_string()), consumed)));
    };
    let index = state.push_footnote_ref(key.clone());
    Ok(Some(Matched::node(
        Inline::FootnoteRef(FootnoteRef {
            key,
            ordinal,
            index,
        }),
        consumed,
    )))
}

fn parse_def_footnote(
    _scope: &BlockScope<'_>,
    src: &str,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let key = &caps[2];
    if unikey(key).is_empty() {
        return Ok(None);
    }

    let indent = caps[1].len();
    let first_end = caps[0].len();
    let text_start = caps.get(3).map_or(first_end, |m| m.start());

    // Blank lines always belong to the definition. Other lines belong when
    // indented one to four columns past the marker, or at least as deep as
    // the first continuation line.
    let mut end = first_end;
    let mut shared = None;
    for line in lines(&src[first_end..]) {
        let continues = line.is_blank()
            || (indent + 1..=indent + 4).contains(&line.indent())
            || shared.is_some_and(|n| line.indent() >= n);
        if !continues {
            break;
        }
        if shared.is_none() && !line.is_blank() {
            shared = Some(line.indent());
        }
        end = first_end + line.end;
    }

    if !state.define_footnote(key, &src[text_start..end]) {
        log::debug!("footnote `{}` is already defined, keeping the first", key);
    }
    Ok(Some(Matched::silent(end)))
}

/// Append the footnotes section when any reference resolved.
fn footnotes_hook(md: &Markdown, rendered: Rendered, state: &mut ParseState) -> Result<Rendered> {
    if state.footnote_refs().is_empty() {
        return Ok(rendered);
    }

    let definitions = state.footnote_definitions().to_vec();
    let mut items = Vec::new();
    for (i, (key, text)) in definitions.into_iter().enumerate() {
        let refs = state.refs_for(&key);
        if refs.is_empty() {
            continue;
        }
        let children = parse_definition(md, &text, state)?;
        items.push(Block::FootnoteItem(FootnoteItem {
            key,
            ordinal: i + 1,
            refs,
            children,
        }));
    }
    log::debug!("rendering {} footnote items", items.len());

    let section = md.render_blocks(&[Block::Footnotes(Container { children: items })], state)?;
    Ok(rendered.append(section))
}

/// Parse the body of a definition.
///
/// A single line is one paragraph. Longer bodies lose the indentation of
/// their first non-blank continuation line before being parsed as blocks.
fn parse_definition(md: &Markdown, text: &str, state: &mut ParseState) -> Result<Vec<Block>> {
    let stripped = text.trim();
    if !stripped.contains('\n') {
        return Ok(vec![Block::Paragraph(Paragraph {
            text: stripped.to_string(),
        })]);
    }

    let shared = lines(text)
        .skip(1)
        .find(|line| !line.is_blank())
        .map_or(0, |line| line.indent());
    let body = lines(text)
        .map(|line| line.strip_indent(shared))
        .collect::<Vec<_>>()
        .join("\n");
    md.block().parse(&body, state)
}

/// Bijective base-26 label: 1 → a, 26 → z, 27 → aa, 28 → ab.
pub fn letter_from_index(num: usize) -> String {
    let mut n = num;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Back-link markup for a footnote item referenced from `refs`.
pub fn back_links(refs: &[usize]) -> String {
    if let [r] = refs {
        return format!(
            "<a href=\"#fnref-{r}\" class=\"footnote\"><i class=\"fas fa-long-arrow-alt-up\"></i></a> "
        );
    }
    let links = refs
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "<a href=\"#fnref-{r}\" class=\"footnote\">{}</a>",
                letter_from_index(i + 1)
            )
        })
        .collect::<Vec<_>>();
    format!(
        "<i class=\"fas fa-long-arrow-alt-up\"></i> {} ",
        links.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_from_index() {
        assert_eq!(letter_from_index(1), "a");
        assert_eq!(letter_from_index(2), "b");
        assert_eq!(letter_from_index(26), "z");
        assert_eq!(letter_from_index(27), "aa");
        assert_eq!(letter_from_index(28), "ab");
        assert_eq!(letter_from_index(52), "az");
        assert_eq!(letter_from_index(53), "ba");
        assert_eq!(letter_from_index(54), "bb");
        assert_eq!(letter_from_index(702), "zz");
        assert_eq!(letter_from_index(703), "aaa");
    }

    #[test]
    fn test_single_back_link_has_arrow_only() {
        let html = back_links(&[3]);
        assert!(html.starts_with("<a href=\"#fnref-3\""));
        assert!(!html.contains(">a<"));
    }

    #[test]
    fn test_multiple_back_links_are_lettered() {
        assert_eq!(
            back_links(&[1, 4]),
            "<i class=\"fas fa-long-arrow-alt-up\"></i> \
             <a href=\"#fnref-1\" class=\"footnote\">a</a>, \
             <a href=\"#fnref-4\" class=\"footnote\">b</a> "
        );
    }
}
