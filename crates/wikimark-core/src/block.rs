//! Block parser.
//!
//! Scans a document from top to bottom. At every position the active block
//! rules are tried in table order; the first handler that accepts its match
//! produces a node (or silently consumes a definition). Text no rule claims
//! becomes a paragraph that runs until a blank line or until a line some
//! active rule would claim.
//!
//! Container rules (lists, quotes and the extension blocks) strip their own
//! markers and recurse through [`BlockScope::parse`], which keeps the active
//! rule subset and counts nesting depth on the parse state.

use regex::Captures;

use crate::ast::{Block, CodeBlock, Container, Heading, List, ListKind, Paragraph};
use crate::error::Result;
use crate::lexer::{lines, Lexer, Line};
use crate::rules::{Matched, Rule, RuleTable};
use crate::state::ParseState;

/// Signature of a block rule handler.
///
/// Receives the scope it runs in, the remaining source starting at the scan
/// position and the captures of the rule's pattern. Returning `Ok(None)`
/// declines the match.
pub type BlockHandler =
    fn(&BlockScope<'_>, &str, &Captures<'_>, &mut ParseState) -> Result<Option<Matched<Block>>>;

/// Rule names registered by [`BlockParser::new`], in precedence order.
pub const DEFAULT_BLOCK_RULES: &[&str] = &[
    "newline",
    "thematic_break",
    "fenced_code",
    "block_quote",
    "atx_heading",
    "setext_heading",
    "list",
];

/// Block-level rule table and scanner.
#[derive(Debug, Clone)]
pub struct BlockParser {
    rules: RuleTable<BlockHandler>,
}

impl BlockParser {
    /// Parser with the default block rules.
    pub fn new() -> Result<Self> {
        let mut rules = RuleTable::new();
        rules.append(Self::rule("newline", r"(?:[ \t]*\n)+", parse_newline)?)?;
        rules.append(Self::rule(
            "thematic_break",
            r" {0,3}(?:(?:-[ \t]*){3,}|(?:_[ \t]*){3,}|(?:\*[ \t]*){3,})(?:\n+|$)",
            parse_thematic_break,
        )?)?;
        rules.append(Self::rule(
            "fenced_code",
            r"( {0,3})(`{3,}|~{3,})([^`\n]*)(?:\n|$)",
            parse_fenced_code,
        )?)?;
        rules.append(Self::rule(
            "block_quote",
            r"(?: {0,3}>[^\n]*(?:\n|$))+",
            parse_block_quote,
        )?)?;
        rules.append(Self::rule(
            "atx_heading",
            r" {0,3}(#{1,6})(?:[ \t]+([^\n]*?))?(?:[ \t]+#+)?[ \t]*(?:\n+|$)",
            parse_atx_heading,
        )?)?;
        rules.append(Self::rule(
            "setext_heading",
            r"([^\n]+)\n {0,3}((?:=|-){2,})[ \t]*(?:\n+|$)",
            parse_setext_heading,
        )?)?;
        rules.append(Self::rule(
            "list",
            r"( {0,3})([*+-]|\d{1,9}[.)])(?:[ \t][^\n]*)?(?:\n|$)",
            parse_list,
        )?)?;
        Ok(Self { rules })
    }

    /// Build a block rule; the handler is coerced to [`BlockHandler`].
    pub fn rule(
        name: &'static str,
        pattern: &str,
        handler: BlockHandler,
    ) -> Result<Rule<BlockHandler>> {
        Rule::new(name, pattern, handler)
    }

    /// The rule table.
    pub fn rules(&self) -> &RuleTable<BlockHandler> {
        &self.rules
    }

    /// Mutable access for registering extension rules.
    pub fn rules_mut(&mut self) -> &mut RuleTable<BlockHandler> {
        &mut self.rules
    }

    /// Parse `text` with every registered rule.
    pub fn parse(&self, text: &str, state: &mut ParseState) -> Result<Vec<Block>> {
        self.parse_with(text, state, None)
    }

    /// Parse `text` with an explicit, ordered subset of rule names.
    ///
    /// Names that are not registered are ignored. Nested containers inherit
    /// the subset.
    pub fn parse_with(
        &self,
        text: &str,
        state: &mut ParseState,
        subset: Option<&[&'static str]>,
    ) -> Result<Vec<Block>> {
        let scope = BlockScope::new(self, subset);
        state.descend(|state| scope.scan(text, state))
    }
}

/// The parser together with the rule subset active for one (nested) parse.
pub struct BlockScope<'p> {
    parser: &'p BlockParser,
    subset: Option<&'p [&'static str]>,
    active: Vec<&'p Rule<BlockHandler>>,
}

impl<'p> BlockScope<'p> {
    fn new(parser: &'p BlockParser, subset: Option<&'p [&'static str]>) -> Self {
        let active = match subset {
            Some(names) => names.iter().filter_map(|name| parser.rules.get(name)).collect(),
            None => parser.rules.iter().collect(),
        };
        Self {
            parser,
            subset,
            active,
        }
    }

    /// The underlying parser.
    pub fn parser(&self) -> &'p BlockParser {
        self.parser
    }

    /// Names of the rules active in this scope, in precedence order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.active.iter().map(|rule| rule.name()).collect()
    }

    /// Parse nested text with the same rule subset.
    pub fn parse(&self, text: &str, state: &mut ParseState) -> Result<Vec<Block>> {
        self.parser.parse_with(text, state, self.subset)
    }

    /// Whether some active rule (other than blank-line handling) matches at
    /// the start of `src`.
    pub fn interrupts(&self, src: &str) -> bool {
        self.active
            .iter()
            .any(|rule| rule.name() != "newline" && rule.is_match(src))
    }

    fn scan(&self, text: &str, state: &mut ParseState) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut pos = 0;

        'scan: while pos < text.len() {
            let rest = &text[pos..];
            for rule in &self.active {
                let Some(caps) = rule.captures(rest) else {
                    continue;
                };
                let Some(matched) = (rule.handler())(self, rest, &caps, state)? else {
                    continue;
                };
                if matched.consumed == 0 {
                    continue;
                }
                log::trace!("block rule `{}` consumed {} bytes", rule.name(), matched.consumed);
                blocks.extend(matched.node);
                pos += matched.consumed.min(rest.len());
                continue 'scan;
            }

            let (paragraph, consumed) = self.paragraph(rest);
            blocks.extend(paragraph);
            pos += consumed;
        }

        Ok(blocks)
    }

    /// Fallback: collect lines up to a blank line or an interrupting rule.
    fn paragraph(&self, src: &str) -> (Option<Block>, usize) {
        let mut lexer = Lexer::new(src);
        let Some(first) = lexer.next_line() else {
            return (None, src.len());
        };
        if first.is_blank() {
            return (None, first.end);
        }

        let mut text = String::from(first.text.trim_start());
        let mut end = first.end;
        while let Some(line) = lexer.peek_line().copied() {
            if line.is_blank() || self.interrupts(&src[line.start..]) {
                break;
            }
            text.push('\n');
            text.push_str(line.text.trim_start());
            end = line.end;
            lexer.next_line();
        }

        let text = text.trim_end().to_string();
        (Some(Block::Paragraph(Paragraph { text })), end)
    }
}

fn parse_newline(
    _scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    Ok(Some(Matched::silent(caps[0].len())))
}

fn parse_thematic_break(
    _scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    Ok(Some(Matched::node(Block::ThematicBreak, caps[0].len())))
}

fn parse_fenced_code(
    _scope: &BlockScope<'_>,
    src: &str,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let indent = caps[1].len();
    let fence = &caps[2];
    let fence_char = fence.as_bytes()[0];
    let info = caps[3].trim();
    let opener_end = caps[0].len();

    let mut body: Vec<&str> = Vec::new();
    let mut end = src.len();
    for line in lines(&src[opener_end..]) {
        if closes_fence(&line, fence_char, fence.len()) {
            end = opener_end + line.end;
            break;
        }
        body.push(line.strip_indent(indent));
    }

    let mut code = body.join("\n");
    if !code.is_empty() {
        code.push('\n');
    }
    let info = (!info.is_empty()).then(|| info.to_string());
    Ok(Some(Matched::node(Block::CodeBlock(CodeBlock { info, code }), end)))
}

fn closes_fence(line: &Line<'_>, fence_char: u8, min_len: usize) -> bool {
    if line.indent() > 3 {
        return false;
    }
    let text = line.text.trim_start_matches(' ');
    let run = text.bytes().take_while(|&b| b == fence_char).count();
    run >= min_len && text[run..].trim().is_empty()
}

fn parse_block_quote(
    scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let quoted = &caps[0];
    let inner = lines(quoted)
        .map(|line| {
            let text = line.text.trim_start_matches(' ');
            let text = text.strip_prefix('>').unwrap_or(text);
            text.strip_prefix(' ').unwrap_or(text)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let children = scope.parse(&inner, state)?;
    Ok(Some(Matched::node(
        Block::BlockQuote(Container { children }),
        quoted.len(),
    )))
}

fn parse_atx_heading(
    _scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let level = caps[1].len() as u8;
    let text = caps.get(2).map_or("", |m| m.as_str()).trim();
    Ok(Some(Matched::node(
        heading(level, text, state),
        caps[0].len(),
    )))
}

fn parse_setext_heading(
    _scope: &BlockScope<'_>,
    _src: &str,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let text = caps[1].trim();
    if text.is_empty() {
        return Ok(None);
    }
    let level = if caps[2].starts_with('=') { 1 } else { 2 };
    Ok(Some(Matched::node(
        heading(level, text, state),
        caps[0].len(),
    )))
}

fn heading(level: u8, text: &str, state: &mut ParseState) -> Block {
    let anchor = state.add_heading(level, text);
    Block::Heading(Heading {
        level,
        text: text.to_string(),
        anchor,
    })
}

/// A parsed list marker.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Marker {
    indent: usize,
    /// `-`, `+` or `*` for bullets, `.` or `)` for ordered markers.
    delimiter: u8,
    number: Option<u64>,
    /// Column where the item content starts.
    content_col: usize,
}

impl Marker {
    fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let indent = bytes.iter().take_while(|&&b| b == b' ').count();
        if indent > 3 {
            return None;
        }

        let digits = bytes[indent..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let (delimiter, number, marker_end) = match digits {
            0 => match bytes.get(indent) {
                Some(&b @ (b'-' | b'+' | b'*')) => (b, None, indent + 1),
                _ => return None,
            },
            1..=9 => match bytes.get(indent + digits) {
                Some(&b @ (b'.' | b')')) => {
                    let number = text[indent..indent + digits].parse().ok()?;
                    (b, Some(number), indent + digits + 1)
                }
                _ => return None,
            },
            _ => return None,
        };

        let pad = bytes[marker_end..]
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count();
        let content_col = match pad {
            0 if marker_end < bytes.len() => return None,
            0 => marker_end + 1,
            1..=4 if marker_end + pad < bytes.len() => marker_end + pad,
            _ => marker_end + 1,
        };

        Some(Self {
            indent,
            delimiter,
            number,
            content_col,
        })
    }

    fn same_list(&self, other: &Marker) -> bool {
        self.delimiter == other.delimiter && self.number.is_some() == other.number.is_some()
    }

    fn first_line<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.content_col..).unwrap_or("")
    }
}

fn parse_list(
    scope: &BlockScope<'_>,
    src: &str,
    _caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Block>>> {
    let mut lexer = Lexer::new(src);
    let Some(first) = lexer.peek_line().and_then(|line| Marker::parse(line.text)) else {
        return Ok(None);
    };

    let mut bodies: Vec<String> = Vec::new();
    let mut loose = false;
    let mut end = 0;

    while let Some(opener) = lexer.peek_line().copied() {
        let Some(marker) = Marker::parse(opener.text) else {
            break;
        };
        if !marker.same_list(&first) {
            break;
        }
        lexer.next_line();

        let col = marker.content_col;
        let mut body = vec![marker.first_line(opener.text)];
        end = opener.end;

        let mut blanks = 0;
        while let Some(line) = lexer.peek_line().copied() {
            if line.is_blank() {
                blanks += 1;
                lexer.next_line();
                continue;
            }
            if line.indent() >= col {
                if blanks > 0 {
                    loose = true;
                    body.extend(std::iter::repeat("").take(blanks));
                    blanks = 0;
                }
                body.push(&line.text[col..]);
            } else if blanks == 0
                && !body.last().is_some_and(|last| last.trim().is_empty())
                && !scope.interrupts(&src[line.start..])
            {
                // Lazy paragraph continuation.
                body.push(line.text.trim_start());
            } else {
                break;
            }
            end = line.end;
            lexer.next_line();
        }

        bodies.push(body.join("\n"));

        let sibling = lexer
            .peek_line()
            .and_then(|line| Marker::parse(line.text))
            .is_some_and(|next| next.same_list(&first));
        if blanks > 0 {
            if !sibling {
                break;
            }
            loose = true;
        }
    }

    let mut items = Vec::with_capacity(bodies.len());
    for body in &bodies {
        let mut children = scope.parse(body, state)?;
        if !loose {
            children = children
                .into_iter()
                .map(|child| match child {
                    Block::Paragraph(p) => Block::BlockText(p),
                    other => other,
                })
                .collect();
        }
        items.push(Block::ListItem(Container { children }));
    }

    let (kind, start) = match first.number {
        Some(n) => (ListKind::Ordered, Some(n)),
        None => (ListKind::Unordered, None),
    };
    let list = List {
        kind,
        start,
        tight: !loose,
        items,
    };
    Ok(Some(Matched::node(Block::List(list), end)))
}
