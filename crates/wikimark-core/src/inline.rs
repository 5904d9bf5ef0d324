//! Inline parser.
//!
//! Runs at render time over the raw text of leaf blocks. Left-to-right, the
//! inline rules are tried at each position; the first handler that accepts
//! its match emits a node, everything else accumulates into text nodes.
//! Handlers for containers (emphasis, links, highlights) parse their content
//! recursively through [`InlineParser::parse`].

use regex::Captures;

use crate::ast::{Inline, Link};
use crate::error::Result;
use crate::rules::{Matched, Rule, RuleTable};
use crate::state::ParseState;

/// Signature of an inline rule handler.
pub type InlineHandler = fn(
    &InlineParser,
    &Cursor<'_>,
    &Captures<'_>,
    &mut ParseState,
) -> Result<Option<Matched<Inline>>>;

/// Rule names registered by [`InlineParser::new`], in precedence order.
pub const DEFAULT_INLINE_RULES: &[&str] = &[
    "escape",
    "auto_link",
    "std_link",
    "strong",
    "emphasis",
    "codespan",
    "linebreak",
];

/// ASCII punctuation that may be backslash-escaped, as a regex class body.
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,\-./:;<=>?@\[\\\]^_`{|}~"##;

/// Position of an inline handler within the text being parsed.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Text from the scan position onwards.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// The character just before the scan position.
    #[inline]
    pub fn prev_char(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }
}

/// Inline-level rule table and scanner.
#[derive(Debug, Clone)]
pub struct InlineParser {
    rules: RuleTable<InlineHandler>,
}

impl InlineParser {
    /// Parser with the default inline rules.
    pub fn new() -> Result<Self> {
        let mut rules = RuleTable::new();
        rules.append(Self::rule(
            "escape",
            &format!(r"\\([{PUNCTUATION}])"),
            parse_escape,
        )?)?;
        rules.append(Self::rule(
            "auto_link",
            r"<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\s]*)>",
            parse_auto_link,
        )?)?;
        rules.append(Self::rule(
            "std_link",
            r#"\[((?:\\.|[^\[\]\\])*)\]\(\s*(<[^<>\n]*>|[^\s()]*)(?:\s+("[^"]*"|'[^']*'))?\s*\)"#,
            parse_std_link,
        )?)?;
        rules.append(Self::rule(
            "strong",
            r"\*\*((?:\\.|[^\\*]|\*[^*])+?)\*\*|__((?:\\.|[^\\_]|_[^_])+?)__",
            parse_strong,
        )?)?;
        rules.append(Self::rule(
            "emphasis",
            r"\*((?:\\.|[^\\*])+?)\*|_((?:\\.|[^\\_])+?)_",
            parse_emphasis,
        )?)?;
        rules.append(Self::rule("codespan", r"`+", parse_codespan)?)?;
        rules.append(Self::rule("linebreak", r"(?: {2,}|\\)\n", parse_linebreak)?)?;
        Ok(Self { rules })
    }

    /// Build an inline rule; the handler is coerced to [`InlineHandler`].
    pub fn rule(
        name: &'static str,
        pattern: &str,
        handler: InlineHandler,
    ) -> Result<Rule<InlineHandler>> {
        Rule::new(name, pattern, handler)
    }

    /// The rule table.
    pub fn rules(&self) -> &RuleTable<InlineHandler> {
        &self.rules
    }

    /// Mutable access for registering extension rules.
    pub fn rules_mut(&mut self) -> &mut RuleTable<InlineHandler> {
        &mut self.rules
    }

    /// Parse inline markup in `text`.
    pub fn parse(&self, text: &str, state: &mut ParseState) -> Result<Vec<Inline>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        state.descend(|state| self.scan(text, state))
    }

    fn scan(&self, text: &str, state: &mut ParseState) -> Result<Vec<Inline>> {
        let mut nodes = Vec::with_capacity(8);
        let mut pending = String::new();
        let mut pos = 0;

        'scan: while pos < text.len() {
            let cursor = Cursor { text, pos };
            let rest = cursor.rest();
            for rule in self.rules.iter() {
                let Some(caps) = rule.captures(rest) else {
                    continue;
                };
                let Some(matched) = (rule.handler())(self, &cursor, &caps, state)? else {
                    continue;
                };
                if matched.consumed == 0 {
                    continue;
                }
                log::trace!("inline rule `{}` consumed {} bytes", rule.name(), matched.consumed);
                match matched.node {
                    Some(Inline::Text(s)) => pending.push_str(&s),
                    Some(node) => {
                        flush_text(&mut nodes, &mut pending);
                        nodes.push(node);
                    }
                    None => {}
                }
                pos += matched.consumed.min(rest.len());
                continue 'scan;
            }

            // No rule here: copy a whole character.
            let ch = rest.chars().next().unwrap_or_default();
            pending.push(ch);
            pos += ch.len_utf8().max(1);
        }

        flush_text(&mut nodes, &mut pending);
        Ok(nodes)
    }
}

#[inline]
fn flush_text(nodes: &mut Vec<Inline>, pending: &mut String) {
    if !pending.is_empty() {
        nodes.push(Inline::Text(std::mem::take(pending)));
    }
}

/// First capture group that participated in the match.
fn first_group<'t>(caps: &Captures<'t>) -> &'t str {
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map_or("", |m| m.as_str())
}

fn parse_escape(
    _parser: &InlineParser,
    _cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    Ok(Some(Matched::node(
        Inline::Text(caps[1].to_string()),
        caps[0].len(),
    )))
}

fn parse_auto_link(
    _parser: &InlineParser,
    _cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let url = caps[1].to_string();
    let link = Link {
        children: vec![Inline::Text(url.clone())],
        url,
        title: None,
    };
    Ok(Some(Matched::node(Inline::Link(link), caps[0].len())))
}

fn parse_std_link(
    parser: &InlineParser,
    _cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let url = &caps[2];
    let url = url
        .strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url);
    let title = caps
        .get(3)
        .map(|m| m.as_str())
        .map(|t| t[1..t.len() - 1].to_string());
    let children = parser.parse(&caps[1], state)?;
    let link = Link {
        url: url.to_string(),
        title,
        children,
    };
    Ok(Some(Matched::node(Inline::Link(link), caps[0].len())))
}

/// Content of a delimiter run must not start or end with whitespace, and
/// underscores must not open or close inside a word.
fn flanked(cursor: &Cursor<'_>, caps: &Captures<'_>, inner: &str) -> bool {
    if inner.starts_with(char::is_whitespace) || inner.ends_with(char::is_whitespace) {
        return false;
    }
    if cursor.rest().starts_with('_') {
        let after = cursor.rest()[caps[0].len()..].chars().next();
        if cursor.prev_char().is_some_and(char::is_alphanumeric)
            || after.is_some_and(char::is_alphanumeric)
        {
            return false;
        }
    }
    true
}

fn parse_strong(
    parser: &InlineParser,
    cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let inner = first_group(caps);
    if !flanked(cursor, caps, inner) {
        return Ok(None);
    }
    let children = parser.parse(inner, state)?;
    Ok(Some(Matched::node(Inline::Strong(children), caps[0].len())))
}

fn parse_emphasis(
    parser: &InlineParser,
    cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let inner = first_group(caps);
    if !flanked(cursor, caps, inner) {
        return Ok(None);
    }
    let children = parser.parse(inner, state)?;
    Ok(Some(Matched::node(Inline::Emphasis(children), caps[0].len())))
}

fn parse_codespan(
    _parser: &InlineParser,
    cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let opener = &caps[0];
    let rest = cursor.rest();
    let body = &rest[opener.len()..];

    let mut i = 0;
    let bytes = body.as_bytes();
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
        if run == opener.len() {
            let code = normalize_code(&body[..i]);
            let consumed = opener.len() + i + run;
            return Ok(Some(Matched::node(Inline::CodeSpan(code), consumed)));
        }
        i += run;
    }

    // Unclosed: the whole backtick run is literal.
    Ok(Some(Matched::node(
        Inline::Text(opener.to_string()),
        opener.len(),
    )))
}

fn normalize_code(code: &str) -> String {
    let code = code.replace('\n', " ");
    let trimmable = code.len() >= 2
        && code.starts_with(' ')
        && code.ends_with(' ')
        && !code.bytes().all(|b| b == b' ');
    if trimmable {
        code[1..code.len() - 1].to_string()
    } else {
        code
    }
}

fn parse_linebreak(
    _parser: &InlineParser,
    cursor: &Cursor<'_>,
    caps: &Captures<'_>,
    _state: &mut ParseState,
) -> Result<Option<Matched<Inline>>> {
    let after = &cursor.rest()[caps[0].len()..];
    if after.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Matched::node(Inline::LineBreak, caps[0].len())))
}
