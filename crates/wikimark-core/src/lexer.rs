//! Line lexer shared by the block rules.
//!
//! Block handlers receive the remaining source as a `&str` and most of them
//! need to walk it line by line: lists, quotes, fences and footnote
//! continuations all decide membership per line. The lexer hands out those
//! lines with their byte offsets so a handler can report exactly how much it
//! consumed.
//!
//! Newline scanning uses `memchr`, which is SIMD accelerated on supported
//! platforms.

use memchr::memchr;

/// One line of a handler's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line content, newline excluded.
    pub text: &'a str,
    /// Offset of the line's first byte.
    pub start: usize,
    /// Offset just past the line, counting its newline if any.
    pub end: usize,
}

impl<'a> Line<'a> {
    /// True when the line holds nothing but spaces and tabs.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.bytes().all(|b| b == b' ' || b == b'\t')
    }

    /// Count of leading spaces.
    #[inline]
    pub fn indent(&self) -> usize {
        self.text.bytes().take_while(|&b| b == b' ').count()
    }

    /// The line with at most `n` leading spaces removed.
    #[inline]
    pub fn strip_indent(&self, n: usize) -> &'a str {
        &self.text[self.indent().min(n)..]
    }
}

/// Cursor over the lines of a text with one line of lookahead.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            peeked: None,
        }
    }

    /// Byte offset of the next line not yet consumed.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.peeked.map_or(self.pos, |line| line.start)
    }

    /// Look at the next line without consuming it.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.scan();
        }
        self.peeked.as_ref()
    }

    /// Consume and return the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        self.peeked.take().or_else(|| self.scan())
    }

    /// Consume blank lines, returning how many were skipped.
    pub fn skip_blank_lines(&mut self) -> usize {
        let mut skipped = 0;
        while self.peek_line().is_some_and(Line::is_blank) {
            self.peeked = None;
            skipped += 1;
        }
        skipped
    }

    fn scan(&mut self) -> Option<Line<'a>> {
        let bytes = self.input.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }
        let start = self.pos;
        let (text_end, end) = match memchr(b'\n', &bytes[start..]) {
            Some(len) => (start + len, start + len + 1),
            None => (bytes.len(), bytes.len()),
        };
        self.pos = end;
        // '\n' is ASCII, so both ends sit on char boundaries.
        Some(Line {
            text: &self.input[start..text_end],
            start,
            end,
        })
    }
}

/// Iterate the lines of `text`. A final newline does not produce an empty
/// trailing line.
pub fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut lexer = Lexer::new(text);
    std::iter::from_fn(move || lexer.next_line())
}
