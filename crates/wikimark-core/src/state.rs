//! Per-document parse state.
//!
//! One [`ParseState`] is created for every document and threaded by exclusive
//! reference through every block handler, inline handler and hook. Nothing in
//! it is shared between documents, so an engine can render many documents in
//! parallel as long as each call owns its own state.

use std::collections::HashMap;

use crate::ast::TocEntry;
use crate::error::{Error, Result};

/// Default limit for nested block and inline descents.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Mutable bookkeeping for a single document.
#[derive(Debug, Clone)]
pub struct ParseState {
    /// Footnote definitions in declaration order, keyed by normalized key.
    def_footnotes: Vec<(String, String)>,
    /// Keys of resolved references in render order.
    footnotes: Vec<String>,
    /// Number of resolved references so far.
    footnote_index: usize,
    toc: Vec<TocEntry>,
    /// Anchor to index of its TOC entry.
    anchors: HashMap<String, usize>,
    depth: usize,
    max_depth: usize,
}

impl Default for ParseState {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseState {
    /// Fresh state with the default depth limit.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Fresh state with an explicit depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            def_footnotes: Vec::new(),
            footnotes: Vec::new(),
            footnote_index: 0,
            toc: Vec::new(),
            anchors: HashMap::new(),
            depth: 0,
            max_depth,
        }
    }

    // ---- nesting guard ----

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The configured depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Run `f` one level deeper, failing once the limit is exceeded.
    pub fn descend<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.depth >= self.max_depth {
            log::debug!("nesting limit {} reached", self.max_depth);
            return Err(Error::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ---- footnotes ----

    /// Record a definition. The first definition of a key wins; returns
    /// whether this one was stored.
    pub fn define_footnote(&mut self, key: &str, text: &str) -> bool {
        let key = unikey(key);
        if key.is_empty() || self.footnote_ordinal(&key).is_some() {
            return false;
        }
        self.def_footnotes.push((key, text.to_string()));
        true
    }

    /// Declaration index plus one of the normalized `key`.
    pub fn footnote_ordinal(&self, key: &str) -> Option<usize> {
        self.def_footnotes
            .iter()
            .position(|(k, _)| k == key)
            .map(|i| i + 1)
    }

    /// Raw text of the definition for the normalized `key`.
    pub fn footnote_definition(&self, key: &str) -> Option<&str> {
        self.def_footnotes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, text)| text.as_str())
    }

    /// All definitions in declaration order.
    pub fn footnote_definitions(&self) -> &[(String, String)] {
        &self.def_footnotes
    }

    /// Record a resolved reference and return its occurrence index.
    pub fn push_footnote_ref(&mut self, key: String) -> usize {
        self.footnote_index += 1;
        self.footnotes.push(key);
        self.footnote_index
    }

    /// Keys of resolved references in render order.
    pub fn footnote_refs(&self) -> &[String] {
        &self.footnotes
    }

    /// Number of resolved references so far.
    pub fn footnote_index(&self) -> usize {
        self.footnote_index
    }

    /// Occurrence indices of every reference to `key`.
    pub fn refs_for(&self, key: &str) -> Vec<usize> {
        self.footnotes
            .iter()
            .enumerate()
            .filter(|(_, k)| *k == key)
            .map(|(i, _)| i + 1)
            .collect()
    }

    // ---- table of contents ----

    /// Record a heading and return its unique anchor.
    pub fn add_heading(&mut self, level: u8, text: &str) -> String {
        let anchor = self.unique_anchor(text);
        self.toc.push(TocEntry {
            level,
            text: text.to_string(),
            anchor: anchor.clone(),
        });
        anchor
    }

    /// Headings collected so far, in document order.
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    fn unique_anchor(&mut self, text: &str) -> String {
        let mut slug = slugify(text);
        if slug.is_empty() {
            slug.push_str("section");
        }
        let mut anchor = slug.clone();
        let mut n = 0;
        while self.anchors.contains_key(&anchor) {
            n += 1;
            anchor = format!("{slug}-{n}");
        }
        self.anchors.insert(anchor.clone(), self.toc.len());
        anchor
    }
}

/// Normalize a reference key: collapse whitespace runs and lower-case.
pub fn unikey(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lower-case slug of heading text: alphanumerics kept, whitespace and
/// hyphens folded to single `-`, everything else dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    slug
}
