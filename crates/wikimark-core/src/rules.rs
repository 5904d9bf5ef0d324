//! Pattern rules and the ordered tables they live in.
//!
//! A rule pairs a name, a regular expression and a handler function. The
//! block parser and the inline parser each own one [`RuleTable`]; at every
//! scan position they try the rules in table order and the first handler that
//! accepts its match wins. Precedence between rules that start with the same
//! character (`>` for quotes, spoilers and folds, `[` for footnotes and links)
//! is therefore controlled entirely by where a rule sits in the table, which
//! is why extensions insert relative to a named anchor rule.
//!
//! Patterns are anchored at the scan position when the rule is built, so a
//! rule only ever matches text starting exactly where the parser stands.

use regex::{Captures, Regex};

use crate::error::{Error, Result};

/// Outcome of a handler that accepted its match.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched<N> {
    /// The node produced, if any. Definitions (footnotes) consume text
    /// without producing a node.
    pub node: Option<N>,
    /// Bytes consumed from the start of the scan position.
    pub consumed: usize,
}

impl<N> Matched<N> {
    /// A match that produced `node` and consumed `consumed` bytes.
    pub fn node(node: N, consumed: usize) -> Self {
        Self {
            node: Some(node),
            consumed,
        }
    }

    /// A match that consumed input without producing a node.
    pub fn silent(consumed: usize) -> Self {
        Self {
            node: None,
            consumed,
        }
    }
}

/// A named pattern with its handler.
#[derive(Clone)]
pub struct Rule<H> {
    name: &'static str,
    pattern: Regex,
    handler: H,
}

impl<H: Copy> Rule<H> {
    /// Compile `pattern` and build a rule.
    ///
    /// The pattern is anchored at the scan position; it must not rely on
    /// context before that position.
    pub fn new(name: &'static str, pattern: &str, handler: H) -> Result<Self> {
        let anchored = format!("^(?:{pattern})");
        let pattern =
            Regex::new(&anchored).map_err(|source| Error::InvalidPattern { rule: name, source })?;
        Ok(Self {
            name,
            pattern,
            handler,
        })
    }

    /// The rule name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The anchored pattern.
    #[inline]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The handler function.
    #[inline]
    pub fn handler(&self) -> H {
        self.handler
    }

    /// Match the pattern at the start of `src`.
    #[inline]
    pub fn captures<'s>(&self, src: &'s str) -> Option<Captures<'s>> {
        self.pattern.captures(src)
    }

    /// Whether the pattern matches at the start of `src`.
    #[inline]
    pub fn is_match(&self, src: &str) -> bool {
        self.pattern.is_match(src)
    }
}

impl<H> std::fmt::Debug for Rule<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// An ordered rule registry with anchor-relative insertion.
#[derive(Clone)]
pub struct RuleTable<H> {
    rules: Vec<Rule<H>>,
}

impl<H> std::fmt::Debug for RuleTable<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name))
            .finish()
    }
}

impl<H> Default for RuleTable<H> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<H: Copy> RuleTable<H> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Position of the rule called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.name == name)
    }

    /// Whether a rule called `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Look a rule up by name.
    pub fn get(&self, name: &str) -> Option<&Rule<H>> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Rules in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule<H>> {
        self.rules.iter()
    }

    /// Rule names in precedence order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    /// Rule names in precedence order, leaving out `excluded`.
    pub fn names_except(&self, excluded: &[&str]) -> Vec<&'static str> {
        self.names()
            .filter(|name| !excluded.contains(name))
            .collect()
    }

    /// Add a rule with the lowest precedence. Returns its index.
    pub fn append(&mut self, rule: Rule<H>) -> Result<usize> {
        self.ensure_unique(rule.name)?;
        log::debug!("appending rule `{}`", rule.name);
        self.rules.push(rule);
        Ok(self.rules.len() - 1)
    }

    /// Insert a rule just before `anchor`, or append it when the anchor is
    /// not registered. Returns the index the rule landed at.
    pub fn insert_before(&mut self, anchor: &str, rule: Rule<H>) -> Result<usize> {
        self.insert_relative(anchor, rule, 0)
    }

    /// Insert a rule just after `anchor`, or append it when the anchor is
    /// not registered. Returns the index the rule landed at.
    pub fn insert_after(&mut self, anchor: &str, rule: Rule<H>) -> Result<usize> {
        self.insert_relative(anchor, rule, 1)
    }

    /// Remove and return the rule called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Rule<H>> {
        let index = self.index_of(name)?;
        Some(self.rules.remove(index))
    }

    fn insert_relative(&mut self, anchor: &str, rule: Rule<H>, shift: usize) -> Result<usize> {
        self.ensure_unique(rule.name)?;
        match self.index_of(anchor) {
            Some(index) => {
                let at = index + shift;
                log::debug!("inserting rule `{}` at {} (anchor `{}`)", rule.name, at, anchor);
                self.rules.insert(at, rule);
                Ok(at)
            }
            None => {
                log::warn!(
                    "anchor rule `{}` not found, appending `{}` instead",
                    anchor,
                    rule.name
                );
                self.rules.push(rule);
                Ok(self.rules.len() - 1)
            }
        }
    }

    fn ensure_unique(&self, name: &'static str) -> Result<()> {
        if self.contains(name) {
            return Err(Error::DuplicateRule(name));
        }
        Ok(())
    }
}
