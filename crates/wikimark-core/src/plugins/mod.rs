//! Syntax extensions.
//!
//! Every plugin registers its rules into the engine's block and inline rule
//! tables relative to a named anchor rule, and optionally a before-render
//! (tree rewrite) or after-render (output post-processing) hook.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markdown::Markdown;

pub mod fancy_blocks;
pub mod fold;
pub mod footnotes;
pub mod mark;
pub mod math;
pub mod spoiler;
pub mod task_lists;

/// The available plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginKind {
    /// `[^key]` references and `[^key]:` definitions.
    Footnotes,
    /// `[ ]` / `[x]` list items.
    TaskLists,
    /// `==highlight==`.
    Mark,
    /// `:::family` callouts.
    FancyBlocks,
    /// `>!` spoilers.
    Spoiler,
    /// `>|` collapsible blocks.
    Fold,
    /// `$$…$$` and `$…$` formulas.
    Math,
}

impl PluginKind {
    /// Every plugin in default registration order.
    pub const ALL: [PluginKind; 7] = [
        PluginKind::Footnotes,
        PluginKind::TaskLists,
        PluginKind::Mark,
        PluginKind::FancyBlocks,
        PluginKind::Spoiler,
        PluginKind::Fold,
        PluginKind::Math,
    ];

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            PluginKind::Footnotes => "footnotes",
            PluginKind::TaskLists => "task_lists",
            PluginKind::Mark => "mark",
            PluginKind::FancyBlocks => "fancy_blocks",
            PluginKind::Spoiler => "spoiler",
            PluginKind::Fold => "fold",
            PluginKind::Math => "math",
        }
    }

    /// Look a plugin up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|plugin| plugin.name() == name)
    }

    /// Install the plugin's rules and hooks into `md`.
    pub fn register(self, md: &mut Markdown) -> Result<()> {
        match self {
            PluginKind::Footnotes => footnotes::register(md),
            PluginKind::TaskLists => task_lists::register(md),
            PluginKind::Mark => mark::register(md),
            PluginKind::FancyBlocks => fancy_blocks::register(md),
            PluginKind::Spoiler => spoiler::register(md),
            PluginKind::Fold => fold::register(md),
            PluginKind::Math => math::register(md),
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split a leading `#`..`#####` line off `text`.
///
/// Returns the heading text and the rest with the blank lines that follow
/// the heading removed. Text that does not start with one to five `#` is
/// returned unchanged.
pub(crate) fn split_heading_line(text: &str) -> (Option<String>, &str) {
    let hashes = text.bytes().take_while(|&b| b == b'#').count();
    if !(1..=5).contains(&hashes) {
        return (None, text);
    }
    let line_end = text.find('\n').unwrap_or(text.len());
    let header = text[hashes..line_end].trim();
    let rest = text[line_end..].trim_start_matches('\n');
    (Some(header.to_string()), rest)
}

/// Remove leading spaces and `marker` from every line of `block`.
pub(crate) fn strip_line_marker(block: &str, marker: &str) -> String {
    crate::lexer::lines(block)
        .map(|line| {
            let text = line.text.trim_start_matches(' ');
            text.strip_prefix(marker).unwrap_or(text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
