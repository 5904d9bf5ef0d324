//! # Wikimark Core
//!
//! An extensible wiki-markup engine: a small Markdown block/inline parser
//! driven by ordered rule tables, plus plugins for footnotes, task lists,
//! highlights, callouts, spoilers, collapsible blocks and math.
//!
//! ## Quick Start
//!
//! ```rust
//! use wikimark_core::{Format, Markdown, PluginKind};
//!
//! let md = Markdown::with_plugins(Format::Html, &PluginKind::ALL).unwrap();
//! let html = md.render("Some ==highlighted== text.").unwrap().into_string();
//!
//! assert_eq!(html, "<p>Some <mark>highlighted</mark> text.</p>\n");
//! ```
//!
//! ## Rule Tables
//!
//! Block and inline rules live in ordered tables. At each position the
//! first rule whose pattern matches and whose handler accepts wins, so
//! plugins insert their rules relative to an existing anchor rule:
//!
//! ```rust
//! use wikimark_core::{Format, Markdown, PluginKind};
//!
//! let md = Markdown::with_plugins(Format::Html, &[PluginKind::Spoiler]).unwrap();
//! let names: Vec<_> = md.block().rules().names().collect();
//! let spoiler = names.iter().position(|n| *n == "spoiler_block").unwrap();
//! let quote = names.iter().position(|n| *n == "block_quote").unwrap();
//! assert!(spoiler < quote);
//! ```
//!
//! ## Per-Document State
//!
//! An engine is immutable once built. All per-document bookkeeping
//! (footnotes, table of contents, nesting depth) lives in a [`ParseState`]
//! that each render call owns.

pub mod ast;
pub mod block;
pub mod config;
pub mod error;
pub mod inline;
pub mod lexer;
pub mod markdown;
pub mod plugins;
pub mod render;
pub mod rules;
pub mod state;

pub use ast::{Block, Inline, TocEntry};
pub use config::Config;
pub use error::{Error, Result};
pub use markdown::{AfterRenderHook, BeforeRenderHook, Format, Markdown, Rendered};
pub use plugins::PluginKind;
pub use render::AstNode;
pub use state::ParseState;

/// Render `text` to HTML with every plugin enabled.
pub fn to_html(text: &str) -> Result<String> {
    let md = Markdown::with_plugins(Format::Html, &PluginKind::ALL)?;
    Ok(md.render(text)?.into_string())
}
