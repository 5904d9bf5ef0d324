//! The `Markdown` engine: parsers, hooks and output format in one place.

use serde::{Deserialize, Serialize};

use crate::ast::{Block, TocEntry};
use crate::block::BlockParser;
use crate::config::Config;
use crate::error::Result;
use crate::inline::InlineParser;
use crate::plugins::PluginKind;
use crate::render::{self, AstNode};
use crate::state::{ParseState, DEFAULT_MAX_DEPTH};

/// Output format of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// HTML string.
    #[default]
    Html,
    /// Serializable node tree.
    Ast,
}

/// Output of a render call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    /// Rendered HTML.
    Html(String),
    /// Projected node tree.
    Ast(Vec<AstNode>),
}

impl Rendered {
    /// Empty output in `format`.
    pub fn empty(format: Format) -> Self {
        match format {
            Format::Html => Rendered::Html(String::new()),
            Format::Ast => Rendered::Ast(Vec::new()),
        }
    }

    /// Format of this output.
    pub fn format(&self) -> Format {
        match self {
            Rendered::Html(_) => Format::Html,
            Rendered::Ast(_) => Format::Ast,
        }
    }

    /// Join `other` onto the end of this output.
    ///
    /// Outputs of different formats are not joined; `other` is dropped with a
    /// warning.
    pub fn append(self, other: Rendered) -> Rendered {
        match (self, other) {
            (Rendered::Html(mut a), Rendered::Html(b)) => {
                a.push_str(&b);
                Rendered::Html(a)
            }
            (Rendered::Ast(mut a), Rendered::Ast(b)) => {
                a.extend(b);
                Rendered::Ast(a)
            }
            (this, other) => {
                log::warn!(
                    "cannot append {:?} output to {:?} output",
                    other.format(),
                    this.format()
                );
                this
            }
        }
    }

    /// The HTML string, if this is HTML output.
    pub fn as_html(&self) -> Option<&str> {
        match self {
            Rendered::Html(html) => Some(html),
            Rendered::Ast(_) => None,
        }
    }

    /// The node list, if this is AST output.
    pub fn as_ast(&self) -> Option<&[AstNode]> {
        match self {
            Rendered::Ast(nodes) => Some(nodes),
            Rendered::Html(_) => None,
        }
    }

    /// Consume into the HTML string; AST output is serialized to JSON.
    ///
    /// A serialization failure is logged and yields an empty string.
    pub fn into_string(self) -> String {
        match self {
            Rendered::Html(html) => html,
            Rendered::Ast(nodes) => match serde_json::to_string(&nodes) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("failed to serialize {} AST nodes: {}", nodes.len(), e);
                    String::new()
                }
            },
        }
    }
}

/// Tree rewrite run after block parsing and before rendering.
pub type BeforeRenderHook = fn(&Markdown, Vec<Block>, &mut ParseState) -> Result<Vec<Block>>;

/// Output post-processing run after rendering.
pub type AfterRenderHook = fn(&Markdown, Rendered, &mut ParseState) -> Result<Rendered>;

/// A configured markup engine.
///
/// Build it once, register plugins, then share `&Markdown` freely: rendering
/// only reads the engine and keeps all per-document data in a
/// [`ParseState`].
#[derive(Clone)]
pub struct Markdown {
    block: BlockParser,
    inline: InlineParser,
    format: Format,
    before_render_hooks: Vec<BeforeRenderHook>,
    after_render_hooks: Vec<AfterRenderHook>,
    plugins: Vec<PluginKind>,
    max_depth: usize,
}

impl std::fmt::Debug for Markdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Markdown")
            .field("block", &self.block)
            .field("inline", &self.inline)
            .field("format", &self.format)
            .field("before_render_hooks", &self.before_render_hooks.len())
            .field("after_render_hooks", &self.after_render_hooks.len())
            .field("plugins", &self.plugins)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Markdown {
    /// Engine with the base rules and no plugins.
    pub fn new(format: Format) -> Result<Self> {
        Ok(Self {
            block: BlockParser::new()?,
            inline: InlineParser::new()?,
            format,
            before_render_hooks: Vec::new(),
            after_render_hooks: Vec::new(),
            plugins: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Engine with the given plugins registered in order.
    pub fn with_plugins(format: Format, plugins: &[PluginKind]) -> Result<Self> {
        let mut md = Self::new(format)?;
        for &plugin in plugins {
            md.use_plugin(plugin)?;
        }
        Ok(md)
    }

    /// Engine described by a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut md = Self::with_plugins(config.format, &config.plugins)?;
        md.max_depth = config.max_depth;
        Ok(md)
    }

    /// Register a plugin. Registering the same plugin twice is a no-op.
    pub fn use_plugin(&mut self, plugin: PluginKind) -> Result<()> {
        if self.plugins.contains(&plugin) {
            log::debug!("plugin `{}` already registered", plugin.name());
            return Ok(());
        }
        log::debug!("registering plugin `{}`", plugin.name());
        plugin.register(self)?;
        self.plugins.push(plugin);
        Ok(())
    }

    /// Append a before-render hook.
    pub fn add_before_render_hook(&mut self, hook: BeforeRenderHook) {
        self.before_render_hooks.push(hook);
    }

    /// Append an after-render hook.
    pub fn add_after_render_hook(&mut self, hook: AfterRenderHook) {
        self.after_render_hooks.push(hook);
    }

    /// The block parser and its rule table.
    pub fn block(&self) -> &BlockParser {
        &self.block
    }

    /// Mutable block parser, for registering block rules.
    pub fn block_mut(&mut self) -> &mut BlockParser {
        &mut self.block
    }

    /// The inline parser and its rule table.
    pub fn inline(&self) -> &InlineParser {
        &self.inline
    }

    /// Mutable inline parser, for registering inline rules.
    pub fn inline_mut(&mut self) -> &mut InlineParser {
        &mut self.inline
    }

    /// Output format this engine renders to.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Registered plugins in registration order.
    pub fn plugins(&self) -> &[PluginKind] {
        &self.plugins
    }

    /// Nesting limit given to each new [`ParseState`].
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the nesting limit for subsequent renders.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// A fresh state carrying this engine's depth limit.
    pub fn new_state(&self) -> ParseState {
        ParseState::with_max_depth(self.max_depth)
    }

    /// Parse `text` into blocks and run the before-render hooks.
    pub fn parse(&self, text: &str, state: &mut ParseState) -> Result<Vec<Block>> {
        let text = normalize_newlines(text);
        let mut blocks = self.block.parse(&text, state)?;
        if !self.before_render_hooks.is_empty() {
            log::debug!("running {} before-render hooks", self.before_render_hooks.len());
        }
        for hook in &self.before_render_hooks {
            blocks = hook(self, blocks, state)?;
        }
        log::debug!("parsed {} top-level blocks", blocks.len());
        Ok(blocks)
    }

    /// Render a document with a fresh state.
    pub fn render(&self, text: &str) -> Result<Rendered> {
        let mut state = self.new_state();
        self.render_with_state(text, &mut state)
    }

    /// Render a document, leaving the bookkeeping in `state` for inspection.
    pub fn render_with_state(&self, text: &str, state: &mut ParseState) -> Result<Rendered> {
        let blocks = self.parse(text, state)?;
        let mut output = self.render_blocks(&blocks, state)?;
        if !self.after_render_hooks.is_empty() {
            log::debug!("running {} after-render hooks", self.after_render_hooks.len());
        }
        for hook in &self.after_render_hooks {
            output = hook(self, output, state)?;
        }
        Ok(output)
    }

    /// Render already-parsed blocks in the engine's format.
    pub fn render_blocks(&self, blocks: &[Block], state: &mut ParseState) -> Result<Rendered> {
        match self.format {
            Format::Html => render::html::render_blocks(self, blocks, state).map(Rendered::Html),
            Format::Ast => render::ast::render_blocks(self, blocks, state).map(Rendered::Ast),
        }
    }

    /// Parse and render inline markup only.
    pub fn render_inline(&self, text: &str, state: &mut ParseState) -> Result<Rendered> {
        let inlines = self.inline.parse(text, state)?;
        Ok(match self.format {
            Format::Html => Rendered::Html(render::html::render_inlines(&inlines)),
            Format::Ast => Rendered::Ast(render::ast::project_inlines(&inlines)),
        })
    }

    /// Table of contents of a document.
    pub fn toc(&self, text: &str) -> Result<Vec<TocEntry>> {
        let mut state = self.new_state();
        self.parse(text, &mut state)?;
        Ok(state.toc().to_vec())
    }
}

/// Turn `\r\n` and lone `\r` into `\n`.
pub fn normalize_newlines(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains('\r') {
        return std::borrow::Cow::Borrowed(text);
    }
    std::borrow::Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
