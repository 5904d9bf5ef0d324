//! Node types produced by the block and inline parsers.
//!
//! The tree is built in two layers:
//!
//! - **Blocks** come out of the block parser. Leaf blocks (paragraphs,
//!   headings, tight list text) keep their *raw* inline source in `text`;
//!   inline markup is parsed only when the block is rendered. Footnote
//!   numbering depends on that: references are numbered in the order the
//!   renderer reaches them.
//! - **Inlines** are produced on demand by the inline parser while rendering.
//!
//! Every node owns its children outright, so rewriting passes can consume a
//! tree and hand back a new one without any aliasing.

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Paragraph with raw inline text.
    Paragraph(Paragraph),
    /// Paragraph text inside a tight list item (rendered without `<p>`).
    BlockText(Paragraph),
    /// ATX or setext heading.
    Heading(Heading),
    /// Horizontal rule.
    ThematicBreak,
    /// Fenced code block.
    CodeBlock(CodeBlock),
    /// Block quotation.
    BlockQuote(Container),
    /// Ordered or unordered list.
    List(List),
    /// A list item.
    ListItem(Container),
    /// A list item that started with a `[ ]` / `[x]` checkbox.
    TaskListItem(TaskListItem),
    /// The footnotes section appended after the document.
    Footnotes(Container),
    /// One footnote definition with its back-references.
    FootnoteItem(FootnoteItem),
    /// Callout block (`:::info`).
    FancyBlock(FancyBlock),
    /// Reveal-on-click block (`>!`).
    SpoilerBlock(Container),
    /// Collapsible disclosure block (`>|`).
    FoldBlock(FoldBlock),
    /// Display formula (`$$…$$`).
    MathBlock(MathBlock),
}

/// Raw paragraph text.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Unparsed inline source.
    pub text: String,
}

/// Section heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Unparsed inline source.
    pub text: String,
    /// Unique slug used as the element id.
    pub anchor: String,
}

/// Fenced code block.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Info string after the opening fence, if any.
    pub info: Option<String>,
    /// Verbatim code.
    pub code: String,
}

/// A block that only wraps other blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    /// Child blocks.
    pub children: Vec<Block>,
}

/// List ordering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Numbered list (1. 2. 3.).
    Ordered,
    /// Bulleted list (- + *).
    Unordered,
}

/// A list block.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    /// Ordered or unordered.
    pub kind: ListKind,
    /// Starting number for ordered lists.
    pub start: Option<u64>,
    /// Whether items are separated without blank lines.
    pub tight: bool,
    /// `ListItem` or `TaskListItem` blocks.
    pub items: Vec<Block>,
}

/// A checked or unchecked task item.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskListItem {
    /// `true` for `[x]` / `[X]`.
    pub checked: bool,
    /// Item content with the marker removed.
    pub children: Vec<Block>,
}

/// One entry of the footnotes section.
#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteItem {
    /// Normalized footnote key.
    pub key: String,
    /// Declaration index plus one.
    pub ordinal: usize,
    /// Occurrence indices of every reference to this footnote.
    pub refs: Vec<usize>,
    /// Parsed definition body.
    pub children: Vec<Block>,
}

/// Callout block.
#[derive(Debug, Clone, PartialEq)]
pub struct FancyBlock {
    /// Lower-cased family keyword (`info`, `red`, ...); may be empty.
    pub family: String,
    /// Title taken from a leading heading line.
    pub header: Option<String>,
    /// Body parsed without heading rules.
    pub children: Vec<Block>,
}

/// Collapsible block.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldBlock {
    /// Summary taken from a leading heading line.
    pub header: Option<String>,
    /// Body blocks.
    pub children: Vec<Block>,
}

/// Display formula.
#[derive(Debug, Clone, PartialEq)]
pub struct MathBlock {
    /// Formula source between the delimiters.
    pub text: String,
}

impl Block {
    /// Type tag used by the AST projection and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::BlockText(_) => "block_text",
            Block::Heading(_) => "heading",
            Block::ThematicBreak => "thematic_break",
            Block::CodeBlock(_) => "block_code",
            Block::BlockQuote(_) => "block_quote",
            Block::List(_) => "list",
            Block::ListItem(_) => "list_item",
            Block::TaskListItem(_) => "task_list_item",
            Block::Footnotes(_) => "footnotes",
            Block::FootnoteItem(_) => "footnote_item",
            Block::FancyBlock(_) => "fancy_block",
            Block::SpoilerBlock(_) => "spoiler_block",
            Block::FoldBlock(_) => "fold_block",
            Block::MathBlock(_) => "math_block",
        }
    }

    /// Raw text of leaf blocks.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Paragraph(p) | Block::BlockText(p) => Some(&p.text),
            Block::Heading(h) => Some(&h.text),
            Block::CodeBlock(c) => Some(&c.code),
            Block::MathBlock(m) => Some(&m.text),
            _ => None,
        }
    }

    /// Child blocks of container blocks.
    pub fn children(&self) -> Option<&[Block]> {
        match self {
            Block::BlockQuote(c)
            | Block::ListItem(c)
            | Block::Footnotes(c)
            | Block::SpoilerBlock(c) => Some(&c.children),
            Block::List(l) => Some(&l.items),
            Block::TaskListItem(t) => Some(&t.children),
            Block::FootnoteItem(f) => Some(&f.children),
            Block::FancyBlock(f) => Some(&f.children),
            Block::FoldBlock(f) => Some(&f.children),
            Block::Paragraph(_)
            | Block::BlockText(_)
            | Block::Heading(_)
            | Block::ThematicBreak
            | Block::CodeBlock(_)
            | Block::MathBlock(_) => None,
        }
    }

    /// Rebuild this block with `f` applied to each direct child.
    ///
    /// Leaf blocks are returned unchanged.
    pub fn map_children<F>(self, mut f: F) -> Block
    where
        F: FnMut(Block) -> Block,
    {
        let mut map = |children: Vec<Block>| children.into_iter().map(&mut f).collect::<Vec<_>>();
        match self {
            Block::BlockQuote(c) => Block::BlockQuote(Container {
                children: map(c.children),
            }),
            Block::ListItem(c) => Block::ListItem(Container {
                children: map(c.children),
            }),
            Block::Footnotes(c) => Block::Footnotes(Container {
                children: map(c.children),
            }),
            Block::SpoilerBlock(c) => Block::SpoilerBlock(Container {
                children: map(c.children),
            }),
            Block::List(l) => Block::List(List {
                items: map(l.items),
                ..l
            }),
            Block::TaskListItem(t) => Block::TaskListItem(TaskListItem {
                children: map(t.children),
                ..t
            }),
            Block::FootnoteItem(fi) => Block::FootnoteItem(FootnoteItem {
                children: map(fi.children),
                ..fi
            }),
            Block::FancyBlock(fb) => Block::FancyBlock(FancyBlock {
                children: map(fb.children),
                ..fb
            }),
            Block::FoldBlock(fb) => Block::FoldBlock(FoldBlock {
                children: map(fb.children),
                ..fb
            }),
            leaf => leaf,
        }
    }
}

/// Inline-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// Inline code.
    CodeSpan(String),
    /// `*emphasis*`.
    Emphasis(Vec<Inline>),
    /// `**strong**`.
    Strong(Vec<Inline>),
    /// Hyperlink.
    Link(Link),
    /// Hard line break.
    LineBreak,
    /// Resolved footnote reference.
    FootnoteRef(FootnoteRef),
    /// `==highlighted==` text.
    Mark(Vec<Inline>),
    /// Inline formula (`$…$`).
    MathInline(String),
}

/// Hyperlink with label and destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Destination URL.
    pub url: String,
    /// Optional title.
    pub title: Option<String>,
    /// Label content.
    pub children: Vec<Inline>,
}

/// A footnote reference that resolved to a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteRef {
    /// Normalized key.
    pub key: String,
    /// Declaration index plus one of the referenced definition.
    pub ordinal: usize,
    /// Occurrence index of this reference in render order.
    pub index: usize,
}

impl Inline {
    /// Type tag used by the AST projection.
    pub fn kind(&self) -> &'static str {
        match self {
            Inline::Text(_) => "text",
            Inline::CodeSpan(_) => "codespan",
            Inline::Emphasis(_) => "emphasis",
            Inline::Strong(_) => "strong",
            Inline::Link(_) => "link",
            Inline::LineBreak => "linebreak",
            Inline::FootnoteRef(_) => "footnote_ref",
            Inline::Mark(_) => "mark",
            Inline::MathInline(_) => "math_inline",
        }
    }
}

/// A heading collected for the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Raw heading text.
    pub text: String,
    /// Element id of the rendered heading.
    pub anchor: String,
}
