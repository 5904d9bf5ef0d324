//! Task lists: list items starting with `[ ]`, `[x]` or `[X]`.
//!
//! Runs as a before-render hook over the whole tree. The rewrite is
//! post-order and returns new nodes; an item that already became a task item
//! is never matched again, so running it twice changes nothing.

use crate::ast::{Block, Container, TaskListItem};
use crate::error::Result;
use crate::markdown::Markdown;
use crate::state::ParseState;

/// Add the task list rewrite as a before-render hook.
pub fn register(md: &mut Markdown) -> Result<()> {
    md.add_before_render_hook(task_lists_hook);
    Ok(())
}

fn task_lists_hook(_md: &Markdown, blocks: Vec<Block>, _state: &mut ParseState) -> Result<Vec<Block>> {
    Ok(rewrite_task_lists(blocks))
}

/// Turn every list item with a checkbox marker into a task item.
pub fn rewrite_task_lists(blocks: Vec<Block>) -> Vec<Block> {
    blocks.into_iter().map(rewrite).collect()
}

fn rewrite(block: Block) -> Block {
    match block.map_children(rewrite) {
        Block::ListItem(item) => rewrite_item(item),
        other => other,
    }
}

fn rewrite_item(item: Container) -> Block {
    let mut children = item.children;
    let marker = match children.first() {
        Some(Block::Paragraph(p) | Block::BlockText(p)) => task_marker(&p.text),
        _ => None,
    };
    let Some((checked, skip)) = marker else {
        return Block::ListItem(Container { children });
    };
    if let Some(Block::Paragraph(p) | Block::BlockText(p)) = children.first_mut() {
        p.text.replace_range(..skip, "");
    }
    Block::TaskListItem(TaskListItem { checked, children })
}

/// Parse a leading checkbox marker.
///
/// Returns the checked flag and the byte length of the marker plus the
/// whitespace after it.
pub fn task_marker(text: &str) -> Option<(bool, usize)> {
    let bytes = text.as_bytes();
    if bytes.len() < 4 || bytes[0] != b'[' || bytes[2] != b']' {
        return None;
    }
    let checked = match bytes[1] {
        b' ' => false,
        b'x' | b'X' => true,
        _ => return None,
    };
    let after = &text[3..];
    let body = after.trim_start();
    if body.len() == after.len() {
        return None;
    }
    Some((checked, text.len() - body.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_marker() {
        assert_eq!(task_marker("[ ] todo"), Some((false, 4)));
        assert_eq!(task_marker("[x]  done"), Some((true, 5)));
        assert_eq!(task_marker("[X]\tdone"), Some((true, 4)));
        assert_eq!(task_marker("[x]done"), None);
        assert_eq!(task_marker("[-] maybe"), None);
        assert_eq!(task_marker("[ ]"), None);
    }
}
