use crate::dom::{NodeId, NodeKind, Tree};
use crate::profile::is_block_tag;

pub fn insert_block_breaks(tree: &mut Tree) -> usize {
    let mut inserted = 0usize;
    walk(tree, tree.root(), &mut inserted);
    inserted
}

fn walk(tree: &mut Tree, parent: NodeId, inserted: &mut usize) {
    let mut i = 0usize;
    // Children may grow while we iterate; newly inserted text nodes are
    // skipped over since they are never elements.
    while i < tree.children(parent).len() {
        let child = tree.children(parent)[i];
        if let Some(tag) = tree.tag(child) {
            if is_block_tag(&tag) && ensure_break_after(tree, parent, i) {
                *inserted += 1;
            }
            walk(tree, child, inserted);
        }
        i += 1;
    }
}

fn ensure_break_after(tree: &mut Tree, parent: NodeId, index: usize) -> bool {
    let next = tree.children(parent).get(index + 1).copied();
    if let Some(next) = next {
        if let Some(text) = tree.text_mut(next) {
            if text.starts_with('\n') {
                return false;
            }
            text.insert(0, '\n');
            return true;
        }
    }
    tree.insert_child(parent, index + 1, NodeKind::Text("\n".to_string()));
    true
}
