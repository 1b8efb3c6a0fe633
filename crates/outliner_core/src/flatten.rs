use crate::entry::{Entry, SequenceId};
use crate::host::SceneHost;

/// Walk the live hierarchy depth-first into a list of rows.
///
/// The root comes first at depth 0, children follow in host order, and a
/// parent always precedes its descendants. Editor-internal nodes are skipped
/// together with everything below them.
pub fn flatten<H: SceneHost + ?Sized>(host: &H) -> Vec<Entry<H::Node>> {
    let root = host.root();
    let mut entries = vec![Entry {
        node: root,
        depth: 0,
        sequence_id: SequenceId::at(0),
    }];

    let mut stack = Vec::new();
    push_children(host, root, 1, &mut stack);
    while let Some((node, depth)) = stack.pop() {
        let position = entries.len();
        entries.push(Entry {
            node,
            depth,
            sequence_id: SequenceId::at(position),
        });
        push_children(host, node, depth + 1, &mut stack);
    }

    entries
}

/// Pushed in reverse so the first child is popped first.
fn push_children<H: SceneHost + ?Sized>(
    host: &H,
    parent: H::Node,
    depth: usize,
    stack: &mut Vec<(H::Node, usize)>,
) {
    for child in host.children(parent).into_iter().rev() {
        if host.is_editor_internal(child) {
            continue;
        }
        stack.push((child, depth));
    }
}
