use crate::expand::ExpandState;
use crate::host::SceneHost;

/// Whether every ancestor of `node`, up to the root, is expanded.
///
/// A node without a parent is not visible through this test; the outliner
/// always draws the root row on its own.
pub fn is_visible<H: SceneHost + ?Sized>(
    host: &H,
    expand: &ExpandState<H::Node>,
    node: H::Node,
) -> bool {
    let root = host.root();
    let Some(mut ancestor) = host.parent(node) else {
        return false;
    };
    loop {
        if !expand.is_expanded(ancestor) {
            return false;
        }
        if ancestor == root {
            return true;
        }
        match host.parent(ancestor) {
            Some(next) => ancestor = next,
            None => return true,
        }
    }
}
