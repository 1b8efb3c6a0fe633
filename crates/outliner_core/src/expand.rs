use std::collections::HashMap;
use std::hash::Hash;

use crate::host::SceneHost;

/// Which rows the user has expanded, keyed by node handle.
///
/// Handles do not keep nodes alive. Entries for nodes the host has since
/// destroyed are dropped by [`ExpandState::prune`], which the outliner runs on
/// every rebuild.
#[derive(Clone, Debug)]
pub struct ExpandState<N> {
    expanded: HashMap<N, bool>,
}

impl<N: Copy + Eq + Hash> ExpandState<N> {
    /// The root starts expanded, everything else collapsed.
    pub fn new(root: N) -> Self {
        Self {
            expanded: HashMap::from([(root, true)]),
        }
    }

    pub fn is_expanded(&self, node: N) -> bool {
        self.expanded.get(&node).copied().unwrap_or(false)
    }

    pub fn set(&mut self, node: N, expanded: bool) {
        self.expanded.insert(node, expanded);
    }

    /// Flip `node` and return the new state.
    pub fn toggle(&mut self, node: N) -> bool {
        let expanded = !self.is_expanded(node);
        self.set(node, expanded);
        expanded
    }

    /// Expand every ancestor of `node` up to and including the root.
    pub fn expand_ancestors_of<H>(&mut self, host: &H, node: N)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        let root = host.root();
        let mut ancestor = if node == root { None } else { host.parent(node) };
        while let Some(current) = ancestor {
            self.set(current, true);
            if current == root {
                break;
            }
            ancestor = host.parent(current);
        }
    }

    pub fn prune<H>(&mut self, host: &H)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        self.expanded.retain(|node, _| host.is_alive(*node));
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.expanded.len()
    }
}
