use std::fmt::Debug;
use std::hash::Hash;

use crate::selector::Selector;

/// Read-only view of a host-owned scene hierarchy.
///
/// Nodes are lightweight handles. The host decides what a node is (an ECS
/// entity, an arena index, ...); the outliner only compares and hashes them.
/// Every call must reflect the live tree at the time of the call.
pub trait SceneHost {
    type Node: Copy + Eq + Hash + Debug;

    /// The top of the outlined hierarchy.
    fn root(&self) -> Self::Node;

    /// Parent of `node`, or `None` for the root and for detached nodes.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Children of `node` in display order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Optional unique identifier, e.g. `"player"`.
    fn identifier(&self, node: Self::Node) -> Option<String>;

    /// Upper-case tag or type name, e.g. `"ENTITY"`.
    fn tag_name(&self, node: Self::Node) -> String;

    fn class_list(&self, node: Self::Node) -> Vec<String>;

    /// Nodes owned by the editor itself (gizmos, helpers, overlay UI).
    /// These and their subtrees never show up in the outliner.
    fn is_editor_internal(&self, node: Self::Node) -> bool;

    /// Whether the handle still refers to a live node.
    fn is_alive(&self, node: Self::Node) -> bool;

    /// Attribute lookup used by `[name]` and `[name=value]` selectors.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String> {
        match name {
            "id" => self.identifier(node),
            "class" => {
                let classes = self.class_list(node);
                (!classes.is_empty()).then(|| classes.join(" "))
            }
            _ => None,
        }
    }

    /// Whether the node is hidden in the rendered scene. Only affects how its
    /// row is drawn.
    fn is_hidden(&self, _node: Self::Node) -> bool {
        false
    }

    fn matches_selector(&self, node: Self::Node, selector: &Selector) -> bool {
        selector.matches(self, node)
    }
}
