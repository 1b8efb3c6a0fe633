//! Arena-backed host used by the unit tests.

use crate::host::SceneHost;

#[derive(Debug, Clone)]
struct TestNode {
    id: Option<String>,
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    internal: bool,
    hidden: bool,
    alive: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct TreeHost {
    nodes: Vec<TestNode>,
}

impl TreeHost {
    /// A host with a single `SCENE` root (node 0).
    pub fn new(root_id: &str) -> Self {
        let mut host = Self { nodes: Vec::new() };
        host.push(None, Some(root_id), "SCENE", false);
        host
    }

    pub fn add(&mut self, parent: usize, id: &str) -> usize {
        self.push(Some(parent), Some(id), "ENTITY", false)
    }

    pub fn add_anonymous(&mut self, parent: usize) -> usize {
        self.push(Some(parent), None, "ENTITY", false)
    }

    pub fn add_internal(&mut self, parent: usize, id: &str) -> usize {
        self.push(Some(parent), Some(id), "ENTITY", true)
    }

    pub fn set_tag(&mut self, node: usize, tag: &str) {
        self.nodes[node].tag = tag.to_string();
    }

    pub fn set_id(&mut self, node: usize, id: &str) {
        self.nodes[node].id = Some(id.to_string());
    }

    pub fn set_classes(&mut self, node: usize, classes: &[&str]) {
        self.nodes[node].classes = classes.iter().map(|c| c.to_string()).collect();
    }

    pub fn set_attribute(&mut self, node: usize, name: &str, value: &str) {
        self.nodes[node]
            .attributes
            .push((name.to_string(), value.to_string()));
    }

    pub fn set_hidden(&mut self, node: usize, hidden: bool) {
        self.nodes[node].hidden = hidden;
    }

    /// Detach `node` from its parent and mark its subtree dead.
    pub fn remove(&mut self, node: usize) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            self.nodes[current].alive = false;
            stack.extend(self.nodes[current].children.iter().copied());
        }
    }

    fn push(&mut self, parent: Option<usize>, id: Option<&str>, tag: &str, internal: bool) -> usize {
        let index = self.nodes.len();
        self.nodes.push(TestNode {
            id: id.map(str::to_string),
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            parent,
            children: Vec::new(),
            internal,
            hidden: false,
            alive: true,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }
}

impl SceneHost for TreeHost {
    type Node = usize;

    fn root(&self) -> usize {
        0
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    fn children(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }

    fn identifier(&self, node: usize) -> Option<String> {
        self.nodes[node].id.clone()
    }

    fn tag_name(&self, node: usize) -> String {
        self.nodes[node].tag.clone()
    }

    fn class_list(&self, node: usize) -> Vec<String> {
        self.nodes[node].classes.clone()
    }

    fn is_editor_internal(&self, node: usize) -> bool {
        self.nodes[node].internal
    }

    fn is_alive(&self, node: usize) -> bool {
        self.nodes.get(node).is_some_and(|n| n.alive)
    }

    fn attribute(&self, node: usize, name: &str) -> Option<String> {
        match name {
            "id" => self.identifier(node),
            "class" => Some(self.nodes[node].classes.join(" ")).filter(|c| !c.is_empty()),
            _ => self.nodes[node]
                .attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
        }
    }

    fn is_hidden(&self, node: usize) -> bool {
        self.nodes[node].hidden
    }
}
