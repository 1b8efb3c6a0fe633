use bevy::prelude::*;
use outliner_core::SceneHost;

use crate::{EditorEntity, EditorHidden, NodeClasses, NodeId, NodeTag};

/// Presents the entities below an outliner root as a [`SceneHost`].
///
/// Identifier comes from [`NodeId`], falling back to [`Name`]. The tag is
/// [`NodeTag`] when present, otherwise a category derived from the entity's
/// primary component.
pub struct WorldHost<'w> {
    world: &'w World,
    root: Entity,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w World, root: Entity) -> Self {
        Self { world, root }
    }
}

/// Classify a scene entity by its primary component for the row tag.
fn classify_entity(world: &World, entity: Entity) -> &'static str {
    if world.get::<Camera>(entity).is_some() {
        return "CAMERA";
    }
    if world.get::<PointLight>(entity).is_some()
        || world.get::<DirectionalLight>(entity).is_some()
        || world.get::<SpotLight>(entity).is_some()
    {
        return "LIGHT";
    }
    if world.get::<Mesh3d>(entity).is_some() {
        return "MESH";
    }
    if world.get::<SceneRoot>(entity).is_some() {
        return "MODEL";
    }
    "ENTITY"
}

/// `bevy_pbr::light::PointLight` -> `point-light`.
pub(crate) fn component_attribute_name(type_name: &str) -> String {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    let short = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);

    let mut kebab = String::with_capacity(short.len() + 4);
    for (i, c) in short.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                kebab.push('-');
            }
            kebab.extend(c.to_lowercase());
        } else {
            kebab.push(c);
        }
    }
    kebab
}

impl SceneHost for WorldHost<'_> {
    type Node = Entity;

    fn root(&self) -> Entity {
        self.root
    }

    fn parent(&self, node: Entity) -> Option<Entity> {
        if node == self.root {
            return None;
        }
        self.world.get::<ChildOf>(node).map(ChildOf::parent)
    }

    fn children(&self, node: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(node)
            .map(|children| children.iter().collect())
            .unwrap_or_default()
    }

    fn identifier(&self, node: Entity) -> Option<String> {
        if let Some(id) = self.world.get::<NodeId>(node) {
            return Some(id.0.clone());
        }
        self.world
            .get::<Name>(node)
            .map(|name| name.as_str().to_string())
    }

    fn tag_name(&self, node: Entity) -> String {
        if let Some(tag) = self.world.get::<NodeTag>(node) {
            return tag.0.to_uppercase();
        }
        if node == self.root {
            return "SCENE".to_string();
        }
        classify_entity(self.world, node).to_string()
    }

    fn class_list(&self, node: Entity) -> Vec<String> {
        self.world
            .get::<NodeClasses>(node)
            .map(|classes| classes.0.clone())
            .unwrap_or_default()
    }

    fn is_editor_internal(&self, node: Entity) -> bool {
        self.world.get::<EditorEntity>(node).is_some()
            || self.world.get::<EditorHidden>(node).is_some()
    }

    fn is_alive(&self, node: Entity) -> bool {
        self.world.get_entity(node).is_ok()
    }

    fn attribute(&self, node: Entity, name: &str) -> Option<String> {
        match name {
            "id" => self.identifier(node),
            "name" => self
                .world
                .get::<Name>(node)
                .map(|n| n.as_str().to_string()),
            "class" => {
                let classes = self.class_list(node);
                (!classes.is_empty()).then(|| classes.join(" "))
            }
            _ => {
                let components = self.world.inspect_entity(node).ok()?;
                components
                    .into_iter()
                    .any(|info| component_attribute_name(&info.name().to_string()) == name)
                    .then(String::new)
            }
        }
    }

    fn is_hidden(&self, node: Entity) -> bool {
        matches!(self.world.get::<Visibility>(node), Some(Visibility::Hidden))
    }
}
