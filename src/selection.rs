use bevy::prelude::*;

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Selection>()
            .add_observer(on_selected_removed);
    }
}

/// Marker component placed on the selected entity.
#[derive(Component)]
pub struct Selected;

/// Editor-wide selection, shared by the outliner and every other panel.
#[derive(Resource, Default)]
pub struct Selection {
    /// Ordered list of selected entities. The last entity is the primary selection.
    pub entities: Vec<Entity>,
}

impl Selection {
    /// Select a single entity, clearing all others.
    pub fn select_single(&mut self, commands: &mut Commands, entity: Entity) {
        for &e in &self.entities {
            if e != entity {
                if let Ok(mut ec) = commands.get_entity(e) {
                    ec.remove::<Selected>();
                }
            }
        }
        self.entities.clear();
        self.entities.push(entity);
        if let Ok(mut ec) = commands.get_entity(entity) {
            ec.insert(Selected);
        }
    }

    /// The primary (last) selected entity. This is what the outliner follows.
    pub fn primary(&self) -> Option<Entity> {
        self.entities.last().copied()
    }
}

/// Drop despawned entities from the selection.
fn on_selected_removed(trigger: On<Remove, Selected>, mut selection: ResMut<Selection>) {
    let entity = trigger.event_target();
    selection.entities.retain(|&e| e != entity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<Selection>();
        world.add_observer(on_selected_removed);
        world
    }

    #[test]
    fn select_single_replaces_marker() {
        let mut world = world();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        world
            .run_system_once(move |mut commands: Commands, mut selection: ResMut<Selection>| {
                selection.select_single(&mut commands, a);
            })
            .unwrap();
        world
            .run_system_once(move |mut commands: Commands, mut selection: ResMut<Selection>| {
                selection.select_single(&mut commands, b);
            })
            .unwrap();

        assert!(world.get::<Selected>(a).is_none());
        assert!(world.get::<Selected>(b).is_some());
        assert_eq!(world.resource::<Selection>().primary(), Some(b));
    }

    #[test]
    fn reselecting_keeps_the_marker() {
        let mut world = world();
        let a = world.spawn_empty().id();
        for _ in 0..2 {
            world
                .run_system_once(move |mut commands: Commands, mut selection: ResMut<Selection>| {
                    selection.select_single(&mut commands, a);
                })
                .unwrap();
        }
        assert!(world.get::<Selected>(a).is_some());
        assert_eq!(world.resource::<Selection>().entities, vec![a]);
    }

    #[test]
    fn despawn_drops_from_selection() {
        let mut world = world();
        let a = world.spawn_empty().id();
        world
            .run_system_once(move |mut commands: Commands, mut selection: ResMut<Selection>| {
                selection.select_single(&mut commands, a);
            })
            .unwrap();
        world.despawn(a);
        assert_eq!(world.resource::<Selection>().primary(), None);
    }
}
