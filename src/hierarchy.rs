use std::time::Duration;

use bevy::{input::InputSystems, input_focus::InputFocus, prelude::*};
use bevy_notify::prelude::{Mutation, NotifyChanged};
use outliner_core::{NavKey, Outliner, Row, Signal};

use crate::{
    EditorEntity, EditorHidden, NodeClasses, NodeId, OutlinerRoot,
    host::WorldHost,
    layout::{OutlinerFilterInput, OutlinerList},
    scroll::ScrollRowIntoView,
    selection::Selection,
    settings::OutlinerSettings,
};

/// The outliner engine bound to the current [`OutlinerRoot`].
#[derive(Resource)]
pub struct SceneOutliner {
    engine: Outliner<Entity>,
    root: Entity,
    /// Primary editor selection as of the last sync, so only changes made by
    /// other panels are forwarded into the engine.
    last_external: Option<Entity>,
    /// Engine view revision the current [`OutlinerView`] was built from.
    drawn_revision: u64,
}

impl SceneOutliner {
    pub fn engine(&self) -> &Outliner<Entity> {
        &self.engine
    }

    pub fn root(&self) -> Entity {
        self.root
    }
}

/// Rows to draw, refreshed whenever the engine's view revision moves.
#[derive(Resource, Default)]
pub struct OutlinerView {
    pub rows: Vec<Row<Entity>>,
}

/// Signals drained from the engine, waiting to be applied with [`Commands`].
#[derive(Resource, Default)]
struct PendingSignals(Vec<Signal<Entity>>);

/// Ordering anchor for the systems that consume the engine's output.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutlinerDrive;

/// A component that affects how a row is drawn changed in place.
/// `component` uses the outliner's names: `mixin` for classes, `visible`.
#[derive(Event, Clone, Debug)]
pub struct EntityComponentChanged {
    pub entity: Entity,
    pub component: String,
}

/// Replace the filter text. Applied after the filter delay.
#[derive(Event, Clone, Debug)]
pub struct SetOutlinerFilter {
    pub text: String,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct ClearOutlinerFilter;

#[derive(Event, Clone, Copy, Debug)]
pub struct ToggleOutlinerNode {
    pub entity: Entity,
}

/// Select from outside the outliner. `None` clears the selection.
#[derive(Event, Clone, Copy, Debug)]
pub struct SelectOutlinerEntity {
    pub entity: Option<Entity>,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct OutlinerRowClicked {
    pub source: Entity,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct OutlinerVisibilityToggled {
    pub source: Entity,
}

/// The outliner selected an entity.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlinerEntitySelected {
    pub entity: Entity,
}

const NAV_KEYS: [(KeyCode, NavKey); 5] = [
    (KeyCode::ArrowUp, NavKey::Up),
    (KeyCode::ArrowDown, NavKey::Down),
    (KeyCode::ArrowLeft, NavKey::Left),
    (KeyCode::ArrowRight, NavKey::Right),
    (KeyCode::Escape, NavKey::Escape),
];

pub struct HierarchyPlugin;

impl Plugin for HierarchyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OutlinerView>()
            .init_resource::<InputFocus>()
            .init_resource::<PendingSignals>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Startup, setup_change_watchers)
            .add_systems(PreUpdate, outliner_keyboard.after(InputSystems))
            .add_systems(
                Update,
                apply_settings.run_if(resource_changed::<OutlinerSettings>),
            )
            .add_systems(
                PostUpdate,
                (drive_outliner, apply_outliner_signals)
                    .chain()
                    .in_set(OutlinerDrive),
            )
            .add_observer(on_outliner_root_added)
            .add_observer(on_outliner_root_removed)
            .add_observer(on_child_attached)
            .add_observer(on_child_detached)
            .add_observer(on_identifier_inserted::<Name>)
            .add_observer(on_identifier_inserted::<NodeId>)
            .add_observer(on_classes_inserted)
            .add_observer(on_visibility_inserted)
            .add_observer(on_entity_component_changed)
            .add_observer(on_set_filter)
            .add_observer(on_clear_filter)
            .add_observer(on_toggle_node)
            .add_observer(on_select_entity)
            .add_observer(on_row_clicked)
            .add_observer(on_visibility_toggled);
    }
}

/// Run `f` against the engine with a host view of the world.
fn with_outliner(
    world: &mut World,
    f: impl FnOnce(&mut Outliner<Entity>, &WorldHost<'_>, Duration),
) {
    if !world.contains_resource::<SceneOutliner>() {
        return;
    }
    let now = world
        .get_resource::<Time>()
        .map(|time| time.elapsed())
        .unwrap_or_default();
    world.resource_scope(|world, mut outliner: Mut<SceneOutliner>| {
        let host = WorldHost::new(world, outliner.root);
        f(&mut outliner.engine, &host, now);
    });
}

// ---------------------------------------------------------------------------
// Root lifecycle
// ---------------------------------------------------------------------------

fn on_outliner_root_added(
    trigger: On<Add, OutlinerRoot>,
    mut commands: Commands,
    settings: Res<OutlinerSettings>,
    time: Res<Time>,
    existing: Option<Res<SceneOutliner>>,
) {
    let root = trigger.event_target();
    if let Some(existing) = existing {
        warn!(
            "Outliner is already attached to {}, ignoring OutlinerRoot on {root}",
            existing.root
        );
        return;
    }

    let mut engine = Outliner::new(root, settings.timings());
    engine.request_rebuild(time.elapsed());
    commands.insert_resource(SceneOutliner {
        engine,
        root,
        last_external: None,
        drawn_revision: 0,
    });
    info!("Outliner attached to {root}");
}

fn on_outliner_root_removed(
    trigger: On<Remove, OutlinerRoot>,
    mut commands: Commands,
    outliner: Option<Res<SceneOutliner>>,
    mut view: ResMut<OutlinerView>,
) {
    let root = trigger.event_target();
    if outliner.is_some_and(|outliner| outliner.root == root) {
        commands.remove_resource::<SceneOutliner>();
        view.rows.clear();
        info!("Outliner detached from {root}");
    }
}

// ---------------------------------------------------------------------------
// Observers: hierarchy changes
// ---------------------------------------------------------------------------

/// Whether `entity` sits somewhere below `root`.
fn is_under_root(entity: Entity, root: Entity, parents: &Query<&ChildOf>) -> bool {
    let mut current = entity;
    while let Ok(child_of) = parents.get(current) {
        current = child_of.parent();
        if current == root {
            return true;
        }
    }
    false
}

/// The root itself or anything below it.
fn is_listed(entity: Entity, root: Entity, parents: &Query<&ChildOf>) -> bool {
    entity == root || is_under_root(entity, root, parents)
}

fn on_child_attached(
    trigger: On<Insert, ChildOf>,
    mut commands: Commands,
    outliner: Option<Res<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
) {
    let child = trigger.event_target();
    let Some(outliner) = outliner else {
        return;
    };
    if editor_check.contains(child) || !is_under_root(child, outliner.root, &parents) {
        return;
    }
    commands.queue(move |world: &mut World| {
        with_outliner(world, |engine, host, now| {
            engine.notify_child_attached(host, child, now);
        });
    });
}

/// Fires on despawn, removal and reparenting while the old `ChildOf` is
/// still in place.
fn on_child_detached(
    trigger: On<Replace, ChildOf>,
    mut commands: Commands,
    outliner: Option<Res<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
) {
    let child = trigger.event_target();
    let Some(outliner) = outliner else {
        return;
    };
    // The rows themselves are despawned on every redraw.
    if editor_check.contains(child) || !is_under_root(child, outliner.root, &parents) {
        return;
    }
    commands.queue(move |world: &mut World| {
        with_outliner(world, |engine, host, now| {
            engine.notify_child_detached(host, child, now);
        });
    });
}

fn on_identifier_inserted<C: Component>(
    trigger: On<Insert, C>,
    outliner: Option<ResMut<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
    time: Res<Time>,
) {
    let Some(mut outliner) = outliner else {
        return;
    };
    let entity = trigger.event_target();
    if !editor_check.contains(entity) && is_listed(entity, outliner.root, &parents) {
        outliner.engine.notify_id_changed(time.elapsed());
    }
}

fn on_classes_inserted(
    trigger: On<Insert, NodeClasses>,
    outliner: Option<ResMut<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
    time: Res<Time>,
) {
    let Some(mut outliner) = outliner else {
        return;
    };
    let entity = trigger.event_target();
    if !editor_check.contains(entity) && is_listed(entity, outliner.root, &parents) {
        outliner
            .engine
            .notify_component_changed("mixin", time.elapsed());
    }
}

fn on_visibility_inserted(
    trigger: On<Insert, Visibility>,
    outliner: Option<ResMut<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
    time: Res<Time>,
) {
    let Some(mut outliner) = outliner else {
        return;
    };
    let entity = trigger.event_target();
    if !editor_check.contains(entity) && is_listed(entity, outliner.root, &parents) {
        outliner
            .engine
            .notify_component_changed("visible", time.elapsed());
    }
}

fn on_entity_component_changed(
    trigger: On<EntityComponentChanged>,
    outliner: Option<ResMut<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
    time: Res<Time>,
) {
    let Some(mut outliner) = outliner else {
        return;
    };
    if !editor_check.contains(trigger.entity) && is_listed(trigger.entity, outliner.root, &parents)
    {
        outliner
            .engine
            .notify_component_changed(&trigger.component, time.elapsed());
    }
}

/// Spawn watcher entities that notify us when components are mutated in-place.
fn setup_change_watchers(mut commands: Commands) {
    commands
        .spawn((EditorEntity, NotifyChanged::<Name>::default()))
        .observe(on_name_mutated);
    commands
        .spawn((EditorEntity, NotifyChanged::<Visibility>::default()))
        .observe(on_visibility_mutated);
}

fn on_name_mutated(
    trigger: On<Mutation<Name>>,
    outliner: Option<ResMut<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
    time: Res<Time>,
) {
    let Some(mut outliner) = outliner else {
        return;
    };
    if !editor_check.contains(trigger.mutated) && is_listed(trigger.mutated, outliner.root, &parents)
    {
        outliner.engine.notify_id_changed(time.elapsed());
    }
}

fn on_visibility_mutated(
    trigger: On<Mutation<Visibility>>,
    outliner: Option<ResMut<SceneOutliner>>,
    editor_check: Query<(), Or<(With<EditorEntity>, With<EditorHidden>)>>,
    parents: Query<&ChildOf>,
    time: Res<Time>,
) {
    let Some(mut outliner) = outliner else {
        return;
    };
    if !editor_check.contains(trigger.mutated) && is_listed(trigger.mutated, outliner.root, &parents)
    {
        outliner
            .engine
            .notify_component_changed("visible", time.elapsed());
    }
}

// ---------------------------------------------------------------------------
// Observers: requests from the UI and other panels
// ---------------------------------------------------------------------------

fn on_set_filter(
    trigger: On<SetOutlinerFilter>,
    outliner: Option<ResMut<SceneOutliner>>,
    time: Res<Time>,
) {
    if let Some(mut outliner) = outliner {
        outliner
            .engine
            .on_filter_text_change(&trigger.text, time.elapsed());
    }
}

fn on_clear_filter(
    _trigger: On<ClearOutlinerFilter>,
    outliner: Option<ResMut<SceneOutliner>>,
    time: Res<Time>,
) {
    if let Some(mut outliner) = outliner {
        outliner.engine.clear_filter(time.elapsed());
    }
}

fn on_toggle_node(trigger: On<ToggleOutlinerNode>, outliner: Option<ResMut<SceneOutliner>>) {
    if let Some(mut outliner) = outliner {
        outliner.engine.toggle_expanded_collapsed(trigger.entity);
    }
}

fn on_select_entity(trigger: On<SelectOutlinerEntity>, mut commands: Commands) {
    let entity = trigger.entity;
    commands.queue(move |world: &mut World| {
        with_outliner(world, |engine, host, now| {
            engine.select_entity(host, entity, now);
        });
    });
}

/// A row click also moves keyboard focus to the list.
fn on_row_clicked(
    trigger: On<OutlinerRowClicked>,
    mut commands: Commands,
    mut focus: ResMut<InputFocus>,
    list: Option<Single<Entity, With<OutlinerList>>>,
) {
    let source = trigger.source;
    if let Some(list) = list {
        focus.0 = Some(*list);
    }
    commands.queue(move |world: &mut World| {
        with_outliner(world, |engine, host, now| {
            engine.click_row(host, source, now);
        });
    });
}

/// Flip the source entity between hidden and inherited visibility.
fn on_visibility_toggled(
    trigger: On<OutlinerVisibilityToggled>,
    mut commands: Commands,
    mut visibility: Query<&mut Visibility>,
) {
    let source = trigger.source;
    match visibility.get_mut(source) {
        Ok(mut visibility) => {
            *visibility = match *visibility {
                Visibility::Hidden => Visibility::Inherited,
                _ => Visibility::Hidden,
            };
        }
        Err(_) => {
            if let Ok(mut ec) = commands.get_entity(source) {
                ec.insert(Visibility::Hidden);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn apply_settings(settings: Res<OutlinerSettings>, outliner: Option<ResMut<SceneOutliner>>) {
    if let Some(mut outliner) = outliner {
        outliner.engine.set_timings(settings.timings());
    }
}

/// Arrow keys are swallowed on press so nothing else reacts to them; the
/// outliner acts on release. The list takes every navigation key. The filter
/// input keeps its arrows for the caret and only hands over Escape, which
/// clears the filter and returns focus to the list.
fn outliner_keyboard(
    mut keyboard: ResMut<ButtonInput<KeyCode>>,
    mut focus: ResMut<InputFocus>,
    lists: Query<Entity, With<OutlinerList>>,
    filter_inputs: Query<(), With<OutlinerFilterInput>>,
    outliner: Option<Res<SceneOutliner>>,
    mut commands: Commands,
) {
    let Some(outliner) = outliner else {
        return;
    };
    let Some(focused) = focus.0 else {
        return;
    };
    let in_filter = filter_inputs.contains(focused);
    if !in_filter && !lists.contains(focused) {
        return;
    }

    for (code, key) in NAV_KEYS {
        if in_filter && key != NavKey::Escape {
            continue;
        }
        if keyboard.just_pressed(code) && outliner.engine.on_key_down(key).is_consumed() {
            keyboard.clear_just_pressed(code);
        }
        if keyboard.just_released(code) {
            if in_filter {
                focus.0 = lists.iter().next();
            }
            commands.queue(move |world: &mut World| {
                with_outliner(world, |engine, host, now| {
                    engine.on_key_up(host, key, now);
                });
            });
        }
    }
}

/// Follow the editor selection, run due timers and collect the engine's
/// signals.
fn drive_outliner(world: &mut World) {
    if !world.contains_resource::<SceneOutliner>() {
        return;
    }
    let external = world
        .get_resource::<Selection>()
        .and_then(Selection::primary);
    let now = world
        .get_resource::<Time>()
        .map(|time| time.elapsed())
        .unwrap_or_default();

    let (signals, rows) = world.resource_scope(|world, mut outliner: Mut<SceneOutliner>| {
        let host = WorldHost::new(world, outliner.root);
        let SceneOutliner {
            engine,
            last_external,
            drawn_revision,
            ..
        } = &mut *outliner;

        if external != *last_external {
            *last_external = external;
            if external != engine.selected() {
                engine.select_entity(&host, external, now);
            }
        }

        engine.tick(&host, now);
        let signals = engine.drain_signals();
        let rows = (engine.view_revision() != *drawn_revision).then(|| {
            *drawn_revision = engine.view_revision();
            engine.rows(&host)
        });
        (signals, rows)
    });

    if let Some(rows) = rows {
        debug!("Outliner view changed, {} rows", rows.len());
        world.resource_mut::<OutlinerView>().rows = rows;
    }
    world
        .resource_mut::<PendingSignals>()
        .0
        .extend(signals.into_iter().filter(|s| *s != Signal::ViewChanged));
}

fn apply_outliner_signals(
    mut pending: ResMut<PendingSignals>,
    mut selection: ResMut<Selection>,
    mut commands: Commands,
) {
    for signal in pending.0.drain(..) {
        match signal {
            Signal::EntitySelected(entity) => {
                if selection.primary() != Some(entity) {
                    selection.select_single(&mut commands, entity);
                }
                commands.trigger(OutlinerEntitySelected { entity });
            }
            Signal::ScrollIntoView(sequence_id) => {
                commands.trigger(ScrollRowIntoView { sequence_id });
            }
            Signal::ViewChanged => {}
        }
    }
}
