use bevy::{input_focus::InputFocus, prelude::*, ui::UiSystems};
use bevy_ui_text_input::actions::{TextInputAction, TextInputEdit};
use bevy_ui_text_input::*;
use outliner_core::{Row, SequenceId};

use crate::{
    EditorEntity,
    hierarchy::{
        OutlinerDrive, OutlinerRowClicked, OutlinerView, OutlinerVisibilityToggled, SceneOutliner,
        SetOutlinerFilter, ToggleOutlinerNode,
    },
    settings::OutlinerSettings,
};

const PANEL_BG: Color = Color::srgba(0.12, 0.12, 0.12, 1.0);
const FILTER_BG: Color = Color::srgba(0.15, 0.15, 0.15, 1.0);
const FILTER_BORDER: Color = Color::srgba(0.3, 0.3, 0.3, 1.0);
const FILTER_FOCUSED_BORDER: Color = Color::srgba(0.3, 0.5, 0.8, 1.0);
const SELECTED_BG: Color = Color::srgba(0.2, 0.4, 0.7, 0.5);
const LABEL_COLOR: Color = Color::srgba(0.85, 0.85, 0.85, 1.0);
const DIMMED_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 1.0);
const FILTER_PLACEHOLDER: &str = "Filter entities";

const CATEGORY_CAMERA: Color = Color::srgba(0.286, 0.506, 0.710, 1.0);
const CATEGORY_LIGHT: Color = Color::srgba(1.0, 0.882, 0.0, 1.0);
const CATEGORY_MESH: Color = Color::srgba(0.710, 0.537, 0.294, 1.0);
const CATEGORY_SCENE: Color = Color::srgba(0.0, 0.667, 0.733, 1.0);
const CATEGORY_ENTITY: Color = Color::srgba(0.259, 0.725, 0.514, 1.0);
const GUIDE_LINE: Color = Color::srgba(1.0, 1.0, 1.0, 0.2);

/// What kind of scene object a row lists, read from its tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowCategory {
    Camera,
    Light,
    Mesh,
    Scene,
    #[default]
    Entity,
}

impl RowCategory {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "CAMERA" => Self::Camera,
            "LIGHT" => Self::Light,
            "MESH" => Self::Mesh,
            "MODEL" | "SCENE" => Self::Scene,
            _ => Self::Entity,
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Self::Camera => "◉",
            Self::Light => "✦",
            Self::Mesh => "■",
            Self::Scene => "◆",
            Self::Entity => "●",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Camera => CATEGORY_CAMERA,
            Self::Light => CATEGORY_LIGHT,
            Self::Mesh => CATEGORY_MESH,
            Self::Scene => CATEGORY_SCENE,
            Self::Entity => CATEGORY_ENTITY,
        }
    }
}

/// Marker for the outliner panel
#[derive(Component)]
#[require(EditorEntity)]
pub struct OutlinerPanel;

/// Frame around the filter input. Clicking anywhere in it focuses the input.
#[derive(Component)]
#[require(EditorEntity)]
pub struct OutlinerFilterBox;

/// The filter's text input. Its text is forwarded to the engine while it
/// has focus.
#[derive(Component)]
#[require(EditorEntity)]
pub struct OutlinerFilterInput;

/// Scroll container that holds the rows. Takes keyboard focus for the arrow
/// keys.
#[derive(Component)]
#[require(EditorEntity)]
pub struct OutlinerList;

/// One drawn row, pointing back at the scene entity it lists.
#[derive(Component, Clone, Debug)]
#[require(EditorEntity)]
pub struct OutlinerRow {
    pub source: Entity,
    pub sequence_id: SequenceId,
    pub index: usize,
}

#[derive(Component)]
#[require(EditorEntity)]
pub struct OutlinerExpandButton {
    pub source: Entity,
}

#[derive(Component)]
#[require(EditorEntity)]
pub struct OutlinerVisibilityButton {
    pub source: Entity,
}

/// Category glyph in front of a row label.
#[derive(Component, Clone, Copy, Debug)]
#[require(EditorEntity)]
pub struct OutlinerRowIcon(pub RowCategory);

pub struct LayoutPlugin;

impl Plugin for LayoutPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                handle_row_buttons,
                handle_filter_box,
                forward_filter_text,
                sync_filter_input.run_if(resource_exists::<SceneOutliner>),
                filter_focus_style.run_if(resource_changed::<InputFocus>),
            )
                .chain(),
        )
        .add_systems(
            PostUpdate,
            sync_rows
                .run_if(resource_changed::<OutlinerView>)
                .after(OutlinerDrive)
                .before(UiSystems::Layout),
        );
    }
}

pub fn spawn_outliner_panel(mut commands: Commands) {
    commands.spawn(outliner_panel());
}

pub fn outliner_panel() -> impl Bundle {
    (
        OutlinerPanel,
        Node {
            width: px(280),
            height: percent(100),
            flex_direction: FlexDirection::Column,
            padding: UiRect::all(px(4)),
            row_gap: px(4),
            ..default()
        },
        BackgroundColor(PANEL_BG),
        children![
            (
                OutlinerFilterBox,
                Button,
                Node {
                    width: percent(100),
                    height: px(28),
                    padding: UiRect::axes(px(8), px(4)),
                    align_items: AlignItems::Center,
                    border: UiRect::all(px(1)),
                    ..default()
                },
                BackgroundColor(FILTER_BG),
                BorderColor::all(FILTER_BORDER),
                children![(
                    OutlinerFilterInput,
                    TextInputNode {
                        mode: TextInputMode::SingleLine,
                        clear_on_submit: false,
                        unfocus_on_submit: true,
                        ..default()
                    },
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(LABEL_COLOR),
                    TextInputStyle {
                        cursor_color: LABEL_COLOR,
                        cursor_width: 1.0,
                        selection_color: SELECTED_BG,
                        ..default()
                    },
                    TextInputPrompt {
                        text: FILTER_PLACEHOLDER.to_string(),
                        color: Some(DIMMED_COLOR),
                        ..default()
                    },
                    Node {
                        flex_grow: 1.0,
                        height: percent(100),
                        justify_content: JustifyContent::Center,
                        overflow: Overflow::clip(),
                        ..default()
                    },
                )],
            ),
            (
                OutlinerList,
                Node {
                    width: percent(100),
                    flex_grow: 1.0,
                    min_height: px(0),
                    flex_direction: FlexDirection::Column,
                    overflow: Overflow::scroll_y(),
                    ..default()
                },
                ScrollPosition::default(),
            ),
        ],
    )
}

pub fn outliner_row(row: &Row<Entity>, settings: &OutlinerSettings) -> impl Bundle {
    let arrow = match (row.has_children, row.expanded) {
        (false, _) => "",
        (true, true) => "▼",
        (true, false) => "▶",
    };
    let bg = if row.selected { SELECTED_BG } else { Color::NONE };
    let label_color = if row.hidden { DIMMED_COLOR } else { LABEL_COLOR };
    let eye = if row.hidden { "○" } else { "●" };
    let category = RowCategory::from_tag(&row.tag);
    let icon_color = if row.hidden {
        category.color().with_alpha(0.4)
    } else {
        category.color()
    };

    (
        OutlinerRow {
            source: row.node,
            sequence_id: row.sequence_id.clone(),
            index: row.index,
        },
        Button,
        Node {
            width: percent(100),
            height: px(settings.row_height),
            flex_shrink: 0.0,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(bg),
        children![
            indent_guides(row.depth, settings),
            (
                OutlinerExpandButton { source: row.node },
                Button,
                Node {
                    width: px(16),
                    height: px(settings.row_height),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                children![(
                    EditorEntity,
                    Text::new(arrow),
                    TextFont {
                        font_size: 10.0,
                        ..default()
                    },
                )],
            ),
            (
                OutlinerRowIcon(category),
                Node {
                    width: px(16),
                    margin: UiRect::right(px(4)),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                Text::new(category.glyph()),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(icon_color),
            ),
            (
                EditorEntity,
                Node {
                    flex_grow: 1.0,
                    ..default()
                },
                Text::new(row.label.clone()),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(label_color),
            ),
            (
                OutlinerVisibilityButton { source: row.node },
                Button,
                Node {
                    width: px(20),
                    height: px(settings.row_height),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                children![(
                    EditorEntity,
                    Text::new(eye),
                    TextFont {
                        font_size: 11.0,
                        ..default()
                    },
                    TextColor(label_color),
                )],
            ),
        ],
    )
}

/// One column per ancestor level, each with a faint line down its middle.
fn indent_guides(depth: usize, settings: &OutlinerSettings) -> impl Bundle {
    let half = settings.indent * 0.5;
    (
        EditorEntity,
        Node {
            width: px(depth as f32 * settings.indent),
            height: percent(100),
            flex_shrink: 0.0,
            ..default()
        },
        Children::spawn(SpawnIter((0..depth).map(move |_| {
            (
                EditorEntity,
                Node {
                    width: px(half),
                    height: percent(100),
                    margin: UiRect::left(px(half)),
                    border: UiRect::left(px(1)),
                    ..default()
                },
                BorderColor::all(GUIDE_LINE),
            )
        }))),
    )
}

/// Redraw every row from [`OutlinerView`].
fn sync_rows(
    mut commands: Commands,
    view: Res<OutlinerView>,
    settings: Res<OutlinerSettings>,
    list: Option<Single<Entity, With<OutlinerList>>>,
) {
    let Some(list) = list else {
        return;
    };
    let list = *list;
    commands.entity(list).despawn_related::<Children>();
    for row in &view.rows {
        commands.spawn((outliner_row(row, &settings), ChildOf(list)));
    }
}

/// Row, arrow and eye clicks. The arrow and the eye do not also count as a
/// click on their row.
fn handle_row_buttons(
    mut commands: Commands,
    rows: Query<(&Interaction, &OutlinerRow), Changed<Interaction>>,
    arrows: Query<(&Interaction, &OutlinerExpandButton), Changed<Interaction>>,
    eyes: Query<(&Interaction, &OutlinerVisibilityButton), Changed<Interaction>>,
) {
    let mut handled = Vec::new();

    for (interaction, arrow) in &arrows {
        if *interaction == Interaction::Pressed {
            commands.trigger(ToggleOutlinerNode {
                entity: arrow.source,
            });
            handled.push(arrow.source);
        }
    }
    for (interaction, eye) in &eyes {
        if *interaction == Interaction::Pressed {
            commands.trigger(OutlinerVisibilityToggled { source: eye.source });
            handled.push(eye.source);
        }
    }
    for (interaction, row) in &rows {
        if *interaction == Interaction::Pressed && !handled.contains(&row.source) {
            commands.trigger(OutlinerRowClicked { source: row.source });
        }
    }
}

/// Clicking the filter frame focuses its input.
fn handle_filter_box(
    filter_box: Query<(&Interaction, &Children), (Changed<Interaction>, With<OutlinerFilterBox>)>,
    inputs: Query<(), With<OutlinerFilterInput>>,
    mut focus: ResMut<InputFocus>,
) {
    for (interaction, children) in &filter_box {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if let Some(input) = children.iter().find(|child| inputs.contains(*child)) {
            focus.0 = Some(input);
        }
    }
}

/// Send what the user typed to the engine. Only the focused input is read,
/// so text pushed into the box by [`sync_filter_input`] is not echoed back.
fn forward_filter_text(
    inputs: Query<(Entity, &TextInputBuffer), (Changed<TextInputBuffer>, With<OutlinerFilterInput>)>,
    focus: Res<InputFocus>,
    outliner: Option<Res<SceneOutliner>>,
    mut commands: Commands,
) {
    let Some(outliner) = outliner else {
        return;
    };
    for (entity, buffer) in &inputs {
        if focus.0 != Some(entity) {
            continue;
        }
        let text = buffer.get_text();
        if text != outliner.engine().filter_text() {
            commands.trigger(SetOutlinerFilter { text });
        }
    }
}

/// Mirror filter changes made elsewhere (Escape, [`crate::hierarchy::ClearOutlinerFilter`])
/// into an input that is not being typed in.
fn sync_filter_input(
    outliner: Res<SceneOutliner>,
    focus: Res<InputFocus>,
    mut inputs: Query<(Entity, &TextInputBuffer, &mut TextInputQueue), With<OutlinerFilterInput>>,
) {
    let text = outliner.engine().filter_text();
    for (entity, buffer, mut queue) in &mut inputs {
        if focus.0 == Some(entity) || buffer.get_text() == text {
            continue;
        }
        queue.add(TextInputAction::Edit(TextInputEdit::SelectAll));
        queue.add(TextInputAction::Edit(TextInputEdit::Paste(text.to_string())));
    }
}

fn filter_focus_style(
    focus: Res<InputFocus>,
    mut boxes: Query<(&Children, &mut BorderColor), With<OutlinerFilterBox>>,
) {
    for (children, mut border) in &mut boxes {
        let focused = focus.0.is_some_and(|entity| children.contains(&entity));
        *border = BorderColor::all(if focused {
            FILTER_FOCUSED_BORDER
        } else {
            FILTER_BORDER
        });
    }
}
