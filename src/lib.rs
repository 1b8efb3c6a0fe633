pub mod hierarchy;
pub mod host;
pub mod layout;
pub mod scroll;
pub mod selection;
pub mod settings;

use bevy::prelude::*;
use bevy_ui_text_input::TextInputPlugin;

pub use outliner_core;

/// Marker for entities the editor itself spawns. They never show up in the
/// outliner, and neither do their descendants.
#[derive(Component, Default)]
pub struct EditorEntity;

/// Keeps an entity and its subtree out of the outliner without marking it as
/// editor-owned.
#[derive(Component, Default)]
pub struct EditorHidden;

/// The entity whose subtree the outliner lists. Only one may exist at a time.
#[derive(Component, Default)]
pub struct OutlinerRoot;

/// Explicit identifier shown on the row and matched by `#id` selectors.
/// Entities without one fall back to their [`Name`].
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct NodeId(pub String);

/// Overrides the tag the outliner derives from the entity's components.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct NodeTag(pub String);

/// Class names, matched exactly by the filter and by `.class` selectors.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeClasses(pub Vec<String>);

pub mod prelude {
    pub use crate::hierarchy::{
        ClearOutlinerFilter, EntityComponentChanged, OutlinerEntitySelected, OutlinerRowClicked,
        OutlinerView, OutlinerVisibilityToggled, SceneOutliner, SelectOutlinerEntity,
        SetOutlinerFilter, ToggleOutlinerNode,
    };
    pub use crate::layout::RowCategory;
    pub use crate::scroll::ScrollRowIntoView;
    pub use crate::selection::{Selected, Selection};
    pub use crate::settings::{OutlinerSettings, SettingsError};
    pub use crate::{
        EditorEntity, EditorHidden, NodeClasses, NodeId, NodeTag, OutlinerPlugin, OutlinerRoot,
    };
}

pub struct OutlinerPlugin {
    /// Spawn the outliner panel UI at startup. Headless apps and tests turn
    /// this off and read [`hierarchy::OutlinerView`] instead.
    pub spawn_panel: bool,
}

impl Default for OutlinerPlugin {
    fn default() -> Self {
        Self { spawn_panel: true }
    }
}

impl Plugin for OutlinerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<settings::OutlinerSettings>().add_plugins((
            selection::SelectionPlugin,
            hierarchy::HierarchyPlugin,
            layout::LayoutPlugin,
            scroll::ScrollPlugin,
        ));

        if self.spawn_panel {
            if !app.is_plugin_added::<TextInputPlugin>() {
                app.add_plugins(TextInputPlugin);
            }
            app.add_systems(Startup, layout::spawn_outliner_panel);
        }
    }
}
