use bevy::{prelude::*, ui::ui_transform::UiGlobalTransform};
use outliner_core::SequenceId;

use crate::{
    layout::{OutlinerList, OutlinerRow},
    settings::OutlinerSettings,
};

/// Bring the row with this key into view if it is clipped by the list.
#[derive(Event, Clone, Debug)]
pub struct ScrollRowIntoView {
    pub sequence_id: SequenceId,
}

/// Vertical scroll offset the list is easing toward, in logical pixels.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ScrollTarget(pub f32);

pub struct ScrollPlugin;

impl Plugin for ScrollPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_scroll_row_into_view)
            .add_systems(Update, ease_scroll);
    }
}

/// Vertical extent of a laid-out node in physical pixels.
fn vertical_span(computed: &ComputedNode, transform: &UiGlobalTransform) -> (f32, f32) {
    let half = computed.size().y * 0.5;
    let center = transform.translation.y;
    (center - half, center + half)
}

/// Offset that puts the row's top edge at the top of the list, or `None`
/// when the row is already fully visible.
fn scroll_offset_for(
    list: (f32, f32),
    row: (f32, f32),
    current: f32,
    max: f32,
    inverse_scale: f32,
) -> Option<f32> {
    let (list_top, list_bottom) = list;
    let (row_top, row_bottom) = row;
    if row_top >= list_top && row_bottom <= list_bottom {
        return None;
    }
    let target = current + (row_top - list_top) * inverse_scale;
    Some(target.clamp(0.0, max.max(0.0)))
}

fn on_scroll_row_into_view(
    trigger: On<ScrollRowIntoView>,
    mut commands: Commands,
    rows: Query<(&OutlinerRow, &ComputedNode, &UiGlobalTransform)>,
    lists: Query<(Entity, &ScrollPosition, &ComputedNode, &UiGlobalTransform), With<OutlinerList>>,
) {
    let Some((_, row_node, row_transform)) = rows
        .iter()
        .find(|(row, ..)| row.sequence_id == trigger.sequence_id)
    else {
        debug!("No outliner row for {}, skipping scroll", trigger.sequence_id);
        return;
    };
    let Ok((list, scroll, list_node, list_transform)) = lists.single() else {
        return;
    };

    let max = (list_node.content_size().y - list_node.size().y) * list_node.inverse_scale_factor();
    if let Some(target) = scroll_offset_for(
        vertical_span(list_node, list_transform),
        vertical_span(row_node, row_transform),
        scroll.y,
        max,
        list_node.inverse_scale_factor(),
    ) {
        commands.entity(list).insert(ScrollTarget(target));
    }
}

/// Move each list a fraction of the way to its target every frame.
fn ease_scroll(
    mut commands: Commands,
    settings: Res<OutlinerSettings>,
    mut lists: Query<(Entity, &mut ScrollPosition, &ScrollTarget)>,
) {
    let easing = settings.scroll_easing.clamp(0.01, 1.0);
    for (entity, mut scroll, target) in &mut lists {
        let remaining = target.0 - scroll.y;
        if remaining.abs() < 0.5 || easing >= 1.0 {
            scroll.y = target.0;
            commands.entity(entity).remove::<ScrollTarget>();
        } else {
            scroll.y += remaining * easing;
        }
    }
}
