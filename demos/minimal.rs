//! Outliner over a small 3D scene.
//!
//! ```sh
//! cargo run --example minimal -- [settings.json]
//! ```
//!
//! Click the filter box and type to filter; try `.prop`, `#crate` or
//! `[point-light]`. Click a row, then use the arrow keys to navigate.

use anyhow::Context;
use bevy::prelude::*;
use scene_outliner::prelude::*;

fn main() -> anyhow::Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => OutlinerSettings::load(&path)
            .with_context(|| format!("loading outliner settings from {path}"))?,
        None => OutlinerSettings::default(),
    };

    let exit = App::new()
        .insert_resource(settings)
        .add_plugins((DefaultPlugins, OutlinerPlugin::default()))
        .add_systems(Startup, spawn_scene)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("app exited with code {code}"),
    }
}

fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cube = meshes.add(Cuboid::default());
    let grey = materials.add(Color::srgb(0.6, 0.6, 0.6));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        EditorEntity,
    ));

    commands.spawn((
        OutlinerRoot,
        Name::new("scene"),
        Transform::default(),
        Visibility::default(),
        children![
            (
                Name::new("Sun"),
                DirectionalLight {
                    shadows_enabled: true,
                    illuminance: 10000.0,
                    ..default()
                },
                Transform::from_xyz(10.0, 20.0, 10.0)
                    .with_rotation(Quat::from_euler(EulerRot::XYZ, -0.8, 0.4, 0.0)),
            ),
            (
                NodeId("room".into()),
                NodeClasses(vec!["interior".into()]),
                Transform::default(),
                Visibility::default(),
                children![
                    (
                        NodeId("crate".into()),
                        NodeClasses(vec!["prop".into()]),
                        Mesh3d(cube),
                        MeshMaterial3d(grey.clone()),
                        Transform::from_xyz(0.0, 0.5, 0.0),
                    ),
                    (
                        NodeId("lamp".into()),
                        PointLight {
                            intensity: 100_000.0,
                            ..default()
                        },
                        Transform::from_xyz(0.0, 3.0, 0.0),
                    ),
                ],
            ),
            (
                Name::new("floor"),
                NodeTag("ground".into()),
                Mesh3d(meshes.add(Plane3d::default().mesh().size(10.0, 10.0))),
                MeshMaterial3d(grey),
            ),
        ],
    ));
}
