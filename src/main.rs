// Main
mod arena;
mod menu;
mod sections;
mod tutorial;

use bevy::prelude::*;
use arena::ArenaPlugin;
use menu::MenuPlugin;
use sections::SectionsPlugin;
use tutorial::{TutorialConfig, TutorialPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Shieldbearer".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .add_systems(Startup, spawn_ui_camera)
        .add_plugins((
            SectionsPlugin,
            MenuPlugin,
            TutorialPlugin(TutorialConfig::default()),
            ArenaPlugin,
        ))
        .run();
}

fn spawn_ui_camera(mut commands: Commands) {
    // The demo camera has a higher order, so UI must be pinned to this one.
    commands.spawn((Camera2d, IsDefaultUiCamera));
}
