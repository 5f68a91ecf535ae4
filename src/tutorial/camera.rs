// Secondary camera that renders the demo into a fixed region of the window.
use bevy::camera::{ClearColorConfig, Viewport};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::demo::DemoAnchor;
use super::{DemoCue, TutorialConfig};

const DEMO_BACKDROP: Color = Color::srgb(0.06, 0.07, 0.1);

#[derive(Component)]
pub struct DemoCamera;

/// Region of the window the demo camera draws into, in logical pixels. The
/// tutorial's demo and static panels are placed on the same rect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoViewport {
    pub position: UVec2,
    pub size: UVec2,
}

impl Default for DemoViewport {
    fn default() -> Self {
        Self {
            position: UVec2::new(400, 180),
            size: UVec2::new(480, 270),
        }
    }
}

impl DemoViewport {
    pub fn physical(&self, scale_factor: f32) -> Viewport {
        Viewport {
            physical_position: (self.position.as_vec2() * scale_factor).as_uvec2(),
            physical_size: (self.size.as_vec2() * scale_factor).as_uvec2(),
            ..default()
        }
    }
}

/// Anchor position the demo camera was last pointed at, if it is active.
#[derive(Resource, Default, Debug)]
pub struct ActiveAnchor(pub Option<Vec3>);

pub(super) fn spawn_demo_camera(mut commands: Commands, config: Res<TutorialConfig>) {
    commands.spawn((
        DemoCamera,
        Camera2d,
        Camera {
            // Drawn over the UI camera, only inside the viewport.
            order: 1,
            is_active: false,
            viewport: Some(config.viewport.physical(1.0)),
            clear_color: ClearColorConfig::Custom(DEMO_BACKDROP),
            ..default()
        },
        Transform::from_translation(config.anchor),
    ));
}

pub(super) fn switch_demo_camera(
    mut cues: MessageReader<DemoCue>,
    config: Res<TutorialConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    anchors: Query<&Transform, (With<DemoAnchor>, Without<DemoCamera>)>,
    mut cameras: Query<(&mut Camera, &mut Transform), With<DemoCamera>>,
    mut active_anchor: ResMut<ActiveAnchor>,
) {
    // Only the latest cue of the frame matters.
    let Some(cue) = cues.read().last().copied() else {
        return;
    };

    let DemoCue::Show(kind) = cue else {
        deactivate(
            cameras.iter_mut().map(|(camera, _)| camera),
            &mut active_anchor,
        );
        return;
    };

    let Ok(anchor) = anchors.single() else {
        warn!("No demo anchor; leaving the demo camera off");
        return;
    };
    let Ok((mut camera, mut transform)) = cameras.single_mut() else {
        warn!("No demo camera; {kind} demo will not be visible");
        return;
    };

    // Re-read the anchor every time so a moved anchor is picked up.
    transform.translation.x = anchor.translation.x;
    transform.translation.y = anchor.translation.y;
    // Rescaled on every activation so a moved or rescaled window still lines
    // up with the panel.
    let scale_factor = windows.single().map_or(1.0, |window| window.scale_factor());
    camera.viewport = Some(config.viewport.physical(scale_factor));
    camera.is_active = true;
    if let Some(previous) = active_anchor.0.replace(anchor.translation)
        && previous != anchor.translation
    {
        debug!("Demo anchor moved from {previous}");
    }
    debug!("Demo camera on at {}", anchor.translation);
}

pub fn deactivate<'a>(
    cameras: impl IntoIterator<Item = Mut<'a, Camera>>,
    active_anchor: &mut ActiveAnchor,
) {
    for mut camera in cameras {
        camera.is_active = false;
    }
    active_anchor.0 = None;
}
