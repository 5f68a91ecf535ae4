// Interactive tutorial: a sequence of instruction screens, each optionally
// backed by a live demo rendered through a secondary camera.
pub(crate) mod camera;
pub(crate) mod catalog;
pub(crate) mod demo;
pub(crate) mod flow;
pub(crate) mod gate;
pub(crate) mod transition;
pub(crate) mod ui;

use bevy::prelude::*;

use crate::sections::{Navigate, Sections};
use camera::DemoViewport;
use catalog::{DemoKind, ScreenCatalog};
use demo::{DemoStage, DemoTemplates};
use flow::{FlowCommand, FlowOutcome, TutorialFlow};
use gate::InputObserved;
use transition::Crossfade;
use ui::TutorialWidgets;

/// Tuning and wiring for the tutorial section.
#[derive(Resource, Clone, Debug)]
pub struct TutorialConfig {
    /// Full length of a screen crossfade, out and in (seconds).
    pub fade_duration: f32,
    /// Where demo actors are spawned and the demo camera looks.
    pub anchor: Vec3,
    pub viewport: DemoViewport,
    pub advance_keys: Vec<KeyCode>,
    pub retreat_keys: Vec<KeyCode>,
    /// Section loaded when advancing past the last screen.
    pub complete_target: Sections,
    /// Section loaded when retreating from the first screen.
    pub exit_target: Sections,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            fade_duration: 0.5,
            // Far from the origin so the UI camera never sees the demo.
            anchor: Vec3::new(10_000.0, 0.0, 0.0),
            viewport: DemoViewport::default(),
            advance_keys: vec![KeyCode::Enter, KeyCode::NumpadEnter],
            retreat_keys: vec![KeyCode::Backspace],
            complete_target: Sections::Arena,
            exit_target: Sections::Menu,
        }
    }
}

/// Tells the demo manager and camera switcher what the current screen needs.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCue {
    Show(DemoKind),
    Hide,
}

pub struct TutorialPlugin(pub TutorialConfig);

impl Plugin for TutorialPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.0.clone())
            .init_resource::<ScreenCatalog>()
            .init_resource::<DemoTemplates>()
            .init_resource::<DemoStage>()
            .init_resource::<camera::ActiveAnchor>()
            .add_message::<FlowCommand>()
            .add_message::<InputObserved>()
            .add_message::<DemoCue>()
            .add_systems(Startup, (demo::spawn_demo_anchor, camera::spawn_demo_camera))
            .add_systems(
                OnEnter(Sections::Tutorial),
                (ui::spawn_tutorial_ui, start_tutorial).chain(),
            )
            .add_systems(OnExit(Sections::Tutorial), exit_tutorial)
            .add_systems(
                Update,
                (
                    gate::collect_raw_input,
                    gate::observe_input,
                    key_actions,
                    ui::button_actions,
                    handle_flow_commands,
                    transition::run_crossfade,
                    demo::run_demo_cues,
                    camera::switch_demo_camera,
                    demo::run_demo_routines,
                    ui::refresh_controls,
                )
                    .chain()
                    .run_if(in_state(Sections::Tutorial)),
            );
    }
}

fn start_tutorial(
    mut commands: Commands,
    catalog: Res<ScreenCatalog>,
    widgets: Res<TutorialWidgets>,
    mut cues: MessageWriter<DemoCue>,
    mut texts: Query<&mut Text>,
    mut layout: Query<&mut Node>,
) {
    let flow = TutorialFlow::start(&catalog);
    let Some(screen) = flow.current_screen(&catalog) else {
        return;
    };
    let demos = catalog.iter().filter(|screen| screen.has_demo()).count();
    info!(
        "Starting tutorial: {} screens, {demos} with demos",
        catalog.len()
    );

    ui::show_screen(
        screen,
        0,
        catalog.len(),
        flow.input_satisfied(),
        &widgets,
        &mut texts,
        &mut layout,
    );
    cues.write(if screen.has_demo() {
        DemoCue::Show(screen.demo_kind)
    } else {
        DemoCue::Hide
    });
    commands.insert_resource(flow);
}

fn exit_tutorial(
    mut commands: Commands,
    mut stage: ResMut<DemoStage>,
    mut active_anchor: ResMut<camera::ActiveAnchor>,
    mut cameras: Query<&mut Camera, With<camera::DemoCamera>>,
) {
    // Teardown is synchronous: no fade, routine or demo entity survives.
    stage.stop(&mut commands);
    camera::deactivate(cameras.iter_mut(), &mut active_anchor);
    commands.remove_resource::<Crossfade>();
    commands.remove_resource::<TutorialFlow>();
    commands.remove_resource::<TutorialWidgets>();
    info!("Left tutorial");
}

fn key_actions(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    config: Res<TutorialConfig>,
    mut requests: MessageWriter<FlowCommand>,
) {
    let Some(keys) = keys else {
        return;
    };
    for key in keys.get_just_pressed() {
        if config.advance_keys.contains(key) {
            requests.write(FlowCommand::Advance);
        } else if config.retreat_keys.contains(key) {
            requests.write(FlowCommand::Retreat);
        }
    }
}

fn handle_flow_commands(
    mut commands: Commands,
    mut requests: MessageReader<FlowCommand>,
    mut flow: ResMut<TutorialFlow>,
    catalog: Res<ScreenCatalog>,
    config: Res<TutorialConfig>,
    mut navigate: MessageWriter<Navigate>,
) {
    // First command of the frame wins; anything after it is dropped.
    let Some(command) = requests.read().next().copied() else {
        return;
    };
    requests.clear();

    match flow.apply(&catalog, command) {
        FlowOutcome::Ignored => {
            debug!("Ignored {command:?} on screen {}", flow.current_index());
        }
        FlowOutcome::Moved { from, to } => {
            info!("Tutorial screen {from} -> {to}");
            commands.insert_resource(Crossfade::new(config.fade_duration));
        }
        FlowOutcome::Complete => {
            navigate.write(Navigate(config.complete_target));
        }
        FlowOutcome::ExitToParent => {
            navigate.write(Navigate(config.exit_target));
        }
    }
}
