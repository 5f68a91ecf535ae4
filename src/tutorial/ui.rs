// Tutorial screen layout and the widget bundle the flow writes into.

use bevy::prelude::*;

use super::TutorialConfig;
use super::catalog::{InputCode, ScreenSpec};
use super::flow::{FlowCommand, TutorialFlow};
use crate::sections::Sections;

const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.35, 0.35);
const DISABLED_BUTTON: Color = Color::srgb(0.08, 0.08, 0.08);

const TEXT_COLOUR: Color = Color::WHITE;
const HINT_COLOUR: Color = Color::srgb(0.9, 0.8, 0.4);
const SUCCESS_COLOUR: Color = Color::srgb(0.4, 1.0, 0.5);

pub const GATE_OPEN_TEXT: &str = "Nice! Continue when you're ready.";

/// Entity references for every widget the tutorial updates. Any of them may be
/// absent; the affected update is skipped with a warning.
#[derive(Resource, Default, Debug, Clone)]
pub struct TutorialWidgets {
    pub title: Option<Entity>,
    pub body: Option<Entity>,
    pub progress: Option<Entity>,
    pub gate_hint: Option<Entity>,
    pub advance_button: Option<Entity>,
    pub advance_label: Option<Entity>,
    pub back_button: Option<Entity>,
    /// Frame the demo viewport is drawn over.
    pub demo_panel: Option<Entity>,
    /// Shown in place of the demo panel on screens without a demo.
    pub static_panel: Option<Entity>,
}

/// Text that fades with the screen during a crossfade.
#[derive(Component)]
pub struct ScreenContent;

#[derive(Component)]
pub struct AdvanceButton;

#[derive(Component)]
pub struct BackButton;

pub(super) fn spawn_tutorial_ui(mut commands: Commands, config: Res<TutorialConfig>) {
    let mut widgets = TutorialWidgets::default();
    // Panels sit exactly where the demo camera draws.
    let rect = config.viewport;
    let panel_node = || Node {
        position_type: PositionType::Absolute,
        left: Val::Px(rect.position.x as f32),
        top: Val::Px(rect.position.y as f32),
        width: Val::Px(rect.size.x as f32),
        height: Val::Px(rect.size.y as f32),
        ..default()
    };

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            DespawnOnExit(Sections::Tutorial),
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(0.0),
                    width: Val::Percent(100.0),
                    height: Val::Px(rect.position.y as f32),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::End,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(8.0),
                    padding: UiRect::bottom(Val::Px(16.0)),
                    ..default()
                })
                .with_children(|header| {
                    widgets.progress = Some(spawn_text(
                        header,
                        16.0,
                        Color::srgb(0.6, 0.6, 0.6),
                        false,
                    ));
                    widgets.title = Some(spawn_text(header, 40.0, TEXT_COLOUR, true));
                });

            widgets.demo_panel = Some(
                parent
                    .spawn((
                        Node {
                            border: UiRect::all(Val::Px(2.0)),
                            display: Display::None,
                            ..panel_node()
                        },
                        BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                    ))
                    .id(),
            );
            widgets.static_panel = Some(
                parent
                    .spawn((
                        Node {
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..panel_node()
                        },
                        BackgroundColor(Color::srgb(0.1, 0.1, 0.14)),
                    ))
                    .with_children(|panel| {
                        panel.spawn((
                            Text::new("Shieldbearer"),
                            TextFont {
                                font_size: 32.0,
                                ..default()
                            },
                            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.2)),
                        ));
                    })
                    .id(),
            );

            parent
                .spawn(Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px((rect.position.y + rect.size.y) as f32),
                    width: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(12.0),
                    padding: UiRect::top(Val::Px(16.0)),
                    ..default()
                })
                .with_children(|footer| {
                    widgets.body = Some(spawn_text(footer, 22.0, TEXT_COLOUR, true));
                    widgets.gate_hint = Some(spawn_text(footer, 20.0, HINT_COLOUR, true));

                    footer
                        .spawn(Node {
                            column_gap: Val::Px(24.0),
                            margin: UiRect::top(Val::Px(8.0)),
                            ..default()
                        })
                        .with_children(|row| {
                            let (back, _) = spawn_button(row, "Back", BackButton);
                            let (advance, label) = spawn_button(row, "", AdvanceButton);
                            widgets.back_button = Some(back);
                            widgets.advance_button = Some(advance);
                            widgets.advance_label = Some(label);
                        });
                });
        });

    commands.insert_resource(widgets);
}

fn spawn_text(
    parent: &mut ChildSpawnerCommands,
    size: f32,
    colour: Color,
    fades: bool,
) -> Entity {
    let mut text = parent.spawn((
        Text::new(""),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(colour),
        Node {
            max_width: Val::Px(720.0),
            ..default()
        },
    ));
    if fades {
        text.insert(ScreenContent);
    }
    text.id()
}

/// Returns the button and its label.
fn spawn_button(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    marker: impl Component,
) -> (Entity, Entity) {
    let mut label_entity = Entity::PLACEHOLDER;
    let button = parent
        .spawn((
            marker,
            Button,
            Node {
                width: Val::Px(160.0),
                height: Val::Px(48.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
            BackgroundColor(NORMAL_BUTTON),
        ))
        .with_children(|btn| {
            label_entity = btn
                .spawn((
                    ScreenContent,
                    Text::new(label),
                    TextFont {
                        font_size: 22.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOUR),
                ))
                .id();
        })
        .id();
    (button, label_entity)
}

/// Writes `screen` into the widgets: text, labels and demo-vs-static layout.
/// `gate_open` picks between the gate prompt and the success text.
pub fn show_screen(
    screen: &ScreenSpec,
    index: usize,
    count: usize,
    gate_open: bool,
    widgets: &TutorialWidgets,
    texts: &mut Query<&mut Text>,
    layout: &mut Query<&mut Node>,
) {
    set_text(texts, widgets.title, "title", &screen.title);
    set_text(texts, widgets.body, "body", &screen.body);
    set_text(
        texts,
        widgets.advance_label,
        "advance label",
        &screen.advance_label,
    );
    let progress = format!("{} / {count}", index + 1);
    set_text(texts, widgets.progress, "progress", &progress);
    let hint = gate_hint(screen, gate_open);
    set_text(texts, widgets.gate_hint, "gate hint", &hint);

    let (demo, fixed) = if screen.has_demo() {
        (Display::Flex, Display::None)
    } else {
        (Display::None, Display::Flex)
    };
    set_display(layout, widgets.demo_panel, "demo panel", demo);
    set_display(layout, widgets.static_panel, "static panel", fixed);
}

pub fn show_gate_opened(widgets: &TutorialWidgets, texts: &mut Query<&mut Text>) {
    set_text(texts, widgets.gate_hint, "gate hint", GATE_OPEN_TEXT);
}

pub fn set_content_opacity(
    opacity: f32,
    content: &mut Query<&mut TextColor, With<ScreenContent>>,
) {
    for mut colour in content.iter_mut() {
        colour.0.set_alpha(opacity);
    }
}

fn gate_hint(screen: &ScreenSpec, open: bool) -> String {
    if !screen.requires_input {
        return String::new();
    }
    if open {
        return GATE_OPEN_TEXT.to_string();
    }
    let inputs: Vec<String> = screen
        .accepted_inputs
        .iter()
        .map(|code| describe_input(*code))
        .collect();
    format!("Try it: {}", inputs.join(" / "))
}

/// Human-readable name of an input code.
pub fn describe_input(code: InputCode) -> String {
    match code {
        InputCode::Key(key) => {
            let name = format!("{key:?}");
            name.strip_prefix("Key")
                .or_else(|| name.strip_prefix("Digit"))
                .filter(|rest| !rest.is_empty())
                .map(str::to_string)
                .unwrap_or(name)
        }
        InputCode::Mouse(MouseButton::Left) => "Left click".into(),
        InputCode::Mouse(MouseButton::Right) => "Right click".into(),
        InputCode::Mouse(MouseButton::Middle) => "Middle click".into(),
        InputCode::Mouse(button) => format!("Mouse {button:?}"),
    }
}

fn set_text(texts: &mut Query<&mut Text>, widget: Option<Entity>, name: &str, value: &str) {
    let Some(entity) = widget else {
        warn!("Tutorial widget `{name}` is missing; skipping update");
        return;
    };
    let Ok(mut text) = texts.get_mut(entity) else {
        warn!("Tutorial widget `{name}` ({entity}) has no text; skipping update");
        return;
    };
    if text.0 != value {
        **text = value.to_string();
    }
}

fn set_display(
    layout: &mut Query<&mut Node>,
    widget: Option<Entity>,
    name: &str,
    display: Display,
) {
    let Some(entity) = widget else {
        warn!("Tutorial widget `{name}` is missing; skipping layout");
        return;
    };
    let Ok(mut node) = layout.get_mut(entity) else {
        warn!("Tutorial widget `{name}` ({entity}) has no node; skipping layout");
        return;
    };
    node.display = display;
}

pub(super) fn button_actions(
    advance: Query<&Interaction, (Changed<Interaction>, With<AdvanceButton>)>,
    back: Query<&Interaction, (Changed<Interaction>, With<BackButton>)>,
    mut requests: MessageWriter<FlowCommand>,
) {
    if advance.iter().any(|i| *i == Interaction::Pressed) {
        requests.write(FlowCommand::Advance);
    }
    if back.iter().any(|i| *i == Interaction::Pressed) {
        requests.write(FlowCommand::Retreat);
    }
}

/// Keeps the navigation buttons and gate marker in step with the flow.
pub(super) fn refresh_controls(
    flow: Res<TutorialFlow>,
    widgets: Res<TutorialWidgets>,
    mut buttons: Query<(&Interaction, &mut BackgroundColor, &mut BorderColor), With<Button>>,
    mut hint: Query<&mut TextColor, Without<Button>>,
) {
    let advance_enabled = flow.can_advance();

    for (entity, enabled) in [
        (widgets.advance_button, advance_enabled),
        (widgets.back_button, flow.is_idle()),
    ] {
        let Some(entity) = entity else {
            continue;
        };
        let Ok((interaction, mut bg, mut border)) = buttons.get_mut(entity) else {
            continue;
        };
        let (colour, edge) = match (*interaction, enabled) {
            (_, false) => (DISABLED_BUTTON, Color::srgba(1.0, 1.0, 1.0, 0.1)),
            (Interaction::Pressed, true) => (PRESSED_BUTTON, Color::WHITE),
            (Interaction::Hovered, true) => (HOVERED_BUTTON, Color::WHITE),
            (Interaction::None, true) => (NORMAL_BUTTON, Color::srgba(1.0, 1.0, 1.0, 0.3)),
        };
        *bg = colour.into();
        *border = BorderColor::all(edge);
    }

    let Some(entity) = widgets.gate_hint else {
        return;
    };
    if let Ok(mut colour) = hint.get_mut(entity) {
        let base = if flow.input_satisfied() {
            SUCCESS_COLOUR
        } else {
            HINT_COLOUR
        };
        // Keep the crossfade's alpha.
        let alpha = colour.0.alpha();
        colour.0 = base.with_alpha(alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::catalog::DemoKind;

    #[test]
    fn inputs_have_readable_names() {
        assert_eq!(describe_input(InputCode::Key(KeyCode::KeyA)), "A");
        assert_eq!(describe_input(InputCode::Key(KeyCode::Digit1)), "1");
        assert_eq!(describe_input(InputCode::Key(KeyCode::Space)), "Space");
        assert_eq!(describe_input(InputCode::Key(KeyCode::ArrowLeft)), "ArrowLeft");
        assert_eq!(describe_input(InputCode::Mouse(MouseButton::Right)), "Right click");
    }

    #[test]
    fn gate_hint_lists_accepted_inputs() {
        let open = ScreenSpec::new("t", "b");
        assert_eq!(gate_hint(&open, true), "");

        let gated = ScreenSpec::new("t", "b").gated_on([
            InputCode::Key(KeyCode::KeyA),
            InputCode::Key(KeyCode::KeyD),
        ]);
        assert_eq!(gate_hint(&gated, false), "Try it: A / D");
        assert_eq!(gate_hint(&gated, true), GATE_OPEN_TEXT);
    }

    #[derive(Resource)]
    struct Shown(ScreenSpec);

    fn show(
        shown: Res<Shown>,
        widgets: Res<TutorialWidgets>,
        mut texts: Query<&mut Text>,
        mut layout: Query<&mut Node>,
    ) {
        show_screen(&shown.0, 1, 3, false, &widgets, &mut texts, &mut layout);
    }

    #[test]
    fn missing_widgets_only_skip_their_own_update() {
        let mut app = App::new();
        let title = app.world_mut().spawn(Text::new("old")).id();
        let demo_panel = app.world_mut().spawn(Node::default()).id();
        app.insert_resource(TutorialWidgets {
            title: Some(title),
            demo_panel: Some(demo_panel),
            ..default()
        })
        .insert_resource(Shown(ScreenSpec::new("new", "body").with_demo(DemoKind::Jump)))
        .add_systems(Update, show);
        app.update();

        assert_eq!(app.world().get::<Text>(title).unwrap().0, "new");
        assert_eq!(app.world().get::<Node>(demo_panel).unwrap().display, Display::Flex);
    }

    #[test]
    fn opacity_touches_only_screen_content() {
        let mut app = App::new();
        let faded = app.world_mut().spawn((ScreenContent, TextColor(Color::WHITE))).id();
        let fixed = app.world_mut().spawn(TextColor(Color::WHITE)).id();
        app.add_systems(Update, |mut content: Query<&mut TextColor, With<ScreenContent>>| {
            set_content_opacity(0.0, &mut content);
        });
        app.update();

        assert_eq!(app.world().get::<TextColor>(faded).unwrap().0.alpha(), 0.0);
        assert_eq!(app.world().get::<TextColor>(fixed).unwrap().0.alpha(), 1.0);
    }
}
