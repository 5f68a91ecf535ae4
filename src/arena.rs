// Arena section: where the tutorial hands over. Shows a title card, then waits
// for the player to head back to the menu.

use bevy::prelude::*;

use crate::sections::{Navigate, Sections};

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Sections::Arena), setup_arena)
            .add_systems(OnExit(Sections::Arena), exit_arena)
            .add_systems(
                Update,
                (fade_card, leave_arena).run_if(in_state(Sections::Arena)),
            );
    }
}

const FADE_IN: f32 = 0.3;
const HOLD: f32 = 1.5;
const FADE_OUT: f32 = 1.0;
const TOTAL: f32 = FADE_IN + HOLD + FADE_OUT;

#[derive(Resource)]
struct CardTimer(f32);

#[derive(Component)]
struct CardText;

fn setup_arena(mut commands: Commands) {
    commands.insert_resource(CardTimer(0.0));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
            DespawnOnExit(Sections::Arena),
        ))
        .with_children(|parent| {
            parent.spawn((
                CardText,
                Text::new("The Arena"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
            ));
            parent.spawn((
                Text::new("Press Esc to return to the menu"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.7, 1.0)),
            ));
        });
}

/// Card alpha `t` seconds after entering the arena.
fn card_alpha(t: f32) -> f32 {
    if t < FADE_IN {
        t / FADE_IN
    } else if t < FADE_IN + HOLD {
        1.0
    } else {
        (1.0 - (t - FADE_IN - HOLD) / FADE_OUT).max(0.0)
    }
}

fn fade_card(
    time: Res<Time>,
    timer: Option<ResMut<CardTimer>>,
    mut texts: Query<&mut TextColor, With<CardText>>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if timer.0 >= TOTAL {
        return;
    }

    timer.0 += time.delta_secs();
    let alpha = card_alpha(timer.0);
    for mut colour in &mut texts {
        colour.0.set_alpha(alpha);
    }
}

fn leave_arena(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut navigate: MessageWriter<Navigate>,
) {
    if keyboard.is_some_and(|keys| keys.just_pressed(KeyCode::Escape)) {
        navigate.write(Navigate(Sections::Menu));
    }
}

fn exit_arena(mut commands: Commands) {
    commands.remove_resource::<CardTimer>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_fades_in_holds_and_fades_out() {
        assert_eq!(card_alpha(0.0), 0.0);
        assert!((card_alpha(FADE_IN / 2.0) - 0.5).abs() < 1e-6);
        assert_eq!(card_alpha(FADE_IN + HOLD / 2.0), 1.0);
        assert!(card_alpha(FADE_IN + HOLD + FADE_OUT / 2.0) < 1.0);
        assert_eq!(card_alpha(TOTAL + 1.0), 0.0);
    }
}
