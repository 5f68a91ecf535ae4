// Input gating: a screen may hold the advance control until the player has
// tried the move it teaches.
use bevy::prelude::*;

use super::catalog::{InputCode, ScreenSpec};
use super::flow::TutorialFlow;
use super::transition::Crossfade;
use super::ui::{self, TutorialWidgets};

/// A raw input press, delivered once per tick.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputObserved(pub InputCode);

/// Per-screen gate state. Rebuilt every time a screen becomes current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputGate {
    accepted: Vec<InputCode>,
    satisfied: bool,
}

impl InputGate {
    pub fn for_screen(screen: &ScreenSpec) -> Self {
        if !screen.requires_input {
            return Self {
                accepted: Vec::new(),
                satisfied: true,
            };
        }
        Self {
            accepted: screen.accepted_inputs.clone(),
            satisfied: false,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// Returns `true` only for the press that opens the gate.
    pub fn observe(&mut self, code: InputCode) -> bool {
        if self.satisfied || !self.accepted.contains(&code) {
            return false;
        }
        self.satisfied = true;
        true
    }
}

/// Turns this frame's key and mouse presses into [`InputObserved`] messages.
pub(super) fn collect_raw_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut observed: MessageWriter<InputObserved>,
) {
    if let Some(keys) = keys {
        observed.write_batch(
            keys.get_just_pressed()
                .map(|key| InputObserved(InputCode::Key(*key))),
        );
    }
    if let Some(mouse) = mouse {
        observed.write_batch(
            mouse
                .get_just_pressed()
                .map(|button| InputObserved(InputCode::Mouse(*button))),
        );
    }
}

/// Feeds observed presses to the flow and shows the success marker once the
/// current screen's gate opens.
pub(super) fn observe_input(
    mut observed: MessageReader<InputObserved>,
    mut flow: ResMut<TutorialFlow>,
    fade: Option<Res<Crossfade>>,
    widgets: Res<TutorialWidgets>,
    mut texts: Query<&mut Text>,
) {
    // Before the swap the widgets still show the previous screen; the swap
    // writes the opened state itself.
    let showing_current = fade.as_deref().is_none_or(Crossfade::shows_target);

    for InputObserved(code) in observed.read() {
        if flow.on_input_observed(*code) {
            info!("Gate opened on screen {} by {code:?}", flow.current_index());
            if showing_current {
                ui::show_gate_opened(&widgets, &mut texts);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> InputCode {
        InputCode::Key(KeyCode::Space)
    }

    #[test]
    fn ungated_screen_is_trivially_satisfied() {
        let gate = InputGate::for_screen(&ScreenSpec::new("t", "b"));
        assert!(gate.is_satisfied());
    }

    #[test]
    fn gated_screen_opens_on_first_accepted_press_only() {
        let screen = ScreenSpec::new("t", "b").gated_on([space()]);
        let mut gate = InputGate::for_screen(&screen);
        assert!(!gate.is_satisfied());

        assert!(!gate.observe(InputCode::Key(KeyCode::KeyX)));
        assert!(!gate.is_satisfied());

        assert!(gate.observe(space()));
        assert!(gate.is_satisfied());

        // Idempotent and one-directional.
        assert!(!gate.observe(space()));
        assert!(!gate.observe(InputCode::Key(KeyCode::KeyX)));
        assert!(gate.is_satisfied());
    }

    #[test]
    fn ungated_screen_ignores_all_input() {
        let mut gate = InputGate::for_screen(&ScreenSpec::new("t", "b"));
        assert!(!gate.observe(space()));
        assert!(gate.is_satisfied());
    }

    #[test]
    fn raw_presses_become_messages() {
        let mut app = App::new();
        app.add_message::<InputObserved>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, collect_raw_input);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyA);
        app.update();

        let messages = app
            .world()
            .resource::<bevy::ecs::message::Messages<InputObserved>>();
        let mut cursor = messages.get_cursor();
        let observed: Vec<_> = cursor.read(messages).copied().collect();
        assert_eq!(observed, vec![InputObserved(InputCode::Key(KeyCode::KeyA))]);
    }
}
