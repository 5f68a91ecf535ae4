// Tutorial flow state machine: which screen is current and whether the player
// may move on from it.
use bevy::prelude::*;

use super::catalog::{InputCode, ScreenCatalog, ScreenSpec};
use super::gate::InputGate;

/// Navigation command issued by buttons or keys.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    Advance,
    Retreat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    Transitioning,
}

/// Result of a navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Dropped: mid-transition or the gate is closed.
    Ignored,
    /// The current index changed and a transition has started.
    Moved { from: usize, to: usize },
    /// Advance on the last screen.
    Complete,
    /// Retreat on the first screen.
    ExitToParent,
}

#[derive(Resource, Debug, Clone)]
pub struct TutorialFlow {
    current: usize,
    phase: FlowPhase,
    gate: InputGate,
}

impl TutorialFlow {
    pub fn start(catalog: &ScreenCatalog) -> Self {
        Self {
            current: 0,
            phase: FlowPhase::Idle,
            gate: catalog.get(0).map(InputGate::for_screen).unwrap_or_default(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.phase == FlowPhase::Idle
    }

    pub fn input_satisfied(&self) -> bool {
        self.gate.is_satisfied()
    }

    pub fn current_screen<'a>(&self, catalog: &'a ScreenCatalog) -> Option<&'a ScreenSpec> {
        catalog.get(self.current)
    }

    /// Whether the advance control should be offered as enabled.
    pub fn can_advance(&self) -> bool {
        self.is_idle() && self.gate.is_satisfied()
    }

    pub fn advance(&mut self, catalog: &ScreenCatalog) -> FlowOutcome {
        if !self.is_idle() {
            return FlowOutcome::Ignored;
        }
        // Completing is never gated; only moving on to another screen is.
        if self.current >= catalog.last_index() {
            return FlowOutcome::Complete;
        }
        if !self.gate.is_satisfied() {
            return FlowOutcome::Ignored;
        }
        self.move_to(catalog, self.current + 1)
    }

    pub fn retreat(&mut self, catalog: &ScreenCatalog) -> FlowOutcome {
        if !self.is_idle() {
            return FlowOutcome::Ignored;
        }
        if self.current == 0 {
            return FlowOutcome::ExitToParent;
        }
        self.move_to(catalog, self.current - 1)
    }

    pub fn apply(&mut self, catalog: &ScreenCatalog, command: FlowCommand) -> FlowOutcome {
        match command {
            FlowCommand::Advance => self.advance(catalog),
            FlowCommand::Retreat => self.retreat(catalog),
        }
    }

    /// Returns `true` when this press opened the current screen's gate.
    pub fn on_input_observed(&mut self, code: InputCode) -> bool {
        self.gate.observe(code)
    }

    pub fn finish_transition(&mut self) {
        self.phase = FlowPhase::Idle;
    }

    fn move_to(&mut self, catalog: &ScreenCatalog, to: usize) -> FlowOutcome {
        let Some(screen) = catalog.get(to) else {
            return FlowOutcome::Ignored;
        };
        let from = self.current;
        self.current = to;
        self.gate = InputGate::for_screen(screen);
        self.phase = FlowPhase::Transitioning;
        FlowOutcome::Moved { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::catalog::DemoKind;

    fn space() -> InputCode {
        InputCode::Key(KeyCode::Space)
    }

    fn three_screens() -> ScreenCatalog {
        ScreenCatalog::new(vec![
            ScreenSpec::new("A", "first"),
            ScreenSpec::new("B", "second").with_demo(DemoKind::Jump),
            ScreenSpec::new("C", "third"),
        ])
        .unwrap()
    }

    fn gated() -> ScreenCatalog {
        ScreenCatalog::new(vec![
            ScreenSpec::new("A", "first").gated_on([space()]),
            ScreenSpec::new("B", "second"),
        ])
        .unwrap()
    }

    #[test]
    fn advance_moves_exactly_one_screen() {
        let catalog = three_screens();
        for start in 0..catalog.last_index() {
            let mut flow = TutorialFlow::start(&catalog);
            flow.current = start;
            assert_eq!(
                flow.advance(&catalog),
                FlowOutcome::Moved {
                    from: start,
                    to: start + 1
                }
            );
            assert_eq!(flow.current_index(), start + 1);
            assert!(!flow.is_idle());
        }
    }

    #[test]
    fn requests_while_transitioning_are_dropped() {
        let catalog = three_screens();
        let mut flow = TutorialFlow::start(&catalog);
        flow.advance(&catalog);

        assert_eq!(flow.advance(&catalog), FlowOutcome::Ignored);
        assert_eq!(flow.retreat(&catalog), FlowOutcome::Ignored);
        assert_eq!(flow.current_index(), 1);

        flow.finish_transition();
        assert!(flow.is_idle());
        assert_eq!(
            flow.advance(&catalog),
            FlowOutcome::Moved { from: 1, to: 2 }
        );
    }

    #[test]
    fn boundaries_signal_navigation_instead_of_moving() {
        let catalog = three_screens();
        let mut flow = TutorialFlow::start(&catalog);
        assert_eq!(flow.retreat(&catalog), FlowOutcome::ExitToParent);
        assert_eq!(flow.current_index(), 0);
        assert!(flow.is_idle());

        flow.current = catalog.last_index();
        assert_eq!(flow.advance(&catalog), FlowOutcome::Complete);
        assert_eq!(flow.current_index(), catalog.last_index());
        assert!(flow.is_idle());
    }

    #[test]
    fn gate_blocks_advance_until_accepted_input() {
        let catalog = gated();
        let mut flow = TutorialFlow::start(&catalog);
        assert!(!flow.input_satisfied());
        assert!(!flow.can_advance());
        assert_eq!(flow.advance(&catalog), FlowOutcome::Ignored);

        assert!(!flow.on_input_observed(InputCode::Key(KeyCode::KeyZ)));
        assert_eq!(flow.advance(&catalog), FlowOutcome::Ignored);

        assert!(flow.on_input_observed(space()));
        assert!(flow.can_advance());
        assert_eq!(
            flow.advance(&catalog),
            FlowOutcome::Moved { from: 0, to: 1 }
        );
    }

    #[test]
    fn gated_last_screen_still_completes() {
        let catalog = ScreenCatalog::new(vec![
            ScreenSpec::new("A", "first"),
            ScreenSpec::new("B", "last").gated_on([space()]),
        ])
        .unwrap();
        let mut flow = TutorialFlow::start(&catalog);
        flow.advance(&catalog);
        flow.finish_transition();

        assert!(!flow.input_satisfied());
        assert_eq!(flow.advance(&catalog), FlowOutcome::Complete);
        assert_eq!(flow.current_index(), 1);
    }

    #[test]
    fn gate_resets_when_screen_becomes_current_again() {
        let catalog = gated();
        let mut flow = TutorialFlow::start(&catalog);
        flow.on_input_observed(space());
        flow.advance(&catalog);
        flow.finish_transition();

        // Second screen is ungated.
        assert!(flow.input_satisfied());

        flow.retreat(&catalog);
        flow.finish_transition();
        assert_eq!(flow.current_index(), 0);
        assert!(!flow.input_satisfied());
    }

    #[test]
    fn retreat_undoes_advance() {
        let catalog = three_screens();
        let mut flow = TutorialFlow::start(&catalog);
        let before = flow.current_screen(&catalog).cloned();

        flow.apply(&catalog, FlowCommand::Advance);
        flow.finish_transition();
        flow.apply(&catalog, FlowCommand::Retreat);
        flow.finish_transition();

        assert_eq!(flow.current_index(), 0);
        assert_eq!(flow.current_screen(&catalog).cloned(), before);
    }
}
