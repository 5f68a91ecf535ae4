// Static tutorial content: the ordered list of screens.
use bevy::prelude::*;
use strum::{Display, EnumIter};

/// What the secondary viewport demonstrates while a screen is current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DemoKind {
    #[default]
    None,
    Jump,
    MoveLeftRight,
    ShieldDeflect,
    ShieldAbsorb,
    ShieldBypass,
    EnemyShowcase,
}

/// A discrete player input the tutorial can wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCode {
    Key(KeyCode),
    Mouse(MouseButton),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSpec {
    pub title: String,
    pub body: String,
    pub demo_kind: DemoKind,
    pub advance_label: String,
    pub requires_input: bool,
    /// Empty unless `requires_input` is set.
    pub accepted_inputs: Vec<InputCode>,
}

impl ScreenSpec {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            demo_kind: DemoKind::None,
            advance_label: "Next".into(),
            requires_input: false,
            accepted_inputs: Vec::new(),
        }
    }

    pub fn with_demo(mut self, kind: DemoKind) -> Self {
        self.demo_kind = kind;
        self
    }

    pub fn with_advance_label(mut self, label: impl Into<String>) -> Self {
        self.advance_label = label.into();
        self
    }

    /// Gate advancing behind any one of `inputs`. An empty set leaves the
    /// screen ungated.
    pub fn gated_on(mut self, inputs: impl IntoIterator<Item = InputCode>) -> Self {
        for input in inputs {
            if !self.accepted_inputs.contains(&input) {
                self.accepted_inputs.push(input);
            }
        }
        self.requires_input = !self.accepted_inputs.is_empty();
        self
    }

    pub fn has_demo(&self) -> bool {
        self.demo_kind != DemoKind::None
    }
}

/// Ordered, never-empty, read-only list of tutorial screens.
#[derive(Resource, Debug, Clone)]
pub struct ScreenCatalog {
    screens: Vec<ScreenSpec>,
}

impl ScreenCatalog {
    /// Returns `None` for an empty list; a tutorial always has a first screen.
    pub fn new(screens: Vec<ScreenSpec>) -> Option<Self> {
        if screens.is_empty() {
            return None;
        }
        Some(Self { screens })
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn last_index(&self) -> usize {
        self.screens.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&ScreenSpec> {
        self.screens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScreenSpec> {
        self.screens.iter()
    }
}

impl Default for ScreenCatalog {
    fn default() -> Self {
        use InputCode::{Key, Mouse};

        Self {
            screens: vec![
                ScreenSpec::new(
                    "Welcome, Shieldbearer",
                    "This short tutorial walks you through moving, jumping and \
                     the three ways your shield handles incoming attacks.",
                ),
                ScreenSpec::new("Jumping", "Press Space to jump over low hazards.")
                    .with_demo(DemoKind::Jump)
                    .gated_on([Key(KeyCode::Space)]),
                ScreenSpec::new(
                    "Moving",
                    "Use A and D, or the arrow keys, to move left and right.",
                )
                .with_demo(DemoKind::MoveLeftRight)
                .gated_on([
                    Key(KeyCode::KeyA),
                    Key(KeyCode::KeyD),
                    Key(KeyCode::ArrowLeft),
                    Key(KeyCode::ArrowRight),
                ]),
                ScreenSpec::new(
                    "Deflect",
                    "Right-click to raise a deflecting shield. Projectiles \
                     bounce straight back at their source.",
                )
                .with_demo(DemoKind::ShieldDeflect)
                .gated_on([Mouse(MouseButton::Right)]),
                ScreenSpec::new(
                    "Absorb",
                    "Press Q to absorb. The shield soaks up the hit and stores \
                     its energy.",
                )
                .with_demo(DemoKind::ShieldAbsorb)
                .gated_on([Key(KeyCode::KeyQ)]),
                ScreenSpec::new(
                    "Bypass",
                    "Press E to phase out. Attacks pass through you, but only \
                     for a moment.",
                )
                .with_demo(DemoKind::ShieldBypass)
                .gated_on([Key(KeyCode::KeyE)]),
                ScreenSpec::new(
                    "Know your enemies",
                    "Walkers patrol slopes, chasers hunt you down and brutes \
                     hit hard enough to break a careless shield.",
                )
                .with_demo(DemoKind::EnemyShowcase),
                ScreenSpec::new("Ready", "That's everything. Good luck out there.")
                    .with_advance_label("Start"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(ScreenCatalog::new(Vec::new()).is_none());
    }

    #[test]
    fn gating_requires_a_non_empty_set() {
        let open = ScreenSpec::new("a", "b").gated_on([]);
        assert!(!open.requires_input);
        assert!(open.accepted_inputs.is_empty());

        let gated = ScreenSpec::new("a", "b").gated_on([
            InputCode::Key(KeyCode::Space),
            InputCode::Key(KeyCode::Space),
        ]);
        assert!(gated.requires_input);
        assert_eq!(gated.accepted_inputs, vec![InputCode::Key(KeyCode::Space)]);
    }

    #[test]
    fn default_catalog_is_consistent() {
        let catalog = ScreenCatalog::default();
        assert_eq!(catalog.last_index(), catalog.len() - 1);

        for screen in catalog.iter() {
            assert_eq!(screen.requires_input, !screen.accepted_inputs.is_empty());
            assert_eq!(screen.has_demo(), screen.demo_kind != DemoKind::None);
        }

        let first = catalog.get(0).unwrap();
        let last = catalog.get(catalog.last_index()).unwrap();
        assert!(!first.has_demo());
        assert!(!last.has_demo());
        assert_eq!(last.advance_label, "Start");
    }
}
