// Crossfade between tutorial screens: fade out, swap content, fade in.

use bevy::prelude::*;

use super::DemoCue;
use super::catalog::ScreenCatalog;
use super::flow::TutorialFlow;
use super::ui::{self, ScreenContent, TutorialWidgets};

/// Shortest fade the animator will run, so the swap frame always exists.
const MIN_DURATION: f32 = 0.001;

/// Progress of one fade between two screens.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Crossfade {
    elapsed: f32,
    duration: f32,
    swapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    FadingOut,
    /// Opacity has just reached zero; the new content goes in now.
    Swap,
    FadingIn,
    Done,
}

impl Crossfade {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(MIN_DURATION),
            swapped: false,
        }
    }

    fn half(&self) -> f32 {
        self.duration / 2.0
    }

    pub fn tick(&mut self, dt: f32) -> FadeStep {
        let half = self.half();
        if !self.swapped {
            self.elapsed += dt;
            if self.elapsed < half {
                return FadeStep::FadingOut;
            }
            // Clamp so the swap frame renders at exactly zero opacity.
            self.elapsed = half;
            self.swapped = true;
            return FadeStep::Swap;
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.elapsed >= self.duration {
            FadeStep::Done
        } else {
            FadeStep::FadingIn
        }
    }

    /// Whether the displayed content already belongs to the target screen.
    pub fn shows_target(&self) -> bool {
        self.swapped
    }

    pub fn opacity(&self) -> f32 {
        opacity_at(self.elapsed, self.duration)
    }
}

/// Opacity of the screen content `t` seconds into a fade lasting `duration`.
pub fn opacity_at(t: f32, duration: f32) -> f32 {
    let half = duration.max(MIN_DURATION) / 2.0;
    let t = t.clamp(0.0, half * 2.0);
    if t <= half {
        1.0 - t / half
    } else {
        (t - half) / half
    }
}

pub(super) fn run_crossfade(
    mut commands: Commands,
    time: Res<Time>,
    fade: Option<ResMut<Crossfade>>,
    mut flow: ResMut<TutorialFlow>,
    catalog: Res<ScreenCatalog>,
    widgets: Res<TutorialWidgets>,
    mut cues: MessageWriter<DemoCue>,
    mut texts: Query<&mut Text>,
    mut layout: Query<&mut Node>,
    mut content: Query<&mut TextColor, With<ScreenContent>>,
) {
    let Some(mut fade) = fade else {
        return;
    };

    let step = fade.tick(time.delta_secs());
    let screen = flow.current_screen(&catalog);

    match step {
        FadeStep::FadingOut | FadeStep::FadingIn => {}
        FadeStep::Swap => {
            // The old demo must not outlive its screen's content.
            cues.write(DemoCue::Hide);
            if let Some(screen) = screen {
                ui::show_screen(
                    screen,
                    flow.current_index(),
                    catalog.len(),
                    flow.input_satisfied(),
                    &widgets,
                    &mut texts,
                    &mut layout,
                );
            }
        }
        FadeStep::Done => {
            let cue = match screen {
                Some(screen) if screen.has_demo() => DemoCue::Show(screen.demo_kind),
                _ => DemoCue::Hide,
            };
            cues.write(cue);
            flow.finish_transition();
            commands.remove_resource::<Crossfade>();
            debug!("Transition to screen {} finished", flow.current_index());
        }
    }

    ui::set_content_opacity(fade.opacity(), &mut content);
}
