// Demo actor lifecycle and the looping routines that animate it.
use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use rand::Rng;

use super::catalog::DemoKind;
use super::{DemoCue, TutorialConfig};

/// Pause between demonstrations of the move (seconds).
const REST_TIME: f32 = 0.8;
const HOP_TIME: f32 = 0.5;
const HOP_HEIGHT: f32 = 60.0;
const STRIDE: f32 = 80.0;
const STRIDE_TIME: f32 = 0.7;
/// Bounds of the randomised pause between strides.
const DODGE_PAUSE: std::ops::RangeInclusive<f32> = 0.2..=0.9;
/// How long the shield stays raised.
const SHIELD_TIME: f32 = 1.2;
const DEFLECT_PULSE_TIME: f32 = 0.25;
const DEFLECT_PULSE_SCALE: f32 = 0.35;
const ABSORB_PERIOD: f32 = 0.4;
const BYPASS_FADE_TIME: f32 = 0.6;
const BYPASS_ALPHA: f32 = 0.5;
const SHOWCASE_SCALE: f32 = 1.5;

const DEFLECT_TINT: Color = Color::srgb(0.3, 0.8, 1.0);
const ABSORB_TINT: Color = Color::srgb(0.4, 1.0, 0.5);
const BYPASS_TINT: Color = Color::srgb(0.8, 0.4, 1.0);

/// The one interactive demo entity.
#[derive(Component)]
pub struct DemoActor;

/// Shield visual parented to the demo actor; hidden until a routine raises it.
#[derive(Component)]
pub struct DemoShield;

/// Static display entity spawned by the enemy showcase.
#[derive(Component)]
pub struct ShowcaseEntity;

/// Point demo entities are spawned around and the demo camera looks at.
#[derive(Component)]
pub struct DemoAnchor;

#[derive(Debug, Clone)]
pub struct SpriteTemplate {
    pub colour: Color,
    pub size: Vec2,
}

impl SpriteTemplate {
    fn sprite(&self) -> Sprite {
        Sprite::from_color(self.colour, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct ShowcaseTemplate {
    pub name: &'static str,
    pub sprite: SpriteTemplate,
    /// Position relative to the anchor, before showcase scaling.
    pub offset: Vec2,
}

/// Templates the demo manager instantiates actors and showcase entities from.
#[derive(Resource, Debug, Clone)]
pub struct DemoTemplates {
    pub actor: SpriteTemplate,
    pub shield: SpriteTemplate,
    pub showcase: Vec<ShowcaseTemplate>,
}

impl Default for DemoTemplates {
    fn default() -> Self {
        Self {
            actor: SpriteTemplate {
                colour: Color::srgb(0.85, 0.85, 0.9),
                size: Vec2::new(32.0, 48.0),
            },
            shield: SpriteTemplate {
                colour: Color::WHITE,
                size: Vec2::new(12.0, 56.0),
            },
            showcase: vec![
                ShowcaseTemplate {
                    name: "Walker",
                    sprite: SpriteTemplate {
                        colour: Color::srgb(0.8, 0.3, 0.3),
                        size: Vec2::new(36.0, 28.0),
                    },
                    offset: Vec2::new(-70.0, 0.0),
                },
                ShowcaseTemplate {
                    name: "Chaser",
                    sprite: SpriteTemplate {
                        colour: Color::srgb(0.95, 0.55, 0.2),
                        size: Vec2::new(28.0, 40.0),
                    },
                    offset: Vec2::new(0.0, 0.0),
                },
                ShowcaseTemplate {
                    name: "Brute",
                    sprite: SpriteTemplate {
                        colour: Color::srgb(0.5, 0.12, 0.15),
                        size: Vec2::new(48.0, 56.0),
                    },
                    offset: Vec2::new(70.0, 0.0),
                },
            ],
        }
    }
}

/// Owns whatever the current screen is demonstrating.
#[derive(Resource, Default, Debug)]
pub struct DemoStage {
    actor: Option<Entity>,
    showcase: Vec<Entity>,
    kind: DemoKind,
}

impl DemoStage {
    pub fn is_empty(&self) -> bool {
        self.actor.is_none() && self.showcase.is_empty()
    }

    /// Replaces any running demo with `kind` at `anchor`.
    pub fn start(
        &mut self,
        commands: &mut Commands,
        kind: DemoKind,
        anchor: Vec3,
        templates: &DemoTemplates,
    ) {
        self.stop(commands);

        match kind {
            DemoKind::None => return,
            DemoKind::EnemyShowcase => {
                for template in &templates.showcase {
                    let position = anchor + (template.offset * SHOWCASE_SCALE).extend(0.0);
                    let entity = commands
                        .spawn((
                            ShowcaseEntity,
                            Name::new(template.name),
                            template.sprite.sprite(),
                            Transform::from_translation(position)
                                .with_scale(Vec3::splat(SHOWCASE_SCALE)),
                        ))
                        .id();
                    self.showcase.push(entity);
                }
            }
            _ => {
                let shield = commands
                    .spawn((
                        DemoShield,
                        templates.shield.sprite(),
                        Transform::from_xyz(templates.actor.size.x * 0.75, 0.0, 1.0),
                        Visibility::Hidden,
                    ))
                    .id();
                let actor = commands
                    .spawn((
                        DemoActor,
                        Name::new(format!("Demo actor ({kind})")),
                        templates.actor.sprite(),
                        Transform::from_translation(anchor),
                        DemoRoutine::new(kind, anchor),
                    ))
                    .add_child(shield)
                    .id();
                self.actor = Some(actor);
            }
        }

        self.kind = kind;
        info!("Started {kind} demo");
    }

    /// Despawns the actor and any showcase entities. Safe to call when nothing
    /// is running.
    pub fn stop(&mut self, commands: &mut Commands) {
        if self.is_empty() {
            return;
        }

        let entities = self.actor.take().into_iter().chain(self.showcase.drain(..));
        for entity in entities {
            // Already gone counts as stopped.
            if let Ok(mut entity) = commands.get_entity(entity) {
                entity.try_despawn();
            }
        }
        debug!("Stopped {} demo", self.kind);
        self.kind = DemoKind::None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RoutinePhase {
    Rest,
    Act,
}

/// Looping demonstration attached to the demo actor, advanced once per frame.
#[derive(Component, Debug, Clone)]
pub struct DemoRoutine {
    kind: DemoKind,
    home: Vec3,
    phase: RoutinePhase,
    elapsed: f32,
    /// Length of the current phase.
    length: f32,
    /// Which side of `home` a stride starts from.
    side: f32,
}

/// Where everything should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutinePose {
    pub offset: Vec2,
    pub actor_alpha: f32,
    pub shield: Option<ShieldPose>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldPose {
    pub tint: Color,
    pub scale: f32,
    pub alpha: f32,
}

impl DemoRoutine {
    pub fn new(kind: DemoKind, home: Vec3) -> Self {
        Self {
            kind,
            home,
            phase: RoutinePhase::Rest,
            elapsed: 0.0,
            length: REST_TIME,
            side: -1.0,
        }
    }

    pub fn tick(&mut self, dt: f32) -> RoutinePose {
        self.elapsed += dt;
        while self.elapsed >= self.length {
            self.elapsed -= self.length;
            self.next_phase();
        }
        self.pose()
    }

    fn next_phase(&mut self) {
        match self.phase {
            RoutinePhase::Rest => {
                self.phase = RoutinePhase::Act;
                self.length = act_length(self.kind);
            }
            RoutinePhase::Act => {
                self.phase = RoutinePhase::Rest;
                self.length = REST_TIME;
                if self.kind == DemoKind::MoveLeftRight {
                    self.side = -self.side;
                    self.length = rand::rng().random_range(DODGE_PAUSE);
                }
            }
        }
    }

    pub fn pose(&self) -> RoutinePose {
        let resting = RoutinePose {
            offset: Vec2::new(self.stride_x(0.0), 0.0),
            actor_alpha: 1.0,
            shield: None,
        };
        if self.phase == RoutinePhase::Rest {
            return resting;
        }

        let t = self.elapsed;
        let p = (t / self.length).clamp(0.0, 1.0);
        match self.kind {
            DemoKind::Jump => RoutinePose {
                offset: Vec2::new(0.0, HOP_HEIGHT * 4.0 * p * (1.0 - p)),
                ..resting
            },
            DemoKind::MoveLeftRight => RoutinePose {
                offset: Vec2::new(self.stride_x(p), 0.0),
                ..resting
            },
            DemoKind::ShieldDeflect => {
                let pulse = (t / DEFLECT_PULSE_TIME).min(1.0);
                RoutinePose {
                    shield: Some(ShieldPose {
                        tint: DEFLECT_TINT,
                        scale: 1.0 + DEFLECT_PULSE_SCALE * (pulse * PI).sin(),
                        alpha: 1.0,
                    }),
                    ..resting
                }
            }
            DemoKind::ShieldAbsorb => RoutinePose {
                shield: Some(ShieldPose {
                    tint: ABSORB_TINT,
                    scale: 1.0,
                    alpha: 0.55 + 0.45 * (t / ABSORB_PERIOD * TAU).cos(),
                }),
                ..resting
            },
            DemoKind::ShieldBypass => {
                let fade = (t / BYPASS_FADE_TIME).min(1.0);
                RoutinePose {
                    actor_alpha: 1.0 - (1.0 - BYPASS_ALPHA) * (fade * PI).sin(),
                    shield: Some(ShieldPose {
                        tint: BYPASS_TINT,
                        scale: 1.0,
                        alpha: 1.0,
                    }),
                    ..resting
                }
            }
            DemoKind::None | DemoKind::EnemyShowcase => resting,
        }
    }

    /// Horizontal offset `p` of the way through a stride.
    fn stride_x(&self, p: f32) -> f32 {
        if self.kind != DemoKind::MoveLeftRight {
            return 0.0;
        }
        let eased = p * p * (3.0 - 2.0 * p);
        self.side * STRIDE * (1.0 - 2.0 * eased)
    }
}

fn act_length(kind: DemoKind) -> f32 {
    match kind {
        DemoKind::Jump => HOP_TIME,
        DemoKind::MoveLeftRight => STRIDE_TIME,
        _ => SHIELD_TIME,
    }
}

pub(super) fn spawn_demo_anchor(mut commands: Commands, config: Res<TutorialConfig>) {
    commands.spawn((DemoAnchor, Transform::from_translation(config.anchor)));
}

pub(super) fn run_demo_cues(
    mut commands: Commands,
    mut cues: MessageReader<DemoCue>,
    mut stage: ResMut<DemoStage>,
    templates: Res<DemoTemplates>,
    anchors: Query<&Transform, With<DemoAnchor>>,
) {
    for cue in cues.read() {
        match *cue {
            DemoCue::Show(kind) => {
                let Ok(anchor) = anchors.single() else {
                    warn!("No demo anchor; skipping {kind} demo");
                    stage.stop(&mut commands);
                    continue;
                };
                stage.start(&mut commands, kind, anchor.translation, &templates);
            }
            DemoCue::Hide => stage.stop(&mut commands),
        }
    }
}

pub(super) fn run_demo_routines(
    time: Res<Time>,
    mut actors: Query<
        (&mut DemoRoutine, &mut Transform, &mut Sprite),
        (With<DemoActor>, Without<DemoShield>),
    >,
    mut shields: Query<
        (&mut Transform, &mut Sprite, &mut Visibility),
        (With<DemoShield>, Without<DemoActor>),
    >,
) {
    let Ok((mut routine, mut transform, mut sprite)) = actors.single_mut() else {
        return;
    };

    let pose = routine.tick(time.delta_secs());
    transform.translation = routine.home + pose.offset.extend(0.0);
    sprite.color.set_alpha(pose.actor_alpha);

    // Only the live actor's shield exists.
    for (mut shield_transform, mut shield_sprite, mut visibility) in &mut shields {
        match pose.shield {
            Some(shield) => {
                *visibility = Visibility::Inherited;
                shield_sprite.color = shield.tint.with_alpha(shield.alpha);
                shield_transform.scale = Vec3::splat(shield.scale);
            }
            None => {
                *visibility = Visibility::Hidden;
                shield_transform.scale = Vec3::ONE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const DT: f32 = 1.0 / 60.0;

    /// Runs `seconds` of a routine and returns every pose it produced.
    fn run(kind: DemoKind, seconds: f32) -> Vec<RoutinePose> {
        let mut routine = DemoRoutine::new(kind, Vec3::ZERO);
        let frames = (seconds / DT) as usize;
        (0..frames).map(|_| routine.tick(DT)).collect()
    }

    #[test]
    fn jump_hops_and_lands() {
        let poses = run(DemoKind::Jump, 3.0);
        let peak = poses.iter().map(|p| p.offset.y).fold(0.0, f32::max);
        assert!(peak > HOP_HEIGHT * 0.9 && peak <= HOP_HEIGHT);
        assert!(poses.iter().all(|p| p.offset.y >= 0.0 && p.shield.is_none()));
        assert!(poses.iter().any(|p| p.offset.y == 0.0));
    }

    #[test]
    fn move_demo_stays_within_its_stride() {
        let poses = run(DemoKind::MoveLeftRight, 6.0);
        assert!(poses.iter().all(|p| p.offset.x.abs() <= STRIDE + 1e-3));
        assert!(poses.iter().any(|p| p.offset.x < -STRIDE * 0.9));
        assert!(poses.iter().any(|p| p.offset.x > STRIDE * 0.9));
    }

    #[test]
    fn shield_modes_have_distinct_tints_and_effects() {
        let deflect = run(DemoKind::ShieldDeflect, 2.5);
        let absorb = run(DemoKind::ShieldAbsorb, 2.5);
        let bypass = run(DemoKind::ShieldBypass, 2.5);

        let raised = |poses: &[RoutinePose]| -> Vec<ShieldPose> {
            poses.iter().filter_map(|p| p.shield).collect()
        };
        let (deflect, absorb_raised, bypass_raised) =
            (raised(&deflect), raised(&absorb), raised(&bypass));
        assert!(!deflect.is_empty() && !absorb_raised.is_empty() && !bypass_raised.is_empty());

        assert_eq!(deflect[0].tint, DEFLECT_TINT);
        assert_eq!(absorb_raised[0].tint, ABSORB_TINT);
        assert_eq!(bypass_raised[0].tint, BYPASS_TINT);
        assert_ne!(DEFLECT_TINT, ABSORB_TINT);
        assert_ne!(ABSORB_TINT, BYPASS_TINT);
        assert_ne!(DEFLECT_TINT, BYPASS_TINT);

        // Deflect pulses scale, absorb pulses alpha, bypass fades the actor.
        assert!(deflect.iter().any(|s| s.scale > 1.2));
        assert!(deflect.iter().all(|s| s.alpha == 1.0));
        assert!(absorb_raised.iter().any(|s| s.alpha < 0.3));
        assert!(absorb_raised.iter().all(|s| s.scale == 1.0));
        let min_alpha = bypass.iter().map(|p| p.actor_alpha).fold(1.0, f32::min);
        assert!((min_alpha - BYPASS_ALPHA).abs() < 0.05);
        assert!(absorb.iter().all(|p| p.actor_alpha == 1.0));
    }

    #[test]
    fn shield_is_hidden_while_resting() {
        let routine = DemoRoutine::new(DemoKind::ShieldAbsorb, Vec3::ZERO);
        assert!(routine.pose().shield.is_none());
    }

    fn stage_app() -> App {
        let mut app = App::new();
        app.add_message::<DemoCue>()
            .init_resource::<DemoStage>()
            .init_resource::<DemoTemplates>()
            .add_systems(Update, run_demo_cues);
        app.world_mut()
            .spawn((DemoAnchor, Transform::from_xyz(500.0, 0.0, 0.0)));
        app
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query_filtered::<Entity, F>().iter(world).count()
    }

    #[test]
    fn every_kind_leaves_at_most_one_actor() {
        let mut app = stage_app();
        for kind in DemoKind::iter().chain(DemoKind::iter().rev()) {
            app.world_mut().write_message(DemoCue::Show(kind));
            app.update();

            let actors = count::<With<DemoActor>>(&mut app);
            let showcase = count::<With<ShowcaseEntity>>(&mut app);
            match kind {
                DemoKind::None => assert_eq!(actors + showcase, 0),
                DemoKind::EnemyShowcase => {
                    assert_eq!(actors, 0);
                    assert!(showcase >= 2);
                }
                _ => {
                    assert_eq!(actors, 1);
                    assert_eq!(showcase, 0);
                    assert_eq!(count::<With<DemoShield>>(&mut app), 1);
                }
            }
        }
    }

    #[test]
    fn actor_spawns_at_anchor_with_hidden_shield() {
        let mut app = stage_app();
        app.world_mut().write_message(DemoCue::Show(DemoKind::ShieldDeflect));
        app.update();

        let world = app.world_mut();
        let transform = *world
            .query_filtered::<&Transform, With<DemoActor>>()
            .single(world)
            .unwrap();
        assert_eq!(transform.translation, Vec3::new(500.0, 0.0, 0.0));
        let visibility = *world
            .query_filtered::<&Visibility, With<DemoShield>>()
            .single(world)
            .unwrap();
        assert_eq!(visibility, Visibility::Hidden);
    }

    #[test]
    fn stop_is_safe_when_nothing_runs_or_entities_are_stale() {
        let mut app = stage_app();
        app.world_mut().write_message(DemoCue::Hide);
        app.update();
        assert!(app.world().resource::<DemoStage>().is_empty());

        app.world_mut().write_message(DemoCue::Show(DemoKind::Jump));
        app.update();
        let world = app.world_mut();
        let actor = world
            .query_filtered::<Entity, With<DemoActor>>()
            .single(world)
            .unwrap();
        world.despawn(actor);

        app.world_mut().write_message(DemoCue::Hide);
        app.update();
        assert!(app.world().resource::<DemoStage>().is_empty());
        assert_eq!(count::<With<DemoShield>>(&mut app), 0);
    }

    #[test]
    fn missing_anchor_skips_the_demo() {
        let mut app = App::new();
        app.add_message::<DemoCue>()
            .init_resource::<DemoStage>()
            .init_resource::<DemoTemplates>()
            .add_systems(Update, run_demo_cues);
        app.world_mut().write_message(DemoCue::Show(DemoKind::Jump));
        app.update();
        assert_eq!(count::<With<DemoActor>>(&mut app), 0);
    }
}
