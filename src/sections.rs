/// Game sections and the loader that moves between them.
use bevy::prelude::*;
use strum::Display;

pub struct SectionsPlugin;

impl Plugin for SectionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Sections>()
            .add_message::<Navigate>()
            .add_systems(Update, load_section);
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Display)]
pub enum Sections {
    #[default]
    Menu,
    Tutorial,
    Arena,
}

/// Request to leave the current section for another one.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigate(pub Sections);

fn load_section(
    mut requests: MessageReader<Navigate>,
    current: Res<State<Sections>>,
    mut next_state: ResMut<NextState<Sections>>,
) {
    // Only the first request of a frame is honoured.
    let Some(Navigate(target)) = requests.read().next().copied() else {
        return;
    };
    requests.clear();

    info!("Loading section {target} (from {})", **current);
    next_state.set(target);
}
