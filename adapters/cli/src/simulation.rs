//! Frame driver that wires input, systems and the world together.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use wishwalk_core::{Command, Event, InputState, InputTracker, NpcId};
use wishwalk_rendering::{
    ActorPresentation, Color, DialoguePresentation, PlayerPresentation, ProgressPresentation,
    Scene, TileMapPresentation,
};
use wishwalk_system_interaction::Interaction;
use wishwalk_system_movement::Movement;
use wishwalk_system_progress::Progress;
use wishwalk_world::{self as world, query, World};

/// Owns the world and every system, advancing them in a fixed order each frame.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    movement: Movement,
    interaction: Interaction,
    progress: Progress,
    tracker: InputTracker,
    events: Vec<Event>,
    commands: Vec<Command>,
    greeted: Vec<NpcId>,
}

impl Simulation {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            movement: Movement::default(),
            interaction: Interaction::new(),
            progress: Progress::new(),
            tracker: InputTracker::default(),
            events: Vec::new(),
            commands: Vec::new(),
            greeted: Vec::new(),
        }
    }

    /// Runs one frame: interaction, time, movement, then progress bookkeeping.
    pub(crate) fn advance(&mut self, dt: Duration, input: InputState) {
        self.tracker.observe(input);
        self.events.clear();

        let player = query::player(&self.world);
        let npcs = query::npc_view(&self.world);
        self.interaction.handle(
            &self.tracker,
            query::mode(&self.world),
            &player,
            &npcs,
            &mut self.commands,
        );
        self.flush_commands();

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let player = query::player(&self.world);
        self.movement.handle(
            &self.events,
            &player,
            &self.tracker.current(),
            &mut self.commands,
        );
        self.flush_commands();

        self.greeted.clear();
        self.progress.handle(&self.events, &mut self.greeted);
        let total = query::npc_view(&self.world).len();
        for npc in &self.greeted {
            info!(
                npc = npc.get(),
                greeted = self.progress.greeted(),
                total,
                "wishes collected"
            );
        }
        if !self.greeted.is_empty() && self.progress.is_complete(total) {
            info!("everyone has been greeted");
        }
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Builds the first scene, including the static terrain and NPCs.
    pub(crate) fn initial_scene(&self) -> Result<Scene> {
        let tile_map = query::tile_map(&self.world);
        let terrain = TileMapPresentation::new(
            tile_map.columns(),
            tile_map.rows(),
            tile_map.tiles().to_vec(),
        )
        .context("failed to snapshot the tile map")?;
        let npcs = query::npc_view(&self.world)
            .iter()
            .map(|npc| ActorPresentation::new(npc.position, Color::from(npc.color)))
            .collect();
        let player = query::player(&self.world);

        let mut scene = Scene::new(
            terrain,
            PlayerPresentation::new(player.position, player.facing),
            npcs,
        );
        self.populate_scene(&mut scene);
        Ok(scene)
    }

    /// Copies the post-update state that changes between frames into the scene.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let player = query::player(&self.world);
        scene.player = PlayerPresentation::new(player.position, player.facing);
        scene.mode = query::mode(&self.world);
        scene.dialogue = query::dialogue(&self.world).map(|dialogue| DialoguePresentation {
            name: dialogue.name,
            line: dialogue.line,
        });
        scene.progress = ProgressPresentation {
            greeted: self.progress.greeted(),
            total: query::npc_view(&self.world).len(),
        };
    }
}

#[cfg(test)]
mod tests {
    use wishwalk_core::{Button, Direction, Mode, TilePosition, TALKING_STATUS};

    use super::*;

    const STEP: Duration = Duration::from_millis(110);

    fn hold(simulation: &mut Simulation, button: Button, frames: usize) {
        for _ in 0..frames {
            simulation.advance(STEP, InputState::new().with(button));
        }
    }

    fn tap(simulation: &mut Simulation, button: Button) {
        simulation.advance(STEP, InputState::new().with(button));
        simulation.advance(STEP, InputState::new());
    }

    /// Walks from the spawn to the tile west of Jawaid and faces him.
    fn walk_to_first_npc(simulation: &mut Simulation) {
        hold(simulation, Button::Down, 3);
        hold(simulation, Button::Right, 3);
        simulation.advance(STEP, InputState::new());
    }

    #[test]
    fn walking_reaches_and_faces_the_first_npc() {
        let mut simulation = Simulation::new(World::reference().expect("reference world"));
        walk_to_first_npc(&mut simulation);

        let player = query::player(&simulation.world);
        assert_eq!(player.position, TilePosition::new(5, 6));
        assert_eq!(player.facing, Direction::East);
        assert_eq!(
            query::npc_at(&simulation.world, player.facing_tile()),
            Some(NpcId::new(0))
        );
    }

    #[test]
    fn talking_to_an_npc_collects_a_wish() {
        let mut simulation = Simulation::new(World::reference().expect("reference world"));
        walk_to_first_npc(&mut simulation);

        tap(&mut simulation, Button::Interact);
        let mut scene = simulation.initial_scene().expect("scene builds");
        assert_eq!(scene.mode, Mode::Talking);
        assert_eq!(scene.status_line(), TALKING_STATUS);
        assert_eq!(
            scene.dialogue,
            Some(DialoguePresentation {
                name: "Jawaid".to_owned(),
                line: "Oyeee! Happy Birthday!".to_owned(),
            })
        );

        hold(&mut simulation, Button::Down, 4);
        assert_eq!(
            query::player(&simulation.world).position,
            TilePosition::new(5, 6)
        );

        tap(&mut simulation, Button::Interact);
        tap(&mut simulation, Button::Interact);
        assert_eq!(simulation.progress.greeted(), 0);
        tap(&mut simulation, Button::Interact);

        simulation.populate_scene(&mut scene);
        assert_eq!(scene.mode, Mode::Exploring);
        assert!(scene.dialogue.is_none());
        assert_eq!(
            scene.progress,
            ProgressPresentation {
                greeted: 1,
                total: 3
            }
        );

        tap(&mut simulation, Button::Interact);
        tap(&mut simulation, Button::Interact);
        tap(&mut simulation, Button::Interact);
        tap(&mut simulation, Button::Interact);
        assert_eq!(simulation.progress.greeted(), 1);
    }

    #[test]
    fn initial_scene_mirrors_the_world() {
        let simulation = Simulation::new(World::reference().expect("reference world"));
        let scene = simulation.initial_scene().expect("scene builds");

        assert_eq!(scene.tile_map.columns(), 28);
        assert_eq!(scene.tile_map.rows(), 18);
        assert_eq!(scene.npcs.len(), 3);
        assert_eq!(
            scene.player,
            PlayerPresentation::new(TilePosition::new(3, 3), Direction::South)
        );
        assert_eq!(scene.progress.total, 3);
    }
}
