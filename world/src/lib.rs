#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wishwalk.

mod dialogue;
pub mod layout;
mod setup;
mod tile_map;

use std::{collections::BTreeMap, num::NonZeroUsize, time::Duration};

use tracing::{debug, info, trace};
use wishwalk_core::{
    ActorColor, Command, DialogueRejection, Direction, Event, Mode, NpcId, Obstruction,
    StepRejection, TilePosition,
};

pub use dialogue::{DialogueController, DialogueError, DialogueSession, DialogueStep};
pub use layout::{LayoutError, MapSource};
pub use setup::{NpcDefinition, SetupError, WorldSetup};
pub use tile_map::TileMap;

/// Represents the authoritative Wishwalk world state.
#[derive(Debug)]
pub struct World {
    tile_map: TileMap,
    player: Player,
    npcs: Vec<Npc>,
    dialogue: DialogueController,
    step_duration: Duration,
}

impl World {
    /// Creates the reference meadow ready for play.
    pub fn reference() -> Result<Self, SetupError> {
        Self::from_setup(WorldSetup::reference())
    }

    /// Builds a world from static data, validating every startup invariant.
    pub fn from_setup(setup: WorldSetup) -> Result<Self, SetupError> {
        if setup.step_duration.is_zero() {
            return Err(SetupError::ZeroStepDuration);
        }

        let mut reserved: Vec<TilePosition> = Vec::with_capacity(setup.npcs.len() + 1);
        reserved.push(setup.spawn);
        reserved.extend(setup.npcs.iter().map(|npc| npc.position));
        let tile_map = layout::build(&setup.map, setup.columns, setup.rows, &reserved)?;

        if !tile_map.border_is_solid() {
            return Err(SetupError::OpenBorder);
        }

        let spawn = setup.spawn;
        if !tile_map.contains(spawn) {
            return Err(SetupError::SpawnOutOfBounds {
                x: spawn.x(),
                y: spawn.y(),
                columns: tile_map.columns(),
                rows: tile_map.rows(),
            });
        }
        if tile_map.is_blocked(spawn) {
            return Err(SetupError::SpawnBlocked {
                x: spawn.x(),
                y: spawn.y(),
            });
        }

        let mut occupied: BTreeMap<TilePosition, String> = BTreeMap::new();
        let mut npcs = Vec::with_capacity(setup.npcs.len());
        for (index, definition) in setup.npcs.into_iter().enumerate() {
            let name = definition.name.clone();
            let position = definition.position;
            if name.trim().is_empty() {
                return Err(SetupError::UnnamedNpc { index });
            }
            if tile_map.is_blocked(position) {
                return Err(SetupError::NpcBlocked {
                    name,
                    x: position.x(),
                    y: position.y(),
                });
            }
            if position == spawn {
                return Err(SetupError::NpcOnSpawn { name });
            }
            if let Some(first) = occupied.get(&position) {
                return Err(SetupError::NpcOverlap {
                    first: first.clone(),
                    second: name,
                    x: position.x(),
                    y: position.y(),
                });
            }

            let id = NpcId::new(u32::try_from(index).unwrap_or(u32::MAX));
            let npc = Npc::new(id, definition).ok_or_else(|| SetupError::EmptyDialogue {
                name: name.clone(),
            })?;
            let _ = occupied.insert(position, name);
            npcs.push(npc);
        }

        info!(
            columns = tile_map.columns(),
            rows = tile_map.rows(),
            npcs = npcs.len(),
            "world assembled"
        );
        Ok(Self::assemble(tile_map, spawn, npcs, setup.step_duration))
    }

    fn assemble(
        tile_map: TileMap,
        spawn: TilePosition,
        npcs: Vec<Npc>,
        step_duration: Duration,
    ) -> Self {
        Self {
            tile_map,
            player: Player::spawn_at(spawn),
            npcs,
            dialogue: DialogueController::default(),
            step_duration,
        }
    }

    fn npc(&self, npc_id: NpcId) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id == npc_id)
    }

    fn npc_at(&self, position: TilePosition) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.position == position)
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.dialogue.is_open() {
            out_events.push(Event::PlayerStepRejected {
                reason: StepRejection::Talking,
            });
            return;
        }

        if !self.player.cooldown.is_zero() {
            out_events.push(Event::PlayerStepRejected {
                reason: StepRejection::CoolingDown,
            });
            return;
        }

        if self.player.facing != direction {
            self.player.facing = direction;
            out_events.push(Event::PlayerTurned { facing: direction });
        }

        let from = self.player.position;
        let target = from.step(direction);

        let tile = self.tile_map.tile_at(target);
        if !tile.is_passable() {
            trace!(x = target.x(), y = target.y(), ?tile, "step blocked by terrain");
            out_events.push(Event::PlayerStepBlocked {
                target,
                obstruction: Obstruction::Terrain(tile),
            });
            return;
        }

        if let Some(npc) = self.npc_at(target) {
            trace!(x = target.x(), y = target.y(), npc = %npc.name, "step blocked by npc");
            out_events.push(Event::PlayerStepBlocked {
                target,
                obstruction: Obstruction::Npc(npc.id),
            });
            return;
        }

        self.player.position = target;
        self.player.cooldown = self.step_duration;
        out_events.push(Event::PlayerMoved { from, to: target });
    }

    fn open_dialogue(&mut self, npc_id: NpcId, out_events: &mut Vec<Event>) {
        let Some(npc) = self.npc(npc_id) else {
            out_events.push(Event::DialogueRejected {
                npc: npc_id,
                reason: DialogueRejection::UnknownNpc,
            });
            return;
        };

        if npc.position != self.player.facing_tile() {
            out_events.push(Event::DialogueRejected {
                npc: npc_id,
                reason: DialogueRejection::OutOfReach,
            });
            return;
        }

        let line_count = npc.line_count;
        match self.dialogue.open(npc_id, line_count) {
            Ok(_) => {
                debug!(npc = npc_id.get(), lines = line_count.get(), "dialogue opened");
                out_events.push(Event::DialogueOpened { npc: npc_id });
                out_events.push(Event::ModeChanged {
                    mode: Mode::Talking,
                });
            }
            Err(error) => {
                debug!(%error, "dialogue request rejected");
                out_events.push(Event::DialogueRejected {
                    npc: npc_id,
                    reason: DialogueRejection::AlreadyOpen,
                });
            }
        }
    }

    fn advance_dialogue(&mut self, out_events: &mut Vec<Event>) {
        match self.dialogue.advance() {
            DialogueStep::Idle => {}
            DialogueStep::Line { npc, line_index } => {
                out_events.push(Event::DialogueAdvanced { npc, line_index });
            }
            DialogueStep::Finished { npc } => {
                debug!(npc = npc.get(), "dialogue closed");
                out_events.push(Event::DialogueClosed { npc });
                out_events.push(Event::ModeChanged {
                    mode: Mode::Exploring,
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if !world.dialogue.is_open() {
                world.player.cooldown = world.player.cooldown.saturating_sub(dt);
            }
        }
        Command::StepPlayer { direction } => world.step_player(direction, out_events),
        Command::OpenDialogue { npc } => world.open_dialogue(npc, out_events),
        Command::AdvanceDialogue => world.advance_dialogue(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{TileMap, World};
    use wishwalk_core::{
        DialogueSnapshot, Mode, NpcId, NpcSnapshot, NpcView, PlayerSnapshot, TilePosition,
    };

    /// Provides read-only access to the world's terrain.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.tile_map
    }

    /// Reports whether the player is barred from entering the position.
    ///
    /// Terrain and NPCs both block; positions outside the map always do.
    #[must_use]
    pub fn is_blocked(world: &World, position: TilePosition) -> bool {
        world.tile_map.is_blocked(position) || world.npc_at(position).is_some()
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            facing: world.player.facing,
            cooldown: world.player.cooldown,
        }
    }

    /// Captures a read-only view of the NPCs on the map.
    #[must_use]
    pub fn npc_view(world: &World) -> NpcView {
        NpcView::from_snapshots(
            world
                .npcs
                .iter()
                .map(|npc| NpcSnapshot {
                    id: npc.id,
                    name: npc.name.clone(),
                    position: npc.position,
                    color: npc.color,
                    line_count: npc.line_count.get(),
                })
                .collect(),
        )
    }

    /// Identifier of the NPC standing on the provided tile, if any.
    #[must_use]
    pub fn npc_at(world: &World, position: TilePosition) -> Option<NpcId> {
        world.npc_at(position).map(|npc| npc.id)
    }

    /// Captures the open conversation, if any.
    #[must_use]
    pub fn dialogue(world: &World) -> Option<DialogueSnapshot> {
        let session = world.dialogue.session()?;
        let npc = world.npc(session.npc())?;
        let line = npc.lines.get(session.line_index())?;
        Some(DialogueSnapshot {
            npc: npc.id,
            name: npc.name.clone(),
            line_index: session.line_index(),
            line: line.clone(),
        })
    }

    /// Mode derived from the conversation state.
    #[must_use]
    pub fn mode(world: &World) -> Mode {
        if world.dialogue.is_open() {
            Mode::Talking
        } else {
            Mode::Exploring
        }
    }

    /// Cooldown applied after every successful step.
    #[must_use]
    pub fn step_duration(world: &World) -> Duration {
        world.step_duration
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: TilePosition,
    facing: Direction,
    cooldown: Duration,
}

impl Player {
    fn spawn_at(position: TilePosition) -> Self {
        Self {
            position,
            facing: Direction::South,
            cooldown: Duration::ZERO,
        }
    }

    fn facing_tile(&self) -> TilePosition {
        self.position.step(self.facing)
    }
}

#[derive(Clone, Debug)]
struct Npc {
    id: NpcId,
    name: String,
    position: TilePosition,
    color: ActorColor,
    lines: Vec<String>,
    line_count: NonZeroUsize,
}

impl Npc {
    /// Returns `None` when the definition carries no lines.
    fn new(id: NpcId, definition: NpcDefinition) -> Option<Self> {
        let line_count = NonZeroUsize::new(definition.lines.len())?;
        Some(Self {
            id,
            name: definition.name,
            position: definition.position,
            color: definition.color,
            lines: definition.lines,
            line_count,
        })
    }
}
