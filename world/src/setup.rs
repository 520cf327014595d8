//! Static session data and the startup validation applied to it.

use std::time::Duration;

use thiserror::Error;
use wishwalk_core::{ActorColor, TilePosition, DEFAULT_STEP_DURATION};

use crate::layout::{LayoutError, MapSource};

const REFERENCE_COLUMNS: u32 = 28;
const REFERENCE_ROWS: u32 = 18;
const REFERENCE_SPAWN: TilePosition = TilePosition::new(3, 3);

/// Static description of an NPC placed at session start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcDefinition {
    /// Display name shown above the dialogue text.
    pub name: String,
    /// Tile the NPC stands on for the whole session.
    pub position: TilePosition,
    /// Body colour used when drawing the NPC.
    pub color: ActorColor,
    /// Lines delivered in order, one per interaction.
    pub lines: Vec<String>,
}

impl NpcDefinition {
    /// Creates a new NPC definition.
    #[must_use]
    pub fn new<N, L>(name: N, position: TilePosition, color: ActorColor, lines: L) -> Self
    where
        N: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            name: name.into(),
            position,
            color,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything required to assemble a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSetup {
    /// Number of tile columns for generated maps.
    pub columns: u32,
    /// Number of tile rows for generated maps.
    pub rows: u32,
    /// Where the terrain comes from.
    pub map: MapSource,
    /// Tile the player starts on.
    pub spawn: TilePosition,
    /// Cooldown applied after every successful step.
    pub step_duration: Duration,
    /// NPCs placed on the map.
    pub npcs: Vec<NpcDefinition>,
}

impl WorldSetup {
    /// The hand-authored meadow with its three birthday well-wishers.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            columns: REFERENCE_COLUMNS,
            rows: REFERENCE_ROWS,
            map: MapSource::Reference,
            spawn: REFERENCE_SPAWN,
            step_duration: DEFAULT_STEP_DURATION,
            npcs: vec![
                NpcDefinition::new(
                    "Jawaid",
                    TilePosition::new(6, 6),
                    ActorColor::from_rgb(0xff, 0x6b, 0x6b),
                    [
                        "Oyeee! Happy Birthday!",
                        "May your year be full of wins and good vibes.",
                        "Now go talk to the others too!",
                    ],
                ),
                NpcDefinition::new(
                    "Ana",
                    TilePosition::new(14, 5),
                    ActorColor::from_rgb(0xff, 0xe6, 0x6d),
                    [
                        "Hello hello!",
                        "Birthday wishes unlocked: +100 happiness.",
                        "Stay awesome always!",
                    ],
                ),
                NpcDefinition::new(
                    "Rachit",
                    TilePosition::new(20, 12),
                    ActorColor::from_rgb(0x00, 0xff, 0x88),
                    [
                        "Mission: Wish you the happiest birthday!",
                        "Collect all wishes by talking to everyone.",
                        "Party time!",
                    ],
                ),
            ],
        }
    }
}

impl Default for WorldSetup {
    fn default() -> Self {
        Self::reference()
    }
}

/// Configuration errors caught while assembling a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The map source could not produce terrain.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// At least one border tile is walkable.
    #[error("the map border must be solid on every edge")]
    OpenBorder,
    /// Steps would never be gated by a cooldown.
    #[error("the step duration must be positive")]
    ZeroStepDuration,
    /// The player spawn lies outside the map.
    #[error("player spawn ({x}, {y}) lies outside the {columns}x{rows} map")]
    SpawnOutOfBounds {
        /// Spawn column.
        x: i32,
        /// Spawn row.
        y: i32,
        /// Map width in tiles.
        columns: u32,
        /// Map height in tiles.
        rows: u32,
    },
    /// The player spawn is a wall or water tile.
    #[error("player spawn ({x}, {y}) is not walkable")]
    SpawnBlocked {
        /// Spawn column.
        x: i32,
        /// Spawn row.
        y: i32,
    },
    /// An NPC has a blank name.
    #[error("NPC #{index} has no name")]
    UnnamedNpc {
        /// Position of the NPC in the setup list.
        index: usize,
    },
    /// An NPC has nothing to say.
    #[error("NPC `{name}` has no dialogue lines")]
    EmptyDialogue {
        /// Name of the offending NPC.
        name: String,
    },
    /// An NPC stands outside the map or on a wall or water tile.
    #[error("NPC `{name}` stands on unwalkable tile ({x}, {y})")]
    NpcBlocked {
        /// Name of the offending NPC.
        name: String,
        /// Column of the NPC.
        x: i32,
        /// Row of the NPC.
        y: i32,
    },
    /// An NPC stands on the player spawn.
    #[error("NPC `{name}` stands on the player spawn")]
    NpcOnSpawn {
        /// Name of the offending NPC.
        name: String,
    },
    /// Two NPCs share a tile.
    #[error("NPCs `{first}` and `{second}` both stand on ({x}, {y})")]
    NpcOverlap {
        /// Name of the NPC listed first.
        first: String,
        /// Name of the NPC listed second.
        second: String,
        /// Shared column.
        x: i32,
        /// Shared row.
        y: i32,
    },
}
