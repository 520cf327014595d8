#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wishwalk engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::Deserialize;

/// Title used by windowed adapters.
pub const WINDOW_TITLE: &str = "Wishwalk";

/// Status text shown while the player roams the map.
pub const EXPLORING_STATUS: &str = "Move: WASD/Arrows | Talk: E/Enter | Goal: Talk to everyone";

/// Status text shown while a conversation is open.
pub const TALKING_STATUS: &str = "Talking... (E/Enter to continue)";

/// Minimum simulated time between two player steps used by the reference game.
pub const DEFAULT_STEP_DURATION: Duration = Duration::from_millis(110);

/// Describes the active interaction mode of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The player roams the map and movement input is honoured.
    #[default]
    Exploring,
    /// A conversation is open and movement is suspended.
    Talking,
}

impl Mode {
    /// Status line adapters display for the mode.
    #[must_use]
    pub const fn status_line(self) -> &'static str {
        match self {
            Self::Exploring => EXPLORING_STATUS,
            Self::Talking => TALKING_STATUS,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player turn towards and step one tile in a direction.
    StepPlayer {
        /// Direction resolved from the held movement buttons.
        direction: Direction,
    },
    /// Requests that a conversation with the provided NPC begins.
    OpenDialogue {
        /// NPC the player addressed.
        npc: NpcId,
    },
    /// Requests that the open conversation moves to its next line.
    AdvanceDialogue,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that the player now faces a different direction.
    PlayerTurned {
        /// Direction the player faces after the turn.
        facing: Direction,
    },
    /// Confirms that the player moved between two tiles.
    PlayerMoved {
        /// Tile the player occupied before the step.
        from: TilePosition,
        /// Tile the player occupies after the step.
        to: TilePosition,
    },
    /// Reports that a step was attempted but the destination was obstructed.
    PlayerStepBlocked {
        /// Tile the player attempted to enter.
        target: TilePosition,
        /// What occupied the destination.
        obstruction: Obstruction,
    },
    /// Reports that the world refused to process a step request at all.
    PlayerStepRejected {
        /// Specific reason the request was refused.
        reason: StepRejection,
    },
    /// Announces that the session switched between exploring and talking.
    ModeChanged {
        /// Mode that became active after processing commands.
        mode: Mode,
    },
    /// Confirms that a conversation started at its first line.
    DialogueOpened {
        /// NPC delivering the conversation.
        npc: NpcId,
    },
    /// Confirms that the open conversation moved to a later line.
    DialogueAdvanced {
        /// NPC delivering the conversation.
        npc: NpcId,
        /// Zero-based index of the line now on display.
        line_index: usize,
    },
    /// Confirms that the conversation ran out of lines and closed.
    DialogueClosed {
        /// NPC whose conversation finished.
        npc: NpcId,
    },
    /// Reports that a request to open a conversation was refused.
    DialogueRejected {
        /// NPC named in the request.
        npc: NpcId,
        /// Specific reason the conversation did not open.
        reason: DialogueRejection,
    },
}

/// Occupant that prevented the player from entering a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Obstruction {
    /// The tile is a wall, water, or lies outside the map.
    Terrain(Tile),
    /// An NPC stands on the tile.
    Npc(NpcId),
}

/// Reasons the world refuses a step request before looking at the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepRejection {
    /// A conversation is open, so movement is suspended.
    Talking,
    /// The previous step's cooldown has not elapsed.
    CoolingDown,
}

/// Reasons a conversation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogueRejection {
    /// Another conversation is already open.
    AlreadyOpen,
    /// No NPC with the provided identifier exists.
    UnknownNpc,
    /// The NPC does not stand on the tile the player faces.
    OutOfReach,
}

/// Terrain classification of a single grid tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Walkable ground.
    #[default]
    Open,
    /// Walls, trees and rocks.
    Blocking,
    /// Water. Impassable, but drawn differently from walls.
    Liquid,
}

impl Tile {
    /// Reports whether the player may stand on the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Cardinal directions the player may face and step in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Unit offset `(dx, dy)` of the direction in tile space.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single tile expressed as signed column and row indices.
///
/// Coordinates are signed so callers can probe positions outside the map; the
/// world treats every such position as blocking.
///
/// Deserializes from an `[x, y]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "[i32; 2]")]
pub struct TilePosition {
    x: i32,
    y: i32,
}

impl TilePosition {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring tile one step in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<[i32; 2]> for TilePosition {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Unique identifier assigned to an NPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NpcId(u32);

impl NpcId {
    /// Creates a new NPC identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Display colour attached to an actor. Opaque to gameplay logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl ActorColor {
    /// Creates a new actor color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a `#rrggbb` hex string.
    #[must_use]
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Tile currently occupied by the player.
    pub position: TilePosition,
    /// Direction the player faces.
    pub facing: Direction,
    /// Time remaining before another step is permitted.
    pub cooldown: Duration,
}

impl PlayerSnapshot {
    /// Tile directly ahead of the player.
    ///
    /// Interaction targeting and the facing indicator both resolve through
    /// this method so they always agree.
    #[must_use]
    pub const fn facing_tile(&self) -> TilePosition {
        self.position.step(self.facing)
    }

    /// Reports whether the step cooldown has fully elapsed.
    #[must_use]
    pub fn ready_for_step(&self) -> bool {
        self.cooldown.is_zero()
    }
}

/// Immutable representation of a single NPC used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcSnapshot {
    /// Unique identifier assigned to the NPC.
    pub id: NpcId,
    /// Display name of the NPC.
    pub name: String,
    /// Tile the NPC stands on.
    pub position: TilePosition,
    /// Appearance assigned to the NPC.
    pub color: ActorColor,
    /// Number of lines the NPC delivers in a conversation.
    pub line_count: usize,
}

/// Read-only snapshot describing all NPCs on the map.
#[derive(Clone, Debug, Default)]
pub struct NpcView {
    snapshots: Vec<NpcSnapshot>,
}

impl NpcView {
    /// Creates a new NPC view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<NpcSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured NPC snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &NpcSnapshot> {
        self.snapshots.iter()
    }

    /// Returns the NPC standing on the provided tile, if any.
    #[must_use]
    pub fn at(&self, position: TilePosition) -> Option<&NpcSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.position == position)
    }

    /// Number of NPCs captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no NPCs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of the open conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueSnapshot {
    /// NPC delivering the conversation.
    pub npc: NpcId,
    /// Display name of the NPC.
    pub name: String,
    /// Zero-based index of the line on display.
    pub line_index: usize,
    /// Text of the line on display.
    pub line: String,
}

/// Logical buttons understood by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Move toward the top of the map.
    Up,
    /// Move toward the bottom of the map.
    Down,
    /// Move toward the left edge of the map.
    Left,
    /// Move toward the right edge of the map.
    Right,
    /// Talk to the faced NPC or continue the open conversation.
    Interact,
}

impl Button {
    /// Every button in a stable order.
    pub const ALL: [Button; 5] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Interact,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Interact => 4,
        }
    }
}

/// Held state of every logical button for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputState {
    held: [bool; 5],
}

impl InputState {
    /// Creates an input state with every button released.
    #[must_use]
    pub const fn new() -> Self {
        Self { held: [false; 5] }
    }

    /// Returns a copy of the state with the provided button held down.
    #[must_use]
    pub fn with(mut self, button: Button) -> Self {
        self.held[button.index()] = true;
        self
    }

    /// Records whether the provided button is held.
    pub fn set(&mut self, button: Button, held: bool) {
        self.held[button.index()] = held;
    }

    /// Reports whether the provided button is held.
    #[must_use]
    pub const fn is_held(&self, button: Button) -> bool {
        self.held[button.index()]
    }
}

/// Tracks consecutive input frames so presses can be told apart from holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputTracker {
    previous: InputState,
    current: InputState,
}

impl InputTracker {
    /// Records the held state observed for a new frame.
    pub fn observe(&mut self, input: InputState) {
        self.previous = self.current;
        self.current = input;
    }

    /// Held state observed on the most recent frame.
    #[must_use]
    pub const fn current(&self) -> InputState {
        self.current
    }

    /// Reports whether the button went from released to held on the latest frame.
    #[must_use]
    pub const fn pressed(&self, button: Button) -> bool {
        self.current.is_held(button) && !self.previous.is_held(button)
    }
}

#[cfg(test)]
mod tests {
    use super::{ActorColor, Button, Direction, InputState, InputTracker, Mode, TilePosition};

    #[test]
    fn step_moves_one_tile_in_each_direction() {
        let origin = TilePosition::new(3, 3);
        assert_eq!(origin.step(Direction::North), TilePosition::new(3, 2));
        assert_eq!(origin.step(Direction::South), TilePosition::new(3, 4));
        assert_eq!(origin.step(Direction::West), TilePosition::new(2, 3));
        assert_eq!(origin.step(Direction::East), TilePosition::new(4, 3));
    }

    #[test]
    fn step_reaches_negative_coordinates() {
        let corner = TilePosition::new(0, 0);
        assert_eq!(corner.step(Direction::North), TilePosition::new(0, -1));
        assert_eq!(corner.step(Direction::West), TilePosition::new(-1, 0));
    }

    #[test]
    fn actor_color_parses_hex() {
        assert_eq!(
            ActorColor::from_hex("#ff6b6b"),
            Some(ActorColor::from_rgb(0xff, 0x6b, 0x6b))
        );
        assert_eq!(ActorColor::from_hex("ff6b6b"), None);
        assert_eq!(ActorColor::from_hex("#ff6b"), None);
        assert_eq!(ActorColor::from_hex("#gg0000"), None);
    }

    #[test]
    fn tracker_reports_press_only_on_rising_edge() {
        let held = InputState::new().with(Button::Interact);
        let mut tracker = InputTracker::default();

        tracker.observe(held);
        assert!(tracker.pressed(Button::Interact));

        tracker.observe(held);
        assert!(!tracker.pressed(Button::Interact));

        tracker.observe(InputState::new());
        assert!(!tracker.pressed(Button::Interact));

        tracker.observe(held);
        assert!(tracker.pressed(Button::Interact));
    }

    #[test]
    fn mode_selects_status_line() {
        assert!(Mode::Exploring.status_line().starts_with("Move:"));
        assert!(Mode::Talking.status_line().starts_with("Talking"));
    }
}
