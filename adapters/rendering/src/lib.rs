#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Wishwalk adapters.

mod camera;
mod frame;

use anyhow::Result as AnyResult;
use std::{error::Error, fmt, time::Duration};
use wishwalk_core::{ActorColor, Direction, InputState, Mode, Tile, TilePosition};

pub use camera::{validate_tile_size, Camera, DisplayGeometry, FrameLayout, Viewport};
pub use frame::{render_frame, DrawCommand, DrawSurface, RecordingSurface, VOID_COLOR};

/// Edge length of a tile in source pixels before scaling.
pub const DEFAULT_TILE_SIZE: f32 = 16.0;

/// Integer scale applied to the source tile size.
pub const DEFAULT_SCALE: f32 = 3.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl From<ActorColor> for Color {
    fn from(color: ActorColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Terrain snapshot copied out of the world once per frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileMapPresentation {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileMapPresentation {
    /// Creates a terrain snapshot from a row-major tile buffer.
    pub fn new(columns: u32, rows: u32, tiles: Vec<Tile>) -> Result<Self, RenderingError> {
        let expected = u64::from(columns) * u64::from(rows);
        if tiles.len() as u64 != expected {
            return Err(RenderingError::TileCountMismatch {
                expected,
                found: tiles.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            tiles,
        })
    }

    /// Number of columns in the snapshot.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the snapshot.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Terrain at the position, or `None` for the void outside the map.
    #[must_use]
    pub fn tile_at(&self, position: TilePosition) -> Option<Tile> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = u64::from(row) * u64::from(self.columns) + u64::from(column);
        self.tiles.get(usize::try_from(index).ok()?).copied()
    }
}

/// Stationary character drawn on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Tile the actor stands on.
    pub position: TilePosition,
    /// Body color.
    pub color: Color,
}

impl ActorPresentation {
    /// Creates a new actor presentation.
    #[must_use]
    pub const fn new(position: TilePosition, color: Color) -> Self {
        Self { position, color }
    }
}

/// Player avatar drawn on top of every other actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Tile the player stands on.
    pub position: TilePosition,
    /// Direction the player faces.
    pub facing: Direction,
}

impl PlayerPresentation {
    /// Body color of the player avatar.
    pub const COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

    /// Creates a new player presentation.
    #[must_use]
    pub const fn new(position: TilePosition, facing: Direction) -> Self {
        Self { position, facing }
    }

    /// Tile marked by the facing indicator.
    #[must_use]
    pub const fn facing_tile(&self) -> TilePosition {
        self.position.step(self.facing)
    }
}

/// Conversation text shown while talking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialoguePresentation {
    /// Name of the speaking NPC.
    pub name: String,
    /// Line currently on display.
    pub line: String,
}

/// Count of NPCs who have delivered all of their wishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressPresentation {
    /// NPCs talked to until the end.
    pub greeted: usize,
    /// NPCs on the map.
    pub total: usize,
}

impl ProgressPresentation {
    /// Human readable progress label.
    #[must_use]
    pub fn label(&self) -> String {
        if self.total > 0 && self.greeted >= self.total {
            format!(
                "Wishes collected: {}/{} - Happy Birthday!",
                self.greeted, self.total
            )
        } else {
            format!("Wishes collected: {}/{}", self.greeted, self.total)
        }
    }
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Terrain of the map.
    pub tile_map: TileMapPresentation,
    /// Player avatar.
    pub player: PlayerPresentation,
    /// NPCs drawn before the player.
    pub npcs: Vec<ActorPresentation>,
    /// Open conversation, if any.
    pub dialogue: Option<DialoguePresentation>,
    /// Mode the status line reflects.
    pub mode: Mode,
    /// Progress towards talking to everyone.
    pub progress: ProgressPresentation,
}

impl Scene {
    /// Creates a new scene with no conversation open.
    #[must_use]
    pub fn new(
        tile_map: TileMapPresentation,
        player: PlayerPresentation,
        npcs: Vec<ActorPresentation>,
    ) -> Self {
        let total = npcs.len();
        Self {
            tile_map,
            player,
            npcs,
            dialogue: None,
            mode: Mode::Exploring,
            progress: ProgressPresentation { greeted: 0, total },
        }
    }

    /// Status text shown at the top of the screen.
    #[must_use]
    pub fn status_line(&self) -> &'static str {
        self.mode.status_line()
    }
}

/// Static description of the window plus the initial scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used for the window.
    pub window_title: String,
    /// Color used to clear the window and to fill tiles outside the map.
    pub clear_color: Color,
    /// Edge length of a tile on screen, in logical pixels.
    pub tile_size: f32,
    /// Scene rendered on the first frame.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, tile_size: f32, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            tile_size,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Wishwalk scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the measured frame delta and
    /// the buttons held on this frame, and updates the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, InputState, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive, finite edge length.
    InvalidTileSize {
        /// Provided tile size that failed validation.
        tile_size: f32,
    },
    /// The tile buffer does not cover the grid exactly.
    TileCountMismatch {
        /// Number of tiles implied by the grid dimensions.
        expected: u64,
        /// Number of tiles provided.
        found: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { tile_size } => {
                write!(f, "tile size must be positive (received {tile_size})")
            }
            Self::TileCountMismatch { expected, found } => {
                write!(f, "expected {expected} tiles, received {found}")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_map_presentation_rejects_mismatched_buffers() {
        let error = TileMapPresentation::new(3, 2, vec![Tile::Open; 5])
            .expect_err("short buffer must be rejected");
        assert_eq!(
            error,
            RenderingError::TileCountMismatch {
                expected: 6,
                found: 5
            }
        );
    }

    #[test]
    fn tile_map_presentation_reports_void_outside_bounds() {
        let mut tiles = vec![Tile::Open; 6];
        tiles[5] = Tile::Liquid;
        let map = TileMapPresentation::new(3, 2, tiles).expect("valid buffer");

        assert_eq!(map.tile_at(TilePosition::new(2, 1)), Some(Tile::Liquid));
        assert_eq!(map.tile_at(TilePosition::new(-1, 0)), None);
        assert_eq!(map.tile_at(TilePosition::new(3, 0)), None);
        assert_eq!(map.tile_at(TilePosition::new(0, 2)), None);
    }

    #[test]
    fn actor_colors_convert_to_opaque_colors() {
        let color = Color::from(ActorColor::from_rgb(255, 0, 51));
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn progress_label_celebrates_completion() {
        let partial = ProgressPresentation {
            greeted: 1,
            total: 3,
        };
        let done = ProgressPresentation {
            greeted: 3,
            total: 3,
        };
        assert_eq!(partial.label(), "Wishes collected: 1/3");
        assert_eq!(done.label(), "Wishes collected: 3/3 - Happy Birthday!");
    }

    #[test]
    fn new_scene_starts_exploring() {
        let scene = Scene::new(
            TileMapPresentation::default(),
            PlayerPresentation::new(TilePosition::new(1, 1), Direction::South),
            vec![ActorPresentation::new(
                TilePosition::new(2, 2),
                Color::from_rgb_u8(1, 2, 3),
            )],
        );
        assert!(scene.dialogue.is_none());
        assert_eq!(scene.status_line(), wishwalk_core::EXPLORING_STATUS);
        assert_eq!(scene.progress.total, 1);
        assert_eq!(scene.player.facing_tile(), TilePosition::new(1, 2));
    }
}
