//! Backend-agnostic frame rendering.

use glam::Vec2;
use wishwalk_core::{Tile, TilePosition};

use crate::{Camera, Color, FrameLayout, PlayerPresentation, Scene};

/// Fill used for tiles outside the map.
pub const VOID_COLOR: Color = Color::from_rgb_u8(0x0b, 0x10, 0x20);

const GRASS: Color = Color::from_rgb_u8(0x2f, 0x8f, 0x4e);
const GRASS_SHEEN: Color = Color::new(1.0, 1.0, 1.0, 0.06);
const TREE_SHADOW: Color = Color::from_rgb_u8(0x1e, 0x3a, 0x2a);
const TREE_CROWN: Color = Color::from_rgb_u8(0x2d, 0x6a, 0x45);
const WATER: Color = Color::from_rgb_u8(0x2b, 0x6c, 0xff);
const WATER_RIPPLE: Color = Color::new(1.0, 1.0, 1.0, 0.16);
const SKIN: Color = Color::from_rgb_u8(0xf5, 0xd7, 0xb2);
const FACING_DOT: Color = Color::from_rgb_u8(0, 0, 0).with_alpha(0.35);

const HIGHLIGHT_THICKNESS: f32 = 2.0;
const TREE_INSET: f32 = 4.0;
const FACING_DOT_RADIUS: f32 = 4.0;

/// Drawing primitives a backend must provide.
pub trait DrawSurface {
    /// Clears the whole surface.
    fn clear(&mut self, color: Color);

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

/// Single primitive captured by a [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Surface cleared with a color.
    Clear(Color),
    /// Rectangle filled.
    Rect {
        /// Top-left corner in logical pixels.
        origin: Vec2,
        /// Width and height in logical pixels.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Circle filled.
    Circle {
        /// Centre in logical pixels.
        center: Vec2,
        /// Radius in logical pixels.
        radius: f32,
        /// Fill color.
        color: Color,
    },
}

/// Headless surface that records every primitive in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Consumes the surface, returning the recorded primitives.
    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            origin,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}

/// Draws the scene: terrain, NPCs, the player and finally the facing indicator.
///
/// `void_color` clears the surface and fills every tile outside the map. The
/// output depends only on the arguments, so identical inputs always produce
/// identical primitive sequences.
pub fn render_frame<S>(scene: &Scene, layout: &FrameLayout, void_color: Color, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    let tile_size = layout.tile_size;
    let camera = Camera::centered_on(scene.player.position, layout.viewport);

    surface.clear(void_color);
    draw_terrain(scene, layout, &camera, void_color, surface);

    for npc in &scene.npcs {
        draw_actor(surface, camera.to_screen(npc.position, tile_size), tile_size, npc.color);
    }
    draw_actor(
        surface,
        camera.to_screen(scene.player.position, tile_size),
        tile_size,
        PlayerPresentation::COLOR,
    );

    let facing = camera.to_screen(scene.player.facing_tile(), tile_size);
    surface.fill_circle(
        facing + Vec2::splat(tile_size / 2.0),
        FACING_DOT_RADIUS,
        FACING_DOT,
    );
}

fn draw_terrain<S>(
    scene: &Scene,
    layout: &FrameLayout,
    camera: &Camera,
    void_color: Color,
    surface: &mut S,
) where
    S: DrawSurface + ?Sized,
{
    let origin = camera.origin();
    let columns = i64::from(layout.viewport.columns) + 2;
    let rows = i64::from(layout.viewport.rows) + 2;

    for row in 0..rows {
        for column in 0..columns {
            let x = i64::from(origin.x()) + column;
            let y = i64::from(origin.y()) + row;
            let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                continue;
            };
            let position = TilePosition::new(x, y);
            let screen = camera.to_screen(position, layout.tile_size);
            match scene.tile_map.tile_at(position) {
                Some(tile) => draw_tile(surface, tile, screen, layout.tile_size),
                None => surface.fill_rect(screen, Vec2::splat(layout.tile_size), void_color),
            }
        }
    }
}

fn draw_tile<S>(surface: &mut S, tile: Tile, origin: Vec2, tile_size: f32)
where
    S: DrawSurface + ?Sized,
{
    let full = Vec2::splat(tile_size);
    match tile {
        Tile::Open => {
            surface.fill_rect(origin, full, GRASS);
            surface.fill_rect(
                origin,
                Vec2::new(tile_size, HIGHLIGHT_THICKNESS),
                GRASS_SHEEN,
            );
        }
        Tile::Blocking => {
            surface.fill_rect(origin, full, TREE_SHADOW);
            surface.fill_rect(
                origin + Vec2::splat(TREE_INSET),
                full - Vec2::splat(TREE_INSET * 2.0),
                TREE_CROWN,
            );
        }
        Tile::Liquid => {
            surface.fill_rect(origin, full, WATER);
            surface.fill_rect(
                origin + Vec2::new(0.0, tile_size / 2.0),
                Vec2::new(tile_size, HIGHLIGHT_THICKNESS),
                WATER_RIPPLE,
            );
        }
    }
}

/// Pixel person: a coloured body with a skin-toned head above it.
fn draw_actor<S>(surface: &mut S, origin: Vec2, tile_size: f32, color: Color)
where
    S: DrawSurface + ?Sized,
{
    surface.fill_rect(
        origin + Vec2::new(0.25, 0.2) * tile_size,
        Vec2::new(0.5, 0.55) * tile_size,
        color,
    );
    surface.fill_rect(
        origin + Vec2::new(0.33, 0.08) * tile_size,
        Vec2::new(0.34, 0.2) * tile_size,
        SKIN,
    );
}
