//! Viewport sizing and the camera that keeps the player centred.

use glam::Vec2;
use wishwalk_core::TilePosition;

use crate::RenderingError;

/// Physical window size together with the display's device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayGeometry {
    /// Physical width in pixels.
    pub width: f32,
    /// Physical height in pixels.
    pub height: f32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl DisplayGeometry {
    /// Creates a new display geometry descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Integer pixel ratio, never below one.
    #[must_use]
    pub fn integer_ratio(&self) -> f32 {
        let ratio = self.pixel_ratio.floor();
        if ratio.is_finite() && ratio > 1.0 {
            ratio
        } else {
            1.0
        }
    }

    /// Size in logical pixels.
    #[must_use]
    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / self.integer_ratio()
    }
}

/// Number of whole tiles that fit on screen along each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Whole tiles across.
    pub columns: u32,
    /// Whole tiles down.
    pub rows: u32,
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Whole tiles of `tile_size` that fit in the logical size.
    #[must_use]
    pub fn fit(logical_size: Vec2, tile_size: f32) -> Self {
        Self {
            columns: whole_tiles(logical_size.x, tile_size),
            rows: whole_tiles(logical_size.y, tile_size),
        }
    }
}

fn whole_tiles(extent: f32, tile_size: f32) -> u32 {
    // Float to int casts saturate, so negative and NaN extents map to zero.
    (extent / tile_size).floor() as u32
}

/// Per-frame layout handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLayout {
    /// Whole tiles visible on screen.
    pub viewport: Viewport,
    /// Edge length of a tile in logical pixels.
    pub tile_size: f32,
}

impl FrameLayout {
    /// Derives the layout for the current display geometry.
    pub fn new(geometry: DisplayGeometry, tile_size: f32) -> Result<Self, RenderingError> {
        let tile_size = validate_tile_size(tile_size)?;
        Ok(Self {
            viewport: Viewport::fit(geometry.logical_size(), tile_size),
            tile_size,
        })
    }
}

/// Accepts only finite, strictly positive tile sizes.
pub fn validate_tile_size(tile_size: f32) -> Result<f32, RenderingError> {
    if !tile_size.is_finite() || tile_size <= 0.0 {
        return Err(RenderingError::InvalidTileSize { tile_size });
    }
    Ok(tile_size)
}

/// Top-left tile of the visible region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Camera {
    origin: TilePosition,
}

impl Camera {
    /// Centres the viewport on `focus`, rounding the origin down.
    ///
    /// The origin is `floor(focus - viewport / 2)` on each axis; it may be
    /// negative or lie past the map edge.
    #[must_use]
    pub fn centered_on(focus: TilePosition, viewport: Viewport) -> Self {
        Self {
            origin: TilePosition::new(
                focus.x().saturating_sub(half_rounded_up(viewport.columns)),
                focus.y().saturating_sub(half_rounded_up(viewport.rows)),
            ),
        }
    }

    /// Top-left visible tile.
    #[must_use]
    pub const fn origin(&self) -> TilePosition {
        self.origin
    }

    /// Screen position of the top-left corner of `position`.
    #[must_use]
    pub fn to_screen(&self, position: TilePosition, tile_size: f32) -> Vec2 {
        let column = i64::from(position.x()) - i64::from(self.origin.x());
        let row = i64::from(position.y()) - i64::from(self.origin.y());
        Vec2::new(column as f32, row as f32) * tile_size
    }
}

fn half_rounded_up(extent: u32) -> i32 {
    i32::try_from(extent / 2 + extent % 2).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_size_divides_by_integer_ratio() {
        let retina = DisplayGeometry::new(1920.0, 1080.0, 2.5);
        assert_eq!(retina.logical_size(), Vec2::new(960.0, 540.0));

        let fractional = DisplayGeometry::new(800.0, 600.0, 0.75);
        assert_eq!(fractional.logical_size(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn viewport_counts_whole_tiles() {
        let viewport = Viewport::fit(Vec2::new(1000.0, 500.0), 48.0);
        assert_eq!(viewport, Viewport::new(20, 10));

        assert_eq!(
            Viewport::fit(Vec2::new(47.0, 0.0), 48.0),
            Viewport::new(0, 0)
        );
    }

    #[test]
    fn frame_layout_rejects_degenerate_tile_sizes() {
        let geometry = DisplayGeometry::new(640.0, 480.0, 1.0);
        for tile_size in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            assert!(FrameLayout::new(geometry, tile_size).is_err());
        }

        let layout = FrameLayout::new(geometry, 48.0).expect("positive tile size");
        assert_eq!(layout.viewport, Viewport::new(13, 10));
    }

    #[test]
    fn tile_size_validation_needs_no_geometry() {
        assert_eq!(validate_tile_size(48.0), Ok(48.0));
        assert_eq!(
            validate_tile_size(0.0),
            Err(RenderingError::InvalidTileSize { tile_size: 0.0 })
        );
        assert!(validate_tile_size(f32::NAN).is_err());
    }

    #[test]
    fn camera_origin_floors_for_odd_viewports() {
        let even = Camera::centered_on(TilePosition::new(10, 10), Viewport::new(20, 10));
        assert_eq!(even.origin(), TilePosition::new(0, 5));

        let odd = Camera::centered_on(TilePosition::new(10, 10), Viewport::new(5, 7));
        assert_eq!(odd.origin(), TilePosition::new(7, 6));
    }

    #[test]
    fn camera_origin_can_leave_the_map() {
        let camera = Camera::centered_on(TilePosition::new(1, 1), Viewport::new(9, 9));
        assert_eq!(camera.origin(), TilePosition::new(-4, -4));
        assert_eq!(
            camera.to_screen(TilePosition::new(1, 1), 48.0),
            Vec2::new(240.0, 240.0)
        );
    }
}
