//! Map sources that produce a [`TileMap`] with a solid border.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use wishwalk_core::{Tile, TilePosition};

use crate::TileMap;

/// Smallest grid edge that still leaves an interior inside the border.
pub const MIN_GRID_EDGE: u32 = 3;

/// Where the terrain of a world comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapSource {
    /// Hand-authored meadow with two ponds and a row of trees.
    Reference,
    /// Seeded random ponds and obstacles stamped inside the border.
    Scattered {
        /// Seed fed to the layout generator.
        seed: u64,
        /// Number of rectangular ponds to carve.
        ponds: u32,
        /// Number of straight obstacle runs to place.
        obstacles: u32,
    },
    /// ASCII rows: `#` blocking, `~` liquid, `.` open.
    Rows(Vec<String>),
}

/// Reasons a map source cannot produce a tile map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The grid leaves no interior inside its border.
    #[error("a {columns}x{rows} map is too small, both edges must be at least 3 tiles")]
    TooSmall {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The ASCII source has no rows or an empty first row.
    #[error("map rows are empty")]
    EmptyMap,
    /// An ASCII row differs in length from the first row.
    #[error("map row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// An ASCII row contains a character with no tile meaning.
    #[error("unknown map glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Character that could not be mapped.
        glyph: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
}

/// Builds the terrain described by `source`.
///
/// `columns` and `rows` size the generated sources; ASCII rows carry their own
/// dimensions. Scattered layouts never cover a `reserved` tile.
pub(crate) fn build(
    source: &MapSource,
    columns: u32,
    rows: u32,
    reserved: &[TilePosition],
) -> Result<TileMap, LayoutError> {
    match source {
        MapSource::Reference => {
            ensure_interior(columns, rows)?;
            Ok(reference(columns, rows))
        }
        MapSource::Scattered {
            seed,
            ponds,
            obstacles,
        } => {
            ensure_interior(columns, rows)?;
            Ok(scattered(columns, rows, *seed, *ponds, *obstacles, reserved))
        }
        MapSource::Rows(lines) => parse_rows(lines),
    }
}

/// Stamps the hand-authored meadow, clipping every feature to the interior.
pub(crate) fn reference(columns: u32, rows: u32) -> TileMap {
    let mut canvas = Canvas::bordered(columns, rows);
    canvas.fill(TileRect::new(19, 4, 5, 4), Tile::Liquid, &[]);
    canvas.fill(TileRect::new(6, 11, 3, 3), Tile::Liquid, &[]);
    canvas.fill(TileRect::new(10, 3, 1, 4), Tile::Blocking, &[]);
    canvas.fill(TileRect::new(11, 6, 2, 1), Tile::Blocking, &[]);
    canvas.finish()
}

fn scattered(
    columns: u32,
    rows: u32,
    seed: u64,
    ponds: u32,
    obstacles: u32,
    reserved: &[TilePosition],
) -> TileMap {
    let mut canvas = Canvas::bordered(columns, rows);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let interior_width = columns - 2;
    let interior_height = rows - 2;

    for _ in 0..ponds {
        let width = rng.gen_range(2..=5).min(interior_width);
        let height = rng.gen_range(2..=4).min(interior_height);
        let rect = place(&mut rng, columns, rows, width, height);
        canvas.fill(rect, Tile::Liquid, reserved);
    }

    for _ in 0..obstacles {
        let length = rng.gen_range(1..=4);
        let (width, height) = if rng.gen_bool(0.5) {
            (length.min(interior_width), 1)
        } else {
            (1, length.min(interior_height))
        };
        let rect = place(&mut rng, columns, rows, width, height);
        canvas.fill(rect, Tile::Blocking, reserved);
    }

    canvas.finish()
}

fn place(rng: &mut ChaCha8Rng, columns: u32, rows: u32, width: u32, height: u32) -> TileRect {
    let x = rng.gen_range(1..=columns - 1 - width);
    let y = rng.gen_range(1..=rows - 1 - height);
    TileRect::new(x, y, width, height)
}

fn parse_rows(lines: &[String]) -> Result<TileMap, LayoutError> {
    let expected = lines.first().map_or(0, |line| line.chars().count());
    if expected == 0 {
        return Err(LayoutError::EmptyMap);
    }

    let mut tiles = Vec::with_capacity(expected * lines.len());
    for (row, line) in lines.iter().enumerate() {
        let found = line.chars().count();
        if found != expected {
            return Err(LayoutError::RaggedRow {
                row,
                expected,
                found,
            });
        }
        for (column, glyph) in line.chars().enumerate() {
            let tile = match glyph {
                '.' => Tile::Open,
                '#' => Tile::Blocking,
                '~' => Tile::Liquid,
                _ => {
                    return Err(LayoutError::UnknownGlyph { glyph, column, row });
                }
            };
            tiles.push(tile);
        }
    }

    let columns = u32::try_from(expected).unwrap_or(u32::MAX);
    let rows = u32::try_from(lines.len()).unwrap_or(u32::MAX);
    ensure_interior(columns, rows)?;
    Ok(TileMap::from_tiles(columns, rows, tiles))
}

fn ensure_interior(columns: u32, rows: u32) -> Result<(), LayoutError> {
    if columns < MIN_GRID_EDGE || rows < MIN_GRID_EDGE {
        return Err(LayoutError::TooSmall { columns, rows });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
struct TileRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl TileRect {
    const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug)]
struct Canvas {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Canvas {
    fn bordered(columns: u32, rows: u32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut tiles = Vec::with_capacity(capacity);
        for y in 0..rows {
            for x in 0..columns {
                let border = x == 0 || y == 0 || x + 1 == columns || y + 1 == rows;
                tiles.push(if border { Tile::Blocking } else { Tile::Open });
            }
        }
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Fills the interior part of `rect`, leaving border and reserved tiles alone.
    fn fill(&mut self, rect: TileRect, tile: Tile, reserved: &[TilePosition]) {
        let x_end = rect.x.saturating_add(rect.width).min(self.columns.saturating_sub(1));
        let y_end = rect.y.saturating_add(rect.height).min(self.rows.saturating_sub(1));
        for y in rect.y.max(1)..y_end {
            for x in rect.x.max(1)..x_end {
                let position = TilePosition::new(x as i32, y as i32);
                if reserved.contains(&position) {
                    continue;
                }
                let index = y as usize * self.columns as usize + x as usize;
                if let Some(slot) = self.tiles.get_mut(index) {
                    *slot = tile;
                }
            }
        }
    }

    fn finish(self) -> TileMap {
        TileMap::from_tiles(self.columns, self.rows, self.tiles)
    }
}
