use wishwalk_core::{Tile, TilePosition};

/// Immutable terrain grid addressed by signed tile positions.
///
/// Positions outside `[0, columns) x [0, rows)` resolve to [`Tile::Blocking`],
/// so collision probes never need bounds checks of their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Wraps a row-major tile buffer. The buffer must hold `columns * rows` tiles.
    pub(crate) fn from_tiles(columns: u32, rows: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len() as u64, u64::from(columns) * u64::from(rows));
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Number of columns contained in the map.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the map.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Row-major view of every tile.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Reports whether the position lies inside the map.
    #[must_use]
    pub fn contains(&self, position: TilePosition) -> bool {
        self.index(position).is_some()
    }

    /// Terrain at the provided position; [`Tile::Blocking`] outside the map.
    #[must_use]
    pub fn tile_at(&self, position: TilePosition) -> Tile {
        self.index(position)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::Blocking)
    }

    /// Reports whether the player is barred from entering the position.
    #[must_use]
    pub fn is_blocked(&self, position: TilePosition) -> bool {
        !self.tile_at(position).is_passable()
    }

    /// Reports whether every cell on the outer ring is [`Tile::Blocking`].
    #[must_use]
    pub fn border_is_solid(&self) -> bool {
        let last_column = self.columns as i32 - 1;
        let last_row = self.rows as i32 - 1;
        (0..self.rows as i32)
            .flat_map(|y| (0..self.columns as i32).map(move |x| TilePosition::new(x, y)))
            .filter(|position| {
                position.x() == 0
                    || position.y() == 0
                    || position.x() == last_column
                    || position.y() == last_row
            })
            .all(|position| self.tile_at(position) == Tile::Blocking)
    }

    fn index(&self, position: TilePosition) -> Option<usize> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> TileMap {
        let mut tiles = vec![Tile::Open; 12];
        for (index, tile) in tiles.iter_mut().enumerate() {
            let (x, y) = (index % 4, index / 4);
            if x == 0 || y == 0 || x == 3 || y == 2 {
                *tile = Tile::Blocking;
            }
        }
        TileMap::from_tiles(4, 3, tiles)
    }

    #[test]
    fn out_of_range_positions_are_blocking() {
        let map = open_room();
        for position in [
            TilePosition::new(-1, 0),
            TilePosition::new(0, -1),
            TilePosition::new(4, 1),
            TilePosition::new(1, 3),
            TilePosition::new(i32::MIN, i32::MAX),
        ] {
            assert_eq!(map.tile_at(position), Tile::Blocking);
            assert!(map.is_blocked(position));
            assert!(!map.contains(position));
        }
    }

    #[test]
    fn liquid_blocks_movement() {
        let mut tiles = open_room().tiles().to_vec();
        tiles[5] = Tile::Liquid;
        let map = TileMap::from_tiles(4, 3, tiles);

        assert_eq!(map.tile_at(TilePosition::new(1, 1)), Tile::Liquid);
        assert!(map.is_blocked(TilePosition::new(1, 1)));
        assert!(!map.is_blocked(TilePosition::new(2, 1)));
    }

    #[test]
    fn border_check_detects_gaps() {
        let map = open_room();
        assert!(map.border_is_solid());

        let mut tiles = map.tiles().to_vec();
        tiles[1] = Tile::Open;
        assert!(!TileMap::from_tiles(4, 3, tiles).border_is_solid());
    }
}
