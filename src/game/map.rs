//! Tile Map Collaborators
//!
//! The world core only needs two things from the map: a point
//! walkability test and the map's world-space extent. Both are traits
//! here; `TileMap` is the grid implementation used by the binary,
//! tests and benchmarks.

use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::core::vec2::Vec2;

/// Point traversability test.
///
/// Must be pure: the same position always gives the same answer.
pub trait Walkability {
    /// Can an entity stand on this world position?
    fn is_reachable(&self, position: Vec2) -> bool;
}

impl<F> Walkability for F
where
    F: Fn(Vec2) -> bool,
{
    fn is_reachable(&self, position: Vec2) -> bool {
        self(position)
    }
}

/// Grid dimensions used for camera bounds.
pub trait TileGeometry {
    /// Edge length of one tile in world units.
    fn tile_size(&self) -> f32;

    /// Map size in tiles as (columns, rows).
    fn map_size(&self) -> (usize, usize);

    /// Map size in world units.
    fn world_size(&self) -> Vec2 {
        let (columns, rows) = self.map_size();
        Vec2::new(columns as f32, rows as f32) * self.tile_size()
    }
}

/// Tile map errors.
#[derive(Debug, Error)]
pub enum MapError {
    /// Layer text had no rows.
    #[error("layer has no rows")]
    Empty,

    /// A row's column count differs from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Columns in the first row
        expected: usize,
        /// Columns in this row
        found: usize,
    },

    /// A token was not a tile id.
    #[error("invalid tile id {token:?} at row {row}, column {column}")]
    InvalidTile {
        /// Zero-based row index
        row: usize,
        /// Zero-based column index
        column: usize,
        /// Offending text
        token: String,
    },

    /// Tile size was zero, negative or not finite.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),

    /// Reading a layer file failed.
    #[error("failed to read layer: {0}")]
    Io(#[from] std::io::Error),
}

/// Row-major grid of tile ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileLayer {
    columns: usize,
    tiles: Vec<i32>,
}

impl TileLayer {
    /// Parse rows of comma or whitespace separated tile ids.
    ///
    /// Blank lines are skipped; every remaining row must have the same
    /// number of tiles.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut columns = 0;
        let mut tiles = Vec::new();

        let rows = text.lines().map(str::trim).filter(|line| !line.is_empty());
        for (row, line) in rows.enumerate() {
            let mut found = 0;
            for (column, token) in line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .enumerate()
            {
                let id = token.parse::<i32>().map_err(|_| MapError::InvalidTile {
                    row,
                    column,
                    token: token.to_string(),
                })?;
                tiles.push(id);
                found += 1;
            }

            if row == 0 {
                columns = found;
            } else if found != columns {
                return Err(MapError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }
        }

        if columns == 0 {
            return Err(MapError::Empty);
        }

        Ok(Self { columns, tiles })
    }

    /// Read and parse a layer file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let layer = Self::parse(&text)?;
        info!(
            "Loaded layer {} ({}x{} tiles)",
            path.display(),
            layer.columns(),
            layer.rows()
        );
        Ok(layer)
    }

    /// Build a layer filled with one tile id.
    pub fn filled(columns: usize, rows: usize, tile: i32) -> Self {
        Self {
            columns,
            tiles: vec![tile; columns * rows],
        }
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.tiles.len() / self.columns
        }
    }

    /// Tile id at a grid coordinate, `None` outside the grid.
    pub fn tile_id_at(&self, x: i64, y: i64) -> Option<i32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.columns || y >= self.rows() {
            return None;
        }
        self.tiles.get(y * self.columns + x).copied()
    }

    /// Overwrite one tile. Out-of-grid coordinates are ignored.
    pub fn set_tile(&mut self, x: usize, y: usize, tile: i32) {
        if x < self.columns && y < self.rows() {
            self.tiles[y * self.columns + x] = tile;
        }
    }
}

/// Tile size plus which tile ids can be walked on.
#[derive(Clone, Debug)]
pub struct TileSet {
    tile_size: f32,
    walkable: BTreeSet<i32>,
}

impl TileSet {
    /// Create a tile set. Rejects non-positive tile sizes.
    pub fn new(tile_size: f32, walkable: impl IntoIterator<Item = i32>) -> Result<Self, MapError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(MapError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            tile_size,
            walkable: walkable.into_iter().collect(),
        })
    }

    /// Edge length of one tile.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Is this tile id walkable?
    pub fn is_walkable(&self, tile: i32) -> bool {
        self.walkable.contains(&tile)
    }
}

/// A layer paired with the tile set that interprets it.
#[derive(Clone, Debug)]
pub struct TileMap {
    layer: TileLayer,
    tile_set: TileSet,
}

impl TileMap {
    /// Pair a layer with its tile set.
    pub fn new(layer: TileLayer, tile_set: TileSet) -> Self {
        Self { layer, tile_set }
    }
}

impl Walkability for TileMap {
    fn is_reachable(&self, position: Vec2) -> bool {
        if !position.is_finite() {
            return false;
        }
        let cell = (position / self.tile_set.tile_size).floor();
        self.layer
            .tile_id_at(cell.x as i64, cell.y as i64)
            .is_some_and(|tile| self.tile_set.is_walkable(tile))
    }
}

impl TileGeometry for TileMap {
    fn tile_size(&self) -> f32 {
        self.tile_set.tile_size
    }

    fn map_size(&self) -> (usize, usize) {
        (self.layer.columns(), self.layer.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: i32 = 0;
    const WALL: i32 = 1;

    fn sample_map() -> TileMap {
        let layer = TileLayer::parse(
            "0,0,0,0\n\
             0,1,1,0\n\
             0,0,0,0\n",
        )
        .unwrap();
        TileMap::new(layer, TileSet::new(16.0, [FLOOR]).unwrap())
    }

    #[test]
    fn test_parse_layer() {
        let layer = TileLayer::parse("1 2 3\n\n4 5 6\n").unwrap();
        assert_eq!(layer.columns(), 3);
        assert_eq!(layer.rows(), 2);
        assert_eq!(layer.tile_id_at(2, 1), Some(6));
        assert_eq!(layer.tile_id_at(3, 0), None);
        assert_eq!(layer.tile_id_at(-1, 0), None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(TileLayer::parse(""), Err(MapError::Empty)));
        assert!(matches!(
            TileLayer::parse("0,0\n0\n"),
            Err(MapError::RaggedRow { row: 1, expected: 2, found: 1 })
        ));
        assert!(matches!(
            TileLayer::parse("0,x\n"),
            Err(MapError::InvalidTile { column: 1, .. })
        ));
    }

    #[test]
    fn test_tile_set_rejects_zero_size() {
        assert!(matches!(TileSet::new(0.0, [FLOOR]), Err(MapError::InvalidTileSize(_))));
    }

    #[test]
    fn test_is_reachable() {
        let map = sample_map();
        assert!(map.is_reachable(Vec2::new(1.0, 1.0)));
        assert!(!map.is_reachable(Vec2::new(20.0, 20.0))); // wall at (1,1)
        assert!(map.is_reachable(Vec2::new(63.9, 47.9)));

        // Outside the grid is never walkable
        assert!(!map.is_reachable(Vec2::new(64.0, 0.0)));
        assert!(!map.is_reachable(Vec2::new(-0.1, 0.0)));
    }

    #[test]
    fn test_layer_from_path() {
        let path = std::env::temp_dir().join(format!("tileworld-layer-{}.txt", std::process::id()));
        std::fs::write(&path, "0,1\n1,0\n").unwrap();
        let layer = TileLayer::from_path(&path);
        std::fs::remove_file(&path).unwrap();

        let layer = layer.unwrap();
        assert_eq!((layer.columns(), layer.rows()), (2, 2));
        assert_eq!(layer.tile_id_at(1, 0), Some(1));
    }

    #[test]
    fn test_layer_from_missing_path() {
        let path = std::env::temp_dir().join("tileworld-no-such-dir").join("layer.txt");
        assert!(matches!(TileLayer::from_path(path), Err(MapError::Io(_))));
    }

    #[test]
    fn test_world_size() {
        let map = sample_map();
        assert_eq!(map.map_size(), (4, 3));
        assert_eq!(map.world_size(), Vec2::new(64.0, 48.0));
    }

    #[test]
    fn test_set_tile() {
        let mut layer = TileLayer::filled(4, 3, FLOOR);
        layer.set_tile(0, 0, WALL);
        let map = TileMap::new(layer, TileSet::new(16.0, [FLOOR]).unwrap());
        assert!(!map.is_reachable(Vec2::new(1.0, 1.0)));
        assert!(map.is_reachable(Vec2::new(17.0, 1.0)));
    }
}
