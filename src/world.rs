//! The tile world: terrain kinds, tiles and the toroidal grid they live on.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Torus};

/// Width and height of one tile in pixels.
pub const TILE_SIZE: f64 = 32.0;

/// Highest elevation a tile carries; renderers shade against this.
pub const MAX_ELEVATION: i32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Grass,
    Forest,
    Mountain,
    Water,
    Desert,
    Ice,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Grass,
        Terrain::Forest,
        Terrain::Mountain,
        Terrain::Water,
        Terrain::Desert,
        Terrain::Ice,
    ];

    /// The one-character form used by map files.
    pub fn from_char(ch: char) -> Option<Terrain> {
        match ch {
            'g' => Some(Terrain::Grass),
            'f' => Some(Terrain::Forest),
            'm' => Some(Terrain::Mountain),
            'w' => Some(Terrain::Water),
            'd' => Some(Terrain::Desert),
            'i' => Some(Terrain::Ice),
            _ => None,
        }
    }

    pub fn char(self) -> char {
        match self {
            Terrain::Grass => 'g',
            Terrain::Forest => 'f',
            Terrain::Mountain => 'm',
            Terrain::Water => 'w',
            Terrain::Desert => 'd',
            Terrain::Ice => 'i',
        }
    }

    /// Sprite-sheet name a renderer would draw this terrain with.
    pub fn name(self) -> &'static str {
        match self {
            Terrain::Grass => "Grass",
            Terrain::Forest => "Forest",
            Terrain::Mountain => "Mountain",
            Terrain::Water => "Water",
            Terrain::Desert => "Desert",
            Terrain::Ice => "Ice",
        }
    }
}

/// One cell of the world. `depth` is meaningful for water tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub elevation: i32,
    pub depth: i32,
}

impl Tile {
    pub fn new(terrain: Terrain, elevation: i32, depth: i32) -> Self {
        Self {
            terrain,
            elevation,
            depth,
        }
    }
}

/// Per-terrain speed multipliers for one species. Every terrain kind has a
/// field, so lookup is total and scenario deserialization enforces
/// completeness at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affinity {
    pub grass: f64,
    pub forest: f64,
    pub mountain: f64,
    pub water: f64,
    pub desert: f64,
    pub ice: f64,
}

impl Affinity {
    /// The same multiplier on every terrain.
    pub fn uniform(scale: f64) -> Self {
        Self {
            grass: scale,
            forest: scale,
            mountain: scale,
            water: scale,
            desert: scale,
            ice: scale,
        }
    }

    pub fn get(&self, terrain: Terrain) -> f64 {
        match terrain {
            Terrain::Grass => self.grass,
            Terrain::Forest => self.forest,
            Terrain::Mountain => self.mountain,
            Terrain::Water => self.water,
            Terrain::Desert => self.desert,
            Terrain::Ice => self.ice,
        }
    }
}

/// Immutable-during-simulation grid of tiles, addressed modulo its
/// dimensions: any integer coordinate names exactly one tile.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    /// Callers must supply a non-empty grid with `width * height` tiles.
    pub fn new(width: u32, height: u32, tiles: Vec<Tile>) -> Self {
        assert!(width > 0 && height > 0, "world grid has zero extent");
        assert_eq!(
            tiles.len(),
            (width * height) as usize,
            "tile array does not match grid dimensions"
        );
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile at `(x, y)`, normalizing any integer input onto the torus.
    pub fn tile(&self, x: i64, y: i64) -> &Tile {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        &self.tiles[y * self.width as usize + x]
    }

    /// Tile coordinates under a pixel position. Floor division keeps
    /// negative pixels consistent with the wrap rule.
    pub fn tile_index(&self, p: Point) -> (i64, i64) {
        (
            (p.x / TILE_SIZE).floor() as i64,
            (p.y / TILE_SIZE).floor() as i64,
        )
    }

    pub fn tile_at_point(&self, p: Point) -> &Tile {
        let (x, y) = self.tile_index(p);
        self.tile(x, y)
    }

    /// The pixel-space wrap geometry of this grid.
    pub fn pixels(&self) -> Torus {
        Torus::new(
            self.width as f64 * TILE_SIZE,
            self.height as f64 * TILE_SIZE,
        )
    }

    /// Terrain as rows of map characters, for snapshots and viewers.
    pub fn terrain_rows(&self) -> Vec<String> {
        (0..self.height as i64)
            .map(|y| {
                (0..self.width as i64)
                    .map(|x| self.tile(x, y).terrain.char())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> WorldGrid {
        let tiles = (0..12)
            .map(|i| {
                let terrain = if i == 5 { Terrain::Water } else { Terrain::Grass };
                Tile::new(terrain, 0, 0)
            })
            .collect();
        WorldGrid::new(4, 3, tiles)
    }

    #[test]
    fn lookup_normalizes_any_coordinate() {
        let g = grid();
        // (1, 1) holds the single water tile; every wrapped alias agrees.
        assert_eq!(g.tile(1, 1).terrain, Terrain::Water);
        assert_eq!(g.tile(5, 4).terrain, Terrain::Water);
        assert_eq!(g.tile(-3, -2).terrain, Terrain::Water);
        assert_eq!(g.tile(-7, 7).terrain, Terrain::Water);
    }

    #[test]
    fn tile_index_floors_negative_pixels() {
        let g = grid();
        assert_eq!(g.tile_index(Point::new(33.0, 64.0)), (1, 2));
        assert_eq!(g.tile_index(Point::new(-0.5, -33.0)), (-1, -2));
    }

    #[test]
    fn pixel_extent_matches_dimensions() {
        let t = grid().pixels();
        assert_eq!(t.w, 128.0);
        assert_eq!(t.h, 96.0);
    }

    #[test]
    fn terrain_chars_round_trip() {
        for terrain in Terrain::ALL {
            assert_eq!(Terrain::from_char(terrain.char()), Some(terrain));
        }
        assert_eq!(Terrain::from_char('x'), None);
    }

    #[test]
    fn terrain_rows_reflect_the_grid() {
        let rows = grid().terrain_rows();
        assert_eq!(rows, vec!["gggg", "gwgg", "gggg"]);
    }

    #[test]
    fn uniform_affinity_covers_every_terrain() {
        let affinity = Affinity::uniform(0.5);
        for terrain in Terrain::ALL {
            assert_eq!(affinity.get(terrain), 0.5);
        }
    }
}
