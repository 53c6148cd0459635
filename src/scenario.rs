//! Scenario files: the terrain map, the player start and the herds, loaded
//! from YAML and validated before the simulation ever starts. The core
//! itself is total; everything that can be wrong is caught here.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::anim::SpriteSheet;
use crate::geom::Point;
use crate::herd::{Herd, SpeciesInfo};
use crate::rng::RngManager;
use crate::sim::{Player, SimState};
use crate::world::{Terrain, Tile, WorldGrid, TILE_SIZE};

fn default_snapshot_interval_ticks() -> u64 {
    30
}

fn default_player_sheet() -> String {
    "Astronaut".to_string()
}

fn default_player_frame_size() -> u32 {
    32
}

fn default_spread_tiles() -> f64 {
    2.0
}

fn default_spawn_speed() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    /// One string per tile row; one terrain character per tile.
    pub map: Vec<String>,
    pub player: PlayerStart,
    pub herds: Vec<HerdScenario>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStart {
    pub tile: [i64; 2],
    #[serde(default = "default_player_sheet")]
    pub sheet: String,
    #[serde(default = "default_player_frame_size")]
    pub frame_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HerdScenario {
    pub species: SpeciesInfo,
    pub spawn: SpawnBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpawnBlock {
    pub count: u32,
    pub center_tile: [i64; 2],
    #[serde(default = "default_spread_tiles")]
    pub spread_tiles: f64,
    #[serde(default = "default_spawn_speed")]
    pub speed: f64,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario map is empty")]
    EmptyMap,
    #[error("scenario map row {row} is {got} tiles wide, expected {expected}")]
    RaggedMap {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("unknown terrain character {ch:?} at row {row}, column {col}")]
    UnknownTerrain { ch: char, row: usize, col: usize },
    #[error("herd {species:?} spawns zero creatures")]
    EmptyHerd { species: String },
    #[error("sprite sheet for {species:?} has zero frame size")]
    ZeroFrameSize { species: String },
    #[error("{species:?} has a negative affinity for {terrain:?}")]
    NegativeAffinity { species: String, terrain: char },
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(data: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(data).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let width = self.map.first().map(String::len).unwrap_or(0);
        if width == 0 {
            return Err(ScenarioError::EmptyMap);
        }
        for (row, line) in self.map.iter().enumerate() {
            if line.len() != width {
                return Err(ScenarioError::RaggedMap {
                    row,
                    got: line.len(),
                    expected: width,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                if Terrain::from_char(ch).is_none() {
                    return Err(ScenarioError::UnknownTerrain { ch, row, col });
                }
            }
        }

        if self.player.frame_size == 0 {
            return Err(ScenarioError::ZeroFrameSize {
                species: "player".into(),
            });
        }
        for herd in &self.herds {
            let species = &herd.species.name;
            if herd.spawn.count == 0 {
                return Err(ScenarioError::EmptyHerd {
                    species: species.clone(),
                });
            }
            if herd.species.sheet.frame_size == 0 {
                return Err(ScenarioError::ZeroFrameSize {
                    species: species.clone(),
                });
            }
            for terrain in Terrain::ALL {
                if herd.species.affinity.get(terrain) < 0.0 {
                    return Err(ScenarioError::NegativeAffinity {
                        species: species.clone(),
                        terrain: terrain.char(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(120)
    }

    /// Parse the map rows into a grid. Assumes `validate` has passed.
    pub fn build_grid(&self) -> WorldGrid {
        let height = self.map.len() as u32;
        let width = self.map[0].len() as u32;
        let tiles = self
            .map
            .iter()
            .flat_map(|row| row.chars())
            .map(|ch| {
                let terrain = Terrain::from_char(ch).expect("map was validated");
                let elevation = match terrain {
                    Terrain::Mountain => 12,
                    Terrain::Ice => 4,
                    _ => 0,
                };
                let depth = match terrain {
                    Terrain::Water => 2,
                    _ => 0,
                };
                Tile::new(terrain, elevation, depth)
            })
            .collect();
        WorldGrid::new(width, height, tiles)
    }

    /// Materialize the world, player and herds. Initial spawns draw their
    /// positions, headings and think groups from the "spawn" stream, so the
    /// same seed always produces the same starting state.
    pub fn build_state(&self, rng: &mut RngManager) -> SimState {
        let grid = self.build_grid();
        let torus = grid.pixels();
        let player_pos = Point::new(
            self.player.tile[0] as f64 * TILE_SIZE,
            self.player.tile[1] as f64 * TILE_SIZE,
        );
        let player = Player::new(
            torus.wrap(player_pos),
            SpriteSheet::new(self.player.sheet.clone(), self.player.frame_size),
        );

        let mut stream = rng.stream("spawn");
        let herds = self
            .herds
            .iter()
            .map(|herd_scenario| {
                let mut herd = Herd::new(herd_scenario.species.clone());
                let spawn = &herd_scenario.spawn;
                let base = Point::new(
                    spawn.center_tile[0] as f64 * TILE_SIZE,
                    spawn.center_tile[1] as f64 * TILE_SIZE,
                );
                let spread = spawn.spread_tiles * TILE_SIZE;
                for _ in 0..spawn.count {
                    let offset = if spread > 0.0 {
                        Point::new(
                            stream.gen_range(-spread..spread),
                            stream.gen_range(-spread..spread),
                        )
                    } else {
                        Point::zero()
                    };
                    let heading = stream.gen_range(0.0..std::f64::consts::TAU);
                    let vel = Point::new(heading.cos(), heading.sin()) * spawn.speed;
                    herd.spawn(&mut stream, torus.wrap(base + offset), vel);
                }
                herd
            })
            .collect();

        SimState::new(grid, player, herds)
    }
}
