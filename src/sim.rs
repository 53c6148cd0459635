//! Mutable simulation state: the grid, the player body that herds treat as
//! the threat, and every herd. Advanced one tick at a time by the engine.

use serde::{Deserialize, Serialize};

use crate::anim::{Anim, SpriteSheet};
use crate::geom::{Point, Rect};
use crate::herd::{self, Herd};
use crate::phys::{Body, Sampling};
use crate::snapshot::{BoidSnapshot, HerdSnapshot, PlayerSnapshot, WorldSnapshot};
use crate::world::{Affinity, WorldGrid};

/// The externally-driven body every herd steers away from. Input handling
/// lives outside the core; drivers set `body.vel` before each tick.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub anim: Anim,
    pub sheet: SpriteSheet,
    pub affinity: Affinity,
    pub sampling: Sampling,
}

impl Player {
    pub fn new(pos: Point, sheet: SpriteSheet) -> Self {
        let size = f64::from(sheet.frame_size);
        Self {
            body: Body::new(
                Rect::new(pos.x, pos.y, pos.x + size, pos.y + size),
                Point::zero(),
            ),
            anim: Anim::default(),
            sheet,
            affinity: Affinity::uniform(1.0),
            sampling: Sampling::Source,
        }
    }
}

/// Per-species tallies refreshed at the end of each tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCount {
    pub species: String,
    pub creatures: usize,
    pub moving: usize,
    pub fleeing: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Bookkeeping {
    pub counts: Vec<SpeciesCount>,
    pub steered_last_tick: usize,
}

pub struct SimState {
    grid: WorldGrid,
    pub player: Player,
    herds: Vec<Herd>,
    tick: u64,
    pub bookkeeping: Bookkeeping,
}

impl SimState {
    pub fn new(grid: WorldGrid, player: Player, herds: Vec<Herd>) -> Self {
        Self {
            grid,
            player,
            herds,
            tick: 0,
            bookkeeping: Bookkeeping::default(),
        }
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_time(&mut self) {
        self.tick += 1;
    }

    pub fn herds(&self) -> &[Herd] {
        &self.herds
    }

    pub fn herd(&self, n: usize) -> &Herd {
        &self.herds[n]
    }

    pub fn herd_mut(&mut self, n: usize) -> &mut Herd {
        &mut self.herds[n]
    }

    pub fn total_creatures(&self) -> usize {
        self.herds.iter().map(Herd::len).sum()
    }

    /// Resolve the threat's movement for this tick. Runs before steering so
    /// flee reactions see the player's current-tick position.
    pub fn step_player(&mut self) {
        self.player.anim.step(&self.player.sheet, self.player.body.vel);
        self.player
            .body
            .step(&self.grid, &self.player.affinity, self.player.sampling);
    }

    /// Steering pass over every herd; returns how many boids recomputed.
    pub fn update_flocks(&mut self, tick: u64) -> usize {
        herd::update_herds(tick, &mut self.herds, &self.player.body, &self.grid)
    }

    /// Advance every herd body and animation.
    pub fn step_herds(&mut self) {
        for herd in &mut self.herds {
            herd.step_bodies(&self.grid);
        }
    }

    /// Recompute the per-species tallies.
    pub fn refresh_counts(&mut self) {
        let torus = self.grid.pixels();
        let threat = self.player.body.center();
        self.bookkeeping.counts = self
            .herds
            .iter()
            .map(|herd| {
                let flee_radius = herd.info().boid.flee_radius;
                let mut moving = 0;
                let mut fleeing = 0;
                for creature in herd.creatures() {
                    if !creature.boid.body.vel.is_zero() {
                        moving += 1;
                    }
                    if torus.dist(creature.boid.body.center(), threat) < flee_radius {
                        fleeing += 1;
                    }
                }
                SpeciesCount {
                    species: herd.info().name.clone(),
                    creatures: herd.len(),
                    moving,
                    fleeing,
                }
            })
            .collect();
    }

    /// Everything an external renderer or observer reads, by value.
    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        let herds = self
            .herds
            .iter()
            .map(|herd| HerdSnapshot {
                species: herd.info().name.clone(),
                sheet: herd.info().sheet.name.clone(),
                frame_size: herd.info().sheet.frame_size,
                boids: herd
                    .creatures()
                    .iter()
                    .map(|creature| BoidSnapshot {
                        x: creature.boid.body.bounds.min.x,
                        y: creature.boid.body.bounds.min.y,
                        vx: creature.boid.body.vel.x,
                        vy: creature.boid.body.vel.y,
                        facing: creature.anim.facing,
                        frame: creature.anim.frame,
                        think_group: creature.boid.think_group,
                    })
                    .collect(),
            })
            .collect();
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            width_tiles: self.grid.width(),
            height_tiles: self.grid.height(),
            terrain_rows: self.grid.terrain_rows(),
            player: PlayerSnapshot {
                x: self.player.body.bounds.min.x,
                y: self.player.body.bounds.min.y,
                vx: self.player.body.vel.x,
                vy: self.player.body.vel.y,
                facing: self.player.anim.facing,
                frame: self.player.anim.frame,
            },
            herds,
            counts: self.bookkeeping.counts.clone(),
            steered_last_tick: self.bookkeeping.steered_last_tick,
        }
    }
}
