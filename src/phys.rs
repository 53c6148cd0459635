//! Physical bodies: axis-aligned boxes advanced by velocity on the torus,
//! scaled by the affinity of the terrain under them.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};
use crate::world::{Affinity, WorldGrid};

/// Which tile the affinity multiplier is read from when a body moves.
///
/// `Source` reads the terrain under the body's current center, so a zero
/// multiplier pins a body that is already on the terrain. `Destination`
/// probes the per-axis candidate position instead, so a zero multiplier
/// keeps bodies from entering the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sampling {
    #[default]
    Source,
    Destination,
}

/// A movable box with a velocity in pixels per tick. The box size is fixed
/// for the body's lifetime; only the min corner moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub bounds: Rect,
    pub vel: Point,
}

impl Body {
    pub fn new(bounds: Rect, vel: Point) -> Self {
        Self { bounds, vel }
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Advance one tick: scale the velocity per axis by the affinity of the
    /// sampled terrain, then wrap the min corner into world bounds. Affinity
    /// zero yields zero displacement on that axis; nothing is ever rejected.
    pub fn step(&mut self, world: &WorldGrid, affinity: &Affinity, sampling: Sampling) {
        let torus = world.pixels();
        let center = self.center();
        let scale_at = |p: Point| affinity.get(world.tile_at_point(torus.wrap(p)).terrain);
        let (sx, sy) = match sampling {
            Sampling::Source => {
                let s = scale_at(center);
                (s, s)
            }
            Sampling::Destination => (
                scale_at(Point::new(center.x + self.vel.x, center.y)),
                scale_at(Point::new(center.x, center.y + self.vel.y)),
            ),
        };
        let displaced = self.bounds.min + Point::new(self.vel.x * sx, self.vel.y * sy);
        self.bounds = Rect::with_size(torus.wrap(displaced), self.bounds.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Terrain, Tile};

    /// 10x10 tile world (320x320 px): water column at tile x == 2,
    /// grass everywhere else.
    fn world_with_water_column() -> WorldGrid {
        let tiles = (0..100)
            .map(|i| {
                let terrain = if i % 10 == 2 { Terrain::Water } else { Terrain::Grass };
                Tile::new(terrain, 0, 0)
            })
            .collect();
        WorldGrid::new(10, 10, tiles)
    }

    fn grazer() -> Affinity {
        Affinity {
            grass: 1.0,
            forest: 1.0,
            mountain: 1.0,
            water: 0.0,
            desert: 1.0,
            ice: 1.0,
        }
    }

    #[test]
    fn step_wraps_past_the_world_edge() {
        let world = world_with_water_column();
        let mut body = Body::new(
            Rect::new(315.0, 160.0, 325.0, 170.0),
            Point::new(10.0, 0.0),
        );
        body.step(&world, &Affinity::uniform(1.0), Sampling::Source);
        assert_eq!(body.bounds.min, Point::new(5.0, 160.0));
        assert_eq!(body.bounds.dx(), 10.0);
    }

    #[test]
    fn zero_affinity_pins_a_body_on_the_terrain() {
        let world = world_with_water_column();
        // Center lands inside the water column (tile x = 2).
        let mut body = Body::new(Rect::new(70.0, 96.0, 80.0, 106.0), Point::new(6.0, 3.0));
        let before = body.bounds;
        body.step(&world, &grazer(), Sampling::Source);
        assert_eq!(body.bounds, before);
    }

    #[test]
    fn source_sampling_lets_a_body_walk_off_zero_affinity_terrain() {
        let world = world_with_water_column();
        // On grass, headed into the water column: source sampling moves it.
        let mut body = Body::new(Rect::new(56.0, 96.0, 66.0, 106.0), Point::new(8.0, 0.0));
        body.step(&world, &grazer(), Sampling::Source);
        assert_eq!(body.bounds.min.x, 64.0);
    }

    #[test]
    fn destination_sampling_blocks_entry_per_axis() {
        let world = world_with_water_column();
        // On grass, center at (61, 101); x probe lands in water, y probe on grass.
        let mut body = Body::new(Rect::new(56.0, 96.0, 66.0, 106.0), Point::new(8.0, 8.0));
        body.step(&world, &grazer(), Sampling::Destination);
        assert_eq!(body.bounds.min.x, 56.0);
        assert_eq!(body.bounds.min.y, 104.0);
    }

    #[test]
    fn velocity_is_untouched_by_step() {
        let world = world_with_water_column();
        let mut body = Body::new(Rect::new(0.0, 0.0, 10.0, 10.0), Point::new(2.0, -1.0));
        body.step(&world, &Affinity::uniform(1.0), Sampling::Source);
        assert_eq!(body.vel, Point::new(2.0, -1.0));
    }
}
