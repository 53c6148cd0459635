//! Herds: ordered, growable populations of creatures that share one species
//! profile. The profile is read-only and referenced, never copied per boid.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{self, Boid, BoidInfo, BoidView, N_THINK_GROUPS};
use crate::anim::{Anim, SpriteSheet};
use crate::geom::{Point, Rect};
use crate::phys::{Body, Sampling};
use crate::world::{Affinity, WorldGrid};

/// Everything one species shares: sprite sheet, steering parameters, how its
/// bodies read terrain, and which terrains slow or stop it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub name: String,
    pub sheet: SpriteSheet,
    pub boid: BoidInfo,
    pub affinity: Affinity,
    #[serde(default)]
    pub sampling: Sampling,
    /// Widen neighbor search to every herd instead of this one only.
    #[serde(default)]
    pub flock_with_other_herds: bool,
}

/// One member of a herd: the flocking agent plus its animation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub boid: Boid,
    pub anim: Anim,
}

/// An ordered population of creatures. Grows by `spawn`, never shrinks.
#[derive(Debug, Clone)]
pub struct Herd {
    info: SpeciesInfo,
    members: Vec<Creature>,
}

impl Herd {
    pub fn new(info: SpeciesInfo) -> Self {
        Self {
            info,
            members: Vec::new(),
        }
    }

    pub fn info(&self) -> &SpeciesInfo {
        &self.info
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.members
    }

    pub fn boid(&self, n: usize) -> &Boid {
        &self.members[n].boid
    }

    pub fn boid_mut(&mut self, n: usize) -> &mut Boid {
        &mut self.members[n].boid
    }

    /// Sprite frame a renderer would draw for member `n`, paired with the
    /// body's min corner by the caller.
    pub fn frame_bounds(&self, n: usize) -> Rect {
        let creature = &self.members[n];
        self.info
            .sheet
            .frame_bounds(creature.anim.facing, creature.anim.frame)
    }

    /// Append one creature at `pos` with velocity `vel` and a think group
    /// dealt uniformly from `rng`. Existing members are untouched.
    pub fn spawn(&mut self, rng: &mut impl Rng, pos: Point, vel: Point) {
        let size = f64::from(self.info.sheet.frame_size);
        let body = Body::new(
            Rect::new(pos.x, pos.y, pos.x + size, pos.y + size),
            vel,
        );
        let think_group = rng.gen_range(0..N_THINK_GROUPS);
        self.members.push(Creature {
            boid: Boid::new(body, think_group),
            anim: Anim::default(),
        });
    }

    /// Advance every member's animation and body by one tick. Animation
    /// reads the raw velocity, before terrain scaling.
    pub fn step_bodies(&mut self, world: &WorldGrid) {
        for creature in &mut self.members {
            creature.anim.step(&self.info.sheet, creature.boid.body.vel);
            creature
                .boid
                .body
                .step(world, &self.info.affinity, self.info.sampling);
        }
    }

    fn views(&self) -> Vec<BoidView> {
        self.members
            .iter()
            .map(|c| BoidView {
                pos: c.boid.body.center(),
                vel: c.boid.body.vel,
            })
            .collect()
    }
}

/// The steering pass over every population. Only boids whose think group is
/// due on `tick` recompute; everyone else coasts. All reads go through a
/// pre-pass view captured before any velocity is written, so the order of
/// herds and members cannot influence the result. Returns how many boids
/// recomputed.
pub fn update_herds(tick: u64, herds: &mut [Herd], threat: &Body, world: &WorldGrid) -> usize {
    let torus = world.pixels();
    let threat_center = threat.center();
    let views: Vec<Vec<BoidView>> = herds.iter().map(Herd::views).collect();
    let mut steered = 0;
    for (hi, herd) in herds.iter_mut().enumerate() {
        for i in 0..herd.members.len() {
            if !herd.members[i].boid.due(tick) {
                continue;
            }
            let own = views[hi][i];
            let vel = if herd.info.flock_with_other_herds {
                let neighbors = views
                    .iter()
                    .enumerate()
                    .flat_map(|(hj, herd_views)| {
                        herd_views
                            .iter()
                            .enumerate()
                            .filter(move |(j, _)| hj != hi || *j != i)
                            .map(|(_, v)| *v)
                    });
                ai::steer(own, neighbors, threat_center, torus, &herd.info.boid)
            } else {
                let neighbors = views[hi]
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, v)| *v);
                ai::steer(own, neighbors, threat_center, torus, &herd.info.boid)
            };
            herd.members[i].boid.body.vel = vel;
            steered += 1;
        }
    }
    steered
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::world::{Terrain, Tile};

    fn open_world() -> WorldGrid {
        let tiles = (0..64).map(|_| Tile::new(Terrain::Grass, 0, 0)).collect();
        WorldGrid::new(8, 8, tiles)
    }

    fn species() -> SpeciesInfo {
        SpeciesInfo {
            name: "cow".into(),
            sheet: SpriteSheet::new("Cow", 16),
            boid: BoidInfo {
                vision_radius: 80.0,
                separation_radius: 12.0,
                max_speed: 2.0,
                flee_radius: 40.0,
                flee_speed: 4.0,
                separation_weight: 1.0,
                alignment_weight: 0.125,
                cohesion_weight: 0.02,
            },
            affinity: Affinity::uniform(1.0),
            sampling: Sampling::Source,
            flock_with_other_herds: false,
        }
    }

    fn parked_threat(x: f64, y: f64) -> Body {
        Body::new(Rect::new(x, y, x + 16.0, y + 16.0), Point::zero())
    }

    #[test]
    fn spawn_appends_without_mutating_existing_members() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut herd = Herd::new(species());
        for i in 0..5 {
            herd.spawn(
                &mut rng,
                Point::new(i as f64 * 20.0, 40.0),
                Point::new(1.0, 0.0),
            );
        }
        let before: Vec<Creature> = herd.creatures().to_vec();
        herd.spawn(&mut rng, Point::new(120.0, 120.0), Point::new(0.0, 1.0));
        assert_eq!(herd.len(), 6);
        assert_eq!(&herd.creatures()[..5], &before[..]);
    }

    #[test]
    fn spawn_deals_think_groups_in_range_and_reproducibly() {
        let mut a = Herd::new(species());
        let mut b = Herd::new(species());
        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        for i in 0..32 {
            let pos = Point::new(i as f64, 0.0);
            a.spawn(&mut rng_a, pos, Point::zero());
            b.spawn(&mut rng_b, pos, Point::zero());
        }
        for i in 0..32 {
            assert!(a.boid(i).think_group < N_THINK_GROUPS);
            assert_eq!(a.boid(i).think_group, b.boid(i).think_group);
        }
    }

    #[test]
    fn only_due_groups_recompute_and_others_coast() {
        let world = open_world();
        let threat = parked_threat(32.0, 32.0);
        let mut herd = Herd::new(species());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Two boids inside the threat's flee radius, far from each other's
        // separation range so the recomputed velocity is the flee vector.
        herd.spawn(&mut rng, Point::new(48.0, 32.0), Point::new(0.5, 0.5));
        herd.spawn(&mut rng, Point::new(32.0, 48.0), Point::new(0.5, 0.5));
        herd.boid_mut(0).think_group = 0;
        herd.boid_mut(1).think_group = 1;

        let mut herds = vec![herd];
        let steered = update_herds(0, &mut herds, &threat, &world);
        assert_eq!(steered, 1);
        let recomputed = herds[0].boid(0).body.vel;
        assert_ne!(recomputed, Point::new(0.5, 0.5), "due boid re-steered");
        assert_eq!(
            herds[0].boid(1).body.vel,
            Point::new(0.5, 0.5),
            "off-duty boid coasts on its cached velocity"
        );

        let steered = update_herds(1, &mut herds, &threat, &world);
        assert_eq!(steered, 1);
        assert_ne!(herds[0].boid(1).body.vel, Point::new(0.5, 0.5));
    }

    #[test]
    fn fleeing_points_away_from_the_threat() {
        let world = open_world();
        let threat = parked_threat(32.0, 32.0);
        let mut herd = Herd::new(species());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        herd.spawn(&mut rng, Point::new(56.0, 32.0), Point::zero());
        herd.spawn(&mut rng, Point::new(72.0, 32.0), Point::zero());
        herd.boid_mut(0).think_group = 0;
        herd.boid_mut(1).think_group = 3;

        let mut herds = vec![herd];
        update_herds(0, &mut herds, &threat, &world);
        let vel = herds[0].boid(0).body.vel;
        // Threat center (40, 40), boid center (64, 40): straight +x escape
        // despite the neighbor sitting further along the same line.
        assert!((vel.y).abs() < 1e-9);
        assert!((vel.x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn herds_ignore_each_other_unless_configured() {
        let world = open_world();
        let threat = parked_threat(200.0, 200.0);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let mut cows = Herd::new(species());
        cows.spawn(&mut rng, Point::new(32.0, 32.0), Point::new(1.0, 0.0));
        cows.boid_mut(0).think_group = 0;

        let mut gulls = Herd::new(SpeciesInfo {
            name: "gull".into(),
            ..species()
        });
        gulls.spawn(&mut rng, Point::new(48.0, 32.0), Point::new(-1.0, 2.0));
        gulls.boid_mut(0).think_group = 0;

        let mut herds = vec![cows.clone(), gulls.clone()];
        update_herds(0, &mut herds, &threat, &world);
        assert_eq!(
            herds[0].boid(0).body.vel,
            Point::new(1.0, 0.0),
            "a lone cow sees no flockmates"
        );

        let mut cows_social = cows;
        cows_social.info.flock_with_other_herds = true;
        let mut herds = vec![cows_social, gulls];
        update_herds(0, &mut herds, &threat, &world);
        assert_ne!(
            herds[0].boid(0).body.vel,
            Point::new(1.0, 0.0),
            "cross-herd flocking pulls in the gull"
        );
    }

    #[test]
    fn step_bodies_moves_members_and_advances_animation() {
        let world = open_world();
        let mut herd = Herd::new(species());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        herd.spawn(&mut rng, Point::new(10.0, 10.0), Point::new(2.0, 0.0));
        for _ in 0..8 {
            herd.step_bodies(&world);
        }
        assert_eq!(herd.boid(0).body.bounds.min, Point::new(26.0, 10.0));
        assert_eq!(herd.creatures()[0].anim.facing, crate::anim::Facing::Right);
        assert_eq!(herd.creatures()[0].anim.frame, 1);
    }
}
