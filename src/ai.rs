//! Flocking steering. Each boid belongs to one of a small fixed number of
//! think groups and only recomputes its steering on ticks where its group is
//! due, so the per-tick neighbor-scan cost stays bounded as herds grow.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Torus};
use crate::phys::Body;

/// Number of think groups steering work is staggered across. With P boids,
/// roughly P / N_THINK_GROUPS of them recompute per tick; the rest coast on
/// their cached velocity, at most N_THINK_GROUPS - 1 ticks stale.
pub const N_THINK_GROUPS: u32 = 4;

/// A flocking agent: a physical body plus the think group it was dealt at
/// spawn. The group never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub body: Body,
    pub think_group: u32,
}

impl Boid {
    pub fn new(body: Body, think_group: u32) -> Self {
        Self { body, think_group }
    }

    /// Whether this boid recomputes steering on the given tick.
    pub fn due(&self, tick: u64) -> bool {
        tick % u64::from(N_THINK_GROUPS) == u64::from(self.think_group)
    }
}

/// Steering parameters shared by every boid of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoidInfo {
    /// Neighbors inside this radius take part in the flock blend.
    pub vision_radius: f64,
    /// Neighbors closer than this push the boid away.
    pub separation_radius: f64,
    /// Cruising speed cap in pixels per tick.
    pub max_speed: f64,
    /// A threat inside this radius overrides the blend entirely.
    pub flee_radius: f64,
    /// Speed while fleeing, usually above `max_speed`.
    pub flee_speed: f64,
    #[serde(default = "default_separation_weight")]
    pub separation_weight: f64,
    #[serde(default = "default_alignment_weight")]
    pub alignment_weight: f64,
    #[serde(default = "default_cohesion_weight")]
    pub cohesion_weight: f64,
}

fn default_separation_weight() -> f64 {
    1.0
}

fn default_alignment_weight() -> f64 {
    0.125
}

fn default_cohesion_weight() -> f64 {
    0.02
}

/// Position and velocity of one boid as seen by the steering pass. The pass
/// reads a consistent pre-tick view, never partially updated state.
#[derive(Debug, Clone, Copy)]
pub struct BoidView {
    pub pos: Point,
    pub vel: Point,
}

/// Compute the steering velocity for one due boid.
///
/// A threat inside `flee_radius` wins outright: the result is the unit
/// away-vector at `flee_speed`. Otherwise separation, alignment and cohesion
/// over neighbors within `vision_radius` are weighted into the current
/// velocity and clamped to `max_speed`. With no neighbors in sight the
/// current velocity is kept, clamped. All distances are torus distances.
pub fn steer(
    own: BoidView,
    neighbors: impl Iterator<Item = BoidView>,
    threat: Point,
    torus: Torus,
    info: &BoidInfo,
) -> Point {
    let away = torus.delta(threat, own.pos);
    if away.len() < info.flee_radius {
        if away.is_zero() {
            // Exactly on the threat: no direction is derivable this tick.
            return own.vel;
        }
        return away.normalized() * info.flee_speed;
    }

    let mut push = Point::zero();
    let mut vel_sum = Point::zero();
    let mut offset_sum = Point::zero();
    let mut seen = 0_u32;
    for other in neighbors {
        let offset = torus.delta(own.pos, other.pos);
        let dist = offset.len();
        if dist >= info.vision_radius {
            continue;
        }
        seen += 1;
        vel_sum = vel_sum + other.vel;
        offset_sum = offset_sum + offset;
        if dist < info.separation_radius && dist > 0.0 {
            push = push + offset.normalized() * -1.0;
        }
    }
    if seen == 0 {
        return own.vel.clamped(info.max_speed);
    }

    let n = f64::from(seen);
    let alignment = vel_sum * (1.0 / n) - own.vel;
    let cohesion = offset_sum * (1.0 / n);
    let blended = own.vel
        + push * info.separation_weight
        + alignment * info.alignment_weight
        + cohesion * info.cohesion_weight;
    blended.clamped(info.max_speed)
}
