//! Velocity-derived facing and frame state, kept in sync with a body so a
//! renderer can pick sprite frames without owning any simulation state.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};

/// Discrete facing, one sprite-sheet row each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

impl Facing {
    /// Row index within a sprite sheet.
    pub fn row(self) -> u32 {
        match self {
            Facing::Down => 0,
            Facing::Up => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        }
    }

    /// Dominant-axis facing for a velocity. Ties go to the vertical axis;
    /// callers never pass the zero vector.
    fn from_vel(vel: Point) -> Facing {
        if vel.x.abs() > vel.y.abs() {
            if vel.x > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            }
        } else if vel.y > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        }
    }
}

/// Layout of a sprite sheet: square frames, one row per facing. The core
/// never loads image data; renderers resolve `name` themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub name: String,
    pub frame_size: u32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_frame_delay")]
    pub frame_delay: u32,
}

fn default_frames() -> u32 {
    2
}

fn default_frame_delay() -> u32 {
    8
}

impl SpriteSheet {
    pub fn new(name: impl Into<String>, frame_size: u32) -> Self {
        Self {
            name: name.into(),
            frame_size,
            frames: default_frames(),
            frame_delay: default_frame_delay(),
        }
    }

    /// Pixel bounds of one frame within the sheet.
    pub fn frame_bounds(&self, facing: Facing, frame: u32) -> Rect {
        let size = self.frame_size as f64;
        let x = (frame % self.frames) as f64 * size;
        let y = facing.row() as f64 * size;
        Rect::new(x, y, x + size, y + size)
    }
}

/// Animation state derived from a body's velocity each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Anim {
    pub facing: Facing,
    pub frame: u32,
    ticks: u32,
}

impl Anim {
    /// Fold one tick of movement into the state: a moving body turns toward
    /// its dominant velocity axis and walks the frame cycle on the sheet's
    /// cadence; an idle body drops back to the idle frame.
    pub fn step(&mut self, sheet: &SpriteSheet, vel: Point) {
        if vel.is_zero() {
            self.frame = 0;
            self.ticks = 0;
            return;
        }
        self.facing = Facing::from_vel(vel);
        self.ticks += 1;
        if self.ticks >= sheet.frame_delay {
            self.ticks = 0;
            self.frame = (self.frame + 1) % sheet.frames;
        }
    }
}
