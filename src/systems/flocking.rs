use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    sim::SimState,
};

/// The staggered steering pass: boids whose think group is due this tick
/// recompute their velocity, everyone else coasts.
pub struct FlockingSystem;

impl FlockingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FlockingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FlockingSystem {
    fn name(&self) -> &str {
        "flocking"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut SimState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        state.bookkeeping.steered_last_tick = state.update_flocks(ctx.tick);
        Ok(())
    }
}
