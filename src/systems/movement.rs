use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    sim::SimState,
};

/// Advances every herd body and its animation after steering has settled
/// this tick's velocities.
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut SimState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        state.step_herds();
        Ok(())
    }
}
