use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    sim::SimState,
};

/// Resolves the threat body's movement. Runs first each tick so herds flee
/// the player's current-tick position, not last tick's.
pub struct PlayerSystem;

impl PlayerSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlayerSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PlayerSystem {
    fn name(&self) -> &str {
        "player"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut SimState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        state.step_player();
        Ok(())
    }
}
