use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    sim::SimState,
};

/// Refreshes the per-species tallies observers read from snapshots.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut SimState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        state.refresh_counts();
        Ok(())
    }
}
