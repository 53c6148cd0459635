//! The tick engine: runs every system in a fixed order, once per tick,
//! against the simulation state.

use std::path::PathBuf;

use anyhow::Result;

use crate::rng::{RngManager, SystemRng};
use crate::sim::SimState;
use crate::snapshot::{SnapshotWriter, WorldSnapshot};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn run(&mut self, state: &mut SimState, ticks: u64) -> Result<()> {
        self.run_with_hook(state, ticks, |_| {})
    }

    /// Advance `ticks` ticks, invoking `hook` with the fresh snapshot after
    /// each one. Systems see the pre-advance tick counter, so think-group
    /// schedules start at tick zero.
    pub fn run_with_hook(
        &mut self,
        state: &mut SimState,
        ticks: u64,
        mut hook: impl FnMut(WorldSnapshot),
    ) -> Result<()> {
        for _ in 0..ticks {
            let current_tick = state.tick();
            for system in &mut self.systems {
                let mut rng_stream = self.rng.stream(system.name());
                let ctx = SystemContext {
                    tick: current_tick,
                    scenario_name: &self.settings.scenario_name,
                };
                system.run(&ctx, state, &mut rng_stream)?;
            }
            state.advance_time();
            let snapshot = state.snapshot(&self.settings.scenario_name);
            self.snapshot_writer.maybe_write(&snapshot)?;
            hook(snapshot);
        }
        Ok(())
    }
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub scenario_name: &'a str,
}

pub trait System: Send {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut SimState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
