pub mod ai;
pub mod anim;
pub mod engine;
pub mod geom;
pub mod herd;
pub mod phys;
pub mod rng;
pub mod scenario;
pub mod sim;
pub mod snapshot;
pub mod systems;
pub mod web;
pub mod world;

pub use engine::{Engine, EngineBuilder, EngineSettings, System, SystemContext};
pub use scenario::{Scenario, ScenarioLoader};
pub use sim::SimState;
