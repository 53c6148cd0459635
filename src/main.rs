use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use fauna::{
    engine::{EngineBuilder, EngineSettings},
    rng::RngManager,
    scenario::ScenarioLoader,
    systems::{BookkeepingSystem, FlockingSystem, MovementSystem, PlayerSystem},
    web,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "fauna herd simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/crater_plain.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Serve the live viewer instead of running headless
    #[arg(long)]
    serve: bool,

    /// Viewer bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Viewer bind port
    #[arg(long, default_value_t = 8930)]
    port: u16,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    if cli.serve {
        let config = web::WebServerConfig {
            scenario,
            ticks,
            snapshot_interval,
            snapshot_dir,
            host: cli.host,
            port: cli.port,
        };
        return tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(web::run(config));
    }

    let mut rng = RngManager::new(scenario.seed);
    let mut state = scenario.build_state(&mut rng);
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };
    let mut engine = EngineBuilder::new(settings)
        .with_system(PlayerSystem::new())
        .with_system(FlockingSystem::new())
        .with_system(MovementSystem::new())
        .with_system(BookkeepingSystem::new())
        .build();

    engine.run(&mut state, ticks)?;
    println!(
        "Scenario '{}' completed after {} ticks. Creatures: {}",
        scenario.name,
        ticks,
        state.total_creatures()
    );
    Ok(())
}
