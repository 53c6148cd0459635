use std::fs;

use fauna::{
    engine::{EngineBuilder, EngineSettings},
    rng::RngManager,
    scenario::ScenarioLoader,
    snapshot::SnapshotEnvelope,
    systems::{BookkeepingSystem, FlockingSystem, MovementSystem, PlayerSystem},
};
use tempfile::tempdir;

#[test]
fn snapshots_land_on_the_interval() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader
        .load("scenarios/crater_plain.yaml")
        .expect("scenario should load");
    let mut state = scenario.build_state(&mut RngManager::new(scenario.seed));
    let temp = tempdir().expect("tempdir");
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: 2,
        snapshot_dir: temp.path().to_path_buf(),
    };
    let mut engine = EngineBuilder::new(settings)
        .with_system(PlayerSystem::new())
        .with_system(FlockingSystem::new())
        .with_system(MovementSystem::new())
        .with_system(BookkeepingSystem::new())
        .build();

    engine.run(&mut state, 6).expect("run succeeds");

    let dir = temp.path().join(&scenario.name);
    let mut names: Vec<String> = fs::read_dir(&dir)
        .expect("snapshot dir exists")
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["tick_000002.json", "tick_000004.json", "tick_000006.json"]
    );

    let data = fs::read_to_string(dir.join("tick_000004.json")).expect("file readable");
    let envelope: SnapshotEnvelope = serde_json::from_str(&data).expect("valid envelope");
    assert_eq!(envelope.snapshot.tick, 4);
    assert_eq!(envelope.snapshot.scenario, scenario.name);
    assert_eq!(
        envelope.snapshot.herds.iter().map(|h| h.boids.len()).sum::<usize>(),
        state.total_creatures()
    );
}
