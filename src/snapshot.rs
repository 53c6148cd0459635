//! Snapshots: the read-only view of one tick handed to observers, and the
//! interval writer that checkpoints it to disk as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anim::Facing;
use crate::sim::SpeciesCount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoidSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub facing: Facing,
    pub frame: u32,
    pub think_group: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerdSnapshot {
    pub species: String,
    pub sheet: String,
    pub frame_size: u32,
    pub boids: Vec<BoidSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub facing: Facing,
    pub frame: u32,
}

/// One tick's full observable state. Contains no wall-clock data, so two
/// same-seed runs serialize identically tick for tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub width_tiles: u32,
    pub height_tiles: u32,
    pub terrain_rows: Vec<String>,
    pub player: PlayerSnapshot,
    pub herds: Vec<HerdSnapshot>,
    pub counts: Vec<SpeciesCount>,
    pub steered_last_tick: usize,
}

/// What actually lands on disk: the snapshot plus when it was captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub captured_at: DateTime<Utc>,
    pub snapshot: WorldSnapshot,
}

/// Writes a snapshot every `interval_ticks` ticks under
/// `dir/<scenario>/tick_NNNNNN.json`. Interval zero disables writing.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn due(&self, tick: u64) -> bool {
        self.interval_ticks != 0 && tick % self.interval_ticks == 0
    }

    pub fn maybe_write(&self, snapshot: &WorldSnapshot) -> Result<Option<PathBuf>> {
        if !self.due(snapshot.tick) {
            return Ok(None);
        }
        let dir = self.dir.join(&snapshot.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", snapshot.tick));
        let envelope = SnapshotEnvelope {
            captured_at: Utc::now(),
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tick: u64) -> WorldSnapshot {
        WorldSnapshot {
            scenario: "unit".into(),
            tick,
            width_tiles: 2,
            height_tiles: 1,
            terrain_rows: vec!["gg".into()],
            player: PlayerSnapshot {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
                facing: Facing::Down,
                frame: 0,
            },
            herds: Vec::new(),
            counts: Vec::new(),
            steered_last_tick: 0,
        }
    }

    #[test]
    fn interval_gates_writes() {
        let writer = SnapshotWriter::new("unused", 5);
        assert!(writer.due(5));
        assert!(writer.due(10));
        assert!(!writer.due(7));
        let disabled = SnapshotWriter::new("unused", 0);
        assert!(!disabled.due(5));
    }

    #[test]
    fn written_snapshot_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let writer = SnapshotWriter::new(temp.path(), 2);
        let path = writer
            .maybe_write(&snapshot(4))
            .expect("write succeeds")
            .expect("tick 4 is due");
        let data = fs::read_to_string(path).expect("file readable");
        let envelope: SnapshotEnvelope = serde_json::from_str(&data).expect("valid json");
        assert_eq!(envelope.snapshot, snapshot(4));
    }

    #[test]
    fn off_interval_ticks_write_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let writer = SnapshotWriter::new(temp.path(), 2);
        assert!(writer.maybe_write(&snapshot(3)).expect("ok").is_none());
    }
}
