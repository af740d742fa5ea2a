//! Run-end record for persistence and replay.
//!
//! Collects the start parameters, the per-tick consciousness trajectory,
//! and the full emergence log through the grid's read accessors, then
//! writes one pretty-JSON document via tmp-file + atomic rename.

use crate::emergence::EmergenceEvent;
use crate::error::Result;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConsciousnessSample {
    pub timestep: u64,
    pub global_consciousness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub started_at: String,
    pub width: usize,
    pub height: usize,
    pub steps: u64,
    pub seed: u64,
    pub consciousness_history: Vec<ConsciousnessSample>,
    pub emergence_events: Vec<EmergenceEvent>,
}

impl RunLog {
    pub fn new(width: usize, height: usize, steps: u64, seed: u64) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            width,
            height,
            steps,
            seed,
            consciousness_history: Vec::new(),
            emergence_events: Vec::new(),
        }
    }

    /// Sample the current global consciousness.
    pub fn record_sample(&mut self, grid: &Grid) {
        self.consciousness_history.push(ConsciousnessSample {
            timestep: grid.timestep(),
            global_consciousness: grid.global_consciousness(),
        });
    }

    /// Copy the grid's full event log into the record.
    pub fn finish(&mut self, grid: &Grid) {
        self.emergence_events = grid.events().to_vec();
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
