//! Simulation configuration
//!
//! All tunable parameters in one place. Loaded from TOML at startup,
//! falls back to defaults if no config file exists. The per-cell update
//! rule itself is hand-tuned and not configurable; what lives here are
//! the knobs that shape a run (wiring probabilities, stimulus cadence,
//! detector thresholds).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Connection graph construction.
    pub topology: TopologyConfig,
    /// Random external stimulus injection.
    pub stimulus: StimulusConfig,
    /// Emergence event detection thresholds and dedup windows.
    pub detector: DetectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Edge probability toward orthogonal Moore neighbors.
    pub orthogonal_prob: f64,
    /// Edge probability toward diagonal Moore neighbors.
    pub diagonal_prob: f64,
    /// Per-cell probability of one long-range shortcut edge.
    pub long_range_prob: f64,
    /// Weight range for long-range edges.
    pub long_range_weight_min: f64,
    pub long_range_weight_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StimulusConfig {
    /// Per-tick probability of a random stimulus injection.
    pub chance: f64,
    /// Strength range for random injections.
    pub strength_min: f64,
    pub strength_max: f64,
    /// Per-tick multiplicative decay of the displayed stimulus record.
    pub decay: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Absolute change in global consciousness that counts as a spike.
    pub spike_threshold: f64,
    /// Self-awareness level above which a cell counts as "aware".
    pub awareness_threshold: f64,
    /// Fraction of the grid that must be aware for a collective event.
    pub collective_fraction: f64,
    /// Dedup window (log entries) for collective awareness events.
    pub collective_window: usize,
    /// Trailing log entries examined for chaotic oscillation.
    pub oscillation_window: usize,
    /// Mean absolute successive difference that counts as oscillation.
    pub oscillation_threshold: f64,
    /// Ticks between regular checkpoint events.
    pub checkpoint_interval: u64,
}

// ============================================================
// Defaults
// ============================================================

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            topology: TopologyConfig::default(),
            stimulus: StimulusConfig::default(),
            detector: DetectorConfig::default(),
        }
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            orthogonal_prob: 0.9,
            diagonal_prob: 0.6,
            long_range_prob: 0.15,
            long_range_weight_min: 0.2,
            long_range_weight_max: 0.5,
        }
    }
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            chance: 0.05,
            strength_min: 0.3,
            strength_max: 0.7,
            decay: 0.8,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            spike_threshold: 0.15,
            awareness_threshold: 0.6,
            collective_fraction: 0.25,
            collective_window: 5,
            oscillation_window: 10,
            oscillation_threshold: 0.05,
            checkpoint_interval: 10,
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl SimConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} — using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {} — using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// A topology with every connection probability forced to zero.
    /// Produces a grid of fully isolated cells.
    pub fn isolated() -> Self {
        Self {
            topology: TopologyConfig {
                orthogonal_prob: 0.0,
                diagonal_prob: 0.0,
                long_range_prob: 0.0,
                ..TopologyConfig::default()
            },
            ..Self::default()
        }
    }
}
