//! Emergence event log and detection.
//!
//! Events are a closed tagged set. Each tick appends at most one of the
//! three conditioned kinds (first satisfied wins, in priority order),
//! and, independently, a periodic regular checkpoint. Dedup windows
//! are small, so plain tail scans are enough.

use crate::cell::Cell;
use crate::config::DetectorConfig;
use crate::metrics::GridMetrics;
use serde::{Deserialize, Serialize};

/// One entry in the append-only emergence log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergenceEvent {
    pub timestep: u64,
    /// Global consciousness at the tick this event was recorded.
    pub consciousness: f64,
    pub description: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Regular,
    ConsciousnessSpike { change: f64 },
    CollectiveAwareness { aware_cells: usize },
    ChaoticOscillation,
}

impl EventKind {
    pub fn description(&self) -> &'static str {
        match self {
            EventKind::Regular => "periodic checkpoint",
            EventKind::ConsciousnessSpike { .. } => "sudden shift in global consciousness",
            EventKind::CollectiveAwareness { .. } => "collective rise in self-awareness",
            EventKind::ChaoticOscillation => "chaotic oscillation pattern",
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, EventKind::Regular)
    }
}

impl EmergenceEvent {
    pub fn new(timestep: u64, consciousness: f64, kind: EventKind) -> Self {
        Self {
            timestep,
            consciousness,
            description: kind.description().to_string(),
            kind,
        }
    }
}

/// Evaluate all detection rules for the just-committed tick and append
/// the resulting events.
pub(crate) fn detect(
    events: &mut Vec<EmergenceEvent>,
    cells: &[Cell],
    metrics: &GridMetrics,
    timestep: u64,
    width: usize,
    height: usize,
    config: &DetectorConfig,
) {
    let global = metrics.global_consciousness;

    let conditioned = spike(events, global, config)
        .or_else(|| collective_awareness(events, cells, width, height, config))
        .or_else(|| chaotic_oscillation(events, config));
    if let Some(kind) = conditioned {
        events.push(EmergenceEvent::new(timestep, global, kind));
    }

    // The checkpoint is a sampling mechanism, not a detection, so it is
    // never suppressed by a conditioned event landing on the same tick.
    if config.checkpoint_interval > 0 && timestep % config.checkpoint_interval == 0 {
        events.push(EmergenceEvent::new(timestep, global, EventKind::Regular));
    }
}

/// Large jump relative to the most recent non-regular event.
fn spike(events: &[EmergenceEvent], global: f64, config: &DetectorConfig) -> Option<EventKind> {
    let last = events.iter().rev().find(|e| !e.kind.is_regular())?;
    let change = (global - last.consciousness).abs();
    if change > config.spike_threshold {
        Some(EventKind::ConsciousnessSpike { change })
    } else {
        None
    }
}

/// More than a quarter of the grid self-aware at once, at most once per
/// dedup window.
fn collective_awareness(
    events: &[EmergenceEvent],
    cells: &[Cell],
    width: usize,
    height: usize,
    config: &DetectorConfig,
) -> Option<EventKind> {
    let aware_cells = cells
        .iter()
        .filter(|c| c.self_awareness() > config.awareness_threshold)
        .count();
    if aware_cells as f64 <= config.collective_fraction * (width * height) as f64 {
        return None;
    }
    let recently_seen = tail(events, config.collective_window)
        .iter()
        .any(|e| matches!(e.kind, EventKind::CollectiveAwareness { .. }));
    if recently_seen {
        None
    } else {
        Some(EventKind::CollectiveAwareness { aware_cells })
    }
}

/// Sustained swing in the recorded consciousness trajectory.
fn chaotic_oscillation(events: &[EmergenceEvent], config: &DetectorConfig) -> Option<EventKind> {
    let window = config.oscillation_window;
    if window < 2 || events.len() < window {
        return None;
    }
    let recent = tail(events, window);
    let mean_swing = recent
        .windows(2)
        .map(|w| (w[1].consciousness - w[0].consciousness).abs())
        .sum::<f64>()
        / (recent.len() - 1) as f64;
    if mean_swing <= config.oscillation_threshold {
        return None;
    }
    let recently_seen = recent
        .iter()
        .any(|e| matches!(e.kind, EventKind::ChaoticOscillation));
    if recently_seen {
        None
    } else {
        Some(EventKind::ChaoticOscillation)
    }
}

fn tail(events: &[EmergenceEvent], n: usize) -> &[EmergenceEvent] {
    &events[events.len().saturating_sub(n)..]
}
