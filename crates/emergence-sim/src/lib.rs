//! emergence-sim — a 2-D grid of interacting stochastic cells
//!
//! Architecture:
//! - Cell: scalar state plus the nonlinear per-tick update rule
//!   (self-prediction, attention, fatigue, sensitized activation)
//! - Topology: fixed weighted small-world graph, built once at creation
//! - Grid: owns the cells, drives synchronous two-phase stepping
//! - Metrics: per-cell consciousness scores and grid aggregates
//!   (synchrony, integration, complexity, global consciousness)
//! - Emergence: classified, window-deduplicated event log
//!
//! Everything is deterministic given a seed: one `SimRng` is threaded
//! through construction and every update, and no process-global random
//! state is touched anywhere.

pub mod cell;
pub mod config;
pub mod emergence;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod rng;
pub mod runlog;

mod topology;

pub use cell::{Cell, Connection};
pub use config::SimConfig;
pub use emergence::{EmergenceEvent, EventKind};
pub use error::{Error, Result};
pub use grid::{Grid, Stimulus};
pub use metrics::{consciousness_score, GridMetrics};
pub use runlog::RunLog;
