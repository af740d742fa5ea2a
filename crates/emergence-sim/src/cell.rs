//! A single stochastic agent and its per-tick update rule.
//!
//! Cells read neighbor state only through a `Snapshot` of the previous
//! generation, so every update within a tick sees the same frozen world
//! regardless of iteration order.

use crate::rng::SimRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Past activations kept per cell, oldest evicted first.
pub const HISTORY_CAPACITY: usize = 10;

/// Directed weighted edge to another cell, stored on the source cell.
/// Parallel edges to the same target are allowed; each creation attempt
/// samples its weight independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Connection {
    pub x: usize,
    pub y: usize,
    pub weight: f64,
}

/// Frozen per-cell values from the previous generation. Built once per
/// tick; the only neighbor state an update may read.
#[derive(Debug, Clone, Copy)]
pub struct PrevState {
    pub activation: f64,
    pub fatigue: f64,
}

pub struct Snapshot {
    width: usize,
    height: usize,
    states: Vec<PrevState>,
}

impl Snapshot {
    pub fn capture(width: usize, height: usize, cells: &[Cell]) -> Self {
        Self {
            width,
            height,
            states: cells
                .iter()
                .map(|c| PrevState {
                    activation: c.activation,
                    fatigue: c.fatigue,
                })
                .collect(),
        }
    }

    /// None when (x, y) falls outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<PrevState> {
        if x < self.width && y < self.height {
            self.states.get(y * self.width + x).copied()
        } else {
            None
        }
    }
}

pub struct Cell {
    x: usize,
    y: usize,
    activation: f64,
    memory: f64,
    attention: f64,
    fatigue: f64,
    self_awareness: f64,
    prediction_error: f64,
    phase: f64,
    frequency: f64,
    excitability: f64,
    connections: Vec<Connection>,
    history: VecDeque<f64>,
}

impl Cell {
    pub fn new(x: usize, y: usize, rng: &mut SimRng) -> Self {
        Self {
            x,
            y,
            activation: rng.unit(),
            memory: rng.unit() * 0.5,
            attention: rng.unit(),
            fatigue: 0.0,
            self_awareness: 0.0,
            prediction_error: 0.0,
            phase: rng.unit() * 2.0 * std::f64::consts::PI,
            frequency: 0.1 + rng.unit() * 0.2,
            excitability: 0.3 + rng.unit() * 0.4,
            connections: Vec::new(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    pub(crate) fn connect(&mut self, x: usize, y: usize, weight: f64) {
        self.connections.push(Connection { x, y, weight });
    }

    /// Sum neighbor contributions and squash into [0, 1). Fatigued
    /// neighbors count for less. Falls back to a fixed 0.3 when no
    /// in-bounds connection contributes anything.
    fn aggregate_input(&self, prev: &Snapshot) -> f64 {
        let mut sum = 0.0;
        let mut contributed = false;
        for conn in &self.connections {
            // Out-of-range targets are tolerated and skipped.
            if let Some(neighbor) = prev.get(conn.x, conn.y) {
                sum += neighbor.activation * conn.weight * (1.0 - neighbor.fatigue * 0.5);
                contributed = true;
            }
        }
        if contributed {
            sum / (1.0 + sum)
        } else {
            0.3
        }
    }

    /// Advance one tick against the previous generation.
    pub(crate) fn update(&mut self, prev: &Snapshot, rng: &mut SimRng) {
        let external_input = self.aggregate_input(prev);

        // Internal oscillator, normalized to [0, 1].
        self.phase += self.frequency;
        let oscillation = (self.phase.sin() + 1.0) / 2.0;

        let mut internal = self.activation * 0.3
            + self.memory * 0.2
            + external_input * 0.3
            + oscillation * 0.1
            + self.attention * 0.1;

        // Occasional large burst, otherwise ordinary noise.
        if rng.chance(self.excitability) {
            internal += rng.gaussian(0.3, 0.1);
        } else {
            internal += rng.gaussian(0.0, 0.1);
        }

        // Sustained high activation accumulates fatigue, which damps
        // both this update and (via the snapshot) neighbor influence.
        if self.activation > 0.7 {
            self.fatigue = (self.fatigue + 0.1).min(1.0);
        } else {
            self.fatigue = (self.fatigue - 0.05).max(0.0);
        }
        internal *= 1.0 - self.fatigue * 0.3;

        // High attention amplifies large swings.
        if self.attention > 0.6 && (internal - self.activation).abs() > 0.3 {
            internal *= 1.5;
        }

        self.activation = sensitized_activation(internal);

        // Self-prediction from the recorded history; skipped entirely
        // until at least one sample exists.
        if let Some(&last) = self.history.back() {
            let predicted = if self.history.len() >= 3 {
                let second_last = self.history[self.history.len() - 2];
                last + (last - second_last) * 0.5
            } else {
                last
            };
            self.prediction_error = (self.activation - predicted).abs();

            if self.prediction_error > 0.2 {
                self.self_awareness = (self.self_awareness + 0.15).min(1.0);
            } else if self.prediction_error < 0.05 {
                self.self_awareness = (self.self_awareness - 0.05).max(0.0);
            } else {
                self.self_awareness = self.self_awareness * 0.95 + 0.05;
            }
        }

        // Aware cells consolidate the present more aggressively.
        if self.self_awareness > 0.5 {
            self.memory = self.memory * 0.6 + self.activation * 0.4;
        } else {
            self.memory = self.memory * 0.8 + self.activation * 0.2;
        }

        // The weighted sum can exceed 1.0 when prediction error is
        // large; clamp to keep attention in range.
        self.attention =
            (self.self_awareness * 0.5 + self.prediction_error * 0.3 + rng.unit() * 0.2)
                .clamp(0.0, 1.0);

        self.history.push_back(self.activation);
        if self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }

    /// Additive external kick, clamped to 1.
    pub(crate) fn stimulate(&mut self, amount: f64) {
        self.activation = (self.activation + amount).min(1.0);
    }

    #[cfg(test)]
    pub(crate) fn force_activation(&mut self, value: f64) {
        self.activation = value;
    }

    #[cfg(test)]
    pub(crate) fn force_self_awareness(&mut self, value: f64) {
        self.self_awareness = value;
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn attention(&self) -> f64 {
        self.attention
    }

    pub fn fatigue(&self) -> f64 {
        self.fatigue
    }

    pub fn self_awareness(&self) -> f64 {
        self.self_awareness
    }

    pub fn prediction_error(&self) -> f64 {
        self.prediction_error
    }

    pub fn excitability(&self) -> f64 {
        self.excitability
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Recorded past activations, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.history.iter().copied()
    }
}

/// Piecewise activation squashing, steepest in the mid band so the
/// system stays maximally sensitive near its operating point. The low
/// band is floored at zero: the noisy integration step can push the
/// pre-activation below zero.
pub(crate) fn sensitized_activation(internal: f64) -> f64 {
    if internal < 0.4 {
        (internal * 0.5).max(0.0)
    } else if internal < 0.6 {
        0.2 + (internal - 0.4) * 3.0
    } else {
        (0.8 + (internal - 0.6) * 0.5).min(1.0)
    }
}
