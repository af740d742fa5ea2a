//! The cell grid and its synchronous stepping loop.
//!
//! `step()` is the unit of atomicity: stimulus injection, a two-phase
//! cell update against a frozen snapshot of the previous generation,
//! metric recomputation, and emergence detection. Nothing outside
//! `step()` mutates simulation state.

use crate::cell::{Cell, Snapshot};
use crate::config::SimConfig;
use crate::emergence::{self, EmergenceEvent};
use crate::metrics::{self, GridMetrics};
use crate::rng::SimRng;

/// Most recent external stimulus. The strength decays every tick and is
/// for observers only — it never re-affects cells after injection.
#[derive(Debug, Clone, Copy)]
pub struct Stimulus {
    pub strength: f64,
    pub x: usize,
    pub y: usize,
}

pub struct Grid {
    width: usize,
    height: usize,
    timestep: u64,
    cells: Vec<Cell>,
    metrics: GridMetrics,
    events: Vec<EmergenceEvent>,
    stimulus: Stimulus,
    config: SimConfig,
    rng: SimRng,
}

impl Grid {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self::with_config(width, height, seed, SimConfig::default())
    }

    pub fn with_config(width: usize, height: usize, seed: u64, config: SimConfig) -> Self {
        let mut rng = SimRng::seeded(seed);
        let mut cells: Vec<Cell> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| Cell::new(x, y, &mut rng))
            .collect();
        crate::topology::wire(&mut cells, width, height, &config.topology, &mut rng);

        Self {
            width,
            height,
            timestep: 0,
            cells,
            metrics: GridMetrics::default(),
            events: Vec::new(),
            stimulus: Stimulus {
                strength: 0.0,
                x: width / 2,
                y: height / 2,
            },
            config,
            rng,
        }
    }

    /// Advance one tick.
    pub fn step(&mut self) {
        self.timestep += 1;

        if !self.cells.is_empty() && self.rng.chance(self.config.stimulus.chance) {
            let strength = self
                .rng
                .range(self.config.stimulus.strength_min, self.config.stimulus.strength_max);
            let x = self.rng.index(self.width);
            let y = self.rng.index(self.height);
            self.inject_stimulus_at(x, y, strength);
        }

        // Two-phase update: every cell reads neighbor state from the
        // frozen previous generation, never from cells already updated
        // this tick.
        let snapshot = Snapshot::capture(self.width, self.height, &self.cells);
        for cell in &mut self.cells {
            cell.update(&snapshot, &mut self.rng);
        }

        self.stimulus.strength *= self.config.stimulus.decay;

        self.metrics = metrics::compute(&self.cells, self.width, self.height);

        emergence::detect(
            &mut self.events,
            &self.cells,
            &self.metrics,
            self.timestep,
            self.width,
            self.height,
            &self.config.detector,
        );
    }

    /// Kick every cell within Manhattan distance 2 of (x, y), full
    /// strength at the focus and strength/(distance+1) further out,
    /// clamping activations to 1. Records the stimulus for observers.
    pub fn inject_stimulus_at(&mut self, x: usize, y: usize, strength: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        for dx in -2isize..=2 {
            for dy in -2isize..=2 {
                let distance = (dx.abs() + dy.abs()) as usize;
                if distance > 2 {
                    continue;
                }
                let tx = x as isize + dx;
                let ty = y as isize + dy;
                if tx < 0 || ty < 0 || tx >= self.width as isize || ty >= self.height as isize {
                    continue;
                }
                let amount = if distance == 0 {
                    strength
                } else {
                    strength / (distance + 1) as f64
                };
                self.cells[ty as usize * self.width + tx as usize].stimulate(amount);
            }
        }
        self.stimulus = Stimulus { strength, x, y };
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    pub fn global_consciousness(&self) -> f64 {
        self.metrics.global_consciousness
    }

    pub fn metrics(&self) -> GridMetrics {
        self.metrics
    }

    pub fn events(&self) -> &[EmergenceEvent] {
        &self.events
    }

    pub fn stimulus(&self) -> Stimulus {
        self.stimulus
    }

    /// None when (x, y) is out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Row-major iteration over all cells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}
