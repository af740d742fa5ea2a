//! Per-cell consciousness scoring and grid-wide aggregates.

use crate::cell::Cell;
use serde::{Deserialize, Serialize};

/// Aggregate statistics recomputed after every tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GridMetrics {
    pub avg_score: f64,
    pub var_score: f64,
    /// How similar adjacent cells' activations are, in [0, 1].
    pub synchrony: f64,
    /// Peaks when score variance is high while both the average score
    /// and synchrony sit near their midpoints.
    pub complexity: f64,
    /// Activation diversity weighted by synchrony.
    pub integration: f64,
    pub global_consciousness: f64,
}

/// Composite consciousness score for one cell.
pub fn consciousness_score(cell: &Cell) -> f64 {
    let history: Vec<f64> = cell.history().collect();
    let complexity = if history.len() >= 3 {
        let variations: Vec<f64> = history.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        sample_stdev(&variations)
    } else {
        0.0
    };

    cell.self_awareness() * 0.3
        + cell.prediction_error() * 0.2
        + complexity * 0.2
        + (cell.activation() - 0.5).abs() * 0.2
        + (1.0 - cell.fatigue()) * 0.1
}

/// Recompute every aggregate from the committed cell states.
pub(crate) fn compute(cells: &[Cell], width: usize, height: usize) -> GridMetrics {
    let scores: Vec<f64> = cells.iter().map(consciousness_score).collect();
    let avg_score = if scores.is_empty() { 0.5 } else { mean(&scores) };
    let var_score = sample_variance(&scores);

    let synchrony = synchrony(cells, width, height);

    let activations: Vec<f64> = cells.iter().map(|c| c.activation()).collect();
    let integration = sample_stdev(&activations) * synchrony;

    let complexity =
        var_score * (1.0 - (avg_score - 0.5).abs() * 2.0) * (1.0 - (synchrony - 0.5).abs() * 2.0);

    let global_consciousness =
        avg_score * 0.2 + synchrony * 0.2 + complexity * 0.3 + integration * 0.3;

    GridMetrics {
        avg_score,
        var_score,
        synchrony,
        complexity,
        integration,
        global_consciousness,
    }
}

/// Mean similarity of each cell to its right and down neighbors. Cells
/// in the last row or column are not visited as pair sources.
fn synchrony(cells: &[Cell], width: usize, height: usize) -> f64 {
    if width < 2 || height < 2 {
        return 0.5;
    }
    let mut correlations = Vec::with_capacity((width - 1) * (height - 1));
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let here = cells[y * width + x].activation();
            let right = cells[y * width + x + 1].activation();
            let down = cells[(y + 1) * width + x].activation();
            let diff_r = (here - right).abs();
            let diff_d = (here - down).abs();
            correlations.push(1.0 - (diff_r + diff_d) / 2.0);
        }
    }
    mean(&correlations)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 divisor); 0 below two samples.
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

fn sample_stdev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}
