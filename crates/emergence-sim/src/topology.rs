//! Connection graph construction.
//!
//! Built once at grid creation and never mutated afterwards: a Moore
//! neighborhood wired with distance-dependent probability, plus sparse
//! long-range shortcuts that give the graph its small-world character.

use crate::cell::Cell;
use crate::config::TopologyConfig;
use crate::rng::SimRng;

/// Wire every cell's outgoing connections. Cells are visited in
/// row-major order so a given seed always produces the same graph.
pub(crate) fn wire(
    cells: &mut [Cell],
    width: usize,
    height: usize,
    config: &TopologyConfig,
    rng: &mut SimRng,
) {
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;

            for dx in [-1isize, 0, 1] {
                for dy in [-1isize, 0, 1] {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        continue;
                    }
                    let probability = if dx.abs() + dy.abs() == 1 {
                        config.orthogonal_prob
                    } else {
                        config.diagonal_prob
                    };
                    if rng.chance(probability) {
                        let weight = banded_weight(rng);
                        cells[idx].connect(nx as usize, ny as usize, weight);
                    }
                }
            }

            // Long-range shortcut: anywhere but self. A single-cell grid
            // has no valid target, so the re-roll would never terminate.
            if width * height > 1 && rng.chance(config.long_range_prob) {
                let (rx, ry) = loop {
                    let rx = rng.index(width);
                    let ry = rng.index(height);
                    if (rx, ry) != (x, y) {
                        break (rx, ry);
                    }
                };
                let weight = rng.range(config.long_range_weight_min, config.long_range_weight_max);
                cells[idx].connect(rx, ry, weight);
            }
        }
    }
}

/// Edge weight drawn from one of three uniform bands (weak, medium,
/// strong) chosen with equal probability.
fn banded_weight(rng: &mut SimRng) -> f64 {
    match rng.index(3) {
        0 => rng.range(0.1, 0.3),
        1 => rng.range(0.3, 0.7),
        _ => rng.range(0.7, 1.0),
    }
}
