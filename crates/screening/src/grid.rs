use tracing::{debug, trace};

use crate::error::LayoutError;
use crate::table::Table;

/// 0-based, `bottom` and `right` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rectangle {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Rectangle {
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }
}

/// Finds the largest rectangle of `0`/`1` cells in the table.
///
/// Each candidate anchor grows rightwards while the columns provide a run of indicator cells at
/// least as tall as the run in the anchor column. Anchors are visited column by column, top to bottom,
/// and only a strictly larger area replaces the best one, so ties keep the first rectangle found.
pub fn locate(table: &Table) -> Result<Rectangle, LayoutError> {
    let runs = indicator_runs(table);
    let width = table.width();

    // longest column from each column index onwards, bounds the height of any remaining rectangle
    let mut longest_remaining = vec![0_usize; width + 1];
    for column in (0..width).rev() {
        longest_remaining[column] = longest_remaining[column + 1].max(runs[column].len());
    }

    let mut best: Option<Rectangle> = None;

    for left in 0..width {
        if let Some(best) = &best {
            if longest_remaining[left] * (width - left) < best.area() {
                trace!("Pruning remaining columns. column: {}, best: {:?}", left, best);
                break;
            }
        }

        for top in 0..runs[left].len() {
            let Some(candidate) = grow(&runs, top, left) else {
                continue;
            };

            let is_better = match &best {
                None => true,
                Some(best) => candidate.area() > best.area(),
            };

            if is_better {
                best = Some(candidate);
            }
        }
    }

    debug!("Located indicator cells. rectangle: {:?}", best);

    best.ok_or(LayoutError::NotFound)
}

fn grow(runs: &[Vec<usize>], top: usize, left: usize) -> Option<Rectangle> {
    let mut height = 0;
    let mut right = left;

    for column_runs in &runs[left..] {
        let run = column_runs
            .get(top)
            .copied()
            .unwrap_or(0);

        if run == 0 || run < height {
            break;
        }
        if height == 0 {
            height = run;
        }
        right += 1;
    }

    (height > 0).then_some(Rectangle {
        top,
        left,
        bottom: top + height,
        right,
    })
}

/// For each cell, the number of consecutive indicator cells starting at that cell and going down.
fn indicator_runs(table: &Table) -> Vec<Vec<usize>> {
    table
        .columns()
        .iter()
        .map(|column| {
            let mut runs = vec![0; column.len()];
            for row in (0..column.len()).rev() {
                if column[row].is_indicator() {
                    runs[row] = 1 + runs.get(row + 1).copied().unwrap_or(0);
                }
            }
            runs
        })
        .collect()
}
