//! Neighbor resolver: keeps derived per-tile context in step with the grid.
//!
//! An edit at `X` can only change the derived state of `X` and its eight
//! immediate neighbors, so every edit recomputes that 3x3 window and
//! nothing else.

use crate::types::{Cell, Direction};

use super::GridStore;

/// Recompute `land_neighbors` and `water_bottom` for every occupied cell in
/// the 3x3 window centred on `center`. Empty cells are skipped.
pub fn recompute(grid: &mut GridStore, center: Cell) {
    for cell in center.window() {
        if !grid.contains(cell) {
            continue;
        }

        let has_water = grid.has_water(cell);
        let mut land = Vec::with_capacity(8);
        let mut water_bottom = false;

        for direction in Direction::ALL {
            let (dcol, drow) = direction.offset();
            let Some(neighbor) = cell.offset(dcol, drow) else {
                continue;
            };
            if !grid.contains(neighbor) {
                continue;
            }
            if direction == Direction::North && has_water && grid.has_water(neighbor) {
                water_bottom = true;
            }
            if grid.has_land(neighbor) {
                land.push(direction);
            }
        }

        if let Some(tile) = grid.get_mut(cell) {
            tile.reset_derived();
            for direction in land {
                tile.push_land_neighbor(direction);
            }
            if water_bottom {
                tile.set_water_bottom();
            }
        }
    }
}

/// Recompute every occupied cell. Only used to check incremental results.
pub fn recompute_all(grid: &mut GridStore) {
    let cells: Vec<Cell> = grid.cells().collect();
    for cell in cells {
        recompute(grid, cell);
    }
}
