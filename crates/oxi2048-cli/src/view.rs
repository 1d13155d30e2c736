use std::fmt::Write as _;

use oxi2048_engine::{GRID_SIZE, Grid};

/// Renders the grid with actual tile values, one row per line.
///
/// Cells are right-aligned to the widest tile on the board; empty cells stay
/// blank.
pub fn render_grid(grid: &Grid) -> String {
    let widest: u32 = 1 << grid.highest_rank().max(1);
    let width = widest.to_string().len();

    let mut out = String::new();
    for r in 0..GRID_SIZE {
        if r > 0 {
            out.push('\n');
        }
        out.push('|');
        for c in 0..GRID_SIZE {
            let rank = grid.rank(r, c);
            let tile = if rank == 0 {
                String::new()
            } else {
                (1u32 << rank).to_string()
            };
            write!(out, " {tile:>width$} |").unwrap();
        }
    }
    out
}
