use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::action::Action;

/// Board edge length.
pub const GRID_SIZE: usize = 4;
/// Number of cells on the board.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
/// Rank of the winning tile (2^11 = 2048).
pub const WIN_RANK: u8 = 11;

/// The 4x4 rank grid.
///
/// Each cell stores the log2 of its tile value: 0 is an empty cell, `n` is a
/// tile worth 2^n, up to [`WIN_RANK`] (2048). Ranks never exceed [`WIN_RANK`]
/// because reaching it ends the game.
///
/// `Grid` is a plain `Copy` value: candidate moves are simulated on copies,
/// leaving the live grid untouched. Tile spawning lives in the engine layer
/// ([`crate::engine::TileSpawner`]); every operation here is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cells: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: one hex digit per cell, rows joined by commas ("1200,0000,...")
        let mut text = String::with_capacity(CELL_COUNT + GRID_SIZE - 1);
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            for &rank in row {
                text.push(char::from_digit(u32::from(rank), 16).unwrap());
            }
        }
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != GRID_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {GRID_SIZE} comma-separated rows, got {}",
                parts.len()
            )));
        }

        let mut cells = [[0; GRID_SIZE]; GRID_SIZE];
        for (r, part) in parts.iter().enumerate() {
            let digits: Vec<char> = part.chars().collect();
            if digits.len() != GRID_SIZE {
                return Err(serde::de::Error::custom(format!(
                    "expected {GRID_SIZE} cells in row {r}, got {}",
                    digits.len()
                )));
            }
            for (c, &digit) in digits.iter().enumerate() {
                let rank = digit
                    .to_digit(16)
                    .filter(|&rank| rank <= u32::from(WIN_RANK))
                    .ok_or_else(|| {
                        serde::de::Error::custom(format!("invalid rank at row {r}: {digit}"))
                    })?;
                cells[r][c] = u8::try_from(rank).unwrap();
            }
        }

        Ok(Grid { cells })
    }
}

impl Grid {
    pub const EMPTY: Self = Self {
        cells: [[0; GRID_SIZE]; GRID_SIZE],
    };

    /// Creates a grid from explicit ranks, row by row.
    ///
    /// Intended for scripted positions and tests.
    #[must_use]
    pub const fn from_ranks(cells: [[u8; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Returns the rank at the given cell.
    #[must_use]
    pub const fn rank(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub(crate) fn set_rank(&mut self, row: usize, col: usize, rank: u8) {
        self.cells[row][col] = rank;
    }

    /// Returns the coordinates of all empty cells, in raster order.
    pub(crate) fn empty_cells(&self) -> ArrayVec<(usize, usize), CELL_COUNT> {
        let mut empty = ArrayVec::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &rank) in row.iter().enumerate() {
                if rank == 0 {
                    empty.push((r, c));
                }
            }
        }
        empty
    }

    /// Returns the highest rank on the grid (0 when the grid is empty).
    #[must_use]
    pub fn highest_rank(&self) -> u8 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of the tile values on the grid; empty cells contribute 0.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .map(|&rank| if rank == 0 { 0 } else { 1 << rank })
            .sum()
    }

    /// Checks whether the action would move or merge at least one tile.
    #[must_use]
    pub fn is_legal(&self, action: Action) -> bool {
        let mut rotated = *self;
        rotated.rotate(action.turns_to_left());
        rotated.can_shift_left()
    }

    /// Slides and merges tiles in the given direction, returning the reward.
    ///
    /// The reward is the sum of the values (2^rank) of every tile newly
    /// formed by a merge; each tile merges at most once per action. An
    /// illegal action leaves the grid unchanged and returns 0. Spawning is
    /// never performed here.
    pub fn apply_action(&mut self, action: Action) -> u32 {
        let turns = action.turns_to_left();
        let mut rotated = *self;
        rotated.rotate(turns);
        if !rotated.can_shift_left() {
            return 0;
        }
        let reward = rotated.shift_left();
        rotated.rotate((GRID_SIZE - turns) % GRID_SIZE);
        *self = rotated;
        reward
    }

    /// Rotates the grid by `steps` quarter turns.
    ///
    /// Ring-wise element rotation over the two concentric rings of the 4x4
    /// matrix; purely geometric. `turns_to_left` counts quarter turns in
    /// this rotation's direction.
    fn rotate(&mut self, steps: usize) {
        const N: usize = GRID_SIZE - 1;
        for _ in 0..steps {
            for i in 0..GRID_SIZE / 2 {
                for j in i..N - i {
                    let tmp = self.cells[i][j];
                    self.cells[i][j] = self.cells[j][N - i];
                    self.cells[j][N - i] = self.cells[N - i][N - j];
                    self.cells[N - i][N - j] = self.cells[N - j][i];
                    self.cells[N - j][i] = tmp;
                }
            }
        }
    }

    /// Whether a leftward shift would move or merge anything.
    fn can_shift_left(&self) -> bool {
        self.cells.iter().any(row_can_shift_left)
    }

    /// Compacts every row to the left, merging equal adjacent tiles.
    ///
    /// Returns the summed value of the newly formed tiles.
    fn shift_left(&mut self) -> u32 {
        self.cells.iter_mut().map(shift_row_left).sum()
    }
}

/// A row can shift left when it has an adjacent equal non-zero pair, or a
/// non-zero cell after an earlier empty cell.
fn row_can_shift_left(row: &[u8; GRID_SIZE]) -> bool {
    let mut prev = 0;
    let mut seen_empty = false;
    for &rank in row {
        if rank != 0 && rank == prev {
            return true;
        }
        prev = rank;
        if rank == 0 {
            seen_empty = true;
        } else if seen_empty {
            return true;
        }
    }
    false
}

fn shift_row_left(row: &mut [u8; GRID_SIZE]) -> u32 {
    let mut reward = 0;
    let mut write = 0;
    // A merged tile is closed for the rest of the pass.
    let mut last_merged = false;
    for read in 0..GRID_SIZE {
        let rank = row[read];
        if rank == 0 {
            continue;
        }
        row[read] = 0;
        if write > 0 && row[write - 1] == rank && !last_merged {
            row[write - 1] = rank + 1;
            reward += 1 << (rank + 1);
            last_merged = true;
        } else {
            row[write] = rank;
            write += 1;
            last_merged = false;
        }
    }
    reward
}
