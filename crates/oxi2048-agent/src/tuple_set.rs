use oxi2048_engine::{GRID_SIZE, Grid};

/// Number of learned tuples: 4 rows, 4 columns, 9 overlapping 2x2 squares.
pub const TUPLE_COUNT: usize = 17;
/// Cells per tuple.
pub const TUPLE_CELLS: usize = 4;
/// Distinct ranks a cell can hold (0 through the win rank).
pub const RANK_CARDINALITY: usize = 12;
/// Distinct joint states of one tuple (one base-12 digit per cell).
pub const TUPLE_STATE_COUNT: usize = RANK_CARDINALITY.pow(4);

/// The ranks at one tuple's coordinates, in tuple-definition order.
pub type TupleState = [u8; TUPLE_CELLS];

/// The fixed catalogue of board tuples.
///
/// Tuple ids are assigned deterministically: the 4 rows, then the 4 columns,
/// then the 9 squares, each group in raster order. The order is load-bearing:
/// the value table and the weight file key weights by tuple id, so two
/// catalogues must agree on it to share a table.
#[derive(Debug, Clone)]
pub struct TupleSet {
    coords: [[(usize, usize); TUPLE_CELLS]; TUPLE_COUNT],
}

impl Default for TupleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TupleSet {
    #[must_use]
    pub fn new() -> Self {
        let mut coords = [[(0, 0); TUPLE_CELLS]; TUPLE_COUNT];
        let mut next = 0;
        for r in 0..GRID_SIZE {
            coords[next] = std::array::from_fn(|c| (r, c));
            next += 1;
        }
        for c in 0..GRID_SIZE {
            coords[next] = std::array::from_fn(|r| (r, c));
            next += 1;
        }
        for r in 0..GRID_SIZE - 1 {
            for c in 0..GRID_SIZE - 1 {
                coords[next] = [(r, c), (r, c + 1), (r + 1, c), (r + 1, c + 1)];
                next += 1;
            }
        }
        debug_assert_eq!(next, TUPLE_COUNT);
        Self { coords }
    }

    /// The board coordinates of one tuple, in definition order.
    #[must_use]
    pub fn coords(&self, tuple_id: usize) -> &[(usize, usize); TUPLE_CELLS] {
        &self.coords[tuple_id]
    }

    /// Reads one tuple's ranks from the grid.
    #[must_use]
    pub fn state_of(&self, grid: &Grid, tuple_id: usize) -> TupleState {
        self.coords[tuple_id].map(|(r, c)| grid.rank(r, c))
    }

    /// Reads every tuple's state at once.
    #[must_use]
    pub fn states_of(&self, grid: &Grid) -> [TupleState; TUPLE_COUNT] {
        std::array::from_fn(|tuple_id| self.state_of(grid, tuple_id))
    }

    /// Canonical id of a tuple state: mixed-radix base-12 over the 4 ranks.
    ///
    /// Callers guarantee every rank is below [`RANK_CARDINALITY`];
    /// out-of-range input yields a nonsensical id and is not defended
    /// against.
    #[must_use]
    pub fn state_id(state: TupleState) -> usize {
        state
            .into_iter()
            .fold(0, |id, rank| id * RANK_CARDINALITY + usize::from(rank))
    }
}
