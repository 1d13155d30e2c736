use oxi2048_engine::{Action, Grid};

use crate::{
    tuple_set::{TUPLE_COUNT, TupleSet, TupleState},
    value_table::ValueTable,
};

/// The agent's learned model: the tuple catalogue plus its value table.
///
/// Constructed once and passed by reference wherever decisions or updates
/// happen. Owning the catalogue and table together (instead of sharing them
/// process-wide) lets several independent agents coexist in one process and
/// keeps tests isolated.
#[derive(Debug, Clone)]
pub struct TupleNetwork {
    tuples: TupleSet,
    table: ValueTable,
}

impl Default for TupleNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TupleNetwork {
    /// Creates a network with a zero-initialized value table, for training.
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(ValueTable::new())
    }

    /// Creates a network around a previously trained value table.
    #[must_use]
    pub fn with_table(table: ValueTable) -> Self {
        Self {
            tuples: TupleSet::new(),
            table,
        }
    }

    #[must_use]
    pub fn tuples(&self) -> &TupleSet {
        &self.tuples
    }

    #[must_use]
    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Reads every tuple state of the grid.
    #[must_use]
    pub fn states_of(&self, grid: &Grid) -> [TupleState; TUPLE_COUNT] {
        self.tuples.states_of(grid)
    }

    /// Board value under one action: the summed per-tuple weights.
    #[must_use]
    pub fn evaluate(&self, action: Action, states: &[TupleState; TUPLE_COUNT]) -> f32 {
        self.table.total_value(action, states)
    }

    /// Shifts the weight of every tuple of the given board by `delta`,
    /// under one action.
    pub fn reinforce(&mut self, action: Action, states: &[TupleState; TUPLE_COUNT], delta: f32) {
        for (tuple_id, &state) in states.iter().enumerate() {
            let state_id = TupleSet::state_id(state);
            let value = self.table.get(action, tuple_id, state_id);
            self.table.set(action, tuple_id, state_id, value + delta);
        }
    }
}
