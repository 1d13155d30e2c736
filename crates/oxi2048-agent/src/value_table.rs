use std::io;

use oxi2048_engine::Action;

use crate::tuple_set::{TUPLE_COUNT, TUPLE_STATE_COUNT, TupleSet, TupleState};

/// Weights stored per action: one slot per (tuple, tuple state) pair.
pub const TABLE_LEN: usize = TUPLE_COUNT * TUPLE_STATE_COUNT;

/// Failure while reading or writing a persisted weight table.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum WeightTableError {
    #[display("weight table I/O failed: {_0}")]
    Io(io::Error),
    #[display("malformed weight table: {reason}")]
    Malformed {
        #[error(not(source))]
        reason: String,
    },
}

impl From<io::Error> for WeightTableError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

fn malformed(reason: impl Into<String>) -> WeightTableError {
    WeightTableError::Malformed {
        reason: reason.into(),
    }
}

/// Per-action lookup tables of learned weights.
///
/// One dense `f32` array per action, indexed by
/// `tupleId * TUPLE_STATE_COUNT + tupleStateId`. Zero-initialized for
/// training, or loaded from a persisted file for evaluation; only the
/// agent's learning step mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    tables: [Vec<f32>; Action::COUNT],
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTable {
    /// Creates a zero-initialized table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: std::array::from_fn(|_| vec![0.0; TABLE_LEN]),
        }
    }

    fn slot(tuple_id: usize, state_id: usize) -> usize {
        debug_assert!(tuple_id < TUPLE_COUNT);
        debug_assert!(state_id < TUPLE_STATE_COUNT);
        tuple_id * TUPLE_STATE_COUNT + state_id
    }

    #[must_use]
    pub fn get(&self, action: Action, tuple_id: usize, state_id: usize) -> f32 {
        self.tables[action.index()][Self::slot(tuple_id, state_id)]
    }

    pub fn set(&mut self, action: Action, tuple_id: usize, state_id: usize, value: f32) {
        self.tables[action.index()][Self::slot(tuple_id, state_id)] = value;
    }

    /// Value of a whole board under one action: the sum of its 17 per-tuple
    /// weights. Tuples contribute independently, with no cross-term.
    #[must_use]
    pub fn total_value(&self, action: Action, states: &[TupleState; TUPLE_COUNT]) -> f32 {
        states
            .iter()
            .enumerate()
            .map(|(tuple_id, &state)| self.get(action, tuple_id, TupleSet::state_id(state)))
            .sum()
    }

    /// Writes the table in the persisted text format.
    ///
    /// One line: 8 `|`-separated fields alternating an action symbol with
    /// the comma-separated weights of that action, actions in
    /// [`Action::ALL`] order. The fixed order keeps the format well-defined;
    /// [`Self::from_reader`] accepts the four actions in any order.
    pub fn to_writer<W>(&self, writer: &mut W) -> Result<(), WeightTableError>
    where
        W: io::Write,
    {
        for (i, action) in Action::ALL.into_iter().enumerate() {
            if i > 0 {
                write!(writer, "|")?;
            }
            write!(writer, "{}|", action.symbol())?;
            for (j, weight) in self.tables[action.index()].iter().enumerate() {
                if j > 0 {
                    write!(writer, ",")?;
                }
                write!(writer, "{weight}")?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads a table in the persisted text format.
    ///
    /// Each action must appear exactly once with exactly [`TABLE_LEN`]
    /// weights; anything else is reported as malformed rather than patched
    /// over, since a partially read table would silently mis-train the
    /// agent.
    pub fn from_reader<R>(reader: &mut R) -> Result<Self, WeightTableError>
    where
        R: io::BufRead,
    {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end_matches(['\r', '\n']);

        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() != 2 * Action::COUNT {
            return Err(malformed(format!(
                "expected {} fields, got {}",
                2 * Action::COUNT,
                fields.len()
            )));
        }

        let mut tables: [Option<Vec<f32>>; Action::COUNT] = [const { None }; Action::COUNT];
        for pair in fields.chunks_exact(2) {
            let (symbol, csv) = (pair[0], pair[1]);
            let action = single_char(symbol)
                .and_then(Action::from_symbol)
                .ok_or_else(|| malformed(format!("unknown action symbol: {symbol:?}")))?;
            if tables[action.index()].is_some() {
                return Err(malformed(format!("duplicate action symbol: {symbol:?}")));
            }

            let weights = csv
                .split(',')
                .map(str::parse)
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| malformed(format!("invalid weight for action {action}: {e}")))?;
            if weights.len() != TABLE_LEN {
                return Err(malformed(format!(
                    "expected {TABLE_LEN} weights for action {action}, got {}",
                    weights.len()
                )));
            }
            tables[action.index()] = Some(weights);
        }

        // The field count and the duplicate check leave no room for a
        // missing action, but keep the failure explicit.
        let tables = tables.map(|table| table.expect("every action present"));
        Ok(Self { tables })
    }
}

fn single_char(field: &str) -> Option<char> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ValueTable {
        let mut table = ValueTable::new();
        table.set(Action::Up, 0, 0, 1.5);
        table.set(Action::Right, 3, 17, -0.25);
        table.set(Action::Down, 16, TUPLE_STATE_COUNT - 1, 0.125);
        table.set(Action::Left, 8, 20000, 3.0e-7);
        table
    }

    #[test]
    fn test_new_is_zeroed() {
        let table = ValueTable::new();
        assert_eq!(table.get(Action::Up, 0, 0), 0.0);
        assert_eq!(table.get(Action::Left, 16, TUPLE_STATE_COUNT - 1), 0.0);
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut table = ValueTable::new();
        table.set(Action::Down, 5, 123, -2.5);
        assert_eq!(table.get(Action::Down, 5, 123), -2.5);
        // Other actions and slots stay untouched.
        assert_eq!(table.get(Action::Up, 5, 123), 0.0);
        assert_eq!(table.get(Action::Down, 5, 124), 0.0);
        assert_eq!(table.get(Action::Down, 6, 123), 0.0);
    }

    #[test]
    fn test_total_value_sums_per_tuple_weights() {
        let mut table = ValueTable::new();
        let states: [TupleState; TUPLE_COUNT] = std::array::from_fn(|tuple_id| {
            [u8::try_from(tuple_id % 12).unwrap(), 0, 0, 0]
        });
        for (tuple_id, &state) in states.iter().enumerate() {
            #[expect(clippy::cast_precision_loss)]
            let weight = (tuple_id + 1) as f32;
            table.set(Action::Up, tuple_id, TupleSet::state_id(state), weight);
        }

        // 1 + 2 + ... + 17
        assert_eq!(table.total_value(Action::Up, &states), 153.0);
        assert_eq!(table.total_value(Action::Down, &states), 0.0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let table = sample_table();
        let mut buffer = Vec::new();
        table.to_writer(&mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("w|"));

        let loaded = ValueTable::from_reader(&mut buffer.as_slice()).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_load_accepts_any_action_order() {
        let table = sample_table();
        let mut buffer = Vec::new();
        table.to_writer(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let fields: Vec<&str> = text.split('|').collect();
        let reordered = [6, 7, 4, 5, 2, 3, 0, 1].map(|i| fields[i]).join("|");
        let loaded = ValueTable::from_reader(&mut reordered.as_bytes()).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_load_rejects_malformed_input() {
        let zeros = vec!["0"; TABLE_LEN].join(",");
        let short = vec!["0"; TABLE_LEN - 1].join(",");
        let bad_float = format!("nope,{}", vec!["0"; TABLE_LEN - 1].join(","));

        let wrong_field_count = format!("w|{zeros}|d|{zeros}|s|{zeros}");
        let unknown_symbol = format!("w|{zeros}|d|{zeros}|s|{zeros}|x|{zeros}");
        let duplicate_symbol = format!("w|{zeros}|d|{zeros}|s|{zeros}|w|{zeros}");
        let wrong_len = format!("w|{zeros}|d|{zeros}|s|{zeros}|a|{short}");
        let unparsable = format!("w|{zeros}|d|{zeros}|s|{zeros}|a|{bad_float}");

        for text in [
            wrong_field_count,
            unknown_symbol,
            duplicate_symbol,
            wrong_len,
            unparsable,
        ] {
            let result = ValueTable::from_reader(&mut text.as_bytes());
            assert!(
                matches!(result, Err(WeightTableError::Malformed { .. })),
                "expected a malformed-table error",
            );
        }
    }
}
