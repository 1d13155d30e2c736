//! N-tuple temporal-difference learning for the 2048 engine.
//!
//! The value function is an additive N-tuple network: 17 fixed 4-cell board
//! tuples ([`TupleSet`]), each with its own per-action lookup table of
//! learned weights ([`ValueTable`]). A board's value under an action is the
//! plain sum of its 17 per-tuple weights.
//!
//! [`TupleNetwork`] bundles the tuple catalogue with the value table into one
//! owned model, and [`Agent`] runs the decision-and-learning cycle against
//! it: epsilon-greedy action selection by one-step afterstate lookahead,
//! followed by a TD(0) update of the afterstate's weights.

pub use self::{agent::*, network::*, tuple_set::*, value_table::*};

pub mod agent;
pub mod network;
pub mod tuple_set;
pub mod value_table;
