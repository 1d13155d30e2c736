pub use self::{action::*, grid::*};

pub(crate) mod action;
pub(crate) mod grid;
