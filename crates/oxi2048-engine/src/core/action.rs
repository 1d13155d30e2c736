/// A move direction on the grid.
///
/// The four directions double as indices into the per-action value tables,
/// so [`Action::ALL`] fixes a canonical order that legal-action scans,
/// candidate evaluation, and weight-file serialization all share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    pub const COUNT: usize = 4;

    /// Canonical action order.
    pub const ALL: [Self; Self::COUNT] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Position of this action in [`Action::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Single-character symbol used in the weight file and for key input.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => 'w',
            Self::Right => 'd',
            Self::Down => 's',
            Self::Left => 'a',
        }
    }

    /// Inverse of [`Action::symbol`].
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'w' => Some(Self::Up),
            'd' => Some(Self::Right),
            's' => Some(Self::Down),
            'a' => Some(Self::Left),
            _ => None,
        }
    }

    /// Quarter turns that bring this direction onto [`Action::Left`].
    ///
    /// Moves are implemented once, as a leftward compaction; the grid is
    /// rotated by this many quarter turns first so the single implementation
    /// serves all four directions.
    #[must_use]
    pub(crate) const fn turns_to_left(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Up => 1,
            Self::Right => 2,
            Self::Down => 3,
        }
    }
}
