use arrayvec::ArrayVec;
use rand::Rng as _;

use crate::core::{Action, Grid, WIN_RANK};

use super::tile_spawner::{SpawnSeed, TileSpawner};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TerminalState {
    /// A tile reached [`WIN_RANK`].
    Win,
    /// No legal move remains.
    Stuck,
}

/// A live game: the grid plus its tile spawner.
///
/// Candidate moves are evaluated on copies of [`Self::grid`]; only
/// [`Self::update`] (and [`Self::reset`]) mutate the real game.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    spawner: TileSpawner,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a freshly reset game with a random spawn seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic
    /// spawning.
    #[must_use]
    pub fn with_seed(seed: SpawnSeed) -> Self {
        let mut this = Self {
            grid: Grid::EMPTY,
            spawner: TileSpawner::with_seed(seed),
        };
        this.reset();
        this
    }

    /// Creates a game over a scripted grid, with a random spawn seed.
    ///
    /// Intended for replaying positions and tests.
    #[must_use]
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            spawner: TileSpawner::new(),
        }
    }

    /// Starts a new game: clears the grid and spawns two tiles.
    pub fn reset(&mut self) {
        self.grid = Grid::EMPTY;
        self.spawner.spawn(&mut self.grid);
        self.spawner.spawn(&mut self.grid);
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Spawns one tile on an empty cell; no-op when the grid is full.
    pub fn spawn(&mut self) {
        self.spawner.spawn(&mut self.grid);
    }

    #[must_use]
    pub fn is_legal(&self, action: Action) -> bool {
        self.grid.is_legal(action)
    }

    /// The legal subset of [`Action::ALL`], in canonical order.
    #[must_use]
    pub fn legal_actions(&self) -> ArrayVec<Action, { Action::COUNT }> {
        Action::ALL
            .into_iter()
            .filter(|&action| self.grid.is_legal(action))
            .collect()
    }

    /// Applies the action and spawns the next tile, returning the move
    /// reward.
    pub fn update(&mut self, action: Action) -> u32 {
        let reward = self.grid.apply_action(action);
        self.spawn();
        reward
    }

    /// Whether and why the game has ended; the win check comes first.
    #[must_use]
    pub fn terminal_state(&self) -> Option<TerminalState> {
        if self.grid.highest_rank() >= WIN_RANK {
            return Some(TerminalState::Win);
        }
        if Action::ALL.iter().any(|&action| self.grid.is_legal(action)) {
            None
        } else {
            Some(TerminalState::Stuck)
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal_state().is_some()
    }

    #[must_use]
    pub fn highest_rank(&self) -> u8 {
        self.grid.highest_rank()
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.grid.total_score()
    }
}
