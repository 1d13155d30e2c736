use oxi2048_engine::{GameState, Grid, TerminalState, WIN_RANK};
use serde::Serialize;

const RANK_BUCKETS: usize = WIN_RANK as usize + 1;

/// Aggregated trial outcomes for the train and test modes.
#[derive(Debug, Clone, Serialize)]
pub struct TrialStats {
    trials: usize,
    wins: usize,
    total_score: u64,
    best_score: u32,
    best_grid: Option<Grid>,
    /// How many trials ended with each highest rank.
    highest_rank_counts: [usize; RANK_BUCKETS],
}

impl Default for TrialStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            trials: 0,
            wins: 0,
            total_score: 0,
            best_score: 0,
            best_grid: None,
            highest_rank_counts: [0; RANK_BUCKETS],
        }
    }

    /// Records one finished trial.
    pub fn record(&mut self, game: &GameState) {
        self.trials += 1;
        if game.terminal_state() == Some(TerminalState::Win) {
            self.wins += 1;
        }

        let score = game.total_score();
        self.total_score += u64::from(score);
        if self.best_grid.is_none() || score > self.best_score {
            self.best_score = score;
            self.best_grid = Some(*game.grid());
        }

        self.highest_rank_counts[usize::from(game.highest_rank())] += 1;
    }

    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    #[must_use]
    pub fn wins(&self) -> usize {
        self.wins
    }

    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.wins as f64 / self.trials as f64
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn mean_score(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.trials as f64
    }

    /// Highest-rank distribution over the recorded trials, highest first,
    /// empty buckets skipped.
    pub fn rank_distribution(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.highest_rank_counts
            .iter()
            .enumerate()
            .rev()
            .filter(|&(_, &count)| count > 0)
            .map(|(rank, &count)| (u8::try_from(rank).unwrap(), count))
    }
}
