use oxi2048_engine::{Action, GameState, Grid};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng, seq::IndexedRandom as _};

use crate::{
    network::TupleNetwork,
    tuple_set::{TUPLE_COUNT, TupleState},
};

/// Probability of taking a uniformly random legal action while training.
const EXPLORATION_RATE: f64 = 0.4;
/// Step size of the temporal-difference update.
const LEARNING_RATE: f32 = 0.01;

/// Whether the agent learns from its steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum AgentMode {
    /// Epsilon-greedy play with a TD update after every step.
    Training,
    /// Pure exploitation; the value table is never written.
    Evaluation,
}

/// What one decision step did to the real game.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    pub action: Action,
    pub reward: u32,
}

/// One evaluated candidate move: the action, the tuple encoding of its
/// afterstate, and its score (reward plus afterstate value).
#[derive(Debug, Clone)]
struct Choice {
    action: Action,
    states: [TupleState; TUPLE_COUNT],
    score: f32,
}

/// The playing-and-learning agent.
///
/// Decisions come from one-step afterstate lookahead: every candidate move
/// is simulated on a grid copy (move and merge only, no spawn) and scored as
/// its reward plus the network's value of the afterstate. While training,
/// the afterstate's weights are then nudged toward a bootstrap target read
/// from the post-spawn board.
///
/// The agent carries no cross-trial state of its own; everything learned
/// lives in the shared [`TupleNetwork`].
#[derive(Debug)]
pub struct Agent {
    mode: AgentMode,
    exploration_rate: f64,
    rng: StdRng,
}

impl Agent {
    /// Creates an agent with a randomly seeded exploration RNG.
    #[must_use]
    pub fn new(mode: AgentMode) -> Self {
        Self::with_seed(mode, rand::rng().random())
    }

    /// Like [`Self::new`], but seeded for reproducible action selection.
    #[must_use]
    pub fn with_seed(mode: AgentMode, seed: u64) -> Self {
        let exploration_rate = match mode {
            AgentMode::Training => EXPLORATION_RATE,
            AgentMode::Evaluation => 0.0,
        };
        Self {
            mode,
            exploration_rate,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    /// Simulates one candidate on a grid copy; the real grid is untouched.
    fn simulate(grid: &Grid, action: Action, network: &TupleNetwork) -> Choice {
        let mut afterstate = *grid;
        let reward = afterstate.apply_action(action);
        let states = network.states_of(&afterstate);
        #[expect(clippy::cast_precision_loss)]
        let score = reward as f32 + network.evaluate(action, &states);
        Choice {
            action,
            states,
            score,
        }
    }

    /// The best candidate by one-step afterstate lookahead.
    ///
    /// Ties keep the earliest candidate. Callers must have confirmed the
    /// game is non-terminal; an empty candidate list is a contract
    /// violation.
    fn best_choice(grid: &Grid, candidates: &[Action], network: &TupleNetwork) -> Choice {
        assert!(
            !candidates.is_empty(),
            "candidate selection requires at least one legal action"
        );
        let mut best = Self::simulate(grid, candidates[0], network);
        for &action in &candidates[1..] {
            let choice = Self::simulate(grid, action, network);
            if choice.score > best.score {
                best = choice;
            }
        }
        best
    }

    /// The action the agent would exploit right now; `None` on a terminal
    /// game.
    #[must_use]
    pub fn recommend(&self, game: &GameState, network: &TupleNetwork) -> Option<Action> {
        let legal = game.legal_actions();
        if legal.is_empty() {
            return None;
        }
        Some(Self::best_choice(game.grid(), &legal, network).action)
    }

    /// Runs one decision-and-learning cycle on the live game.
    ///
    /// Picks an action epsilon-greedily, commits it (move, merge, spawn),
    /// and — while training — applies a TD(0) update to the chosen
    /// afterstate's weights.
    ///
    /// # Panics
    ///
    /// Panics if the game has no legal action; callers drive the loop via
    /// [`GameState::is_terminal`].
    pub fn step(&mut self, game: &mut GameState, network: &mut TupleNetwork) -> StepOutcome {
        let legal = game.legal_actions();
        assert!(!legal.is_empty(), "step requires a non-terminal game");

        // Exploratory draw first; replaced by the greedy candidate with
        // probability 1 - exploration rate.
        let exploratory = *legal
            .choose(&mut self.rng)
            .expect("at least one legal action");
        let mut choice = Self::simulate(game.grid(), exploratory, network);
        if self.rng.random_bool(1.0 - self.exploration_rate) {
            choice = Self::best_choice(game.grid(), &legal, network);
        }

        let reward = game.update(choice.action);

        if self.mode.is_evaluation() {
            return StepOutcome {
                action: choice.action,
                reward,
            };
        }

        // TD(0): the bootstrap target is the post-spawn board's best
        // candidate score, and the error is measured against that bootstrap
        // action's weights of the afterstate committed above. A terminal
        // post-spawn board contributes a zero error.
        let mut td_error = 0.0;
        if !game.is_terminal() {
            let next = Self::best_choice(game.grid(), &game.legal_actions(), network);
            td_error = next.score - network.evaluate(next.action, &choice.states);
        }
        network.reinforce(choice.action, &choice.states, td_error * LEARNING_RATE);

        StepOutcome {
            action: choice.action,
            reward,
        }
    }
}

#[cfg(test)]
mod tests {
    use oxi2048_engine::Grid;

    use super::*;

    fn stuck_game() -> GameState {
        GameState::with_grid(Grid::from_ranks([
            [1, 2, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 1, 2],
            [2, 1, 2, 1],
        ]))
    }

    #[test]
    fn test_recommend_none_on_terminal_game() {
        let agent = Agent::new(AgentMode::Evaluation);
        let network = TupleNetwork::new();
        assert_eq!(agent.recommend(&stuck_game(), &network), None);
    }

    #[test]
    fn test_recommend_prefers_earliest_on_ties() {
        // A lone tile moves in any direction without merging; under a zero
        // table every candidate scores 0, so the first legal action wins.
        let game = GameState::with_grid(Grid::from_ranks([
            [0, 0, 0, 0],
            [0, 1, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]));
        let agent = Agent::new(AgentMode::Evaluation);
        let network = TupleNetwork::new();
        assert_eq!(agent.recommend(&game, &network), Some(Action::Up));
    }

    #[test]
    fn test_recommend_prefers_higher_reward() {
        // Up is illegal; Right and Left both merge for 4, Down moves without
        // merging. Right is evaluated before Left and wins the tie.
        let game = GameState::with_grid(Grid::from_ranks([
            [1, 1, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]));
        let agent = Agent::new(AgentMode::Evaluation);
        let network = TupleNetwork::new();
        assert_eq!(agent.recommend(&game, &network), Some(Action::Right));
    }

    #[test]
    fn test_recommend_follows_learned_weights() {
        let game = GameState::with_grid(Grid::from_ranks([
            [0, 0, 0, 0],
            [0, 1, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]));
        let network = TupleNetwork::new();

        // Weight the Down afterstate (tile at the bottom of column 1).
        let mut after = *game.grid();
        after.apply_action(Action::Down);
        let states = network.states_of(&after);
        let mut network = network;
        network.reinforce(Action::Down, &states, 1.0);

        let agent = Agent::new(AgentMode::Evaluation);
        assert_eq!(agent.recommend(&game, &network), Some(Action::Down));
    }

    #[test]
    #[should_panic(expected = "non-terminal")]
    fn test_step_panics_on_terminal_game() {
        let mut agent = Agent::new(AgentMode::Training);
        let mut network = TupleNetwork::new();
        let mut game = stuck_game();
        agent.step(&mut game, &mut network);
    }

    #[test]
    fn test_evaluation_step_never_writes_the_table() {
        let mut agent = Agent::new(AgentMode::Evaluation);
        let mut network = TupleNetwork::new();
        let mut game = GameState::new();
        let before = network.table().clone();

        for _ in 0..10 {
            if game.is_terminal() {
                game.reset();
            }
            agent.step(&mut game, &mut network);
        }
        assert_eq!(network.table(), &before);
    }

    #[test]
    fn test_training_updates_the_table() {
        let mut agent = Agent::new(AgentMode::Training);
        let mut network = TupleNetwork::new();
        let mut game = GameState::new();
        let zero = network.table().clone();

        // Merges earn rewards early, so a few episodes are plenty to move
        // at least one weight off zero.
        for _ in 0..5 {
            game.reset();
            while !game.is_terminal() {
                agent.step(&mut game, &mut network);
            }
        }
        assert_ne!(network.table(), &zero);
    }

    #[test]
    fn test_step_reports_the_committed_action() {
        let mut agent = Agent::new(AgentMode::Training);
        let mut network = TupleNetwork::new();
        let mut game = GameState::new();

        let before = *game.grid();
        let outcome = agent.step(&mut game, &mut network);
        assert!(before.is_legal(outcome.action));
        assert_ne!(game.grid(), &before, "a legal move plus a spawn changed the grid");
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        use oxi2048_engine::SpawnSeed;
        use rand::Rng as _;

        let spawn_seed: SpawnSeed = rand::rng().random();
        let run = |agent_seed: u64| {
            let mut agent = Agent::with_seed(AgentMode::Training, agent_seed);
            let mut network = TupleNetwork::new();
            let mut game = GameState::with_seed(spawn_seed);
            for _ in 0..3 {
                game.reset();
                while !game.is_terminal() {
                    agent.step(&mut game, &mut network);
                }
            }
            network
        };

        let first = run(42);
        let second = run(42);
        assert_eq!(first.table(), second.table());
    }
}
