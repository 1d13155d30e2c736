use std::path::PathBuf;

use chrono::{DateTime, Utc};
use oxi2048_agent::{Agent, AgentMode, TupleNetwork};
use oxi2048_engine::GameState;
use serde::Serialize;

use crate::{stats::TrialStats, util, util::Output};

const PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of games to train on
    #[arg(long, default_value_t = 100_000)]
    trials: usize,
    /// Weight file to write when training completes
    #[arg(long, default_value = "q_network.txt")]
    output: PathBuf,
    /// Write a JSON training summary (to stdout when no path is given)
    #[arg(long, num_args = 0..=1)]
    report: Option<Option<PathBuf>>,
}

#[derive(Debug, Serialize)]
struct TrainReport<'a> {
    trained_at: DateTime<Utc>,
    weight_file: &'a PathBuf,
    win_rate: f64,
    mean_score: f64,
    #[serde(flatten)]
    stats: &'a TrialStats,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        trials,
        output,
        report,
    } = arg;

    let mut network = TupleNetwork::new();
    let mut game = GameState::new();
    let mut agent = Agent::new(AgentMode::Training);
    let mut stats = TrialStats::new();

    eprintln!("Training for {trials} trials...");
    for trial in 0..*trials {
        game.reset();
        while !game.is_terminal() {
            agent.step(&mut game, &mut network);
        }
        stats.record(&game);

        if (trial + 1) % PROGRESS_INTERVAL == 0 {
            eprintln!(
                "  trial {:>7}: win rate {:.3}, mean score {:.1}",
                trial + 1,
                stats.win_rate(),
                stats.mean_score(),
            );
        }
    }

    util::write_weight_table(network.table(), output)?;

    eprintln!();
    eprintln!("Training completed.");
    eprintln!("  Weight file: {}", output.display());
    eprintln!("  Trials:     {}", stats.trials());
    eprintln!("  Wins:       {} ({:.3})", stats.wins(), stats.win_rate());
    eprintln!("  Mean score: {:.1}", stats.mean_score());
    eprintln!("  Best score: {}", stats.best_score());
    eprintln!("  Highest tiles:");
    for (rank, count) in stats.rank_distribution() {
        eprintln!("    {:>4}: {count}", 1 << rank);
    }

    if let Some(report_path) = report {
        let summary = TrainReport {
            trained_at: Utc::now(),
            weight_file: output,
            win_rate: stats.win_rate(),
            mean_score: stats.mean_score(),
            stats: &stats,
        };
        Output::save_json(&summary, report_path.clone())?;
    }

    Ok(())
}
