use std::path::PathBuf;

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal,
};
use oxi2048_agent::{Agent, AgentMode, TupleNetwork};
use oxi2048_engine::{Action, GameState, TerminalState};

use crate::{util, view};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Trained weight file for move recommendations (untrained when omitted)
    #[arg(long)]
    weights: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { weights } = arg;

    let network = match weights {
        Some(path) => TupleNetwork::with_table(util::read_weight_table(path)?),
        None => TupleNetwork::new(),
    };
    let agent = Agent::new(AgentMode::Evaluation);
    let mut game = GameState::new();

    println!("Keys: w = up, a = left, s = down, d = right, q = quit");
    while !game.is_terminal() {
        println!();
        println!("{}", view::render_grid(game.grid()));
        if let Some(action) = agent.recommend(&game, &network) {
            println!("The agent recommends: {action} ({})", action.symbol());
        }

        let Some(action) = read_action()? else {
            println!("Bye.");
            return Ok(());
        };
        if !game.is_legal(action) {
            println!("{action} does not move anything.");
            continue;
        }
        game.update(action);
    }

    println!();
    println!("{}", view::render_grid(game.grid()));
    match game.terminal_state() {
        Some(TerminalState::Win) => println!("You win! Score: {}", game.total_score()),
        Some(TerminalState::Stuck) => {
            println!("No moves left. Score: {}", game.total_score());
        }
        None => unreachable!("the play loop only exits on a terminal game"),
    }

    Ok(())
}

/// Blocks for one action keystroke; `None` means quit.
fn read_action() -> anyhow::Result<Option<Action>> {
    terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
    let action = wait_for_action();
    terminal::disable_raw_mode().context("Failed to disable raw terminal mode")?;
    action
}

fn wait_for_action() -> anyhow::Result<Option<Action>> {
    loop {
        let Event::Key(KeyEvent { code, kind, .. }) =
            event::read().context("Failed to read terminal event")?
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
            KeyCode::Char(ch) => {
                if let Some(action) = Action::from_symbol(ch) {
                    return Ok(Some(action));
                }
            }
            _ => {}
        }
    }
}
