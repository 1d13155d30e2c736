use clap::{Parser, Subcommand};

use self::{play::PlayArg, test::TestArg, train::TrainArg};

mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a fresh agent and write the learned weight file
    Train(#[clap(flatten)] TrainArg),
    /// Evaluate a trained weight file and report the win rate
    Test(#[clap(flatten)] TestArg),
    /// Play interactively with move recommendations
    Play(#[clap(flatten)] PlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Train(arg) => train::run(&arg),
        Mode::Test(arg) => test::run(&arg),
        Mode::Play(arg) => play::run(&arg),
    }
}
