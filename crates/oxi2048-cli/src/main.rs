mod command;
mod stats;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
