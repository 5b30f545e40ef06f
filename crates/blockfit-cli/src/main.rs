mod best_score_file;
mod command;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
