//! This crate contains the source code for the binary for the game maze-runner.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The package has no public repository or readme yet."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use maze_runner::{config::Args, logging, App};
use tracing::info;

fn main() -> Result<()> {
    install()?;

    let args = Args::parse();
    logging::init(args.log_file.as_deref(), args.verbose)?;
    let settings = args.settings()?;
    info!(?settings, "starting");

    let mut app = App::new(settings)?;
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
