use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

use snake::config::Args;
use snake::game::SnakeGame;
use snake::term::TermManager;
use snake::world::World;

fn main() -> Result<()> {
    let args = Args::parse();

    // The terminal is in raw mode while playing, so logs only ever go to a file
    if let Some(path) = &args.log_file {
        let level = if args.verbose {LevelFilter::Debug} else {LevelFilter::Info};
        let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
        WriteLogger::init(level, LogConfig::default(), file).context("installing logger")?;
    }

    let config = args.into_config()?;
    log::info!("starting on a {}x{} board at {} ticks/s",
        config.grid.width(), config.grid.height(), config.tick_rate);

    let mut term = TermManager::new(&config)?;
    let mut game = SnakeGame::new(World::new(&config), config.tick_interval());

    term.setup()?;
    let result = game.play(&mut term);
    term.restore()?;

    let summary = result?;
    log::info!("{} ticks, {} collisions, longest snake {}", summary.ticks, summary.collisions, summary.longest);
    Ok(())
}
