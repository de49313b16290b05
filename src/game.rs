use std::{cmp::max, thread::sleep, time::Duration};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;

use crate::snake::{Direction, TickResult::*};
use crate::world::{Frame, World};

/// One thing the player asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    Quit,
    /// Any other key. Only meaningful as "continue" on the game-over screen.
    Other,
}

pub trait InputSource {
    /// Everything queued since the last call, without blocking.
    fn poll_intents(&mut self) -> Result<Vec<Intent>>;

    /// Blocks until the player does something.
    fn wait_intent(&mut self) -> Result<Intent>;
}

pub trait RenderSink {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;

    fn show_game_over(&mut self, length: usize) -> Result<()>;
}

/// Counters for a finished session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub collisions: u64,
    pub longest: usize,
}

pub struct SnakeGame<R = StdRng> {
    world: World<R>,
    tick_interval: Duration,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(world: World<R>, tick_interval: Duration) -> Self {
        SnakeGame { world, tick_interval }
    }

    pub fn world(&self) -> &World<R> {
        &self.world
    }

    /// Runs until the input source asks to quit.
    pub fn play<T: InputSource + RenderSink>(&mut self, io: &mut T) -> Result<RunSummary> {
        let mut summary = RunSummary { longest: self.world.snake().len(), ..RunSummary::default() };

        io.render(&self.world.frame(None))?;

        loop {
            sleep(self.tick_interval);

            for intent in io.poll_intents()? {
                match intent {
                    Intent::Quit => {
                        log::info!("quit after {} ticks", summary.ticks);
                        return Ok(summary);
                    }
                    Intent::Turn(dir) => self.world.steer(dir),
                    Intent::Other => {}
                }
            }

            let outcome = self.world.tick();
            summary.ticks += 1;
            if let Some(Collided { .. }) = outcome {
                summary.collisions += 1;
            }
            summary.longest = max(summary.longest, self.world.snake().len());

            log::debug!("tick {}: {:?}", summary.ticks, outcome);
            io.render(&self.world.frame(outcome))?;

            if self.world.is_game_over() {
                io.show_game_over(self.world.snake().len())?;

                if io.wait_intent()? == Intent::Quit {
                    log::info!("quit on game over after {} ticks", summary.ticks);
                    return Ok(summary);
                }

                self.world.restart();
                io.render(&self.world.frame(None))?;
            }
        }
    }
}
