use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{CollisionPolicy, Config};
use crate::food::{Food, FoodPlacement};
use crate::grid::Grid;
use crate::snake::{Direction, Snake, TickResult::{self, *}};
use crate::Cell;

/// Everything a renderer needs after a tick.
#[derive(Debug)]
pub struct Frame<'a> {
    pub snake: &'a Snake,
    pub food: Cell,
    /// `None` when the whole board should be drawn from scratch.
    pub outcome: Option<TickResult>,
    pub game_over: bool,
}

impl Frame<'_> {
    pub fn collided(&self) -> bool {
        matches!(self.outcome, Some(Collided { .. }))
    }

    pub fn grew(&self) -> bool {
        matches!(self.outcome, Some(Grew { .. }))
    }
}

/// The snake, its food and the board they live on.
pub struct World<R = StdRng> {
    grid: Grid,
    snake: Snake,
    food: Food,
    placement: FoodPlacement,
    on_collision: CollisionPolicy,
    game_over: bool,
    rng: R,
}

impl World<StdRng> {
    /// Seeds from `config.seed`, or from the OS when there is none.
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        World::with_rng(config, rng)
    }
}

impl<R: Rng> World<R> {
    pub fn with_rng(config: &Config, mut rng: R) -> Self {
        let grid = config.grid;
        let snake = Snake::new(grid.center());
        let food = Food::spawn(&grid, config.food, &snake, &mut rng);

        World {
            grid,
            snake,
            food,
            placement: config.food,
            on_collision: config.on_collision,
            game_over: false,
            rng,
        }
    }

    pub fn steer(&mut self, direction: Direction) {
        if !self.game_over {
            self.snake.set_pending_direction(direction);
        }
    }

    /// Advances the snake one step. Returns `None` while the game is over.
    pub fn tick(&mut self) -> Option<TickResult> {
        if self.game_over {
            return None;
        }

        let res = self.snake.tick(&self.grid, self.food.position());

        match res {
            Moved { .. } => {}
            Grew { new_head } => {
                self.respawn_food();
                log::debug!("ate at {:?}, length {}, next food at {:?}",
                    new_head, self.snake.len(), self.food.position());
            }
            Collided { at } => {
                log::info!("snake of length {} bit itself at {:?}", self.snake.len(), at);
                match self.on_collision {
                    CollisionPolicy::Restart => self.reset(),
                    CollisionPolicy::GameOver => self.game_over = true,
                }
            }
        }

        Some(res)
    }

    /// Starts over with a fresh snake and fresh food.
    pub fn restart(&mut self) {
        self.reset();
        self.game_over = false;
    }

    /// Replaces the current food.
    pub fn place_food(&mut self, position: Cell) {
        self.food = Food::at(position);
    }

    /// Replaces the snake; the next tick continues from it.
    pub fn replace_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    fn reset(&mut self) {
        self.snake.reset(self.grid.center());
        self.respawn_food();
    }

    fn respawn_food(&mut self) {
        self.food = Food::spawn(&self.grid, self.placement, &self.snake, &mut self.rng);
    }
}

impl<R> World<R> {
    pub fn frame(&self, outcome: Option<TickResult>) -> Frame<'_> {
        Frame { snake: &self.snake, food: self.food.position(), outcome, game_over: self.game_over }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food.position()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::rngs::mock::StepRng;

    fn world(on_collision: CollisionPolicy) -> World<StepRng> {
        let config = Config { on_collision, ..Config::default() };
        World::with_rng(&config, StepRng::new(0, 0))
    }

    fn body<R>(w: &World<R>) -> Vec<Cell> {
        w.snake().segments().copied().collect()
    }

    fn looped_snake() -> Snake {
        // Heading down onto its own tail.
        Snake::from_segments(vec![(5, 5), (5, 4), (4, 4), (4, 5), (4, 6), (5, 6)], Down).unwrap()
    }

    #[test]
    fn starts_at_the_center() {
        let w = world(CollisionPolicy::Restart);
        assert_eq!(body(&w), vec![(16, 12)]);
        assert_eq!(w.snake().direction(), Right);
        assert_eq!(w.food(), (0, 0));
        assert!(!w.is_game_over());
    }

    #[test]
    fn move_does_not_touch_food() {
        let mut w = world(CollisionPolicy::Restart);
        w.place_food((3, 3));
        assert_eq!(w.tick(), Some(Moved { new_head: (17, 12), old_tail: (16, 12) }));
        assert_eq!(w.food(), (3, 3));
    }

    #[test]
    fn growing_respawns_food() {
        let mut w = world(CollisionPolicy::Restart);
        w.place_food((17, 12));

        let res = w.tick();
        assert_eq!(res, Some(Grew { new_head: (17, 12) }));
        assert_eq!(w.snake().len(), 2);
        assert_eq!(w.food(), (0, 0));

        let frame = w.frame(res);
        assert!(frame.grew());
        assert!(!frame.collided());
    }

    #[test]
    fn restart_policy_resets_the_snake() {
        let mut w = world(CollisionPolicy::Restart);
        w.replace_snake(looped_snake());
        w.place_food((9, 9));

        let res = w.tick();
        assert_eq!(res, Some(Collided { at: (5, 6) }));
        assert_eq!(body(&w), vec![(16, 12)]);
        assert_eq!(w.snake().direction(), Right);
        assert_eq!(w.food(), (0, 0));
        assert!(!w.is_game_over());
        assert!(w.frame(res).collided());
    }

    #[test]
    fn hitting_the_body_before_the_tail_also_resets() {
        let mut w = world(CollisionPolicy::Restart);
        // Same coil with one more segment, so (5, 6) is not the tail.
        let coil = Snake::from_segments(
            vec![(5, 5), (5, 4), (4, 4), (4, 5), (4, 6), (5, 6), (6, 6)],
            Down,
        ).unwrap();
        w.replace_snake(coil);
        w.place_food((9, 9));

        assert_eq!(w.tick(), Some(Collided { at: (5, 6) }));
        assert_eq!(body(&w), vec![(16, 12)]);
        assert_eq!(w.snake().direction(), Right);
    }

    #[test]
    fn game_over_policy_freezes_the_world() {
        let mut w = world(CollisionPolicy::GameOver);
        w.replace_snake(looped_snake());
        w.place_food((9, 9));

        assert_eq!(w.tick(), Some(Collided { at: (5, 6) }));
        assert!(w.is_game_over());
        assert_eq!(w.snake().len(), 6);

        w.steer(Left);
        assert_eq!(w.tick(), None);
        assert_eq!(w.snake(), &looped_snake());
        assert_eq!(w.food(), (9, 9));
        assert!(w.frame(None).game_over);
    }

    #[test]
    fn restart_leaves_game_over() {
        let mut w = world(CollisionPolicy::GameOver);
        w.replace_snake(looped_snake());
        w.tick();

        w.restart();
        assert!(!w.is_game_over());
        assert_eq!(body(&w), vec![(16, 12)]);
        assert!(w.tick().is_some());
    }

    #[test]
    fn seeded_worlds_place_food_identically() {
        let config = Config { seed: Some(42), ..Config::default() };
        let a = World::new(&config);
        let b = World::new(&config);
        assert_eq!(a.food(), b.food());
    }
}
