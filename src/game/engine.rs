use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use super::{
    config::{FOOD_REWARD, GameConfig, INITIAL_HEAD},
    direction::{Direction, heading_delta},
    state::{CollisionType, GameStatus, Position, Snake},
};
use crate::error::ConfigError;
use crate::scoreboard::Scoreboard;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether the move ended the game
    pub collided: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// Cell the head moved into
    pub new_head: Position,
}

/// The game engine that owns all game state
///
/// The host drives it: `tick` on a fixed timer while the status is
/// [`GameStatus::Running`], `set_direction` from keyboard input, and the
/// lifecycle calls from its controls. Nothing here schedules itself.
pub struct GameEngine<S = Box<dyn Scoreboard>> {
    config: GameConfig,
    snake: Snake,
    food: Position,
    /// Direction of the last move, `None` until the first start
    heading: Option<Direction>,
    /// Latest accepted turn, applied by the next tick
    queued: Option<Direction>,
    score: u32,
    high_score: u32,
    /// Set when the last game over beat the stored high score
    new_high_score: bool,
    status: GameStatus,
    rng: StdRng,
    scoreboard: S,
}

impl<S: Scoreboard> GameEngine<S> {
    /// Create a new engine, seeding the high score from `scoreboard`
    pub fn new(config: GameConfig, scoreboard: S) -> Result<Self, ConfigError> {
        Self::with_rng(config, scoreboard, StdRng::from_entropy())
    }

    /// Like [`GameEngine::new`] but with a reproducible food sequence
    pub fn with_seed(config: GameConfig, scoreboard: S, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, scoreboard, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, scoreboard: S, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let high_score = scoreboard.load().unwrap_or_else(|e| {
            warn!("Failed to load high score, starting from 0: {}", e);
            0
        });

        let mut engine = Self {
            config,
            snake: Snake::new(INITIAL_HEAD),
            food: INITIAL_HEAD,
            heading: None,
            queued: None,
            score: 0,
            high_score,
            new_high_score: false,
            status: GameStatus::Idle,
            rng,
            scoreboard,
        };
        engine.food = engine.spawn_food_avoid_snake();

        info!(
            "Engine ready on a {}x{} board, high score {}",
            engine.config.tile_count, engine.config.tile_count, high_score
        );
        Ok(engine)
    }

    /// Start or resume the game. Ignored while running or after game over.
    pub fn start(&mut self) {
        match self.status {
            GameStatus::Running | GameStatus::Over => return,
            GameStatus::Idle | GameStatus::Paused => {}
        }

        if self.heading.is_none() {
            self.heading = Some(Direction::Right);
        }
        self.status = GameStatus::Running;
        info!("Game running (score {})", self.score);
    }

    pub fn pause(&mut self) {
        if self.status != GameStatus::Running {
            return;
        }
        self.status = GameStatus::Paused;
        info!("Game paused (score {})", self.score);
    }

    /// Back to a fresh single-segment snake. The high score is kept.
    pub fn reset(&mut self) {
        self.status = GameStatus::Idle;
        self.snake = Snake::new(INITIAL_HEAD);
        self.heading = None;
        self.queued = None;
        self.score = 0;
        self.new_high_score = false;
        self.food = self.spawn_food_avoid_snake();
        info!("Game reset");
    }

    /// Request a turn for the next tick.
    ///
    /// Returns whether the request was accepted. A request opposite to the
    /// stored direction (the queued turn, else the heading) is refused, and
    /// so is one opposite to the heading the snake is still moving in.
    /// Among accepted requests between two ticks the last one wins.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        let stored = self.queued.or(self.heading);
        for current in [stored, self.heading].into_iter().flatten() {
            if current.is_opposite(requested) {
                debug!("Ignoring reversal from {:?} to {:?}", current, requested);
                return false;
            }
        }

        self.queued = Some(requested);
        true
    }

    /// Advance the game by one cell. Returns `None` unless running.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.status != GameStatus::Running {
            return None;
        }

        if let Some(direction) = self.queued.take() {
            self.heading = Some(direction);
        }

        let (dx, dy) = heading_delta(self.heading);
        let new_head = self.snake.head().moved_by(dx, dy);

        // Checked before the move, so the tail still counts as body
        let collision = self.check_collision(new_head);
        self.snake.push_head(new_head);

        if let Some(collision_type) = collision {
            self.game_over(collision_type);
            return Some(TickOutcome {
                ate_food: false,
                collided: true,
                collision,
                new_head,
            });
        }

        let ate_food = new_head == self.food;
        if ate_food {
            self.score = self.score.saturating_add(FOOD_REWARD);
            self.food = self.spawn_food_avoid_snake();
            debug!(
                "Food eaten at {:?}, score {}, length {}",
                new_head,
                self.score,
                self.snake.len()
            );
        } else {
            self.snake.drop_tail();
        }

        Some(TickOutcome {
            ate_food,
            collided: false,
            collision: None,
            new_head,
        })
    }

    /// Check if moving the head to `pos` causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !pos.is_within(self.config.tile_count) {
            return Some(CollisionType::Wall);
        }

        if self.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn game_over(&mut self, collision: CollisionType) {
        self.status = GameStatus::Over;
        info!(
            "Game over ({:?}) with score {}, high score {}",
            collision, self.score, self.high_score
        );

        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
            info!("New high score: {}", self.high_score);
            if let Err(e) = self.scoreboard.persist(self.high_score) {
                warn!("Failed to persist high score {}: {}", self.high_score, e);
            }
        }
    }

    /// Spawn food at a random empty position
    fn spawn_food_avoid_snake(&mut self) -> Position {
        let tile_count = self.config.tile_count;
        if self.snake.len() >= tile_count.saturating_mul(tile_count) {
            warn!("Board is full, food stays at {:?}", self.food);
            return self.food;
        }

        loop {
            let x = self.rng.gen_range(0..tile_count) as i32;
            let y = self.rng.gen_range(0..tile_count) as i32;
            let pos = Position::new(x, y);

            if !self.snake.occupies(pos) {
                return pos;
            }
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tile_count(&self) -> usize {
        self.config.tile_count
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    pub fn queued_direction(&self) -> Option<Direction> {
        self.queued
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Whether the game that just ended beat the previous high score
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn scoreboard(&self) -> &S {
        &self.scoreboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreboardError;
    use crate::scoreboard::MemoryScoreboard;

    /// Scoreboard whose storage is gone
    struct BrokenScoreboard {
        attempts: usize,
    }

    impl Scoreboard for BrokenScoreboard {
        fn load(&self) -> Result<u32, ScoreboardError> {
            Err(ScoreboardError::unavailable("no storage"))
        }

        fn persist(&mut self, _value: u32) -> Result<(), ScoreboardError> {
            self.attempts += 1;
            Err(ScoreboardError::unavailable("no storage"))
        }
    }

    fn engine() -> GameEngine<MemoryScoreboard> {
        GameEngine::with_seed(GameConfig::default(), MemoryScoreboard::new(), 7).unwrap()
    }

    /// Put the engine in a running position with a hand-made board
    fn place<S: Scoreboard>(
        engine: &mut GameEngine<S>,
        segments: &[(i32, i32)],
        heading: Direction,
        food: (i32, i32),
    ) {
        engine.snake =
            Snake::from_segments(segments.iter().map(|&(x, y)| Position::new(x, y))).unwrap();
        engine.heading = Some(heading);
        engine.queued = None;
        engine.food = Position::new(food.0, food.1);
        engine.status = GameStatus::Running;
    }

    fn segments(engine: &GameEngine<MemoryScoreboard>) -> Vec<(i32, i32)> {
        engine.snake().segments().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();

        assert_eq!(engine.status(), GameStatus::Idle);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.heading(), None);
        assert_eq!(segments(&engine), vec![(10, 10)]);
        assert!(!engine.snake().occupies(engine.food()));
        assert!(engine.food().is_within(20));
    }

    #[test]
    fn test_rejects_oversized_board() {
        let result = GameEngine::new(GameConfig::new(usize::MAX), MemoryScoreboard::new());
        assert!(matches!(result, Err(ConfigError::TileCountTooLarge { .. })));
    }

    #[test]
    fn test_rejects_small_board() {
        let result = GameEngine::new(GameConfig::new(10), MemoryScoreboard::new());
        assert!(matches!(
            result,
            Err(ConfigError::TileCountTooSmall { tile_count: 10, .. })
        ));
    }

    #[test]
    fn test_high_score_seeded_from_scoreboard() {
        let engine = GameEngine::new(GameConfig::default(), MemoryScoreboard::with_value(80)).unwrap();
        assert_eq!(engine.high_score(), 80);

        let broken = GameEngine::new(GameConfig::default(), BrokenScoreboard { attempts: 0 }).unwrap();
        assert_eq!(broken.high_score(), 0);
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameEngine::with_seed(GameConfig::default(), MemoryScoreboard::new(), 42).unwrap();
        let b = GameEngine::with_seed(GameConfig::default(), MemoryScoreboard::new(), 42).unwrap();
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn test_start_heads_right() {
        let mut engine = engine();
        engine.start();

        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.heading(), Some(Direction::Right));
    }

    #[test]
    fn test_pause_and_resume_keep_board() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5), (4, 5)], Direction::Down, (15, 15));
        engine.score = 20;

        engine.pause();
        assert_eq!(engine.status(), GameStatus::Paused);

        engine.start();
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.heading(), Some(Direction::Down));
        assert_eq!(segments(&engine), vec![(5, 5), (4, 5)]);
        assert_eq!(engine.score(), 20);
        assert_eq!(engine.food(), Position::new(15, 15));
    }

    #[test]
    fn test_pause_only_while_running() {
        let mut engine = engine();
        engine.pause();
        assert_eq!(engine.status(), GameStatus::Idle);
    }

    #[test]
    fn test_start_after_game_over_is_ignored() {
        let mut engine = engine();
        place(&mut engine, &[(19, 10)], Direction::Right, (0, 0));
        engine.tick();
        assert_eq!(engine.status(), GameStatus::Over);

        engine.start();
        assert_eq!(engine.status(), GameStatus::Over);
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let mut engine = engine();
        let food = engine.food();

        assert_eq!(engine.tick(), None);
        assert_eq!(segments(&engine), vec![(10, 10)]);
        assert_eq!(engine.food(), food);

        engine.start();
        engine.pause();
        let before = segments(&engine);
        assert_eq!(engine.tick(), None);
        assert_eq!(segments(&engine), before);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_set_direction_ignored_unless_running() {
        let mut engine = engine();
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.queued_direction(), None);
    }

    #[test]
    fn test_reversal_rejected() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5), (4, 5), (3, 5)], Direction::Right, (15, 15));

        assert!(!engine.set_direction(Direction::Left));
        engine.tick();

        assert_eq!(engine.heading(), Some(Direction::Right));
        assert_eq!(engine.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn test_reversal_rejected_right_after_start() {
        let mut engine = engine();
        engine.start();
        assert!(!engine.set_direction(Direction::Left));
        assert!(engine.set_direction(Direction::Up));
    }

    #[test]
    fn test_last_turn_before_tick_wins() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5), (4, 5)], Direction::Right, (15, 15));

        assert!(engine.set_direction(Direction::Up));
        assert!(engine.set_direction(Direction::Right));
        engine.tick();

        assert_eq!(engine.heading(), Some(Direction::Right));
        assert_eq!(engine.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn test_turn_opposite_to_queued_rejected() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5), (4, 5)], Direction::Right, (15, 15));

        assert!(engine.set_direction(Direction::Up));
        assert!(!engine.set_direction(Direction::Down));
        assert_eq!(engine.queued_direction(), Some(Direction::Up));

        engine.tick();
        assert_eq!(engine.heading(), Some(Direction::Up));
        assert_eq!(engine.snake().head(), Position::new(5, 4));
    }

    #[test]
    fn test_double_turn_cannot_reverse_within_one_tick() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5), (4, 5)], Direction::Right, (15, 15));

        assert!(engine.set_direction(Direction::Up));
        // Left is fine after Up, but the snake is still moving Right
        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.queued_direction(), Some(Direction::Up));
        engine.tick();

        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.snake().head(), Position::new(5, 4));
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5)], Direction::Right, (15, 15));

        engine.set_direction(Direction::Down);
        assert_eq!(engine.heading(), Some(Direction::Right));
        assert_eq!(engine.snake().head(), Position::new(5, 5));

        engine.tick();
        assert_eq!(engine.snake().head(), Position::new(5, 6));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        place(&mut engine, &[(10, 10)], Direction::Right, (11, 10));

        let outcome = engine.tick().unwrap();

        assert!(outcome.ate_food);
        assert!(!outcome.collided);
        assert_eq!(outcome.new_head, Position::new(11, 10));
        assert_eq!(engine.score(), 10);
        assert_eq!(segments(&engine), vec![(11, 10), (10, 10)]);
        assert!(!engine.snake().occupies(engine.food()));
    }

    #[test]
    fn test_score_saturates() {
        let mut engine = engine();
        place(&mut engine, &[(10, 10)], Direction::Right, (11, 10));
        engine.score = u32::MAX - 5;

        let outcome = engine.tick().unwrap();

        assert!(outcome.ate_food);
        assert_eq!(engine.score(), u32::MAX);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5), (4, 5), (3, 5)], Direction::Right, (15, 15));

        let outcome = engine.tick().unwrap();

        assert!(!outcome.ate_food);
        assert!(!outcome.collided);
        assert_eq!(segments(&engine), vec![(6, 5), (5, 5), (4, 5)]);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        place(&mut engine, &[(19, 10)], Direction::Right, (0, 0));

        let outcome = engine.tick().unwrap();

        assert!(outcome.collided);
        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert_eq!(engine.status(), GameStatus::Over);
        // fatal head stays on the snake for the final frame
        assert_eq!(segments(&engine), vec![(20, 10), (19, 10)]);
    }

    #[test]
    fn test_self_collision_into_loop() {
        let mut engine = engine();
        place(
            &mut engine,
            &[(5, 5), (6, 5), (6, 6), (5, 6)],
            Direction::Left,
            (15, 15),
        );
        assert!(engine.set_direction(Direction::Down));

        let outcome = engine.tick().unwrap();

        assert!(outcome.collided);
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.status(), GameStatus::Over);
        assert_eq!(engine.snake().len(), 5);
    }

    #[test]
    fn test_moving_into_old_tail_collides() {
        let mut engine = engine();
        place(&mut engine, &[(5, 5), (5, 6), (6, 6), (6, 5)], Direction::Up, (15, 15));
        engine.set_direction(Direction::Right);

        let outcome = engine.tick().unwrap();
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_new_high_score_persisted_once() {
        let mut engine =
            GameEngine::with_seed(GameConfig::default(), MemoryScoreboard::with_value(30), 1).unwrap();
        place(&mut engine, &[(19, 10)], Direction::Right, (2, 2));
        engine.score = 50;

        engine.tick();

        assert_eq!(engine.high_score(), 50);
        assert!(engine.is_new_high_score());
        assert_eq!(engine.scoreboard().writes(), 1);
        assert_eq!(engine.scoreboard().load().unwrap(), 50);

        // Extra ticks after game over do nothing
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.scoreboard().writes(), 1);
    }

    #[test]
    fn test_lower_score_not_persisted() {
        let mut engine =
            GameEngine::with_seed(GameConfig::default(), MemoryScoreboard::with_value(30), 1).unwrap();
        place(&mut engine, &[(19, 10)], Direction::Right, (2, 2));
        engine.score = 30;

        engine.tick();

        assert_eq!(engine.high_score(), 30);
        assert!(!engine.is_new_high_score());
        assert_eq!(engine.scoreboard().writes(), 0);
    }

    #[test]
    fn test_persist_failure_keeps_session_high_score() {
        let mut engine =
            GameEngine::with_seed(GameConfig::default(), BrokenScoreboard { attempts: 0 }, 3).unwrap();
        place(&mut engine, &[(0, 3)], Direction::Left, (2, 2));
        engine.score = 40;

        let outcome = engine.tick().unwrap();

        assert!(outcome.collided);
        assert_eq!(engine.status(), GameStatus::Over);
        assert_eq!(engine.high_score(), 40);
        assert_eq!(engine.scoreboard().attempts, 1);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut engine =
            GameEngine::with_seed(GameConfig::default(), MemoryScoreboard::with_value(10), 5).unwrap();
        place(&mut engine, &[(19, 10), (18, 10)], Direction::Right, (2, 2));
        engine.score = 60;
        engine.tick();
        assert_eq!(engine.high_score(), 60);

        engine.reset();

        assert_eq!(engine.status(), GameStatus::Idle);
        assert_eq!(segments(&engine), vec![(10, 10)]);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.heading(), None);
        assert_eq!(engine.high_score(), 60);
        assert!(!engine.is_new_high_score());
        assert!(!engine.snake().occupies(engine.food()));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut engine = engine();
        let mut rng = StdRng::seed_from_u64(99);
        let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

        for _ in 0..5_000 {
            if engine.status() == GameStatus::Over {
                engine.reset();
            }
            engine.start();

            if rng.gen_bool(0.3) {
                engine.set_direction(directions[rng.gen_range(0..4)]);
            }

            let length = engine.snake().len();
            let score = engine.score();
            let outcome = engine.tick().unwrap();

            if outcome.collided {
                assert_eq!(engine.status(), GameStatus::Over);
                continue;
            }

            assert!(engine.snake().segments().all(|p| p.is_within(20)));
            assert!(!engine.snake().occupies(engine.food()));
            if outcome.ate_food {
                assert_eq!(engine.snake().len(), length + 1);
                assert_eq!(engine.score(), score + 10);
            } else {
                assert_eq!(engine.snake().len(), length);
                assert_eq!(engine.score(), score);
            }
        }
    }
}
