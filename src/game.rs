use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::config::GameConfig;
use crate::storage::ScoreStore;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { x: self.x + dx, y: self.y + dy }
    }

    fn in_bounds(self, grid_size: i32) -> bool {
        (0..grid_size).contains(&self.x) && (0..grid_size).contains(&self.y)
    }

    fn wrapped(self, grid_size: i32) -> Self {
        Self {
            x: self.x.rem_euclid(grid_size),
            y: self.y.rem_euclid(grid_size),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step on the grid; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallMode {
    Wrap,
    Solid,
}

impl WallMode {
    pub fn toggled(self) -> Self {
        match self {
            WallMode::Wrap => WallMode::Solid,
            WallMode::Solid => WallMode::Wrap,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Paused,
    Running,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    HitWall,
    HitSelf,
    /// The snake covers every cell, so there is nowhere left to put food.
    BoardFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed.
    Idle,
    Moved,
    Ate,
    Ended(EndReason),
}

/// Read-only view handed to renderers once per frame.
pub struct Snapshot<'a> {
    pub grid_size: i32,
    pub snake: &'a VecDeque<Cell>,
    pub food: Option<Cell>,
    pub direction: Direction,
    pub score: u32,
    pub high_score: u32,
    pub speed: f32,
    pub wall_mode: WallMode,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
}

/// Single-owner game state. Every mutation goes through `advance`,
/// `set_direction`, `reset` or `toggle_wall_mode` (plus the phase controls),
/// none of which synchronize internally.
pub struct Game<S: ScoreStore> {
    config: GameConfig,
    snake: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Direction,
    food: Option<Cell>,
    score: u32,
    speed: f32,
    wall_mode: WallMode,
    phase: Phase,
    end_reason: Option<EndReason>,
    high_score: u32,
    store: S,
    rng: StdRng,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        Self::with_seed(config, store, rand::rng().random())
    }

    pub fn with_seed(config: GameConfig, store: S, seed: u64) -> Self {
        let high_score = store.load_high_score();
        log::info!("Loaded high score {}", high_score);
        let mut game = Self {
            snake: VecDeque::new(),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food: None,
            score: 0,
            speed: config.initial_speed(),
            wall_mode: config.wall_mode,
            phase: Phase::Paused,
            end_reason: None,
            high_score,
            store,
            rng: StdRng::seed_from_u64(seed),
            config,
        };
        game.reset();
        game
    }

    pub fn snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    pub fn head(&self) -> Cell {
        // The snake is never empty: reset seeds it and advance only ever
        // pops after pushing a new head.
        self.snake[0]
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn wall_mode(&self) -> WallMode {
        self.wall_mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Time between two `advance` calls at the current speed.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.speed)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid_size: self.config.grid_size,
            snake: &self.snake,
            food: self.food,
            direction: self.direction,
            score: self.score,
            high_score: self.high_score,
            speed: self.speed,
            wall_mode: self.wall_mode,
            phase: self.phase,
            end_reason: self.end_reason,
        }
    }

    /// Buffers a turn for the next tick. Reversing the committed direction
    /// is silently ignored.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.phase == Phase::Over || requested == self.direction.opposite() {
            return;
        }
        self.pending_direction = requested;
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            log::info!("Game running");
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            log::info!("Game paused at score {}", self.score);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Paused => self.start(),
            Phase::Running => self.pause(),
            Phase::Over => {}
        }
    }

    pub fn toggle_wall_mode(&mut self) {
        self.wall_mode = self.wall_mode.toggled();
        log::info!("Wall mode set to {:?}", self.wall_mode);
    }

    /// Restores the canonical starting position. Wall mode and the high
    /// score survive; the game is left paused.
    pub fn reset(&mut self) {
        let n = self.config.grid_size;
        let head = Cell::new(n / 2, n / 2);
        self.snake = VecDeque::from([head, Cell::new(head.x - 1, head.y)]);
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.food = Some(Cell::new(n * 3 / 4, n / 2));
        self.score = 0;
        self.speed = self.config.initial_speed();
        self.phase = Phase::Paused;
        self.end_reason = None;
    }

    /// One tick of movement. Does nothing unless the game is running.
    pub fn advance(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Idle;
        }

        self.direction = self.pending_direction;
        let grid_size = self.config.grid_size;
        let tentative = self.head().offset(self.direction);
        let new_head = match self.wall_mode {
            WallMode::Wrap => tentative.wrapped(grid_size),
            WallMode::Solid if tentative.in_bounds(grid_size) => tentative,
            WallMode::Solid => return self.end_game(EndReason::HitWall),
        };

        let grows = self.food == Some(new_head);
        // The tail cell is vacated this tick unless the snake grows.
        let vacated = if grows { None } else { self.snake.back().copied() };
        if vacated != Some(new_head) && self.snake.contains(&new_head) {
            return self.end_game(EndReason::HitSelf);
        }

        self.snake.push_front(new_head);
        if !grows {
            self.snake.pop_back();
            return TickOutcome::Moved;
        }

        self.score = self.score.saturating_add(self.config.score_per_food);
        if self.config.speed_ramp_enabled {
            self.speed = (self.speed + self.config.speed_ramp_step).min(self.config.max_speed);
        }
        self.food = self.spawn_food();
        match self.food {
            Some(food) => {
                log::debug!("Food eaten at {:?}, next at {:?}, score {}", new_head, food, self.score);
                TickOutcome::Ate
            }
            None => self.end_game(EndReason::BoardFull),
        }
    }

    fn end_game(&mut self, reason: EndReason) -> TickOutcome {
        self.phase = Phase::Over;
        self.end_reason = Some(reason);
        log::info!("Game over ({:?}) with score {}", reason, self.score);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save_high_score(self.high_score);
            log::info!("New high score {}", self.high_score);
        }
        TickOutcome::Ended(reason)
    }

    /// Uniformly random cell not covered by the snake, or `None` when the
    /// grid is full.
    fn spawn_food(&mut self) -> Option<Cell> {
        let n = self.config.grid_size;
        let occupied: HashSet<Cell> = self.snake.iter().copied().collect();
        let free: Vec<Cell> = (0..n)
            .flat_map(|y| (0..n).map(move |x| Cell::new(x, y)))
            .filter(|c| !occupied.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }
}

#[cfg(test)]
impl<S: ScoreStore> Game<S> {
    /// Places the game in an arbitrary running position.
    fn arrange(&mut self, snake: &[Cell], direction: Direction, food: Option<Cell>) {
        self.snake = snake.iter().copied().collect();
        self.direction = direction;
        self.pending_direction = direction;
        self.food = food;
        self.phase = Phase::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn solid_config() -> GameConfig {
        GameConfig {
            grid_size: 20,
            tick_interval_ms: 125,
            score_per_food: 10,
            speed_ramp_enabled: false,
            wall_mode: WallMode::Solid,
            ..GameConfig::default()
        }
    }

    fn create_game(config: GameConfig) -> Game<MemoryStore> {
        Game::with_seed(config, MemoryStore::default(), 42)
    }

    fn running_game(config: GameConfig) -> Game<MemoryStore> {
        let mut game = create_game(config);
        game.start();
        game
    }

    fn has_duplicates(snake: &VecDeque<Cell>) -> bool {
        let unique: HashSet<&Cell> = snake.iter().collect();
        unique.len() != snake.len()
    }

    #[test]
    fn test_initial_state_matches_canonical_layout() {
        let game = create_game(solid_config());
        assert_eq!(game.snake().iter().copied().collect::<Vec<_>>(), vec![Cell::new(10, 10), Cell::new(9, 10)]);
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.food(), Some(Cell::new(15, 10)));
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), Phase::Paused);
    }

    #[test]
    fn test_advance_is_idle_while_paused() {
        let mut game = create_game(solid_config());
        assert_eq!(game.advance(), TickOutcome::Idle);
        assert_eq!(game.head(), Cell::new(10, 10));
    }

    #[test]
    fn test_five_ticks_reach_food_and_grow() {
        let mut game = running_game(solid_config());
        for _ in 0..4 {
            assert_eq!(game.advance(), TickOutcome::Moved);
        }
        assert_eq!(game.advance(), TickOutcome::Ate);
        assert_eq!(game.head(), Cell::new(15, 10));
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.score(), 10);
        let food = game.food().unwrap();
        assert_ne!(food, Cell::new(15, 10));
        assert!(!game.snake().contains(&food));
    }

    #[test]
    fn test_solid_wall_ends_game_without_moving() {
        let mut game = running_game(solid_config());
        let body = [Cell::new(19, 10), Cell::new(18, 10)];
        game.arrange(&body, Direction::Right, Some(Cell::new(0, 0)));

        assert_eq!(game.advance(), TickOutcome::Ended(EndReason::HitWall));
        assert_eq!(game.phase(), Phase::Over);
        assert_eq!(game.snake().iter().copied().collect::<Vec<_>>(), body.to_vec());
    }

    #[test]
    fn test_wrap_mode_reappears_on_opposite_edge() {
        let mut game = running_game(GameConfig { wall_mode: WallMode::Wrap, ..solid_config() });
        game.arrange(&[Cell::new(19, 10), Cell::new(18, 10)], Direction::Right, Some(Cell::new(0, 0)));

        assert_eq!(game.advance(), TickOutcome::Moved);
        assert_eq!(game.head(), Cell::new(0, 10));
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_wrap_mode_handles_negative_coordinates() {
        let mut game = running_game(GameConfig { wall_mode: WallMode::Wrap, ..solid_config() });
        game.arrange(&[Cell::new(5, 0), Cell::new(5, 1)], Direction::Up, Some(Cell::new(0, 0)));

        game.advance();
        assert_eq!(game.head(), Cell::new(5, 19));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut game = running_game(solid_config());
        game.set_direction(Direction::Left);
        game.advance();
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_rapid_turns_cannot_reverse_within_one_tick() {
        let mut game = running_game(solid_config());
        game.set_direction(Direction::Up);
        // Checked against the committed direction (Right), not the pending one.
        game.set_direction(Direction::Left);
        game.advance();
        assert_eq!(game.direction(), Direction::Up);
        assert_eq!(game.head(), Cell::new(10, 9));
    }

    #[test]
    fn test_last_valid_turn_wins() {
        let mut game = running_game(solid_config());
        game.set_direction(Direction::Up);
        game.set_direction(Direction::Down);
        game.advance();
        assert_eq!(game.direction(), Direction::Down);
    }

    #[test]
    fn test_moving_into_vacating_tail_is_not_a_collision() {
        let mut game = running_game(solid_config());
        // A 2x2 loop: head at (5,5), tail at (5,6), moving down onto the tail.
        let body = [Cell::new(5, 5), Cell::new(4, 5), Cell::new(4, 6), Cell::new(5, 6)];
        game.arrange(&body, Direction::Down, Some(Cell::new(0, 0)));

        assert_eq!(game.advance(), TickOutcome::Moved);
        assert_eq!(game.head(), Cell::new(5, 6));
        assert_eq!(game.snake().len(), 4);
        assert!(!has_duplicates(game.snake()));
    }

    #[test]
    fn test_moving_into_body_ends_game() {
        let mut game = running_game(solid_config());
        let body = [
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(6, 6),
        ];
        game.arrange(&body, Direction::Down, Some(Cell::new(0, 0)));

        assert_eq!(game.advance(), TickOutcome::Ended(EndReason::HitSelf));
        assert_eq!(game.snake().len(), 5);
        assert_eq!(game.head(), Cell::new(5, 5));
    }

    #[test]
    fn test_game_over_blocks_further_advances() {
        let mut game = running_game(solid_config());
        game.arrange(&[Cell::new(19, 10)], Direction::Right, None);
        game.advance();
        assert_eq!(game.advance(), TickOutcome::Idle);
        game.toggle_pause();
        assert_eq!(game.phase(), Phase::Over);
        game.set_direction(Direction::Up);
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn test_high_score_saved_on_game_over() {
        let mut game = running_game(solid_config());
        game.arrange(&[Cell::new(18, 10)], Direction::Right, Some(Cell::new(19, 10)));
        assert_eq!(game.advance(), TickOutcome::Ate);
        assert_eq!(game.advance(), TickOutcome::Ended(EndReason::HitWall));

        assert_eq!(game.high_score(), 10);
        assert_eq!(game.store.best, 10);
        assert_eq!(game.store.saves, 1);
    }

    #[test]
    fn test_high_score_not_lowered() {
        let store = MemoryStore::with_best(500);
        let mut game = Game::with_seed(solid_config(), store, 1);
        game.start();
        game.arrange(&[Cell::new(18, 10)], Direction::Right, Some(Cell::new(19, 10)));
        game.advance();
        game.advance();

        assert_eq!(game.phase(), Phase::Over);
        assert_eq!(game.high_score(), 500);
        assert_eq!(game.store.saves, 0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut game = running_game(solid_config());
        for _ in 0..5 {
            game.advance();
        }
        game.set_direction(Direction::Up);
        game.advance();
        game.reset();

        let first: Vec<Cell> = game.snake().iter().copied().collect();
        let first_state = (game.direction(), game.food(), game.score(), game.speed(), game.phase());
        game.reset();
        let second: Vec<Cell> = game.snake().iter().copied().collect();
        let second_state = (game.direction(), game.food(), game.score(), game.speed(), game.phase());

        assert_eq!(first, second);
        assert_eq!(first_state, second_state);
        assert_eq!(first, vec![Cell::new(10, 10), Cell::new(9, 10)]);
        assert_eq!(game.phase(), Phase::Paused);
        assert_eq!(game.end_reason(), None);
    }

    #[test]
    fn test_reset_clears_pending_direction() {
        let mut game = running_game(solid_config());
        game.set_direction(Direction::Up);
        game.reset();
        game.start();
        game.advance();
        assert_eq!(game.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_reset_keeps_wall_mode() {
        let mut game = create_game(solid_config());
        game.toggle_wall_mode();
        game.reset();
        assert_eq!(game.wall_mode(), WallMode::Wrap);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut game = create_game(solid_config());
        game.toggle_pause();
        assert_eq!(game.phase(), Phase::Running);
        game.toggle_pause();
        assert_eq!(game.phase(), Phase::Paused);
        game.pause();
        assert_eq!(game.phase(), Phase::Paused);
    }

    #[test]
    fn test_toggle_wall_mode_applies_on_next_tick() {
        let mut game = running_game(solid_config());
        game.arrange(&[Cell::new(19, 10)], Direction::Right, Some(Cell::new(0, 0)));
        game.toggle_wall_mode();
        assert_eq!(game.advance(), TickOutcome::Moved);
        assert_eq!(game.head(), Cell::new(0, 10));
    }

    #[test]
    fn test_speed_ramp_is_capped() {
        let config = GameConfig {
            speed_ramp_enabled: true,
            speed_ramp_step: 4.0,
            max_speed: 10.0,
            ..solid_config()
        };
        let mut game = running_game(config);
        assert_eq!(game.speed(), 8.0);

        game.arrange(&[Cell::new(1, 1)], Direction::Right, Some(Cell::new(2, 1)));
        game.advance();
        assert_eq!(game.speed(), 10.0);
        assert!(game.tick_interval() < Duration::from_millis(125));

        game.reset();
        assert_eq!(game.speed(), 8.0);
    }

    #[test]
    fn test_speed_constant_without_ramp() {
        let mut game = running_game(solid_config());
        game.arrange(&[Cell::new(1, 1)], Direction::Right, Some(Cell::new(2, 1)));
        game.advance();
        assert_eq!(game.speed(), 8.0);
        assert_eq!(game.tick_interval(), Duration::from_secs_f32(1.0 / 8.0));
    }

    #[test]
    fn test_filling_the_board_ends_game() {
        let config = GameConfig { grid_size: 4, ..solid_config() };
        let mut game = running_game(config);
        // Serpentine covering 15 of 16 cells; the last free cell holds the food.
        let body: Vec<Cell> = [
            (1, 3), (2, 3), (3, 3),
            (3, 2), (2, 2), (1, 2), (0, 2),
            (0, 1), (1, 1), (2, 1), (3, 1),
            (3, 0), (2, 0), (1, 0), (0, 0),
        ]
        .iter()
        .map(|&(x, y)| Cell::new(x, y))
        .collect();
        game.arrange(&body, Direction::Left, Some(Cell::new(0, 3)));

        assert_eq!(game.advance(), TickOutcome::Ended(EndReason::BoardFull));
        assert_eq!(game.snake().len(), 16);
        assert_eq!(game.food(), None);
        assert_eq!(game.phase(), Phase::Over);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let config = GameConfig { grid_size: 8, wall_mode: WallMode::Wrap, ..solid_config() };
        let mut game = Game::with_seed(config, MemoryStore::default(), 7);
        let mut rng = StdRng::seed_from_u64(99);
        let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

        for _ in 0..20 {
            game.reset();
            game.start();
            let mut last_score = 0;
            for _ in 0..200 {
                game.set_direction(directions[rng.random_range(0..directions.len())]);
                let len_before = game.snake().len();
                let food_before = game.food();
                let outcome = game.advance();

                if let TickOutcome::Ended(reason) = outcome {
                    if reason != EndReason::BoardFull {
                        assert_eq!(game.snake().len(), len_before);
                    }
                    break;
                }
                assert!(!has_duplicates(game.snake()));
                match outcome {
                    TickOutcome::Ate => {
                        assert_eq!(game.snake().len(), len_before + 1);
                        assert_eq!(Some(game.head()), food_before);
                        assert_eq!(game.score(), last_score + 10);
                        let food = game.food().unwrap();
                        assert!(!game.snake().contains(&food));
                    }
                    TickOutcome::Moved => {
                        assert_eq!(game.snake().len(), len_before);
                        assert_eq!(game.food(), food_before);
                        assert_eq!(game.score(), last_score);
                    }
                    _ => unreachable!(),
                }
                last_score = game.score();
            }
        }
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let game = create_game(solid_config());
        let snapshot = game.snapshot();
        assert_eq!(snapshot.grid_size, 20);
        assert_eq!(snapshot.snake.len(), 2);
        assert_eq!(snapshot.food, Some(Cell::new(15, 10)));
        assert_eq!(snapshot.phase, Phase::Paused);
        assert_eq!(snapshot.wall_mode, WallMode::Solid);
    }
}
