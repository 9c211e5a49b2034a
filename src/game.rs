use crate::input::FrameInput;
use crate::session::Session;
use crate::shapes::{self, Block, PieceId};
use crate::spawn::{PieceProvider, RandomPieceProvider, SpawnSettings};
use crate::store::{BlockHandle, BlockStore};

// ============================================================================
// Configuration
// ============================================================================

/// Four walls plus one active piece.
pub const STORE_CAPACITY: usize = 8;

/// Collision feel and timing. Distances are in world units, times in seconds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tuning {
    pub block_size: f32,
    /// Two blocks closer than this on both axes overlap.
    pub collision_threshold: f32,
    /// How far above a locked block a falling block may be and still rest on it.
    pub rest_tolerance: f32,
    pub play_half_width: f32,
    pub floor: f32,
    pub ceiling: f32,
    pub bound_eps: f32,
    pub columns: usize,
    pub das_delay: f32,
    pub das_rate: f32,
    pub base_fall_interval: f32,
    pub soft_drop_interval: f32,
    pub row_bonus: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            block_size: shapes::BLOCK_SIZE,
            collision_threshold: 0.08,
            rest_tolerance: 0.02,
            play_half_width: 0.9,
            floor: -1.0,
            ceiling: 1.0,
            bound_eps: 0.001,
            columns: 18,
            das_delay: 0.2,
            das_rate: 0.05,
            base_fall_interval: 0.5,
            soft_drop_interval: 0.1,
            row_bonus: 100,
        }
    }
}

impl Tuning {
    /// Centre x of a playfield column, counted from the left wall.
    pub fn column_x(&self, column: usize) -> f32 {
        -self.play_half_width + self.block_size / 2.0 + column as f32 * self.block_size
    }

    /// Centre y of a resting row, counted from the floor.
    pub fn row_y(&self, row: usize) -> f32 {
        self.floor + self.block_size + row as f32 * self.block_size
    }

    fn play_half_height(&self) -> f32 {
        self.ceiling - self.block_size / 2.0
    }
}

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    fn sign(self) -> f32 {
        match self {
            Shift::Left => -1.0,
            Shift::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    Continue,
    Exit,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceSpawned(PieceId),
    PieceMoved,
    PieceLocked,
    RowsCleared(u32),
    GameReset,
}

/// Delayed auto shift for one direction.
///
/// A fresh press fires at once. Holding fires again once the accumulated hold
/// time reaches the delay, after which the rate is subtracted rather than the
/// accumulator zeroed, so the remainder carries across uneven frames.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct DasTimer {
    was_pressed: bool,
    held_time: f32,
}

impl DasTimer {
    pub fn update(&mut self, pressed: bool, dt: f32, delay: f32, rate: f32) -> bool {
        let fire = if !pressed {
            self.held_time = 0.0;
            false
        } else if !self.was_pressed {
            self.held_time = 0.0;
            true
        } else {
            self.held_time += dt;
            if self.held_time >= delay {
                self.held_time -= rate;
                true
            } else {
                false
            }
        };
        self.was_pressed = pressed;
        fire
    }

    pub fn held_time(&self) -> f32 {
        self.held_time
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    tuning: Tuning,
    store: BlockStore<Block>,
    walls: [BlockHandle; 4],
    active: [BlockHandle; 4],
    locked: Vec<Block>,
    gravity_timer: f32,
    fall_interval: f32,
    left: DasTimer,
    right: DasTimer,
    landed: bool,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

/// Fills an empty store with the walls and the first active piece.
fn populate(
    store: &mut BlockStore<Block>,
    tuning: &Tuning,
    first_piece: [Block; 4],
) -> ([BlockHandle; 4], [BlockHandle; 4]) {
    let walls = shapes::walls(tuning.play_half_width, tuning.play_half_height()).map(|wall| store.store(wall));
    let active = first_piece.map(|block| store.store(block));
    (walls, active)
}

impl Game {
    pub fn new(session: &Session) -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()), Tuning::default(), &session.settings)
    }

    pub fn with_provider(
        mut provider: Box<dyn PieceProvider>,
        tuning: Tuning,
        settings: &SpawnSettings,
    ) -> Self {
        let first = provider.next_piece(settings);
        let mut game = Self::from_parts(
            provider,
            tuning,
            Vec::new(),
            shapes::shape_sized(first, 0.0, first.spawn_base_y(), tuning.block_size),
        );
        game.events.push(GameEvent::PieceSpawned(first));
        debug!(piece = first.name(), "first piece spawned");
        game
    }

    /// Starts from an arbitrary board: `locked` as settled geometry and
    /// `active` as the falling piece.
    pub fn with_board(locked: Vec<Block>, active: [Block; 4], provider: Box<dyn PieceProvider>) -> Self {
        Self::from_parts(provider, Tuning::default(), locked, active)
    }

    fn from_parts(
        piece_provider: Box<dyn PieceProvider>,
        tuning: Tuning,
        locked: Vec<Block>,
        active: [Block; 4],
    ) -> Self {
        let mut store = BlockStore::with_capacity(STORE_CAPACITY);
        let (walls, active) = populate(&mut store, &tuning, active);
        Self {
            tuning,
            store,
            walls,
            active,
            locked,
            gravity_timer: 0.0,
            fall_interval: tuning.base_fall_interval,
            left: DasTimer::default(),
            right: DasTimer::default(),
            landed: false,
            piece_provider,
            events: Vec::new(),
        }
    }

    /// Advances the playfield by one frame.
    pub fn tick(&mut self, input: FrameInput, dt: f32, session: &mut Session) -> TickOutcome {
        if input.cancel {
            return TickOutcome::Exit;
        }

        self.fall_interval = if input.soft_drop {
            self.tuning.soft_drop_interval
        } else {
            self.tuning.base_fall_interval
        };

        let Tuning { das_delay, das_rate, .. } = self.tuning;
        let move_left = self.left.update(input.left, dt, das_delay, das_rate);
        let move_right = self.right.update(input.right, dt, das_delay, das_rate);
        if move_left {
            self.try_shift(Shift::Left);
        }
        if move_right {
            self.try_shift(Shift::Right);
        }

        self.apply_gravity(dt);

        if self.landed {
            self.resolve_landing(session);
        }

        TickOutcome::Continue
    }

    /// Moves the active piece one column if every block stays inside the
    /// walls and clear of locked blocks. All or nothing.
    pub fn try_shift(&mut self, shift: Shift) -> bool {
        let t = self.tuning;
        let dx = shift.sign() * t.block_size;
        let min_x = -t.play_half_width + t.block_size / 2.0 - t.bound_eps;
        let max_x = t.play_half_width - t.block_size / 2.0 + t.bound_eps;

        let fits = self.active_blocks().all(|block| {
            let x = block.x + dx;
            x >= min_x && x <= max_x && !self.locked.iter().any(|locked| self.overlaps(x, block.y, locked))
        });

        if !fits {
            trace!(?shift, "shift rejected");
            return false;
        }

        for handle in self.active {
            if let Some(block) = self.store.get_mut(handle) {
                block.x += dx;
            }
        }
        self.events.push(GameEvent::PieceMoved);
        true
    }

    fn overlaps(&self, x: f32, y: f32, other: &Block) -> bool {
        let threshold = self.tuning.collision_threshold;
        (x - other.x).abs() < threshold && (y - other.y).abs() < threshold
    }

    fn apply_gravity(&mut self, dt: f32) {
        self.gravity_timer += dt;
        if self.gravity_timer < self.fall_interval {
            return;
        }

        if self.would_land() {
            self.landed = true;
        } else {
            for handle in self.active {
                if let Some(block) = self.store.get_mut(handle) {
                    block.y -= self.tuning.block_size;
                }
            }
        }
        // Zeroed, unlike the DAS accumulator.
        self.gravity_timer = 0.0;
    }

    /// Whether one more step down would pass the floor or come to rest on a
    /// locked block.
    pub fn would_land(&self) -> bool {
        let t = self.tuning;
        self.active_blocks().any(|block| {
            let y = block.y - t.block_size;
            if y <= t.floor + t.bound_eps {
                return true;
            }
            self.locked.iter().any(|locked| {
                let dy = y - locked.y;
                (block.x - locked.x).abs() < t.collision_threshold
                    && dy <= t.rest_tolerance
                    && dy >= -t.block_size
            })
        })
    }

    fn resolve_landing(&mut self, session: &mut Session) {
        self.lock_piece();
        self.clear_full_rows(session);

        if self.is_game_over() {
            self.reset(&session.settings);
        } else {
            self.spawn_piece(&session.settings);
        }
        self.landed = false;
    }

    fn lock_piece(&mut self) {
        for handle in self.active {
            if let Some(block) = self.store.take(handle) {
                self.locked.push(block);
            }
        }
        self.events.push(GameEvent::PieceLocked);
    }

    fn spawn_piece(&mut self, settings: &SpawnSettings) {
        let piece = self.piece_provider.next_piece(settings);
        let blocks = shapes::shape_sized(piece, 0.0, piece.spawn_base_y(), self.tuning.block_size);
        for (handle, block) in self.active.into_iter().zip(blocks) {
            self.store.put(handle, block);
        }
        self.events.push(GameEvent::PieceSpawned(piece));
        debug!(piece = piece.name(), "piece spawned");
    }

    /// Removes every full row, compacts the blocks above and credits the
    /// session. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self, session: &mut Session) -> u32 {
        let t = self.tuning;
        let half = t.block_size / 2.0;
        let same_row = |y: f32, row_y: f32| (y - row_y).abs() < half;

        let mut rows: Vec<f32> = Vec::new();
        for block in &self.locked {
            if !rows.iter().any(|&row_y| same_row(block.y, row_y)) {
                rows.push(block.y);
            }
        }

        let mut full: Vec<f32> = rows
            .into_iter()
            .filter(|&row_y| {
                self.locked
                    .iter()
                    .filter(|block| block.counts_toward_row() && same_row(block.y, row_y))
                    .count()
                    >= t.columns
            })
            .collect();
        if full.is_empty() {
            return 0;
        }
        full.sort_by(f32::total_cmp);

        let cleared = full.len() as u32;
        session.add_score(t.row_bonus * cleared);

        self.locked
            .retain(|block| !full.iter().any(|&row_y| same_row(block.y, row_y)));

        for i in 0..full.len() {
            let row_y = full[i];
            for block in &mut self.locked {
                if block.y > row_y + half {
                    block.y -= t.block_size;
                }
            }
            for later in &mut full[i + 1..] {
                *later -= t.block_size;
            }
        }

        self.events.push(GameEvent::RowsCleared(cleared));
        info!(rows = cleared, score = session.score, "rows cleared");
        cleared
    }

    pub fn is_game_over(&self) -> bool {
        let t = self.tuning;
        let limit = t.ceiling - t.block_size - t.bound_eps;
        self.locked.iter().any(|block| block.y >= limit)
    }

    /// Clears the board and starts over with fresh walls and a new piece.
    pub fn reset(&mut self, settings: &SpawnSettings) {
        self.locked.clear();
        self.store.reset();

        let piece = self.piece_provider.next_piece(settings);
        let blocks = shapes::shape_sized(piece, 0.0, piece.spawn_base_y(), self.tuning.block_size);
        let (walls, active) = populate(&mut self.store, &self.tuning, blocks);
        self.walls = walls;
        self.active = active;
        self.gravity_timer = 0.0;
        self.landed = false;

        self.events.push(GameEvent::GameReset);
        self.events.push(GameEvent::PieceSpawned(piece));
        info!(piece = piece.name(), "board reset");
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn active_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.active.iter().filter_map(|&handle| self.store.get(handle))
    }

    pub fn locked_blocks(&self) -> &[Block] {
        &self.locked
    }

    pub fn walls(&self) -> impl Iterator<Item = &Block> + '_ {
        self.walls.iter().filter_map(|&handle| self.store.get(handle))
    }

    /// Everything to draw, back to front: walls, locked blocks, active piece.
    pub fn render_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.walls().chain(self.locked.iter()).chain(self.active_blocks())
    }

    pub fn store(&self) -> &BlockStore<Block> {
        &self.store
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    pub fn fall_interval(&self) -> f32 {
        self.fall_interval
    }

    pub fn gravity_timer(&self) -> f32 {
        self.gravity_timer
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()), Tuning::default(), &SpawnSettings::default())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::shapes::Rgb;
    use crate::spawn::SequencePieceProvider;

    const GREY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    pub fn cell_at(column: usize, row: usize) -> Block {
        let t = Tuning::default();
        Block::cell(t.column_x(column), t.row_y(row), t.block_size, GREY)
    }

    pub fn full_row(row: usize) -> Vec<Block> {
        (0..Tuning::default().columns).map(|column| cell_at(column, row)).collect()
    }

    pub fn row_with_gap(row: usize, gap: usize) -> Vec<Block> {
        (0..Tuning::default().columns)
            .filter(|&column| column != gap)
            .map(|column| cell_at(column, row))
            .collect()
    }

    /// Four cells stacked in one column, lowest at `row`.
    pub fn vertical_bar(column: usize, row: usize) -> [Block; 4] {
        std::array::from_fn(|i| cell_at(column, row + i))
    }

    /// A 2x2 square with its bottom-left cell at `(column, row)`.
    pub fn square(column: usize, row: usize) -> [Block; 4] {
        [
            cell_at(column, row),
            cell_at(column + 1, row),
            cell_at(column, row + 1),
            cell_at(column + 1, row + 1),
        ]
    }

    /// A board whose every later spawn is `next`.
    pub fn game_with(locked: Vec<Block>, active: [Block; 4], next: PieceId) -> Game {
        Game::with_board(locked, active, Box::new(SequencePieceProvider::new(vec![next])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn das_fires_on_press_then_after_delay() {
        let mut das = DasTimer::default();
        assert!(das.update(true, 0.016, 0.2, 0.05));
        assert!(!das.update(true, 0.1, 0.2, 0.05));
        assert!(das.update(true, 0.15, 0.2, 0.05));
        assert!((das.held_time() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn das_release_zeroes_accumulator() {
        let mut das = DasTimer::default();
        das.update(true, 0.0, 0.2, 0.05);
        das.update(true, 0.15, 0.2, 0.05);
        assert!(!das.update(false, 0.15, 0.2, 0.05));
        assert_eq!(das.held_time(), 0.0);
        assert!(das.update(true, 0.0, 0.2, 0.05));
    }

    #[test]
    fn tuning_rows_and_columns_line_up_with_spawn() {
        let t = Tuning::default();
        assert!((t.column_x(8) - -0.05).abs() < 1e-5);
        assert!((t.column_x(9) - 0.05).abs() < 1e-5);
        assert!((t.row_y(16) - 0.7).abs() < 1e-5);
    }
}
