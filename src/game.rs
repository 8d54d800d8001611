//! Game state: grid, active piece, movement, merge, line clear, stage progression.

use crate::GameConfig;
use crate::grid::{Cell, GRID_HEIGHT, GRID_WIDTH, Grid};
use crate::piece::{Piece, ShapeKind};
use crate::rng::ShapeSource;
use std::time::{Duration, Instant};

/// Last stage; meeting its goal wins the game.
pub const MAX_STAGE: u32 = 10;

/// Line clears needed per stage. Every stage uses the same goal.
pub const STAGE_GOAL: u32 = 1;

/// Score per cleared row.
pub const POINTS_PER_LINE: u32 = 100;

/// Where the session stands. `Won` and `Lost` are both terminal until restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Paused,
    Won,
    Lost,
}

impl Status {
    #[inline]
    pub fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Read-only copy of everything the renderer needs, taken after a frame's mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    /// `None` while paused or after game over.
    pub piece: Option<Piece>,
    pub status: Status,
    pub score: u32,
    pub lines_cleared: u32,
    pub stage: u32,
    pub max_stage: u32,
    pub blocks_broken: u32,
    pub stage_goal: u32,
}

/// Game state: grid, current piece, score, stage, fall timer.
#[derive(Debug)]
pub struct GameState<S> {
    pub grid: Grid,
    pub piece: Piece,
    pub status: Status,
    pub score: u32,
    pub lines_cleared: u32,
    pub stage: u32,
    /// Clears counted towards the current stage; a clear of any size counts once.
    pub blocks_broken: u32,
    pub stage_goal: u32,
    /// Time per automatic one-cell descent.
    pub fall_interval: Duration,
    base_fall_interval: Duration,
    last_fall: Instant,
    source: S,
}

impl<S: ShapeSource> GameState<S> {
    pub fn new(mut source: S, config: &GameConfig, now: Instant) -> Self {
        let piece = Self::draw_piece(&mut source);
        Self {
            grid: Grid::new(GRID_WIDTH, GRID_HEIGHT),
            piece,
            status: Status::Playing,
            score: 0,
            lines_cleared: 0,
            stage: 1,
            blocks_broken: 0,
            stage_goal: STAGE_GOAL,
            fall_interval: config.fall_interval,
            base_fall_interval: config.fall_interval,
            last_fall: now,
            source,
        }
    }

    fn draw_piece(source: &mut S) -> Piece {
        Piece::spawn(ShapeKind::from_index(source.next_shape_index()), GRID_WIDTH)
    }

    /// Fresh game with the same shape source and fall interval.
    pub fn restart(&mut self, now: Instant) {
        self.grid = Grid::new(GRID_WIDTH, GRID_HEIGHT);
        self.piece = Self::draw_piece(&mut self.source);
        self.status = Status::Playing;
        self.score = 0;
        self.lines_cleared = 0;
        self.stage = 1;
        self.blocks_broken = 0;
        self.stage_goal = STAGE_GOAL;
        self.fall_interval = self.base_fall_interval;
        self.last_fall = now;
    }

    /// True if `piece` shifted by `(dx, dy)` stays inside the side walls, above the floor,
    /// and off settled blocks. Cells above row 0 are never checked against the grid.
    pub fn is_valid_position(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece.cells_at(dx, dy).all(|(x, y)| {
            if x < 0 || x >= self.grid.width() as i32 || y >= self.grid.height() as i32 {
                return false;
            }
            y < 0 || matches!(self.grid.is_occupied(x, y), Ok(false))
        })
    }

    #[inline]
    fn accepts_moves(&self) -> bool {
        self.status == Status::Playing
    }

    /// Shift the piece if the target is valid.
    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        if !self.is_valid_position(&self.piece, dx, dy) {
            return false;
        }
        self.piece.x += dx;
        self.piece.y += dy;
        true
    }

    pub fn move_left(&mut self) {
        if self.accepts_moves() {
            self.try_shift(-1, 0);
        }
    }

    pub fn move_right(&mut self) {
        if self.accepts_moves() {
            self.try_shift(1, 0);
        }
    }

    /// One cell down; merges when blocked.
    pub fn soft_drop(&mut self) {
        if self.accepts_moves() {
            self.step_down();
        }
    }

    fn step_down(&mut self) {
        if !self.try_shift(0, 1) {
            self.merge();
        }
    }

    /// Drop straight to the lowest valid row and merge.
    pub fn hard_drop(&mut self) {
        if !self.accepts_moves() {
            return;
        }
        while self.try_shift(0, 1) {}
        self.merge();
    }

    /// Rotate clockwise in place. No wall kicks: an invalid result restores the old shape.
    pub fn rotate(&mut self) {
        if !self.accepts_moves() {
            return;
        }
        let rotated = self.piece.shape.rotated_cw();
        let old_shape = std::mem::replace(&mut self.piece.shape, rotated);
        if !self.is_valid_position(&self.piece, 0, 0) {
            self.piece.shape = old_shape;
        }
    }

    /// Playing and paused swap; a finished game stays finished.
    pub fn toggle_pause(&mut self) {
        if self.status.is_over() {
            return;
        }
        self.status = if self.status == Status::Paused {
            Status::Playing
        } else {
            Status::Paused
        };
    }

    /// Write the piece into the grid, clear lines, spawn the next piece.
    pub fn merge(&mut self) {
        let color = self.piece.color;
        // Blocks still above the visible grid are dropped.
        let on_grid: Vec<(i32, i32)> = self
            .piece
            .cells()
            .filter(|&(x, y)| self.grid.contains(x, y))
            .collect();
        for (x, y) in on_grid {
            self.grid[(x as usize, y as usize)] = Cell::Filled(color);
        }

        self.check_lines();

        self.piece = Self::draw_piece(&mut self.source);
        if !self.is_valid_position(&self.piece, 0, 0) {
            self.end_game();
        }
    }

    /// Clear every full row. Returns the number of rows cleared.
    pub fn check_lines(&mut self) -> u32 {
        let full: Vec<usize> = (0..self.grid.height())
            .filter(|&y| self.grid.is_row_full(y))
            .collect();
        if full.is_empty() {
            return 0;
        }

        let count = full.len() as u32;
        self.lines_cleared += count;
        self.blocks_broken = 1;
        self.score += POINTS_PER_LINE * count;

        // Rows below a cleared row keep their index, so ascending order stays valid.
        for y in full {
            self.grid.clear_row(y);
        }

        if self.blocks_broken >= self.stage_goal && self.stage < MAX_STAGE {
            self.advance_stage();
        }
        count
    }

    fn advance_stage(&mut self) {
        self.stage += 1;
        self.blocks_broken = 0;
        self.stage_goal = STAGE_GOAL;
        self.fall_interval = self.base_fall_interval;
    }

    /// Terminal state; a met final-stage goal counts as a win even on a blocked spawn.
    fn end_game(&mut self) {
        self.status = if self.stage == MAX_STAGE && self.blocks_broken >= self.stage_goal {
            Status::Won
        } else {
            Status::Lost
        };
    }

    /// Once per frame: automatic descent, then stage/win evaluation.
    pub fn tick(&mut self, now: Instant) {
        if self.status != Status::Playing {
            return;
        }

        if now.saturating_duration_since(self.last_fall) > self.fall_interval {
            self.step_down();
            self.last_fall = now;
        }

        if self.status == Status::Playing && self.blocks_broken >= self.stage_goal {
            if self.stage >= MAX_STAGE {
                self.end_game();
            } else {
                self.advance_stage();
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            piece: (self.status == Status::Playing).then(|| self.piece.clone()),
            status: self.status,
            score: self.score,
            lines_cleared: self.lines_cleared,
            stage: self.stage,
            max_stage: MAX_STAGE,
            blocks_broken: self.blocks_broken,
            stage_goal: self.stage_goal,
        }
    }
}
