//! Time and geometry primitives: ticks, tile coordinates, directions, sides

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Simulation time in ticks (60 per second)
pub type Ticks = i32;

/// Number of tile columns on the field
pub const TILE_COLS: i32 = 6;
/// Number of tile rows on the field
pub const TILE_ROWS: i32 = 3;

/// Which peer an entity or tile belongs to. The labels are symmetric; they
/// exist so both simulations agree on who is who.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Offerer,
    Answerer,
}

impl Default for Side {
    fn default() -> Self {
        Side::Offerer
    }
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Offerer => Side::Answerer,
            Side::Answerer => Side::Offerer,
        }
    }
}

bitflags! {
    /// Movement direction bitfield. Empty means "no direction".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Direction: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const UP    = 1 << 2;
        const DOWN  = 1 << 3;
    }
}

impl Direction {
    /// Mirror left/right
    pub fn flip_h(self) -> Direction {
        let mut out = self & (Direction::UP | Direction::DOWN);
        if self.contains(Direction::LEFT) {
            out |= Direction::RIGHT;
        }
        if self.contains(Direction::RIGHT) {
            out |= Direction::LEFT;
        }
        out
    }

    /// Mirror up/down
    pub fn flip_v(self) -> Direction {
        let mut out = self & (Direction::LEFT | Direction::RIGHT);
        if self.contains(Direction::UP) {
            out |= Direction::DOWN;
        }
        if self.contains(Direction::DOWN) {
            out |= Direction::UP;
        }
        out
    }

    /// Unit column/row deltas. Opposing bits cancel.
    pub fn dx_dy(self) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if self.contains(Direction::LEFT) {
            dx -= 1;
        }
        if self.contains(Direction::RIGHT) {
            dx += 1;
        }
        if self.contains(Direction::UP) {
            dy -= 1;
        }
        if self.contains(Direction::DOWN) {
            dy += 1;
        }
        (dx, dy)
    }
}

/// A tile coordinate. Out-of-range values are representable so that move
/// targets can be computed first and bounds-checked second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    pub col: i32,
    pub row: i32,
}

impl TilePos {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn in_bounds(self) -> bool {
        self.col >= 0 && self.col < TILE_COLS && self.row >= 0 && self.row < TILE_ROWS
    }

    /// Row-major index into the tile array. Only valid in bounds.
    pub fn index(self) -> usize {
        (self.row * TILE_COLS + self.col) as usize
    }

    /// Horizontal mirror across the field center
    pub fn flipped(self) -> TilePos {
        TilePos {
            col: TILE_COLS - 1 - self.col,
            row: self.row,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> TilePos {
        TilePos {
            col: self.col + dx,
            row: self.row + dy,
        }
    }
}
