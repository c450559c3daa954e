//! Board arena and cell primitives
//!
//! The board is a flat, exclusively owned buffer of `ROWS * COLS` cells. The
//! outer ring is border and can never be rewritten; every mutating helper
//! silently skips out-of-range or border coordinates.

use serde::{Deserialize, Serialize};

use crate::consts::{COLS, ROWS};

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellKind {
    Border,
    #[default]
    Empty,
    Player,
    Enemy,
    Boss,
    PlayerBullet,
    EnemyBullet,
    /// Player and enemy bullet sharing one cell
    BothBullets,
    BossDiagonalBullet,
    /// Boss diagonal bullet merged with an enemy bullet
    BossCombinedBullet,
    /// Cosmetic fill painted during the level-clear animation
    Filler,
}

impl CellKind {
    pub fn is_projectile(&self) -> bool {
        matches!(
            self,
            CellKind::PlayerBullet
                | CellKind::EnemyBullet
                | CellKind::BothBullets
                | CellKind::BossDiagonalBullet
                | CellKind::BossCombinedBullet
        )
    }
}

/// Horizontal direction (boss patrol, diagonal bullet heading)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalDir {
    Left,
    #[default]
    Right,
}

impl HorizontalDir {
    pub fn opposite(self) -> Self {
        match self {
            HorizontalDir::Left => HorizontalDir::Right,
            HorizontalDir::Right => HorizontalDir::Left,
        }
    }

    /// Column delta for one step in this direction
    pub fn delta(self) -> i32 {
        match self {
            HorizontalDir::Left => -1,
            HorizontalDir::Right => 1,
        }
    }
}

/// Vertical direction (boss patrol)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalDir {
    Up,
    #[default]
    Down,
}

impl VerticalDir {
    pub fn opposite(self) -> Self {
        match self {
            VerticalDir::Up => VerticalDir::Down,
            VerticalDir::Down => VerticalDir::Up,
        }
    }

    pub fn delta(self) -> i32 {
        match self {
            VerticalDir::Up => -1,
            VerticalDir::Down => 1,
        }
    }
}

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    /// Created this step by a merge; skips one movement pass
    pub blocked: bool,
    /// Travel heading, only meaningful for diagonal/combined boss bullets
    pub heading: Option<HorizontalDir>,
}

impl Cell {
    pub fn of(kind: CellKind) -> Self {
        Self {
            kind,
            blocked: false,
            heading: None,
        }
    }
}

/// Board coordinate. Signed so neighbours of edge cells can be expressed
/// and rejected by the bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    pub fn above(self) -> Self {
        self.offset(-1, 0)
    }

    pub fn below(self) -> Self {
        self.offset(1, 0)
    }

    pub fn in_bounds(self) -> bool {
        self.row >= 0 && self.row < ROWS && self.col >= 0 && self.col < COLS
    }

    pub fn is_border(self) -> bool {
        self.row == 0 || self.row == ROWS - 1 || self.col == 0 || self.col == COLS - 1
    }
}

/// Column lies strictly inside the side walls
#[inline]
pub fn is_playable_col(col: i32) -> bool {
    col > 0 && col < COLS - 1
}

/// The game board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::bordered()
    }
}

impl Board {
    /// Empty interior surrounded by a border ring
    pub fn bordered() -> Self {
        let mut cells = Vec::with_capacity((ROWS * COLS) as usize);
        for row in 0..ROWS {
            for col in 0..COLS {
                let kind = if Pos::new(row, col).is_border() {
                    CellKind::Border
                } else {
                    CellKind::Empty
                };
                cells.push(Cell::of(kind));
            }
        }
        Self { cells }
    }

    fn index(pos: Pos) -> Option<usize> {
        pos.in_bounds().then(|| (pos.row * COLS + pos.col) as usize)
    }

    /// Cell at `pos`, `None` when out of bounds
    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        Self::index(pos).and_then(|i| self.cells.get(i))
    }

    pub fn kind_at(&self, pos: Pos) -> Option<CellKind> {
        self.get(pos).map(|c| c.kind)
    }

    pub fn is_kind(&self, pos: Pos, kind: CellKind) -> bool {
        self.kind_at(pos) == Some(kind)
    }

    pub fn is_empty_at(&self, pos: Pos) -> bool {
        self.is_kind(pos, CellKind::Empty)
    }

    /// Mutable access to a non-border cell
    pub(crate) fn get_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        let i = Self::index(pos)?;
        let cell = self.cells.get_mut(i)?;
        (cell.kind != CellKind::Border).then_some(cell)
    }

    /// Overwrite a cell's kind, resetting its flags. Border cells (and
    /// requests to create border) are refused.
    pub fn set_kind(&mut self, pos: Pos, kind: CellKind) -> Option<&mut Cell> {
        if kind == CellKind::Border {
            return None;
        }
        let cell = self.get_mut(pos)?;
        *cell = Cell::of(kind);
        Some(cell)
    }

    pub fn clear(&mut self, pos: Pos) {
        self.set_kind(pos, CellKind::Empty);
    }

    pub fn draw_player_bullet(&mut self, pos: Pos) {
        self.set_kind(pos, CellKind::PlayerBullet);
    }

    pub fn draw_enemy_bullet(&mut self, pos: Pos) {
        self.set_kind(pos, CellKind::EnemyBullet);
    }

    /// Merged player/enemy bullet, blocked for the rest of this step
    pub fn draw_both_bullets(&mut self, pos: Pos) {
        if let Some(cell) = self.set_kind(pos, CellKind::BothBullets) {
            cell.blocked = true;
        }
    }

    pub fn draw_diagonal_bullet(&mut self, pos: Pos, heading: HorizontalDir, blocked: bool) {
        if let Some(cell) = self.set_kind(pos, CellKind::BossDiagonalBullet) {
            cell.heading = Some(heading);
            cell.blocked = blocked;
        }
    }

    /// Merged diagonal/enemy bullet, blocked for the rest of this step
    pub fn draw_combined_bullet(&mut self, pos: Pos, heading: HorizontalDir) {
        if let Some(cell) = self.set_kind(pos, CellKind::BossCombinedBullet) {
            cell.heading = Some(heading);
            cell.blocked = true;
        }
    }

    /// Relocate an occupant (kind, flags, heading) and clear the source.
    /// Returns false without touching anything if either end is out of
    /// bounds or border.
    pub fn move_cell(&mut self, from: Pos, to: Pos) -> bool {
        if from == to {
            return false;
        }
        let Some(origin) = self.get_mut(from).map(|c| *c) else {
            return false;
        };
        let Some(target) = self.get_mut(to) else {
            return false;
        };
        *target = origin;
        self.clear(from);
        true
    }

    /// Snapshot of every coordinate currently holding `kind`, row-major
    pub fn cells_of_kind(&self, kind: CellKind) -> Vec<Pos> {
        self.iter()
            .filter(|(_, cell)| cell.kind == kind)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count_of_kind(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Paint one interior row with filler. Border rows are ignored.
    pub fn fill_row(&mut self, row: i32) {
        if row <= 0 || row >= ROWS - 1 {
            return;
        }
        for col in 1..COLS - 1 {
            if let Some(cell) = self.set_kind(Pos::new(row, col), CellKind::Filler) {
                cell.blocked = true;
            }
        }
    }

    /// All cells with their coordinates, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Pos::new(i as i32 / COLS, i as i32 % COLS), cell))
    }

    /// One row of cells, for presentation layers
    pub fn row(&self, row: i32) -> Option<&[Cell]> {
        if row < 0 || row >= ROWS {
            return None;
        }
        let start = (row * COLS) as usize;
        self.cells.get(start..start + COLS as usize)
    }
}
