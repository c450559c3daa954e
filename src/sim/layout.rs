//! Level construction

use super::grid::{Board, CellKind, Pos};
use super::state::Boss;
use crate::consts::*;

/// Everything a fresh level needs
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub board: Board,
    pub enemies: i32,
    pub player: Option<Pos>,
    pub boss: Option<Boss>,
}

/// Bordered board seeded with a standard wave, or the boss on `BOSS_LEVEL`,
/// and the player at the bottom centre
pub fn build_level_layout(level: u32) -> LevelLayout {
    let mut board = Board::bordered();

    let (enemies, boss) = if level == BOSS_LEVEL {
        let pos = Pos::new(ENEMY_ROW, COLS / 2);
        board.set_kind(pos, CellKind::Boss);
        (1, Some(Boss::new(pos)))
    } else {
        for col in ENEMY_COL_START..=ENEMY_COL_END {
            board.set_kind(Pos::new(ENEMY_ROW, col), CellKind::Enemy);
        }
        (ENEMY_COL_END - ENEMY_COL_START + 1, None)
    };

    let player = Pos::new(PLAYER_START_ROW, PLAYER_START_COL);
    board.set_kind(player, CellKind::Player);

    LevelLayout {
        board,
        enemies,
        player: Some(player),
        boss,
    }
}
