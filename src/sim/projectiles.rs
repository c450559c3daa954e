//! Projectile movement and collision
//!
//! Projectiles are nothing but cell kinds. Each family is processed from a
//! snapshot taken just before it moves; a snapshot entry whose live cell no
//! longer holds that kind was consumed earlier in the step and is skipped.
//! A `blocked` cell was created by a merge this step: the flag is cleared and
//! the cell waits until the next step.

use super::enemy::kill_at;
use super::grid::{CellKind, HorizontalDir, Pos, is_playable_col};
use super::player::hit_player;
use super::state::GameState;
use crate::consts::ROWS;

/// Snapshot `kind`, optionally bottom row first
fn snapshot(state: &GameState, kind: CellKind, bottom_up: bool) -> Vec<Pos> {
    let mut coords = state.board.cells_of_kind(kind);
    if bottom_up {
        coords.reverse();
    }
    coords
}

/// Clear the blocked flag if set. Returns true when the cell must wait.
fn take_grace(state: &mut GameState, pos: Pos) -> bool {
    match state.board.get_mut(pos) {
        Some(cell) if cell.blocked => {
            cell.blocked = false;
            true
        }
        _ => false,
    }
}

/// Next diagonal cell, bouncing off a side wall. `None` once the bullet
/// would leave the playable area.
fn diagonal_step(from: Pos, heading: HorizontalDir) -> Option<(Pos, HorizontalDir)> {
    let row = from.row + 1;
    if row >= ROWS - 1 {
        return None;
    }
    let mut heading = heading;
    let mut col = from.col + heading.delta();
    if !is_playable_col(col) {
        heading = heading.opposite();
        col = from.col + heading.delta();
    }
    is_playable_col(col).then_some((Pos::new(row, col), heading))
}

/// Put a diagonal bullet into `target`, merging with whatever is there.
/// `blocked` marks a bullet spawned this step that must not move again.
fn land_diagonal(state: &mut GameState, target: Pos, heading: HorizontalDir, blocked: bool) {
    match state.board.kind_at(target) {
        Some(CellKind::Empty) => state.board.draw_diagonal_bullet(target, heading, blocked),
        Some(CellKind::PlayerBullet) => {
            // Cancel each other out
            state.board.clear(target);
            state.ammo.refund();
        }
        Some(CellKind::EnemyBullet) => state.board.draw_combined_bullet(target, heading),
        Some(CellKind::BossDiagonalBullet) => {
            state.board.draw_diagonal_bullet(target, heading, true)
        }
        Some(CellKind::BossCombinedBullet) => {
            if let Some(cell) = state.board.get_mut(target) {
                cell.heading = Some(heading);
            }
        }
        Some(CellKind::Player) => hit_player(state, target),
        _ => {}
    }
}

/// Downward move shared by enemy bullets, combined bullets, and the lower
/// half of both-bullets
fn land_downward(state: &mut GameState, from: Pos) {
    let target = from.below();
    if target.row >= ROWS - 1 {
        return;
    }
    match state.board.kind_at(target) {
        Some(CellKind::Empty) => state.board.draw_enemy_bullet(target),
        Some(CellKind::PlayerBullet) => state.board.draw_both_bullets(target),
        Some(CellKind::BossDiagonalBullet) => {
            let heading = state
                .board
                .get(target)
                .and_then(|c| c.heading)
                .unwrap_or_default();
            state.board.draw_combined_bullet(target, heading);
        }
        Some(CellKind::Player) => hit_player(state, target),
        _ => {}
    }
}

/// Upward move shared by player bullets and the upper half of both-bullets.
/// A shot absorbed without hitting anything is refunded.
fn land_upward(state: &mut GameState, from: Pos) {
    let target = from.above();
    if target.row < 1 {
        state.ammo.refund();
        return;
    }
    match state.board.kind_at(target) {
        Some(CellKind::Empty) => state.board.draw_player_bullet(target),
        Some(CellKind::EnemyBullet | CellKind::BossDiagonalBullet) => {
            state.board.draw_both_bullets(target)
        }
        Some(CellKind::Enemy | CellKind::Boss) => kill_at(state, target),
        _ => state.ammo.refund(),
    }
}

/// Combined bullets split into a straight shot and a diagonal continuation;
/// enemy bullets fall one row
pub fn move_enemy_bullets(state: &mut GameState) {
    let combined = snapshot(state, CellKind::BossCombinedBullet, true);
    let straight = snapshot(state, CellKind::EnemyBullet, true);

    for pos in combined {
        if !state.board.is_kind(pos, CellKind::BossCombinedBullet) || take_grace(state, pos) {
            continue;
        }
        let heading = state
            .board
            .get(pos)
            .and_then(|c| c.heading)
            .unwrap_or_default();
        state.board.clear(pos);
        if let Some((target, heading)) = diagonal_step(pos, heading) {
            land_diagonal(state, target, heading, true);
        }
        land_downward(state, pos);
    }

    for pos in straight {
        if !state.board.is_kind(pos, CellKind::EnemyBullet) || take_grace(state, pos) {
            continue;
        }
        state.board.clear(pos);
        land_downward(state, pos);
    }
}

pub fn move_boss_diagonal_bullets(state: &mut GameState) {
    for pos in snapshot(state, CellKind::BossDiagonalBullet, true) {
        if !state.board.is_kind(pos, CellKind::BossDiagonalBullet) || take_grace(state, pos) {
            continue;
        }
        let heading = state
            .board
            .get(pos)
            .and_then(|c| c.heading)
            .unwrap_or_default();
        state.board.clear(pos);
        if let Some((target, heading)) = diagonal_step(pos, heading) {
            land_diagonal(state, target, heading, false);
        }
    }
}

pub fn move_player_bullets(state: &mut GameState) {
    for pos in snapshot(state, CellKind::PlayerBullet, false) {
        if !state.board.is_kind(pos, CellKind::PlayerBullet) || take_grace(state, pos) {
            continue;
        }
        state.board.clear(pos);
        land_upward(state, pos);
    }
}

/// Both-bullets split: the player half continues up, the enemy half down
pub fn move_both_bullets(state: &mut GameState) {
    for pos in snapshot(state, CellKind::BothBullets, false) {
        if !state.board.is_kind(pos, CellKind::BothBullets) || take_grace(state, pos) {
            continue;
        }
        state.board.clear(pos);
        land_upward(state, pos);
        land_downward(state, pos);
    }
}

/// All projectile families in dependency order
pub fn resolve_projectiles(state: &mut GameState) {
    move_enemy_bullets(state);
    move_boss_diagonal_bullets(state);
    move_player_bullets(state);
    move_both_bullets(state);
}
