//! Boss AI: teleport, patrol and twin weapons
//!
//! Three independent cooldowns gate the three behaviours. Each counter is
//! decremented once per step while positive; the behaviour runs on a step
//! where its counter is already zero.

use rand::Rng;

use super::grid::{CellKind, HorizontalDir, Pos, VerticalDir, is_playable_col};
use super::player::hit_player;
use super::state::GameState;
use crate::consts::*;

/// Boss rows stay above the player row
fn is_boss_row(row: i32) -> bool {
    row > 0 && row < PLAYER_START_ROW
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BossStep {
    Horizontal(HorizontalDir),
    Vertical(VerticalDir),
}

fn try_move(state: &mut GameState, step: BossStep) -> bool {
    let Some(from) = state.boss.as_ref().map(|b| b.pos) else {
        return false;
    };
    let to = match step {
        BossStep::Horizontal(dir) => from.offset(0, dir.delta()),
        BossStep::Vertical(dir) => from.offset(dir.delta(), 0),
    };
    if !is_playable_col(to.col) || !is_boss_row(to.row) || !state.board.is_empty_at(to) {
        return false;
    }
    if !state.board.move_cell(from, to) {
        return false;
    }
    if let Some(boss) = state.boss.as_mut() {
        boss.pos = to;
        match step {
            BossStep::Horizontal(dir) => boss.horizontal = dir,
            BossStep::Vertical(dir) => boss.vertical = dir,
        }
    }
    true
}

/// Take the first legal step, preferring vertical some of the time
fn move_boss(state: &mut GameState) -> bool {
    let Some((h, v)) = state.boss.as_ref().map(|b| (b.horizontal, b.vertical)) else {
        return false;
    };
    let prefer_vertical = state.rng.random_bool(BOSS_VERTICAL_PREFERENCE);
    let order = if prefer_vertical {
        [
            BossStep::Vertical(v),
            BossStep::Horizontal(h),
            BossStep::Vertical(v.opposite()),
            BossStep::Horizontal(h.opposite()),
        ]
    } else {
        [
            BossStep::Horizontal(h),
            BossStep::Vertical(v),
            BossStep::Horizontal(h.opposite()),
            BossStep::Vertical(v.opposite()),
        ]
    };
    order.into_iter().any(|step| try_move(state, step))
}

/// Jump to a random empty cell in the upper region
fn teleport(state: &mut GameState) -> bool {
    let Some(from) = state.boss.as_ref().map(|b| b.pos) else {
        return false;
    };

    for _ in 0..BOSS_TELEPORT_ATTEMPTS {
        let to = Pos::new(
            state.rng.random_range(1..PLAYER_START_ROW),
            state.rng.random_range(1..COLS - 1),
        );
        if to == from || !state.board.is_empty_at(to) {
            continue;
        }
        if !state.board.move_cell(from, to) {
            continue;
        }
        if let Some(boss) = state.boss.as_mut() {
            boss.pos = to;
            if to.col > from.col {
                boss.horizontal = HorizontalDir::Right;
            } else if to.col < from.col {
                boss.horizontal = HorizontalDir::Left;
            }
            if to.row > from.row {
                boss.vertical = VerticalDir::Down;
            } else if to.row < from.row {
                boss.vertical = VerticalDir::Up;
            }
        }
        log::debug!("Boss teleported {:?} -> {:?}", from, to);
        return true;
    }
    false
}

/// Straight shot one row below the boss
fn fire_vertical(state: &mut GameState, from: Pos) -> bool {
    let target = from.below();
    if target.row >= ROWS - 1 {
        return false;
    }
    match state.board.kind_at(target) {
        Some(CellKind::Player) => {
            hit_player(state, target);
            true
        }
        Some(CellKind::Empty) => {
            state.board.draw_enemy_bullet(target);
            true
        }
        _ => false,
    }
}

/// Diagonal shot, bouncing off the side walls. Returns whether a shot was
/// fired and the heading to persist.
fn fire_diagonal(
    state: &mut GameState,
    from: Pos,
    heading: HorizontalDir,
) -> (bool, HorizontalDir) {
    let row = from.row + 1;
    if row >= ROWS - 1 {
        return (false, heading);
    }
    let mut heading = heading;
    let mut col = from.col + heading.delta();
    if !is_playable_col(col) {
        heading = heading.opposite();
        col = from.col + heading.delta();
    }
    if !is_playable_col(col) {
        return (false, heading);
    }

    let target = Pos::new(row, col);
    match state.board.kind_at(target) {
        Some(CellKind::Player) => {
            hit_player(state, target);
            (true, heading)
        }
        Some(CellKind::Empty) => {
            state.board.draw_diagonal_bullet(target, heading, false);
            (true, heading)
        }
        _ => (false, heading),
    }
}

fn fire_weapons(state: &mut GameState) -> bool {
    let Some((pos, heading)) = state.boss.as_ref().map(|b| (b.pos, b.diagonal)) else {
        return false;
    };
    let fired_vertical = fire_vertical(state, pos);
    let (fired_diagonal, heading) = fire_diagonal(state, pos, heading);
    if let Some(boss) = state.boss.as_mut() {
        boss.diagonal = heading;
    }
    fired_vertical || fired_diagonal
}

/// One step of boss AI
pub fn update_boss(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    // Teleport
    if boss.pending_teleport {
        boss.pending_teleport = false;
        if teleport(state) {
            set_teleport_cooldown(state);
        }
    } else if boss.teleport_cooldown > 0 {
        boss.teleport_cooldown -= 1;
    } else if state.rng.random_bool(BOSS_TELEPORT_CHANCE) && teleport(state) {
        set_teleport_cooldown(state);
    }

    // Move
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if boss.move_cooldown > 0 {
        boss.move_cooldown -= 1;
    } else if move_boss(state) {
        if let Some(boss) = state.boss.as_mut() {
            boss.move_cooldown = BOSS_MOVE_COOLDOWN;
        }
    }

    // Fire
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if boss.fire_cooldown > 0 {
        boss.fire_cooldown -= 1;
    } else if fire_weapons(state) {
        if let Some(boss) = state.boss.as_mut() {
            if boss.revenge_shots_remaining > 0 {
                boss.revenge_shots_remaining -= 1;
                boss.fire_cooldown = BOSS_REVENGE_BURST_INTERVAL;
            } else {
                boss.fire_cooldown = BOSS_FIRE_COOLDOWN;
            }
        }
    }
}

fn set_teleport_cooldown(state: &mut GameState) {
    if let Some(boss) = state.boss.as_mut() {
        boss.teleport_cooldown = BOSS_TELEPORT_COOLDOWN;
    }
}
