//! Player movement, firing and damage

use super::enemy::kill_at;
use super::grid::{CellKind, HorizontalDir, Pos};
use super::state::{Ammo, GameEvent, GameState};
use crate::consts::PLAYER_HIT_PENALTY;

/// Destroy the player if it occupies `pos`. The only way the player leaves
/// the board outside the level-clear animation.
pub fn hit_player(state: &mut GameState, pos: Pos) {
    if !state.board.is_kind(pos, CellKind::Player) {
        return;
    }
    state.board.clear(pos);
    state.metrics.lives -= 1;
    state.metrics.current_score -= PLAYER_HIT_PENALTY;
    state.status.player_died = true;
    state.ammo = Ammo::full();
    state.player = None;
    state.emit(GameEvent::PlayerHit);
    log::debug!("Player hit at {:?}, {} lives left", pos, state.metrics.lives);
}

/// Step one column sideways into an empty cell
pub fn move_player(state: &mut GameState, dir: HorizontalDir) -> bool {
    if !state.is_playable() {
        return false;
    }
    let Some(pos) = state.player else {
        return false;
    };
    let target = pos.offset(0, dir.delta());
    if !state.board.is_empty_at(target) {
        return false;
    }
    if state.board.move_cell(pos, target) {
        state.player = Some(target);
        return true;
    }
    false
}

/// Fire from the cell directly above the player
pub fn fire(state: &mut GameState) -> bool {
    if !state.is_playable() || !state.ammo.can_fire() {
        return false;
    }
    let Some(pos) = state.player else {
        return false;
    };
    let above = pos.above();

    match state.board.kind_at(above) {
        Some(CellKind::Empty) => {
            state.board.draw_player_bullet(above);
        }
        Some(CellKind::EnemyBullet) => {
            state.board.draw_both_bullets(above);
        }
        Some(CellKind::Enemy | CellKind::Boss) => {
            // Point blank: no bullet, no ammo spent
            state.metrics.total_shots_fired += 1;
            kill_at(state, above);
            return true;
        }
        _ => return false,
    }

    state.ammo.consume();
    state.metrics.total_shots_fired += 1;
    state.emit(GameEvent::PlayerFired);
    true
}

/// Consume the queued move slot
pub fn apply_queued_move(state: &mut GameState) {
    if let Some(dir) = state.queued_input.move_dir.take() {
        move_player(state, dir);
    }
}

/// Consume the queued fire slot
pub fn apply_queued_fire(state: &mut GameState) {
    if std::mem::take(&mut state.queued_input.fire) {
        fire(state);
    }
}
