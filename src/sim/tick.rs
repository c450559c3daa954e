//! Fixed-step simulation tick
//!
//! Advances the game state by one discrete step. Ordering within a step is
//! part of the game rules: player input, projectiles, enemies, boss, then
//! milestone checks.

use super::boss::update_boss;
use super::enemy::move_enemies;
use super::player::{apply_queued_fire, apply_queued_move};
use super::progression::{check_milestones, run_level_clear_transition};
use super::projectiles::resolve_projectiles;
use super::state::GameState;

/// Advance the game state by one step
pub fn tick(state: &mut GameState) {
    // The level-clear animation runs even while paused
    if !state.transition.is_idle() {
        state.events.clear();
        run_level_clear_transition(state);
        return;
    }

    if state.status.game_over || state.status.paused {
        return;
    }

    // A death left unresolved by an outside mutation
    if state.status.player_died {
        state.events.clear();
        check_milestones(state);
        return;
    }

    if !state.is_playable() {
        return;
    }

    state.events.clear();
    state.ammo.tick_reload();

    apply_queued_move(state);
    apply_queued_fire(state);

    resolve_projectiles(state);
    move_enemies(state);
    update_boss(state);

    check_milestones(state);

    state.queued_input.clear();
    state.time_ticks += 1;
}
