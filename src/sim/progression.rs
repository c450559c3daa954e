//! Level progression: clear animation, level advance, respawn, game over
//!
//! Transition phases run `Idle -> LevelClearRise -> LevelClearFill -> Idle`
//! (next level), or end the run when the last level is cleared.

use super::enemy::{accuracy, tier_bonus};
use super::layout::build_level_layout;
use super::state::{Ammo, GameEvent, GameState, Metrics, TransitionMode};
use crate::consts::*;

/// Shrink the tick interval, floored at `MIN_WAIT_TIME`
fn accelerate(metrics: &mut Metrics) {
    let next = (metrics.wait_time as f64 * SPEED_MULTIPLIER).round() as u32;
    metrics.wait_time = next.max(MIN_WAIT_TIME);
}

/// Accuracy tier for shots since the level started, plus the level's best streak
pub fn level_skill_bonus(metrics: &Metrics) -> i64 {
    let fired = metrics
        .total_shots_fired
        .saturating_sub(metrics.level_start_shots_fired);
    let hit = metrics
        .total_shots_hit
        .saturating_sub(metrics.level_start_shots_hit);
    let accuracy_bonus = tier_bonus(accuracy(hit, fired), &LEVEL_ACCURACY_BONUS_THRESHOLDS);
    accuracy_bonus + metrics.level_best_kill_streak as i64 * LEVEL_STREAK_BONUS_VALUE
}

/// Bonus awarded when a level is completed
pub fn level_bonus(metrics: &Metrics) -> i64 {
    metrics.level as i64 * LEVEL_BONUS_PER_LEVEL
        + metrics.lives.max(0) as i64 * LEVEL_BONUS_PER_LIFE
        + level_skill_bonus(metrics)
}

/// Rebuild the board for the current level and reset per-level state.
/// A respawn on the boss level keeps the boss's remaining lives.
pub fn apply_level_layout(state: &mut GameState) {
    let level = state.metrics.level;
    let carried_boss_lives = state
        .boss
        .as_ref()
        .filter(|_| level == BOSS_LEVEL && state.status.player_died)
        .map(|b| b.lives);

    let layout = build_level_layout(level);
    state.board = layout.board;
    state.enemies = layout.enemies;
    state.player = layout.player;
    state.boss = layout.boss;

    if let (Some(boss), Some(lives)) = (state.boss.as_mut(), carried_boss_lives) {
        boss.lives = boss.lives.min(lives);
    }

    let metrics = &mut state.metrics;
    metrics.kill_streak = 0;
    metrics.level_best_kill_streak = 0;
    metrics.level_start_shots_fired = metrics.total_shots_fired;
    metrics.level_start_shots_hit = metrics.total_shots_hit;

    state.status.player_died = false;
    state.status.level_cleared = false;
    state.ammo = Ammo::full();
    state.queued_input.clear();
    state.transition.reset();
}

/// Move on from a cleared level, or finish the campaign after the last one
pub fn advance_to_next_level(state: &mut GameState, award_bonus: bool) {
    let completed = state.metrics.level;
    if award_bonus {
        let bonus = level_bonus(&state.metrics);
        state.metrics.current_score += bonus;
        state.emit(GameEvent::LevelBonus);
        log::info!("Level {} complete, bonus {}", completed, bonus);
    }

    accelerate(&mut state.metrics);
    state.queued_input.clear();

    if completed >= LAST_LEVEL {
        state.status.game_over = true;
        state.status.level_cleared = false;
        state.transition.reset();
        state.emit(GameEvent::CampaignComplete);
        log::info!("Campaign complete, final score {}", state.metrics.current_score);
        return;
    }

    state.metrics.level += 1;
    apply_level_layout(state);
    state.emit(GameEvent::LevelStart);
    log::info!(
        "Level {} start, tick interval {}ms",
        state.metrics.level,
        state.metrics.wait_time
    );
}

pub fn start_level_clear_transition(state: &mut GameState) {
    state.transition.mode = TransitionMode::LevelClearRise;
    state.transition.progress = 0;
    state.queued_input.clear();
}

/// One step of the level-clear animation
pub fn run_level_clear_transition(state: &mut GameState) {
    match state.transition.mode {
        TransitionMode::Idle => {}
        TransitionMode::LevelClearRise => {
            if let Some(pos) = state.player {
                if pos.row > 1 {
                    let above = pos.above();
                    state.board.move_cell(pos, above);
                    state.player = Some(above);
                } else {
                    state.board.clear(pos);
                    state.player = None;
                }
            }
            if state.player.is_none() {
                state.transition.mode = TransitionMode::LevelClearFill;
                state.transition.progress = 1;
            }
        }
        TransitionMode::LevelClearFill => {
            let row = state.transition.progress.max(1);
            if row < ROWS - 1 {
                state.board.fill_row(row);
                state.transition.progress = row + 1;
                return;
            }
            advance_to_next_level(state, true);
        }
    }
}

pub fn restart_current_level(state: &mut GameState) {
    apply_level_layout(state);
    state.emit(GameEvent::PlayerRespawn);
    state.emit(GameEvent::LevelRestart);
}

pub fn trigger_game_over(state: &mut GameState) {
    if state.status.game_over {
        return;
    }
    state.status.game_over = true;
    state.status.player_died = false;
    state.queued_input.clear();
    state.transition.reset();
    state.emit(GameEvent::GameOver);
    log::info!(
        "Game over at level {} with score {}",
        state.metrics.level,
        state.metrics.current_score
    );
}

/// Death, level clear and out-of-lives checks at the end of a step
pub fn check_milestones(state: &mut GameState) {
    if state.status.game_over {
        return;
    }

    if state.status.player_died {
        if state.metrics.lives > 0 {
            restart_current_level(state);
        } else {
            trigger_game_over(state);
        }
        return;
    }

    if !state.status.level_cleared && state.enemies <= 0 {
        state.status.level_cleared = true;
        start_level_clear_transition(state);
        state.emit(GameEvent::LevelCleared);
        return;
    }

    if state.metrics.lives <= 0 {
        trigger_game_over(state);
    }
}
