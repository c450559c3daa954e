//! Enemy AI, kill resolution and kill scoring
//!
//! Enemies have no identity: each step scans the board for enemy cells and
//! moves them one by one from a snapshot.

use rand::Rng;

use super::grid::{CellKind, HorizontalDir, Pos, is_playable_col};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// First matching tier bonus for `accuracy`, 0 if none
pub(crate) fn tier_bonus(accuracy: f64, tiers: &[(f64, i64)]) -> i64 {
    tiers
        .iter()
        .find(|(threshold, _)| accuracy >= *threshold)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}

/// Hits over shots fired, 0 when nothing was fired
pub(crate) fn accuracy(hits: u32, fired: u32) -> f64 {
    if fired == 0 {
        return 0.0;
    }
    (hits as f64 / fired as f64).min(1.0)
}

/// Record a kill and add `base` plus streak and accuracy bonuses to the score.
/// Returns the points awarded.
fn award_kill(state: &mut GameState, base: i64) -> i64 {
    let metrics = &mut state.metrics;
    metrics.total_shots_hit += 1;
    metrics.kill_streak += 1;
    metrics.best_kill_streak = metrics.best_kill_streak.max(metrics.kill_streak);
    metrics.level_best_kill_streak = metrics.level_best_kill_streak.max(metrics.kill_streak);

    let streak_bonus =
        (metrics.kill_streak.saturating_sub(1) as i64 * STREAK_BONUS_STEP).min(STREAK_BONUS_CAP);
    let accuracy_bonus = tier_bonus(
        accuracy(metrics.total_shots_hit, metrics.total_shots_fired),
        &ACCURACY_BONUS_THRESHOLDS,
    );

    let award = base + streak_bonus + accuracy_bonus;
    metrics.current_score += award;
    award
}

/// Resolve a hit on the enemy or boss at `pos`. Anything else is ignored.
pub fn kill_at(state: &mut GameState, pos: Pos) {
    match state.board.kind_at(pos) {
        Some(CellKind::Enemy) => {
            state.board.clear(pos);
            state.enemies = (state.enemies - 1).max(0);
            award_kill(state, ENEMY_DESTROY_SCORE);
            state.emit(GameEvent::EnemyExplosion);
        }
        Some(CellKind::Boss) => hit_boss(state, pos),
        _ => {}
    }
}

fn hit_boss(state: &mut GameState, pos: Pos) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.lives = boss.lives.saturating_sub(1);
    let lives = boss.lives;
    if lives > 0 {
        boss.pending_teleport = true;
        boss.revenge_shots_remaining += BOSS_REVENGE_BURST_SHOTS;
        boss.fire_cooldown = 0;
    }

    award_kill(state, BOSS_HIT_SCORE);
    state.emit(GameEvent::BossHit);
    if lives > 0 {
        log::debug!("Boss hit, {} lives left, revenge burst queued", lives);
        return;
    }

    state.board.clear(pos);
    state.enemies = (state.enemies - 1).max(0);
    state.boss = None;
    state.emit(GameEvent::BossDefeated);
    log::info!("Boss defeated");
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct EvadeOutcome {
    threatened: bool,
    moved: bool,
}

/// Player-owned projectiles an enemy may want to dodge
fn collect_threats(state: &GameState) -> Vec<Pos> {
    let mut threats = state.board.cells_of_kind(CellKind::PlayerBullet);
    threats.extend(state.board.cells_of_kind(CellKind::BothBullets));
    threats
}

fn try_step(state: &mut GameState, from: Pos, to: Pos) -> bool {
    if to.is_border() || !state.board.is_empty_at(to) {
        return false;
    }
    state.board.move_cell(from, to)
}

fn attempt_evade(state: &mut GameState, pos: Pos, threats: &[Pos]) -> EvadeOutcome {
    let mut outcome = EvadeOutcome::default();

    for threat in threats {
        let rows_below = threat.row - pos.row;
        let col_diff = threat.col - pos.col;
        if rows_below < 0 || rows_below > ENEMY_EVADE_RANGE || col_diff.abs() > ENEMY_EVADE_RANGE {
            continue;
        }
        outcome.threatened = true;

        // Dodge away from the side the shot is on
        let order = if col_diff >= 0 {
            [HorizontalDir::Left, HorizontalDir::Right]
        } else {
            [HorizontalDir::Right, HorizontalDir::Left]
        };
        for dir in order {
            if try_step(state, pos, pos.offset(0, dir.delta())) {
                outcome.moved = true;
                return outcome;
            }
        }
        if try_step(state, pos, pos.above()) {
            outcome.moved = true;
            return outcome;
        }
    }

    outcome
}

/// Sideways step, falling back to a vertical step
fn wander(state: &mut GameState, pos: Pos, dir: HorizontalDir) {
    let side = pos.offset(0, dir.delta());
    if is_playable_col(side.col) && try_step(state, pos, side) {
        return;
    }
    // Stay clear of the player row and the top edge
    if pos.row < ROWS - 4 && try_step(state, pos, pos.below()) {
        return;
    }
    if pos.row > 2 {
        try_step(state, pos, pos.above());
    }
}

/// One step of enemy AI: evade, shoot, or wander
pub fn move_enemies(state: &mut GameState) {
    if state.evade_cooldown > 0 {
        state.evade_cooldown -= 1;
    }
    let threats = if state.evade_cooldown == 0 {
        collect_threats(state)
    } else {
        Vec::new()
    };

    for pos in state.board.cells_of_kind(CellKind::Enemy) {
        if !state.board.is_kind(pos, CellKind::Enemy) {
            continue;
        }

        if state.evade_cooldown == 0 {
            let outcome = attempt_evade(state, pos, &threats);
            if outcome.threatened {
                state.evade_cooldown = ENEMY_EVADE_COOLDOWN;
            }
            if outcome.moved {
                continue;
            }
        }

        match state.rng.random_range(1..=6) {
            6 => {
                let below = pos.below();
                if below.row < ROWS - 1 && state.board.is_empty_at(below) {
                    state.board.draw_enemy_bullet(below);
                }
            }
            3..=5 => wander(state, pos, HorizontalDir::Left),
            _ => wander(state, pos, HorizontalDir::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Board;

    fn empty_state() -> GameState {
        let mut state = GameState::new(3);
        state.board = Board::bordered();
        state.player = None;
        state.enemies = 0;
        state
    }

    #[test]
    fn test_tier_bonus() {
        assert_eq!(tier_bonus(1.0, &ACCURACY_BONUS_THRESHOLDS), 75);
        assert_eq!(tier_bonus(0.9, &ACCURACY_BONUS_THRESHOLDS), 75);
        assert_eq!(tier_bonus(0.8, &ACCURACY_BONUS_THRESHOLDS), 35);
        assert_eq!(tier_bonus(0.5, &ACCURACY_BONUS_THRESHOLDS), 0);
    }

    #[test]
    fn test_accuracy_guarded() {
        assert_eq!(accuracy(3, 0), 0.0);
        assert_eq!(accuracy(5, 4), 1.0);
        assert!((accuracy(1, 2) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kill_enemy_scoring() {
        let mut state = empty_state();
        let pos = Pos::new(4, 4);
        state.board.set_kind(pos, CellKind::Enemy);
        state.enemies = 1;
        state.metrics.total_shots_fired = 2;

        kill_at(&mut state, pos);
        assert!(state.board.is_empty_at(pos));
        assert_eq!(state.enemies, 0);
        // 1 hit of 2 shots: no accuracy bonus, no streak bonus yet
        assert_eq!(state.metrics.current_score, 100);
        assert_eq!(state.metrics.kill_streak, 1);
        assert_eq!(state.events, vec![GameEvent::EnemyExplosion]);
    }

    #[test]
    fn test_streak_and_accuracy_bonus() {
        let mut state = empty_state();
        state.metrics.kill_streak = 3;
        state.metrics.total_shots_fired = 10;
        state.metrics.total_shots_hit = 8;
        let pos = Pos::new(2, 2);
        state.board.set_kind(pos, CellKind::Enemy);
        state.enemies = 1;

        kill_at(&mut state, pos);
        // streak 4 -> 60, accuracy 9/10 -> 75
        assert_eq!(state.metrics.current_score, 100 + 60 + 75);
        assert_eq!(state.metrics.best_kill_streak, 4);
        assert_eq!(state.metrics.level_best_kill_streak, 4);
    }

    #[test]
    fn test_streak_bonus_capped() {
        let mut state = empty_state();
        state.metrics.kill_streak = 50;
        let pos = Pos::new(2, 2);
        state.board.set_kind(pos, CellKind::Enemy);
        state.enemies = 1;

        kill_at(&mut state, pos);
        // No shots fired: accuracy guarded to 0
        assert_eq!(state.metrics.current_score, 100 + STREAK_BONUS_CAP);
    }

    #[test]
    fn test_kill_ignores_non_targets() {
        let mut state = empty_state();
        let pos = Pos::new(5, 5);
        state.board.draw_enemy_bullet(pos);
        kill_at(&mut state, pos);
        kill_at(&mut state, Pos::new(-3, 40));
        assert!(state.board.is_kind(pos, CellKind::EnemyBullet));
        assert!(state.events.is_empty());
        assert_eq!(state.metrics.total_shots_hit, 0);
    }

    #[test]
    fn test_boss_hit_schedules_revenge() {
        let mut state = GameState::new(1);
        state.metrics.level = BOSS_LEVEL;
        let layout = crate::sim::layout::build_level_layout(BOSS_LEVEL);
        state.board = layout.board;
        state.boss = layout.boss;
        state.enemies = layout.enemies;
        let pos = state.boss.as_ref().unwrap().pos;

        kill_at(&mut state, pos);
        let boss = state.boss.as_ref().unwrap();
        assert_eq!(boss.lives, BOSS_INITIAL_LIVES - 1);
        assert!(boss.pending_teleport);
        assert_eq!(boss.revenge_shots_remaining, BOSS_REVENGE_BURST_SHOTS);
        assert_eq!(boss.fire_cooldown, 0);
        assert_eq!(state.enemies, 1);
        assert_eq!(state.metrics.current_score, BOSS_HIT_SCORE);
        assert_eq!(state.events, vec![GameEvent::BossHit]);
    }

    #[test]
    fn test_enemy_fires_or_moves() {
        // Whatever the roll, a lone enemy in open space either moved or fired
        for seed in 0..20 {
            let mut state = empty_state();
            state.rng = crate::sim::state::DiceRng::new(seed);
            let pos = Pos::new(5, 8);
            state.board.set_kind(pos, CellKind::Enemy);
            state.evade_cooldown = 5;

            move_enemies(&mut state);
            let moved = !state.board.is_kind(pos, CellKind::Enemy);
            let fired = state.board.is_kind(pos.below(), CellKind::EnemyBullet);
            assert!(moved ^ fired, "seed {seed}: moved={moved} fired={fired}");
            assert_eq!(state.board.count_of_kind(CellKind::Enemy), 1);
        }
    }

    #[test]
    fn test_enemy_evades_incoming_shot() {
        let mut state = empty_state();
        let pos = Pos::new(5, 8);
        state.board.set_kind(pos, CellKind::Enemy);
        state.board.draw_player_bullet(Pos::new(7, 8));

        move_enemies(&mut state);
        // Shot in the same column: dodge left first
        assert!(state.board.is_kind(Pos::new(5, 7), CellKind::Enemy));
        assert_eq!(state.evade_cooldown, ENEMY_EVADE_COOLDOWN);
    }

    #[test]
    fn test_evade_throttled_while_cooling_down() {
        let mut state = empty_state();
        let pos = Pos::new(5, 8);
        state.board.set_kind(pos, CellKind::Enemy);
        state.board.draw_player_bullet(Pos::new(6, 8));
        state.evade_cooldown = 3;

        move_enemies(&mut state);
        assert_eq!(state.evade_cooldown, 2);
    }

    #[test]
    fn test_cornered_enemy_still_resets_throttle() {
        let mut state = empty_state();
        let pos = Pos::new(1, 1);
        state.board.set_kind(pos, CellKind::Enemy);
        state.board.set_kind(Pos::new(1, 2), CellKind::Enemy);
        state.board.draw_player_bullet(Pos::new(2, 1));

        move_enemies(&mut state);
        assert_eq!(state.evade_cooldown, ENEMY_EVADE_COOLDOWN);
    }

    fn boxed_enemy(state: &mut GameState, pos: Pos) {
        state.board.set_kind(pos, CellKind::Enemy);
        state.board.set_kind(pos.offset(0, -1), CellKind::Enemy);
        state.board.set_kind(pos.offset(0, 1), CellKind::Enemy);
    }

    #[test]
    fn test_wander_never_steps_down_near_player_row() {
        let mut state = empty_state();
        let pos = Pos::new(ROWS - 4, 8);
        boxed_enemy(&mut state, pos);

        wander(&mut state, pos, HorizontalDir::Left);
        assert!(state.board.is_empty_at(pos.below()));
        assert!(state.board.is_kind(pos.above(), CellKind::Enemy));
        assert!(state.board.is_empty_at(pos));
    }

    #[test]
    fn test_wander_never_steps_up_near_top() {
        let mut state = empty_state();
        let pos = Pos::new(2, 8);
        boxed_enemy(&mut state, pos);
        state.board.set_kind(pos.below(), CellKind::Enemy);

        wander(&mut state, pos, HorizontalDir::Right);
        assert!(state.board.is_kind(pos, CellKind::Enemy));
        assert!(state.board.is_empty_at(pos.above()));
    }

    #[test]
    fn test_wander_steps_down_when_side_blocked() {
        let mut state = empty_state();
        let pos = Pos::new(2, 8);
        boxed_enemy(&mut state, pos);

        wander(&mut state, pos, HorizontalDir::Right);
        assert!(state.board.is_kind(pos.below(), CellKind::Enemy));
        assert!(state.board.is_empty_at(pos));
    }

    #[test]
    fn test_wander_right_edge_goes_vertical() {
        let mut state = empty_state();
        let pos = Pos::new(5, COLS - 2);
        state.board.set_kind(pos, CellKind::Enemy);

        wander(&mut state, pos, HorizontalDir::Right);
        assert!(state.board.is_kind(pos.below(), CellKind::Enemy));
        assert!(state.board.is_empty_at(pos));
        assert!(state.board.is_kind(pos.offset(0, 1), CellKind::Border));
    }

    #[test]
    fn test_wander_left_edge_goes_vertical() {
        let mut state = empty_state();
        let pos = Pos::new(ROWS - 4, 1);
        state.board.set_kind(pos, CellKind::Enemy);

        wander(&mut state, pos, HorizontalDir::Left);
        assert!(state.board.is_kind(pos.above(), CellKind::Enemy));
        assert!(state.board.is_empty_at(pos));
    }
}
