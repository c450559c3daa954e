//! End-to-end scenarios driven through the public API

use space_killer::consts::*;
use space_killer::highscores::HighScores;
use space_killer::session::{Action, create_initial_state, reduce};
use space_killer::sim::enemy::kill_at;
use space_killer::sim::player::fire;
use space_killer::sim::progression::apply_level_layout;
use space_killer::sim::{CellKind, GameEvent, GameState, Pos, TransitionMode};

fn fresh(seed: u64) -> GameState {
    create_initial_state(seed, HighScores::new())
}

#[test]
fn test_fresh_state_and_first_shot() {
    let mut state = fresh(11);
    let start = Pos::new(ROWS - 2, (COLS + 1) / 2);
    assert_eq!(state.player, Some(start));
    assert_eq!(state.metrics.lives, 5);
    assert_eq!(state.metrics.level, 1);
    assert_eq!(state.metrics.current_score, 0);
    assert_eq!(state.ammo.remaining_shots, MAGAZINE_SIZE);
    assert_eq!(state.ammo.cooldown_ticks, 0);

    assert!(fire(&mut state));
    assert!(state.board.is_kind(start.above(), CellKind::PlayerBullet));
    assert_eq!(state.ammo.remaining_shots, MAGAZINE_SIZE - 1);
}

#[test]
fn test_shot_into_enemy_bullet_merges() {
    let mut state = fresh(12);
    let above = state.player.unwrap().above();
    state.board.draw_enemy_bullet(above);

    assert!(fire(&mut state));
    assert_eq!(state.board.kind_at(above), Some(CellKind::BothBullets));
    assert_eq!(state.board.count_of_kind(CellKind::EnemyBullet), 0);
    assert_eq!(state.board.count_of_kind(CellKind::PlayerBullet), 0);
    assert_eq!(state.ammo.remaining_shots, MAGAZINE_SIZE - 1);
}

#[test]
fn test_level_clear_sequence_reaches_level_two() {
    let mut state = fresh(13);
    for pos in state.board.cells_of_kind(CellKind::Enemy) {
        state.board.clear(pos);
    }
    state.enemies = 0;

    let mut log = Vec::new();
    let mut saw_rise = false;
    let mut saw_fill = false;
    for _ in 0..100 {
        state = reduce(&state, &Action::Tick, 0);
        log.extend(state.events.iter().copied());
        saw_rise |= state.transition.mode == TransitionMode::LevelClearRise;
        saw_fill |= state.transition.mode == TransitionMode::LevelClearFill;
        if state.metrics.level == 2 {
            break;
        }
    }

    assert!(saw_rise && saw_fill);
    assert_eq!(state.metrics.level, 2);
    assert_eq!(state.metrics.wait_time, 380);
    assert_eq!(state.player, Some(Pos::new(PLAYER_START_ROW, PLAYER_START_COL)));
    assert!(state.transition.is_idle());
    assert!(!state.status.level_cleared);
    assert_eq!(state.enemies, 13);

    let cleared = log.iter().position(|e| *e == GameEvent::LevelCleared);
    let started = log.iter().position(|e| *e == GameEvent::LevelStart);
    assert!(matches!((cleared, started), (Some(c), Some(s)) if c < s));
}

#[test]
fn test_losing_all_lives_ends_the_run() {
    let mut state = fresh(14);
    for _ in 0..50 {
        if state.status.game_over {
            break;
        }
        if let Some(player) = state.player {
            state.board.draw_enemy_bullet(player.above());
        }
        state = reduce(&state, &Action::Tick, 5_000);
    }

    assert!(state.status.game_over);
    assert_eq!(state.metrics.lives, 0);
    assert_eq!(state.events.last(), Some(&GameEvent::GameOver));

    let id = state.last_score_id.clone().expect("run recorded");
    let entry = state
        .high_scores
        .entries
        .iter()
        .find(|e| e.id == id)
        .expect("entry kept");
    assert_eq!(entry.score, state.metrics.current_score);
    assert_eq!(entry.level, state.metrics.level);
    assert_eq!(entry.timestamp, 5_000);

    let after = reduce(&state, &Action::Tick, 6_000);
    assert_eq!(after.board, state.board);
    assert_eq!(after.metrics, state.metrics);
    assert_eq!(after.events, state.events);
    assert_eq!(after.high_scores, state.high_scores);
    assert_eq!(after.last_score_id, state.last_score_id);
}

#[test]
fn test_final_boss_hit_defeats_boss() {
    let mut state = fresh(15);
    state.metrics.level = BOSS_LEVEL;
    apply_level_layout(&mut state);
    let boss_pos = state.boss.as_ref().expect("boss level").pos;
    state.boss.as_mut().unwrap().lives = 1;
    state.events.clear();

    kill_at(&mut state, boss_pos);

    assert!(state.boss.is_none());
    assert!(state.board.is_empty_at(boss_pos));
    assert_eq!(state.enemies, 0);
    assert_eq!(state.events, vec![GameEvent::BossHit, GameEvent::BossDefeated]);
    assert_eq!(state.metrics.current_score, BOSS_HIT_SCORE);
}

#[test]
fn test_boss_survives_earlier_hits() {
    let mut state = fresh(16);
    state.metrics.level = BOSS_LEVEL;
    apply_level_layout(&mut state);
    let boss_pos = state.boss.as_ref().unwrap().pos;

    kill_at(&mut state, boss_pos);
    let boss = state.boss.as_ref().expect("still alive");
    assert_eq!(boss.lives, BOSS_INITIAL_LIVES - 1);
    assert!(boss.pending_teleport);
    assert_eq!(boss.revenge_shots_remaining, BOSS_REVENGE_BURST_SHOTS);
    assert_eq!(state.enemies, 1);
    assert_eq!(state.events, vec![GameEvent::BossHit]);
}

#[test]
fn test_repeated_queue_move_is_one_move() {
    let state = fresh(17);
    let start = state.player.unwrap();

    let once = reduce(&state, &Action::QueueMoveLeft, 0);
    let twice = reduce(&once, &Action::QueueMoveLeft, 0);
    assert_eq!(once.queued_input, twice.queued_input);

    let a = reduce(&once, &Action::Tick, 0);
    let b = reduce(&twice, &Action::Tick, 0);
    assert_eq!(a.player, Some(start.offset(0, -1)));
    assert_eq!(a.player, b.player);
    assert_eq!(a.board, b.board);
}

#[test]
fn test_same_seed_same_run() {
    let script = [
        Action::QueueShot,
        Action::Tick,
        Action::QueueMoveRight,
        Action::Tick,
        Action::Tick,
        Action::QueueShot,
        Action::Tick,
    ];
    let play = || {
        let mut state = fresh(99);
        for _ in 0..40 {
            for action in &script {
                state = reduce(&state, action, 0);
            }
        }
        state
    };
    let a = play();
    let b = play();
    assert_eq!(a.board, b.board);
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(a.time_ticks, b.time_ticks);
}
