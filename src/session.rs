//! Session reducer
//!
//! The only inbound surface of the engine: a previous [`GameState`] plus one
//! [`Action`] yields the next state. Queue actions fill single-slot buffers
//! that the next `Tick` consumes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::highscores::{HighScoreEntry, HighScores, generate_id};
use crate::sim::grid::HorizontalDir;
use crate::sim::progression::{advance_to_next_level, apply_level_layout};
use crate::sim::{GameEvent, GameState, tick};

/// Commands a front-end can dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    Reset,
    PauseToggle,
    QueueMoveLeft,
    QueueMoveRight,
    QueueShot,
    Tick,
    AdvanceLevel,
    PlayerRespawned,
    SetHighScoreName { id: String, name: String },
}

/// Fresh level-1 state carrying a previously loaded leaderboard
pub fn create_initial_state(seed: u64, mut high_scores: HighScores) -> GameState {
    high_scores.normalize();
    let mut state = GameState::new(seed);
    state.high_scores = high_scores;
    log::info!("New session, seed {}", seed);
    state
}

/// Pure step: `state` is left untouched
pub fn reduce(state: &GameState, action: &Action, now_ms: u64) -> GameState {
    let mut next = state.clone();
    apply(&mut next, action, now_ms);
    next
}

/// In-place variant of [`reduce`] for callers that own the state
pub fn apply(state: &mut GameState, action: &Action, now_ms: u64) {
    match action {
        Action::Reset => {
            let seed = state.rng.random::<u64>();
            let high_scores = std::mem::take(&mut state.high_scores);
            *state = create_initial_state(seed, high_scores);
        }
        Action::PauseToggle => {
            state.status.paused = !state.status.paused;
            log::debug!("Paused: {}", state.status.paused);
        }
        Action::QueueMoveLeft => queue_move(state, HorizontalDir::Left),
        Action::QueueMoveRight => queue_move(state, HorizontalDir::Right),
        Action::QueueShot => {
            if state.is_playable() {
                state.queued_input.fire = true;
            }
        }
        Action::Tick => {
            let was_over = state.status.game_over;
            tick(state);
            if state.status.game_over && !was_over {
                record_high_score(state, now_ms);
            }
        }
        Action::AdvanceLevel => {
            if state.status.game_over {
                return;
            }
            state.events.clear();
            state.status.level_cleared = false;
            advance_to_next_level(state, true);
        }
        Action::PlayerRespawned => {
            if state.status.game_over {
                return;
            }
            state.events.clear();
            apply_level_layout(state);
            state.emit(GameEvent::PlayerRespawn);
        }
        Action::SetHighScoreName { id, name } => {
            state.high_scores.set_name(id, name);
        }
    }
}

fn queue_move(state: &mut GameState, dir: HorizontalDir) {
    if state.is_playable() {
        state.queued_input.move_dir = Some(dir);
    }
}

/// Add the finished run to the leaderboard
fn record_high_score(state: &mut GameState, now_ms: u64) {
    let entry = HighScoreEntry {
        id: generate_id(&mut state.rng),
        name: String::new(),
        score: state.metrics.current_score,
        level: state.metrics.level,
        timestamp: now_ms,
    };
    let id = entry.id.clone();
    if state.high_scores.record(entry) {
        log::info!("Score {} placed on the leaderboard", state.metrics.current_score);
        state.last_score_id = Some(id);
    } else {
        state.last_score_id = None;
    }
}
