//! Space Killer - a grid-based arcade shooter engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, AI, projectiles, progression)
//! - `session`: Action reducer wrapping the simulation
//! - `highscores`: Leaderboard normalization
//! - `persistence`: Leaderboard storage (file on native, LocalStorage on web)
//! - `platform`: Browser/native time and entropy
//! - `settings`: Runner configuration

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreEntry, HighScores};
pub use session::{Action, create_initial_state, reduce};
pub use settings::Settings;
pub use sim::{GameEvent, GameState};

/// Game configuration constants
pub mod consts {
    /// Board dimensions (including the border ring)
    pub const ROWS: i32 = 18;
    pub const COLS: i32 = 18;

    /// Player start cell: bottom playable row, horizontally centred
    pub const PLAYER_START_ROW: i32 = ROWS - 2;
    pub const PLAYER_START_COL: i32 = (COLS + 1) / 2;

    /// Standard enemy wave: one row spanning these columns (inclusive)
    pub const ENEMY_ROW: i32 = 1;
    pub const ENEMY_COL_START: i32 = 3;
    pub const ENEMY_COL_END: i32 = COLS - 3;

    /// Campaign
    pub const INITIAL_LIVES: i32 = 5;
    pub const LAST_LEVEL: u32 = 10;
    pub const BOSS_LEVEL: u32 = 10;

    /// Tick interval (ms), shrinks by SPEED_MULTIPLIER each level
    pub const INITIAL_WAIT_TIME: u32 = 400;
    pub const MIN_WAIT_TIME: u32 = 120;
    pub const SPEED_MULTIPLIER: f64 = 0.95;
    /// Tick interval a front-end should use while the level-clear animation runs
    pub const LEVEL_CLEAR_TICK_MS: u32 = 100;

    /// Ammo
    pub const MAGAZINE_SIZE: u32 = 7;
    pub const PLAYER_RELOAD_TICKS: u32 = 3;

    /// Scoring
    pub const ENEMY_DESTROY_SCORE: i64 = 100;
    pub const BOSS_HIT_SCORE: i64 = 250;
    pub const PLAYER_HIT_PENALTY: i64 = 200;
    pub const STREAK_BONUS_STEP: i64 = 20;
    pub const STREAK_BONUS_CAP: i64 = 200;
    /// (threshold, bonus) pairs, highest tier first
    pub const ACCURACY_BONUS_THRESHOLDS: [(f64, i64); 2] = [(0.9, 75), (0.75, 35)];
    pub const LEVEL_ACCURACY_BONUS_THRESHOLDS: [(f64, i64); 2] = [(0.9, 300), (0.75, 150)];
    pub const LEVEL_STREAK_BONUS_VALUE: i64 = 50;
    pub const LEVEL_BONUS_PER_LEVEL: i64 = 250;
    pub const LEVEL_BONUS_PER_LIFE: i64 = 125;

    /// Enemy evasion
    pub const ENEMY_EVADE_COOLDOWN: u32 = 10;
    pub const ENEMY_EVADE_RANGE: i32 = 2;

    /// Boss
    pub const BOSS_INITIAL_LIVES: u32 = 5;
    pub const BOSS_FIRE_COOLDOWN: u32 = 4;
    pub const BOSS_MOVE_COOLDOWN: u32 = 2;
    pub const BOSS_TELEPORT_COOLDOWN: u32 = 10;
    pub const BOSS_TELEPORT_CHANCE: f64 = 0.10;
    pub const BOSS_TELEPORT_ATTEMPTS: u32 = 6;
    pub const BOSS_VERTICAL_PREFERENCE: f64 = 0.4;
    pub const BOSS_REVENGE_BURST_SHOTS: u32 = 4;
    pub const BOSS_REVENGE_BURST_INTERVAL: u32 = 1;

    /// Leaderboard
    pub const HIGH_SCORE_LIMIT: usize = 10;
    pub const HIGH_SCORE_NAME_MAX_LENGTH: usize = 12;
}
