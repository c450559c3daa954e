//! Game state and core simulation types
//!
//! `GameState` is the sole unit of ownership. A step clones it into a draft,
//! mutates the draft in place, and hands the draft back as the next state.

use rand::rand_core::impls;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Board, HorizontalDir, Pos, VerticalDir};
use super::layout::build_level_layout;
use crate::consts::*;
use crate::highscores::HighScores;

/// Something that happened during a step, for audio/visual cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameEvent {
    PlayerFired,
    EnemyExplosion,
    PlayerHit,
    BossHit,
    BossDefeated,
    LevelCleared,
    LevelBonus,
    LevelStart,
    CampaignComplete,
    PlayerRespawn,
    LevelRestart,
    GameOver,
}

impl GameEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::PlayerFired => "player-fired",
            GameEvent::EnemyExplosion => "enemy-explosion",
            GameEvent::PlayerHit => "player-hit",
            GameEvent::BossHit => "boss-hit",
            GameEvent::BossDefeated => "boss-defeated",
            GameEvent::LevelCleared => "level-cleared",
            GameEvent::LevelBonus => "level-bonus",
            GameEvent::LevelStart => "level-start",
            GameEvent::CampaignComplete => "campaign-complete",
            GameEvent::PlayerRespawn => "player-respawn",
            GameEvent::LevelRestart => "level-restart",
            GameEvent::GameOver => "game-over",
        }
    }
}

/// The boss (boss level only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Pos,
    pub lives: u32,
    pub fire_cooldown: u32,
    pub move_cooldown: u32,
    pub teleport_cooldown: u32,
    pub horizontal: HorizontalDir,
    pub vertical: VerticalDir,
    /// Heading given to the next diagonal shot
    pub diagonal: HorizontalDir,
    /// Extra fast shots owed after being hit
    pub revenge_shots_remaining: u32,
    /// Teleport on the next step, ignoring cooldown and chance
    pub pending_teleport: bool,
}

impl Boss {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            lives: BOSS_INITIAL_LIVES,
            fire_cooldown: 1,
            move_cooldown: 1,
            teleport_cooldown: 1,
            horizontal: HorizontalDir::Right,
            vertical: VerticalDir::Down,
            diagonal: HorizontalDir::Right,
            revenge_shots_remaining: 0,
            pending_teleport: false,
        }
    }
}

/// Score, lives and accuracy bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub lives: i32,
    pub level: u32,
    pub current_score: i64,
    /// Tick interval in ms
    pub wait_time: u32,
    pub kill_streak: u32,
    pub best_kill_streak: u32,
    pub level_best_kill_streak: u32,
    pub total_shots_fired: u32,
    pub total_shots_hit: u32,
    /// Baselines for per-level accuracy
    pub level_start_shots_fired: u32,
    pub level_start_shots_hit: u32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            lives: INITIAL_LIVES,
            level: 1,
            current_score: 0,
            wait_time: INITIAL_WAIT_TIME,
            kill_streak: 0,
            best_kill_streak: 0,
            level_best_kill_streak: 0,
            total_shots_fired: 0,
            total_shots_hit: 0,
            level_start_shots_fired: 0,
            level_start_shots_hit: 0,
        }
    }
}

/// Magazine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    pub remaining_shots: u32,
    /// Reload ticks left; firing is disabled while positive
    pub cooldown_ticks: u32,
}

impl Default for Ammo {
    fn default() -> Self {
        Self::full()
    }
}

impl Ammo {
    pub fn full() -> Self {
        Self {
            remaining_shots: MAGAZINE_SIZE,
            cooldown_ticks: 0,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown_ticks == 0 && self.remaining_shots > 0
    }

    /// Spend one shot, starting the reload when the magazine empties
    pub fn consume(&mut self) {
        self.remaining_shots = self.remaining_shots.saturating_sub(1);
        if self.remaining_shots == 0 {
            self.cooldown_ticks = PLAYER_RELOAD_TICKS;
        }
    }

    /// Return a shot whose bullet was absorbed without hitting anything
    pub fn refund(&mut self) {
        self.remaining_shots = (self.remaining_shots + 1).min(MAGAZINE_SIZE);
    }

    /// Advance the reload by one step
    pub fn tick_reload(&mut self) {
        if self.cooldown_ticks > 0 {
            self.cooldown_ticks -= 1;
            if self.cooldown_ticks == 0 {
                self.remaining_shots = MAGAZINE_SIZE;
            }
        }
    }
}

/// Status flags; more than one can hold at a transition instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub game_over: bool,
    pub paused: bool,
    pub level_cleared: bool,
    pub player_died: bool,
}

/// Level-clear animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionMode {
    #[default]
    Idle,
    LevelClearRise,
    LevelClearFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transition {
    pub mode: TransitionMode,
    /// Next row to fill during `LevelClearFill`
    pub progress: i32,
}

impl Transition {
    pub fn is_idle(&self) -> bool {
        self.mode == TransitionMode::Idle
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Single-slot input buffers, overwritten rather than queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueuedInput {
    pub move_dir: Option<HorizontalDir>,
    pub fire: bool,
}

impl QueuedInput {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Serialized form of [`DiceRng`]: the seed and how far the stream has run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

/// Seeded PCG stream that counts its draws, so a snapshot restores it
/// mid-stream instead of from the start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RngState", into = "RngState")]
pub struct DiceRng {
    state: RngState,
    inner: Pcg32,
}

impl DiceRng {
    pub fn new(seed: u64) -> Self {
        RngState { seed, draws: 0 }.into()
    }

    pub fn state(&self) -> RngState {
        self.state
    }
}

impl From<RngState> for DiceRng {
    fn from(state: RngState) -> Self {
        let mut inner = Pcg32::seed_from_u64(state.seed);
        inner.advance(state.draws);
        Self { state, inner }
    }
}

impl From<DiceRng> for RngState {
    fn from(rng: DiceRng) -> Self {
        rng.state
    }
}

// Every draw goes through `next_u32`: one call, one PCG step
impl RngCore for DiceRng {
    fn next_u32(&mut self) -> u32 {
        self.state.draws = self.state.draws.wrapping_add(1);
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the generator was created from
    pub seed: u64,
    /// Dice, teleports and score ids all draw from here
    pub(crate) rng: DiceRng,
    pub board: Board,
    pub player: Option<Pos>,
    pub boss: Option<Boss>,
    /// Enemies (or the boss) still standing
    pub enemies: i32,
    pub status: Status,
    pub metrics: Metrics,
    pub ammo: Ammo,
    pub queued_input: QueuedInput,
    pub transition: Transition,
    /// Throttle for the enemy evasion scan
    pub evade_cooldown: u32,
    /// Events from the most recently processed step
    pub events: Vec<GameEvent>,
    pub high_scores: HighScores,
    /// Leaderboard entry created by the last finished run, if it placed
    pub last_score_id: Option<String>,
    /// Processed steps this run
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh run at level 1 with an empty leaderboard
    pub fn new(seed: u64) -> Self {
        let layout = build_level_layout(1);
        Self {
            seed,
            rng: DiceRng::new(seed),
            board: layout.board,
            player: layout.player,
            boss: layout.boss,
            enemies: layout.enemies,
            status: Status::default(),
            metrics: Metrics::default(),
            ammo: Ammo::full(),
            queued_input: QueuedInput::default(),
            transition: Transition::default(),
            evade_cooldown: 0,
            events: Vec::new(),
            high_scores: HighScores::new(),
            last_score_id: None,
            time_ticks: 0,
        }
    }

    /// Normal input and simulation may run
    pub fn is_playable(&self) -> bool {
        !self.status.game_over
            && !self.status.paused
            && !self.status.level_cleared
            && !self.status.player_died
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events from the last step as kebab-case names
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.as_str()).collect()
    }
}
