//! Space Killer entry point
//!
//! Native builds run a headless session driven by an autopilot and persist
//! the leaderboard to a JSON file. The wasm32 build exports a
//! `SpaceKillerGame` handle for a browser front-end to drive.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use space_killer::consts::LEVEL_CLEAR_TICK_MS;
    use space_killer::persistence::{LeaderboardStore, LocalStorageStore};
    use space_killer::platform;
    use space_killer::session::{Action, apply, create_initial_state};
    use space_killer::sim::GameState;

    /// Engine handle owned by the page. The page schedules `tick` actions
    /// every `wait_time()` ms and renders from `snapshot_json()`.
    #[wasm_bindgen]
    pub struct SpaceKillerGame {
        state: GameState,
        store: LocalStorageStore,
    }

    #[wasm_bindgen]
    impl SpaceKillerGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> SpaceKillerGame {
            let store = LocalStorageStore;
            let seed = platform::entropy_seed();
            let state = create_initial_state(seed, store.load());
            SpaceKillerGame { state, store }
        }

        /// Apply one JSON-encoded action, e.g. `{"type":"queue-shot"}`
        pub fn dispatch(&mut self, action_json: &str) -> Result<(), JsValue> {
            let action: Action = serde_json::from_str(action_json)
                .map_err(|e| JsValue::from_str(&format!("bad action: {}", e)))?;

            let before = self.state.high_scores.clone();
            apply(&mut self.state, &action, platform::now_ms());
            if self.state.high_scores != before {
                if let Err(e) = self.store.save(&self.state.high_scores) {
                    log::warn!("{}", e);
                }
            }
            Ok(())
        }

        /// Full state as JSON for rendering
        pub fn snapshot_json(&self) -> Result<String, JsValue> {
            serde_json::to_string(&self.state).map_err(|e| JsValue::from_str(&e.to_string()))
        }

        /// Events from the last processed step
        pub fn events(&self) -> js_sys::Array {
            self.state
                .event_names()
                .into_iter()
                .map(JsValue::from_str)
                .collect()
        }

        /// Delay before the next `tick`, shorter during the level-clear animation
        pub fn wait_time(&self) -> u32 {
            if self.state.transition.is_idle() {
                self.state.metrics.wait_time
            } else {
                LEVEL_CLEAR_TICK_MS
            }
        }

        pub fn is_game_over(&self) -> bool {
            self.state.status.game_over
        }
    }

    impl Default for SpaceKillerGame {
        fn default() -> Self {
            Self::new()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }
        log::info!("Space Killer ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;

    use space_killer::consts::COLS;
    use space_killer::persistence::{JsonFileStore, LeaderboardStore};
    use space_killer::platform;
    use space_killer::session::{Action, apply, create_initial_state};
    use space_killer::settings::{Autopilot, Settings};
    use space_killer::sim::{CellKind, GameEvent, GameState, Pos};

    /// Default settings file, overridable by the first CLI argument
    const SETTINGS_FILE: &str = "space_killer_settings.json";

    /// Rows above the player the hunter watches for incoming fire
    const DANGER_RANGE: i32 = 3;

    fn is_hostile_shot(kind: CellKind) -> bool {
        matches!(
            kind,
            CellKind::EnemyBullet | CellKind::BossDiagonalBullet | CellKind::BossCombinedBullet
        )
    }

    fn column_threatened(state: &GameState, player: Pos, col: i32) -> bool {
        (1..=DANGER_RANGE).any(|d| {
            state
                .board
                .kind_at(Pos::new(player.row - d, col))
                .is_some_and(is_hostile_shot)
        })
    }

    fn step_toward(from: i32, to: i32) -> Option<Action> {
        match to.cmp(&from) {
            std::cmp::Ordering::Less => Some(Action::QueueMoveLeft),
            std::cmp::Ordering::Greater => Some(Action::QueueMoveRight),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Inputs the autopilot queues before the next tick
    pub fn plan(state: &GameState, mode: Autopilot) -> Vec<Action> {
        let Some(player) = state.player else {
            return Vec::new();
        };
        if !state.is_playable() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        match mode {
            Autopilot::Off => {}
            Autopilot::Sweep => {
                // Sweep back and forth across the playable columns
                let span = (COLS - 3) as u64;
                let phase = state.time_ticks % (2 * span);
                let offset = if phase < span { phase } else { 2 * span - phase };
                actions.extend(step_toward(player.col, 1 + offset as i32));
                actions.push(Action::QueueShot);
            }
            Autopilot::Hunter => {
                if column_threatened(state, player, player.col) {
                    let left = player.offset(0, -1);
                    let dodge = if state.board.is_empty_at(left)
                        && !column_threatened(state, player, left.col)
                    {
                        Action::QueueMoveLeft
                    } else {
                        Action::QueueMoveRight
                    };
                    actions.push(dodge);
                    return actions;
                }

                let target = state
                    .board
                    .iter()
                    .filter(|(_, cell)| matches!(cell.kind, CellKind::Enemy | CellKind::Boss))
                    .map(|(pos, _)| pos.col)
                    .min_by_key(|col| (col - player.col).abs());
                if let Some(col) = target {
                    actions.extend(step_toward(player.col, col));
                }
                if state.ammo.can_fire() {
                    actions.push(Action::QueueShot);
                }
            }
        }
        actions
    }

    fn log_events(state: &GameState) {
        for event in &state.events {
            match event {
                GameEvent::PlayerFired | GameEvent::EnemyExplosion | GameEvent::BossHit => {
                    log::debug!("[tick {}] {}", state.time_ticks, event.as_str())
                }
                _ => log::info!(
                    "[tick {}] {} (level {}, score {}, lives {})",
                    state.time_ticks,
                    event.as_str(),
                    state.metrics.level,
                    state.metrics.current_score,
                    state.metrics.lives
                ),
            }
        }
    }

    pub fn run() {
        let settings_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        let mut settings = Settings::load(&settings_path);
        settings.apply_env();

        let store = JsonFileStore::new(&settings.leaderboard_path);
        let seed = settings.resolve_seed();
        let mut state = create_initial_state(seed, store.load());
        log::info!(
            "Autopilot {}, up to {} ticks",
            settings.autopilot.as_str(),
            settings.max_ticks
        );

        let mut ticks = 0;
        while !state.status.game_over && ticks < settings.max_ticks {
            for action in plan(&state, settings.autopilot) {
                apply(&mut state, &action, platform::now_ms());
            }
            apply(&mut state, &Action::Tick, platform::now_ms());
            log_events(&state);
            ticks += 1;
        }

        if !state.status.game_over {
            log::info!("Stopped after {} ticks without finishing", ticks);
        }

        if let (Some(id), Some(name)) =
            (state.last_score_id.clone(), settings.player_name.clone())
        {
            apply(
                &mut state,
                &Action::SetHighScoreName { id, name },
                platform::now_ms(),
            );
        }
        if state.last_score_id.is_some() {
            if let Err(e) = store.save(&state.high_scores) {
                log::error!("Could not save high scores: {}", e);
            }
        }

        println!(
            "seed {} | level {} | score {} | best streak {} | shots {}/{}",
            seed,
            state.metrics.level,
            state.metrics.current_score,
            state.metrics.best_kill_streak,
            state.metrics.total_shots_hit,
            state.metrics.total_shots_fired
        );
        for (rank, entry) in state.high_scores.entries.iter().enumerate() {
            let marker = if state.last_score_id.as_deref() == Some(entry.id.as_str()) {
                "*"
            } else {
                " "
            };
            println!(
                "{}{:>2}. {:<12} {:>7}  L{}",
                marker,
                rank + 1,
                entry.name,
                entry.score,
                entry.level
            );
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use space_killer::consts::{PLAYER_START_COL, PLAYER_START_ROW};
        use space_killer::sim::Board;

        fn lone_player() -> GameState {
            let mut state = GameState::new(1);
            state.board = Board::bordered();
            let pos = Pos::new(PLAYER_START_ROW, PLAYER_START_COL);
            state.board.set_kind(pos, CellKind::Player);
            state.player = Some(pos);
            state.enemies = 1;
            state
        }

        #[test]
        fn test_hunter_lines_up_and_fires() {
            let mut state = lone_player();
            state.board.set_kind(Pos::new(1, 3), CellKind::Enemy);
            assert_eq!(
                plan(&state, Autopilot::Hunter),
                vec![Action::QueueMoveLeft, Action::QueueShot]
            );
        }

        #[test]
        fn test_hunter_dodges() {
            let mut state = lone_player();
            state
                .board
                .draw_enemy_bullet(Pos::new(PLAYER_START_ROW - 2, PLAYER_START_COL));
            assert_eq!(plan(&state, Autopilot::Hunter), vec![Action::QueueMoveLeft]);
        }

        #[test]
        fn test_off_does_nothing() {
            assert!(plan(&lone_player(), Autopilot::Off).is_empty());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Killer (native) starting...");
    runner::run();
}
