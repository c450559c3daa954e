//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per tick, no wall-clock time
//! - Seeded RNG only (owned by `GameState`)
//! - Stable scan order (row-major board snapshots)
//! - No rendering, storage or platform dependencies

pub mod boss;
pub mod enemy;
pub mod grid;
pub mod layout;
pub mod player;
pub mod progression;
pub mod projectiles;
pub mod state;
pub mod tick;

pub use grid::{Board, Cell, CellKind, HorizontalDir, Pos, VerticalDir};
pub use layout::{LevelLayout, build_level_layout};
pub use state::{
    Ammo, Boss, DiceRng, GameEvent, GameState, Metrics, QueuedInput, RngState, Status, Transition,
    TransitionMode,
};
pub use tick::tick;
