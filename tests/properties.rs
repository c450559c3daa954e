//! Property tests over random action sequences and leaderboards

use proptest::prelude::*;

use space_killer::consts::*;
use space_killer::highscores::{HighScoreEntry, HighScores};
use space_killer::session::{Action, apply, create_initial_state};
use space_killer::sim::{CellKind, GameState};

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        12 => Just(Action::Tick),
        3 => Just(Action::QueueShot),
        2 => Just(Action::QueueMoveLeft),
        2 => Just(Action::QueueMoveRight),
        1 => Just(Action::PauseToggle),
        1 => Just(Action::AdvanceLevel),
        1 => Just(Action::PlayerRespawned),
        1 => Just(Action::Reset),
        1 => "[a-zA-Z \t]{0,20}".prop_map(|name| Action::SetHighScoreName {
            id: String::new(),
            name,
        }),
    ]
}

fn arb_entry() -> impl Strategy<Value = HighScoreEntry> {
    (-2000i64..20000, 1u32..=LAST_LEVEL, 0u64..1_000, "[a-z]{0,16}").prop_map(
        |(score, level, timestamp, name)| HighScoreEntry {
            id: format!("{score}-{level}-{timestamp}"),
            name,
            score,
            level,
            timestamp,
        },
    )
}

fn check_invariants(state: &GameState) -> Result<(), TestCaseError> {
    prop_assert!(state.ammo.remaining_shots <= MAGAZINE_SIZE);
    prop_assert!(state.ammo.cooldown_ticks <= PLAYER_RELOAD_TICKS);

    for (pos, cell) in state.board.iter() {
        if pos.is_border() {
            prop_assert_eq!(cell.kind, CellKind::Border);
        } else {
            prop_assert_ne!(cell.kind, CellKind::Border);
        }
    }

    if state.enemies == 0 && !state.status.game_over {
        prop_assert!(state.status.level_cleared || !state.transition.is_idle());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariants_hold_for_any_action_sequence(
        seed in any::<u64>(),
        actions in proptest::collection::vec(arb_action(), 0..400),
    ) {
        let mut state = create_initial_state(seed, HighScores::new());
        check_invariants(&state)?;
        for action in &actions {
            apply(&mut state, action, 1_000);
            check_invariants(&state)?;
        }
    }

    #[test]
    fn prop_leaderboard_sorted_and_capped(
        entries in proptest::collection::vec(arb_entry(), 0..30),
    ) {
        let mut scores = HighScores::new();
        for entry in entries {
            scores.record(entry);
        }
        prop_assert!(scores.entries.len() <= HIGH_SCORE_LIMIT);
        for pair in scores.entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ordered = a.score > b.score
                || (a.score == b.score && a.level > b.level)
                || (a.score == b.score && a.level == b.level && a.timestamp <= b.timestamp);
            prop_assert!(ordered, "{:?} before {:?}", a, b);
        }
        for entry in &scores.entries {
            prop_assert!(entry.name.chars().count() <= HIGH_SCORE_NAME_MAX_LENGTH);
        }
    }
}
