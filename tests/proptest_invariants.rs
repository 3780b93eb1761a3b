//! Property-based invariant tests for the simulation and the canvas cache.
//!
//! 1. Molecule speed never changes.
//! 2. Molecules stay inside the chamber frame.
//! 3. The slit keeps its size and stays inside the frame.
//! 4. A closed partition never lets a molecule through.
//! 5. Level setup creates 5 x level molecules, alternating fast and slow.
//! 6. The sorted tally always matches a fresh recount.
//! 7. The backing canvas never shrinks and always fits the request.

use maxwells_demon::consts::*;
use maxwells_demon::renderer::Canvas;
use maxwells_demon::sim::score::count_sorted;
use maxwells_demon::sim::{GameMode, GameState, SpeedClass, TickInput, setup_level, tick};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn playing_state(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    tick(
        &mut state,
        &TickInput {
            pressed: true,
            ..Default::default()
        },
    );
    while state.mode != GameMode::Playing {
        tick(&mut state, &TickInput::default());
    }
    state
}

fn inputs_strategy() -> impl Strategy<Value = Vec<TickInput>> {
    prop::collection::vec(
        (any::<bool>(), any::<bool>()).prop_map(|(pressed, released)| TickInput {
            pressed,
            released,
            autopilot: false,
        }),
        1..400,
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Motion invariants under arbitrary press/release sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn speed_is_constant(seed in any::<u64>(), inputs in inputs_strategy()) {
        let mut state = playing_state(seed);
        let level = state.level;
        let speeds: Vec<f32> = state.molecules.iter().map(|m| m.speed()).collect();
        for m in &state.molecules {
            prop_assert!((m.speed() - m.class.speed()).abs() < 1e-3);
        }
        for input in &inputs {
            tick(&mut state, input);
            if state.level != level {
                // A new level replaces every molecule
                break;
            }
            for (m, &speed) in state.molecules.iter().zip(&speeds) {
                prop_assert_eq!(m.speed(), speed, "{:?} molecule changed speed", m.class);
            }
        }
    }
}

proptest! {
    #[test]
    fn molecules_stay_in_frame(seed in any::<u64>(), inputs in inputs_strategy()) {
        let mut state = playing_state(seed);
        for input in &inputs {
            tick(&mut state, input);
            for m in &state.molecules {
                prop_assert!((FRAME_LEFT..=FRAME_RIGHT).contains(&m.pos.x), "x = {}", m.pos.x);
                prop_assert!((FRAME_TOP..=FRAME_BOTTOM).contains(&m.pos.y), "y = {}", m.pos.y);
            }
        }
    }
}

proptest! {
    #[test]
    fn slit_keeps_size_and_bounds(seed in any::<u64>(), inputs in inputs_strategy()) {
        let mut state = playing_state(seed);
        for input in &inputs {
            let before = state.gate;
            tick(&mut state, input);
            let gate = state.gate;
            prop_assert_eq!(gate.bottom - gate.top, SLIT_SIZE);
            prop_assert!(gate.top >= FRAME_TOP && gate.bottom <= FRAME_BOTTOM);
            if gate.open && before.open {
                prop_assert_eq!(gate.top, before.top, "open slit moved");
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Closed partition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn closed_partition_holds_every_molecule(
        seed in any::<u64>(),
        level in 1u32..=6,
        ticks in 1usize..3_000,
    ) {
        let mut state = playing_state(seed);
        state.level = level;
        setup_level(&mut state);
        let released = TickInput {
            released: true,
            ..Default::default()
        };
        let started_left: Vec<bool> = state.molecules.iter().map(|m| m.pos.x < CENTER_X).collect();

        for t in 0..ticks {
            let before: Vec<f32> = state.molecules.iter().map(|m| m.pos.x).collect();
            tick(&mut state, &released);
            prop_assert!(!state.gate.open);
            for (i, (m, &prev_x)) in state.molecules.iter().zip(&before).enumerate() {
                let x = m.pos.x;
                prop_assert!(
                    !(prev_x < PARTITION_LEFT && x > PARTITION_LEFT)
                        && !(prev_x > PARTITION_RIGHT && x < PARTITION_RIGHT),
                    "molecule {} crossed a closed partition at tick {}: {} -> {}",
                    i, t, prev_x, x
                );
                if started_left[i] {
                    prop_assert!(x <= PARTITION_LEFT, "molecule {} leaked right to {}", i, x);
                } else {
                    prop_assert!(x >= PARTITION_RIGHT, "molecule {} leaked left to {}", i, x);
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Level population
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn level_population(seed in any::<u64>(), level in 1u32..=8) {
        let mut state = GameState::new(seed);
        state.level = level;
        setup_level(&mut state);

        let count = MOLECULES_PER_LEVEL * level as usize;
        prop_assert_eq!(state.molecules.len(), count);
        for (i, m) in state.molecules.iter().enumerate() {
            prop_assert_eq!(m.class, SpeedClass::for_index(i));
        }
        let (fast, slow) = state.class_counts();
        prop_assert_eq!(fast, count.div_ceil(2));
        prop_assert_eq!(slow, count / 2);
        prop_assert_eq!(state.tally.target_fast_in_right as usize, fast);
        prop_assert_eq!(state.tally.target_slow_in_left as usize, slow);
        prop_assert!(!state.gate.open);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Tally consistency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tally_matches_recount(seed in any::<u64>(), inputs in inputs_strategy()) {
        let mut state = playing_state(seed);
        for input in &inputs {
            tick(&mut state, input);
            if state.mode == GameMode::Playing {
                let (fast, slow) = count_sorted(&state.molecules);
                prop_assert_eq!(state.tally.fast_in_right, fast);
                prop_assert_eq!(state.tally.slow_in_left, slow);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Canvas cache monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn canvas_never_shrinks(requests in prop::collection::vec((0u32..300, 0u32..300), 1..12)) {
        let mut canvas = Canvas::new();
        let mut last = canvas.capacity();
        for (w, h) in requests {
            canvas.prepare(w, h);
            let cap = canvas.capacity();
            prop_assert!(cap.0 >= last.0 && cap.1 >= last.1, "{:?} -> {:?}", last, cap);
            prop_assert!(cap.0 >= w && cap.1 >= h);
            prop_assert_eq!(canvas.region(), (w, h));
            last = cap;
        }
    }
}
