//! Fixed timestep simulation tick
//!
//! One handler per game mode. Handlers return the transition to take, if
//! any, and `apply_transition` performs the bookkeeping for each edge of the
//! mode graph:
//!
//! ```text
//! Title --StartGame--> LevelStart --BeginPlay--> Playing --LevelCleared--> Complete
//!                          ^                                                  |
//!                          +--------------------NextLevel---------------------+
//! ```

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6, TAU};

use super::collision::{next_crossing, resolve};
use super::events::{GameEvent, SoundClip, TelemetryAction, TelemetryRecord};
use super::score::SortTally;
use super::state::{GameMode, GameState, Molecule, SpeedClass};
use crate::consts::*;
use crate::velocity_from_angle;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Activation went down this tick (click/tap)
    pub pressed: bool,
    /// Activation went up this tick
    pub released: bool,
    /// Demo mode - the demon plays itself
    pub autopilot: bool,
}

/// Edges of the mode graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StartGame,
    BeginPlay,
    LevelCleared,
    NextLevel,
}

impl Transition {
    /// (source mode, target mode)
    pub fn edge(self) -> (GameMode, GameMode) {
        match self {
            Transition::StartGame => (GameMode::Title, GameMode::LevelStart),
            Transition::BeginPlay => (GameMode::LevelStart, GameMode::Playing),
            Transition::LevelCleared => (GameMode::Playing, GameMode::Complete),
            Transition::NextLevel => (GameMode::Complete, GameMode::LevelStart),
        }
    }
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;
    state.ticks_in_mode += 1;

    let input = if input.autopilot {
        autopilot(state)
    } else {
        *input
    };

    let transition = match state.mode {
        GameMode::Title => update_title(&input),
        GameMode::LevelStart => update_level_start(state),
        GameMode::Playing => update_playing(state, &input),
        GameMode::Complete => update_complete(state, &input),
    };

    if let Some(transition) = transition {
        apply_transition(state, transition);
    }
}

fn update_title(input: &TickInput) -> Option<Transition> {
    input.pressed.then_some(Transition::StartGame)
}

fn update_level_start(state: &GameState) -> Option<Transition> {
    (state.ticks_in_mode > LEVEL_START_TICKS).then_some(Transition::BeginPlay)
}

fn update_playing(state: &mut GameState, input: &TickInput) -> Option<Transition> {
    if state.ticks_in_mode % HEARTBEAT_TICKS == 0 {
        let record = TelemetryRecord::new(TelemetryAction::Playing)
            .level(state.level)
            .ticks(state.ticks_in_mode)
            .sec(state.ticks_in_mode / TICKS_PER_SECOND)
            .sorted(state.tally.slow_in_left, state.tally.fast_in_right);
        state.emit(GameEvent::Telemetry(record));
    }

    state.elapsed_secs = state.ticks_in_mode / TICKS_PER_SECOND;

    if input.pressed && state.gate.open() {
        log::debug!("Slit opened at {:.0}..{:.0}", state.gate.top, state.gate.bottom);
        state.emit(GameEvent::Sound(SoundClip::Open));
    }
    if input.released && state.gate.close() {
        log::debug!("Slit closed");
    }

    state.gate.step();
    advance_molecules(state);

    let delta = state.tally.update(&state.molecules);
    if delta.improved {
        state.emit(GameEvent::Sound(SoundClip::Correct));
    }
    if delta.worsened {
        state.emit(GameEvent::Sound(SoundClip::Wrong));
    }

    (!state.gate.open && state.tally.is_complete()).then_some(Transition::LevelCleared)
}

fn update_complete(state: &mut GameState, input: &TickInput) -> Option<Transition> {
    // Molecules keep bouncing behind the results panel; counts stay frozen
    advance_molecules(state);
    input.pressed.then_some(Transition::NextLevel)
}

/// Move every molecule one step and resolve its collisions
fn advance_molecules(state: &mut GameState) {
    let gate = state.gate;
    for m in state.molecules.iter_mut() {
        let prev_x = m.pos.x;
        m.step();
        resolve(m, prev_x, &gate);
    }
}

fn apply_transition(state: &mut GameState, transition: Transition) {
    let (from, to) = transition.edge();
    debug_assert_eq!(state.mode, from, "{transition:?} taken from {:?}", state.mode);

    match transition {
        Transition::StartGame => {
            state.elapsed_secs = 0;
            state.emit(GameEvent::Sound(SoundClip::Start));
            state.emit(GameEvent::Telemetry(TelemetryRecord::new(
                TelemetryAction::StartGame,
            )));
        }
        Transition::BeginPlay => {
            state.elapsed_secs = 0;
        }
        Transition::LevelCleared => {
            log::info!("Level {} sorted in {}s", state.level, state.elapsed_secs);
            state.emit(GameEvent::Sound(SoundClip::Complete));
            state.emit(GameEvent::Telemetry(
                TelemetryRecord::new(TelemetryAction::Complete)
                    .level(state.level)
                    .sec(state.elapsed_secs),
            ));
        }
        Transition::NextLevel => {
            state.level += 1;
            setup_level(state);
            state.elapsed_secs = 0;
            state.emit(GameEvent::Sound(SoundClip::Start));
        }
    }

    state.enter_mode(to);
}

/// Populate the chamber for the current level
///
/// Placement policy (kept exactly, it shapes how hard a level is):
/// - molecule `i` is fast when `i` is even, slow when odd
/// - pairs alternate halves: `i / 2` even starts left, odd starts right
/// - launch angles are whole degrees, nudged away from vertical
pub fn setup_level(state: &mut GameState) {
    state.emit(GameEvent::Telemetry(
        TelemetryRecord::new(TelemetryAction::Setup).level(state.level),
    ));

    let count = MOLECULES_PER_LEVEL * state.level as usize;
    let mut molecules = Vec::with_capacity(count);
    for i in 0..count {
        molecules.push(spawn_molecule(i, &mut state.rng));
    }
    state.molecules = molecules;
    state.tally = SortTally::for_level(&state.molecules);
    state.gate.reset();

    log::info!(
        "Level {} set up: {} molecules, {}/{} fast/slow already sorted",
        state.level,
        count,
        state.tally.fast_in_right,
        state.tally.slow_in_left
    );
}

/// Create the molecule with creation index `index`
pub fn spawn_molecule<R: Rng>(index: usize, rng: &mut R) -> Molecule {
    let class = SpeedClass::for_index(index);
    let margin = MOLECULE_RADIUS / 2.0;

    let x = if (index / 2) % 2 == 0 {
        let span = (PARTITION_LEFT - MOLECULE_RADIUS - FRAME_LEFT).round() as u32;
        FRAME_LEFT + margin + rng.random_range(0..span) as f32
    } else {
        let span = (FRAME_RIGHT - PARTITION_RIGHT - MOLECULE_RADIUS).round() as u32;
        FRAME_RIGHT - margin - rng.random_range(0..span) as f32
    };
    let y_span = (FRAME_BOTTOM - FRAME_TOP - MOLECULE_RADIUS) as u32;
    let y = FRAME_TOP + margin + rng.random_range(0..y_span) as f32;

    let angle = launch_angle(rng.random_range(0..360));
    Molecule::new(
        class,
        Vec2::new(x, y),
        velocity_from_angle(class.speed(), angle),
    )
}

/// Launch angle in radians for a whole-degree draw.
///
/// Angles within 30° of straight up or down are turned a further 60° so no
/// molecule bounces vertically forever without reaching the partition.
pub fn launch_angle(degrees: u32) -> f32 {
    let mut angle = TAU * degrees as f32 / 360.0;
    if (FRAC_PI_2 - angle).powi(2) < FRAC_PI_6.powi(2) {
        angle += FRAC_PI_3;
    }
    if (3.0 * FRAC_PI_2 - angle).powi(2) < FRAC_PI_6.powi(2) {
        angle += FRAC_PI_3;
    }
    angle
}

/// Synthesize input for demo play.
///
/// The slit is held open only on ticks where some molecule is about to pass
/// through it toward its target side and none would pass the wrong way.
pub fn autopilot(state: &GameState) -> TickInput {
    let pressed = match state.mode {
        GameMode::Title => true,
        GameMode::LevelStart => false,
        GameMode::Complete => state.ticks_in_mode > TICKS_PER_SECOND,
        GameMode::Playing => {
            let gate = &state.gate;
            let mut sorting = false;
            let mut unsorting = false;
            for m in &state.molecules {
                let Some(y) = next_crossing(m) else { continue };
                if y < gate.top || y > gate.bottom {
                    continue;
                }
                let rightward = m.vel.x > 0.0;
                match (m.class, rightward) {
                    (SpeedClass::Fast, true) | (SpeedClass::Slow, false) => sorting = true,
                    _ => unsorting = true,
                }
            }
            let want_open = sorting && !unsorting;
            return TickInput {
                pressed: want_open && !gate.open,
                released: !want_open && gate.open,
                autopilot: true,
            };
        }
    };

    TickInput {
        pressed,
        released: false,
        autopilot: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::GameEvent;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn press() -> TickInput {
        TickInput {
            pressed: true,
            ..Default::default()
        }
    }

    fn release() -> TickInput {
        TickInput {
            released: true,
            ..Default::default()
        }
    }

    fn run_until_playing(state: &mut GameState) {
        tick(state, &press());
        for _ in 0..=LEVEL_START_TICKS {
            tick(state, &TickInput::default());
        }
        assert_eq!(state.mode, GameMode::Playing);
    }

    #[test]
    fn test_title_waits_for_activation() {
        let mut state = GameState::new(1);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.mode, GameMode::Title);

        tick(&mut state, &press());
        assert_eq!(state.mode, GameMode::LevelStart);
        assert_eq!(state.ticks_in_mode, 0);

        let events: Vec<_> = state.drain_events().collect();
        assert!(events.contains(&GameEvent::Sound(SoundClip::Start)));
        assert!(events.contains(&GameEvent::Telemetry(TelemetryRecord::new(
            TelemetryAction::StartGame
        ))));
    }

    #[test]
    fn test_level_start_lasts_two_seconds() {
        let mut state = GameState::new(2);
        tick(&mut state, &press());
        let frozen = state.molecules.clone();

        for _ in 0..LEVEL_START_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.mode, GameMode::LevelStart);
        assert_eq!(state.molecules, frozen);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Playing);
    }

    #[test]
    fn test_press_opens_release_closes() {
        let mut state = GameState::new(3);
        run_until_playing(&mut state);
        state.drain_events().for_each(drop);

        tick(&mut state, &press());
        assert!(state.gate.open);
        assert!(
            state
                .drain_events()
                .any(|e| e == GameEvent::Sound(SoundClip::Open))
        );

        let top = state.gate.top;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.gate.top, top);

        tick(&mut state, &release());
        assert!(!state.gate.open);
    }

    #[test]
    fn test_heartbeat_every_600_ticks() {
        let mut state = GameState::new(4);
        run_until_playing(&mut state);
        // Keep the level from being won by accident
        state.molecules.iter_mut().for_each(|m| {
            m.pos.x = if m.class == SpeedClass::Fast { 100.0 } else { 500.0 };
        });
        state.tally = SortTally::for_level(&state.molecules);
        state.drain_events().for_each(drop);

        let mut heartbeats = Vec::new();
        for _ in 0..1200 {
            tick(&mut state, &TickInput::default());
            for event in state.drain_events() {
                if let GameEvent::Telemetry(record) = event {
                    if record.action == TelemetryAction::Playing {
                        heartbeats.push(record);
                    }
                }
            }
        }
        assert_eq!(heartbeats.len(), 2);
        assert_eq!(heartbeats[0].ticks, Some(600));
        assert_eq!(heartbeats[0].sec, Some(10));
        assert_eq!(heartbeats[1].ticks, Some(1200));
        assert_eq!(state.elapsed_secs, 20);
    }

    #[test]
    fn test_sorted_level_completes_once_gate_closed() {
        let mut state = GameState::new(5);
        run_until_playing(&mut state);

        // Everything already on its target side, moving vertically away
        // from the partition
        for m in state.molecules.iter_mut() {
            m.pos.x = if m.class == SpeedClass::Fast { 500.0 } else { 100.0 };
            m.vel = Vec2::new(0.0, m.class.speed());
        }

        tick(&mut state, &press());
        assert_eq!(state.mode, GameMode::Playing, "open slit blocks completion");

        tick(&mut state, &release());
        assert_eq!(state.mode, GameMode::Complete);
        let events: Vec<_> = state.drain_events().collect();
        assert!(events.contains(&GameEvent::Sound(SoundClip::Complete)));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Telemetry(r) if r.action == TelemetryAction::Complete && r.level == Some(1)
        )));
    }

    #[test]
    fn test_complete_advances_level() {
        let mut state = GameState::new(6);
        state.mode = GameMode::Complete;
        let before = state.molecules.clone();

        tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Complete);
        assert_ne!(state.molecules, before, "molecules keep moving while complete");

        tick(&mut state, &press());
        assert_eq!(state.mode, GameMode::LevelStart);
        assert_eq!(state.level, 2);
        assert_eq!(state.molecules.len(), 10);
        assert_eq!(state.elapsed_secs, 0);
        assert!(!state.gate.open);
    }

    #[test]
    fn test_launch_angle_avoids_vertical() {
        for deg in 0..360 {
            let angle = launch_angle(deg);
            assert!(
                angle.cos().abs() >= 0.5 - 1e-5,
                "{deg}° launches too close to vertical"
            );
        }
        assert_eq!(launch_angle(0), 0.0);
        assert!((launch_angle(90) - 150f32.to_radians()).abs() < 1e-5);
        assert!((launch_angle(270) - 330f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_sides_follow_pair_parity() {
        let mut rng = Pcg32::seed_from_u64(9);
        for i in 0..40 {
            let m = spawn_molecule(i, &mut rng);
            if (i / 2) % 2 == 0 {
                assert!(m.pos.x < PARTITION_LEFT, "molecule {i} should start left");
            } else {
                assert!(m.pos.x > PARTITION_RIGHT, "molecule {i} should start right");
            }
            assert!(m.pos.y >= FRAME_TOP && m.pos.y <= FRAME_BOTTOM);
            assert!((m.speed() - m.class.speed()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut a, &auto);
            tick(&mut b, &auto);
        }
        assert_eq!(a.mode, b.mode);
        assert_eq!(a.molecules, b.molecules);
        assert_eq!(a.gate, b.gate);
    }
}
