//! Per-frame simulation step
//!
//! `tick` advances the whole simulation by one variable-size step and
//! returns the events that occurred, in order. No component assumes a fixed
//! step; all timing derives from the `dt` the caller supplies.

use super::board;
use super::collision::{self, Detection};
use super::state::{GameEvent, GamePhase, LaneTransition, SimulationState};
use crate::consts::*;

/// Input commands for a single tick. Direction commands are discrete events
/// delivered by the input layer; sprint is the held state of the sprint key.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Direction command this tick (-1 or +1). Reverse-only control: there
    /// is no stop command, releasing a key changes nothing.
    pub direction: Option<i8>,
    /// Sprint input held
    pub sprint: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Game-over decision: restart from scratch
    pub retry: bool,
    /// Game-over decision: tear the session down for good
    pub quit: bool,
    /// Debug: jump straight to this level
    pub jump_to_level: Option<u32>,
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Quit => return events,
        GamePhase::GameOver => {
            // Only the retry/quit decision acts here; everything else is
            // ignored until the player chooses
            if input.quit {
                state.phase = GamePhase::Quit;
                log::info!("session ended");
                events.push(GameEvent::GameQuit);
            } else if input.retry {
                state.start_fresh();
                events.push(GameEvent::GameRestarted);
                events.push(GameEvent::LevelStarted { level: state.level });
            }
            return events;
        }
        _ => {}
    }

    // The pause flag toggles freely; while paused nothing advances
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }
    if state.phase == GamePhase::Paused {
        return events;
    }

    // Debug jump rebuilds the whole board; nothing else runs this tick
    if let Some(target) = input.jump_to_level {
        state.jump_to_level(target);
        events.push(GameEvent::LevelStarted { level: state.level });
        return events;
    }

    state.time_secs += dt;

    // Patrols oscillate independently of player state
    let top = state.board_top();
    let bottom = state.board_bottom();
    let time = state.time_secs;
    let reduced = state.reduced_motion;
    for p in &mut state.patrols {
        p.advance(dt, time, top, bottom, reduced);
    }

    // Mid-transition only the timer runs: direction and sprint input do not
    // move the player, stamina neither drains nor regenerates
    if let Some(mut t) = state.transition.take() {
        t.elapsed += dt;
        if t.finished() {
            let floor = t.to;
            state.player.floor = floor;
            state.player.x = board::floor_start_x(floor);
            state.player.facing = board::floor_direction(floor);
            state.player.begin_lane_attempt();
            events.push(GameEvent::TransitionFinished { floor });
        } else {
            state.transition = Some(t);
        }
        return events;
    }

    if let Some(dir) = input.direction {
        state.player.apply_direction(dir);
    }

    // Stamina settles before the speed for this step is resolved
    let sprinting = update_stamina(state, input.sprint, dt);
    let speed = if sprinting { PLAYER_SPRINT } else { PLAYER_SPEED };
    if state.player.move_dir != 0 {
        state.player.x += state.player.move_dir as f32 * speed * dt;
    }
    state.player.x = state.player.x.clamp(FLOOR_MARGIN_X, BOARD_W - FLOOR_MARGIN_X);

    let floor_y = board::floor_y(state.player.floor, state.floor_count);
    match collision::detect(
        state.player.x,
        state.player.floor,
        floor_y,
        &state.patrols,
        &state.pellets,
    ) {
        Detection::Hit { .. } => {
            on_hit(state, &mut events);
            return events;
        }
        Detection::Collected(indices) => {
            for i in indices {
                state.pellets[i].taken = true;
                let (floor, x) = (state.pellets[i].floor, state.pellets[i].x);
                events.push(GameEvent::PelletCollected { floor, x });
                award(state, PELLET_POINTS, &mut events);
            }
        }
    }

    if board::lane_end_reached(state.player.floor, state.player.x) {
        finish_lane(state, &mut events);
    }

    events
}

/// Sprint resource rules: a sprint may only start on a full tank, then runs
/// until the input releases or the tank empties. The tick on which a sprint
/// ends neither drains nor regenerates. Returns whether this step sprints.
fn update_stamina(state: &mut SimulationState, sprint_held: bool, dt: f32) -> bool {
    let player = &mut state.player;
    if player.sprint_active {
        if sprint_held && player.stamina > SPRINT_EMPTY_EPS {
            player.stamina = (player.stamina - STAMINA_CONSUME_PER_S * dt).max(0.0);
            true
        } else {
            player.sprint_active = false;
            false
        }
    } else if sprint_held && player.stamina >= SPRINT_START_THRESHOLD {
        player.sprint_active = true;
        player.stamina = (player.stamina - STAMINA_CONSUME_PER_S * dt).max(0.0);
        true
    } else {
        player.stamina = (player.stamina + STAMINA_REGEN_PER_S * dt).min(1.0);
        false
    }
}

/// Score `points` and surface a high-score event on a new best
fn award(state: &mut SimulationState, points: u64, events: &mut Vec<GameEvent>) {
    if let Some(high) = state.ledger.add_score(points) {
        events.push(GameEvent::HighScore { score: high });
    }
}

/// The player reached the far edge of the current lane: award the lane
/// bonuses, then either start the vertical transition or, from the top
/// floor, complete the level outright
fn finish_lane(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let level = state.level as u64;
    let one_go = state.player.lane_single_go;
    let mut bonus = level * LANE_BONUS_FACTOR;
    if one_go {
        bonus += level * ONE_GO_BONUS_FACTOR;
    }
    events.push(GameEvent::LaneCompleted { bonus, one_go });
    award(state, bonus, events);

    let from = state.player.floor;
    let to = from + 1;
    if to >= state.floor_count {
        complete_level(state, events);
        return;
    }

    // Lock x to the destination's entry edge for a crisp vertical move
    let x = board::floor_start_x(to);
    state.player.x = x;
    state.transition = Some(LaneTransition {
        from,
        to,
        x,
        from_y: board::floor_y(from, state.floor_count),
        to_y: board::floor_y(to, state.floor_count),
        elapsed: 0.0,
        duration: if state.reduced_motion {
            TRANSITION_SECS_REDUCED
        } else {
            TRANSITION_SECS
        },
        eased: !state.reduced_motion,
    });
    events.push(GameEvent::TransitionStarted { from, to });
}

/// Level complete: unlock a narrative line on every third level (checked
/// against the completed level, before the counter advances), then move on
fn complete_level(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let completed = state.level;
    events.push(GameEvent::LevelCompleted { level: completed });
    if completed % UNLOCK_LEVEL_INTERVAL == 0 {
        if let Some(index) = state.ledger.unlock_next() {
            log::info!("story line {} unlocked", index + 1);
            events.push(GameEvent::LineUnlocked { index });
        }
    }
    state.advance_level();
    events.push(GameEvent::LevelStarted { level: state.level });
}

/// A patrol caught the player. With no lives left this is game over;
/// otherwise the current lane restarts (geometry and pellets untouched).
fn on_hit(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::Hit {
        lives_left: state.lives,
    });
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!(
            "game over at level {}, score {}",
            state.level,
            state.ledger.score
        );
        events.push(GameEvent::GameOver);
    } else {
        state.player.restart_lane();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::STORY_LINES;
    use crate::sim::state::Patrol;

    /// A state with every patrol parked far from the test floors so
    /// movement tests are deterministic
    fn quiet_state() -> SimulationState {
        let mut state = SimulationState::new(12345, 0, false);
        state.patrols.clear();
        state
    }

    fn dir(d: i8) -> TickInput {
        TickInput {
            direction: Some(d),
            ..Default::default()
        }
    }

    #[test]
    fn test_reverse_only_movement() {
        let mut state = quiet_state();
        tick(&mut state, &dir(1), 0.01);
        let x1 = state.player.x;
        assert!(x1 > FLOOR_MARGIN_X);

        // No command: intent persists and the player keeps moving
        tick(&mut state, &TickInput::default(), 0.01);
        assert!(state.player.x > x1);
    }

    #[test]
    fn test_x_clamped_to_playfield() {
        let mut state = quiet_state();
        state.player.floor = 1;
        state.player.x = FLOOR_MARGIN_X + 1.0;
        // Odd floor runs right-to-left, so -1 is the forward direction and
        // the clamp pins the player to the left bound
        tick(&mut state, &dir(-1), 0.5);
        assert_eq!(state.player.x, FLOOR_MARGIN_X);
    }

    #[test]
    fn test_sprint_requires_full_tank() {
        let mut state = quiet_state();
        state.player.stamina = 0.5;
        let input = TickInput {
            direction: Some(1),
            sprint: true,
            ..Default::default()
        };
        let x0 = state.player.x;
        tick(&mut state, &input, 0.1);
        // Base speed, not sprint speed, and the tank regenerates
        assert!((state.player.x - x0 - PLAYER_SPEED * 0.1).abs() < 0.01);
        assert!(!state.player.sprint_active);
        assert!(state.player.stamina > 0.5);
    }

    #[test]
    fn test_sprint_starts_full_and_survives_partial_tank() {
        let mut state = quiet_state();
        let input = TickInput {
            direction: Some(1),
            sprint: true,
            ..Default::default()
        };
        let x0 = state.player.x;
        tick(&mut state, &input, 0.1);
        assert!(state.player.sprint_active);
        assert!((state.player.x - x0 - PLAYER_SPRINT * 0.1).abs() < 0.01);
        assert!((state.player.stamina - (1.0 - STAMINA_CONSUME_PER_S * 0.1)).abs() < 0.001);

        // Partial tank is fine once the sprint is running
        tick(&mut state, &input, 0.1);
        assert!(state.player.sprint_active);
    }

    #[test]
    fn test_sprint_release_ends_without_regen() {
        let mut state = quiet_state();
        let held = TickInput {
            sprint: true,
            ..Default::default()
        };
        tick(&mut state, &held, 0.1);
        let tank = state.player.stamina;

        // Release: sprint ends this tick, stamina untouched
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(!state.player.sprint_active);
        assert_eq!(state.player.stamina, tank);

        // Next tick regenerates
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.player.stamina > tank);
    }

    #[test]
    fn test_sprint_cuts_out_when_empty() {
        let mut state = quiet_state();
        state.player.sprint_active = true;
        state.player.stamina = SPRINT_EMPTY_EPS / 2.0;
        let input = TickInput {
            sprint: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.01);
        assert!(!state.player.sprint_active);
    }

    #[test]
    fn test_stamina_clamped_at_full() {
        let mut state = quiet_state();
        state.player.stamina = 0.99;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.1);
        }
        assert_eq!(state.player.stamina, 1.0);
    }

    #[test]
    fn test_lane_completion_one_go_bonus() {
        let mut state = quiet_state();
        state.player.x = BOARD_W - FLOOR_MARGIN_X - 1.0;
        let events = tick(&mut state, &dir(1), 0.01);

        let bonus = (LANE_BONUS_FACTOR + ONE_GO_BONUS_FACTOR) * state.level as u64;
        assert!(events.contains(&GameEvent::LaneCompleted {
            bonus,
            one_go: true
        }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::TransitionStarted { from: 0, to: 1 })));
        assert_eq!(state.ledger.score, bonus);
        assert!(state.transition.is_some());
        // X locked to the destination floor's entry edge
        assert_eq!(state.player.x, board::floor_start_x(1));
    }

    #[test]
    fn test_lane_completion_after_reversal() {
        let mut state = quiet_state();
        tick(&mut state, &dir(1), 0.01);
        tick(&mut state, &dir(-1), 0.01);
        tick(&mut state, &dir(1), 0.01);
        state.player.x = BOARD_W - FLOOR_MARGIN_X - 1.0;
        let events = tick(&mut state, &dir(1), 0.001);

        let bonus = LANE_BONUS_FACTOR * state.level as u64;
        assert!(events.contains(&GameEvent::LaneCompleted {
            bonus,
            one_go: false
        }));
    }

    #[test]
    fn test_input_ignored_while_transitioning() {
        let mut state = quiet_state();
        state.player.x = BOARD_W - FLOOR_MARGIN_X;
        tick(&mut state, &dir(1), 0.001);
        assert!(state.transition.is_some());

        // A reverse command mid-transition changes nothing: movement intent
        // keeps its pre-transition value and the floor stays put
        let move_dir = state.player.move_dir;
        let events = tick(&mut state, &dir(-1), 0.01);
        assert!(events.is_empty());
        assert_eq!(state.player.move_dir, move_dir);
        assert_eq!(state.player.floor, 0);
        assert_eq!(state.player.x, board::floor_start_x(1));
    }

    #[test]
    fn test_transition_completes_on_schedule() {
        let mut state = quiet_state();
        state.player.x = BOARD_W - FLOOR_MARGIN_X;
        tick(&mut state, &dir(1), 0.001);

        let events = tick(&mut state, &TickInput::default(), TRANSITION_SECS + 0.01);
        assert!(events.contains(&GameEvent::TransitionFinished { floor: 1 }));
        assert!(state.transition.is_none());
        assert_eq!(state.player.floor, 1);
        assert_eq!(state.player.x, board::floor_start_x(1));
        assert_eq!(state.player.move_dir, 0);
        assert_eq!(state.player.facing, -1);
        assert!(state.player.lane_single_go);
    }

    #[test]
    fn test_reduced_motion_shortens_transition() {
        let mut state = quiet_state();
        state.reduced_motion = true;
        state.player.x = BOARD_W - FLOOR_MARGIN_X;
        tick(&mut state, &dir(1), 0.001);
        let t = state.transition.as_ref().unwrap();
        assert_eq!(t.duration, TRANSITION_SECS_REDUCED);
        assert!(!t.eased);
    }

    #[test]
    fn test_top_floor_completes_level() {
        let mut state = quiet_state();
        let top = state.floor_count - 1;
        state.player.floor = top;
        state.player.x = FLOOR_MARGIN_X + 1.0;
        let events = tick(&mut state, &dir(-1), 0.01);

        assert!(events.contains(&GameEvent::LevelCompleted { level: 1 }));
        assert!(events.contains(&GameEvent::LevelStarted { level: 2 }));
        // Straight to the next level: no vertical animation
        assert!(state.transition.is_none());
        assert_eq!(state.level, 2);
        assert_eq!(state.floor_count, FLOOR_COUNT);
        assert_eq!(state.player.floor, 0);
        // Level 1 is not a multiple of three, so nothing unlocks
        assert_eq!(state.ledger.unlocked, 0);
    }

    #[test]
    fn test_third_level_unlocks_story_line() {
        let mut state = quiet_state();
        state.jump_to_level(3);
        state.patrols.clear();
        let score_before = state.ledger.score;
        let top = state.floor_count - 1;
        state.player.floor = top;
        state.player.x = FLOOR_MARGIN_X + 1.0;
        let events = tick(&mut state, &dir(-1), 0.01);

        assert!(events.contains(&GameEvent::LineUnlocked { index: 0 }));
        assert_eq!(state.ledger.unlocked, 1);
        assert_eq!(state.level, 4);
        // One-go completion of a level-3 lane: 3*10 + 3*100
        assert_eq!(state.ledger.score - score_before, 330);
    }

    #[test]
    fn test_unlock_counter_caps() {
        let mut state = quiet_state();
        state.jump_to_level(3);
        state.patrols.clear();
        state.ledger.unlocked = STORY_LINES.len() as u32;
        let top = state.floor_count - 1;
        state.player.floor = top;
        state.player.x = FLOOR_MARGIN_X + 1.0;
        let events = tick(&mut state, &dir(-1), 0.01);

        assert!(!events.iter().any(|e| matches!(e, GameEvent::LineUnlocked { .. })));
        assert_eq!(state.ledger.unlocked, STORY_LINES.len() as u32);
    }

    #[test]
    fn test_pellet_collection_scores() {
        let mut state = quiet_state();
        let pellet_x = state
            .pellets
            .iter()
            .find(|p| p.floor == 0)
            .map(|p| p.x)
            .unwrap();
        state.player.x = pellet_x;
        let events = tick(&mut state, &TickInput::default(), 0.01);

        assert!(events.iter().any(|e| matches!(e, GameEvent::PelletCollected { floor: 0, .. })));
        assert_eq!(state.ledger.score, PELLET_POINTS);

        // Consumed exactly once
        let again = tick(&mut state, &TickInput::default(), 0.01);
        assert!(!again.iter().any(|e| matches!(e, GameEvent::PelletCollected { .. })));
        assert_eq!(state.ledger.score, PELLET_POINTS);
    }

    #[test]
    fn test_single_life_hit_is_game_over() {
        let mut state = quiet_state();
        state.patrols.push(Patrol {
            shaft: 0,
            x: state.player.x,
            y: board::floor_y(0, state.floor_count),
            vy: 0.0,
            phase: 0.0,
            wobble_freq: 0.3,
        });
        let events = tick(&mut state, &TickInput::default(), 0.01);

        assert!(events.contains(&GameEvent::Hit { lives_left: 0 }));
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(state.phase, GamePhase::GameOver);

        // Gameplay input is dead until the player decides
        let ignored = tick(&mut state, &dir(1), 0.01);
        assert!(ignored.is_empty());
        assert_eq!(state.player.move_dir, 0);
    }

    #[test]
    fn test_spare_life_restarts_lane_only() {
        let mut state = quiet_state();
        state.lives = 2;
        state.pellets[0].taken = true;
        state.player.x = BOARD_W / 2.0;
        state.patrols.push(Patrol {
            shaft: 0,
            x: state.player.x,
            y: board::floor_y(0, state.floor_count),
            vy: 0.0,
            phase: 0.0,
            wobble_freq: 0.3,
        });
        let events = tick(&mut state, &TickInput::default(), 0.01);

        assert!(events.contains(&GameEvent::Hit { lives_left: 1 }));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.x, board::floor_start_x(0));
        assert!(state.player.lane_single_go);
        // Consumed pellets stay consumed; nothing regenerates on a hit
        assert!(state.pellets[0].taken);
    }

    #[test]
    fn test_retry_resets_run() {
        let mut state = quiet_state();
        state.ledger.add_score(777);
        state.ledger.unlocked = 2;
        state.level = 5;
        state.phase = GamePhase::GameOver;

        let input = TickInput {
            retry: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, 0.01);

        assert!(events.contains(&GameEvent::GameRestarted));
        assert_eq!(state.level, 1);
        assert_eq!(state.ledger.score, 0);
        assert_eq!(state.ledger.unlocked, 0);
        assert_eq!(state.ledger.high_score, 777);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut state = quiet_state();
        state.phase = GamePhase::GameOver;
        let input = TickInput {
            quit: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, 0.01);
        assert!(events.contains(&GameEvent::GameQuit));
        assert_eq!(state.phase, GamePhase::Quit);

        // No resume path
        let retry = TickInput {
            retry: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &retry, 0.01).is_empty());
        assert_eq!(state.phase, GamePhase::Quit);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = SimulationState::new(5, 0, false);
        let patrol_y = state.patrols[0].y;
        state.player.stamina = 0.5;

        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, 0.01);
        assert_eq!(state.phase, GamePhase::Paused);

        // Position, stamina and patrols all hold still
        let events = tick(&mut state, &dir(1), 0.1);
        assert!(events.is_empty());
        assert_eq!(state.player.x, board::floor_start_x(0));
        assert_eq!(state.player.stamina, 0.5);
        assert_eq!(state.patrols[0].y, patrol_y);

        tick(&mut state, &toggle, 0.01);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_debug_jump_ignored_during_game_over() {
        let mut state = quiet_state();
        state.phase = GamePhase::GameOver;
        let input = TickInput {
            jump_to_level: Some(7),
            ..Default::default()
        };
        tick(&mut state, &input, 0.01);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_debug_jump_discards_transition() {
        let mut state = quiet_state();
        state.player.x = BOARD_W - FLOOR_MARGIN_X;
        tick(&mut state, &dir(1), 0.001);
        assert!(state.transition.is_some());

        let input = TickInput {
            jump_to_level: Some(4),
            ..Default::default()
        };
        let events = tick(&mut state, &input, 0.01);
        assert!(events.contains(&GameEvent::LevelStarted { level: 4 }));
        assert!(state.transition.is_none());
        assert_eq!(state.player.floor, 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = SimulationState::new(424242, 0, false);
        let mut b = SimulationState::new(424242, 0, false);

        let inputs = [
            dir(1),
            TickInput {
                sprint: true,
                ..Default::default()
            },
            TickInput::default(),
            dir(-1),
            TickInput::default(),
        ];
        for input in inputs.iter().cycle().take(200) {
            let ea = tick(&mut a, input, 1.0 / 60.0);
            let eb = tick(&mut b, input, 1.0 / 60.0);
            assert_eq!(ea, eb);
        }

        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
