//! Engine shell: one simulation run wired to storage and presentation
//!
//! The simulation never touches storage itself; it emits events and the
//! session applies the fire-and-forget writes. Rendering consumes the
//! per-tick `Snapshot` and the drained unlock notices, nothing else.

use glam::Vec2;

use crate::persistence::{self, Store, keys};
use crate::scoring::{STORY_LINES, format_score};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, SimulationState, TickInput, board};

/// A progression-unlock notification for the toast/panel layer
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockNotice {
    pub index: usize,
    pub line: &'static str,
}

/// One patrol as the renderer sees it
#[derive(Debug, Clone)]
pub struct PatrolView {
    pub pos: Vec2,
    pub shaft: usize,
}

/// Read-only per-tick view of the simulation
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub player_pos: Vec2,
    pub player_facing: i8,
    /// Drive the walk cycle while set
    pub player_walking: bool,
    pub patrols: Vec<PatrolView>,
    /// Sprite variant for every patrol this level
    pub patrol_variant: u32,
    /// Positions of the pellets still on the board
    pub pellets: Vec<Vec2>,
    /// Sprint tank fraction in [0, 1]
    pub stamina: f32,
    pub score: u64,
    pub high_score: u64,
    /// HUD-formatted score and best (zero-padded, display-clamped)
    pub score_text: String,
    pub high_score_text: String,
    pub level: u32,
    pub lives: u32,
    pub phase: GamePhase,
    /// Lane-transition progress in [0, 1] while one is in flight
    pub transition_progress: Option<f32>,
}

/// A single run of the game: simulation state plus the storage it persists to
pub struct Session<S: Store> {
    pub state: SimulationState,
    pub settings: Settings,
    store: S,
    notices: Vec<UnlockNotice>,
}

impl<S: Store> Session<S> {
    /// Open a session: read the persisted keys once, then start a fresh
    /// game (which resets the persisted unlock counter)
    pub fn new(seed: u64, store: S) -> Self {
        let settings = Settings::load(&store);
        let high_score = persistence::read_u64(&store, keys::HIGH_SCORE);
        let state = SimulationState::new(seed, high_score, settings.reduced_motion);

        let mut session = Self {
            state,
            settings,
            store,
            notices: Vec::new(),
        };
        session.store.set(keys::UNLOCK_COUNT, "0");
        session
    }

    /// Advance one frame and apply persistence-worthy events
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        let events = sim::tick(&mut self.state, input, dt);
        for event in &events {
            match event {
                GameEvent::HighScore { score } => {
                    self.store.set(keys::HIGH_SCORE, &score.to_string());
                }
                GameEvent::LineUnlocked { index } => {
                    self.store
                        .set(keys::UNLOCK_COUNT, &self.state.ledger.unlocked.to_string());
                    self.notices.push(UnlockNotice {
                        index: *index,
                        line: STORY_LINES[*index],
                    });
                }
                GameEvent::GameRestarted => {
                    self.store.set(keys::UNLOCK_COUNT, "0");
                }
                _ => {}
            }
        }
        events
    }

    /// Unlock notifications accumulated since the last drain
    pub fn drain_notices(&mut self) -> Vec<UnlockNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Story lines revealed so far, for the progression panel
    pub fn unlocked_lines(&self) -> &'static [&'static str] {
        self.state.ledger.unlocked_lines()
    }

    /// Build the render view of the current tick
    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let walking = state.player.move_dir != 0
            && state.transition.is_none()
            && state.phase == GamePhase::Playing;

        Snapshot {
            player_pos: state.player_pos(),
            player_facing: state.player.facing,
            player_walking: walking,
            patrols: state
                .patrols
                .iter()
                .map(|p| PatrolView {
                    pos: p.pos(),
                    shaft: p.shaft,
                })
                .collect(),
            patrol_variant: state.patrol_variant(),
            pellets: state
                .pellets
                .iter()
                .filter(|p| !p.taken)
                .map(|p| Vec2::new(p.x, board::floor_y(p.floor, state.floor_count)))
                .collect(),
            stamina: state.player.stamina,
            score: state.ledger.score,
            high_score: state.ledger.high_score,
            score_text: format_score(state.ledger.score),
            high_score_text: format_score(state.ledger.high_score),
            level: state.level,
            lives: state.lives,
            phase: state.phase,
            transition_progress: state.transition.as_ref().map(|t| t.progress()),
        }
    }
}
