//! Game state and core simulation types
//!
//! All state the engine needs to advance a run lives here. Rendering reads
//! it through session snapshots only.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board;
use crate::consts::*;
use crate::scoring::Ledger;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (traversing or mid lane transition)
    Playing,
    /// Simulation frozen; the pause flag is freely toggled
    Paused,
    /// Lives exhausted; waiting on a retry/quit decision
    GameOver,
    /// Session torn down permanently, no resume path
    Quit,
}

/// The player-controlled actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Floor index, bottom to top
    pub floor: usize,
    /// Horizontal position on the current floor
    pub x: f32,
    /// Persistent movement intent: -1, 0, +1 (reverse-only control)
    pub move_dir: i8,
    /// Facing for the renderer; retained while idle
    pub facing: i8,
    /// Sprint tank in [0, 1]
    pub stamina: f32,
    /// An all-or-nothing sprint burst is in progress
    pub sprint_active: bool,
    /// First direction chosen this lane attempt (0 until the first command)
    pub lane_start_dir: i8,
    /// Stays true only if no reversal occurs during the lane attempt
    pub lane_single_go: bool,
}

impl Player {
    /// Place the player at the start edge of `floor` with a fresh lane attempt
    pub fn at_floor_start(floor: usize) -> Self {
        let dir = board::floor_direction(floor);
        Self {
            floor,
            x: board::floor_start_x(floor),
            move_dir: 0,
            facing: dir,
            stamina: 1.0,
            sprint_active: false,
            lane_start_dir: 0,
            lane_single_go: true,
        }
    }

    /// Reset to this floor's start edge and begin a new lane attempt.
    /// Stamina and sprint state carry over.
    pub fn restart_lane(&mut self) {
        self.x = board::floor_start_x(self.floor);
        self.begin_lane_attempt();
    }

    /// New lane attempt: no movement until the user chooses a direction
    pub fn begin_lane_attempt(&mut self) {
        self.move_dir = 0;
        self.lane_start_dir = 0;
        self.lane_single_go = true;
    }

    /// Apply a discrete direction command. The first command of a lane
    /// attempt is recorded; a later command with the opposite sign forfeits
    /// the one-go bonus for the rest of the attempt.
    pub fn apply_direction(&mut self, dir: i8) {
        let dir = dir.signum();
        if dir == 0 {
            return;
        }
        if self.lane_start_dir == 0 {
            self.lane_start_dir = dir;
        } else if dir != self.lane_start_dir {
            self.lane_single_go = false;
        }
        self.move_dir = dir;
        self.facing = dir;
    }
}

/// An adversary confined to one shaft, bouncing vertically between the
/// bottom and top floor lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patrol {
    /// Home shaft index
    pub shaft: usize,
    /// Shaft center x (fixed)
    pub x: f32,
    pub y: f32,
    /// Vertical velocity; sign flips on hitting either bound
    pub vy: f32,
    /// Per-patrol phase for the cosmetic speed wobble
    pub phase: f32,
    /// Per-patrol wobble frequency (staggered by shaft index)
    pub wobble_freq: f32,
}

impl Patrol {
    /// Integrate one step and reflect elastically off the board bounds.
    /// The sinusoidal perturbation is cosmetic and skipped under reduced
    /// motion; it never changes the stored velocity, only this step's
    /// displacement.
    pub fn advance(&mut self, dt: f32, time: f32, top: f32, bottom: f32, reduced_motion: bool) {
        let mut vy = self.vy;
        if !reduced_motion {
            vy += (time * self.wobble_freq + self.phase).sin() * PATROL_WOBBLE_AMPLITUDE;
        }
        self.y += vy * dt;
        if self.y < top {
            self.y = top;
            self.vy = self.vy.abs();
        }
        if self.y > bottom {
            self.y = bottom;
            self.vy = -self.vy.abs();
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A collectible point on a floor line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pellet {
    pub floor: usize,
    pub x: f32,
    pub taken: bool,
}

/// An in-flight vertical move between adjacent floors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneTransition {
    pub from: usize,
    pub to: usize,
    /// Locked x for the whole transition (the destination floor's start edge)
    pub x: f32,
    pub from_y: f32,
    pub to_y: f32,
    pub elapsed: f32,
    pub duration: f32,
    /// Sine ease-in-out; linear under reduced motion
    pub eased: bool,
}

impl LaneTransition {
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn current_y(&self) -> f32 {
        let p = self.progress();
        let t = if self.eased { crate::ease_in_out_sine(p) } else { p };
        crate::lerp(self.from_y, self.to_y, t)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Events emitted by a tick, in occurrence order. Presentation and
/// persistence consume these; the simulation never acts on its own events.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PelletCollected { floor: usize, x: f32 },
    /// Lane finished; one-go adds the larger bonus on top of the lane bonus
    LaneCompleted { bonus: u64, one_go: bool },
    TransitionStarted { from: usize, to: usize },
    TransitionFinished { floor: usize },
    /// The completed level's number (checked for unlocks before advancing)
    LevelCompleted { level: u32 },
    LevelStarted { level: u32 },
    /// A narrative line was revealed
    LineUnlocked { index: usize },
    /// Score exceeded the persisted high score
    HighScore { score: u64 },
    Hit { lives_left: u32 },
    GameOver,
    GameRestarted,
    GameQuit,
}

/// RNG bootstrap carried in state so level generation is reproducible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Per-level generator: jumping straight to level n spawns the same
    /// board as reaching it by play
    pub fn rng_for_level(&self, level: u32) -> Pcg32 {
        Pcg32::seed_from_u64(
            self.seed
                .wrapping_add((level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        )
    }
}

/// Complete simulation state, owned by the session shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub level: u32,
    /// Reset to `FLOOR_COUNT` on every level change
    pub floor_count: usize,
    pub lives: u32,
    pub phase: GamePhase,
    /// Accessibility flag: shortens transitions, disables patrol wobble
    pub reduced_motion: bool,
    /// Elapsed simulation time (drives the patrol wobble)
    pub time_secs: f32,
    pub player: Player,
    pub patrols: Vec<Patrol>,
    pub pellets: Vec<Pellet>,
    pub shaft_xs: Vec<f32>,
    /// At most one lane transition is in flight at a time
    pub transition: Option<LaneTransition>,
    /// Score, high score and narrative unlock counter
    pub ledger: Ledger,
}

impl SimulationState {
    /// Fresh game: level 1, a single life, everything generated from the seed
    pub fn new(seed: u64, high_score: u64, reduced_motion: bool) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            level: 1,
            floor_count: FLOOR_COUNT,
            lives: 1,
            phase: GamePhase::Playing,
            reduced_motion,
            time_secs: 0.0,
            player: Player::at_floor_start(0),
            patrols: Vec::new(),
            pellets: Vec::new(),
            shaft_xs: Vec::new(),
            transition: None,
            ledger: Ledger::new(high_score),
        };
        state.regenerate();
        log::info!("new run, seed {seed}");
        state
    }

    /// Restart after game over: level 1, score and unlock progress wiped,
    /// high score kept
    pub fn start_fresh(&mut self) {
        self.level = 1;
        self.lives = 1;
        self.phase = GamePhase::Playing;
        self.ledger.reset_run();
        self.player = Player::at_floor_start(0);
        self.regenerate();
        log::info!("fresh start");
    }

    /// Move on to the next level. Lives, score, stamina and unlock progress
    /// carry over; the floor count resets to the starting constant.
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.begin_level();
        log::info!("level {} started", self.level);
    }

    /// Debug entry point: jump straight to `level` (clamped to >= 1) with
    /// the same reset invariants as a normal level change
    pub fn jump_to_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.begin_level();
        log::info!("jumped to level {}", self.level);
    }

    /// Shared level-change path: player back to the bottom floor's start
    /// edge, geometry and populations regenerated, any in-flight transition
    /// discarded wholesale
    fn begin_level(&mut self) {
        self.floor_count = FLOOR_COUNT;
        let stamina = self.player.stamina;
        self.player = Player::at_floor_start(0);
        self.player.stamina = stamina;
        self.regenerate();
    }

    fn regenerate(&mut self) {
        self.transition = None;
        self.shaft_xs = board::shaft_xs();
        self.spawn_patrols();
        self.spawn_pellets();
    }

    /// One patrol per shaft; speed scales with level and shaft index, spawn
    /// height and initial bounce direction come from the level RNG
    fn spawn_patrols(&mut self) {
        let mut rng = self.rng_state.rng_for_level(self.level);
        let top = self.board_top();
        let bottom = self.board_bottom();
        let span = (bottom - top).max(1.0);

        self.patrols.clear();
        for (i, &x) in self.shaft_xs.iter().enumerate() {
            let speed = PATROL_BASE_SPEED
                + self.level as f32 * PATROL_SPEED_PER_LEVEL
                + i as f32 * PATROL_SPEED_PER_SHAFT;
            let y = top + rng.random::<f32>() * span;
            let vy = if rng.random_bool(0.5) { speed } else { -speed };
            let phase = rng.random::<f32>() * std::f32::consts::TAU;
            self.patrols.push(Patrol {
                shaft: i,
                x,
                y,
                vy,
                phase,
                wobble_freq: PATROL_WOBBLE_BASE_FREQ + i as f32 * PATROL_WOBBLE_FREQ_STEP,
            });
        }
    }

    /// Pellet rows on every floor, one row per wide-enough lane segment
    fn spawn_pellets(&mut self) {
        self.pellets.clear();
        let segments = board::lane_segments(&self.shaft_xs);
        for floor in 0..self.floor_count {
            for &(a, b) in &segments {
                for x in board::pellet_row(a, b) {
                    self.pellets.push(Pellet {
                        floor,
                        x,
                        taken: false,
                    });
                }
            }
        }
    }

    /// Y of the topmost floor line (the patrols' upper bound; the HUD strip
    /// above it is out of play)
    pub fn board_top(&self) -> f32 {
        board::floor_y(self.floor_count - 1, self.floor_count)
    }

    /// Y of the bottom floor line (the patrols' lower bound)
    pub fn board_bottom(&self) -> f32 {
        board::floor_y(0, self.floor_count)
    }

    /// Player position for the renderer; mid-transition the y interpolates
    /// between floors with x locked
    pub fn player_pos(&self) -> Vec2 {
        match &self.transition {
            Some(t) => Vec2::new(t.x, t.current_y()),
            None => Vec2::new(
                self.player.x,
                board::floor_y(self.player.floor, self.floor_count),
            ),
        }
    }

    /// Patrol sprite variant for this level, cycling through the four
    /// variants every `VARIANT_LEVEL_CYCLE` levels. Presentation only.
    pub fn patrol_variant(&self) -> u32 {
        (self.level - 1) / VARIANT_LEVEL_CYCLE % PATROL_VARIANTS
    }
}
