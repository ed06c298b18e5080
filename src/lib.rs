//! Ghost Grid - a floors-and-shafts arcade game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board geometry, movement, collisions, game state)
//! - `session`: Engine shell tying simulation to storage and render snapshots
//! - `scoring`: Score ledger and narrative unlock progression
//! - `persistence`: Key/value storage abstraction
//! - `settings`: Player preferences (reduced motion)

pub mod persistence;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod sim;

pub use persistence::{JsonFileStore, MemoryStore, Store};
pub use scoring::Ledger;
pub use session::{Session, Snapshot};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical board size (4:3, matching the rendered canvas)
    pub const BOARD_W: f32 = 960.0;
    pub const BOARD_H: f32 = 720.0;

    /// Floors per level (constant; levels do not get taller)
    pub const FLOOR_COUNT: usize = 12;
    /// Vertical transit shafts per level
    pub const SHAFT_COUNT: usize = 7;
    /// Horizontal playfield margin (floor edges)
    pub const FLOOR_MARGIN_X: f32 = 48.0;
    /// Space above the top floor reserved for the HUD
    pub const TOP_PAD: f32 = 112.0;
    /// Space below the bottom floor
    pub const BOTTOM_PAD: f32 = 64.0;
    /// Shaft column width
    pub const SHAFT_WIDTH: f32 = 56.0;

    /// Player walk speed (units/s)
    pub const PLAYER_SPEED: f32 = 250.0;
    /// Player sprint speed (units/s)
    pub const PLAYER_SPRINT: f32 = 480.0;
    /// Sprint stamina tank (0..1): consume fast, regen slow
    pub const STAMINA_CONSUME_PER_S: f32 = 1.2;
    pub const STAMINA_REGEN_PER_S: f32 = 0.2;
    /// Sprint may only start on a full tank
    pub const SPRINT_START_THRESHOLD: f32 = 0.999;
    /// Tank level below which an active sprint cuts out
    pub const SPRINT_EMPTY_EPS: f32 = 1e-3;

    /// Patrol sprite size
    pub const PATROL_WIDTH: f32 = 56.0;
    pub const PATROL_HEIGHT: f32 = 56.0;
    /// Vertical distance to the player's floor line, as a fraction of
    /// patrol height, inside which a patrol blocks the lane
    pub const PATROL_BLOCK_BAND: f32 = 0.55;
    /// Patrol speed scaling: base + level term + per-shaft stagger (units/s)
    pub const PATROL_BASE_SPEED: f32 = 70.0;
    pub const PATROL_SPEED_PER_LEVEL: f32 = 15.0;
    pub const PATROL_SPEED_PER_SHAFT: f32 = 5.0;
    /// Cosmetic sinusoidal speed perturbation (off under reduced motion)
    pub const PATROL_WOBBLE_AMPLITUDE: f32 = 20.0;
    pub const PATROL_WOBBLE_BASE_FREQ: f32 = 0.3;
    pub const PATROL_WOBBLE_FREQ_STEP: f32 = 0.07;
    /// Patrol sprite variants, cycled every `VARIANT_LEVEL_CYCLE` levels
    pub const PATROL_VARIANTS: u32 = 4;
    pub const VARIANT_LEVEL_CYCLE: u32 = 3;

    /// Pellet row spacing and collection geometry
    pub const PELLET_SPACING: f32 = 48.0;
    pub const PELLET_RADIUS: f32 = 6.0;
    /// Extra slack on top of the pellet radius when collecting
    pub const PELLET_TOLERANCE: f32 = 8.0;
    /// Points per pellet
    pub const PELLET_POINTS: u64 = 10;

    /// How close to a lane's far edge counts as reaching it
    pub const LANE_EDGE_EPS: f32 = 2.0;
    /// Lane-completion bonus per level
    pub const LANE_BONUS_FACTOR: u64 = 10;
    /// Extra bonus per level for finishing a lane without reversing
    pub const ONE_GO_BONUS_FACTOR: u64 = 100;
    /// Vertical lane-transition duration (seconds)
    pub const TRANSITION_SECS: f32 = 0.42;
    /// Shortened duration under reduced motion
    pub const TRANSITION_SECS_REDUCED: f32 = 0.12;

    /// A story line unlocks when a completed level is a multiple of this
    pub const UNLOCK_LEVEL_INTERVAL: u32 = 3;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Sine ease-in-out over t in [0, 1]
#[inline]
pub fn ease_in_out_sine(t: f32) -> f32 {
    0.5 - 0.5 * (std::f32::consts::PI * t).cos()
}
