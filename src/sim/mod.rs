//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable timestep supplied by the caller; nothing assumes a fixed step
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod board;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Detection, detect};
pub use state::{
    GameEvent, GamePhase, LaneTransition, Patrol, Pellet, Player, RngState, SimulationState,
};
pub use tick::{TickInput, tick};
