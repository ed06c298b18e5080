//! Hit and pellet detection
//!
//! Pure reads of the current player/patrol/pellet positions. The tick runs
//! detection once per step while no lane transition is in flight; this module
//! is the sole source of hit and collected outcomes.

use super::state::{Patrol, Pellet};
use crate::consts::*;

/// Outcome of one detection pass
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// A patrol blocks the player's floor at the player's x. Ends the pass:
    /// no pellets are collected on a hit tick.
    Hit { shaft: usize },
    /// Indices of pellets within reach this tick (possibly empty). Multiple
    /// simultaneous pellets all collect independently.
    Collected(Vec<usize>),
}

/// A patrol blocks a floor when its vertical distance to the floor line is
/// inside the blocking band
#[inline]
pub fn patrol_blocks_floor(patrol_y: f32, floor_y: f32) -> bool {
    (patrol_y - floor_y).abs() < PATROL_HEIGHT * PATROL_BLOCK_BAND
}

/// Whether the player's x falls inside the patrol's horizontal span
#[inline]
pub fn patrol_span_contains(patrol_x: f32, x: f32) -> bool {
    x > patrol_x - PATROL_WIDTH / 2.0 && x < patrol_x + PATROL_WIDTH / 2.0
}

/// Whether a pellet at `pellet_x` is close enough to collect
#[inline]
pub fn pellet_in_reach(pellet_x: f32, x: f32) -> bool {
    (pellet_x - x).abs() <= PELLET_RADIUS + PELLET_TOLERANCE
}

/// Run one detection pass. Patrols are tested before pellets and a hit
/// short-circuits the rest of the pass; test order within each group does
/// not affect the outcome.
pub fn detect(
    player_x: f32,
    player_floor: usize,
    floor_y: f32,
    patrols: &[Patrol],
    pellets: &[Pellet],
) -> Detection {
    for p in patrols {
        if patrol_blocks_floor(p.y, floor_y) && patrol_span_contains(p.x, player_x) {
            return Detection::Hit { shaft: p.shaft };
        }
    }

    let collected = pellets
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.taken && p.floor == player_floor)
        .filter(|(_, p)| pellet_in_reach(p.x, player_x))
        .map(|(i, _)| i)
        .collect();
    Detection::Collected(collected)
}
