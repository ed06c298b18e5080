//! Static board geometry: floors, shafts and pellet layout
//!
//! Floors are implicit - indexed bottom to top, each one a horizontal lane at
//! a y derived from its index. Everything here is a pure function of the
//! level constants so nothing needs to be stored per floor.

use crate::consts::*;

/// Direction of travel on a floor: even floors run left-to-right,
/// odd floors right-to-left.
#[inline]
pub fn floor_direction(index: usize) -> i8 {
    if index % 2 == 0 { 1 } else { -1 }
}

/// Y coordinate of a floor line. Index 0 is the bottom floor; the span
/// between `TOP_PAD` and `BOTTOM_PAD` is divided evenly.
pub fn floor_y(index: usize, floor_count: usize) -> f32 {
    let usable = BOARD_H - TOP_PAD - BOTTOM_PAD;
    let step = usable / (floor_count - 1) as f32;
    BOARD_H - BOTTOM_PAD - index as f32 * step
}

/// X where a lane attempt on this floor begins
#[inline]
pub fn floor_start_x(index: usize) -> f32 {
    if floor_direction(index) == 1 {
        FLOOR_MARGIN_X
    } else {
        BOARD_W - FLOOR_MARGIN_X
    }
}

/// Whether `x` has reached the far edge of this floor's direction of travel
pub fn lane_end_reached(index: usize, x: f32) -> bool {
    let left = FLOOR_MARGIN_X;
    let right = BOARD_W - FLOOR_MARGIN_X;
    if floor_direction(index) == 1 {
        x >= right - LANE_EDGE_EPS
    } else {
        x <= left + LANE_EDGE_EPS
    }
}

/// Shaft center x positions, evenly spread across the usable width
pub fn shaft_xs() -> Vec<f32> {
    let usable = BOARD_W - FLOOR_MARGIN_X * 2.0;
    (0..SHAFT_COUNT)
        .map(|i| {
            let t = (i + 1) as f32 / (SHAFT_COUNT + 1) as f32;
            FLOOR_MARGIN_X + (usable * t).round()
        })
        .collect()
}

/// Horizontal segments of a floor wide enough to hold a pellet row.
///
/// Segment boundaries are the floor edges plus both sides of every shaft
/// column; adjacent boundary pairs narrower than 0.6x the pellet spacing
/// hold no pellets and are dropped.
pub fn lane_segments(shaft_xs: &[f32]) -> Vec<(f32, f32)> {
    let mut xs = Vec::with_capacity(shaft_xs.len() * 2 + 2);
    xs.push(FLOOR_MARGIN_X);
    for &sx in shaft_xs {
        xs.push(sx - SHAFT_WIDTH / 2.0);
        xs.push(sx + SHAFT_WIDTH / 2.0);
    }
    xs.push(BOARD_W - FLOOR_MARGIN_X);
    xs.sort_by(|a, b| a.total_cmp(b));

    xs.windows(2)
        .map(|w| (w[0], w[1]))
        .filter(|(a, b)| b - a > PELLET_SPACING * 0.6)
        .collect()
}

/// Pellet x positions for one segment: as many as fit at `PELLET_SPACING`
/// (always at least one), centered in the segment.
pub fn pellet_row(a: f32, b: f32) -> Vec<f32> {
    let len = b - a;
    let count = (((len - PELLET_SPACING) / PELLET_SPACING).floor() as i32 + 1).max(1) as usize;
    let total = (count - 1) as f32 * PELLET_SPACING;
    let start = (a + b) / 2.0 - total / 2.0;
    (0..count)
        .map(|i| (start + i as f32 * PELLET_SPACING).round())
        .collect()
}
