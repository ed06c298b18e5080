//! Ghost Grid entry point
//!
//! Headless demo: drives the engine with a simple autopilot at a fixed frame
//! cadence and prints what happened. A real front end binds its renderer and
//! input layer to the same `Session` surface.

use std::time::{SystemTime, UNIX_EPOCH};

use ghost_grid::sim::{GameEvent, GamePhase, TickInput, board};
use ghost_grid::{JsonFileStore, Session};

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let store = JsonFileStore::open("ghost-grid-save.json");
    let mut session = Session::new(seed, store);

    // Autopilot: always head toward the current floor's far edge, sprinting
    // in short bursts. Run up to a minute of simulated play.
    let dt = 1.0 / 60.0;
    for frame in 0u32..60 * 60 {
        let input = TickInput {
            direction: Some(board::floor_direction(session.state.player.floor)),
            sprint: frame % 600 < 60,
            ..Default::default()
        };

        for event in session.frame(&input, dt) {
            match event {
                GameEvent::LaneCompleted { bonus, one_go } => {
                    log::debug!("lane done, +{bonus}{}", if one_go { " (one go)" } else { "" });
                }
                GameEvent::LevelCompleted { level } => println!("level {level} complete"),
                GameEvent::Hit { lives_left } => println!("caught! lives left: {lives_left}"),
                GameEvent::GameOver => println!("game over"),
                _ => {}
            }
        }

        for notice in session.drain_notices() {
            println!("story line {}: {}", notice.index + 1, notice.line);
        }

        if session.state.phase == GamePhase::GameOver {
            break;
        }
    }

    let snap = session.snapshot();
    println!(
        "level {}  score {}  best {}",
        snap.level, snap.score_text, snap.high_score_text
    );
}
