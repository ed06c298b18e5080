//! Score ledger and narrative unlock progression
//!
//! The ledger travels inside the simulation state so snapshots are
//! self-contained; the session shell persists the high score and unlock
//! counter whenever they change.

use serde::{Deserialize, Serialize};

/// Narrative lines, revealed one per third completed level
pub static STORY_LINES: [&str; 9] = [
    "WKH OLIW KXPV DW GDZQ.",
    "COUNT THE SHAFTS TWICE; TRUST THE ODD ONE.",
    "JRYY EHA, EHAARE. GUR TEVQ ERZRZOREF.",
    "NEVER LINGER UNDER A HUMMING COLUMN.",
    "GUR GBC SYBBE VF ARIRE GUR RAQ.",
    "PATROLS FORGET A FACE IN THREE LEVELS.",
    "VRPHRQH LV OLVWHQLQJ EHWZHHQ IORRUV.",
    "SAVE YOUR SPRINT FOR THE LAST CROSSING.",
    "ASK FOR THE KEEPER ON THE TOP FLOOR.",
];

/// Display cap for the score HUD (internal values are uncapped)
pub const SCORE_DISPLAY_MAX: u64 = 999_999;

/// Running score, persisted best and unlock progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub score: u64,
    pub high_score: u64,
    /// Story lines revealed so far, in [0, STORY_LINES.len()]
    pub unlocked: u32,
}

impl Ledger {
    /// Start a ledger with a previously persisted best
    pub fn new(high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
            unlocked: 0,
        }
    }

    /// Add points to the running score. Zero deltas are ignored. Returns
    /// the new high score when this addition sets one.
    pub fn add_score(&mut self, points: u64) -> Option<u64> {
        if points == 0 {
            return None;
        }
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            return Some(self.high_score);
        }
        None
    }

    /// Reveal the next story line, if any remain. Returns its index.
    pub fn unlock_next(&mut self) -> Option<usize> {
        if (self.unlocked as usize) < STORY_LINES.len() {
            let index = self.unlocked as usize;
            self.unlocked += 1;
            Some(index)
        } else {
            None
        }
    }

    /// The lines revealed so far
    pub fn unlocked_lines(&self) -> &'static [&'static str] {
        &STORY_LINES[..self.unlocked as usize]
    }

    /// Wipe the run (score and unlock progress); the high score survives
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.unlocked = 0;
    }
}

/// Score formatted for the HUD: zero-padded six digits, display-clamped
pub fn format_score(score: u64) -> String {
    format!("{:06}", score.min(SCORE_DISPLAY_MAX))
}
