//! Game settings and preferences
//!
//! The engine only carries the motion-reduction override; everything else
//! about presentation belongs to the UI shell.

use serde::{Deserialize, Serialize};

use crate::persistence::{Store, keys};

/// Player preferences read once at session start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Reduced motion: shorter lane transitions, no patrol speed wobble
    pub reduced_motion: bool,
}

impl Settings {
    /// Load from storage. The persisted override is exactly `"on"` or
    /// `"off"`; anything else (including absence) falls back to off.
    pub fn load<S: Store>(store: &S) -> Self {
        let reduced_motion = matches!(store.get(keys::REDUCED_MOTION).as_deref(), Some("on"));
        Self { reduced_motion }
    }

    pub fn save<S: Store>(&self, store: &mut S) {
        let value = if self.reduced_motion { "on" } else { "off" };
        store.set(keys::REDUCED_MOTION, value);
    }
}
