//! The five-dice set with per-die hold/lock state.
//!
//! Each die is `Free`, `Held`, or `Locked`. Holds are a preference the
//! player can toggle; rolling commits them — every `Held` die becomes
//! `Locked` and can no longer be released for the rest of the turn.
//! This is what keeps the automated player's committed dice safe from
//! the UI while its turn plays out.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-die hold state. Legal transitions:
///
/// | From | `toggle_hold` | `roll` | `reset_holds` |
/// |--------|---------------|----------|---------------|
/// | Free   | Held          | rerolled | Free          |
/// | Held   | Free          | Locked   | Free          |
/// | Locked | rejected      | kept     | Free          |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldState {
    Free,
    Held,
    Locked,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    values: [i32; 5],
    holds: [HoldState; 5],
}

impl Dice {
    pub fn new() -> Self {
        Self {
            values: [1; 5],
            holds: [HoldState::Free; 5],
        }
    }

    /// Reroll every free die with a uniform face in [1,6]; held dice
    /// keep their value and are promoted to locked.
    pub fn roll(&mut self, rng: &mut impl Rng) {
        for h in &mut self.holds {
            if *h == HoldState::Held {
                *h = HoldState::Locked;
            }
        }
        for i in 0..5 {
            if self.holds[i] == HoldState::Free {
                self.values[i] = rng.random_range(1..=6);
            }
        }
    }

    /// Flip a die between free and held. Locked dice and out-of-range
    /// indices are ignored.
    pub fn toggle_hold(&mut self, index: usize) {
        if index >= 5 {
            return;
        }
        self.holds[index] = match self.holds[index] {
            HoldState::Free => HoldState::Held,
            HoldState::Held => HoldState::Free,
            HoldState::Locked => HoldState::Locked,
        };
    }

    /// Release all holds and locks; called at the start of each turn.
    pub fn reset_holds(&mut self) {
        self.holds = [HoldState::Free; 5];
    }

    pub fn values(&self) -> [i32; 5] {
        self.values
    }

    /// Overwrite all five faces. Hold state is untouched.
    pub fn set_values(&mut self, values: [i32; 5]) {
        self.values = values;
    }

    pub fn is_held(&self, index: usize) -> bool {
        index < 5 && self.holds[index] != HoldState::Free
    }

    pub fn is_locked(&self, index: usize) -> bool {
        index < 5 && self.holds[index] == HoldState::Locked
    }

    /// Hold flags (held or locked) for all five dice.
    pub fn holds(&self) -> [bool; 5] {
        std::array::from_fn(|i| self.holds[i] != HoldState::Free)
    }

    /// Lock flags for all five dice.
    pub fn locks(&self) -> [bool; 5] {
        std::array::from_fn(|i| self.holds[i] == HoldState::Locked)
    }

    /// Bitmask of locked dice (bit i set = die i locked). Reroll masks
    /// intersecting this are illegal.
    pub fn locked_mask(&self) -> i32 {
        let mut mask = 0;
        for i in 0..5 {
            if self.holds[i] == HoldState::Locked {
                mask |= 1 << i;
            }
        }
        mask
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}
