//! The turn state machine: roll counting, hold windows, category
//! assignment, player rotation, and derived game-over.
//!
//! One logical turn-taker mutates the game at a time; every mutator
//! either applies fully or rejects silently (returning false / doing
//! nothing). Illegal-but-foreseeable calls — rolling with no rolls
//! left, toggling outside the hold window, reusing a category — are
//! rejections, not errors.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::dice::Dice;
use crate::game_mechanics::calculate_category_score;
use crate::score_board::ScoreBoard;

fn fresh_rng() -> SmallRng {
    SmallRng::from_os_rng()
}

/// Full game state: one dice set, two score boards (index 0 = human,
/// index 1 = automated), the player to move, and rolls left this turn.
///
/// The serde snapshot carries everything observable — dice values and
/// hold/lock state, both boards, current player, rolls left. The RNG is
/// not observable state; a deserialized game continues with a fresh one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    dice: Dice,
    boards: [ScoreBoard; 2],
    current_player: usize,
    rolls_left: i32,
    #[serde(skip, default = "fresh_rng")]
    rng: SmallRng,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_rng(fresh_rng())
    }

    /// Deterministic construction for tests and reproducible simulation.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            dice: Dice::new(),
            boards: [ScoreBoard::new(), ScoreBoard::new()],
            current_player: 0,
            rolls_left: MAX_ROLLS_PER_TURN,
            rng,
        }
    }

    /// Reroll all unheld dice. Returns false (and rolls nothing) when no
    /// rolls remain this turn or the game is over.
    pub fn roll_dice(&mut self) -> bool {
        if self.rolls_left == 0 || self.is_game_over() {
            return false;
        }
        self.dice.roll(&mut self.rng);
        self.rolls_left -= 1;
        true
    }

    /// Toggle a die's hold. Legal only between the first and last roll
    /// of the turn (holding before any roll, or changing holds after the
    /// final roll, does nothing). Locked dice stay locked.
    pub fn toggle_hold(&mut self, index: usize) {
        if self.rolls_left > 0 && self.rolls_left < MAX_ROLLS_PER_TURN {
            self.dice.toggle_hold(index);
        }
    }

    /// Release all holds and locks.
    pub fn reset_holds(&mut self) {
        self.dice.reset_holds();
    }

    /// Score the current hand into `category` for the player to move.
    ///
    /// Requires at least one roll this turn and an unused category. On
    /// success the turn ends: holds clear, rolls reset, and the other
    /// player is up. Returns false with no mutation otherwise.
    pub fn select_category(&mut self, category: usize) -> bool {
        if self.is_game_over() || self.rolls_left == MAX_ROLLS_PER_TURN {
            return false;
        }
        if category >= CATEGORY_COUNT {
            return false;
        }

        let score = calculate_category_score(&self.dice.values(), category);
        if !self.boards[self.current_player].set_score(category, score) {
            return false;
        }

        self.dice.reset_holds();
        self.rolls_left = MAX_ROLLS_PER_TURN;
        self.current_player = 1 - self.current_player;
        true
    }

    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    pub fn dice_values(&self) -> [i32; 5] {
        self.dice.values()
    }

    /// Force the dice faces — host-driven sync and scenario setup.
    pub fn set_dice_values(&mut self, values: [i32; 5]) {
        self.dice.set_values(values);
    }

    pub fn rolls_left(&self) -> i32 {
        self.rolls_left
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn board(&self, player: usize) -> &ScoreBoard {
        &self.boards[player]
    }

    pub fn current_board(&self) -> &ScoreBoard {
        &self.boards[self.current_player]
    }

    /// The game ends exactly when both boards are complete.
    pub fn is_game_over(&self) -> bool {
        self.boards.iter().all(|b| b.is_complete())
    }

    /// Unused categories for the player to move, ascending.
    pub fn available_categories(&self) -> Vec<usize> {
        self.current_board().available_categories()
    }

    /// Score the current hand would yield in `category`, without
    /// recording anything. Ignores whether the category is used; the
    /// caller checks availability before offering the assignment.
    pub fn potential_score(&self, category: usize) -> i32 {
        if category < CATEGORY_COUNT {
            calculate_category_score(&self.dice.values(), category)
        } else {
            0
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_budget() {
        let mut game = GameState::from_seed(1);
        assert_eq!(game.rolls_left(), 3);
        assert!(game.roll_dice());
        assert!(game.roll_dice());
        assert!(game.roll_dice());
        assert_eq!(game.rolls_left(), 0);

        let dice_before = game.dice_values();
        assert!(!game.roll_dice());
        assert_eq!(game.dice_values(), dice_before);
        assert_eq!(game.rolls_left(), 0);
    }

    #[test]
    fn test_hold_window() {
        let mut game = GameState::from_seed(2);

        // Before any roll: no-op.
        game.toggle_hold(0);
        assert_eq!(game.dice().holds(), [false; 5]);

        game.roll_dice();
        game.toggle_hold(0);
        assert!(game.dice().is_held(0));
        game.toggle_hold(0);
        assert!(!game.dice().is_held(0));

        // After the final roll: no-op.
        game.roll_dice();
        game.roll_dice();
        game.toggle_hold(1);
        assert!(!game.dice().is_held(1));
    }

    #[test]
    fn test_select_requires_a_roll() {
        let mut game = GameState::from_seed(3);
        assert!(!game.select_category(CATEGORY_CHOICE));
        game.roll_dice();
        assert!(game.select_category(CATEGORY_CHOICE));
    }

    #[test]
    fn test_select_category_ends_turn() {
        let mut game = GameState::from_seed(4);
        game.roll_dice();
        game.toggle_hold(2);

        let hand = game.dice_values();
        let expected: i32 = hand.iter().sum();
        assert!(game.select_category(CATEGORY_CHOICE));

        assert_eq!(game.board(0).get_score(CATEGORY_CHOICE), Some(expected));
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.rolls_left(), 3);
        assert_eq!(game.dice().holds(), [false; 5]);
        assert_eq!(game.dice().locks(), [false; 5]);
    }

    #[test]
    fn test_select_used_category_rejected() {
        let mut game = GameState::from_seed(5);
        game.roll_dice();
        assert!(game.select_category(CATEGORY_ONES));
        // Player 1's Ones is still open.
        game.roll_dice();
        assert!(game.select_category(CATEGORY_ONES));
        // Back to player 0, whose Ones is used.
        game.roll_dice();
        let prior = game.board(0).get_score(CATEGORY_ONES);
        assert!(!game.select_category(CATEGORY_ONES));
        assert_eq!(game.board(0).get_score(CATEGORY_ONES), prior);
        // The failed selection must not end the turn.
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.rolls_left(), 2);
    }

    #[test]
    fn test_select_out_of_range_rejected() {
        let mut game = GameState::from_seed(6);
        game.roll_dice();
        assert!(!game.select_category(CATEGORY_COUNT));
    }

    #[test]
    fn test_potential_score_is_pure() {
        let mut game = GameState::from_seed(7);
        game.roll_dice();
        game.set_dice_values([2, 3, 4, 5, 6]);
        assert_eq!(game.potential_score(CATEGORY_BIG_STRAIGHT), 30);
        assert_eq!(game.potential_score(CATEGORY_CHOICE), 20);
        assert_eq!(game.potential_score(CATEGORY_COUNT), 0);
        // Nothing was recorded.
        assert_eq!(game.board(0).scored_mask(), 0);
    }

    #[test]
    fn test_game_over_is_derived() {
        let mut game = GameState::from_seed(8);
        while !game.is_game_over() {
            assert!(game.roll_dice());
            let cat = game.available_categories()[0];
            assert!(game.select_category(cat));
        }
        assert!(game.board(0).is_complete());
        assert!(game.board(1).is_complete());

        // Terminal: every mutator rejects.
        let snapshot = (game.dice_values(), game.board(0).grand_total());
        assert!(!game.roll_dice());
        assert!(!game.select_category(CATEGORY_ONES));
        assert_eq!(snapshot, (game.dice_values(), game.board(0).grand_total()));
    }
}
