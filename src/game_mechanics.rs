//! Yacht scoring rules and the upper-score successor function.
//!
//! Categories 0-5 are the upper section (Ones through Sixes): score =
//! face value x count. Categories 6-11 are the lower section: the two
//! pattern categories that pay the dice sum (Full House, Four of a
//! Kind), the fixed-payout straights (15 / 30), Choice, and Yacht (50).

use crate::constants::*;
use crate::dice_mechanics::count_faces;

/// Compute the score for placing a 5-dice hand in the given category.
pub fn calculate_category_score(dice: &[i32; 5], category: usize) -> i32 {
    let face_count = count_faces(dice);
    let sum_all: i32 = dice.iter().sum();

    match category {
        CATEGORY_ONES | CATEGORY_TWOS | CATEGORY_THREES | CATEGORY_FOURS | CATEGORY_FIVES
        | CATEGORY_SIXES => {
            let face = (category + 1) as i32;
            face_count[face as usize] * face
        }
        CATEGORY_FULL_HOUSE => {
            // Exactly 3 of one face plus 2 of another; five of a kind does not count.
            let has_three = face_count[1..=6].iter().any(|&c| c == 3);
            let has_two = face_count[1..=6].iter().any(|&c| c == 2);
            if has_three && has_two {
                sum_all
            } else {
                0
            }
        }
        CATEGORY_FOUR_OF_A_KIND => {
            if face_count[1..=6].iter().any(|&c| c >= 4) {
                sum_all
            } else {
                0
            }
        }
        CATEGORY_LITTLE_STRAIGHT => {
            if has_run_of_four(&face_count) {
                15
            } else {
                0
            }
        }
        CATEGORY_BIG_STRAIGHT => {
            if has_run_of_five(&face_count) {
                30
            } else {
                0
            }
        }
        CATEGORY_CHOICE => sum_all,
        CATEGORY_YACHT => {
            if face_count[1..=6].iter().any(|&c| c == 5) {
                50
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// Four consecutive distinct faces: {1,2,3,4}, {2,3,4,5}, or {3,4,5,6}.
#[inline]
fn has_run_of_four(face_count: &[i32; 7]) -> bool {
    (1..=3).any(|start| (start..start + 4).all(|f| face_count[f] >= 1))
}

/// Five consecutive distinct faces: {1,2,3,4,5} or {2,3,4,5,6}.
#[inline]
fn has_run_of_five(face_count: &[i32; 7]) -> bool {
    (1..=2).any(|start| (start..start + 5).all(|f| face_count[f] >= 1))
}

/// Compute the successor upper score: m' = min(m + u(c, score), 63).
///
/// Only upper categories advance the upper score; the result is capped
/// at 63 because nothing above the bonus threshold changes the outcome.
pub fn update_upper_score(upper_score: i32, category: usize, score: i32) -> i32 {
    if is_upper_category(category) {
        let new_upper_score = upper_score + score;
        if new_upper_score > UPPER_BONUS_THRESHOLD {
            UPPER_BONUS_THRESHOLD
        } else {
            new_upper_score
        }
    } else {
        upper_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_section() {
        assert_eq!(calculate_category_score(&[1, 1, 1, 1, 1], CATEGORY_ONES), 5);
        assert_eq!(calculate_category_score(&[1, 1, 2, 3, 4], CATEGORY_ONES), 2);
        assert_eq!(calculate_category_score(&[1, 2, 3, 4, 5], CATEGORY_TWOS), 2);
        assert_eq!(
            calculate_category_score(&[3, 3, 4, 5, 6], CATEGORY_THREES),
            6
        );
        assert_eq!(
            calculate_category_score(&[5, 5, 5, 1, 2], CATEGORY_FIVES),
            15
        );
        assert_eq!(
            calculate_category_score(&[6, 6, 6, 6, 6], CATEGORY_SIXES),
            30
        );
        assert_eq!(calculate_category_score(&[2, 3, 4, 5, 6], CATEGORY_ONES), 0);
    }

    #[test]
    fn test_full_house() {
        assert_eq!(
            calculate_category_score(&[1, 1, 1, 2, 2], CATEGORY_FULL_HOUSE),
            7
        );
        assert_eq!(
            calculate_category_score(&[2, 2, 3, 3, 3], CATEGORY_FULL_HOUSE),
            13
        );
        assert_eq!(
            calculate_category_score(&[1, 2, 3, 4, 6], CATEGORY_FULL_HOUSE),
            0
        );
        // Five of a kind is not a full house.
        assert_eq!(
            calculate_category_score(&[5, 5, 5, 5, 5], CATEGORY_FULL_HOUSE),
            0
        );
        // Three plus two singletons is not a full house.
        assert_eq!(
            calculate_category_score(&[4, 4, 4, 2, 3], CATEGORY_FULL_HOUSE),
            0
        );
    }

    #[test]
    fn test_four_of_a_kind() {
        assert_eq!(
            calculate_category_score(&[2, 2, 2, 2, 5], CATEGORY_FOUR_OF_A_KIND),
            13
        );
        assert_eq!(
            calculate_category_score(&[4, 4, 4, 4, 2], CATEGORY_FOUR_OF_A_KIND),
            18
        );
        // Five of a kind qualifies.
        assert_eq!(
            calculate_category_score(&[6, 6, 6, 6, 6], CATEGORY_FOUR_OF_A_KIND),
            30
        );
        assert_eq!(
            calculate_category_score(&[3, 3, 3, 4, 5], CATEGORY_FOUR_OF_A_KIND),
            0
        );
    }

    #[test]
    fn test_straights() {
        assert_eq!(
            calculate_category_score(&[1, 2, 3, 4, 4], CATEGORY_LITTLE_STRAIGHT),
            15
        );
        assert_eq!(
            calculate_category_score(&[3, 4, 5, 6, 6], CATEGORY_LITTLE_STRAIGHT),
            15
        );
        assert_eq!(
            calculate_category_score(&[1, 2, 3, 5, 6], CATEGORY_LITTLE_STRAIGHT),
            0
        );
        assert_eq!(
            calculate_category_score(&[1, 2, 3, 4, 5], CATEGORY_BIG_STRAIGHT),
            30
        );
        assert_eq!(
            calculate_category_score(&[2, 3, 4, 5, 6], CATEGORY_BIG_STRAIGHT),
            30
        );
        // A big straight also contains a run of four.
        assert_eq!(
            calculate_category_score(&[2, 3, 4, 5, 6], CATEGORY_LITTLE_STRAIGHT),
            15
        );
        assert_eq!(
            calculate_category_score(&[1, 2, 3, 4, 6], CATEGORY_BIG_STRAIGHT),
            0
        );
    }

    #[test]
    fn test_choice() {
        assert_eq!(calculate_category_score(&[3, 4, 1, 5, 6], CATEGORY_CHOICE), 19);
        assert_eq!(calculate_category_score(&[1, 1, 1, 1, 1], CATEGORY_CHOICE), 5);
    }

    #[test]
    fn test_yacht() {
        assert_eq!(calculate_category_score(&[6, 6, 6, 6, 6], CATEGORY_YACHT), 50);
        assert_eq!(calculate_category_score(&[1, 1, 1, 1, 1], CATEGORY_YACHT), 50);
        assert_eq!(calculate_category_score(&[6, 6, 6, 6, 5], CATEGORY_YACHT), 0);
    }

    #[test]
    fn test_update_upper_score() {
        assert_eq!(update_upper_score(0, CATEGORY_ONES, 5), 5);
        assert_eq!(update_upper_score(10, CATEGORY_SIXES, 30), 40);
        assert_eq!(update_upper_score(60, CATEGORY_FIVES, 25), 63);
        assert_eq!(update_upper_score(63, CATEGORY_ONES, 5), 63);
        assert_eq!(update_upper_score(10, CATEGORY_CHOICE, 22), 10);
        assert_eq!(update_upper_score(50, CATEGORY_YACHT, 50), 50);
    }
}
