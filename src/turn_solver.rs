//! Within-turn expected-value engine.
//!
//! A turn is solved bottom-up over the 252-element dice-multiset space:
//!
//! 1. **Leaf values** `E0[r]`: with no rerolls left, the best weighted
//!    category value achievable by hand r against the open categories.
//! 2. **Level propagation** `En[r] = max_K sum P(K->r') * En-1[r']`:
//!    the value of hand r with n rerolls left, maximizing over the
//!    deduplicated keep-multisets K reachable from r.
//! 3. **Mask argmax**: the best of the 32 reroll patterns for a concrete
//!    (unsorted) hand, evaluated against the appropriate level.
//!
//! The per-level arrays memoize every (rerolls-left, dice-multiset)
//! sub-result once per query; the open-category set is fixed for the
//! whole query, so identical states recur across all 32 candidate
//! subsets without being re-solved.

use crate::constants::*;
use crate::dice_mechanics::{face_freq_key, find_dice_set_index, kept_face_counts, sort_dice_set};
use crate::game_mechanics::update_upper_score;
use crate::types::YachtContext;

/// Strategic value of scoring `score` in `cat` at the given upper total.
///
/// The raw score is adjusted so the search values bonus progress and
/// hard-to-refill pattern cells:
/// - crossing the 63 upper threshold banks the 35-point bonus;
/// - an upper score at the 3-per-die pace earns a small credit while
///   the bonus is still open;
/// - a landed Yacht or straight is worth slightly more than face value.
pub fn leaf_category_value(upper_score: i32, cat: usize, score: i32) -> f64 {
    let mut val = score as f64;
    if is_upper_category(cat) {
        if upper_score < UPPER_BONUS_THRESHOLD {
            let new_up = update_upper_score(upper_score, cat, score);
            if new_up >= UPPER_BONUS_THRESHOLD {
                val += UPPER_BONUS as f64;
            } else if score >= 3 * (cat as i32 + 1) {
                val += 2.0;
            }
        }
    } else if score > 0 {
        val += match cat {
            CATEGORY_YACHT => 5.0,
            CATEGORY_BIG_STRAIGHT => 3.0,
            CATEGORY_LITTLE_STRAIGHT => 2.0,
            _ => 0.0,
        };
    }
    val
}

/// Best weighted category value for one dice set with no rerolls left.
#[inline]
pub fn best_scoring_value_by_index(
    ctx: &YachtContext,
    upper_score: i32,
    scored: i32,
    ds_index: usize,
) -> f64 {
    let mut best_val = f64::NEG_INFINITY;
    for c in 0..CATEGORY_COUNT {
        if !is_category_scored(scored, c) {
            let scr = ctx.precomputed_scores[ds_index][c];
            let val = leaf_category_value(upper_score, c, scr);
            if val > best_val {
                best_val = val;
            }
        }
    }
    best_val
}

/// Fill `e_out` with leaf values for all 252 dice sets.
pub fn compute_leaf_values(
    ctx: &YachtContext,
    upper_score: i32,
    scored: i32,
    e_out: &mut [f64; NUM_DICE_SETS],
) {
    for ds_i in 0..NUM_DICE_SETS {
        e_out[ds_i] = best_scoring_value_by_index(ctx, upper_score, scored, ds_i);
    }
}

/// One reroll level: E_cur[r] = max over keeps of the expected previous-
/// level value, with mask 0 (keep all) as the floor.
pub fn compute_expected_values_for_n_rerolls(
    ctx: &YachtContext,
    e_prev: &[f64; NUM_DICE_SETS],
    e_cur: &mut [f64; NUM_DICE_SETS],
) {
    let kt = &ctx.keep_table;
    for ds_i in 0..NUM_DICE_SETS {
        let mut best_val = e_prev[ds_i]; // mask=0: keep all
        for j in 0..kt.unique_count[ds_i] as usize {
            let kid = kt.unique_keep_ids[ds_i][j] as usize;
            let ev = kt.row_expectation(kid, e_prev);
            if ev > best_val {
                best_val = ev;
            }
        }
        e_cur[ds_i] = best_val;
    }
}

/// Keep-multiset index produced by applying `mask` to a concrete hand.
#[inline]
pub fn keep_id_for_mask(ctx: &YachtContext, dice: &[i32; 5], mask: i32) -> usize {
    let kf = kept_face_counts(dice, mask);
    ctx.keep_lookup[face_freq_key(&kf)] as usize
}

/// Expected next-level value of one reroll mask on a concrete hand.
pub fn expected_value_for_reroll_mask(
    ctx: &YachtContext,
    dice: &[i32; 5],
    e_for_masks: &[f64; NUM_DICE_SETS],
    mask: i32,
) -> f64 {
    if mask == 0 {
        let mut sorted_dice = *dice;
        sort_dice_set(&mut sorted_dice);
        return e_for_masks[find_dice_set_index(ctx, &sorted_dice)];
    }
    let kid = keep_id_for_mask(ctx, dice, mask);
    ctx.keep_table.row_expectation(kid, e_for_masks)
}

/// Argmax reroll mask for a concrete hand.
///
/// Masks are scanned in (dice-rerolled ascending, mask ascending) order
/// with a strict maximum, so equal expected values resolve to the
/// pattern that keeps more dice, then to the lowest pattern index.
/// Masks that would reroll a locked die are skipped; mask 0 is always
/// legal, so a best mask always exists.
pub fn choose_best_reroll_mask(
    ctx: &YachtContext,
    e_for_masks: &[f64; NUM_DICE_SETS],
    dice: &[i32; 5],
    locked_mask: i32,
) -> (i32, f64) {
    let mut best_mask = 0;
    let mut best_val = f64::NEG_INFINITY;
    for &mask in &ctx.mask_eval_order {
        if mask & locked_mask != 0 {
            continue;
        }
        let ev = expected_value_for_reroll_mask(ctx, dice, e_for_masks, mask);
        if ev > best_val {
            best_val = ev;
            best_mask = mask;
        }
    }
    (best_mask, best_val)
}
