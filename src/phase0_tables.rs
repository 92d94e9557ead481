//! Precompute all static lookup tables.
//!
//! The orchestrator [`precompute_lookup_tables`] runs the sub-steps in
//! dependency order:
//!
//! 1. **Factorials** — 0!..5! for multinomial coefficients
//! 2. **Dice combinations** — enumerate R_{5,6} (252 sorted 5-dice multisets) + reverse lookup
//! 3. **Category scores** — score of every dice set in every category
//! 4. **Keep-multiset table** — sparse CSR transition matrix P(K->r) with per-set dedup
//! 5. **Dice set probabilities** — P(empty->r) for each r in R_{5,6}
//! 6. **Mask evaluation order** — the tie-break scan order for reroll masks

use crate::constants::*;
use crate::dice_mechanics::{compute_probability_of_dice_set, face_freq_key};
use crate::game_mechanics::calculate_category_score;
use crate::types::YachtContext;

/// Precompute factorials 0!..5! for multinomial coefficient calculations.
pub fn precompute_factorials(ctx: &mut YachtContext) {
    ctx.factorial[0] = 1;
    for i in 1..=5 {
        ctx.factorial[i] = ctx.factorial[i - 1] * i as i32;
    }
}

/// Enumerate all C(10,5) = 252 sorted 5-dice multisets R_{5,6} and build
/// a 5D reverse lookup table: `index_lookup[d1-1][d2-1][d3-1][d4-1][d5-1] = index`.
pub fn build_all_dice_combinations(ctx: &mut YachtContext) {
    ctx.num_combinations = 0;
    for a in 1..=6i32 {
        for b in a..=6 {
            for c in b..=6 {
                for d in c..=6 {
                    for e in d..=6 {
                        let idx = ctx.num_combinations;
                        ctx.all_dice_sets[idx] = [a, b, c, d, e];
                        ctx.index_lookup[(a - 1) as usize][(b - 1) as usize][(c - 1) as usize]
                            [(d - 1) as usize][(e - 1) as usize] = idx as i32;
                        ctx.num_combinations += 1;
                    }
                }
            }
        }
    }
}

/// Precompute the score of every dice set in every category.
pub fn precompute_category_scores(ctx: &mut YachtContext) {
    for i in 0..NUM_DICE_SETS {
        let dice = ctx.all_dice_sets[i];
        for cat in 0..CATEGORY_COUNT {
            ctx.precomputed_scores[i][cat] = calculate_category_score(&dice, cat);
        }
    }
}

/// Build the keep-multiset transition table.
///
/// Three sub-steps:
///
/// **4a.** Enumerate all 462 keep-multisets (0-5 dice from {1..6}) as
/// frequency vectors [f1..f6]. Build a reverse lookup from frequency vector -> index.
///
/// **4b.** For each keep K and target T in R_{5,6}, compute the transition
/// probability via the multinomial formula:
///   P(K->T) = n! / (d1!*d2!*...*d6!) / 6^n
/// where n = 5 - |K| (dice rerolled) and di = tf[i] - kf[i] (rerolled dice
/// per face). Results stored in CSR format: vals[]/cols[] with row_start[]
/// boundaries.
///
/// **4c.** For each dice set, deduplicate the keep-multisets reachable by
/// masks 1-31: on a hand with repeated faces, many masks keep the same
/// multiset, and the level-propagation loop only needs each one once.
pub fn precompute_keep_table(ctx: &mut YachtContext) {
    // 4a: Enumerate all 462 keep-multisets as frequency vectors [f1..f6].
    let mut keep_freq = [[0i32; 6]; NUM_KEEP_MULTISETS];
    let mut keep_size = [0i32; NUM_KEEP_MULTISETS];
    let mut num_keeps = 0usize;

    for f1 in 0..=5i32 {
        for f2 in 0..=(5 - f1) {
            for f3 in 0..=(5 - f1 - f2) {
                for f4 in 0..=(5 - f1 - f2 - f3) {
                    for f5 in 0..=(5 - f1 - f2 - f3 - f4) {
                        for f6 in 0..=(5 - f1 - f2 - f3 - f4 - f5) {
                            let idx = num_keeps;
                            keep_freq[idx] = [f1, f2, f3, f4, f5, f6];
                            keep_size[idx] = f1 + f2 + f3 + f4 + f5 + f6;
                            ctx.keep_lookup[face_freq_key(&keep_freq[idx])] = idx as i32;
                            num_keeps += 1;
                        }
                    }
                }
            }
        }
    }

    // 4b: Compute P(K->T) for each keep K and target T.
    let pow6: [i32; 6] = [1, 6, 36, 216, 1296, 7776];

    let kt = &mut ctx.keep_table;
    kt.vals.clear();
    kt.cols.clear();

    for ki in 0..num_keeps {
        kt.row_start[ki] = kt.vals.len() as i32;
        let n = 5 - keep_size[ki]; // dice rerolled

        if n == 0 {
            // Keep all 5: deterministic transition to self.
            let mut dice = [0i32; 5];
            let mut d = 0;
            for face in 0..6 {
                for _ in 0..keep_freq[ki][face] {
                    dice[d] = face as i32 + 1;
                    d += 1;
                }
            }
            let ti = ctx.index_lookup[(dice[0] - 1) as usize][(dice[1] - 1) as usize]
                [(dice[2] - 1) as usize][(dice[3] - 1) as usize][(dice[4] - 1) as usize];
            kt.vals.push(1.0);
            kt.cols.push(ti);
            continue;
        }

        let inv_pow6n = 1.0 / pow6[n as usize] as f64;
        let fact_n = ctx.factorial[n as usize];

        for ti in 0..NUM_DICE_SETS {
            // Target frequency vector.
            let mut tf = [0i32; 6];
            let td = &ctx.all_dice_sets[ti];
            for j in 0..5 {
                tf[(td[j] - 1) as usize] += 1;
            }

            // Subset check: the keep must fit inside the target.
            let mut valid = true;
            let mut denom = 1i32;
            for f in 0..6 {
                if keep_freq[ki][f] > tf[f] {
                    valid = false;
                    break;
                }
                denom *= ctx.factorial[(tf[f] - keep_freq[ki][f]) as usize];
            }
            if !valid {
                continue;
            }

            kt.vals.push(fact_n as f64 / denom as f64 * inv_pow6n);
            kt.cols.push(ti as i32);
        }
    }
    kt.row_start[num_keeps] = kt.vals.len() as i32;

    // 4c: Dedup keep-multisets reachable from each dice set (masks 1-31).
    kt.unique_count = [0; NUM_DICE_SETS];
    for ds in 0..NUM_DICE_SETS {
        let dice = ctx.all_dice_sets[ds];
        let mut seen = [0i32; 31];
        let mut n_unique = 0usize;

        for mask in 1..32i32 {
            let mut kf = [0i32; 6];
            for i in 0..5 {
                if (mask & (1 << i)) == 0 {
                    kf[(dice[i] - 1) as usize] += 1;
                }
            }
            let kid = ctx.keep_lookup[face_freq_key(&kf)];

            let mut found = false;
            for j in 0..n_unique {
                if seen[j] == kid {
                    found = true;
                    break;
                }
            }
            if !found {
                seen[n_unique] = kid;
                kt.unique_keep_ids[ds][n_unique] = kid;
                n_unique += 1;
            }
        }

        kt.unique_count[ds] = n_unique as i32;
    }
}

/// Precompute P(empty -> r) for all r in R_{5,6}.
pub fn precompute_dice_set_probabilities(ctx: &mut YachtContext) {
    for ds_i in 0..NUM_DICE_SETS {
        ctx.dice_set_probabilities[ds_i] =
            compute_probability_of_dice_set(ctx, &ctx.all_dice_sets[ds_i]);
    }
}

/// Order all 32 reroll masks by (dice rerolled ascending, mask ascending).
pub fn build_mask_eval_order(ctx: &mut YachtContext) {
    let mut order: Vec<i32> = (0..32).collect();
    order.sort_by_key(|&m| ((m as u32).count_ones(), m));
    ctx.mask_eval_order.copy_from_slice(&order);
}

/// Run all precomputation steps in dependency order.
pub fn precompute_lookup_tables(ctx: &mut YachtContext) {
    precompute_factorials(ctx);
    build_all_dice_combinations(ctx);
    precompute_category_scores(ctx);
    precompute_keep_table(ctx);
    precompute_dice_set_probabilities(ctx);
    build_mask_eval_order(ctx);
}
