//! Dice multiset arithmetic: face counting, canonical ordering, and the
//! R_{5,6} index space shared by every solver table.

use crate::types::YachtContext;

/// Count occurrences of each face (1-6) in a 5-dice set.
/// face_count[0] is unused; face_count[f] = count of face f.
pub fn count_faces(dice: &[i32; 5]) -> [i32; 7] {
    let mut face_count = [0i32; 7];
    for &d in dice {
        face_count[d as usize] += 1;
    }
    face_count
}

/// Normalize dice to canonical sorted form (ascending).
pub fn sort_dice_set(arr: &mut [i32; 5]) {
    for i in 0..4 {
        for j in (i + 1)..5 {
            if arr[j] < arr[i] {
                arr.swap(i, j);
            }
        }
    }
}

/// Map a sorted dice set to its index in R_{5,6} (0-251).
#[inline(always)]
pub fn find_dice_set_index(ctx: &YachtContext, dice: &[i32; 5]) -> usize {
    ctx.index_lookup[(dice[0] - 1) as usize][(dice[1] - 1) as usize][(dice[2] - 1) as usize]
        [(dice[3] - 1) as usize][(dice[4] - 1) as usize] as usize
}

/// Frequency vector [f1..f6] of the dice kept by `mask` (bit i set = die i rerolled).
pub fn kept_face_counts(dice: &[i32; 5], mask: i32) -> [i32; 6] {
    let mut kf = [0i32; 6];
    for i in 0..5 {
        if (mask & (1 << i)) == 0 {
            kf[(dice[i] - 1) as usize] += 1;
        }
    }
    kf
}

/// Pack a face-frequency vector into the keep-lookup key (base-6 digits).
#[inline(always)]
pub fn face_freq_key(kf: &[i32; 6]) -> usize {
    (((((kf[0] * 6 + kf[1]) * 6 + kf[2]) * 6 + kf[3]) * 6 + kf[4]) * 6 + kf[5]) as usize
}

/// Compute P(empty -> r): probability of rolling this exact sorted dice set
/// from 5 fresh dice.
///
/// Formula: multinomial(5; face_counts) / 6^5
///        = 5! / (n1! * n2! * ... * n6!) / 6^5
pub fn compute_probability_of_dice_set(ctx: &YachtContext, dice: &[i32; 5]) -> f64 {
    let mut face_count = [0i32; 7];
    for &d in dice {
        face_count[d as usize] += 1;
    }

    let numerator = ctx.factorial[5] as f64;
    let mut denominator = 1.0;
    for f in 1..=6 {
        if face_count[f] > 1 {
            let mut sub_fact = 1;
            for x in 2..=face_count[f] {
                sub_fact *= x;
            }
            denominator *= sub_fact as f64;
        }
    }

    let permutations = numerator / denominator;
    let total_outcomes = 6.0f64.powi(5);
    permutations / total_outcomes
}
