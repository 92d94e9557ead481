//! Decision queries for the automated player and for advisory hints.
//!
//! Everything here is read-only over a game snapshot: queries build
//! their per-level value arrays, pick or rank candidates, and return
//! plain records. The caller applies a chosen decision through the
//! [`GameState`] mutators. The raw-parameter functions mirror what the
//! HTTP layer receives; the `get_*` wrappers extract the same
//! parameters from a [`GameState`].
//!
//! ## Category policy
//!
//! A category choice is valued as
//! `score + pacing + crossing + waste + scarcity`:
//! - `pacing` (upper only): `(score - 3*face) * 0.5`, crediting bonus
//!   progress and debiting bonus damage while the threshold is open;
//! - `crossing`: +35 when the assignment banks the upper bonus;
//! - `waste` (zero scores only): graded penalties so a forced zero
//!   discards the least valuable open cell first (Ones before the
//!   straights, Yacht last);
//! - `scarcity`: `score * 0.2` once three or fewer categories remain.
//!
//! Ties resolve to the lowest category index. A zero-scoring category
//! can only win when every open category scores zero.

use serde::Serialize;

use crate::constants::*;
use crate::dice_mechanics::{find_dice_set_index, sort_dice_set};
use crate::game_mechanics::update_upper_score;
use crate::game_state::GameState;
use crate::turn_solver::{
    choose_best_reroll_mask, compute_expected_values_for_n_rerolls, compute_leaf_values,
    expected_value_for_reroll_mask, keep_id_for_mask,
};
use crate::types::YachtContext;

/// A ranked category recommendation.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CategoryChoice {
    pub category: usize,
    /// Immediate score the current hand yields.
    pub score: i32,
    /// Policy value, rounded to one decimal for display.
    pub expected_value: f64,
}

/// A ranked hold recommendation: true = keep that die.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct HoldChoice {
    pub holds: [bool; 5],
    /// Expected turn value of rerolling the unheld dice, rounded to one
    /// decimal for display.
    pub expected_value: f64,
}

/// One automated turn, compact enough to log or aggregate.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct TurnRecord {
    pub dice_initial: [i32; 5],
    pub mask1: i32,
    pub dice_after_reroll1: [i32; 5],
    pub mask2: i32,
    pub dice_final: [i32; 5],
    pub category: usize,
    pub score: i32,
}

fn round_display(ev: f64) -> f64 {
    (ev * 10.0).round() / 10.0
}

fn holds_from_mask(mask: i32) -> [bool; 5] {
    std::array::from_fn(|i| mask & (1 << i) == 0)
}

/// Expected values the mask search runs against: the leaf level for the
/// last reroll, one propagated level when two rerolls remain.
fn mask_level_values(
    ctx: &YachtContext,
    upper_score: i32,
    scored: i32,
    rerolls_remaining: i32,
) -> [f64; NUM_DICE_SETS] {
    let mut e0 = [0.0; NUM_DICE_SETS];
    compute_leaf_values(ctx, upper_score, scored, &mut e0);
    if rerolls_remaining <= 1 {
        return e0;
    }
    let mut e1 = [0.0; NUM_DICE_SETS];
    compute_expected_values_for_n_rerolls(ctx, &e0, &mut e1);
    e1
}

/// Best reroll mask for a concrete situation. `locked_mask` marks dice
/// the search must keep.
pub fn compute_best_reroll(
    ctx: &YachtContext,
    upper_score: i32,
    scored: i32,
    dice: &[i32; 5],
    locked_mask: i32,
    rerolls_remaining: i32,
) -> (i32, f64) {
    let e = mask_level_values(ctx, upper_score, scored, rerolls_remaining);
    choose_best_reroll_mask(ctx, &e, dice, locked_mask)
}

/// All legal reroll patterns ranked by expected value, deduplicated by
/// kept multiset (on a hand with repeated faces, masks keeping the same
/// multiset are interchangeable; the tie-break-preferred one is kept).
pub fn rank_reroll_masks(
    ctx: &YachtContext,
    upper_score: i32,
    scored: i32,
    dice: &[i32; 5],
    locked_mask: i32,
    rerolls_remaining: i32,
) -> Vec<HoldChoice> {
    if scored == (1 << CATEGORY_COUNT) - 1 {
        return Vec::new(); // nothing left to aim for
    }
    let e = mask_level_values(ctx, upper_score, scored, rerolls_remaining);

    let mut seen_keeps: Vec<usize> = Vec::with_capacity(32);
    let mut ranked: Vec<(i32, f64)> = Vec::with_capacity(32);
    for &mask in &ctx.mask_eval_order {
        if mask & locked_mask != 0 {
            continue;
        }
        let kid = keep_id_for_mask(ctx, dice, mask);
        if seen_keeps.contains(&kid) {
            continue;
        }
        seen_keeps.push(kid);
        ranked.push((mask, expected_value_for_reroll_mask(ctx, dice, &e, mask)));
    }

    // Stable sort preserves the tie-break scan order among equals.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .map(|(mask, ev)| HoldChoice {
            holds: holds_from_mask(mask),
            expected_value: round_display(ev),
        })
        .collect()
}

/// Waste penalty for burning a category on a zero score.
fn zero_waste_penalty(cat: usize) -> f64 {
    match cat {
        CATEGORY_YACHT => -25.0,
        CATEGORY_LITTLE_STRAIGHT | CATEGORY_BIG_STRAIGHT => -15.0,
        CATEGORY_FULL_HOUSE | CATEGORY_FOUR_OF_A_KIND => -10.0,
        _ => -5.0,
    }
}

/// Policy value of assigning `score` to `cat` (see module docs).
fn category_choice_value(upper_score: i32, remaining: usize, cat: usize, score: i32) -> f64 {
    let mut val = score as f64;

    if is_upper_category(cat) {
        let face = cat as i32 + 1;
        val += (score - 3 * face) as f64 * 0.5;
        let new_up = update_upper_score(upper_score, cat, score);
        if upper_score < UPPER_BONUS_THRESHOLD && new_up >= UPPER_BONUS_THRESHOLD {
            val += UPPER_BONUS as f64;
        }
    }

    if score == 0 {
        val += zero_waste_penalty(cat);
    }

    if remaining <= 3 {
        val += score as f64 * 0.2;
    }

    val
}

/// Best category for a concrete hand, or None when nothing is open.
pub fn choose_best_category(
    ctx: &YachtContext,
    upper_score: i32,
    scored: i32,
    dice: &[i32; 5],
) -> Option<CategoryChoice> {
    let mut sorted_dice = *dice;
    sort_dice_set(&mut sorted_dice);
    let ds_index = find_dice_set_index(ctx, &sorted_dice);
    let remaining = CATEGORY_COUNT - (scored as u32).count_ones() as usize;

    let mut best: Option<CategoryChoice> = None;
    let mut best_val = f64::NEG_INFINITY;
    for c in 0..CATEGORY_COUNT {
        if is_category_scored(scored, c) {
            continue;
        }
        let scr = ctx.precomputed_scores[ds_index][c];
        let val = category_choice_value(upper_score, remaining, c, scr);
        if val > best_val {
            best_val = val;
            best = Some(CategoryChoice {
                category: c,
                score: scr,
                expected_value: round_display(val),
            });
        }
    }
    best
}

/// All open categories ranked by policy value, descending.
pub fn rank_categories(
    ctx: &YachtContext,
    upper_score: i32,
    scored: i32,
    dice: &[i32; 5],
) -> Vec<CategoryChoice> {
    let mut sorted_dice = *dice;
    sort_dice_set(&mut sorted_dice);
    let ds_index = find_dice_set_index(ctx, &sorted_dice);
    let remaining = CATEGORY_COUNT - (scored as u32).count_ones() as usize;

    let mut ranked: Vec<(f64, CategoryChoice)> = (0..CATEGORY_COUNT)
        .filter(|&c| !is_category_scored(scored, c))
        .map(|c| {
            let scr = ctx.precomputed_scores[ds_index][c];
            let val = category_choice_value(upper_score, remaining, c, scr);
            (
                val,
                CategoryChoice {
                    category: c,
                    score: scr,
                    expected_value: round_display(val),
                },
            )
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().map(|(_, choice)| choice).collect()
}

// ── GameState-facing wrappers ───────────────────────────────────────

/// The hold pattern (true = keep) the automated player would commit to
/// before the next reroll, or None when no reroll decision is legal.
pub fn get_holds_decision(ctx: &YachtContext, game: &GameState) -> Option<[bool; 5]> {
    let rolls_left = game.rolls_left();
    if rolls_left == 0 || rolls_left >= MAX_ROLLS_PER_TURN {
        return None;
    }
    let board = game.current_board();
    if board.is_complete() {
        return None;
    }
    let (mask, _) = compute_best_reroll(
        ctx,
        board.upper_total_capped(),
        board.scored_mask(),
        &game.dice_values(),
        game.dice().locked_mask(),
        rolls_left,
    );
    Some(holds_from_mask(mask))
}

/// The category the automated player would record for the current hand,
/// or None when no assignment is legal.
pub fn get_category_decision(ctx: &YachtContext, game: &GameState) -> Option<usize> {
    if game.rolls_left() >= MAX_ROLLS_PER_TURN {
        return None;
    }
    let board = game.current_board();
    choose_best_category(
        ctx,
        board.upper_total_capped(),
        board.scored_mask(),
        &game.dice_values(),
    )
    .map(|choice| choice.category)
}

/// Ranked hold recommendations for advisory display; empty when no
/// reroll decision is legal.
pub fn get_top_hold_choices(ctx: &YachtContext, game: &GameState) -> Vec<HoldChoice> {
    let rolls_left = game.rolls_left();
    if rolls_left == 0 || rolls_left >= MAX_ROLLS_PER_TURN {
        return Vec::new();
    }
    let board = game.current_board();
    if board.is_complete() {
        return Vec::new();
    }
    rank_reroll_masks(
        ctx,
        board.upper_total_capped(),
        board.scored_mask(),
        &game.dice_values(),
        game.dice().locked_mask(),
        rolls_left,
    )
}

/// Ranked category recommendations for advisory display; empty when no
/// assignment is legal.
pub fn get_top_category_choices(ctx: &YachtContext, game: &GameState) -> Vec<CategoryChoice> {
    if game.rolls_left() >= MAX_ROLLS_PER_TURN {
        return Vec::new();
    }
    let board = game.current_board();
    rank_categories(
        ctx,
        board.upper_total_capped(),
        board.scored_mask(),
        &game.dice_values(),
    )
}

fn apply_holds(game: &mut GameState, mask: i32) {
    let desired = holds_from_mask(mask);
    for i in 0..5 {
        if game.dice().is_held(i) != desired[i] {
            game.toggle_hold(i);
        }
    }
}

/// Play one full automated turn through the public mutators: roll,
/// commit holds, reroll (stopping early once keeping everything is
/// best), then record the chosen category. Returns None if the game is
/// over or a turn is already in progress.
pub fn play_ai_turn(ctx: &YachtContext, game: &mut GameState) -> Option<TurnRecord> {
    if game.is_game_over() || game.rolls_left() != MAX_ROLLS_PER_TURN {
        return None;
    }

    let mut record = TurnRecord::default();
    game.roll_dice();
    record.dice_initial = game.dice_values();
    record.dice_after_reroll1 = game.dice_values();

    for reroll in 0..2 {
        let rolls_left = game.rolls_left();
        if rolls_left == 0 {
            break;
        }
        let board = game.current_board();
        let (mask, _) = compute_best_reroll(
            ctx,
            board.upper_total_capped(),
            board.scored_mask(),
            &game.dice_values(),
            game.dice().locked_mask(),
            rolls_left,
        );
        if mask == 0 {
            break;
        }
        apply_holds(game, mask);
        game.roll_dice();
        if reroll == 0 {
            record.mask1 = mask;
            record.dice_after_reroll1 = game.dice_values();
        } else {
            record.mask2 = mask;
        }
    }

    record.dice_final = game.dice_values();
    let board = game.current_board();
    let choice = choose_best_category(
        ctx,
        board.upper_total_capped(),
        board.scored_mask(),
        &game.dice_values(),
    )?;
    game.select_category(choice.category);
    record.category = choice.category;
    record.score = choice.score;
    Some(record)
}
