use crate::constants::*;

/// Keep-multiset transition table with sparse per-row storage.
pub struct KeepTable {
    /// Sparse probability values for each keep row.
    pub vals: Vec<f64>,
    /// Column indices corresponding to vals entries.
    pub cols: Vec<i32>,
    /// Row boundaries: row_start[ki]..row_start[ki+1] gives range in vals/cols.
    pub row_start: [i32; NUM_KEEP_MULTISETS + 1],
    /// Per dice set: how many unique keep-multisets (masks 1-31).
    pub unique_count: [i32; NUM_DICE_SETS],
    /// Keep indices for each unique keep per dice set.
    pub unique_keep_ids: [[i32; 31]; NUM_DICE_SETS],
}

impl Default for KeepTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeepTable {
    pub fn new() -> Self {
        Self {
            vals: Vec::with_capacity(MAX_KEEP_NNZ_TOTAL),
            cols: Vec::with_capacity(MAX_KEEP_NNZ_TOTAL),
            row_start: [0; NUM_KEEP_MULTISETS + 1],
            unique_count: [0; NUM_DICE_SETS],
            unique_keep_ids: [[0; 31]; NUM_DICE_SETS],
        }
    }

    /// Weighted sum of `e` over one CSR row: sum_r P(K->r) * e[r].
    #[inline(always)]
    pub fn row_expectation(&self, keep_id: usize, e: &[f64; NUM_DICE_SETS]) -> f64 {
        let start = self.row_start[keep_id] as usize;
        let end = self.row_start[keep_id + 1] as usize;
        let mut ev = 0.0;
        for k in start..end {
            ev += self.vals[k] * e[self.cols[k] as usize];
        }
        ev
    }
}

/// Core context containing all precomputed lookup tables used by the
/// decision engine. Built once at startup, read-only afterwards, and
/// safely shared across concurrent decision queries.
pub struct YachtContext {
    /// R_{5,6}: all 252 distinct sorted 5-dice multisets.
    pub all_dice_sets: [[i32; 5]; NUM_DICE_SETS],
    /// |R_{5,6}| (always 252).
    pub num_combinations: usize,
    /// Reverse lookup: sorted dice values -> index in R_{5,6}.
    pub index_lookup: [[[[[i32; 6]; 6]; 6]; 6]; 6],
    /// precomputed_scores[r][c] = score of dice set r in category c.
    pub precomputed_scores: [[i32; CATEGORY_COUNT]; NUM_DICE_SETS],
    /// factorial[n] for n in 0..=5.
    pub factorial: [i32; 6],
    /// P(empty -> r): probability of rolling each r in R_{5,6} from 5 fresh dice.
    pub dice_set_probabilities: [f64; NUM_DICE_SETS],
    /// Keep-multiset transition table.
    pub keep_table: KeepTable,
    /// Face-frequency vector (base-6 key) -> keep-multiset index, or -1.
    pub keep_lookup: Vec<i32>,
    /// All 32 reroll masks ordered by (dice rerolled ascending, mask ascending).
    /// Scanning in this order with a strict maximum realizes the hold
    /// tie-break: prefer keeping more dice, then the lowest pattern index.
    pub mask_eval_order: [i32; 32],
}

impl Default for YachtContext {
    fn default() -> Self {
        Self::new()
    }
}

impl YachtContext {
    pub fn new() -> Self {
        Self {
            all_dice_sets: [[0; 5]; NUM_DICE_SETS],
            num_combinations: 0,
            index_lookup: [[[[[0; 6]; 6]; 6]; 6]; 6],
            precomputed_scores: [[0; CATEGORY_COUNT]; NUM_DICE_SETS],
            factorial: [0; 6],
            dice_set_probabilities: [0.0; NUM_DICE_SETS],
            keep_table: KeepTable::new(),
            keep_lookup: vec![-1; 46656], // 6^6
            mask_eval_order: [0; 32],
        }
    }

    /// Heap-allocated construction; the lookup tables are large enough
    /// that moving a context by value through deep call chains is best
    /// avoided.
    pub fn new_boxed() -> Box<Self> {
        Box::new(Self::new())
    }
}
