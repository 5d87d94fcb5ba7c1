//! Goal-based calorie adjustment and macro splitting.

use serde::Serialize;

use crate::domain::Goal;

// === Energy density constants (Atwater factors) ===

/// Calories per gram of protein.
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Calories per gram of carbohydrate.
pub const KCAL_PER_G_CARBS: f64 = 4.0;

/// Calories per gram of fat.
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Daily caloric offset applied to TDEE for a goal.
///
/// No floor is applied: a low TDEE combined with the weight-loss offset can
/// produce a target below common safe minimums, and callers own that check.
pub fn goal_offset(goal: Goal) -> i32 {
    match goal {
        Goal::LoseWeight => -500,
        Goal::GainMuscle => 300,
        Goal::GainWeight => 500,
        Goal::Maintain | Goal::Health => 0,
    }
}

/// Adjusts TDEE by the goal's caloric offset.
pub fn adjust_for_goal(tdee: i32, goal: Goal) -> i32 {
    tdee + goal_offset(goal)
}

/// Protein/carb/fat calorie fractions for a goal. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroSplit {
    /// Tolerance for the sum-to-one check.
    const EPSILON: f64 = 1e-9;

    /// Creates a split, enforcing that the fractions sum to 1.0.
    ///
    /// Rows are fixed at compile time; a failure here is a table bug, not a
    /// runtime condition, so it is a construction-time assertion.
    pub fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        let sum = protein + carbs + fat;
        assert!(
            (sum - 1.0).abs() < Self::EPSILON,
            "macro ratios must sum to 1.0, got {sum}"
        );
        Self { protein, carbs, fat }
    }
}

/// Macro ratio row for a goal.
pub fn ratios_for_goal(goal: Goal) -> MacroSplit {
    match goal {
        Goal::LoseWeight => MacroSplit::new(0.30, 0.35, 0.35),
        Goal::GainMuscle => MacroSplit::new(0.30, 0.45, 0.25),
        Goal::GainWeight => MacroSplit::new(0.25, 0.45, 0.30),
        // Maintain and health share the default row; any future goal falls
        // back here as well.
        Goal::Maintain | Goal::Health => MacroSplit::new(0.25, 0.45, 0.30),
    }
}

/// Daily macro targets in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroTargets {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

impl MacroTargets {
    /// Calories implied by the gram targets (4/4/9 conversion).
    pub fn calories(&self) -> i32 {
        (f64::from(self.protein_g) * KCAL_PER_G_PROTEIN
            + f64::from(self.carbs_g) * KCAL_PER_G_CARBS
            + f64::from(self.fat_g) * KCAL_PER_G_FAT)
            .round() as i32
    }
}

/// Splits target calories into protein/carb/fat grams for a goal.
///
/// `grams = round(calories * ratio / kcal_per_gram)` per macro. Grams never
/// go negative even for pathological calorie targets.
pub fn split_macros(target_calories: i32, goal: Goal) -> MacroTargets {
    let ratios = ratios_for_goal(goal);
    let calories = f64::from(target_calories);

    let grams = |ratio: f64, kcal_per_g: f64| -> u32 {
        (calories * ratio / kcal_per_g).round().max(0.0) as u32
    };

    MacroTargets {
        protein_g: grams(ratios.protein, KCAL_PER_G_PROTEIN),
        carbs_g: grams(ratios.carbs, KCAL_PER_G_CARBS),
        fat_g: grams(ratios.fat, KCAL_PER_G_FAT),
    }
}
