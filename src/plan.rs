//! Daily meal plan construction.
//!
//! Distributes target calories across the six board slots and fills each
//! slot with food items, either from fixed calorie-band combos or from the
//! user's liked foods.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::domain::{FoodCategory, FoodItem, MealSlot};
use crate::foods::FoodDatabase;

/// Calorie share of each slot. The shares sum to 1.0, but the last slot is
/// never computed from its share: it takes whatever remains after the
/// first five are rounded, so the six buckets always sum exactly to the
/// daily target. Rounding all six independently would drift.
fn slot_weight(slot: MealSlot) -> f64 {
    match slot {
        MealSlot::Breakfast => 0.25,
        MealSlot::Lunch | MealSlot::Dinner => 0.30,
        MealSlot::MorningSnack | MealSlot::AfternoonSnack | MealSlot::EveningSnack => 0.05,
    }
}

/// Splits target calories into per-slot buckets, in board order.
///
/// The first five buckets are `round(target * share)`; the evening snack
/// absorbs the rounding remainder.
pub fn distribute_meals(target_calories: i32) -> Vec<(MealSlot, i32)> {
    let slots = MealSlot::all();
    let mut buckets = Vec::with_capacity(slots.len());
    let mut allocated = 0;

    for slot in &slots[..slots.len() - 1] {
        let bucket = (f64::from(target_calories) * slot_weight(*slot)).round() as i32;
        allocated += bucket;
        buckets.push((*slot, bucket));
    }
    buckets.push((MealSlot::EveningSnack, target_calories - allocated));

    buckets
}

/// A filled meal slot.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMeal {
    pub slot: MealSlot,
    pub calories: i32,
    pub items: Vec<FoodItem>,
}

/// A full day on the board: six slots in order.
#[derive(Debug, Clone, Serialize)]
pub struct MealPlan {
    pub meals: Vec<PlannedMeal>,
}

impl MealPlan {
    /// Sum of the slot calorie buckets.
    pub fn total_calories(&self) -> i32 {
        self.meals.iter().map(|m| m.calories).sum()
    }
}

/// Liked and disliked food names per category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodPreferences {
    #[serde(default)]
    pub liked: HashMap<FoodCategory, Vec<String>>,
    #[serde(default)]
    pub disliked: HashMap<FoodCategory, Vec<String>>,
}

impl FoodPreferences {
    /// True when no liked foods are recorded in any category.
    pub fn is_empty(&self) -> bool {
        self.liked.values().all(|names| names.is_empty())
    }

    /// Records a liked food.
    pub fn like(&mut self, category: FoodCategory, name: impl Into<String>) {
        self.liked.entry(category).or_default().push(name.into());
    }

    /// Liked names in a category, minus any that are also disliked.
    fn liked_in(&self, category: FoodCategory) -> Vec<&str> {
        let disliked = self.disliked.get(&category);
        self.liked
            .get(&category)
            .map(|names| {
                names
                    .iter()
                    .map(String::as_str)
                    .filter(|name| {
                        !disliked.is_some_and(|d| d.iter().any(|x| x.eq_ignore_ascii_case(name)))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Fixed fallback when a category has no usable liked foods.
fn default_item(db: &FoodDatabase, category: FoodCategory) -> FoodItem {
    let (name, calories) = match category {
        FoodCategory::Proteins => ("Chicken Breast", 165),
        FoodCategory::Carbs => ("Brown Rice", 216),
        FoodCategory::Vegetables => ("Broccoli", 55),
        FoodCategory::Fruits => ("Apple", 95),
        FoodCategory::Snacks => ("Mixed Nuts", 170),
    };
    db.find_in(category, name)
        .cloned()
        .unwrap_or_else(|| FoodItem::new(name, calories))
}

/// Selects fixed combo items for a slot by calorie band.
///
/// The combos are lookup data: each band maps to a fixed item list drawn
/// from the default food database.
pub fn threshold_items(slot: MealSlot, calories: i32, db: &FoodDatabase) -> Vec<FoodItem> {
    let named = |names: &[&str]| -> Vec<FoodItem> {
        names
            .iter()
            .filter_map(|name| db.find(name).cloned())
            .collect()
    };

    match slot {
        MealSlot::Breakfast => {
            if calories >= 400 {
                named(&["Scrambled Eggs", "Whole Wheat Toast", "Almond Butter", "Banana"])
            } else if calories >= 300 {
                named(&["Oatmeal", "Mixed Berries", "Almond Butter"])
            } else {
                named(&["Greek Yogurt", "Apple"])
            }
        }
        MealSlot::Lunch => {
            if calories >= 500 {
                named(&["Chicken Breast", "Brown Rice", "Broccoli"])
            } else if calories >= 350 {
                named(&["Chicken Breast", "Sweet Potato", "Mixed Salad"])
            } else {
                named(&["Scrambled Eggs", "Mixed Salad"])
            }
        }
        MealSlot::Dinner => {
            if calories >= 500 {
                named(&["Salmon Fillet", "Sweet Potato", "Asparagus"])
            } else if calories >= 350 {
                named(&["Lean Beef", "Brown Rice", "Green Beans"])
            } else {
                named(&["Tofu", "Mixed Salad"])
            }
        }
        MealSlot::MorningSnack | MealSlot::AfternoonSnack | MealSlot::EveningSnack => {
            if calories >= 150 {
                named(&["Mixed Nuts"])
            } else if calories >= 100 {
                named(&["Greek Yogurt"])
            } else {
                named(&["Apple"])
            }
        }
    }
}

/// Categories consulted for a slot in the preference-aware variant.
///
/// Snack slots are handled separately: they draw from a combined
/// snacks-or-fruits pool.
fn slot_categories(slot: MealSlot) -> &'static [FoodCategory] {
    match slot {
        MealSlot::Breakfast => &[FoodCategory::Carbs, FoodCategory::Proteins, FoodCategory::Fruits],
        MealSlot::Lunch | MealSlot::Dinner => &[
            FoodCategory::Proteins,
            FoodCategory::Carbs,
            FoodCategory::Vegetables,
        ],
        MealSlot::MorningSnack | MealSlot::AfternoonSnack | MealSlot::EveningSnack => {
            &[FoodCategory::Snacks]
        }
    }
}

/// Picks one liked item from a category, uniformly at random.
///
/// Liked names that do not resolve against the database are skipped; with
/// nothing usable, the fixed category default is returned.
fn pick_liked(
    prefs: &FoodPreferences,
    db: &FoodDatabase,
    category: FoodCategory,
    rng: &mut impl Rng,
) -> FoodItem {
    let candidates: Vec<&FoodItem> = prefs
        .liked_in(category)
        .iter()
        .filter_map(|name| db.find_in(category, name))
        .collect();

    candidates
        .choose(rng)
        .map(|item| (*item).clone())
        .unwrap_or_else(|| default_item(db, category))
}

/// Selects items for a slot from the user's liked foods.
pub fn preference_items(
    slot: MealSlot,
    prefs: &FoodPreferences,
    db: &FoodDatabase,
    rng: &mut impl Rng,
) -> Vec<FoodItem> {
    if slot.is_snack() {
        // One liked snack or fruit.
        let pool: Vec<&FoodItem> = [FoodCategory::Snacks, FoodCategory::Fruits]
            .iter()
            .flat_map(|c| {
                prefs
                    .liked_in(*c)
                    .into_iter()
                    .filter_map(|name| db.find_in(*c, name))
                    .collect::<Vec<_>>()
            })
            .collect();

        let item = pool
            .choose(rng)
            .map(|item| (*item).clone())
            .unwrap_or_else(|| default_item(db, FoodCategory::Snacks));
        return vec![item];
    }

    slot_categories(slot)
        .iter()
        .map(|category| pick_liked(prefs, db, *category, rng))
        .collect()
}

/// Builds a full meal plan for the day.
///
/// With non-empty preferences the preference-aware selector runs per slot;
/// otherwise the fixed calorie-band combos are used.
pub fn build_meal_plan(
    target_calories: i32,
    prefs: Option<&FoodPreferences>,
    db: &FoodDatabase,
    rng: &mut impl Rng,
) -> MealPlan {
    let meals = distribute_meals(target_calories)
        .into_iter()
        .map(|(slot, calories)| {
            let items = match prefs {
                Some(p) if !p.is_empty() => preference_items(slot, p, db, rng),
                _ => threshold_items(slot, calories, db),
            };
            PlannedMeal {
                slot,
                calories,
                items,
            }
        })
        .collect();

    MealPlan { meals }
}
