//! Domain types for nutrition profiles, food items and meal plans.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnrecognizedValue;

/// Biological sex used by the Mifflin-St Jeor equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl FromStr for Gender {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "man" => Ok(Gender::Male),
            "female" | "f" | "woman" => Ok(Gender::Female),
            "unspecified" | "other" | "prefer not to say" => Ok(Gender::Unspecified),
            _ => Err(UnrecognizedValue {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// Weekly exercise frequency buckets from the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseFrequency {
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-4")]
    ThreeToFour,
    #[serde(rename = "5-6")]
    FiveToSix,
    #[serde(rename = "daily")]
    Daily,
}

impl ExerciseFrequency {
    /// Returns all frequency variants.
    pub fn all() -> &'static [ExerciseFrequency] {
        &[
            ExerciseFrequency::Never,
            ExerciseFrequency::OneToTwo,
            ExerciseFrequency::ThreeToFour,
            ExerciseFrequency::FiveToSix,
            ExerciseFrequency::Daily,
        ]
    }

    /// Average training sessions per week for this bucket.
    pub fn sessions_per_week(&self) -> f64 {
        match self {
            ExerciseFrequency::Never => 0.0,
            ExerciseFrequency::OneToTwo => 1.5,
            ExerciseFrequency::ThreeToFour => 3.5,
            ExerciseFrequency::FiveToSix => 5.5,
            ExerciseFrequency::Daily => 7.0,
        }
    }

    /// Returns the display name for the bucket.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseFrequency::Never => "never",
            ExerciseFrequency::OneToTwo => "1-2 times/week",
            ExerciseFrequency::ThreeToFour => "3-4 times/week",
            ExerciseFrequency::FiveToSix => "5-6 times/week",
            ExerciseFrequency::Daily => "daily",
        }
    }
}

/// Perceived exercise intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseIntensity {
    Light,
    Moderate,
    High,
}

impl ExerciseIntensity {
    /// Calories burned per minute of exercise at this intensity.
    pub fn kcal_per_minute(&self) -> f64 {
        match self {
            ExerciseIntensity::Light => 4.0,
            ExerciseIntensity::Moderate => 6.0,
            ExerciseIntensity::High => 8.0,
        }
    }
}

/// The user's primary goal, driving calorie offsets and macro ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainMuscle,
    GainWeight,
    Health,
}

impl Goal {
    /// Returns all goal variants.
    pub fn all() -> &'static [Goal] {
        &[
            Goal::LoseWeight,
            Goal::Maintain,
            Goal::GainMuscle,
            Goal::GainWeight,
            Goal::Health,
        ]
    }

    /// Returns the display name for the goal.
    pub fn display_name(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "Lose weight",
            Goal::Maintain => "Maintain",
            Goal::GainMuscle => "Gain muscle",
            Goal::GainWeight => "Gain weight",
            Goal::Health => "General health",
        }
    }
}

impl FromStr for Goal {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lose_weight" | "lose weight" => Ok(Goal::LoseWeight),
            "maintain" => Ok(Goal::Maintain),
            "gain_muscle" | "gain muscle" => Ok(Goal::GainMuscle),
            "gain_weight" | "gain weight" => Ok(Goal::GainWeight),
            "health" => Ok(Goal::Health),
            _ => Err(UnrecognizedValue {
                field: "goal",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The six meal slots of a daily plan, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
}

impl MealSlot {
    /// Returns all slots in board order. EveningSnack is last: it absorbs
    /// the rounding remainder when calories are distributed.
    pub fn all() -> &'static [MealSlot] {
        &[
            MealSlot::Breakfast,
            MealSlot::MorningSnack,
            MealSlot::Lunch,
            MealSlot::AfternoonSnack,
            MealSlot::Dinner,
            MealSlot::EveningSnack,
        ]
    }

    /// Returns the display name for the slot.
    pub fn display_name(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::MorningSnack => "Morning Snack",
            MealSlot::Lunch => "Lunch",
            MealSlot::AfternoonSnack => "Afternoon Snack",
            MealSlot::Dinner => "Dinner",
            MealSlot::EveningSnack => "Evening Snack",
        }
    }

    /// True for the three snack slots.
    pub fn is_snack(&self) -> bool {
        matches!(
            self,
            MealSlot::MorningSnack | MealSlot::AfternoonSnack | MealSlot::EveningSnack
        )
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Food database categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Proteins,
    Carbs,
    Vegetables,
    Fruits,
    Snacks,
}

impl FoodCategory {
    /// Returns all category variants.
    pub fn all() -> &'static [FoodCategory] {
        &[
            FoodCategory::Proteins,
            FoodCategory::Carbs,
            FoodCategory::Vegetables,
            FoodCategory::Fruits,
            FoodCategory::Snacks,
        ]
    }

    /// Returns the lowercase key used in the food database file.
    pub fn key(&self) -> &'static str {
        match self {
            FoodCategory::Proteins => "proteins",
            FoodCategory::Carbs => "carbs",
            FoodCategory::Vegetables => "vegetables",
            FoodCategory::Fruits => "fruits",
            FoodCategory::Snacks => "snacks",
        }
    }
}

/// A single food entry on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub calories: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<u32>,
}

impl FoodItem {
    /// Creates a food item with no per-item macro data.
    pub fn new(name: impl Into<String>, calories: u32) -> Self {
        Self {
            name: name.into(),
            calories,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
        }
    }

    /// Creates a food item with per-item macros.
    pub fn with_macros(
        name: impl Into<String>,
        calories: u32,
        protein_g: u32,
        carbs_g: u32,
        fat_g: u32,
    ) -> Self {
        Self {
            name: name.into(),
            calories,
            protein_g: Some(protein_g),
            carbs_g: Some(carbs_g),
            fat_g: Some(fat_g),
        }
    }
}

/// Canonical metric profile produced by the normalizer.
///
/// Height and weight are always metric here; unit conversion happens exactly
/// once, inside `normalize::normalize`. Every downstream calculation consumes
/// this struct unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub daily_steps: u32,
    pub exercise_frequency: ExerciseFrequency,
    pub exercise_duration_minutes: u32,
    pub exercise_intensity: ExerciseIntensity,
    pub primary_goal: Goal,
    #[serde(default)]
    pub health_flags: Vec<String>,
}

impl UserProfile {
    /// True if any health flag contains the given substring (lowercase match).
    pub fn has_health_flag(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.health_flags
            .iter()
            .any(|f| f.to_lowercase().contains(&needle))
    }

    /// Body Mass Index, kg / m².
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }
}
