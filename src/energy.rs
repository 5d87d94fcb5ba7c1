//! Energy expenditure calculations: Mifflin-St Jeor BMR and TDEE.
//!
//! Two TDEE formulas exist in the wild for this assessment flow and they do
//! not agree. `TdeeFormula::Detailed` sums the explicit components (BMR +
//! NEAT + TEF + steps + exercise) and is the default; the legacy
//! `ActivityMultiplier` form scales BMR by an activity factor and adds step
//! calories. The choice is surfaced as configuration, never mixed.

use std::str::FromStr;

use serde::Serialize;

use crate::domain::{ExerciseFrequency, Gender, UserProfile};
use crate::error::UnrecognizedValue;

// === Constants ===

/// Calories burned per step.
pub const KCAL_PER_STEP: f64 = 0.04;

/// NEAT (non-exercise activity thermogenesis) as a fraction of BMR.
pub const NEAT_FRACTION: f64 = 0.15;

/// TEF (thermic effect of food) as a fraction of BMR.
pub const TEF_FRACTION: f64 = 0.10;

/// Activity factor pieces for the legacy multiplier formula.
mod activity {
    /// Sedentary base multiplier.
    pub const BASE: f64 = 1.2;
}

/// Which TDEE formula to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TdeeFormula {
    /// BMR + NEAT + TEF + step calories + exercise calories.
    Detailed,
    /// BMR x activity multiplier + step calories. Ignores NEAT, TEF and the
    /// per-session exercise estimate.
    ActivityMultiplier,
}

impl FromStr for TdeeFormula {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detailed" => Ok(TdeeFormula::Detailed),
            "activity-multiplier" | "activity_multiplier" | "multiplier" => {
                Ok(TdeeFormula::ActivityMultiplier)
            }
            _ => Err(UnrecognizedValue {
                field: "tdee formula",
                value: s.to_string(),
            }),
        }
    }
}

/// Daily energy expenditure, decomposed. All values are kcal/day integers.
///
/// Immutable once computed: edits to the profile recompute the whole
/// breakdown rather than patching fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnergyBreakdown {
    pub bmr: i32,
    pub neat: i32,
    pub tef: i32,
    pub step_calories: i32,
    pub exercise_calories: i32,
    pub tdee: i32,
}

/// Calculates basal metabolic rate via Mifflin-St Jeor.
///
/// `male: 10w + 6.25h - 5a + 5`; `female/other: 10w + 6.25h - 5a - 161`.
/// Rounded to the nearest kcal.
pub fn calculate_bmr(profile: &UserProfile) -> i32 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    let adjusted = match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Unspecified => base - 161.0,
    };
    adjusted.round() as i32
}

/// Calories burned by daily steps: `round(steps * 0.04)`.
pub fn calculate_step_calories(daily_steps: u32) -> i32 {
    (f64::from(daily_steps) * KCAL_PER_STEP).round() as i32
}

/// Daily average calories burned by deliberate exercise.
///
/// Weekly sessions x session duration x intensity kcal/minute, divided by 7.
pub fn calculate_exercise_calories(profile: &UserProfile) -> i32 {
    let weekly = profile.exercise_frequency.sessions_per_week()
        * f64::from(profile.exercise_duration_minutes)
        * profile.exercise_intensity.kcal_per_minute();
    (weekly / 7.0).round() as i32
}

/// Activity multiplier for the legacy formula: 1.2 base plus a bonus per
/// exercise-frequency bucket (daily caps at +0.55).
pub fn activity_multiplier(frequency: ExerciseFrequency) -> f64 {
    let bonus = match frequency {
        ExerciseFrequency::Never => 0.0,
        ExerciseFrequency::OneToTwo => 0.15,
        ExerciseFrequency::ThreeToFour => 0.30,
        ExerciseFrequency::FiveToSix => 0.45,
        ExerciseFrequency::Daily => 0.55,
    };
    activity::BASE + bonus
}

/// Computes the full energy breakdown for a profile.
///
/// All component fields are always populated; only the `tdee` sum depends
/// on the chosen formula.
pub fn compute_energy(profile: &UserProfile, formula: TdeeFormula) -> EnergyBreakdown {
    let bmr = calculate_bmr(profile);
    let neat = (f64::from(bmr) * NEAT_FRACTION).round() as i32;
    let tef = (f64::from(bmr) * TEF_FRACTION).round() as i32;
    let step_calories = calculate_step_calories(profile.daily_steps);
    let exercise_calories = calculate_exercise_calories(profile);

    let tdee = match formula {
        TdeeFormula::Detailed => bmr + neat + tef + step_calories + exercise_calories,
        TdeeFormula::ActivityMultiplier => {
            (f64::from(bmr) * activity_multiplier(profile.exercise_frequency)).round() as i32
                + step_calories
        }
    };

    EnergyBreakdown {
        bmr,
        neat,
        tef,
        step_calories,
        exercise_calories,
        tdee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExerciseIntensity, Goal};

    fn profile(gender: Gender, weight_kg: f64) -> UserProfile {
        UserProfile {
            age: 39,
            gender,
            height_cm: 178.0,
            weight_kg,
            daily_steps: 10000,
            exercise_frequency: ExerciseFrequency::FiveToSix,
            exercise_duration_minutes: 45,
            exercise_intensity: ExerciseIntensity::Moderate,
            primary_goal: Goal::LoseWeight,
            health_flags: Vec::new(),
        }
    }

    #[test]
    fn test_bmr_male() {
        // 10*81 + 6.25*178 - 5*39 + 5 = 810 + 1112.5 - 195 + 5 = 1732.5 -> 1733
        assert_eq!(calculate_bmr(&profile(Gender::Male, 81.0)), 1733);
    }

    #[test]
    fn test_bmr_female_branch() {
        // 10*81 + 6.25*178 - 5*39 - 161 = 1566.5 -> 1567 (f64 rounds half away from zero)
        assert_eq!(calculate_bmr(&profile(Gender::Female, 81.0)), 1567);
        // Unspecified uses the female constant.
        assert_eq!(
            calculate_bmr(&profile(Gender::Unspecified, 81.0)),
            calculate_bmr(&profile(Gender::Female, 81.0))
        );
    }

    #[test]
    fn test_bmr_monotonic_in_weight() {
        for gender in [Gender::Male, Gender::Female] {
            let mut previous = calculate_bmr(&profile(gender, 50.0));
            for w in 51..=120 {
                let bmr = calculate_bmr(&profile(gender, f64::from(w)));
                assert!(bmr > previous, "BMR must increase with weight ({gender:?}, {w}kg)");
                previous = bmr;
            }
        }
    }

    #[test]
    fn test_step_calories() {
        assert_eq!(calculate_step_calories(10000), 400);
        assert_eq!(calculate_step_calories(0), 0);
        // 7321 * 0.04 = 292.84 -> 293
        assert_eq!(calculate_step_calories(7321), 293);
    }

    #[test]
    fn test_exercise_calories() {
        // 5.5 sessions * 45 min * 6 kcal/min / 7 = 212.14 -> 212
        assert_eq!(calculate_exercise_calories(&profile(Gender::Male, 81.0)), 212);

        let mut never = profile(Gender::Male, 81.0);
        never.exercise_frequency = ExerciseFrequency::Never;
        assert_eq!(calculate_exercise_calories(&never), 0);
    }

    #[test]
    fn test_detailed_breakdown_scenario() {
        // Reference scenario: 39y male, 178cm, 81kg, 10k steps, 5-6x moderate 45min.
        let breakdown = compute_energy(&profile(Gender::Male, 81.0), TdeeFormula::Detailed);
        assert_eq!(breakdown.bmr, 1733);
        assert_eq!(breakdown.neat, 260);
        assert_eq!(breakdown.tef, 173);
        assert_eq!(breakdown.step_calories, 400);
        assert_eq!(breakdown.exercise_calories, 212);
        assert_eq!(breakdown.tdee, 2778);
    }

    #[test]
    fn test_activity_multiplier_ladder() {
        assert_eq!(activity_multiplier(ExerciseFrequency::Never), 1.2);
        assert_eq!(activity_multiplier(ExerciseFrequency::Daily), 1.75);

        // Strictly increasing across buckets.
        let values: Vec<f64> = ExerciseFrequency::all()
            .iter()
            .map(|f| activity_multiplier(*f))
            .collect();
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_multiplier_formula_ignores_components() {
        let breakdown =
            compute_energy(&profile(Gender::Male, 81.0), TdeeFormula::ActivityMultiplier);
        // 1733 * (1.2 + 0.45) + 400 = 2859.45 -> 2859 + 400
        assert_eq!(breakdown.tdee, 2859 + 400);
        // Components are still reported for display.
        assert_eq!(breakdown.neat, 260);
        assert_eq!(breakdown.exercise_calories, 212);
    }

    #[test]
    fn test_formulas_diverge() {
        let detailed = compute_energy(&profile(Gender::Male, 81.0), TdeeFormula::Detailed);
        let multiplier =
            compute_energy(&profile(Gender::Male, 81.0), TdeeFormula::ActivityMultiplier);
        assert_ne!(detailed.tdee, multiplier.tdee);
    }

    #[test]
    fn test_formula_from_str() {
        assert_eq!(TdeeFormula::from_str("detailed").unwrap(), TdeeFormula::Detailed);
        assert_eq!(
            TdeeFormula::from_str("activity-multiplier").unwrap(),
            TdeeFormula::ActivityMultiplier
        );
        assert!(TdeeFormula::from_str("average-of-both").is_err());
    }
}
