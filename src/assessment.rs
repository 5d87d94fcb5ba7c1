//! Assessment flow orchestration.
//!
//! Holds the ordered intake questions, the per-conversation session state,
//! and the composition of the full calculation pipeline (normalize ->
//! energy -> goal adjustment -> macros -> meal plan) into one report.

use rand::Rng;
use serde::Serialize;

use crate::domain::UserProfile;
use crate::energy::{EnergyBreakdown, TdeeFormula, compute_energy};
use crate::foods::FoodDatabase;
use crate::normalize::{RawAnswers, normalize};
use crate::plan::{FoodPreferences, MealPlan, build_meal_plan};
use crate::targets::{MacroTargets, adjust_for_goal, split_macros};

/// The intake questions, in conversation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Age,
    Gender,
    Height,
    Weight,
    Steps,
    ExerciseFrequency,
    ExerciseDuration,
    ExerciseIntensity,
    Goal,
    HealthConditions,
}

impl Question {
    /// The first question of the flow.
    pub fn first() -> Question {
        Question::Age
    }

    /// The question after this one, or None at the end of the flow.
    pub fn next(self) -> Option<Question> {
        match self {
            Question::Age => Some(Question::Gender),
            Question::Gender => Some(Question::Height),
            Question::Height => Some(Question::Weight),
            Question::Weight => Some(Question::Steps),
            Question::Steps => Some(Question::ExerciseFrequency),
            Question::ExerciseFrequency => Some(Question::ExerciseDuration),
            Question::ExerciseDuration => Some(Question::ExerciseIntensity),
            Question::ExerciseIntensity => Some(Question::Goal),
            Question::Goal => Some(Question::HealthConditions),
            Question::HealthConditions => None,
        }
    }

    /// The text shown to the user for this question.
    pub fn prompt(self) -> &'static str {
        match self {
            Question::Age => "How old are you?",
            Question::Gender => "What is your gender? (male / female / prefer not to say)",
            Question::Height => "How tall are you? (e.g. 178 cm or 5 ft 10)",
            Question::Weight => "What is your current weight? (kg or lb; you can skip this)",
            Question::Steps => "Roughly how many steps do you take per day?",
            Question::ExerciseFrequency => "How often do you exercise per week?",
            Question::ExerciseDuration => "How long is a typical workout, in minutes?",
            Question::ExerciseIntensity => "How intense are your workouts? (light / moderate / high)",
            Question::Goal => "What is your primary goal?",
            Question::HealthConditions => {
                "Any health conditions I should know about? (e.g. NAFLD; say 'none' if not)"
            }
        }
    }
}

/// One conversation's assessment state.
///
/// Raw answers accumulate as free text; nothing is parsed until the flow
/// completes and the normalizer runs once over all of them. Sessions live
/// in memory only.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    answers: RawAnswers,
    current: Option<Question>,
}

impl AssessmentSession {
    /// Starts a new session at the first question.
    pub fn new() -> Self {
        Self {
            answers: RawAnswers::default(),
            current: Some(Question::first()),
        }
    }

    /// The question currently awaiting an answer.
    pub fn current_question(&self) -> Option<Question> {
        self.current
    }

    /// True once every question has been answered.
    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    /// Records an answer to the current question and advances the flow.
    ///
    /// Returns the next question, or None when the flow just completed.
    /// Answers after completion are ignored.
    pub fn record_answer(&mut self, text: &str) -> Option<Question> {
        let Some(question) = self.current else {
            return None;
        };

        let value = Some(text.trim().to_string());
        match question {
            Question::Age => self.answers.age = value,
            Question::Gender => self.answers.gender = value,
            Question::Height => self.answers.height = value,
            Question::Weight => self.answers.weight = value,
            Question::Steps => self.answers.steps = value,
            Question::ExerciseFrequency => self.answers.exercise_frequency = value,
            Question::ExerciseDuration => self.answers.exercise_duration = value,
            Question::ExerciseIntensity => self.answers.exercise_intensity = value,
            Question::Goal => self.answers.goal = value,
            Question::HealthConditions => self.answers.health_conditions = value,
        }

        self.current = question.next();
        self.current
    }

    /// Normalizes the collected answers into a profile.
    ///
    /// Callable at any point; unanswered questions get their defaults.
    pub fn profile(&self) -> UserProfile {
        normalize(&self.answers)
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

/// The composed pipeline output for one profile.
#[derive(Debug, Clone, Serialize)]
pub struct NutritionReport {
    pub profile: UserProfile,
    pub formula: TdeeFormula,
    pub energy: EnergyBreakdown,
    pub target_calories: i32,
    pub macros: MacroTargets,
    pub plan: MealPlan,
}

/// Runs the full pipeline for a profile.
///
/// Each stage consumes only the previous stage's output plus the profile,
/// in the fixed order: energy -> goal adjustment -> macros -> meal plan.
pub fn build_report(
    profile: UserProfile,
    formula: TdeeFormula,
    prefs: Option<&FoodPreferences>,
    db: &FoodDatabase,
    rng: &mut impl Rng,
) -> NutritionReport {
    let energy = compute_energy(&profile, formula);
    let target_calories = adjust_for_goal(energy.tdee, profile.primary_goal);
    let macros = split_macros(target_calories, profile.primary_goal);
    let plan = build_meal_plan(target_calories, prefs, db, rng);

    NutritionReport {
        profile,
        formula,
        energy,
        target_calories,
        macros,
        plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::domain::{ExerciseFrequency, Gender, Goal};

    #[test]
    fn test_question_sequence_covers_all_fields() {
        let mut count = 1;
        let mut q = Question::first();
        while let Some(next) = q.next() {
            q = next;
            count += 1;
        }
        assert_eq!(count, 10);
        assert_eq!(q, Question::HealthConditions);
    }

    #[test]
    fn test_session_walkthrough() {
        let mut session = AssessmentSession::new();
        assert_eq!(session.current_question(), Some(Question::Age));

        let answers = [
            "39",
            "male",
            "178",
            "81",
            "10000",
            "5-6",
            "45",
            "moderate",
            "lose weight",
            "none",
        ];
        for answer in answers {
            assert!(!session.is_complete());
            session.record_answer(answer);
        }
        assert!(session.is_complete());

        let profile = session.profile();
        assert_eq!(profile.age, 39);
        assert_eq!(profile.gender, Gender::Male);
        assert_eq!(profile.exercise_frequency, ExerciseFrequency::FiveToSix);
        assert_eq!(profile.primary_goal, Goal::LoseWeight);
    }

    #[test]
    fn test_session_answers_after_completion_ignored() {
        let mut session = AssessmentSession::new();
        for _ in 0..10 {
            session.record_answer("whatever");
        }
        assert!(session.is_complete());
        assert_eq!(session.record_answer("extra"), None);
    }

    #[test]
    fn test_partial_session_uses_defaults() {
        let mut session = AssessmentSession::new();
        session.record_answer("45"); // age only
        let profile = session.profile();
        assert_eq!(profile.age, 45);
        assert_eq!(profile.height_cm, 170.0);
    }

    #[test]
    fn test_report_end_to_end_scenario() {
        // The reference scenario from end to end: 39y male, 178 cm, 81 kg,
        // 10k steps, 5-6x moderate 45 min, losing weight.
        let profile = UserProfile {
            age: 39,
            gender: Gender::Male,
            height_cm: 178.0,
            weight_kg: 81.0,
            daily_steps: 10000,
            exercise_frequency: ExerciseFrequency::FiveToSix,
            exercise_duration_minutes: 45,
            exercise_intensity: crate::domain::ExerciseIntensity::Moderate,
            primary_goal: Goal::LoseWeight,
            health_flags: Vec::new(),
        };

        let db = FoodDatabase::default();
        let mut rng = StdRng::seed_from_u64(1);
        let report = build_report(profile, TdeeFormula::Detailed, None, &db, &mut rng);

        assert_eq!(report.energy.bmr, 1733);
        assert_eq!(report.energy.tdee, 2778);
        assert_eq!(report.target_calories, 2278);
        assert_eq!(report.macros.protein_g, 171);
        assert_eq!(report.macros.carbs_g, 199);
        assert_eq!(report.macros.fat_g, 89);
        assert_eq!(report.plan.total_calories(), 2278);
    }
}
