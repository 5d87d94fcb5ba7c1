//! Profile normalization: free-form assessment answers to a canonical
//! metric [`UserProfile`].
//!
//! The intake is conversational, so every parser here is best-effort: an
//! answer that cannot be understood is replaced by its documented default
//! rather than rejected. Unit conversion to metric happens exactly once, in
//! this module. Downstream calculations never see raw answers.

use std::str::FromStr;

use serde::Deserialize;

use crate::domain::{ExerciseFrequency, ExerciseIntensity, Gender, Goal, UserProfile};

// === Conversion constants ===

/// Centimeters per foot.
pub const CM_PER_FOOT: f64 = 30.48;

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Kilograms per pound.
pub const KG_PER_LB: f64 = 0.453592;

/// Midpoint of the normal BMI range, used to estimate a declined weight.
pub const BMI_MIDPOINT: f64 = 22.5;

// === Defaults for unparseable answers ===

const DEFAULT_HEIGHT_CM: f64 = 170.0;
const DEFAULT_AGE: u32 = 35;
const DEFAULT_EXERCISE_DURATION_MIN: u32 = 45;

/// Raw assessment answers as collected by the chat flow.
///
/// Every field is optional free text; `None` and unparseable text both fall
/// back to the same documented defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnswers {
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub steps: Option<String>,
    #[serde(default)]
    pub exercise_frequency: Option<String>,
    #[serde(default)]
    pub exercise_duration: Option<String>,
    #[serde(default)]
    pub exercise_intensity: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub health_conditions: Option<String>,
}

/// Converts raw answers into a canonical metric profile.
///
/// Never fails: each field that cannot be parsed gets its documented
/// default (height 170 cm, age 35, weight estimated from BMI 22.5, steps 0,
/// exercise 3-4x/week at moderate intensity for 45 minutes).
pub fn normalize(raw: &RawAnswers) -> UserProfile {
    let health_flags = parse_health_flags(raw.health_conditions.as_deref());

    let height_cm = parse_height_cm(raw.height.as_deref());
    let weight_kg = parse_weight_kg(raw.weight.as_deref(), height_cm);

    UserProfile {
        age: parse_age(raw.age.as_deref()),
        gender: parse_gender(raw.gender.as_deref()),
        height_cm,
        weight_kg,
        daily_steps: parse_steps(raw.steps.as_deref()),
        exercise_frequency: parse_exercise_frequency(raw.exercise_frequency.as_deref()),
        exercise_duration_minutes: parse_exercise_duration(raw.exercise_duration.as_deref()),
        exercise_intensity: parse_exercise_intensity(raw.exercise_intensity.as_deref()),
        primary_goal: classify_goal(raw.goal.as_deref(), &health_flags),
        health_flags,
    }
}

/// Extracts all unsigned integer runs from text, in order.
///
/// Thousands separators inside a run are swallowed, so "10,000 steps"
/// yields [10000].
fn extract_integers(text: &str) -> Vec<u32> {
    let mut numbers = Vec::new();
    let mut current = String::new();

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if c == ',' && !current.is_empty() && chars.peek().is_some_and(|n| n.is_ascii_digit())
        {
            // thousands separator
        } else if !current.is_empty() {
            if let Ok(n) = current.parse() {
                numbers.push(n);
            }
            current.clear();
        }
    }
    if !current.is_empty()
        && let Ok(n) = current.parse()
    {
        numbers.push(n);
    }

    numbers
}

/// Parses a height answer into centimeters.
///
/// Imperial answers ("5 ft 10", "5'10\"") read the first number as feet and
/// the second as inches: `cm = round(feet * 30.48 + inches * 2.54)`. Metric
/// answers pass through as an integer. Unparseable input defaults to 170 cm.
pub fn parse_height_cm(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return DEFAULT_HEIGHT_CM;
    };
    let lower = text.to_lowercase();
    let numbers = extract_integers(&lower);

    if numbers.is_empty() {
        return DEFAULT_HEIGHT_CM;
    }

    let imperial = lower.contains("ft")
        || lower.contains("feet")
        || lower.contains("foot")
        || lower.contains('\'');

    if imperial {
        let feet = f64::from(numbers[0]);
        let inches = numbers.get(1).copied().map_or(0.0, f64::from);
        (feet * CM_PER_FOOT + inches * CM_PER_INCH).round()
    } else {
        f64::from(numbers[0])
    }
}

/// Parses a weight answer into kilograms.
///
/// Pound answers convert at 0.453592 kg/lb. A declined or unparseable
/// answer is estimated from height via the BMI midpoint:
/// `kg = round(22.5 * (height_m)^2)`.
pub fn parse_weight_kg(text: Option<&str>, height_cm: f64) -> f64 {
    let estimate = || {
        let height_m = height_cm / 100.0;
        (BMI_MIDPOINT * height_m * height_m).round()
    };

    let Some(text) = text else {
        return estimate();
    };
    let lower = text.to_lowercase();
    let numbers = extract_integers(&lower);

    let Some(&value) = numbers.first() else {
        return estimate();
    };

    if lower.contains("lb") || lower.contains("pound") {
        (f64::from(value) * KG_PER_LB).round()
    } else {
        f64::from(value)
    }
}

/// Parses an age answer.
///
/// Accepts exact integers and fuzzy decade phrases: "early 40s" -> 42,
/// "mid 30s" -> 35, "late 20s" -> 28. Unparseable input defaults to 35;
/// values outside (0, 120) are treated as unparseable.
pub fn parse_age(text: Option<&str>) -> u32 {
    let Some(text) = text else {
        return DEFAULT_AGE;
    };
    let lower = text.to_lowercase();
    let numbers = extract_integers(&lower);

    let Some(&value) = numbers.first() else {
        return DEFAULT_AGE;
    };

    // Decade phrase: the number is the decade, the era word is the offset.
    let age = if lower.contains(&format!("{value}s")) && value % 10 == 0 {
        let offset = if lower.contains("early") {
            2
        } else if lower.contains("late") {
            8
        } else {
            5
        };
        value + offset
    } else {
        value
    };

    if age == 0 || age >= 120 { DEFAULT_AGE } else { age }
}

fn parse_gender(text: Option<&str>) -> Gender {
    text.and_then(|t| Gender::from_str(t).ok())
        .unwrap_or(Gender::Unspecified)
}

/// Parses a daily-step answer.
///
/// Reads the first digit run; non-numeric or absent input defaults to 0.
/// An answer mentioning "sit" forces 0 regardless of any digits, since a
/// self-described sitter belongs in the sedentary bucket.
pub fn parse_steps(text: Option<&str>) -> u32 {
    let Some(text) = text else {
        return 0;
    };
    let lower = text.to_lowercase();

    if lower.contains("sit") {
        return 0;
    }

    extract_integers(&lower).first().copied().unwrap_or(0)
}

/// Classifies an exercise-frequency answer.
///
/// Canonical bucket tokens are accepted directly; free text falls through
/// keyword matching, with 3-4x/week as the catch-all default.
pub fn parse_exercise_frequency(text: Option<&str>) -> ExerciseFrequency {
    let Some(text) = text else {
        return ExerciseFrequency::ThreeToFour;
    };
    let lower = text.trim().to_lowercase();

    // Exact bucket tokens from choice-based answers.
    match lower.as_str() {
        "never" => return ExerciseFrequency::Never,
        "1-2" => return ExerciseFrequency::OneToTwo,
        "3-4" => return ExerciseFrequency::ThreeToFour,
        "5-6" => return ExerciseFrequency::FiveToSix,
        "daily" => return ExerciseFrequency::Daily,
        _ => {}
    }

    if lower.contains("daily") || lower.contains("every day") || lower.contains('7') {
        ExerciseFrequency::Daily
    } else if lower.contains('5') || lower.contains('6') {
        ExerciseFrequency::FiveToSix
    } else if lower.contains('3') || lower.contains('4') {
        ExerciseFrequency::ThreeToFour
    } else if lower.contains('1') || lower.contains('2') || lower.contains("twice") {
        ExerciseFrequency::OneToTwo
    } else {
        ExerciseFrequency::ThreeToFour
    }
}

/// Parses an exercise-duration answer in minutes. Defaults to 45.
pub fn parse_exercise_duration(text: Option<&str>) -> u32 {
    text.and_then(|t| extract_integers(t).first().copied())
        .filter(|&d| d > 0)
        .unwrap_or(DEFAULT_EXERCISE_DURATION_MIN)
}

/// Classifies an exercise-intensity answer. Defaults to moderate.
pub fn parse_exercise_intensity(text: Option<&str>) -> ExerciseIntensity {
    let Some(text) = text else {
        return ExerciseIntensity::Moderate;
    };
    let lower = text.to_lowercase();

    if lower.contains("high") || lower.contains("hard") || lower.contains("intense") {
        ExerciseIntensity::High
    } else if lower.contains("light") || lower.contains("easy") || lower.contains("gentle") {
        ExerciseIntensity::Light
    } else {
        ExerciseIntensity::Moderate
    }
}

/// Classifies a goal answer.
///
/// Canonical goal tokens are accepted directly; free text falls through
/// keyword matching. With no usable answer, a NAFLD health flag implies
/// weight loss, otherwise the goal is maintenance.
pub fn classify_goal(text: Option<&str>, health_flags: &[String]) -> Goal {
    let fallback = || {
        let nafld = health_flags.iter().any(|f| {
            let f = f.to_lowercase();
            f.contains("nafld") || f.contains("fatty liver")
        });
        if nafld { Goal::LoseWeight } else { Goal::Maintain }
    };

    let Some(text) = text else {
        return fallback();
    };

    if let Ok(goal) = Goal::from_str(text) {
        return goal;
    }

    let lower = text.to_lowercase();
    if lower.contains("lose") || lower.contains("nafld") || lower.contains("fatty liver") {
        Goal::LoseWeight
    } else if lower.contains("gain muscle") || lower.contains("build") {
        Goal::GainMuscle
    } else if lower.contains("gain weight") {
        Goal::GainWeight
    } else if lower.contains("maintain") {
        Goal::Maintain
    } else {
        fallback()
    }
}

/// Splits a health-conditions answer into individual flags.
///
/// Flags are kept verbatim (minus surrounding whitespace); matching against
/// them is substring-based, so no canonicalization is needed here. Negative
/// answers produce no flags.
pub fn parse_health_flags(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    let lower = text.trim().to_lowercase();
    if lower.is_empty() || lower == "no" || lower == "none" || lower == "nothing" || lower == "n/a"
    {
        return Vec::new();
    }

    text.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
