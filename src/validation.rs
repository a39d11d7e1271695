// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Schema validation for form input.
//!
//! Forms arrive loosely typed (numbers may be sent as strings, optional text may
//! be empty). Validation happens in two steps:
//! 1. Coerce each raw field into its typed form, collecting per-field errors
//! 2. Run the `validator` range/length rules declared on the typed model
//!
//! Nothing here performs I/O, so a rejected form never reaches the model or
//! the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use validator::Validate;

use crate::models::{ActivityLevel, Gender, ProfileInput, ProgressLogEntry, ProgressReport};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_FORMAT_MESSAGE: &str = "Date must be in YYYY-MM-DD format.";

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON field name (camelCase)
    pub field: String,
    pub message: String,
}

/// Input rejected before any external call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Error for a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    /// Whether the given field was rejected.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(name, errs)| {
                let field = camel_case(&name);
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", e.code)),
                })
            })
            .collect();
        // HashMap order is random; keep responses stable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self { fields }
    }
}

/// Convert a Rust field name to the JSON name the client sent.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ─── Raw Forms ───────────────────────────────────────────────

/// Profile form as posted by the client. Every field is optional at this
/// stage so missing or mistyped values become field errors, not a rejected body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub age: Option<Value>,
    pub height: Option<Value>,
    pub weight: Option<Value>,
    pub gender: Option<Value>,
    pub activity_level: Option<Value>,
    pub preferred_cuisine: Option<Value>,
    pub diet_preferences: Option<Value>,
    pub health_goals: Option<Value>,
    pub health_issues: Option<Value>,
}

/// Progress report form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportForm {
    #[serde(default)]
    pub report: Option<Value>,
}

/// Daily progress log form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLogForm {
    pub date: Option<Value>,
    pub weight: Option<Value>,
    pub workout_completed: Option<Value>,
    pub arm_circumference: Option<Value>,
    pub chest_circumference: Option<Value>,
    pub waist_circumference: Option<Value>,
    pub workout_summary: Option<Value>,
    pub mood: Option<Value>,
    pub notes: Option<Value>,
}

// ─── Validators ──────────────────────────────────────────────

/// Validate a profile form into a typed, range-checked profile.
pub fn validate_profile(form: &ProfileForm) -> Result<ProfileInput, ValidationError> {
    let mut errors = Vec::new();

    let age = whole_number("age", form.age.as_ref(), &mut errors);
    let height = number("height", form.height.as_ref(), &mut errors);
    let weight = number("weight", form.weight.as_ref(), &mut errors);
    let gender = choice("gender", form.gender.as_ref(), &Gender::ALL, Gender::as_str, &mut errors);
    let activity_level = choice(
        "activityLevel",
        form.activity_level.as_ref(),
        &ActivityLevel::ALL,
        ActivityLevel::as_str,
        &mut errors,
    );
    let preferred_cuisine = text("preferredCuisine", form.preferred_cuisine.as_ref(), &mut errors);
    let diet_preferences = text("dietPreferences", form.diet_preferences.as_ref(), &mut errors);
    let health_goals = text("healthGoals", form.health_goals.as_ref(), &mut errors);
    let health_issues = optional_text("healthIssues", form.health_issues.as_ref(), &mut errors);

    // Fields that failed coercion hold placeholders here; their range errors
    // are dropped below so each field reports one problem.
    let profile = ProfileInput {
        age: age.unwrap_or_default(),
        height: height.unwrap_or_default(),
        weight: weight.unwrap_or_default(),
        gender: gender.unwrap_or(Gender::Male),
        activity_level: activity_level.unwrap_or(ActivityLevel::Sedentary),
        preferred_cuisine: preferred_cuisine.unwrap_or_default(),
        diet_preferences: diet_preferences.unwrap_or_default(),
        health_goals: health_goals.unwrap_or_default(),
        health_issues,
    };

    if let Err(e) = profile.validate() {
        let range_errors = ValidationError::from(e);
        for err in range_errors.fields {
            if !errors.iter().any(|f| f.field == err.field) {
                errors.push(err);
            }
        }
    }

    if !errors.is_empty() {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(ValidationError { fields: errors });
    }

    Ok(profile)
}

/// Validate a free-text progress report.
pub fn validate_report(form: &ReportForm) -> Result<ProgressReport, ValidationError> {
    let report = match form.report.as_ref() {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(ValidationError::field("report", "must be text")),
    };

    let report = ProgressReport { report };
    report.validate()?;
    Ok(report)
}

/// Validate a daily progress log form.
pub fn validate_progress_log(form: &ProgressLogForm) -> Result<ProgressLogEntry, ValidationError> {
    let mut errors = Vec::new();

    let date = match form.date.as_ref() {
        Some(Value::String(s)) => match parse_log_date(s) {
            Ok(date) => Some(date),
            Err(e) => {
                errors.extend(e.fields);
                None
            }
        },
        _ => {
            push(&mut errors, "date", DATE_FORMAT_MESSAGE);
            None
        }
    };

    let weight = optional_number("weight", form.weight.as_ref(), &mut errors);
    let workout_completed = match form.workout_completed.as_ref() {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            push(&mut errors, "workoutCompleted", "must be true or false");
            None
        }
    };
    let arm_circumference =
        optional_number("armCircumference", form.arm_circumference.as_ref(), &mut errors);
    let chest_circumference =
        optional_number("chestCircumference", form.chest_circumference.as_ref(), &mut errors);
    let waist_circumference =
        optional_number("waistCircumference", form.waist_circumference.as_ref(), &mut errors);
    let workout_summary =
        optional_text("workoutSummary", form.workout_summary.as_ref(), &mut errors);
    let mood = optional_text("mood", form.mood.as_ref(), &mut errors);
    let notes = optional_text("notes", form.notes.as_ref(), &mut errors);

    // A bad date still lets the measurement rules run against the rest.
    let entry = ProgressLogEntry {
        date: date.unwrap_or_default(),
        weight,
        workout_completed,
        arm_circumference,
        chest_circumference,
        waist_circumference,
        workout_summary,
        mood,
        notes,
    };

    if let Err(e) = entry.validate() {
        let range_errors = ValidationError::from(e);
        for err in range_errors.fields {
            if !errors.iter().any(|f| f.field == err.field) {
                errors.push(err);
            }
        }
    }

    if !errors.is_empty() {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(ValidationError { fields: errors });
    }

    Ok(entry)
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_log_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(ValidationError::field("date", DATE_FORMAT_MESSAGE));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::field("date", DATE_FORMAT_MESSAGE))
}

/// Format a date the way it is accepted.
pub fn format_log_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ─── Coercion Helpers ────────────────────────────────────────

fn push(errors: &mut Vec<FieldError>, field: &str, message: &str) {
    errors.push(FieldError {
        field: field.to_string(),
        message: message.to_string(),
    });
}

/// Read a number, accepting numeric strings. `Ok(None)` means absent.
fn coerce_number(value: Option<&Value>) -> Result<Option<f64>, &'static str> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or("must be a number")
}

fn number(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<f64> {
    match coerce_number(value) {
        Ok(Some(v)) => Some(v),
        Ok(None) => {
            push(errors, field, "is required");
            None
        }
        Err(msg) => {
            push(errors, field, msg);
            None
        }
    }
}

fn optional_number(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<f64> {
    coerce_number(value).unwrap_or_else(|msg| {
        push(errors, field, msg);
        None
    })
}

/// Whole numbers only. Negative or huge values saturate so the range rule
/// reports them.
fn whole_number(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<u32> {
    let v = number(field, value, errors)?;
    if v.fract() != 0.0 {
        push(errors, field, "must be a whole number");
        return None;
    }
    Some(v.clamp(0.0, u32::MAX as f64) as u32)
}

fn choice<T: Copy>(
    field: &str,
    value: Option<&Value>,
    options: &[T],
    name: fn(&T) -> &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let found = match value {
        Some(Value::String(s)) => options.iter().find(|o| name(*o) == s.trim()).copied(),
        _ => None,
    };

    if found.is_none() {
        let allowed: Vec<&str> = options.iter().map(name).collect();
        errors.push(FieldError {
            field: field.to_string(),
            message: format!("must be one of: {}", allowed.join(", ")),
        });
    }
    found
}

/// Required text, trimmed. Emptiness is left to the length rule.
fn text(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            push(errors, field, "must be text");
            None
        }
    }
}

/// Optional text, trimmed; empty means absent.
fn optional_text(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(_) => {
            push(errors, field, "must be text");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(value: Value) -> ProfileForm {
        serde_json::from_value(value).unwrap()
    }

    fn valid_form() -> Value {
        json!({
            "age": 30,
            "height": 175,
            "weight": 70,
            "gender": "male",
            "activityLevel": "moderatelyActive",
            "preferredCuisine": "Italian",
            "dietPreferences": "none",
            "healthGoals": "lose 5kg"
        })
    }

    fn with(field: &str, value: Value) -> ProfileForm {
        let mut raw = valid_form();
        raw[field] = value;
        form(raw)
    }

    #[test]
    fn test_valid_profile() {
        let profile = validate_profile(&form(valid_form())).unwrap();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.height, 175.0);
        assert_eq!(profile.gender, Gender::Male);
        assert_eq!(profile.activity_level, ActivityLevel::ModeratelyActive);
        assert_eq!(profile.health_issues, None);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let mut raw = valid_form();
        raw["age"] = json!("30");
        raw["height"] = json!(" 180.5 ");
        raw["weight"] = json!("72");

        let profile = validate_profile(&form(raw)).unwrap();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.height, 180.5);
        assert_eq!(profile.weight, 72.0);
    }

    #[test]
    fn test_out_of_range_values_are_field_scoped() {
        let cases = [
            ("age", json!(0)),
            ("age", json!(121)),
            ("age", json!(-4)),
            ("height", json!(49.9)),
            ("height", json!(300.1)),
            ("weight", json!(9)),
            ("weight", json!(501)),
        ];

        for (field, value) in cases {
            let err = validate_profile(&with(field, value.clone())).unwrap_err();
            assert_eq!(err.fields.len(), 1, "{field}={value}: {err}");
            assert!(err.has_field(field), "{field}={value}: {err}");
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut raw = valid_form();
        raw["age"] = json!(120);
        raw["height"] = json!(50);
        raw["weight"] = json!(500);
        assert!(validate_profile(&form(raw)).is_ok());
    }

    #[test]
    fn test_non_numeric_and_fractional_age() {
        let err = validate_profile(&with("age", json!("thirty"))).unwrap_err();
        assert_eq!(err.fields[0].message, "must be a number");

        let err = validate_profile(&with("age", json!(30.5))).unwrap_err();
        assert_eq!(err.fields[0].message, "must be a whole number");

        let err = validate_profile(&with("weight", json!(true))).unwrap_err();
        assert!(err.has_field("weight"));
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let err = validate_profile(&form(json!({}))).unwrap_err();
        for field in ["age", "height", "weight", "gender", "activityLevel"] {
            assert!(err.has_field(field), "missing {field}: {err}");
        }
    }

    #[test]
    fn test_type_and_range_errors_reported_together() {
        let mut raw = valid_form();
        raw["age"] = json!("thirty");
        raw["weight"] = json!(800);
        raw["healthGoals"] = json!("");

        let err = validate_profile(&form(raw)).unwrap_err();
        let fields: Vec<&str> = err.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["age", "healthGoals", "weight"]);
    }

    #[test]
    fn test_blank_required_text_is_rejected() {
        let err = validate_profile(&with("preferredCuisine", json!("   "))).unwrap_err();
        assert!(err.has_field("preferredCuisine"));
        assert_eq!(err.fields[0].message, "Preferred cuisine is required");
    }

    #[test]
    fn test_unknown_enum_value() {
        let err = validate_profile(&with("gender", json!("other"))).unwrap_err();
        assert_eq!(err.fields[0].message, "must be one of: male, female");

        let err = validate_profile(&with("activityLevel", json!("couch"))).unwrap_err();
        assert!(err.has_field("activityLevel"));
    }

    #[test]
    fn test_health_issues_optional() {
        let profile = validate_profile(&with("healthIssues", json!(""))).unwrap();
        assert_eq!(profile.health_issues, None);

        let profile = validate_profile(&with("healthIssues", Value::Null)).unwrap();
        assert_eq!(profile.health_issues, None);

        let profile = validate_profile(&with("healthIssues", json!(" knee pain "))).unwrap();
        assert_eq!(profile.health_issues.as_deref(), Some("knee pain"));
    }

    #[test]
    fn test_report_length() {
        let short = ReportForm {
            report: Some(json!("short")),
        };
        let err = validate_report(&short).unwrap_err();
        assert!(err.has_field("report"));

        let nine = ReportForm {
            report: Some(json!("123456789")),
        };
        assert!(validate_report(&nine).is_err());

        let ok = ReportForm {
            report: Some(json!("Lost 2kg this week")),
        };
        assert_eq!(validate_report(&ok).unwrap().report, "Lost 2kg this week");

        assert!(validate_report(&ReportForm::default()).is_err());
    }

    #[test]
    fn test_progress_log_validation() {
        let raw: ProgressLogForm = serde_json::from_value(json!({
            "date": "2026-03-01",
            "weight": "71.5",
            "workoutCompleted": true,
            "waistCircumference": 80,
            "notes": ""
        }))
        .unwrap();

        let entry = validate_progress_log(&raw).unwrap();
        assert_eq!(format_log_date(entry.date), "2026-03-01");
        assert_eq!(entry.weight, Some(71.5));
        assert_eq!(entry.workout_completed, Some(true));
        assert_eq!(entry.waist_circumference, Some(80.0));
        assert_eq!(entry.arm_circumference, None);
        assert_eq!(entry.notes, None);
    }

    #[test]
    fn test_progress_log_rejects_bad_values() {
        let raw: ProgressLogForm = serde_json::from_value(json!({
            "date": "2026-3-1",
            "weight": -2,
            "workoutCompleted": "yes"
        }))
        .unwrap();

        let err = validate_progress_log(&raw).unwrap_err();
        let fields: Vec<&str> = err.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["date", "weight", "workoutCompleted"]);

        let raw: ProgressLogForm = serde_json::from_value(json!({
            "date": "bad",
            "weight": -2,
            "armCircumference": 0
        }))
        .unwrap();
        let err = validate_progress_log(&raw).unwrap_err();
        let fields: Vec<&str> = err.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["armCircumference", "date", "weight"]);

        let raw: ProgressLogForm = serde_json::from_value(json!({
            "date": "2026-03-01",
            "weight": 0
        }))
        .unwrap();
        let err = validate_progress_log(&raw).unwrap_err();
        assert_eq!(err.fields[0].field, "weight");
        assert_eq!(err.fields[0].message, "Weight must be positive.");
    }

    #[test]
    fn test_parse_log_date() {
        assert!(parse_log_date("2026-02-28").is_ok());
        assert!(parse_log_date("2026-02-30").is_err());
        assert!(parse_log_date("26-02-28").is_err());
        assert!(parse_log_date("2026/02/28").is_err());
        assert!(parse_log_date("2026-02-28T00:00:00Z").is_err());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("preferred_cuisine"), "preferredCuisine");
        assert_eq!(camel_case("age"), "age");
        assert_eq!(camel_case("arm_circumference"), "armCircumference");
    }
}
