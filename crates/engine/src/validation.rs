//! Request payload validation.
//!
//! Every parser takes the raw JSON body and returns either a typed,
//! bounds-checked value or [`EngineError::InvalidField`] naming the offending
//! field (`exercises[1].sets[0].reps`). Parsing stops at the first failure and
//! never touches storage.
//!
//! Enumerated fields follow one of two policies and the choice is per field:
//! strict fields (`leadSource`, `bodyRegion`) reject unknown values, lenient
//! fields (`dayType`, `optPhase`) fall back to their documented default.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    BodyRegion, DayType, EngineError, LeadSource, OptPhase, ResultEngine, Weight,
};

/// Inclusive bounds of the workout intensity rating.
pub const INTENSITY_RANGE: (i64, i64) = (1, 10);
/// Inclusive bounds of a reported pain level (0 = no pain).
pub const PAIN_LEVEL_RANGE: (i64, i64) = (0, 10);

const DEFAULT_PLAN_WEEKS: i64 = 4;

/// Accessor over one JSON object that prefixes every error with its path.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    path: String,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, path: &str) -> ResultEngine<Self> {
        let object = value.as_object().ok_or_else(|| {
            EngineError::field(
                if path.is_empty() { "body" } else { path },
                "must be a JSON object",
            )
        })?;
        Ok(Self {
            object,
            path: path.to_string(),
        })
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// `null` counts as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }

    fn required(&self, key: &str) -> ResultEngine<&'a Value> {
        self.get(key)
            .ok_or_else(|| EngineError::field(self.path_of(key), "is required"))
    }

    fn required_string(&self, key: &str) -> ResultEngine<String> {
        let value = self.required(key)?;
        non_empty_string(value, &self.path_of(key))
    }

    fn optional_string(&self, key: &str) -> ResultEngine<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(_) => Err(EngineError::field(self.path_of(key), "must be a string")),
        }
    }

    fn optional_bool(&self, key: &str) -> ResultEngine<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(EngineError::field(self.path_of(key), "must be a boolean")),
        }
    }

    fn required_uuid(&self, key: &str) -> ResultEngine<Uuid> {
        let value = self.required(key)?;
        uuid_value(value, &self.path_of(key))
    }

    fn optional_uuid(&self, key: &str) -> ResultEngine<Option<Uuid>> {
        self.get(key)
            .map(|value| uuid_value(value, &self.path_of(key)))
            .transpose()
    }

    fn required_min_int(&self, key: &str, min: i64) -> ResultEngine<i64> {
        let value = self.required(key)?;
        min_int(value, &self.path_of(key), min)
    }

    fn min_int_or(&self, key: &str, min: i64, default: i64) -> ResultEngine<i64> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => min_int(value, &self.path_of(key), min),
        }
    }

    fn required_bounded(&self, key: &str, (lo, hi): (i64, i64)) -> ResultEngine<i64> {
        let value = self.required(key)?;
        bounded_int(value, &self.path_of(key), lo, hi)
    }

    fn optional_bounded(&self, key: &str, (lo, hi): (i64, i64)) -> ResultEngine<Option<i64>> {
        self.get(key)
            .map(|value| bounded_int(value, &self.path_of(key), lo, hi))
            .transpose()
    }

    fn required_array(&self, key: &str) -> ResultEngine<&'a Vec<Value>> {
        let path = self.path_of(key);
        let items = self
            .required(key)?
            .as_array()
            .ok_or_else(|| EngineError::field(path.as_str(), "must be an array"))?;
        if items.is_empty() {
            return Err(EngineError::field(path, "must not be empty"));
        }
        Ok(items)
    }

    /// Lenient numeric read: anything that is not a finite integer is `None`.
    fn lenient_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(integer_of)
    }

    /// Lenient string read: non-strings and blank strings are `None`.
    fn lenient_string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }
}

/// Integer value of a JSON number, accepting floats without a fractional part.
fn integer_of(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn non_empty_string(value: &Value, field: &str) -> ResultEngine<String> {
    let s = value
        .as_str()
        .ok_or_else(|| EngineError::field(field, "must be a string"))?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(EngineError::field(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn uuid_value(value: &Value, field: &str) -> ResultEngine<Uuid> {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| EngineError::field(field, "must be a valid id"))
}

fn min_int(value: &Value, field: &str, min: i64) -> ResultEngine<i64> {
    let n = integer_of(value)
        .ok_or_else(|| EngineError::field(field, "must be an integer"))?;
    if n < min {
        return Err(EngineError::field(field, format!("must be >= {min}")));
    }
    Ok(n)
}

/// Integer within `[lo, hi]` (inclusive).
pub fn bounded_int(value: &Value, field: &str, lo: i64, hi: i64) -> ResultEngine<i64> {
    let reason = || format!("must be an integer between {lo} and {hi}");
    let n = integer_of(value).ok_or_else(|| EngineError::field(field, reason()))?;
    if n < lo || n > hi {
        return Err(EngineError::field(field, reason()));
    }
    Ok(n)
}

/// Parses an ISO-8601 date (`2024-05-01`) or RFC 3339 timestamp.
pub fn parse_timestamp(value: &Value, field: &str) -> ResultEngine<DateTime<Utc>> {
    let raw = value
        .as_str()
        .map(str::trim)
        .ok_or_else(|| EngineError::field(field, "must be an ISO-8601 date string"))?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::field(field, "must be a valid ISO-8601 date"))
}

/// Like [`parse_timestamp`], additionally rejecting instants after `now`.
pub fn parse_past_date(value: &Value, field: &str, now: DateTime<Utc>) -> ResultEngine<DateTime<Utc>> {
    let date = parse_timestamp(value, field)?;
    if date > now {
        return Err(EngineError::field(field, "must not be in the future"));
    }
    Ok(date)
}

/// Body of `POST /purchase-and-grant` and `POST /orders`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub client_id: Uuid,
    pub storefront_item_id: Uuid,
    pub quantity: i64,
    pub trainer_id: Option<Uuid>,
    pub lead_source: LeadSource,
    pub client_state: Option<String>,
    pub absorb_tax: bool,
}

/// Only the buyer of a purchase body, so access can be checked before the
/// rest of the body is validated.
pub fn parse_client_id(body: &Value) -> ResultEngine<Uuid> {
    Fields::new(body, "")?.required_uuid("clientId")
}

pub fn parse_purchase(body: &Value) -> ResultEngine<PurchaseRequest> {
    let fields = Fields::new(body, "")?;
    let client_id = fields.required_uuid("clientId")?;
    let storefront_item_id = fields.required_uuid("storefrontItemId")?;
    let quantity = fields.min_int_or("quantity", 1, 1)?;
    let trainer_id = fields.optional_uuid("trainerId")?;
    let lead_source = match fields.required("leadSource")? {
        Value::String(s) => LeadSource::try_from(s.trim())?,
        _ => return Err(EngineError::field("leadSource", "must be a string")),
    };
    let client_state = fields.optional_string("clientState")?;
    let absorb_tax = fields.optional_bool("absorbTax")?.unwrap_or(false);

    Ok(PurchaseRequest {
        client_id,
        storefront_item_id,
        quantity,
        trainer_id,
        lead_source,
        client_state,
        absorb_tax,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetDraft {
    pub set_number: i64,
    pub reps: i64,
    pub weight: Weight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseDraft {
    pub name: String,
    pub pain_level: Option<i64>,
    pub body_region: Option<BodyRegion>,
    pub sets: Vec<SetDraft>,
}

/// Body of `POST /clients/:clientId/workouts`.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutDraft {
    pub title: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: i64,
    pub intensity: i64,
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseDraft>,
}

pub fn parse_workout(body: &Value, now: DateTime<Utc>) -> ResultEngine<WorkoutDraft> {
    let fields = Fields::new(body, "")?;
    let title = fields.required_string("title")?;
    let date = parse_past_date(fields.required("date")?, "date", now)?;
    let duration_minutes = fields.required_min_int("duration", 0)?;
    let intensity = fields.required_bounded("intensity", INTENSITY_RANGE)?;
    let notes = fields.optional_string("notes")?;

    let raw_exercises = fields.required_array("exercises")?;
    let mut exercises: Vec<ExerciseDraft> = Vec::with_capacity(raw_exercises.len());
    let (mut total_reps, mut total_volume) = (0i64, 0i64);
    for (index, raw) in raw_exercises.iter().enumerate() {
        let path = format!("exercises[{index}]");
        let exercise = parse_exercise(raw, &path)?;
        if exercises.iter().any(|e| e.name == exercise.name) {
            return Err(EngineError::field(
                format!("{path}.name"),
                format!("exercise '{}' is listed twice", exercise.name),
            ));
        }
        // Totals are recomputed from the stored rows; they have to fit there too.
        for (set_index, set) in exercise.sets.iter().enumerate() {
            let reps = total_reps.checked_add(set.reps);
            let volume = set
                .reps
                .checked_mul(set.weight.centi())
                .and_then(|v| v.checked_add(total_volume));
            let (Some(reps), Some(volume)) = (reps, volume) else {
                return Err(EngineError::field(
                    format!("{path}.sets[{set_index}].reps"),
                    format!("exercise '{}': workout volume too large", exercise.name),
                ));
            };
            (total_reps, total_volume) = (reps, volume);
        }
        exercises.push(exercise);
    }

    Ok(WorkoutDraft {
        title,
        date,
        duration_minutes,
        intensity,
        notes,
        exercises,
    })
}

fn parse_exercise(raw: &Value, path: &str) -> ResultEngine<ExerciseDraft> {
    let fields = Fields::new(raw, path)?;
    let name = fields.required_string("name")?;

    // Anything failing past this point names the exercise.
    let with_name = |err: EngineError| match err {
        EngineError::InvalidField { field, reason } => EngineError::InvalidField {
            field,
            reason: format!("exercise '{name}': {reason}"),
        },
        other => other,
    };

    let pain_level = fields
        .optional_bounded("painLevel", PAIN_LEVEL_RANGE)
        .map_err(with_name)?;
    let body_region = fields
        .optional_string("bodyRegion")
        .map_err(with_name)?
        .map(|raw| BodyRegion::try_from(raw.as_str()))
        .transpose()
        .map_err(|_| {
            with_name(EngineError::field(
                fields.path_of("bodyRegion"),
                format!("must be one of {}", BodyRegion::allowed_list()),
            ))
        })?;

    let raw_sets = fields.required_array("sets").map_err(with_name)?;
    let mut sets = Vec::with_capacity(raw_sets.len());
    let mut seen = HashSet::with_capacity(raw_sets.len());
    for (index, raw_set) in raw_sets.iter().enumerate() {
        let set_path = format!("{path}.sets[{index}]");
        let set = parse_set(raw_set, &set_path, index).map_err(with_name)?;
        if !seen.insert(set.set_number) {
            return Err(with_name(EngineError::field(
                format!("{set_path}.setNumber"),
                format!("duplicate set number {}", set.set_number),
            )));
        }
        sets.push(set);
    }

    Ok(ExerciseDraft {
        name,
        pain_level,
        body_region,
        sets,
    })
}

fn parse_set(raw: &Value, path: &str, index: usize) -> ResultEngine<SetDraft> {
    let fields = Fields::new(raw, path)?;
    let set_number = fields.min_int_or("setNumber", 1, index as i64 + 1)?;
    let reps = fields.min_int_or("reps", 0, 0)?;
    let weight = match fields.get("weight") {
        None => Weight::ZERO,
        Some(value) => Weight::from_json(value)
            .ok_or_else(|| EngineError::field(fields.path_of("weight"), "must be a number >= 0"))?,
    };
    Ok(SetDraft {
        set_number,
        reps,
        weight,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanExerciseDraft {
    pub name: String,
    pub order_in_workout: i64,
    pub set_scheme: Option<String>,
    pub rep_goal: Option<String>,
    pub rest_period: Option<i64>,
    pub tempo: Option<String>,
    pub intensity_guideline: Option<String>,
    pub notes: Option<String>,
    pub is_optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanDayDraft {
    pub day_number: i64,
    pub name: String,
    pub focus: Option<String>,
    pub day_type: DayType,
    pub opt_phase: Option<OptPhase>,
    pub estimated_duration: Option<i64>,
    pub exercises: Vec<PlanExerciseDraft>,
}

/// A generated workout plan document, as returned by the plan generator.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanDraft {
    pub title: String,
    pub summary: String,
    pub duration_weeks: i64,
    pub days: Vec<PlanDayDraft>,
}

/// Parses a generated plan.
///
/// Only `days` is strict (non-empty array of objects); everything else falls
/// back to a default, the same way a generator's loosely typed output is
/// tolerated.
pub fn parse_plan(body: &Value) -> ResultEngine<PlanDraft> {
    let fields = Fields::new(body, "")?;
    let title = fields
        .lenient_string("planName")
        .unwrap_or_else(|| "AI Workout Plan".to_string());
    let summary = fields
        .lenient_string("summary")
        .unwrap_or_else(|| "AI-generated workout plan".to_string());
    let duration_weeks = fields
        .lenient_int("durationWeeks")
        .map_or(DEFAULT_PLAN_WEEKS, |weeks| weeks.max(1));

    let raw_days = fields.required_array("days")?;
    let mut days = Vec::with_capacity(raw_days.len());
    for (index, raw_day) in raw_days.iter().enumerate() {
        let day = Fields::new(raw_day, &format!("days[{index}]"))?;
        let day_number = day.lenient_int("dayNumber").unwrap_or(index as i64 + 1);

        let exercises = day
            .get("exercises")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(j, item)| {
                        let item = item.as_object()?;
                        let ex = Fields {
                            object: item,
                            path: String::new(),
                        };
                        Some(PlanExerciseDraft {
                            name: ex.lenient_string("name").unwrap_or_default(),
                            order_in_workout: ex
                                .lenient_int("orderInWorkout")
                                .unwrap_or(j as i64 + 1),
                            set_scheme: ex.lenient_string("setScheme"),
                            rep_goal: ex.lenient_string("repGoal"),
                            rest_period: ex.lenient_int("restPeriod"),
                            tempo: ex.lenient_string("tempo"),
                            intensity_guideline: ex.lenient_string("intensityGuideline"),
                            notes: ex.lenient_string("notes"),
                            is_optional: ex.get("isOptional").and_then(Value::as_bool).unwrap_or(false),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        days.push(PlanDayDraft {
            day_number,
            name: day
                .lenient_string("name")
                .unwrap_or_else(|| format!("Day {day_number}")),
            focus: day.lenient_string("focus"),
            day_type: DayType::normalize(day.get("dayType")),
            opt_phase: OptPhase::normalize(day.get("optPhase")),
            estimated_duration: day.lenient_int("estimatedDuration"),
            exercises,
        });
    }

    Ok(PlanDraft {
        title,
        summary,
        duration_weeks,
        days,
    })
}

/// Body of `POST /clients/:clientId/sessions`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingRequest {
    pub scheduled_at: DateTime<Utc>,
    pub trainer_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub fn parse_booking(body: &Value) -> ResultEngine<BookingRequest> {
    let fields = Fields::new(body, "")?;
    Ok(BookingRequest {
        scheduled_at: parse_timestamp(fields.required("scheduledAt")?, "scheduledAt")?,
        trainer_id: fields.optional_uuid("trainerId")?,
        notes: fields.optional_string("notes")?,
    })
}
