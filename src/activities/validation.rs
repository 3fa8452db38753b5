use serde_json::{Map, Value};

use crate::activities::dto::{ActivityPatch, NewActivity};
use crate::error::ApiError;

const REQUIRED_FIELDS: [&str; 4] = ["name", "energy_before", "energy_after", "duration_minutes"];
const ENERGY_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

fn invalid(msg: impl Into<String>) -> ApiError {
    ApiError::Validation(msg.into())
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ApiError> {
    body.as_object()
        .ok_or_else(|| invalid("Request body must be a JSON object"))
}

/// Present and not `null`.
fn supplied<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

pub fn validate_new(body: &Value) -> Result<NewActivity, ApiError> {
    let obj = as_object(body)?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| supplied(obj, f).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(invalid(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(NewActivity {
        name: parse_name(&obj["name"])?,
        category: match obj.get("category") {
            Some(v) => parse_category(v)?,
            None => None,
        },
        energy_before: parse_energy("energy_before", &obj["energy_before"])?,
        energy_after: parse_energy("energy_after", &obj["energy_after"])?,
        duration_minutes: parse_duration(&obj["duration_minutes"])?,
        user_id: None,
    })
}

pub fn validate_patch(body: &Value) -> Result<ActivityPatch, ApiError> {
    let obj = as_object(body)?;

    let patch = ActivityPatch {
        name: obj.get("name").map(parse_name).transpose()?,
        category: obj.get("category").map(parse_category).transpose()?,
        energy_before: obj
            .get("energy_before")
            .map(|v| parse_energy("energy_before", v))
            .transpose()?,
        energy_after: obj
            .get("energy_after")
            .map(|v| parse_energy("energy_after", v))
            .transpose()?,
        duration_minutes: obj.get("duration_minutes").map(parse_duration).transpose()?,
    };

    if patch.is_empty() {
        return Err(invalid("No updatable fields provided"));
    }
    Ok(patch)
}

fn parse_name(v: &Value) -> Result<String, ApiError> {
    match v.as_str().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(invalid("name must be a non-empty string")),
    }
}

fn parse_category(v: &Value) -> Result<Option<String>, ApiError> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        _ => Err(invalid("category must be a string")),
    }
}

fn parse_energy(field: &str, v: &Value) -> Result<i64, ApiError> {
    let parsed = match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let energy = parsed.ok_or_else(|| invalid(format!("Invalid {field} value")))?;
    if !ENERGY_RANGE.contains(&energy) {
        return Err(invalid(format!("{field} must be between 1 and 10")));
    }
    Ok(energy)
}

fn parse_duration(v: &Value) -> Result<f64, ApiError> {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|d| d.is_finite());
    let duration = parsed.ok_or_else(|| invalid("Invalid duration_minutes value"))?;
    if duration <= 0.0 {
        return Err(invalid("duration_minutes must be greater than 0"));
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_complete_payload() {
        let new = validate_new(&json!({
            "name": "  Run ",
            "category": "Exercise",
            "energy_before": 5,
            "energy_after": "8",
            "duration_minutes": 30
        }))
        .unwrap();
        assert_eq!(new.name, "Run");
        assert_eq!(new.category.as_deref(), Some("Exercise"));
        assert_eq!(new.energy_before, 5);
        assert_eq!(new.energy_after, 8);
        assert_eq!(new.duration_minutes, 30.0);
        assert_eq!(new.user_id, None);
    }

    #[test]
    fn category_is_optional_and_blank_means_none() {
        let base = json!({"name": "Nap", "energy_before": 3, "energy_after": 6, "duration_minutes": 20.5});
        assert_eq!(validate_new(&base).unwrap().category, None);

        let mut blank = base.clone();
        blank["category"] = json!("   ");
        assert_eq!(validate_new(&blank).unwrap().category, None);

        let mut wrong = base;
        wrong["category"] = json!(12);
        assert_eq!(message(validate_new(&wrong).unwrap_err()), "category must be a string");
    }

    #[test]
    fn names_all_missing_fields_together() {
        let err = validate_new(&json!({"energy_before": 5, "energy_after": null})).unwrap_err();
        assert_eq!(
            message(err),
            "Missing required fields: name, energy_after, duration_minutes"
        );
    }

    #[test]
    fn rejects_energy_out_of_range() {
        let err = validate_new(&json!({
            "name": "Run", "energy_before": 11, "energy_after": 8, "duration_minutes": 30
        }))
        .unwrap_err();
        assert_eq!(message(err), "energy_before must be between 1 and 10");

        let err = validate_patch(&json!({"energy_after": 0})).unwrap_err();
        assert_eq!(message(err), "energy_after must be between 1 and 10");
    }

    #[test]
    fn rejects_non_integer_energy() {
        for bad in [json!("high"), json!(5.5), json!(true), json!([5])] {
            let err = validate_patch(&json!({ "energy_before": bad })).unwrap_err();
            assert_eq!(message(err), "Invalid energy_before value");
        }
        assert_eq!(
            validate_patch(&json!({"energy_before": 4.0})).unwrap().energy_before,
            Some(4)
        );
    }

    #[test]
    fn rejects_non_positive_duration() {
        for bad in [json!(0), json!(-5), json!("0")] {
            let err = validate_new(&json!({
                "name": "Run", "energy_before": 5, "energy_after": 8, "duration_minutes": bad
            }))
            .unwrap_err();
            assert_eq!(message(err), "duration_minutes must be greater than 0");
        }
        let err = validate_patch(&json!({"duration_minutes": "long"})).unwrap_err();
        assert_eq!(message(err), "Invalid duration_minutes value");
    }

    #[test]
    fn patch_only_carries_supplied_fields() {
        let patch = validate_patch(&json!({"category": "Social"})).unwrap();
        assert_eq!(
            patch,
            ActivityPatch {
                category: Some(Some("Social".into())),
                ..Default::default()
            }
        );

        let cleared = validate_patch(&json!({"category": null})).unwrap();
        assert_eq!(cleared.category, Some(None));
    }

    #[test]
    fn patch_rejects_empty_or_immutable_only_bodies() {
        let err = validate_patch(&json!({})).unwrap_err();
        assert_eq!(message(err), "No updatable fields provided");

        let err = validate_patch(&json!({"id": 3, "timestamp": "2024-01-01T00:00:00Z"})).unwrap_err();
        assert_eq!(message(err), "No updatable fields provided");
    }

    #[test]
    fn patch_rejects_null_name() {
        let err = validate_patch(&json!({"name": null})).unwrap_err();
        assert_eq!(message(err), "name must be a non-empty string");
    }

    #[test]
    fn body_must_be_an_object() {
        let err = validate_new(&json!([1, 2])).unwrap_err();
        assert_eq!(message(err), "Request body must be a JSON object");
    }
}
