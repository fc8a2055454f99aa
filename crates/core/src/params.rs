//! Forgiving extraction of typed simulation constants from a JSON object.
//!
//! Missing keys and values of the wrong JSON type fall back to the supplied
//! default, so a partial override like `{"speed_cap": 8}` is always usable.
//! Range checks happen later in each parameter struct's `validate`.

use serde_json::Value;

/// Reads `params[name]` as an `f64`. Integers are widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads `params[name]` as a `usize`; negative and fractional values fall back.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Builds one entry of a `param_schema()` object for a numeric constant.
pub fn number_schema(default: f64, min: f64, max: f64, description: &str) -> Value {
    serde_json::json!({
        "type": "number",
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}

/// Builds one entry of a `param_schema()` object for an integer constant.
pub fn integer_schema(default: u64, min: u64, max: u64, description: &str) -> Value {
    serde_json::json!({
        "type": "integer",
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"attraction": 12.5});
        assert!((param_f64(&params, "attraction", 20.0) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_widens_integer() {
        let params = json!({"boundary_radius": 80});
        assert!((param_f64(&params, "boundary_radius", 100.0) - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "speed_cap", 5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_string_or_null() {
        let params = json!({"speed_cap": "fast", "scale": null});
        assert!((param_f64(&params, "speed_cap", 5.0) - 5.0).abs() < f64::EPSILON);
        assert!((param_f64(&params, "scale", 50.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!([1, 2, 3]);
        assert!((param_f64(&params, "speed_cap", 5.0) - 5.0).abs() < f64::EPSILON);
    }

    // -- param_usize --

    #[test]
    fn param_usize_extracts_population() {
        let params = json!({"population": 42});
        assert_eq!(param_usize(&params, "population", 150), 42);
    }

    #[test]
    fn param_usize_rejects_fractional_and_negative() {
        assert_eq!(param_usize(&json!({"population": 2.5}), "population", 150), 150);
        assert_eq!(param_usize(&json!({"population": -4}), "population", 150), 150);
    }

    // -- schema builders --

    #[test]
    fn number_schema_has_expected_keys() {
        let s = number_schema(5.0, 0.0, 50.0, "Velocity cap");
        assert_eq!(s["type"], "number");
        assert_eq!(s["default"], 5.0);
        assert_eq!(s["min"], 0.0);
        assert_eq!(s["max"], 50.0);
        assert_eq!(s["description"], "Velocity cap");
    }

    #[test]
    fn integer_schema_marks_integer_type() {
        let s = integer_schema(150, 0, 100_000, "Particle count");
        assert_eq!(s["type"], "integer");
        assert_eq!(s["default"], 150);
    }
}
