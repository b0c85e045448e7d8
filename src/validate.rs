//! Ingestion payload validation.
//!
//! Turns a raw JSON payload into a typed [`NewReading`]. Only presence and
//! type are checked: out-of-range values are exactly the anomalies the
//! classifier has to see, so they are passed through untouched.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::{Features, NewReading};

// ---

const REQUIRED_FIELDS: [&str; 4] = ["device_id", "temperature", "smoke", "gas"];

/// Feature defaults used by manual prediction when a field is omitted.
pub const DEFAULT_FEATURES: Features = Features {
    temperature: 30.0,
    smoke: 100,
    gas: 150,
};

/// Parse a raw request body into JSON.
///
/// An empty body is reported separately from malformed JSON so the client
/// gets a precise message.
pub fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
    // ---
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::EmptyBody);
    }
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))
}

/// Validate an ingestion payload.
///
/// All required fields are checked for presence first, in declaration order,
/// then each value is coerced. Neither timestamp nor id is assigned here.
pub fn validate(payload: &Value) -> Result<NewReading, ValidationError> {
    // ---
    let obj = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
        return Err(ValidationError::MissingField(*missing));
    }

    let device_id = match &obj["device_id"] {
        Value::String(s) if !s.trim().is_empty() => s.clone(),
        _ => {
            return Err(ValidationError::InvalidField {
                field: "device_id",
                expected: "a non-empty string",
            })
        }
    };

    Ok(NewReading {
        device_id,
        features: Features {
            temperature: coerce_float("temperature", &obj["temperature"])?,
            smoke: coerce_int("smoke", &obj["smoke"])?,
            gas: coerce_int("gas", &obj["gas"])?,
        },
    })
}

/// Validate the feature triple of a manual prediction request.
///
/// Missing fields fall back to [`DEFAULT_FEATURES`]; present fields must
/// still coerce.
pub fn validate_features(payload: &Value) -> Result<Features, ValidationError> {
    // ---
    let obj = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(Features {
        temperature: field_or(obj, "temperature", DEFAULT_FEATURES.temperature, coerce_float)?,
        smoke: field_or(obj, "smoke", DEFAULT_FEATURES.smoke, coerce_int)?,
        gas: field_or(obj, "gas", DEFAULT_FEATURES.gas, coerce_int)?,
    })
}

fn field_or<T>(
    obj: &Map<String, Value>,
    field: &'static str,
    default: T,
    coerce: fn(&'static str, &Value) -> Result<T, ValidationError>,
) -> Result<T, ValidationError> {
    // ---
    match obj.get(field) {
        Some(value) => coerce(field, value),
        None => Ok(default),
    }
}

fn coerce_float(field: &'static str, value: &Value) -> Result<f64, ValidationError> {
    // ---
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::InvalidField {
            field,
            expected: "a finite number",
        })
}

fn coerce_int(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    // ---
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            // Floats truncate toward zero; u64 values beyond i64 do not fit.
            n.as_f64()
                .filter(|v| n.is_f64() && v.is_finite())
                .map(f64::trunc)
                .filter(|v| *v >= i64::MIN as f64 && *v < i64::MAX as f64)
                .map(|v| v as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or(ValidationError::InvalidField {
        field,
        expected: "an integer",
    })
}
