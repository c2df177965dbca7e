//! Turns a raw `/predict` body into a [`FeatureRecord`].
//!
//! JSON and form bodies are decoded into the same flat map of raw values and
//! then go through one validator, so both encodings share the exact same
//! presence and coercion rules.

use serde_json::{Map, Value};

use crate::error::{ApiError, InvalidField};
use crate::io_struct::{
    CROP_TYPE, FEATURE_FIELDS, FeatureRecord, FieldKind, HUMIDITY, MOISTURE, NITROGEN, PHOSPHOROUS,
    POTASSIUM, SOIL_TYPE, TEMPARATURE,
};

pub type RawFields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    Form,
}

/// Picks the decoder for a body. A declared JSON or form content type wins;
/// anything else is sniffed from the first non-whitespace byte.
pub fn detect_encoding(content_type: Option<&str>, body: &[u8]) -> BodyEncoding {
    if let Some(content_type) = content_type {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if mime == "application/json" || mime.ends_with("+json") {
            return BodyEncoding::Json;
        }
        if mime == "application/x-www-form-urlencoded" {
            return BodyEncoding::Form;
        }
    }
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => BodyEncoding::Json,
        _ => BodyEncoding::Form,
    }
}

pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawFields, ApiError> {
    match detect_encoding(content_type, body) {
        BodyEncoding::Json => parse_json(body),
        BodyEncoding::Form => Ok(parse_form(body)),
    }
}

fn parse_json(body: &[u8]) -> Result<RawFields, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody {
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::MalformedBody {
            reason: format!("expected a JSON object, got {}", json_type_name(&other)),
        }),
    }
}

fn parse_form(body: &[u8]) -> RawFields {
    let mut fields = RawFields::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        // last occurrence wins, as with duplicate keys in a JSON object
        fields.insert(key.into_owned(), Value::String(value.into_owned()));
    }
    fields
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            let f = n.as_f64()?;
            // 2^63 is exactly representable, so the upper bound is exclusive
            if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(f as i64)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Validates a raw field map. Every missing field is reported together;
/// only once all are present are the values coerced, and again every
/// invalid field is reported together.
pub fn normalize(raw: &RawFields) -> Result<FeatureRecord, ApiError> {
    let missing: Vec<String> = FEATURE_FIELDS
        .iter()
        .filter(|(name, _)| !raw.contains_key(*name))
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields { fields: missing });
    }

    let mut fields = FieldCoercer::new(raw);
    let temparature = fields.int(TEMPARATURE);
    let humidity = fields.int(HUMIDITY);
    let moisture = fields.int(MOISTURE);
    let soil_type = fields.text(SOIL_TYPE);
    let crop_type = fields.text(CROP_TYPE);
    let nitrogen = fields.int(NITROGEN);
    let potassium = fields.int(POTASSIUM);
    let phosphorous = fields.int(PHOSPHOROUS);
    fields.finish()?;

    Ok(FeatureRecord::new(
        temparature,
        humidity,
        moisture,
        soil_type,
        crop_type,
        nitrogen,
        potassium,
        phosphorous,
    ))
}

/// Coerces present fields one by one, collecting failures instead of
/// stopping at the first.
struct FieldCoercer<'a> {
    raw: &'a RawFields,
    invalid: Vec<InvalidField>,
}

impl<'a> FieldCoercer<'a> {
    fn new(raw: &'a RawFields) -> Self {
        FieldCoercer {
            raw,
            invalid: Vec::new(),
        }
    }

    fn value(&self, name: &str) -> &'a Value {
        static NULL: Value = Value::Null;
        let raw = self.raw;
        raw.get(name).unwrap_or(&NULL)
    }

    fn int(&mut self, name: &str) -> i64 {
        let value = self.value(name);
        coerce_int(value).unwrap_or_else(|| {
            self.reject(name, value, FieldKind::Integer);
            0
        })
    }

    fn text(&mut self, name: &str) -> String {
        let value = self.value(name);
        coerce_text(value).unwrap_or_else(|| {
            self.reject(name, value, FieldKind::Text);
            String::new()
        })
    }

    fn reject(&mut self, name: &str, value: &Value, kind: FieldKind) {
        self.invalid.push(InvalidField {
            field: name.to_string(),
            value: value.to_string(),
            expected: kind.expected(),
        });
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.invalid.is_empty() {
            Ok(())
        } else {
            Err(ApiError::InvalidType {
                fields: self.invalid,
            })
        }
    }
}

pub fn normalize_body(content_type: Option<&str>, body: &[u8]) -> Result<FeatureRecord, ApiError> {
    let raw = parse_body(content_type, body)?;
    normalize(&raw)
}
