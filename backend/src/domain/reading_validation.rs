//! Admissibility rules for submitted blood-pressure readings.
//!
//! Raw fields arrive as arbitrary JSON values. The checks run in a fixed
//! order and the first failing rule decides the rejection:
//!
//! 1. systolic or diastolic missing, empty, `false`, or zero;
//! 2. systolic, diastolic, or a supplied pulse not parseable as a number;
//! 3. systolic outside 50..=250 or diastolic outside 30..=150.
//!
//! Zero counts as missing rather than out of range. Existing clients depend
//! on that ordering, so it stays. Numeric strings follow JavaScript `Number`
//! parsing: surrounding whitespace is ignored, a blank string reads as zero,
//! and `0x`/`0o`/`0b` prefixes are accepted.
//!
//! Stored values are integers. A reading that passes every rule but carries
//! a fractional pressure or pulse, or a pulse beyond `i32`, is rejected as
//! not numeric.

use std::ops::RangeInclusive;

use serde_json::Value;
use thiserror::Error;

/// Accepted systolic range in mmHg.
pub const SYSTOLIC_RANGE: RangeInclusive<i64> = 50..=250;
/// Accepted diastolic range in mmHg.
pub const DIASTOLIC_RANGE: RangeInclusive<i64> = 30..=150;

/// Reading fields as submitted, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReading {
    /// Upper pressure as submitted.
    pub systolic: Option<Value>,
    /// Lower pressure as submitted.
    pub diastolic: Option<Value>,
    /// Optional heart rate as submitted.
    pub pulse: Option<Value>,
}

/// Reasons a reading is rejected, in evaluation order.
///
/// The display strings are the fixed client-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadingRejection {
    /// Systolic or diastolic is absent, empty, or zero.
    #[error("חייב לשלוח ערך גבוה ונמוך")]
    MissingRequiredField,
    /// A supplied value is not a number.
    #[error("הערכים חייבים להיות מספרים")]
    NotNumeric,
    /// Systolic or diastolic is outside its accepted range.
    #[error("הערכים לא הגיוניים")]
    OutOfRange,
}

/// Normalised reading that passed every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedReading {
    systolic: i32,
    diastolic: i32,
    pulse: Option<i32>,
}

impl ValidatedReading {
    /// Systolic pressure in mmHg.
    pub fn systolic(&self) -> i32 {
        self.systolic
    }

    /// Diastolic pressure in mmHg.
    pub fn diastolic(&self) -> i32 {
        self.diastolic
    }

    /// Pulse in beats per minute, when supplied.
    pub fn pulse(&self) -> Option<i32> {
        self.pulse
    }
}

/// Interpretation of a single raw field.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldValue {
    /// Absent or falsy: `null`, `false`, `0`, or an empty string.
    Absent,
    /// Parsed number, possibly infinite or fractional.
    Number(f64),
    Invalid,
}

impl FieldValue {
    fn interpret(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Self::Absent,
            Some(Value::String(text)) if text.is_empty() => Self::Absent,
            Some(Value::Number(number)) => match number.as_f64() {
                Some(parsed) if parsed == 0.0 => Self::Absent,
                Some(parsed) => Self::Number(parsed),
                None => Self::Invalid,
            },
            Some(Value::String(text)) => parse_number(text),
            Some(Value::Bool(true) | Value::Array(_) | Value::Object(_)) => Self::Invalid,
        }
    }
}

fn parse_number(text: &str) -> FieldValue {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return FieldValue::Number(0.0);
    }
    if let Some(parsed) = parse_prefixed(trimmed) {
        return parsed;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return FieldValue::Number(f64::INFINITY),
        "-Infinity" => return FieldValue::Number(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust also reads "inf" and "NaN", which are not numbers here.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return FieldValue::Invalid;
    }
    trimmed
        .parse::<f64>()
        .map_or(FieldValue::Invalid, FieldValue::Number)
}

/// Unsigned hexadecimal, octal, or binary literal.
fn parse_prefixed(text: &str) -> Option<FieldValue> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = text.get(2..)?;
    Some(match u128::from_str_radix(digits, radix) {
        Ok(value) if !digits.starts_with('+') => FieldValue::Number(value as f64),
        _ => FieldValue::Invalid,
    })
}

fn in_range(range: &RangeInclusive<i64>, value: f64) -> bool {
    (*range.start() as f64..=*range.end() as f64).contains(&value)
}

/// Whole number that fits an `i32`.
fn whole(value: f64) -> Result<i32, ReadingRejection> {
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(ReadingRejection::NotNumeric);
    }
    Ok(value as i32)
}

/// Check a raw reading and normalise it.
///
/// # Errors
/// Returns the first [`ReadingRejection`] that applies.
///
/// # Examples
/// ```
/// use bp_backend::domain::{RawReading, ReadingRejection, validate_reading};
/// use serde_json::json;
///
/// let accepted = validate_reading(&RawReading {
///     systolic: Some(json!(120)),
///     diastolic: Some(json!("80")),
///     pulse: None,
/// })
/// .expect("reading accepted");
/// assert_eq!(accepted.diastolic(), 80);
///
/// let rejected = validate_reading(&RawReading {
///     systolic: Some(json!(0)),
///     diastolic: Some(json!(80)),
///     pulse: None,
/// });
/// assert_eq!(rejected, Err(ReadingRejection::MissingRequiredField));
/// ```
pub fn validate_reading(raw: &RawReading) -> Result<ValidatedReading, ReadingRejection> {
    let systolic = FieldValue::interpret(raw.systolic.as_ref());
    let diastolic = FieldValue::interpret(raw.diastolic.as_ref());
    let pulse = FieldValue::interpret(raw.pulse.as_ref());

    let (systolic, diastolic) = match (systolic, diastolic) {
        (FieldValue::Absent, _) | (_, FieldValue::Absent) => {
            return Err(ReadingRejection::MissingRequiredField);
        }
        (FieldValue::Number(sys), FieldValue::Number(dia)) => (sys, dia),
        _ => return Err(ReadingRejection::NotNumeric),
    };

    let pulse = match pulse {
        FieldValue::Absent => None,
        FieldValue::Number(pul) => Some(pul),
        FieldValue::Invalid => return Err(ReadingRejection::NotNumeric),
    };

    if !in_range(&SYSTOLIC_RANGE, systolic) || !in_range(&DIASTOLIC_RANGE, diastolic) {
        return Err(ReadingRejection::OutOfRange);
    }

    Ok(ValidatedReading {
        systolic: whole(systolic)?,
        diastolic: whole(diastolic)?,
        pulse: pulse.map(whole).transpose()?,
    })
}
