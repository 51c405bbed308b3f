//! Number decoders tolerant of the backend's string/null encodings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64(self) -> Result<Option<f64>, String> {
        match self {
            Self::Number(value) => Ok(Some(value)),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .replace(',', ".")
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| format!("invalid number: {trimmed}"))
            }
        }
    }
}

fn decode<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(raw) => raw.into_f64().map_err(D::Error::custom),
        None => Ok(None),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u32<E: serde::de::Error>(value: f64) -> Result<u32, E> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(E::custom(format!("expected a non-negative integer, got {value}")))
    }
}

/// Decode a float that may be a number, a numeric string, or null (→ 0).
///
/// # Errors
/// Fails when a string is present but not numeric.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decode(deserializer)?.unwrap_or(0.0))
}

/// Decode an optional float; null and blank strings become `None`.
///
/// # Errors
/// Fails when a string is present but not numeric.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    decode(deserializer)
}

/// Decode a required non-negative integer from a number or numeric string.
///
/// # Errors
/// Fails on null, blank, fractional or negative input.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = decode(deserializer)?.ok_or_else(|| D::Error::custom("missing integer"))?;
    to_u32(value)
}

/// Decode an optional non-negative integer; null and blank strings become `None`.
///
/// # Errors
/// Fails on fractional or negative input.
pub fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    decode(deserializer)?.map(to_u32).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_f64")]
        amount: f64,
        #[serde(default, deserialize_with = "lenient_opt_u32")]
        days: Option<u32>,
    }

    #[test]
    fn decimal_comma_strings_parse() {
        let probe: Probe = serde_json::from_value(json!({ "amount": "10,5" })).expect("decode");
        assert!((probe.amount - 10.5).abs() < f64::EPSILON);
        assert_eq!(probe.days, None);
    }

    #[test]
    fn null_amount_is_zero() {
        let probe: Probe =
            serde_json::from_value(json!({ "amount": null, "days": "" })).expect("decode");
        assert!(probe.amount.abs() < f64::EPSILON);
        assert_eq!(probe.days, None);
    }

    #[test]
    fn fractional_days_are_rejected() {
        let result = serde_json::from_value::<Probe>(json!({ "days": 1.5 }));
        assert!(result.is_err());
    }
}
