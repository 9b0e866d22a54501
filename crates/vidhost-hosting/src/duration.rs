//! ISO 8601 duration parsing
//!
//! Providers report durations such as `PT12H30M5S`. Only the units that map to
//! a fixed number of seconds are accepted (weeks, days, hours, minutes,
//! seconds). The `P` and `T` designators are optional: in the bare form
//! (`12H30M5S`) `M` means minutes.

use thiserror::Error;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("unsupported duration unit {unit:?} in {input:?}")]
    UnsupportedUnit { unit: char, input: String },
}

/// Convert an ISO 8601 duration to whole seconds. Fractional seconds are truncated.
pub fn iso8601_to_seconds(input: &str) -> Result<u64, DurationError> {
    let trimmed = input.trim();
    let (has_period, body) = match trimmed.strip_prefix('P') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return Err(DurationError::Empty);
    }

    let (date_part, time_part) = match body.split_once('T') {
        Some((date, time)) => (date, time),
        None if has_period => (body, ""),
        // Bare form such as "12H30M5S": everything is read as time units
        None => ("", body),
    };

    let mut total = 0u64;
    total = total
        .checked_add(sum_components(date_part, input, true)?)
        .ok_or_else(|| DurationError::Invalid(input.to_string()))?;
    total = total
        .checked_add(sum_components(time_part, input, false)?)
        .ok_or_else(|| DurationError::Invalid(input.to_string()))?;
    Ok(total)
}

fn sum_components(part: &str, input: &str, date_only: bool) -> Result<u64, DurationError> {
    let mut total = 0u64;
    let mut number = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            number.push(c);
            continue;
        }

        if number.is_empty() {
            return Err(DurationError::Invalid(input.to_string()));
        }

        let unit = match (c, date_only) {
            ('W', _) => WEEK,
            ('D', _) => DAY,
            ('H', false) => HOUR,
            ('M', false) => MINUTE,
            ('S', false) => 1,
            _ => {
                return Err(DurationError::UnsupportedUnit {
                    unit: c,
                    input: input.to_string(),
                })
            }
        };

        // Fractions are only meaningful on seconds; keep the integral part
        let integral = number
            .split(['.', ','])
            .next()
            .unwrap_or_default();
        let value: u64 = if integral.is_empty() {
            0
        } else {
            integral
                .parse()
                .map_err(|_| DurationError::Invalid(input.to_string()))?
        };

        total = value
            .checked_mul(unit)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| DurationError::Invalid(input.to_string()))?;
        number.clear();
    }

    if !number.is_empty() {
        return Err(DurationError::Invalid(input.to_string()));
    }

    Ok(total)
}
