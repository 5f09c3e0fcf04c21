//! Pure string-to-value conversions, one per supported leaf kind.
//!
//! Each function returns the parsed value or a short reason naming the
//! expected shape. Reasons never contain the raw value; the caller attaches
//! it (or not, for secrets) when the failure is recorded.

use num_bigint::BigInt;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Accepts exactly `true` or `false`
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(r#"must be "true" or "false""#.to_string()),
    }
}

/// Base-10 signed integer of the platform's native width
pub fn parse_int(value: &str) -> Result<isize, String> {
    value.parse().map_err(|_| "must be an int".to_string())
}

/// Base-10 unsigned integer of a fixed bit width
///
/// Out-of-range values report the type's maximum, negative numbers report
/// the minimum of 0, and anything else is reported as the wrong shape.
pub fn parse_uint<T>(value: &str, bits: u32) -> Result<T, String>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    match value.parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            Err(format!("has a max value of {}", uint_max(bits)))
        }
        Err(_) if value.parse::<i128>().is_ok() => Err("has a min value of 0".to_string()),
        Err(_) => Err(format!("must be a uint{bits}")),
    }
}

fn uint_max(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Base-10 arbitrary-precision integer with an optional leading sign
pub fn parse_big_int(value: &str) -> Result<BigInt, String> {
    let reason = || "must be a base-10 big integer".to_string();
    // num-bigint tolerates `_` separators, which are not base-10 digits
    if value.contains('_') {
        return Err(reason());
    }
    BigInt::parse_bytes(value.as_bytes(), 10).ok_or_else(reason)
}

/// Splits on `,` with no escaping; the empty string is the empty list
pub fn parse_string_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

/// Splits on `,` and parses every element as an int
///
/// Only the first bad element is reported.
pub fn parse_int_list(value: &str) -> Result<Vec<isize>, String> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .enumerate()
        .map(|(index, element)| {
            element.parse().map_err(|_| {
                format!("must be a comma-separated list of ints: index {index} is invalid")
            })
        })
        .collect()
}
