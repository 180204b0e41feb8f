// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Conversion of Cosmos SDK `Dec` values to canonical decimal strings.
//!
//! On the gRPC wire a `Dec` travels as its integer mantissa, scaled by
//! `10^18`, e.g. `1500000000000000000` for `1.5`. Some nodes already send
//! the human form with a decimal point; both are accepted.

use crate::error::{UpstreamError, UpstreamResult};

/// Fractional digits carried by a `Dec`
pub const DEC_PRECISION: usize = 18;

/// Convert a `Dec` mantissa string to a decimal string with 18 fractional digits.
///
/// An empty value is read as zero. A value that already contains a decimal
/// point is validated and returned unchanged.
pub fn dec_mantissa_to_string(raw: &str) -> UpstreamResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(format!("0.{}", "0".repeat(DEC_PRECISION)));
    }

    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    if let Some((int_part, frac_part)) = body.split_once('.') {
        let empty = int_part.is_empty() && frac_part.is_empty();
        if empty || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(UpstreamError::InvalidDecimal(raw.to_string()));
        }
        return Ok(raw.to_string());
    }

    if body.is_empty() || !all_digits(body) {
        return Err(UpstreamError::InvalidDecimal(raw.to_string()));
    }

    let padded = format!("{:0>width$}", body, width = DEC_PRECISION + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - DEC_PRECISION);
    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let is_zero = int_part == "0" && frac_part.bytes().all(|b| b == b'0');
    let sign = if negative && !is_zero { "-" } else { "" };
    Ok(format!("{sign}{int_part}.{frac_part}"))
}

/// Convert a `bytes` field holding a UTF-8 `Dec` mantissa
pub fn dec_bytes_to_string(raw: &[u8]) -> UpstreamResult<String> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| UpstreamError::Decode(format!("Dec bytes are not UTF-8: {e}")))?;
    dec_mantissa_to_string(text)
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mantissa_scaled_by_precision() {
        assert_eq!(
            dec_mantissa_to_string("1500000000000000000").unwrap(),
            "1.500000000000000000"
        );
        assert_eq!(
            dec_mantissa_to_string("1000000000000000000000000").unwrap(),
            "1000000.000000000000000000"
        );
    }

    #[test]
    fn test_small_mantissa_is_left_padded() {
        // 0.13 inflation
        assert_eq!(
            dec_mantissa_to_string("130000000000000000").unwrap(),
            "0.130000000000000000"
        );
        assert_eq!(dec_mantissa_to_string("7").unwrap(), "0.000000000000000007");
    }

    #[test]
    fn test_negative_and_zero() {
        assert_eq!(
            dec_mantissa_to_string("-2500000000000000000").unwrap(),
            "-2.500000000000000000"
        );
        assert_eq!(dec_mantissa_to_string("-0").unwrap(), "0.000000000000000000");
        assert_eq!(dec_mantissa_to_string("").unwrap(), "0.000000000000000000");
    }

    #[test]
    fn test_human_form_passes_through() {
        assert_eq!(dec_mantissa_to_string("0.131").unwrap(), "0.131");
        assert_eq!(dec_mantissa_to_string("42.").unwrap(), "42.");
    }

    #[test]
    fn test_invalid_values_rejected() {
        for raw in ["abc", "1e18", "1.2.3", "-", ".", "12 34"] {
            assert!(
                matches!(dec_mantissa_to_string(raw), Err(UpstreamError::InvalidDecimal(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_bytes_variant() {
        assert_eq!(
            dec_bytes_to_string(b"245000000000000000000000").unwrap(),
            "245000.000000000000000000"
        );
        assert!(matches!(
            dec_bytes_to_string(&[0xff, 0xfe]),
            Err(UpstreamError::Decode(_))
        ));
    }

    #[test]
    fn test_result_parses_as_float() {
        let value: f64 = dec_mantissa_to_string("130000000000000000")
            .unwrap()
            .parse()
            .unwrap();
        assert!((value - 0.13).abs() < 1e-12);
    }
}
