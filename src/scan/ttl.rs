//! TTL-with-units scanning (spec.md §4.5 "TTL"), grounded on
//! `original_source/src/parser.h`'s `scan_ttl`: units `s`/`m`/`h`/`d`/`w`
//! multiply the preceding digit run, units must appear in strictly
//! decreasing magnitude (`1h30m` is valid, `1m1h` is not), and the total
//! must not exceed `i32::MAX` seconds.

use crate::error::{Position, ZoneError};

const UNITS: &[(u8, u64)] = &[(b'w', 604_800), (b'd', 86_400), (b'h', 3_600), (b'm', 60), (b's', 1)];

/// Parses a bare integer (no unit) as plain seconds, or a `1h30m`-style
/// duration. Returns the TTL in seconds, capped at `i32::MAX`.
pub fn scan_ttl(text: &[u8], position: &Position) -> Result<u32, ZoneError> {
    if text.is_empty() {
        return Err(ZoneError::syntax(position.clone(), "empty TTL"));
    }

    if text.iter().all(u8::is_ascii_digit) {
        let v: u64 = std::str::from_utf8(text)
            .unwrap()
            .parse()
            .map_err(|_| ZoneError::syntax(position.clone(), "TTL overflows 32 bits"))?;
        if v > i32::MAX as u64 {
            return Err(ZoneError::semantic(position.clone(), "TTL exceeds 2147483647 seconds"));
        }
        return Ok(v as u32);
    }

    let mut total: u64 = 0;
    let mut digits: u64 = 0;
    let mut have_digits = false;
    let mut last_unit_rank = UNITS.len();

    for &b in text {
        if b.is_ascii_digit() {
            digits = digits
                .checked_mul(10)
                .and_then(|d| d.checked_add((b - b'0') as u64))
                .ok_or_else(|| ZoneError::syntax(position.clone(), "TTL overflows 32 bits"))?;
            have_digits = true;
            continue;
        }
        let rank = UNITS
            .iter()
            .position(|&(u, _)| u == b.to_ascii_lowercase())
            .ok_or_else(|| ZoneError::syntax(position.clone(), "invalid TTL unit"))?;
        if !have_digits {
            return Err(ZoneError::syntax(position.clone(), "TTL unit without a preceding number"));
        }
        if rank <= last_unit_rank && last_unit_rank != UNITS.len() {
            return Err(ZoneError::syntax(
                position.clone(),
                "TTL units must decrease in magnitude (e.g. 1h30m, not 1m1h)",
            ));
        }
        last_unit_rank = rank;
        total = total
            .checked_add(digits * UNITS[rank].1)
            .ok_or_else(|| ZoneError::syntax(position.clone(), "TTL overflows 32 bits"))?;
        digits = 0;
        have_digits = false;
    }

    if have_digits {
        return Err(ZoneError::syntax(position.clone(), "trailing digits without a unit"));
    }
    if total > i32::MAX as u64 {
        return Err(ZoneError::semantic(position.clone(), "TTL exceeds 2147483647 seconds"));
    }
    Ok(total as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::rc::Rc;

    fn pos() -> Position {
        Position::new(Rc::from(Path::new("test")), 1)
    }

    #[test]
    fn bare_seconds() {
        assert_eq!(scan_ttl(b"3600", &pos()).unwrap(), 3600);
    }

    #[test]
    fn decreasing_units_combine() {
        assert_eq!(scan_ttl(b"1h30m", &pos()).unwrap(), 5400);
    }

    #[test]
    fn increasing_units_reject() {
        assert!(scan_ttl(b"1m1h", &pos()).is_err());
    }

    #[test]
    fn repeated_unit_rejects() {
        assert!(scan_ttl(b"1m1m", &pos()).is_err());
        assert!(scan_ttl(b"1s1m", &pos()).is_err());
    }

    #[test]
    fn week_and_day() {
        assert_eq!(scan_ttl(b"1w2d", &pos()).unwrap(), 604_800 + 2 * 86_400);
    }

    #[test]
    fn overflow_is_a_semantic_error() {
        use crate::error::ZoneError;
        let err = scan_ttl(b"2147483648", &pos()).unwrap_err();
        assert!(matches!(err, ZoneError::Semantic { .. }));

        let err = scan_ttl(b"4000w", &pos()).unwrap_err();
        assert!(matches!(err, ZoneError::Semantic { .. }));
    }
}
