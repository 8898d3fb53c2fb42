//! NSEC/CSYNC type-bitmap scanning (spec.md §4.5 "NSEC type bitmap"),
//! grounded on `original_source/src/nsec.h`: types are grouped into 256-type
//! windows, each window encoded as `window_number ++ bitmap_length ++
//! bitmap`, trailing zero bytes trimmed from each window's bitmap.

use bstr::ByteSlice;

use crate::error::{Position, ZoneError};
use crate::symbols::{parse_type, RRType};

/// Encodes a list of present type codes (from a space-separated list of
/// type mnemonics) into the RFC 4034 §4.1.2 windowed bitmap form.
pub fn scan_type_bitmap(tokens: &[&[u8]], position: &Position) -> Result<Vec<u8>, ZoneError> {
    let mut codes = Vec::with_capacity(tokens.len());
    for token in tokens {
        let rtype = parse_type(token).ok_or_else(|| {
            ZoneError::syntax(position.clone(), format!("unknown type mnemonic in bitmap: {}", token.escape_bytes()))
        })?;
        codes.push(rtype.code());
    }
    codes.sort_unstable();
    codes.dedup();

    let mut out = Vec::new();
    let mut i = 0;
    while i < codes.len() {
        let window = (codes[i] >> 8) as u8;
        let mut bitmap = [0u8; 32];
        let mut highest = 0usize;
        while i < codes.len() && (codes[i] >> 8) as u8 == window {
            let lo = (codes[i] & 0xff) as usize;
            bitmap[lo / 8] |= 0x80 >> (lo % 8);
            highest = lo / 8;
            i += 1;
        }
        out.push(window);
        out.push((highest + 1) as u8);
        out.extend_from_slice(&bitmap[..=highest]);
    }
    Ok(out)
}

/// Decodes a wire-format type bitmap back into type codes, for tests and
/// for round-tripping through `RRType` in diagnostics.
pub fn decode_type_bitmap(wire: &[u8]) -> Vec<RRType> {
    let mut types = Vec::new();
    let mut i = 0;
    while i + 2 <= wire.len() {
        let window = wire[i] as u16;
        let len = wire[i + 1] as usize;
        let bitmap = &wire[i + 2..i + 2 + len.min(wire.len() - i - 2)];
        for (byte_idx, &byte) in bitmap.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) != 0 {
                    let code = (window << 8) | ((byte_idx * 8 + bit) as u16);
                    types.push(RRType::from_code(code));
                }
            }
        }
        i += 2 + len;
    }
    types
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
    fn single_window_round_trips() {
        let wire = scan_type_bitmap(&[b"A", b"MX", b"RRSIG", b"NSEC"], &pos()).unwrap();
        let mut decoded: Vec<_> = decode_type_bitmap(&wire).into_iter().map(RRType::code).collect();
        decoded.sort_unstable();
        let mut expected = vec![RRType::A.code(), RRType::Mx.code(), RRType::Rrsig.code(), RRType::Nsec.code()];
        expected.sort_unstable();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn trailing_zero_bytes_are_trimmed() {
        let wire = scan_type_bitmap(&[b"A"], &pos()).unwrap();
        // window 0, length 1 (A=1 fits in the first byte), one bitmap byte.
        assert_eq!(wire, vec![0, 1, 0x40]);
    }

    #[test]
    fn unknown_mnemonic_is_error() {
        assert!(scan_type_bitmap(&[b"NOTAREALTYPE"], &pos()).is_err());
    }
}
