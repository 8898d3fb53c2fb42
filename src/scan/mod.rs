//! Field scanners (spec.md §4.5): text-to-wire conversion for the
//! primitive field types the per-type validators assemble records from.

mod base;
mod ip;
mod nsec;
mod svcb;
mod time;
mod ttl;

pub use base::{scan_base16, scan_base32, scan_base64};
pub use ip::{scan_ipv4, scan_ipv6};
pub use nsec::scan_type_bitmap;
pub use svcb::scan_svcb_params;
pub use time::scan_timestamp;
pub use ttl::scan_ttl;

use crate::error::{Position, ZoneError};

/// Unescapes a presentation-form character-string (quoted or bare token)
/// into its raw octets, per RFC 1035 §5.1's `\DDD`/`\c` escapes. Shared by
/// every scanner that consumes free text (TXT, HINFO, NAPTR flags, etc).
pub fn unescape_text(text: &[u8], position: &Position) -> Result<Vec<u8>, ZoneError> {
    let mut out = Vec::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i] == b'\\' {
            if i + 3 < text.len() && text[i + 1..i + 4].iter().all(u8::is_ascii_digit) {
                let v: u32 = std::str::from_utf8(&text[i + 1..i + 4])
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| ZoneError::syntax(position.clone(), "invalid \\DDD escape"))?;
                if v > 255 {
                    return Err(ZoneError::syntax(position.clone(), "\\DDD escape out of range"));
                }
                out.push(v as u8);
                i += 4;
                continue;
            }
            if i + 1 < text.len() {
                out.push(text[i + 1]);
                i += 2;
                continue;
            }
            return Err(ZoneError::syntax(position.clone(), "dangling escape at end of text"));
        }
        out.push(text[i]);
        i += 1;
    }
    Ok(out)
}

/// Scans a single RFC 1035 `<character-string>`: length byte followed by up
/// to 255 octets, written as `len ++ octets` into `out`.
pub fn scan_character_string(text: &[u8], position: &Position, out: &mut Vec<u8>) -> Result<(), ZoneError> {
    let octets = unescape_text(text, position)?;
    if octets.len() > 255 {
        return Err(ZoneError::syntax(position.clone(), "character-string exceeds 255 octets"));
    }
    out.push(octets.len() as u8);
    out.extend_from_slice(&octets);
    Ok(())
}
