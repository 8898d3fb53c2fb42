//! SVCB/HTTPS `SvcParam` scanning (spec.md §4.5 "SVCB parameters", RFC
//! 9460 §2.1). Key codes are grounded on
//! `original_source/src/generic/svcb.h`.

use crate::error::{Position, ZoneError};
use crate::scan::{scan_ipv4, scan_ipv6, unescape_text};

const MANDATORY: u16 = 0;
const ALPN: u16 = 1;
const NO_DEFAULT_ALPN: u16 = 2;
const PORT: u16 = 3;
const IPV4HINT: u16 = 4;
const ECH: u16 = 5;
const IPV6HINT: u16 = 6;
const DOHPATH: u16 = 7;
const OHTTP: u16 = 8;

fn key_code(name: &str) -> Option<u16> {
    Some(match name.to_ascii_lowercase().as_str() {
        "mandatory" => MANDATORY,
        "alpn" => ALPN,
        "no-default-alpn" => NO_DEFAULT_ALPN,
        "port" => PORT,
        "ipv4hint" => IPV4HINT,
        "ech" => ECH,
        "ipv6hint" => IPV6HINT,
        "dohpath" => DOHPATH,
        "ohttp" => OHTTP,
        other if other.starts_with("key") => other[3..].parse().ok()?,
        _ => return None,
    })
}

fn split_commas(value: &[u8]) -> Vec<&[u8]> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < value.len() {
        if value[i] == b'\\' && i + 1 < value.len() {
            i += 2;
            continue;
        }
        if value[i] == b',' {
            parts.push(&value[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    parts.push(&value[start..]);
    parts
}

fn encode_value(key: u16, value: &[u8], has_equals: bool, position: &Position) -> Result<Vec<u8>, ZoneError> {
    match key {
        MANDATORY => {
            let mut out = Vec::new();
            for part in split_commas(value) {
                let text = std::str::from_utf8(part).map_err(|_| ZoneError::syntax(position.clone(), "invalid mandatory key list"))?;
                let code = key_code(text).ok_or_else(|| ZoneError::syntax(position.clone(), format!("unknown SvcParamKey: {text}")))?;
                out.extend_from_slice(&code.to_be_bytes());
            }
            Ok(out)
        }
        ALPN => {
            let mut out = Vec::new();
            for part in split_commas(value) {
                let octets = unescape_text(part, position)?;
                if octets.len() > 255 {
                    return Err(ZoneError::syntax(position.clone(), "alpn-id exceeds 255 octets"));
                }
                out.push(octets.len() as u8);
                out.extend_from_slice(&octets);
            }
            Ok(out)
        }
        NO_DEFAULT_ALPN | OHTTP => {
            if has_equals {
                return Err(ZoneError::syntax(position.clone(), "key takes no value"));
            }
            Ok(Vec::new())
        }
        PORT => {
            let text = std::str::from_utf8(value).map_err(|_| ZoneError::syntax(position.clone(), "invalid port"))?;
            let port: u16 = text.parse().map_err(|_| ZoneError::syntax(position.clone(), "invalid port"))?;
            Ok(port.to_be_bytes().to_vec())
        }
        IPV4HINT => {
            let mut out = Vec::new();
            for part in split_commas(value) {
                out.extend_from_slice(&scan_ipv4(part, position)?);
            }
            Ok(out)
        }
        IPV6HINT => {
            let mut out = Vec::new();
            for part in split_commas(value) {
                out.extend_from_slice(&scan_ipv6(part, position)?);
            }
            Ok(out)
        }
        ECH => crate::scan::scan_base64(value, position),
        DOHPATH => unescape_text(value, position),
        _ => unescape_text(value, position),
    }
}

/// Parses the space-separated `key[=value]` tokens following an SVCB/HTTPS
/// record's target name into wire-format `SvcParam`s. In strict mode (the
/// default -- relaxed by `Options.secondary`), enforces RFC 9460 §2.2: keys
/// must appear on the wire in strictly increasing numeric order -- if the
/// input lists them out of order, they are reordered rather than rejected,
/// matching `parse_svc_params_strict`'s insertion-sort-into-place behavior --
/// with no repeats, and every key number listed in a `mandatory` parameter
/// must itself be present in the set.
pub fn scan_svcb_params(tokens: &[&[u8]], strict: bool, position: &Position) -> Result<Vec<u8>, ZoneError> {
    let mut seen = Vec::new();
    let mut params: Vec<(u16, Vec<u8>)> = Vec::new();
    let mut mandatory_keys: Vec<u16> = Vec::new();

    for token in tokens {
        let (key_part, has_equals, value_part): (&[u8], bool, &[u8]) = match token.iter().position(|&b| b == b'=') {
            Some(idx) => (&token[..idx], true, &token[idx + 1..]),
            None => (&token[..], false, &[][..]),
        };
        let key_text = std::str::from_utf8(key_part).map_err(|_| ZoneError::syntax(position.clone(), "invalid SvcParamKey"))?;
        let key = key_code(key_text).ok_or_else(|| ZoneError::syntax(position.clone(), format!("unknown SvcParamKey: {key_text}")))?;

        if strict && seen.contains(&key) {
            return Err(ZoneError::syntax(position.clone(), format!("duplicate SvcParamKey {key}")));
        }
        seen.push(key);

        let value = if value_part.first() == Some(&b'"') && value_part.last() == Some(&b'"') && value_part.len() >= 2 {
            &value_part[1..value_part.len() - 1]
        } else {
            value_part
        };
        let encoded = encode_value(key, value, has_equals, position)?;

        if key == MANDATORY {
            let mut i = 0;
            while i + 2 <= encoded.len() {
                mandatory_keys.push(u16::from_be_bytes([encoded[i], encoded[i + 1]]));
                i += 2;
            }
        }

        params.push((key, encoded));
    }

    if strict {
        for key in &mandatory_keys {
            if !seen.contains(key) {
                return Err(ZoneError::syntax(
                    position.clone(),
                    format!("mandatory key {key} is not present in the parameter set"),
                ));
            }
        }
        params.sort_by_key(|(key, _)| *key);
    }

    let mut out = Vec::new();
    for (key, encoded) in &params {
        out.extend_from_slice(&key.to_be_bytes());
        out.extend_from_slice(&(encoded.len() as u16).to_be_bytes());
        out.extend_from_slice(encoded);
    }
    Ok(out)
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
    fn port_and_alpn() {
        let wire = scan_svcb_params(&[b"alpn=h2", b"port=8443"], true, &pos()).unwrap();
        assert_eq!(wire[0..2], 1u16.to_be_bytes());
        assert!(wire.len() > 4);
    }

    #[test]
    fn out_of_order_keys_are_reordered_in_strict_mode() {
        let wire = scan_svcb_params(&[b"port=80", b"alpn=h2"], true, &pos()).unwrap();
        assert_eq!(wire[0..2], ALPN.to_be_bytes());
        let alpn_len = u16::from_be_bytes([wire[2], wire[3]]) as usize;
        let port_key_at = 4 + alpn_len;
        assert_eq!(wire[port_key_at..port_key_at + 2], PORT.to_be_bytes());
    }

    #[test]
    fn void_valued_key_with_trailing_equals_is_rejected() {
        assert!(scan_svcb_params(&[b"no-default-alpn="], true, &pos()).is_err());
        assert!(scan_svcb_params(&[b"no-default-alpn"], true, &pos()).is_ok());
    }

    #[test]
    fn out_of_order_keys_allowed_when_relaxed() {
        assert!(scan_svcb_params(&[b"port=80", b"alpn=h2"], false, &pos()).is_ok());
    }

    #[test]
    fn mandatory_key_must_be_present() {
        assert!(scan_svcb_params(&[b"mandatory=port"], true, &pos()).is_err());
        assert!(scan_svcb_params(&[b"mandatory=port", b"port=80"], true, &pos()).is_ok());
    }

    #[test]
    fn duplicate_key_rejected() {
        assert!(scan_svcb_params(&[b"port=80", b"port=81"], true, &pos()).is_err());
    }
}
