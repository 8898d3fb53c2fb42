//! RDATA assemblers for types without a natural home elsewhere (spec.md
//! §4.6). Field orderings grounded on their defining RFCs and on
//! `original_source/src/generic/*.h`.

use crate::error::ZoneError;
use crate::scan::{scan_base16, scan_base64, unescape_text};

use super::FieldCursor;

pub fn srv(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let priority = c.u16()?;
    let weight = c.u16()?;
    let port = c.u16()?;
    let target = c.name()?;
    c.finish()?;
    let mut out = Vec::with_capacity(6 + target.len());
    out.extend_from_slice(&priority.to_be_bytes());
    out.extend_from_slice(&weight.to_be_bytes());
    out.extend_from_slice(&port.to_be_bytes());
    out.extend_from_slice(target.as_wire());
    Ok(out)
}

pub fn naptr(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let order = c.u16()?;
    let preference = c.u16()?;
    let mut out = order.to_be_bytes().to_vec();
    out.extend_from_slice(&preference.to_be_bytes());
    c.character_string(&mut out)?;
    c.character_string(&mut out)?;
    c.character_string(&mut out)?;
    let replacement = c.name()?;
    c.finish()?;
    out.extend_from_slice(replacement.as_wire());
    Ok(out)
}

pub fn cert(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let cert_type = c.u16()?;
    let key_tag = c.u16()?;
    let algorithm = c.u8()?;
    let remaining = c.rest();
    if remaining.is_empty() {
        return Err(ZoneError::syntax(c.position.clone(), "CERT requires certificate data"));
    }
    let joined: Vec<u8> = remaining.iter().flat_map(|f| f.iter().copied()).collect();
    let cert = scan_base64(&joined, c.position)?;
    let mut out = cert_type.to_be_bytes().to_vec();
    out.extend_from_slice(&key_tag.to_be_bytes());
    out.push(algorithm);
    out.extend_from_slice(&cert);
    Ok(out)
}

/// Address Prefix List (RFC 3123): a list of `[!]afi:address/prefix`
/// fields, one `apitem` per field.
pub fn apl(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let mut out = Vec::new();
    for field in c.rest() {
        let text = std::str::from_utf8(field).map_err(|_| ZoneError::syntax(c.position.clone(), "invalid APL item"))?;
        let (negated, text) = match text.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let mut parts = text.splitn(2, ':');
        let afi: u16 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(|| ZoneError::syntax(c.position.clone(), "invalid APL afi"))?;
        let rest = parts.next().ok_or_else(|| ZoneError::syntax(c.position.clone(), "APL item missing address/prefix"))?;
        let mut addr_parts = rest.splitn(2, '/');
        let addr_text = addr_parts.next().unwrap();
        let prefix: u8 = addr_parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ZoneError::syntax(c.position.clone(), "invalid APL prefix length"))?;

        let addr_bytes = match afi {
            1 => crate::scan::scan_ipv4(addr_text.as_bytes(), c.position)?.to_vec(),
            2 => crate::scan::scan_ipv6(addr_text.as_bytes(), c.position)?.to_vec(),
            _ => return Err(ZoneError::syntax(c.position.clone(), "unsupported APL address family")),
        };
        let significant = trim_trailing_zero_bytes(&addr_bytes);
        let mut afdlength = significant.len() as u8;
        if negated {
            afdlength |= 0x80;
        }
        out.extend_from_slice(&afi.to_be_bytes());
        out.push(prefix);
        out.push(afdlength);
        out.extend_from_slice(significant);
    }
    Ok(out)
}

fn trim_trailing_zero_bytes(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == 0 {
        end -= 1;
    }
    &bytes[..end]
}

pub fn loc(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    // LOC's presentation form (RFC 1876 §3) is free-form ("51 30 12.748 N
    // 0 7 39.612 W 0.00m 0.00m 0.00m 0.00m"), not one field per wire
    // component, so it is parsed from the raw remaining text rather than a
    // single FieldCursor field per value.
    let remaining = c.rest();
    let mut text: Vec<u8> = Vec::new();
    for (i, field) in remaining.iter().enumerate() {
        if i > 0 {
            text.push(b' ');
        }
        text.extend_from_slice(field);
    }
    let text = std::str::from_utf8(&text).map_err(|_| ZoneError::syntax(c.position.clone(), "invalid LOC record"))?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut i = 0;

    let (lat, next) = parse_loc_coordinate(&tokens, i, c)?;
    i = next;
    let (lon, next) = parse_loc_coordinate(&tokens, i, c)?;
    i = next;
    let altitude = parse_loc_size(tokens.get(i).copied().unwrap_or("0"), c)?;
    i += 1;
    let size = parse_loc_size_opt(tokens.get(i).copied(), 100, c)?;
    i += tokens.get(i).map_or(0, |_| 1);
    let hprec = parse_loc_size_opt(tokens.get(i).copied(), 1_000_000, c)?;
    i += tokens.get(i).map_or(0, |_| 1);
    let vprec = parse_loc_size_opt(tokens.get(i).copied(), 1_000_000, c)?;

    let mut out = vec![0u8]; // version
    out.push(encode_loc_precision(size));
    out.push(encode_loc_precision(hprec));
    out.push(encode_loc_precision(vprec));
    out.extend_from_slice(&lat.to_be_bytes());
    out.extend_from_slice(&lon.to_be_bytes());
    out.extend_from_slice(&altitude.to_be_bytes());
    Ok(out)
}

fn parse_loc_coordinate(tokens: &[&str], mut i: usize, c: &FieldCursor) -> Result<(u32, usize), ZoneError> {
    let err = || ZoneError::syntax(c.position.clone(), "invalid LOC coordinate");
    let deg: f64 = tokens.get(i).ok_or_else(err)?.parse().map_err(|_| err())?;
    i += 1;
    let mut min = 0.0;
    let mut sec = 0.0;
    // Degrees may be followed by minutes, then seconds, before the hemisphere letter.
    if let Some(next) = tokens.get(i) {
        if next.parse::<f64>().is_ok() {
            min = next.parse().unwrap();
            i += 1;
            if let Some(next) = tokens.get(i) {
                if next.parse::<f64>().is_ok() {
                    sec = next.parse().unwrap();
                    i += 1;
                }
            }
        }
    }
    let hemisphere = tokens.get(i).ok_or_else(err)?;
    i += 1;
    let sign = match hemisphere.to_ascii_uppercase().as_str() {
        "N" | "E" => 1.0,
        "S" | "W" => -1.0,
        _ => return Err(err()),
    };
    let total_seconds = sign * (deg * 3600.0 + min * 60.0 + sec);
    let milliseconds = (total_seconds * 1000.0).round() as i64;
    let value = (1u64 << 31) as i64 + milliseconds;
    Ok((value as u32, i))
}

fn parse_loc_size(text: &str, c: &FieldCursor) -> Result<u32, ZoneError> {
    let text = text.trim_end_matches('m');
    let meters: f64 = text.parse().map_err(|_| ZoneError::syntax(c.position.clone(), "invalid LOC altitude/size"))?;
    Ok(((meters + 100_000.0) * 100.0).round() as u32)
}

fn parse_loc_size_opt(text: Option<&str>, default_cm: u32, c: &FieldCursor) -> Result<u32, ZoneError> {
    match text {
        Some(t) => {
            let trimmed = t.trim_end_matches('m');
            let meters: f64 = trimmed.parse().map_err(|_| ZoneError::syntax(c.position.clone(), "invalid LOC precision field"))?;
            Ok((meters * 100.0).round() as u32)
        }
        None => Ok(default_cm),
    }
}

fn encode_loc_precision(centimeters: u32) -> u8 {
    let mut value = centimeters;
    let mut exponent = 0u8;
    while value > 9 {
        value /= 10;
        exponent += 1;
    }
    ((value as u8) << 4) | exponent
}

pub fn sshfp(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let algorithm = c.u8()?;
    let fp_type = c.u8()?;
    let fingerprint_field = c.next()?;
    c.finish()?;
    let fingerprint = scan_base16(fingerprint_field, c.position)?;
    let mut out = vec![algorithm, fp_type];
    out.extend_from_slice(&fingerprint);
    Ok(out)
}

pub fn ipseckey(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let precedence = c.u8()?;
    let gateway_type = c.u8()?;
    let algorithm = c.u8()?;
    let gateway_field = c.next()?;
    let mut out = vec![precedence, gateway_type, algorithm];
    match gateway_type {
        0 => {
            if gateway_field != b"." {
                return Err(ZoneError::syntax(c.position.clone(), "IPSECKEY gateway type 0 requires '.'"));
            }
        }
        1 => out.extend_from_slice(&crate::scan::scan_ipv4(gateway_field, c.position)?),
        2 => out.extend_from_slice(&crate::scan::scan_ipv6(gateway_field, c.position)?),
        3 => {
            let name = crate::name::scan_name(gateway_field, c.origin, c.position)?;
            out.extend_from_slice(name.as_wire());
        }
        _ => return Err(ZoneError::syntax(c.position.clone(), "unsupported IPSECKEY gateway type")),
    }
    let remaining = c.rest();
    if !remaining.is_empty() {
        let joined: Vec<u8> = remaining.iter().flat_map(|f| f.iter().copied()).collect();
        out.extend_from_slice(&scan_base64(&joined, c.position)?);
    }
    Ok(out)
}

pub fn tlsa(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let usage = c.u8()?;
    let selector = c.u8()?;
    let matching_type = c.u8()?;
    let remaining = c.rest();
    if remaining.is_empty() {
        return Err(ZoneError::syntax(c.position.clone(), "TLSA requires certificate association data"));
    }
    let joined: Vec<u8> = remaining.iter().flat_map(|f| f.iter().copied()).collect();
    let data = scan_base16(&joined, c.position)?;
    let mut out = vec![usage, selector, matching_type];
    out.extend_from_slice(&data);
    Ok(out)
}

pub fn hip(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let pk_algorithm = c.u8()?;
    let hit_field = c.next()?;
    let pk_field = c.next()?;
    let hit = scan_base16(hit_field, c.position)?;
    let key = scan_base64(pk_field, c.position)?;
    if hit.len() > 255 {
        return Err(ZoneError::syntax(c.position.clone(), "HIT exceeds 255 octets"));
    }
    let mut out = vec![hit.len() as u8, pk_algorithm];
    out.extend_from_slice(&(key.len() as u16).to_be_bytes());
    out.extend_from_slice(&hit);
    out.extend_from_slice(&key);
    for field in c.rest() {
        let name = crate::name::scan_name(field, c.origin, c.position)?;
        out.extend_from_slice(name.as_wire());
    }
    Ok(out)
}

pub fn csync(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let serial = c.u32()?;
    let flags = c.u16()?;
    let remaining = c.rest();
    let bitmap = crate::scan::scan_type_bitmap(remaining, c.position)?;
    let mut out = serial.to_be_bytes().to_vec();
    out.extend_from_slice(&flags.to_be_bytes());
    out.extend_from_slice(&bitmap);
    Ok(out)
}

pub fn zonemd(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let serial = c.u32()?;
    let scheme = c.u8()?;
    let hash_algorithm = c.u8()?;
    let remaining = c.rest();
    if remaining.is_empty() {
        return Err(ZoneError::syntax(c.position.clone(), "ZONEMD requires a digest"));
    }
    let joined: Vec<u8> = remaining.iter().flat_map(|f| f.iter().copied()).collect();
    let digest = scan_base16(&joined, c.position)?;
    let mut out = serial.to_be_bytes().to_vec();
    out.push(scheme);
    out.push(hash_algorithm);
    out.extend_from_slice(&digest);
    Ok(out)
}

pub fn eui(c: &mut FieldCursor, octets: usize) -> Result<Vec<u8>, ZoneError> {
    let text = c.next()?;
    c.finish()?;
    let s = std::str::from_utf8(text).map_err(|_| ZoneError::syntax(c.position.clone(), "invalid EUI address"))?;
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != octets {
        return Err(ZoneError::syntax(c.position.clone(), format!("EUI address must have {octets} hyphen-separated octets")));
    }
    let mut out = Vec::with_capacity(octets);
    for part in parts {
        let byte = u8::from_str_radix(part, 16).map_err(|_| ZoneError::syntax(c.position.clone(), "invalid EUI octet"))?;
        out.push(byte);
    }
    Ok(out)
}

pub fn uri(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let priority = c.u16()?;
    let weight = c.u16()?;
    let target_field = c.next()?;
    c.finish()?;
    let target = unescape_text(target_field, c.position)?;
    let mut out = priority.to_be_bytes().to_vec();
    out.extend_from_slice(&weight.to_be_bytes());
    out.extend_from_slice(&target);
    Ok(out)
}

pub fn caa(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let flags = c.u8()?;
    let tag_field = c.next()?;
    let value_field = c.next()?;
    c.finish()?;
    if tag_field.len() > 255 || tag_field.iter().any(|b| !b.is_ascii_alphanumeric()) {
        return Err(ZoneError::syntax(c.position.clone(), "invalid CAA tag"));
    }
    let value = unescape_text(value_field, c.position)?;
    let mut out = vec![flags, tag_field.len() as u8];
    out.extend_from_slice(tag_field);
    out.extend_from_slice(&value);
    Ok(out)
}

pub fn wks(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let address = c.ipv4()?;
    let protocol_field = c.next()?;
    let protocol: u8 = std::str::from_utf8(protocol_field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ZoneError::syntax(c.position.clone(), "invalid WKS protocol number"))?;
    let mut ports = Vec::new();
    for field in c.rest() {
        let port: u16 = std::str::from_utf8(field)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ZoneError::syntax(c.position.clone(), "invalid WKS service port"))?;
        ports.push(port);
    }
    let highest = ports.iter().max().copied().unwrap_or(0) as usize;
    let mut bitmap = vec![0u8; highest / 8 + 1];
    for &port in &ports {
        bitmap[port as usize / 8] |= 0x80 >> (port % 8);
    }
    let mut out = address.to_vec();
    out.push(protocol);
    out.extend_from_slice(&bitmap);
    Ok(out)
}
