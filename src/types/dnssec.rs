//! DS/DNSKEY/RRSIG/NSEC family RDATA (spec.md §4.6), grounded on RFC 4034
//! and RFC 5155 and on `original_source/src/generic/{dnskey,rrsig,ds,nsec,
//! nsec3}.h` for field ordering.

use crate::error::ZoneError;
use crate::scan::{scan_base16, scan_base64, scan_timestamp, scan_type_bitmap};
use crate::symbols::parse_type;

use super::FieldCursor;

pub fn ds(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let key_tag = c.u16()?;
    let algorithm = c.u8()?;
    let digest_type = c.u8()?;
    let digest_field = c.next()?;
    c.finish()?;
    let digest = scan_base16(digest_field, c.position)?;
    let mut out = Vec::with_capacity(4 + digest.len());
    out.extend_from_slice(&key_tag.to_be_bytes());
    out.push(algorithm);
    out.push(digest_type);
    out.extend_from_slice(&digest);
    Ok(out)
}

pub fn dnskey(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let flags = c.u16()?;
    let protocol = c.u8()?;
    let algorithm = c.u8()?;
    let remaining = c.rest();
    if remaining.is_empty() {
        return Err(ZoneError::syntax(c.position.clone(), "DNSKEY requires a public key"));
    }
    let joined: Vec<u8> = remaining.iter().flat_map(|f| f.iter().copied()).collect();
    let key = scan_base64(&joined, c.position)?;
    let mut out = Vec::with_capacity(4 + key.len());
    out.extend_from_slice(&flags.to_be_bytes());
    out.push(protocol);
    out.push(algorithm);
    out.extend_from_slice(&key);
    Ok(out)
}

pub fn rrsig(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let type_covered_field = c.next()?;
    let type_covered = parse_type(type_covered_field)
        .ok_or_else(|| ZoneError::syntax(c.position.clone(), "unknown type mnemonic in RRSIG type-covered field"))?;
    let algorithm = c.u8()?;
    let labels = c.u8()?;
    let original_ttl = c.u32()?;
    let expiration_field = c.next()?;
    let inception_field = c.next()?;
    let expiration = scan_timestamp(expiration_field, c.position)?;
    let inception = scan_timestamp(inception_field, c.position)?;
    let key_tag = c.u16()?;
    let signer = c.name()?;
    let remaining = c.rest();
    if remaining.is_empty() {
        return Err(ZoneError::syntax(c.position.clone(), "RRSIG requires a signature"));
    }
    let joined: Vec<u8> = remaining.iter().flat_map(|f| f.iter().copied()).collect();
    let signature = scan_base64(&joined, c.position)?;

    let mut out = Vec::with_capacity(18 + signer.len() + signature.len());
    out.extend_from_slice(&type_covered.code().to_be_bytes());
    out.push(algorithm);
    out.push(labels);
    out.extend_from_slice(&original_ttl.to_be_bytes());
    out.extend_from_slice(&expiration.to_be_bytes());
    out.extend_from_slice(&inception.to_be_bytes());
    out.extend_from_slice(&key_tag.to_be_bytes());
    out.extend_from_slice(signer.as_wire());
    out.extend_from_slice(&signature);
    Ok(out)
}

pub fn nsec(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let next_name = c.name()?;
    let remaining = c.rest();
    let mnemonics: Vec<&[u8]> = remaining.to_vec();
    let bitmap = scan_type_bitmap(&mnemonics, c.position)?;
    let mut out = next_name.as_wire().to_vec();
    out.extend_from_slice(&bitmap);
    Ok(out)
}

pub fn nsec3param(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let hash_algorithm = c.u8()?;
    let flags = c.u8()?;
    let iterations = c.u16()?;
    let salt_field = c.next()?;
    c.finish()?;
    let salt = if salt_field == b"-" {
        Vec::new()
    } else {
        crate::scan::scan_base16(salt_field, c.position)?
    };
    if salt.len() > 255 {
        return Err(ZoneError::syntax(c.position.clone(), "NSEC3 salt exceeds 255 octets"));
    }
    let mut out = vec![hash_algorithm, flags];
    out.extend_from_slice(&iterations.to_be_bytes());
    out.push(salt.len() as u8);
    out.extend_from_slice(&salt);
    Ok(out)
}

pub fn nsec3(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let hash_algorithm = c.u8()?;
    let flags = c.u8()?;
    let iterations = c.u16()?;
    let salt_field = c.next()?;
    let next_hashed_field = c.next()?;
    let salt = if salt_field == b"-" {
        Vec::new()
    } else {
        crate::scan::scan_base16(salt_field, c.position)?
    };
    let next_hashed = crate::scan::scan_base32(next_hashed_field, c.position)?;
    let remaining = c.rest();
    let bitmap = scan_type_bitmap(remaining, c.position)?;

    let mut out = vec![hash_algorithm, flags];
    out.extend_from_slice(&iterations.to_be_bytes());
    out.push(salt.len() as u8);
    out.extend_from_slice(&salt);
    out.push(next_hashed.len() as u8);
    out.extend_from_slice(&next_hashed);
    out.extend_from_slice(&bitmap);
    Ok(out)
}
