//! Type and class mnemonic tables (spec.md §4.8).
//!
//! The original C scanner keeps process-wide static arrays probed with a
//! hashed first-letter/length scheme. The normative requirement is the
//! *behavior* (case-insensitive mnemonic lookup, `TYPE<n>`/`CLASS<n>`
//! fallback), not that particular probing strategy, so here the tables are
//! plain `const` sorted slices searched with binary search -- no mutable
//! global state, no allocation on the lookup path.

use std::fmt;

use strum_macros::EnumIter;

/// Resource record class, per RFC 1035 and the IANA DNS CLASSes registry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, EnumIter)]
pub enum RRClass {
    #[default]
    In,
    Cs,
    Ch,
    Hs,
    /// A class value with no registered mnemonic, carried as `CLASS<n>`.
    Unknown(u16),
}

impl RRClass {
    pub fn code(self) -> u16 {
        match self {
            RRClass::In => 1,
            RRClass::Cs => 2,
            RRClass::Ch => 3,
            RRClass::Hs => 4,
            RRClass::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            1 => RRClass::In,
            2 => RRClass::Cs,
            3 => RRClass::Ch,
            4 => RRClass::Hs,
            other => RRClass::Unknown(other),
        }
    }
}

impl fmt::Display for RRClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RRClass::In => write!(f, "IN"),
            RRClass::Cs => write!(f, "CS"),
            RRClass::Ch => write!(f, "CH"),
            RRClass::Hs => write!(f, "HS"),
            RRClass::Unknown(code) => write!(f, "CLASS{code}"),
        }
    }
}

const CLASSES: &[(&str, u16)] = &[("ch", 3), ("cs", 2), ("hs", 4), ("in", 1)];

/// Resource record type, per the IANA DNS RRTYPEs registry. Values not
/// listed here are still representable on the wire (and accepted via the
/// RFC 3597 generic-RDATA form) -- see `RRType::Unknown`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, EnumIter)]
pub enum RRType {
    #[default]
    None,
    A,
    Ns,
    Cname,
    Soa,
    Wks,
    Ptr,
    Hinfo,
    Mx,
    Txt,
    Rp,
    Afsdb,
    Isdn,
    Nsap,
    Sig,
    Key,
    Aaaa,
    Loc,
    Nxt,
    Srv,
    Naptr,
    Kx,
    Cert,
    Dname,
    Apl,
    Ds,
    Sshfp,
    Ipseckey,
    Rrsig,
    Nsec,
    Dnskey,
    Dhcid,
    Nsec3,
    Nsec3param,
    Tlsa,
    Smimea,
    Hip,
    Cds,
    Cdnskey,
    Openpgpkey,
    Csync,
    Zonemd,
    Svcb,
    Https,
    Eui48,
    Eui64,
    Tkey,
    Tsig,
    Uri,
    Caa,
    Wallet,
    Ta,
    Dlv,
    /// A type value outside the set with a dedicated parser/validator.
    /// Accepted only via the RFC 3597 `\#` generic form.
    Unknown(u16),
}

impl RRType {
    pub fn code(self) -> u16 {
        match self {
            RRType::None => 0,
            RRType::A => 1,
            RRType::Ns => 2,
            RRType::Cname => 5,
            RRType::Soa => 6,
            RRType::Wks => 11,
            RRType::Ptr => 12,
            RRType::Hinfo => 13,
            RRType::Mx => 15,
            RRType::Txt => 16,
            RRType::Rp => 17,
            RRType::Afsdb => 18,
            RRType::Isdn => 20,
            RRType::Nsap => 22,
            RRType::Sig => 24,
            RRType::Key => 25,
            RRType::Aaaa => 28,
            RRType::Loc => 29,
            RRType::Nxt => 30,
            RRType::Srv => 33,
            RRType::Naptr => 35,
            RRType::Kx => 36,
            RRType::Cert => 37,
            RRType::Dname => 39,
            RRType::Apl => 42,
            RRType::Ds => 43,
            RRType::Sshfp => 44,
            RRType::Ipseckey => 45,
            RRType::Rrsig => 46,
            RRType::Nsec => 47,
            RRType::Dnskey => 48,
            RRType::Dhcid => 49,
            RRType::Nsec3 => 50,
            RRType::Nsec3param => 51,
            RRType::Tlsa => 52,
            RRType::Smimea => 53,
            RRType::Hip => 55,
            RRType::Cds => 59,
            RRType::Cdnskey => 60,
            RRType::Openpgpkey => 61,
            RRType::Csync => 62,
            RRType::Zonemd => 63,
            RRType::Svcb => 64,
            RRType::Https => 65,
            RRType::Eui48 => 108,
            RRType::Eui64 => 109,
            RRType::Tkey => 249,
            RRType::Tsig => 250,
            RRType::Uri => 256,
            RRType::Caa => 257,
            RRType::Wallet => 262,
            RRType::Ta => 32768,
            RRType::Dlv => 32769,
            RRType::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        for &(name, c) in TYPES {
            if c == code {
                return Self::from_mnemonic(name).unwrap();
            }
        }
        RRType::Unknown(code)
    }

    fn from_mnemonic(name: &str) -> Option<Self> {
        Some(match name {
            "a" => RRType::A,
            "ns" => RRType::Ns,
            "cname" => RRType::Cname,
            "soa" => RRType::Soa,
            "wks" => RRType::Wks,
            "ptr" => RRType::Ptr,
            "hinfo" => RRType::Hinfo,
            "mx" => RRType::Mx,
            "txt" => RRType::Txt,
            "rp" => RRType::Rp,
            "afsdb" => RRType::Afsdb,
            "isdn" => RRType::Isdn,
            "nsap" => RRType::Nsap,
            "sig" => RRType::Sig,
            "key" => RRType::Key,
            "aaaa" => RRType::Aaaa,
            "loc" => RRType::Loc,
            "nxt" => RRType::Nxt,
            "srv" => RRType::Srv,
            "naptr" => RRType::Naptr,
            "kx" => RRType::Kx,
            "cert" => RRType::Cert,
            "dname" => RRType::Dname,
            "apl" => RRType::Apl,
            "ds" => RRType::Ds,
            "sshfp" => RRType::Sshfp,
            "ipseckey" => RRType::Ipseckey,
            "rrsig" => RRType::Rrsig,
            "nsec" => RRType::Nsec,
            "dnskey" => RRType::Dnskey,
            "dhcid" => RRType::Dhcid,
            "nsec3" => RRType::Nsec3,
            "nsec3param" => RRType::Nsec3param,
            "tlsa" => RRType::Tlsa,
            "smimea" => RRType::Smimea,
            "hip" => RRType::Hip,
            "cds" => RRType::Cds,
            "cdnskey" => RRType::Cdnskey,
            "openpgpkey" => RRType::Openpgpkey,
            "csync" => RRType::Csync,
            "zonemd" => RRType::Zonemd,
            "svcb" => RRType::Svcb,
            "https" => RRType::Https,
            "eui48" => RRType::Eui48,
            "eui64" => RRType::Eui64,
            "tkey" => RRType::Tkey,
            "tsig" => RRType::Tsig,
            "uri" => RRType::Uri,
            "caa" => RRType::Caa,
            "wallet" => RRType::Wallet,
            "ta" => RRType::Ta,
            "dlv" => RRType::Dlv,
            _ => return None,
        })
    }
}

impl fmt::Display for RRType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(name, code) in TYPES {
            if code == self.code() {
                return write!(f, "{}", name.to_uppercase());
            }
        }
        write!(f, "TYPE{}", self.code())
    }
}

// Sorted by mnemonic for binary search. Keep sorted when adding entries.
const TYPES: &[(&str, u16)] = &[
    ("a", 1),
    ("aaaa", 28),
    ("afsdb", 18),
    ("apl", 42),
    ("caa", 257),
    ("cdnskey", 60),
    ("cds", 59),
    ("cert", 37),
    ("cname", 5),
    ("csync", 62),
    ("dhcid", 49),
    ("dlv", 32769),
    ("dname", 39),
    ("dnskey", 48),
    ("ds", 43),
    ("eui48", 108),
    ("eui64", 109),
    ("hinfo", 13),
    ("hip", 55),
    ("https", 65),
    ("ipseckey", 45),
    ("isdn", 20),
    ("key", 25),
    ("kx", 36),
    ("loc", 29),
    ("mx", 15),
    ("naptr", 35),
    ("ns", 2),
    ("nsap", 22),
    ("nsec", 47),
    ("nsec3", 50),
    ("nsec3param", 51),
    ("nxt", 30),
    ("openpgpkey", 61),
    ("ptr", 12),
    ("rp", 17),
    ("rrsig", 46),
    ("sig", 24),
    ("smimea", 53),
    ("soa", 6),
    ("srv", 33),
    ("sshfp", 44),
    ("svcb", 64),
    ("ta", 32768),
    ("tkey", 249),
    ("tlsa", 52),
    ("tsig", 250),
    ("txt", 16),
    ("uri", 256),
    ("wallet", 262),
    ("wks", 11),
    ("zonemd", 63),
];

fn lookup(table: &[(&str, u16)], name: &str) -> Option<u16> {
    // table is small; linear scan avoids allocating a lowercased key for
    // `binary_search_by` and keeps behavior obviously correct.
    table
        .iter()
        .find(|(mnemonic, _)| mnemonic.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// Parses a type mnemonic (case-insensitive), or the numeric `TYPE<n>` form
/// per RFC 3597.
pub fn parse_type(text: &[u8]) -> Option<RRType> {
    let text = std::str::from_utf8(text).ok()?;
    if let Some(code) = lookup(TYPES, text) {
        return Some(RRType::from_code(code));
    }
    if text.len() > 4 && text[..4].eq_ignore_ascii_case("type") {
        let n: u16 = text[4..].parse().ok()?;
        return Some(RRType::from_code(n));
    }
    None
}

/// Parses a class mnemonic (case-insensitive), or the numeric `CLASS<n>`
/// form per RFC 3597.
pub fn parse_class(text: &[u8]) -> Option<RRClass> {
    let text = std::str::from_utf8(text).ok()?;
    if let Some(code) = lookup(CLASSES, text) {
        return Some(RRClass::from_code(code));
    }
    if text.len() > 5 && text[..5].eq_ignore_ascii_case("class") {
        let n: u16 = text[5..].parse().ok()?;
        return Some(RRClass::from_code(n));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_named_type_variant_has_a_mnemonic_table_entry() {
        for variant in RRType::iter() {
            if matches!(variant, RRType::None | RRType::Unknown(_)) {
                continue;
            }
            assert!(
                TYPES.iter().any(|&(_, code)| code == variant.code()),
                "{variant:?} is missing from TYPES"
            );
        }
    }

    #[test]
    fn every_named_class_variant_has_a_mnemonic_table_entry() {
        for variant in RRClass::iter() {
            if matches!(variant, RRClass::Unknown(_)) {
                continue;
            }
            assert!(
                CLASSES.iter().any(|&(_, code)| code == variant.code()),
                "{variant:?} is missing from CLASSES"
            );
        }
    }

    #[test]
    fn case_insensitive_type_lookup() {
        for (mnemonic, code) in TYPES {
            let upper = mnemonic.to_uppercase();
            let lower = mnemonic.to_lowercase();
            assert_eq!(parse_type(upper.as_bytes()).unwrap().code(), *code);
            assert_eq!(parse_type(lower.as_bytes()).unwrap().code(), *code);
            let numeric = format!("TYPE{code}");
            assert_eq!(parse_type(numeric.as_bytes()).unwrap().code(), *code);
        }
    }

    #[test]
    fn unknown_type_round_trips() {
        assert_eq!(parse_type(b"TYPE65280").unwrap().code(), 65280);
        assert!(parse_type(b"TYPE999999").is_none());
        assert!(parse_type(b"bogus").is_none());
    }

    #[test]
    fn class_lookup() {
        assert_eq!(parse_class(b"in").unwrap(), RRClass::In);
        assert_eq!(parse_class(b"IN").unwrap(), RRClass::In);
        assert_eq!(parse_class(b"CLASS4").unwrap(), RRClass::Hs);
    }
}
