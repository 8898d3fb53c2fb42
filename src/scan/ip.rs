//! IPv4/IPv6 address scanning (spec.md §4.5 "IPv4 address" / "IPv6
//! address"). Presentation forms are exactly `std::net`'s, so parsing is
//! delegated to it and the result is written as wire octets.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{Position, ZoneError};

pub fn scan_ipv4(text: &[u8], position: &Position) -> Result<[u8; 4], ZoneError> {
    let s = std::str::from_utf8(text).map_err(|_| ZoneError::syntax(position.clone(), "invalid IPv4 address"))?;
    let addr: Ipv4Addr = s.parse().map_err(|_| ZoneError::syntax(position.clone(), "invalid IPv4 address"))?;
    Ok(addr.octets())
}

pub fn scan_ipv6(text: &[u8], position: &Position) -> Result<[u8; 16], ZoneError> {
    let s = std::str::from_utf8(text).map_err(|_| ZoneError::syntax(position.clone(), "invalid IPv6 address"))?;
    let addr: Ipv6Addr = s.parse().map_err(|_| ZoneError::syntax(position.clone(), "invalid IPv6 address"))?;
    Ok(addr.octets())
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
    fn ipv4_round_trip() {
        assert_eq!(scan_ipv4(b"1.2.3.4", &pos()).unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn ipv6_compressed_form() {
        let octets = scan_ipv6(b"2001:db8::1", &pos()).unwrap();
        assert_eq!(octets[0..2], [0x20, 0x01]);
        assert_eq!(octets[15], 1);
    }

    #[test]
    fn ipv4_garbage_is_error() {
        assert!(scan_ipv4(b"not-an-ip", &pos()).is_err());
    }
}
