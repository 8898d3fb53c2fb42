//! The assembled resource record (spec.md §4.7 "Output accumulator").

use crate::name::Name;
use crate::symbols::{RRClass, RRType};

/// A fully assembled resource record: owner name, type, class, TTL, and
/// wire-format RDATA. Yielded by [`crate::parser::ZoneParser`]'s
/// `Iterator` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub owner: Name,
    pub rtype: RRType,
    pub class: RRClass,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

/// The host's response to an accepted record, for callers using
/// [`crate::parser::ZoneParser::with_accept`] instead of the `Iterator`
/// interface. Mirrors spec.md §4.7's zero/positive/negative return-code
/// contract: continue, switch to a fresh buffer (carrying how many records
/// the filled one held), or abort with a host-supplied code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptResult {
    Continue,
    SwitchBuffer(usize),
    Abort(i32),
}
