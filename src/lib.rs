//! A high-throughput parser for DNS zone files in presentation (textual)
//! format, per RFC 1035 §5, RFC 3597 (unknown RR types), RFC 2308 (`$TTL`),
//! and RFC 9460 (SVCB/HTTPS).
//!
//! ```no_run
//! use zonefile::{Options, ZoneParser};
//!
//! let options = Options::new().with_origin("example.com.");
//! let parser = ZoneParser::open("zone.db", options).unwrap();
//! for result in parser {
//!     match result {
//!         Ok(record) => println!("{} {}", record.owner.to_presentation(), record.rtype),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

mod error;
mod indexer;
mod input;
mod name;
mod options;
mod parser;
mod record;
mod scan;
mod symbols;
mod token;
mod types;

pub use error::{LogPriority, Position, ReturnCode, ZoneError};
pub use name::Name;
pub use options::Options;
pub use parser::ZoneParser;
pub use record::{AcceptResult, Record};
pub use symbols::{RRClass, RRType};
