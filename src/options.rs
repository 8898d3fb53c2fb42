//! Parser configuration (spec.md §6 "Options (enumerated)").

use crate::symbols::RRClass;

/// Configuration accepted by `ZoneParser::open`/`open_str`/`open_from_reader`.
///
/// Mirrors the C `zone_options_t` field-for-field, rendered as a builder so
/// callers only set what differs from the RFC-sane defaults.
#[derive(Debug, Clone)]
pub struct Options {
    pub(crate) origin: Option<String>,
    pub(crate) default_ttl: u32,
    pub(crate) default_class: RRClass,
    pub(crate) no_includes: bool,
    pub(crate) include_limit: u32,
    pub(crate) pretty_ttls: bool,
    pub(crate) secondary: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            origin: None,
            default_ttl: 3600,
            default_class: RRClass::In,
            no_includes: false,
            include_limit: 0,
            pretty_ttls: false,
            secondary: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zone's initial origin. Required if the first record or
    /// directive in the input relies on a relative name.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_default_ttl(mut self, ttl: u32) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_default_class(mut self, class: RRClass) -> Self {
        self.default_class = class;
        self
    }

    /// Disables `$INCLUDE`. Required for `open_str` unless the caller is
    /// prepared to resolve include files against the process's current
    /// working directory.
    pub fn with_no_includes(mut self, no_includes: bool) -> Self {
        self.no_includes = no_includes;
        self
    }

    /// Maximum include nesting depth. Zero means unlimited.
    pub fn with_include_limit(mut self, limit: u32) -> Self {
        self.include_limit = limit;
        self
    }

    pub fn with_pretty_ttls(mut self, pretty: bool) -> Self {
        self.pretty_ttls = pretty;
        self
    }

    /// Relaxes SVCB parameter ordering/uniqueness checks and a handful of
    /// other semantic checks, for zones produced by secondary transfer
    /// software that may not normalize presentation form.
    pub fn with_secondary(mut self, secondary: bool) -> Self {
        self.secondary = secondary;
        self
    }
}
