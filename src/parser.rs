//! Directive and record dispatcher (spec.md §4.4), and the crate's public
//! entry points (spec.md §6 "External Interfaces").

use std::io::Read;
use std::path::Path;

use crate::error::{Position, ZoneError};
use crate::input::{InputFile, InputStack};
use crate::name::{scan_name, Name};
use crate::options::Options;
use crate::record::{AcceptResult, Record};
use crate::scan::scan_ttl;
use crate::symbols::{parse_class, parse_type, RRClass, RRType};
use crate::token::TokenKind;
use crate::types;

/// Parses a DNS zone file in presentation format, yielding fully assembled
/// records. Owns its input and is not reentrant across threads (spec.md §5:
/// `!Sync`, `Send` when its callback is `Send`).
pub struct ZoneParser {
    stack: InputStack,
    options: Options,
    accept: Option<Box<dyn FnMut(&Record) -> AcceptResult>>,
    done: bool,
}

impl ZoneParser {
    fn origin_from_options(options: &Options) -> Result<Name, ZoneError> {
        match &options.origin {
            Some(text) => {
                let root = Name::root();
                let pos = Position::new(std::rc::Rc::from(Path::new("<options.origin>")), 0);
                scan_name(text.as_bytes(), &root, &pos)
            }
            None => Ok(Name::root()),
        }
    }

    /// Opens a zone file from disk. The `$INCLUDE` entry point
    /// (spec.md §6 `zone_open`).
    pub fn open(path: impl AsRef<Path>, options: Options) -> Result<Self, ZoneError> {
        let origin = Self::origin_from_options(&options)?;
        let file = InputFile::open_path(path.as_ref(), None, origin, options.default_class, None)?;
        let include_limit = options.include_limit;
        Ok(ZoneParser { stack: InputStack::new(file, include_limit), options, accept: None, done: false })
    }

    /// Parses zone data already held in memory (spec.md §6 `zone_open_string`).
    /// `$INCLUDE` is only honored if `options.no_includes` is `false`; since
    /// an in-memory buffer has no filesystem location of its own, any
    /// `$INCLUDE` still resolves relative to the process working directory.
    pub fn open_str(text: impl Into<String>, options: Options) -> Result<Self, ZoneError> {
        let origin = Self::origin_from_options(&options)?;
        let file = InputFile::open_bytes(Path::new("<string>").to_path_buf(), text.into().into_bytes(), origin, options.default_class);
        let include_limit = options.include_limit;
        Ok(ZoneParser { stack: InputStack::new(file, include_limit), options, accept: None, done: false })
    }

    /// Parses zone data pulled from an arbitrary reader (spec.md §6
    /// `zone_open_from_callback`, generalized from a raw function pointer to
    /// `std::io::Read`).
    pub fn open_from_reader(reader: impl Read + 'static, options: Options) -> Result<Self, ZoneError> {
        let origin = Self::origin_from_options(&options)?;
        let file = InputFile::new_from_reader(Path::new("<reader>").to_path_buf(), Box::new(reader), origin, options.default_class);
        let include_limit = options.include_limit;
        Ok(ZoneParser { stack: InputStack::new(file, include_limit), options, accept: None, done: false })
    }

    /// Registers an accept callback, for hosts that want the
    /// buffer-pool/abort return-code contract from spec.md §4.7 verbatim
    /// instead of driving the `Iterator`.
    pub fn with_accept(mut self, accept: impl FnMut(&Record) -> AcceptResult + 'static) -> Self {
        self.accept = Some(Box::new(accept));
        self
    }

    fn current_position(&self) -> Position {
        self.stack.current().position()
    }

    /// Reads and classifies the next logical record or directive, looping
    /// over blank lines and `$`-directives until it produces a record, runs
    /// out of input, or hits an error.
    fn next_record(&mut self) -> Result<Option<Record>, ZoneError> {
        loop {
            if self.done {
                return Ok(None);
            }
            let token = self.stack.current_mut().next_token()?;
            match token.kind {
                TokenKind::EndOfFile => {
                    if self.stack.pop() {
                        continue;
                    }
                    self.done = true;
                    return Ok(None);
                }
                TokenKind::LineFeed => {
                    self.stack.current_mut().charge_deferred_lines();
                    continue;
                }
                TokenKind::Quoted => {
                    return Err(ZoneError::syntax(self.current_position(), "a quoted string cannot start a record"));
                }
                TokenKind::Contiguous => {
                    let first_of_line = self
                        .stack
                        .current_mut()
                        .consume_line_start()
                        .map(|offset| offset == token.text.start)
                        .unwrap_or(false);

                    let first_bytes = self.stack.current().slice(token.text.clone()).to_vec();

                    if first_bytes.first() == Some(&b'$') {
                        self.handle_directive(&first_bytes)?;
                        continue;
                    }

                    if let Some(record) = self.dispatch_record(first_bytes, first_of_line)? {
                        return Ok(Some(record));
                    }
                }
            }
        }
    }

    /// Pulls the next field of the current record as owned bytes, erroring
    /// if the record ends (newline/EOF) before the caller expected more
    /// fields.
    fn next_field(&mut self) -> Result<Vec<u8>, ZoneError> {
        let token = self.stack.current_mut().next_token()?;
        match token.kind {
            TokenKind::Contiguous | TokenKind::Quoted => Ok(self.stack.current().slice(token.text).to_vec()),
            TokenKind::LineFeed | TokenKind::EndOfFile => {
                Err(ZoneError::syntax(self.current_position(), "record ends before all required fields were read"))
            }
        }
    }

    /// Collects every remaining field of the current record, up to the
    /// closing newline or end of file.
    fn collect_remaining_fields(&mut self) -> Result<Vec<Vec<u8>>, ZoneError> {
        let mut fields = Vec::new();
        loop {
            let token = self.stack.current_mut().next_token()?;
            match token.kind {
                TokenKind::Contiguous | TokenKind::Quoted => fields.push(self.stack.current().slice(token.text).to_vec()),
                TokenKind::LineFeed | TokenKind::EndOfFile => return Ok(fields),
            }
        }
    }

    fn looks_like_ttl(field: &[u8]) -> bool {
        field.first().map(u8::is_ascii_digit).unwrap_or(false)
    }

    fn dispatch_record(&mut self, first_field: Vec<u8>, first_of_line: bool) -> Result<Option<Record>, ZoneError> {
        let position = self.current_position();

        let (owner, mut current) = if first_of_line {
            let origin = self.stack.current().origin.clone();
            let owner = scan_name(&first_field, &origin, &position)?;
            self.stack.current_mut().owner = Some(owner.clone());
            (owner, self.next_field()?)
        } else {
            let owner = self
                .stack
                .current()
                .owner
                .clone()
                .ok_or_else(|| ZoneError::syntax(position.clone(), "record has no owner and none was previously established"))?;
            (owner, first_field)
        };

        let mut ttl: Option<u32> = None;
        let mut class: Option<RRClass> = None;
        for _ in 0..2 {
            if ttl.is_none() && Self::looks_like_ttl(&current) {
                ttl = Some(scan_ttl(&current, &position)?);
                current = self.next_field()?;
                continue;
            }
            if class.is_none() {
                if let Some(c) = parse_class(&current) {
                    class = Some(c);
                    current = self.next_field()?;
                    continue;
                }
            }
            break;
        }

        let rtype = parse_type(&current).ok_or_else(|| ZoneError::syntax(position.clone(), "expected a resource record type"))?;
        let fields = self.collect_remaining_fields()?;
        let field_refs: Vec<&[u8]> = fields.iter().map(Vec::as_slice).collect();

        let origin = self.stack.current().origin.clone();
        let resolved_class = class.unwrap_or(self.stack.current().last_class);
        let resolved_ttl = match ttl {
            Some(t) => t,
            None => self
                .stack
                .current()
                .default_ttl
                .or(self.stack.current().last_ttl)
                .unwrap_or(self.options.default_ttl),
        };

        let is_generic = field_refs.first().map(|f| *f == &b"\\#"[..]).unwrap_or(false);
        let rdata = if is_generic {
            types::parse_generic(rtype, &field_refs, &position)?
        } else {
            types::assemble(rtype, &field_refs, &origin, &position, &self.options)?
        };
        if rdata.len() > 65535 {
            return Err(ZoneError::syntax(position.clone(), "RDATA exceeds 65535 octets"));
        }

        let file = self.stack.current_mut();
        file.last_class = resolved_class;
        file.last_ttl = Some(resolved_ttl);
        file.last_type = Some(rtype.code());
        file.charge_deferred_lines();

        Ok(Some(Record { owner, rtype, class: resolved_class, ttl: resolved_ttl, rdata }))
    }

    fn handle_directive(&mut self, name: &[u8]) -> Result<(), ZoneError> {
        let position = self.current_position();
        match name.to_ascii_uppercase().as_slice() {
            b"$ORIGIN" => {
                let text = self.next_field()?;
                let file = self.stack.current_mut();
                let origin = scan_name(&text, &file.origin, &position)?;
                file.origin = origin;
                let _ = self.collect_remaining_fields()?;
                self.stack.current_mut().charge_deferred_lines();
                Ok(())
            }
            b"$TTL" => {
                let text = self.next_field()?;
                let ttl = scan_ttl(&text, &position)?;
                self.stack.current_mut().default_ttl = Some(ttl);
                let _ = self.collect_remaining_fields()?;
                self.stack.current_mut().charge_deferred_lines();
                Ok(())
            }
            b"$INCLUDE" => {
                if self.options.no_includes {
                    return Err(ZoneError::not_permitted(position, "$INCLUDE is disabled"));
                }
                let path_field = self.next_field()?;
                let path = String::from_utf8(path_field)
                    .map_err(|_| ZoneError::syntax(position.clone(), "$INCLUDE path is not valid UTF-8"))?;
                let remaining = self.collect_remaining_fields()?;
                let current_origin = self.stack.current().origin.clone();
                let origin = match remaining.first() {
                    Some(text) => scan_name(text, &current_origin, &position)?,
                    None => current_origin,
                };
                let default_class = self.stack.current().last_class;
                self.stack.open_include(&path, origin, default_class, &position)?;
                Ok(())
            }
            _ => Err(ZoneError::syntax(position, "unknown directive")),
        }
    }
}

impl Iterator for ZoneParser {
    type Item = Result<Record, ZoneError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_record() {
                Ok(None) => return None,
                Ok(Some(record)) => {
                    if let Some(accept) = self.accept.as_mut() {
                        match accept(&record) {
                            AcceptResult::Continue => {}
                            AcceptResult::SwitchBuffer(_) => {}
                            AcceptResult::Abort(code) => {
                                self.done = true;
                                return Some(Err(ZoneError::semantic(self.current_position(), format!("host aborted parsing with code {code}"))));
                            }
                        }
                    }
                    return Some(Ok(record));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
