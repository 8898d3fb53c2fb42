//! Domain name presentation-to-wire conversion (spec.md §4.5 "Domain name").

use crate::error::{Position, ZoneError};

/// An uncompressed wire-format domain name: length-prefixed labels
/// terminated by a zero-length root label. Always fully qualified once
/// produced by [`scan_name`] -- relative names are qualified against the
/// supplied origin before this type is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(Vec<u8>);

impl Name {
    pub fn root() -> Self {
        Name(vec![0])
    }

    pub fn as_wire(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the wire name back to RFC 1035 presentation form, escaping
    /// non-printable octets as `\DDD`.
    pub fn to_presentation(&self) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < self.0.len() {
            let len = self.0[i] as usize;
            if len == 0 {
                break;
            }
            i += 1;
            for &b in &self.0[i..i + len] {
                match b {
                    b'.' | b'\\' => {
                        out.push('\\');
                        out.push(b as char);
                    }
                    0x21..=0x7e => out.push(b as char),
                    _ => out.push_str(&format!("\\{:03}", b)),
                }
            }
            out.push('.');
            i += len;
        }
        if out.is_empty() {
            out.push('.');
        }
        out
    }
}

/// Decodes a single presentation-form label run (the bytes between two
/// unescaped dots, or the whole token for the last label) into wire octets,
/// resolving `\c` and `\DDD` escapes. Returns `None` if the run contains an
/// invalid `\DDD` escape.
fn unescape_label(label: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(label.len());
    let mut i = 0;
    while i < label.len() {
        if label[i] == b'\\' {
            if i + 3 < label.len() && label[i + 1].is_ascii_digit() {
                let digits = &label[i + 1..i + 4];
                if digits.iter().all(u8::is_ascii_digit) {
                    let v: u32 = std::str::from_utf8(digits).ok()?.parse().ok()?;
                    if v > 255 {
                        return None;
                    }
                    out.push(v as u8);
                    i += 4;
                    continue;
                }
            }
            if i + 1 < label.len() {
                out.push(label[i + 1]);
                i += 2;
                continue;
            }
            return None;
        }
        out.push(label[i]);
        i += 1;
    }
    Some(out)
}

/// Splits presentation text on unescaped dots, matching RFC 1035's label
/// grammar: a `\.` inside a label does not end it.
fn split_labels(text: &[u8]) -> Vec<&[u8]> {
    let mut labels = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < text.len() {
        if text[i] == b'\\' && i + 1 < text.len() {
            i += 2;
            continue;
        }
        if text[i] == b'.' {
            labels.push(&text[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    if start < text.len() {
        labels.push(&text[start..]);
    }
    labels
}

/// Parses a presentation-form domain name, qualifying it against `origin`
/// if it is relative (does not end in a bare, unescaped `.`). A lone `@`
/// denotes the origin itself.
pub fn scan_name(
    text: &[u8],
    origin: &Name,
    position: &Position,
) -> Result<Name, ZoneError> {
    if text == b"@" {
        return Ok(origin.clone());
    }

    let is_absolute = !text.is_empty() && text[text.len() - 1] == b'.';
    // An absolute name's trailing dot is not part of the last label.
    let body = if is_absolute { &text[..text.len() - 1] } else { text };

    let mut wire = Vec::with_capacity(256);
    if !body.is_empty() {
        for label in split_labels(body) {
            let octets = unescape_label(label).ok_or_else(|| {
                ZoneError::syntax(position.clone(), "invalid escape sequence in name")
            })?;
            if octets.is_empty() {
                return Err(ZoneError::syntax(position.clone(), "empty label in name"));
            }
            if octets.len() > 63 {
                return Err(ZoneError::syntax(
                    position.clone(),
                    "label exceeds 63 octets",
                ));
            }
            wire.push(octets.len() as u8);
            wire.extend_from_slice(&octets);
            if wire.len() > 255 {
                return Err(ZoneError::syntax(
                    position.clone(),
                    "name exceeds 255 octets",
                ));
            }
        }
    }

    if is_absolute {
        wire.push(0);
    } else {
        wire.extend_from_slice(origin.as_wire());
    }

    if wire.len() > 255 {
        return Err(ZoneError::syntax(
            position.clone(),
            "name exceeds 255 octets after origin qualification",
        ));
    }

    Ok(Name(wire))
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
    fn absolute_name() {
        let origin = Name::root();
        let n = scan_name(b"www.example.com.", &origin, &pos()).unwrap();
        assert_eq!(
            n.as_wire(),
            &[3, b'w', b'w', b'w', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0]
        );
    }

    #[test]
    fn relative_name_appends_origin() {
        let origin = scan_name(b"example.com.", &Name::root(), &pos()).unwrap();
        let n = scan_name(b"www", &origin, &pos()).unwrap();
        assert_eq!(n, scan_name(b"www.example.com.", &Name::root(), &pos()).unwrap());
    }

    #[test]
    fn at_sign_is_origin() {
        let origin = scan_name(b"example.com.", &Name::root(), &pos()).unwrap();
        let n = scan_name(b"@", &origin, &pos()).unwrap();
        assert_eq!(n, origin);
    }

    #[test]
    fn empty_label_is_error() {
        let origin = Name::root();
        assert!(scan_name(b"www..example.com.", &origin, &pos()).is_err());
    }

    #[test]
    fn label_too_long_is_error() {
        let origin = Name::root();
        let label = "a".repeat(64);
        let text = format!("{label}.example.com.");
        assert!(scan_name(text.as_bytes(), &origin, &pos()).is_err());
    }

    #[test]
    fn escaped_dot_stays_in_label() {
        let origin = Name::root();
        let n = scan_name(b"a\\.b.example.com.", &origin, &pos()).unwrap();
        assert_eq!(n.as_wire()[0], 3);
    }
}
