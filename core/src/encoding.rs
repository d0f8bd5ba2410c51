//! Percent-encoding of single path segments.
//!
//! Identifiers are interpolated into URL paths, so anything that could start
//! a new segment, a query or a fragment must be escaped. The set matches
//! `encodeURIComponent`: ASCII alphanumerics and `- _ . ! ~ * ' ( )` pass
//! through, every other byte of the UTF-8 encoding is escaped.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` for use as exactly one path segment.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Decode a percent-encoded segment. Sequences that do not decode to valid
/// UTF-8 leave the segment untouched.
pub fn decode_component(segment: &str) -> Cow<'_, str> {
    match percent_decode_str(segment).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(segment),
    }
}
