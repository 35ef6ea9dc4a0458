//! Span codec
//!
//! Encoding and decoding of a single 7-byte span record.
//!
//! ### Record Layout
//! - offset 0: min_span (u16, little-endian)
//! - offset 2: max_span (u16, little-endian)
//! - offset 4: sig_bytes (2 raw bytes)
//! - offset 6: has_attested (0x00 / 0x01, any non-zero byte decodes as true)

use bytes::{Buf, BufMut};

use crate::error::{Result, SpanDbError};

use super::{Span, SPAN_ENCODED_LENGTH};

/// Encode a span into its fixed-width record
pub fn encode_span(span: &Span) -> [u8; SPAN_ENCODED_LENGTH] {
    let mut record = [0u8; SPAN_ENCODED_LENGTH];
    let mut out = &mut record[..];

    out.put_u16_le(span.min_span);
    out.put_u16_le(span.max_span);
    out.put_slice(&span.sig_bytes);
    out.put_u8(span.has_attested as u8);

    record
}

/// Decode the first record of `bytes`
///
/// Trailing bytes past the first record are ignored; a slice shorter than
/// one record is malformed.
pub fn decode_span(bytes: &[u8]) -> Result<Span> {
    if bytes.len() < SPAN_ENCODED_LENGTH {
        return Err(SpanDbError::MalformedBuffer { len: bytes.len() });
    }

    let mut buf = &bytes[..SPAN_ENCODED_LENGTH];
    let min_span = buf.get_u16_le();
    let max_span = buf.get_u16_le();
    let mut sig_bytes = [0u8; 2];
    buf.copy_to_slice(&mut sig_bytes);
    let has_attested = buf.get_u8() != 0;

    Ok(Span {
        min_span,
        max_span,
        sig_bytes,
        has_attested,
    })
}
