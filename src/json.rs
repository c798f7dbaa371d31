//! JSON response encoding.
//!
//! Bodies are written with `", "` and `": "` separators and with every
//! non-ASCII character escaped, so the wire format matches what clients of the
//! service have always received. `JsonBody` sets `Content-Length` explicitly
//! so the header is present even before hyper sees the response.

use std::io;

use axum::response::{IntoResponse, Response};
use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::StatusCode;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::config::CONTENT_TYPE_JSON;
use crate::error::AppError;

/// Compact formatter with spaced separators and ASCII-only output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl SpacedFormatter {
    fn needs_escape(c: char) -> bool {
        !c.is_ascii() || c == '\x7f'
    }
}

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !fragment.chars().any(Self::needs_escape) {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if Self::needs_escape(c) {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            } else {
                writer.write_all(&[c as u8])?;
            }
        }
        Ok(())
    }
}

/// Encode `value` with [`SpacedFormatter`].
pub fn to_vec<T>(value: &T) -> serde_json::Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(64);
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Build a JSON response from an already encoded body.
pub fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let length = HeaderValue::from(body.len());
    (
        status,
        [
            (CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON)),
            (CONTENT_LENGTH, length),
        ],
        body,
    )
        .into_response()
}

/// A status code paired with a serializable payload.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub StatusCode, pub T);

impl<T> JsonBody<T> {
    pub fn ok(payload: T) -> Self {
        Self(StatusCode::OK, payload)
    }
}

impl<T: Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> Response {
        match to_vec(&self.1) {
            Ok(body) => json_response(self.0, body),
            Err(e) => AppError::from(e).into_response(),
        }
    }
}
