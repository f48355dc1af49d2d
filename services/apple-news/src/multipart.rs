// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Multipart body encoder.
//!
//! ## Format
//!
//! ```text
//! "--" + boundary + CRLF
//! "Content-Type: application/json" + CRLF
//! "Content-Disposition: form-data; name=metadata" + CRLF
//! CRLF
//! metadata + CRLF
//! CRLF
//! (for each part)
//! "--" + boundary + CRLF
//! "Content-Type: " + mimetype + CRLF
//! "Content-Disposition: form-data; filename=" + filename + "; name=" + name + "; size=" + size + CRLF
//! CRLF
//! contents + CRLF
//! (end)
//! "--" + boundary + "--" + CRLF
//! CRLF
//! ```
//!
//! The metadata section is only present for non-empty metadata. The output is
//! signed byte for byte, so nothing here may depend on anything but the inputs.

use bytes::{BufMut, Bytes, BytesMut};
use pushsign_core::{Error, Result};

use crate::constants::*;
use crate::Part;

const CRLF: &[u8] = b"\r\n";

/// Max boundary length allowed by RFC 2046.
const MAX_BOUNDARY_LEN: usize = 70;

/// Build the `Content-Type` header value for given boundary.
pub fn content_type(boundary: &str) -> String {
    format!("{MULTIPART_FORM_DATA}; boundary={boundary}")
}

/// Encode parts into a multipart body.
///
/// Parts are written in the given order, after the metadata if any.
pub fn encode(parts: &[Part], boundary: &str, metadata: Option<&str>) -> Result<Bytes> {
    check_boundary(boundary)?;

    let metadata = metadata.filter(|v| !v.is_empty());
    let capacity = metadata.map_or(0, |v| v.len() + 128)
        + parts
            .iter()
            .map(|p| p.contents.len() + p.filename.len() + p.name.len() + 128)
            .sum::<usize>()
        + boundary.len()
        + 8;
    let mut buf = BytesMut::with_capacity(capacity);

    if let Some(metadata) = metadata {
        write_delimiter(&mut buf, boundary);
        write_headers(
            &mut buf,
            APPLICATION_JSON,
            &disposition(&[("name", METADATA_FIELD)]),
        );
        buf.put_slice(metadata.as_bytes());
        buf.put_slice(CRLF);
        buf.put_slice(CRLF);
    }

    for part in parts {
        if part.size != part.contents.len() {
            return Err(Error::encoding_invalid(format!(
                "part {} declares size {} but has {} bytes",
                part.name,
                part.size,
                part.contents.len()
            )));
        }

        let size = part.size.to_string();
        write_delimiter(&mut buf, boundary);
        write_headers(
            &mut buf,
            &part.mimetype,
            &disposition(&[
                ("filename", part.filename.as_str()),
                ("name", part.name.as_str()),
                ("size", size.as_str()),
            ]),
        );
        buf.put_slice(&part.contents);
        buf.put_slice(CRLF);
    }

    buf.put_slice(b"--");
    buf.put_slice(boundary.as_bytes());
    buf.put_slice(b"--");
    buf.put_slice(CRLF);
    buf.put_slice(CRLF);

    Ok(buf.freeze())
}

fn write_delimiter(buf: &mut BytesMut, boundary: &str) {
    buf.put_slice(b"--");
    buf.put_slice(boundary.as_bytes());
    buf.put_slice(CRLF);
}

/// Write part headers followed by the blank line that separates them from the content.
fn write_headers(buf: &mut BytesMut, mimetype: &str, disposition: &str) {
    buf.put_slice(b"Content-Type: ");
    buf.put_slice(mimetype.as_bytes());
    buf.put_slice(CRLF);
    buf.put_slice(b"Content-Disposition: form-data; ");
    buf.put_slice(disposition.as_bytes());
    buf.put_slice(CRLF);
    buf.put_slice(CRLF);
}

/// Render disposition params as `k1=v1; k2=v2`.
///
/// Values are form urlencoded, so a value can never break out of its parameter.
fn disposition(params: &[(&str, &str)]) -> String {
    let mut s = String::with_capacity(64);
    for (idx, (k, v)) in params.iter().enumerate() {
        if idx != 0 {
            s.push_str("; ");
        }
        s.push_str(k);
        s.push('=');
        s.extend(form_urlencoded::byte_serialize(v.as_bytes()));
    }
    s
}

/// Boundary ends up unquoted in `Content-Type`, so only token chars are accepted.
fn check_boundary(boundary: &str) -> Result<()> {
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
        return Err(Error::encoding_invalid(format!(
            "boundary must have 1 to {MAX_BOUNDARY_LEN} chars, got {}",
            boundary.len()
        )));
    }

    let valid = boundary
        .bytes()
        .all(|c| c.is_ascii_alphanumeric() || b"'+_-.".contains(&c));
    if !valid {
        return Err(Error::encoding_invalid(format!(
            "boundary {boundary} contains invalid chars"
        )));
    }

    Ok(())
}
