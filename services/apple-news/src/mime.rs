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

//! Content type detection for attachments.
//!
//! The decision is made in this order:
//!
//! 1. A file with extension `json` is always `application/json`.
//! 2. The type sniffed from the content, if it is in [`ALLOWED_MIMETYPES`].
//! 3. `application/octet-stream` otherwise.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::constants::*;

static ALLOWED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_MIMETYPES.iter().copied().collect());

/// Magic numbers and the content type they identify.
///
/// Some of them are not allowed as attachments, they are still detected so that
/// the allow-list stays the single place that decides.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", IMAGE_PNG),
    (b"\xff\xd8\xff", IMAGE_JPEG),
    (b"GIF87a", IMAGE_GIF),
    (b"GIF89a", IMAGE_GIF),
    (b"OTTO", FONT_OPENTYPE),
    (b"wOFF", FONT_WOFF),
    (b"%PDF-", APPLICATION_PDF),
];

/// Detect content type from the leading bytes of `content`.
pub fn sniff(content: &[u8]) -> Option<&'static str> {
    // WebP: RIFF header with WEBP at offset 8
    if content.len() >= 12 && content.starts_with(b"RIFF") && &content[8..12] == b"WEBP" {
        return Some(IMAGE_WEBP);
    }
    if is_sfnt(content) {
        return Some(FONT_SFNT);
    }

    SIGNATURES
        .iter()
        .find(|(magic, _)| content.starts_with(magic))
        .map(|(_, mimetype)| *mimetype)
}

/// TrueType offset table: version, numTables, then searchRange which must be
/// 16 times the largest power of two not above numTables.
fn is_sfnt(content: &[u8]) -> bool {
    if content.len() < 12 {
        return false;
    }
    if !content.starts_with(b"\x00\x01\x00\x00") && !content.starts_with(b"true") {
        return false;
    }

    let num_tables = u16::from_be_bytes([content[4], content[5]]);
    let search_range = u16::from_be_bytes([content[6], content[7]]);
    if num_tables == 0 {
        return false;
    }
    let pow2 = 1u32 << (15 - num_tables.leading_zeros());
    u32::from(search_range) == pow2 * 16
}

/// Check if given content type can be sent as is.
pub fn is_allowed(mimetype: &str) -> bool {
    ALLOWED.contains(mimetype)
}

/// Decide the content type of an attachment.
///
/// Never fails: anything unknown or not allowed ends up as `application/octet-stream`.
pub fn classify(path: impl AsRef<Path>, content: &[u8]) -> &'static str {
    if path.as_ref().extension().is_some_and(|ext| ext == "json") {
        return APPLICATION_JSON;
    }

    match sniff(content) {
        Some(mimetype) if is_allowed(mimetype) => mimetype,
        _ => APPLICATION_OCTET_STREAM,
    }
}
