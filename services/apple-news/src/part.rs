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

use std::path::Path;

use bytes::Bytes;
use log::debug;
use pushsign_core::{Context, Error, Result};

use crate::mime;

/// Part is one attachment of a multipart submission.
///
/// `size` must always equal `contents.len()`, the encoder refuses parts that
/// break this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Form field name, never contains spaces.
    pub name: String,
    /// File name sent to the server.
    pub filename: String,
    /// Content type of this part.
    pub mimetype: String,
    /// Raw content.
    pub contents: Bytes,
    /// Length of `contents` in bytes.
    pub size: usize,
}

impl Part {
    /// Build a part from explicit fields without touching the filesystem.
    pub fn new(
        name: &str,
        filename: impl Into<String>,
        mimetype: impl Into<String>,
        contents: impl Into<Bytes>,
    ) -> Self {
        let contents = contents.into();
        Self {
            name: normalize_name(name),
            filename: filename.into(),
            mimetype: mimetype.into(),
            size: contents.len(),
            contents,
        }
    }

    /// Build a part from a file on disk.
    ///
    /// - `name` is the file stem with spaces replaced by `-`
    /// - `filename` is the base name
    /// - `mimetype` is detected by [`mime::classify`]
    pub async fn from_file(ctx: &Context, path: &str) -> Result<Self> {
        let p = Path::new(path);
        let (Some(stem), Some(filename)) = (p.file_stem(), p.file_name()) else {
            return Err(Error::file_read(format!(
                "path {path} doesn't point to a file"
            )));
        };

        let contents = ctx.file_read(path).await?;
        let mimetype = mime::classify(p, &contents);
        debug!("built part from {path}: {mimetype}, {} bytes", contents.len());

        Ok(Self::new(
            &stem.to_string_lossy(),
            filename.to_string_lossy(),
            mimetype,
            contents,
        ))
    }
}

fn normalize_name(name: &str) -> String {
    name.replace(' ', "-")
}
