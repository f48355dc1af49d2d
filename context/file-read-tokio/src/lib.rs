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

//! Tokio-based file reading implementation for pushsign.
//!
//! This crate provides `TokioFileRead`, an async file reader that implements
//! the `FileRead` trait from `pushsign_core` using Tokio's file system operations.
//!
//! ## Example
//!
//! ```no_run
//! use pushsign_core::{Context, OsEnv};
//! use pushsign_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_env(OsEnv);
//!
//!     match ctx.file_read("/path/to/logo.png").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use pushsign_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
///
/// The whole file is read before returning, attachments are never handed out partially.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::file_read(format!("failed to read file {path}")).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushsign_core::{Context, ErrorKind};
    use std::io::Write;

    #[tokio::test]
    async fn test_file_read() -> Result<()> {
        let mut f = tempfile::NamedTempFile::new().expect("temp file must be created");
        f.write_all(b"\x89PNG\r\n\x1a\nrest")
            .expect("temp file must be written");

        let ctx = Context::new().with_file_read(TokioFileRead);
        let content = ctx
            .file_read(f.path().to_str().expect("path must be utf-8"))
            .await?;
        assert_eq!(content, b"\x89PNG\r\n\x1a\nrest");
        Ok(())
    }

    #[tokio::test]
    async fn test_file_read_missing() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("missing.png");

        let ctx = Context::new().with_file_read(TokioFileRead);
        let err = ctx
            .file_read(path.to_str().expect("path must be utf-8"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileRead);
        assert!(err.to_string().contains("missing.png"));
    }
}
