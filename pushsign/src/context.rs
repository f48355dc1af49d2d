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

use pushsign_core::{Context, OsEnv};
use pushsign_file_read_tokio::TokioFileRead;
use pushsign_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;

/// DefaultContext builds a [`Context`] for the common runtime setup:
///
/// - files are read with tokio
/// - requests are sent with reqwest
/// - env is read from the current process
#[derive(Debug, Default, Clone)]
pub struct DefaultContext {
    client: Client,
}

impl DefaultContext {
    /// Create a new DefaultContext with a default reqwest client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new DefaultContext with given reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Build the context.
    pub fn build(self) -> Context {
        Context::new()
            .with_file_read(TokioFileRead)
            .with_http_send(ReqwestHttpSend::new(self.client))
            .with_env(OsEnv)
    }
}

impl From<DefaultContext> for Context {
    fn from(ctx: DefaultContext) -> Self {
        ctx.build()
    }
}

/// Create a [`Context`] with tokio file reading, reqwest transport and process env.
pub fn default_context() -> Context {
    DefaultContext::new().build()
}
