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

//! Apple News API request signer.

use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::HeaderValue;
use log::debug;
use pushsign_core::hash::{base64_decode, base64_hmac_sha256};
use pushsign_core::time::{format_iso8601, now, DateTime};
use pushsign_core::{Context, Error, Result, SignRequest};

use crate::constants::*;
use crate::credential::Credential;

/// RequestSigner that implements Apple News API HHMAC authorization.
///
/// The signature covers method, path, date, content type and the whole body.
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut http::request::Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;

        // Taken once: the same value is signed and sent.
        let date = format_iso8601(self.time.unwrap_or_else(now));
        let content_type = match req.headers.get(CONTENT_TYPE) {
            Some(v) => v.to_str().map_err(|e| {
                Error::request_invalid("content type is not visible ascii").with_source(e)
            })?,
            None => "",
        };

        let canonical = canonical_request(
            req.method.as_str(),
            req.uri.path(),
            &date,
            content_type,
            body,
        );
        debug!(
            "canonical request: method={}, path={}, date={date}, content_type={content_type}, body_len={}",
            req.method,
            req.uri.path(),
            body.len()
        );

        let signature = signature(&canonical, &cred.secret)?;

        let mut value: HeaderValue = authorization(&cred.key_id, &signature, &date).parse()?;
        value.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, value);

        Ok(())
    }
}

/// Construct the canonical request.
///
/// ## Format
///
/// ```text
/// UPPERCASE(Method) + Path + Date + Content-Type + Body
/// ```
///
/// There are no separators between fields. Any query string in `path` is dropped.
pub fn canonical_request(
    method: &str,
    path: &str,
    date: &str,
    content_type: &str,
    body: &[u8],
) -> Vec<u8> {
    let path = path.split_once('?').map_or(path, |(p, _)| p);

    let mut s = Vec::with_capacity(
        method.len() + path.len() + date.len() + content_type.len() + body.len(),
    );
    s.extend_from_slice(method.to_ascii_uppercase().as_bytes());
    s.extend_from_slice(path.as_bytes());
    s.extend_from_slice(date.as_bytes());
    s.extend_from_slice(content_type.as_bytes());
    s.extend_from_slice(body);
    s
}

/// Compute base64 encoded HMAC-SHA256 of the canonical request.
///
/// `secret` is the base64 encoded API secret, the decoded bytes are the HMAC key.
pub fn signature(canonical: &[u8], secret: &str) -> Result<String> {
    if secret.is_empty() {
        return Err(Error::credential_invalid("api secret is empty"));
    }
    let key = base64_decode(secret)
        .map_err(|e| Error::credential_invalid("api secret is not valid base64").with_source(e))?;

    Ok(base64_hmac_sha256(&key, canonical))
}

fn authorization(key_id: &str, signature: &str, date: &str) -> String {
    format!("{HHMAC}; key={key_id}; signature={signature}; date={date}")
}
