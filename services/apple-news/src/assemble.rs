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

use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, EXPECT};
use log::debug;
use pushsign_core::{Context, Error, Result, Signer};
use serde::Serialize;

use crate::boundary::{GenerateBoundary, RandomBoundary};
use crate::config::Config;
use crate::constants::*;
use crate::credential::Credential;
use crate::multipart;
use crate::part::Part;
use crate::provide_credential::ConfigCredentialProvider;
use crate::sign_request::RequestSigner;

/// Submission lists everything attached to one multipart request.
///
/// - `metadata` becomes the leading `metadata` part.
/// - `json` becomes the `article.json` part.
/// - `files` are read from disk and attached in order.
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Raw JSON metadata document.
    pub metadata: Option<String>,
    /// Inline article document.
    pub json: Option<String>,
    /// Paths of the files to attach.
    pub files: Vec<String>,
}

impl Submission {
    /// Create an empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the metadata document.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Set the inline article document.
    pub fn with_json(mut self, json: impl Into<String>) -> Self {
        self.json = Some(json.into());
        self
    }

    /// Set the inline article document from a serializable value.
    pub fn with_json_value<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let json = serde_json::to_string(value)
            .map_err(|e| Error::request_invalid("failed to serialize article").with_source(e))?;
        Ok(self.with_json(json))
    }

    /// Append a file to attach.
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.files.push(path.into());
        self
    }
}

/// Assembler builds signed multipart requests for the Apple News API.
///
/// Every call to [`Assembler::assemble`] uses a fresh boundary and timestamp,
/// and the body that is signed is the body that is returned.
#[derive(Debug, Clone)]
pub struct Assembler {
    signer: Signer<Credential>,
    endpoint: String,
    boundary: Arc<dyn GenerateBoundary>,
}

impl Assembler {
    /// Create a new assembler with the default endpoint.
    pub fn new(signer: Signer<Credential>) -> Self {
        Self {
            signer,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            boundary: Arc::new(RandomBoundary),
        }
    }

    /// Create a new assembler from config.
    ///
    /// Unset config values are loaded from env through `ctx`.
    pub fn from_config(ctx: Context, config: Config) -> Self {
        let config = config.from_env(&ctx);
        let endpoint = config.endpoint().to_string();

        let signer = Signer::new(
            ctx,
            ConfigCredentialProvider::new(Arc::new(config)),
            RequestSigner::new(),
        );
        Self::new(signer).with_endpoint(endpoint)
    }

    /// Set the endpoint, for example `https://news-api.apple.com`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the boundary generator.
    pub fn with_boundary(mut self, boundary: impl GenerateBoundary) -> Self {
        self.boundary = Arc::new(boundary);
        self
    }

    /// Get the endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build a signed `POST` request to `path`.
    ///
    /// No network call is made.
    pub async fn assemble(
        &self,
        path: &str,
        submission: &Submission,
    ) -> Result<http::Request<Bytes>> {
        let ctx = self.signer.context();
        let boundary = self.boundary.generate_boundary();
        debug!("assembling request to {path} with boundary {boundary}");

        let mut parts = Vec::with_capacity(submission.files.len() + 1);
        if let Some(json) = submission.json.as_deref().filter(|v| !v.is_empty()) {
            parts.push(Part::new(
                ARTICLE_NAME,
                ARTICLE_FILENAME,
                APPLICATION_JSON,
                json.to_string(),
            ));
        }
        for file in &submission.files {
            parts.push(Part::from_file(ctx, file).await?);
        }
        for part in &parts {
            debug!("attaching part {}: {}, {} bytes", part.name, part.mimetype, part.size);
        }

        let body = multipart::encode(&parts, &boundary, submission.metadata.as_deref())?;

        let (mut req, _) = http::Request::post(self.uri(path))
            .header(CONTENT_TYPE, multipart::content_type(&boundary))
            .header(CONTENT_LENGTH, body.len())
            .body(())?
            .into_parts();
        req.headers.remove(EXPECT);

        self.signer.sign(&mut req, &body).await?;
        debug!("assembled request to {}: {} bytes", req.uri, body.len());

        Ok(http::Request::from_parts(req, body))
    }

    /// Assemble the request and send it.
    ///
    /// The response is returned as is, whatever its status.
    pub async fn send(
        &self,
        path: &str,
        submission: &Submission,
    ) -> Result<http::Response<Bytes>> {
        let req = self.assemble(path, submission).await?;
        self.signer.context().http_send(req).await
    }

    fn uri(&self, path: &str) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{endpoint}{path}")
        } else {
            format!("{endpoint}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::StaticBoundary;
    use crate::sign_request::{canonical_request, signature};
    use crate::StaticCredentialProvider;
    use async_trait::async_trait;
    use http::header::AUTHORIZATION;
    use pretty_assertions::assert_eq;
    use pushsign_core::{ErrorKind, HttpSend, StaticEnv};
    use pushsign_file_read_tokio::TokioFileRead;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const SECRET: &str = "MDEyMzQ1Njc4OWFiY2RlZg==";
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    #[derive(Debug, Default, Clone)]
    struct RecordingHttpSend {
        requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
    }

    #[async_trait]
    impl HttpSend for RecordingHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.requests.lock().unwrap().push(req);
            Ok(http::Response::builder()
                .status(201)
                .body(Bytes::from_static(br#"{"data":{}}"#))?)
        }
    }

    fn assembler(http: RecordingHttpSend, secret: &str) -> Assembler {
        let ctx = Context::new()
            .with_file_read(TokioFileRead)
            .with_http_send(http);
        let signer = Signer::new(
            ctx,
            StaticCredentialProvider::new("key_id", secret),
            RequestSigner::new(),
        );
        Assembler::new(signer).with_boundary(StaticBoundary::new("b"))
    }

    /// Check the Authorization header the way the server does.
    fn verify(req: &http::Request<Bytes>) -> bool {
        let auth = req.headers()[AUTHORIZATION].to_str().unwrap();
        let field = |name: &str| {
            auth.split("; ")
                .find_map(|v| v.strip_prefix(name))
                .unwrap()
                .to_string()
        };
        let content_type = req.headers()[CONTENT_TYPE].to_str().unwrap();

        let canonical = canonical_request(
            req.method().as_str(),
            req.uri().path(),
            &field("date="),
            content_type,
            req.body(),
        );
        signature(&canonical, SECRET).unwrap() == field("signature=")
    }

    #[tokio::test]
    async fn test_assemble_json_and_logo() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = tempfile::tempdir()?;
        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, PNG)?;

        let submission = Submission::new()
            .with_json(r#"{"title":"x"}"#)
            .with_file(logo.to_string_lossy());
        let req = assembler(RecordingHttpSend::default(), SECRET)
            .assemble("/articles", &submission)
            .await?;

        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--b\r\n\
Content-Type: application/json\r\n\
Content-Disposition: form-data; filename=article.json; name=article; size=13\r\n\
\r\n\
{\"title\":\"x\"}\r\n\
--b\r\n\
Content-Type: image/png\r\n\
Content-Disposition: form-data; filename=logo.png; name=logo; size=16\r\n\
\r\n",
        );
        expected.extend_from_slice(PNG);
        expected.extend_from_slice(b"\r\n--b--\r\n\r\n");

        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(req.uri(), "https://news-api.apple.com/articles");
        assert_eq!(req.body().as_ref(), expected.as_slice());
        assert_eq!(
            req.headers()[CONTENT_TYPE],
            "multipart/form-data; boundary=b"
        );
        assert_eq!(
            req.headers()[CONTENT_LENGTH],
            expected.len().to_string().as_str()
        );
        assert!(req.headers().get(EXPECT).is_none());
        assert!(req.headers()[AUTHORIZATION]
            .to_str()?
            .starts_with("HHMAC; key=key_id; signature="));
        assert!(verify(&req));
        Ok(())
    }

    #[tokio::test]
    async fn test_assemble_metadata_only() -> anyhow::Result<()> {
        let submission = Submission::new().with_metadata("{}");
        let req = assembler(RecordingHttpSend::default(), SECRET)
            .assemble("/channels/abc/articles", &submission)
            .await?;

        let body = std::str::from_utf8(req.body())?;
        assert_eq!(
            body,
            "--b\r\n\
Content-Type: application/json\r\n\
Content-Disposition: form-data; name=metadata\r\n\
\r\n\
{}\r\n\
\r\n\
--b--\r\n\
\r\n"
        );
        assert_eq!(body.matches("--b\r\n").count(), 1);
        assert!(verify(&req));
        Ok(())
    }

    #[tokio::test]
    async fn test_assemble_empty_json_is_absent() -> anyhow::Result<()> {
        let submission = Submission::new().with_json("");
        let req = assembler(RecordingHttpSend::default(), SECRET)
            .assemble("/articles", &submission)
            .await?;

        assert_eq!(req.body().as_ref(), b"--b--\r\n\r\n");
        Ok(())
    }

    #[test]
    fn test_with_json_value() -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct Article<'a> {
            title: &'a str,
        }

        let submission = Submission::new().with_json_value(&Article { title: "x" })?;
        assert_eq!(submission.json.as_deref(), Some(r#"{"title":"x"}"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_boundary_in_header_matches_body() -> anyhow::Result<()> {
        let http = RecordingHttpSend::default();
        let ctx = Context::new().with_http_send(http);
        let signer = Signer::new(
            ctx,
            StaticCredentialProvider::new("key_id", SECRET),
            RequestSigner::new(),
        );
        let assembler = Assembler::new(signer);

        let submission = Submission::new().with_json(r#"{"title":"x"}"#);
        let a = assembler.assemble("/articles", &submission).await?;
        let b = assembler.assemble("/articles", &submission).await?;

        let content_type = a.headers()[CONTENT_TYPE].to_str()?;
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        assert!(a.body().starts_with(format!("--{boundary}\r\n").as_bytes()));
        assert!(a.body().ends_with(format!("--{boundary}--\r\n\r\n").as_bytes()));
        assert_ne!(a.headers()[CONTENT_TYPE], b.headers()[CONTENT_TYPE]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_assemble_keeps_requests_apart() -> anyhow::Result<()> {
        let ctx = Context::new().with_http_send(RecordingHttpSend::default());
        let signer = Signer::new(
            ctx,
            StaticCredentialProvider::new("key_id", SECRET),
            RequestSigner::new(),
        );
        let assembler = Assembler::new(signer);

        let mut tasks = Vec::new();
        for i in 0..32 {
            let assembler = assembler.clone();
            tasks.push(tokio::spawn(async move {
                let json = format!(r#"{{"title":"article {i}"}}"#);
                let submission = Submission::new().with_json(json.clone());
                let req = assembler.assemble("/articles", &submission).await;
                (json, req)
            }));
        }

        let mut boundaries = std::collections::HashSet::new();
        for task in tasks {
            let (json, req) = task.await?;
            let req = req?;

            let content_type = req.headers()[CONTENT_TYPE].to_str()?;
            let boundary = content_type
                .strip_prefix("multipart/form-data; boundary=")
                .unwrap()
                .to_string();
            let body = req.body();
            assert!(body.starts_with(format!("--{boundary}\r\n").as_bytes()));
            assert!(body.ends_with(format!("--{boundary}--\r\n\r\n").as_bytes()));
            assert!(body
                .windows(json.len())
                .any(|w| w == json.as_bytes()));
            assert!(verify(&req));
            assert!(boundaries.insert(boundary));
        }
        assert_eq!(boundaries.len(), 32);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_passes_response_through() -> anyhow::Result<()> {
        let http = RecordingHttpSend::default();
        let submission = Submission::new().with_metadata(r#"{"isPreview":true}"#);

        let resp = assembler(http.clone(), SECRET)
            .send("/channels/abc/articles", &submission)
            .await?;

        assert_eq!(resp.status(), 201);
        assert_eq!(resp.body().as_ref(), br#"{"data":{}}"#);

        let requests = http.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].uri(),
            "https://news-api.apple.com/channels/abc/articles"
        );
        assert!(verify(&requests[0]));
        Ok(())
    }

    #[tokio::test]
    async fn test_send_missing_file_makes_no_call() -> anyhow::Result<()> {
        let http = RecordingHttpSend::default();
        let dir = tempfile::tempdir()?;
        let submission = Submission::new()
            .with_json(r#"{"title":"x"}"#)
            .with_file(dir.path().join("missing.png").to_string_lossy());

        let err = assembler(http.clone(), SECRET)
            .send("/articles", &submission)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FileRead);
        assert!(http.requests.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_invalid_secret_makes_no_call() {
        let http = RecordingHttpSend::default();
        let submission = Submission::new().with_metadata("{}");

        let err = assembler(http.clone(), "not base64!")
            .send("/articles", &submission)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(http.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let submission = Submission::new().with_metadata("{}");

        let err = assembler(RecordingHttpSend::default(), SECRET)
            .with_endpoint("not a uri")
            .assemble("/articles", &submission)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_uri() {
        let assembler = assembler(RecordingHttpSend::default(), SECRET);
        assert_eq!(
            assembler.uri("/articles"),
            "https://news-api.apple.com/articles"
        );

        let assembler = assembler.with_endpoint("https://example.com/api/");
        assert_eq!(assembler.uri("articles"), "https://example.com/api/articles");
    }

    #[tokio::test]
    async fn test_from_config() -> anyhow::Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (APPLE_NEWS_API_KEY_ID.to_string(), "env_key".to_string()),
                (APPLE_NEWS_API_KEY_SECRET.to_string(), SECRET.to_string()),
                (
                    APPLE_NEWS_ENDPOINT.to_string(),
                    "https://news-api.example.com".to_string(),
                ),
            ]),
        });

        let assembler = Assembler::from_config(ctx, Config::new().with_key_id("config_key"))
            .with_boundary(StaticBoundary::new("b"));
        assert_eq!(assembler.endpoint(), "https://news-api.example.com");

        let req = assembler
            .assemble("/articles", &Submission::new().with_metadata("{}"))
            .await?;
        assert!(req.headers()[AUTHORIZATION]
            .to_str()?
            .starts_with("HHMAC; key=config_key; "));
        assert!(verify(&req));
        Ok(())
    }
}
