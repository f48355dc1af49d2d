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

use crate::{constants::*, Credential};
use async_trait::async_trait;
use pushsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads Apple News credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `APPLE_NEWS_API_KEY_ID`: The API key id
/// - `APPLE_NEWS_API_KEY_SECRET`: The base64 encoded API key secret
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let key_id = ctx.env_var(APPLE_NEWS_API_KEY_ID);
        let secret = ctx.env_var(APPLE_NEWS_API_KEY_SECRET);

        match (key_id, secret) {
            (Some(key_id), Some(secret)) => Ok(Some(Credential { key_id, secret })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushsign_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let envs = HashMap::from([
            (APPLE_NEWS_API_KEY_ID.to_string(), "test_key_id".to_string()),
            (
                APPLE_NEWS_API_KEY_SECRET.to_string(),
                "dGVzdF9zZWNyZXQ=".to_string(),
            ),
        ]);
        let ctx = Context::new().with_env(StaticEnv { envs });

        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await?;
        let cred = cred.expect("credential must be loaded");
        assert_eq!(cred.key_id, "test_key_id");
        assert_eq!(cred.secret, "dGVzdF9zZWNyZXQ=");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_missing_credentials() -> anyhow::Result<()> {
        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&Context::new()).await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial_credentials() -> anyhow::Result<()> {
        // Only key id
        let envs = HashMap::from([(APPLE_NEWS_API_KEY_ID.to_string(), "test_key_id".to_string())]);
        let ctx = Context::new().with_env(StaticEnv { envs });

        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }
}
