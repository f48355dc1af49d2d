use async_trait::async_trait;
use bytes::Bytes;
use http::request::Parts;
use pushsign_core::hash::base64_hmac_sha256;
use pushsign_core::{
    Context, Error, OsEnv, ProvideCredential, Result, SignRequest, Signer, SigningCredential,
};

// Define a custom credential type
#[derive(Clone, Debug)]
struct MyCredential {
    api_key: String,
    api_secret: String,
}

impl SigningCredential for MyCredential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

// Implement a credential provider that loads from environment
#[derive(Debug)]
struct MyCredentialProvider;

#[async_trait]
impl ProvideCredential for MyCredentialProvider {
    type Credential = MyCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let api_key = ctx.env_var("MY_API_KEY").unwrap_or_default();
        let api_secret = ctx.env_var("MY_API_SECRET").unwrap_or_default();

        // For demo purposes, use dummy credentials if none are provided
        if api_key.is_empty() || api_secret.is_empty() {
            println!("No credentials found in environment, using demo credentials");
            return Ok(Some(MyCredential {
                api_key: "demo-api-key".to_string(),
                api_secret: "demo-api-secret".to_string(),
            }));
        }

        Ok(Some(MyCredential {
            api_key,
            api_secret,
        }))
    }
}

// Sign method, path and body with the api secret.
#[derive(Debug)]
struct MyRequestSigner;

#[async_trait]
impl SignRequest for MyRequestSigner {
    type Credential = MyCredential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("no credential provided"))?;

        let mut string_to_sign = Vec::new();
        string_to_sign.extend_from_slice(req.method.as_str().as_bytes());
        string_to_sign.extend_from_slice(req.uri.path().as_bytes());
        string_to_sign.extend_from_slice(body);

        let signature = base64_hmac_sha256(cred.api_secret.as_bytes(), &string_to_sign);
        req.headers.insert("x-api-key", cred.api_key.parse()?);
        req.headers.insert("x-api-signature", signature.parse()?);

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_env(OsEnv);
    let signer = Signer::new(ctx, MyCredentialProvider, MyRequestSigner);

    let body = Bytes::from_static(br#"{"title":"hello"}"#);
    let (mut parts, body) = http::Request::post("https://api.example.com/articles")
        .body(body)?
        .into_parts();

    signer.sign(&mut parts, &body).await?;

    println!("Signed request headers:");
    for (name, value) in &parts.headers {
        println!("  {}: {:?}", name, value);
    }

    Ok(())
}
