use anyhow::Result;
use pushsign::apple_news::{Assembler, DefaultCredentialProvider, RequestSigner, Submission};
use pushsign::{DefaultContext, Signer};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Build the context from tokio, reqwest and process env
    let ctx = DefaultContext::new().build();

    // Credential is loaded from APPLE_NEWS_API_KEY_ID and APPLE_NEWS_API_KEY_SECRET
    let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
    let assembler = Assembler::new(signer);

    let submission = Submission::new()
        .with_metadata(r#"{"data":{"isPreview":true}}"#)
        .with_json(r#"{"version":"1.7","identifier":"hello","title":"Hello"}"#);

    // Inspect the signed request without sending it
    let req = assembler.assemble("/channels/abc/articles", &submission).await?;
    println!("{:?}", req.headers());

    Ok(())
}
