//! Publish an article with its assets to Apple News.
//!
//! ```shell
//! export APPLE_NEWS_API_KEY_ID=...
//! export APPLE_NEWS_API_KEY_SECRET=...
//! cargo run --example publish_article -- <channel_id> article.json images/logo.png
//! ```

use anyhow::{bail, Result};
use pushsign_apple_news::{Assembler, Config, Submission};
use pushsign_core::{Context, OsEnv};
use pushsign_file_read_tokio::TokioFileRead;
use pushsign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let mut args = std::env::args().skip(1);
    let Some(channel) = args.next() else {
        bail!("usage: publish_article <channel_id> [files...]");
    };

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let assembler = Assembler::from_config(ctx, Config::new());

    let submission = args.fold(
        Submission::new().with_metadata(r#"{"data":{"isPreview":true}}"#),
        |s, file| s.with_file(file),
    );

    let resp = assembler
        .send(&format!("/channels/{channel}/articles"), &submission)
        .await?;

    println!("{}", resp.status());
    println!("{}", String::from_utf8_lossy(resp.body()));
    Ok(())
}
