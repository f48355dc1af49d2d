use anyhow::Result;
use bytes::Bytes;
use pushsign_core::Context;
use pushsign_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Large article bundles can take a while to upload.
    let client = Client::builder()
        .timeout(Duration::from_secs(120))
        .user_agent("pushsign-example/1.0")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let test_url = "https://httpbin.org/post";
    println!("Testing HTTP client with POST {test_url}");

    let req = http::Request::post(test_url)
        .header("Content-Type", "application/json")
        .body(Bytes::from_static(br#"{"title":"hello"}"#))?;

    let resp = ctx.http_send_as_string(req).await?;
    println!("Response status: {}", resp.status());
    println!("{}", resp.body());

    Ok(())
}
