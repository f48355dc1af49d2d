//! Apple News API support with convenience APIs

pub use pushsign_apple_news::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Signer};

/// Default Apple News Signer type.
#[cfg(feature = "default-context")]
pub type DefaultSigner = Signer<Credential>;

/// Create a default Apple News signer.
///
/// The signer uses the default context and reads the credential from
/// `APPLE_NEWS_API_KEY_ID` and `APPLE_NEWS_API_KEY_SECRET`.
#[cfg(feature = "default-context")]
pub fn default_signer() -> DefaultSigner {
    Signer::new(
        default_context(),
        DefaultCredentialProvider::new(),
        RequestSigner::new(),
    )
}

/// Create a default Apple News assembler.
///
/// `APPLE_NEWS_ENDPOINT` overrides the endpoint if set.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> pushsign_core::Result<()> {
/// use pushsign::apple_news::{default_assembler, Submission};
///
/// let assembler = default_assembler();
/// let req = assembler
///     .assemble("/articles", &Submission::new().with_json(r#"{"title":"x"}"#))
///     .await?;
/// println!("{:?}", req.headers());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_assembler() -> Assembler {
    Assembler::from_config(default_context(), Config::new())
}
