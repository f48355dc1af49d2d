//! Apple News API request builder and signer.
//!
//! Articles are submitted as `multipart/form-data` and authorized with the
//! `HHMAC` scheme. The signature covers the exact body bytes, so the body is
//! encoded once and the same `Bytes` is signed and sent.
//!
//! # Example
//!
//! ```no_run
//! use pushsign_apple_news::{Assembler, RequestSigner, StaticCredentialProvider, Submission};
//! use pushsign_core::{Context, Signer};
//!
//! # async fn example(ctx: Context) -> pushsign_core::Result<()> {
//! let signer = Signer::new(
//!     ctx,
//!     StaticCredentialProvider::new("key_id", "c2VjcmV0"),
//!     RequestSigner::new(),
//! );
//! let assembler = Assembler::new(signer);
//!
//! let submission = Submission::new()
//!     .with_json(r#"{"title":"Hello"}"#)
//!     .with_file("images/logo.png");
//! let resp = assembler.send("/channels/abc/articles", &submission).await?;
//! println!("{}", resp.status());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

pub mod mime;

mod part;
pub use part::Part;

mod boundary;
pub use boundary::{GenerateBoundary, RandomBoundary, StaticBoundary};

pub mod multipart;

mod sign_request;
pub use sign_request::{canonical_request, signature, RequestSigner};

mod assemble;
pub use assemble::{Assembler, Submission};
