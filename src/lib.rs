//! Typed client for the Humany help-portal REST API.
//!
//! ```no_run
//! use humany::{Query, ServiceClient};
//!
//! # async fn run() -> humany::Result<()> {
//! let client = ServiceClient::new("https://help.humany.net/admin-help-en/")?
//!     .with_language("en");
//!
//! let found = client
//!     .get_guides(Query::new().phrase("guide").set("pCategory", "5"))
//!     .await?;
//! for guide in &found.matches {
//!     println!("{}", guide.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;

pub use api::*;
pub use cache::{MemoryCache, PassThrough, ResponseCache};
pub use config::ClientConfig;
pub use error::{HumanyError, Result};
