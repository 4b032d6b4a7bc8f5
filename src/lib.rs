// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Admin API Client
//!
//! Retrieves resource collections and event logs from an administrative HTTP
//! API, following every page until the server reports the end.
//!
//! ## Features
//!
//! - **Offset Pagination**: users, groups, phones, tokens via `next_offset`
//! - **Time Window Pagination**: v1 logs, with same-second collision handling
//! - **Cursor Pagination**: v2 logs via an opaque two-part cursor
//! - **Option Pipeline**: caller overrides for the first request
//! - **Pluggable Transport**: bring your own signing, or use the retrying client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use admin_api_client::admin::AdminClient;
//! use admin_api_client::config::ClientConfig;
//! use admin_api_client::pagination::{limit, OptionPipeline};
//!
//! #[tokio::main]
//! async fn main() -> admin_api_client::Result<()> {
//!     let config = ClientConfig::from_file("admin.yaml")?;
//!     let client = AdminClient::from_config(&config)?;
//!
//!     let users = client
//!         .get_users(&OptionPipeline::new().with(limit(300)))
//!         .await?;
//!     println!("{} users across {} pages", users.len(), users.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          AdminClient                            │
//! │   get_users()   get_groups()   get_admin_logs()  get_auth_logs()│
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴──┬───────────────┬───────────────┐
//! │   Paginator   │ CursorResolver  │   Envelope    │   Transport   │
//! ├───────────────┼─────────────────┼───────────────┼───────────────┤
//! │ Option        │ Offset          │ stat/response │ HttpClient    │
//! │ Pipeline      │ Log window (v1) │ metadata      │ Retry         │
//! │ Accumulate    │ Cursor (v2)     │ FAIL → error  │ Rate Limit    │
//! └───────────────┴─────────────────┴───────────────┴───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Response envelope decoding
pub mod decode;

/// Pagination strategies and the page loop
pub mod pagination;

/// Log records, windows and cursors
pub mod logs;

/// Retrieval operations
pub mod admin;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use admin::AdminClient;
pub use config::ClientConfig;
pub use pagination::{Accumulated, OptionPipeline};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
