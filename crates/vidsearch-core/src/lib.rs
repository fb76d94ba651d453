//! Video Search Client Core Library
//!
//! Blocking client for an XML video search API, with lazy pagination over
//! result pages.
//!
//! # Overview
//!
//! This crate provides:
//! - A rate-limited HTTP transport behind the [`Transport`] trait
//! - An XML parser turning responses into [`Page`]s
//! - [`VideoClient`] for video searches and related tag/channel/category/user lookups
//! - [`ResultCursor`], which fetches follow-up pages as its videos are consumed
//!
//! # Example
//!
//! ```no_run
//! use vidsearch_core::{ClientConfig, Result, VideoClient, VideoOptions};
//!
//! fn main() -> Result<()> {
//!     let client = VideoClient::new(ClientConfig::new("my-app-id"))?;
//!
//!     let mut cursor = client.get_videos("doctor who", VideoOptions::default());
//!     if let Some(error) = cursor.error() {
//!         eprintln!("search failed: {} {}", error.code, error.text);
//!         return Ok(());
//!     }
//!
//!     // Pages are fetched transparently, up to the 1000th result
//!     for video in cursor.iterate().take(50) {
//!         println!("{}", video.get("title").map(String::as_str).unwrap_or("?"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Query methods never return `Err`. Every failure is reported on the
//! returned cursor: remote `<Error Code=...>` responses keep the remote
//! code, transport and parse failures use [`INTERNAL_ERROR_CODE`].
//! Mismatched result counts are only warnings ([`Page::warnings`]).

mod client;
mod cursor;
pub mod directives;
mod error;
pub mod parser;
#[cfg(test)]
mod testing;
mod transport;
mod types;
pub mod url;

// Re-export client types
pub use client::VideoClient;

// Re-export cursor types
pub use cursor::{CursorState, MAX_RESULT_POSITION, ResultCursor};

// Re-export error types
pub use error::{Result, VidsearchError};

// Re-export parser functions
pub use parser::parse_response;

// Re-export transport types
pub use transport::{ClientConfig, HttpTransport, RateLimiter, Transport};

// Re-export data types
pub use types::{
    ApiError, Facet, INTERNAL_ERROR_CODE, Method, NamedCounts, Page, QueryParameters,
    RelatedOptions, VideoOptions, VideoRecord, singularize,
};

// Re-export URL helper functions for convenience
pub use url::{build_query_string, build_request_path, build_request_url};
