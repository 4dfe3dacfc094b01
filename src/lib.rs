//! esi_gateway library: edge-side include resolution for HTML responses
//!
//! This library serves a static site and rewrites outgoing HTML responses by
//! resolving embedded `<esi:include src="..." />` directives: each directive
//! is fetched and its body spliced into the page in place of the tag before
//! the response reaches the client. Failed includes degrade to inline HTML
//! comments; the page always renders.
//!
//! # Example
//!
//! ```no_run
//! use esi_gateway::{Config, run_gateway};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     root: std::path::PathBuf::from("./public"),
//!     port: 8788,
//!     ..Default::default()
//! };
//!
//! let report = run_gateway(config).await?;
//! println!("Handled {} requests, assembled {} documents",
//!          report.requests, report.documents_assembled);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod assets;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod interceptor;
mod parse;
mod resolve;
mod server;
mod status_server;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ErrorType, InfoType, InitializationError, ProcessingStats};
pub use resolve::Resolver;
pub use server::{run_gateway, Gateway, GatewayReport};
