//! Core library for redlib-mcp
//!
//! This crate is the **Functional Core** of the redlib-mcp server, following the
//! Functional Core - Imperative Shell pattern:
//!
//! - **`redlib_mcp_core`** (this crate): pure transformations, zero I/O
//! - **`redlib-mcp`**: HTTP, filesystem, environment and the MCP transports
//!
//! Every function here is deterministic and tested with literal fixtures; no
//! mocking is needed.
//!
//! # Module Organization
//!
//! - [`normalize`]: turn URLs, bare names and prefixed paths into canonical paths
//! - [`routes`]: build the request (path + query) for each of the six operations
//! - [`shape`]: prune Redlib JSON to a compact whitelist and collapse authors
//! - [`config`]: decide the Redlib base address from its candidate sources
//! - [`auth`]: OIDC settings and OAuth metadata for the gated HTTP transport
//!
//! # Example Usage
//!
//! ```rust
//! use redlib_mcp_core::routes::subreddit_request;
//! use redlib_mcp_core::shape::{shape_envelope, Envelope};
//!
//! let request = subreddit_request("https://reddit.com/r/rust", None, None, None, None);
//! assert_eq!(request.path, "/r/rust/hot");
//!
//! let envelope: Envelope = serde_json::from_str(
//!     r#"{"data": {"posts": [{"id": "1", "author": {"name": "ferris"}, "awards": []}]}, "error": null}"#,
//! )
//! .unwrap();
//! let shaped = shape_envelope(&envelope);
//! assert_eq!(shaped.data["posts"][0]["author"], "ferris");
//! ```

pub mod auth;
pub mod config;
pub mod normalize;
pub mod routes;
pub mod shape;
