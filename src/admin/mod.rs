//! Admin API retrieval operations
//!
//! [`AdminClient`] maps each endpoint onto one of the pagination strategies:
//! offset paging for resource collections, time windows for v1 logs and the
//! composite cursor for v2 logs.

mod client;
mod logs;

pub use client::AdminClient;
