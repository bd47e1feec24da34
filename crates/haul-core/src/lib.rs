//! Core types and trait definitions for the Haul pickup tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod error;
pub mod lifecycle;
pub mod resolver;
pub mod store;
pub mod submission;

pub use error::{Error, Result};
