//! Core types and trait definitions for the incident store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Backends implement [`store::IncidentStore`]; consumers depend on the trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod incident;
pub mod moderation;
pub mod status;
pub mod store;

pub use error::{Error, Result};
