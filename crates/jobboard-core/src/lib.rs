//! Core types, repository traits, and services for the job board.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement the traits in [`store`]; transports drive [`service::JobBoard`].

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod admission;
pub mod employer;
pub mod error;
pub mod professional;
pub mod record;
pub mod reports;
pub mod service;
pub mod store;
pub mod vacancy;

pub use error::{Error, Result};
pub use service::JobBoard;
