//! JSON-RPC over HTTP: `HttpProvider` with per-method retry policies.

pub mod client;
pub mod retry;

pub use client::HttpProvider;
pub use retry::{MethodClass, RetryConfig, RetryPolicy};
