//! Metadata lookup platform

pub mod client;

pub use client::{HttpClientConfig, TikwmClient, DEFAULT_API_ENDPOINT};
