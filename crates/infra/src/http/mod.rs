//! HTTP transport with retry and cancellation

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
