//! Client library for the remote run API.
//!
//! Provides the [`RemoteApi`] trait the run orchestration is written against
//! and [`TfeClient`], its HTTPS implementation.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod wire;

pub use api::RemoteApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::TfeClient;
