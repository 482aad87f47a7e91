//! Cancelable fetch binding.
//!
//! This module provides:
//! - Fetch, the network primitive as an explicit dependency
//! - BoundFetch, a fetch that attaches a lifecycle's abort signal to every call
//! - FetchBinder, which hands effect bodies a BoundFetch
//! - ReqwestFetcher, the HTTP implementation (feature `http`)

mod binder;
mod bound;
#[cfg(feature = "http")]
mod http;
mod protocol;
mod request;

pub use binder::FetchBinder;
pub use bound::BoundFetch;
#[cfg(feature = "http")]
pub use http::ReqwestFetcher;
pub use protocol::Fetch;
pub use request::{FetchResponse, RequestInit};

#[cfg(test)]
pub use protocol::MockFetch;
