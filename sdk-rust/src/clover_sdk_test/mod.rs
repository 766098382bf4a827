//! Test doubles for code built on the Companion API.

mod transport;

pub use transport::{MockResponse, MockTransport};
