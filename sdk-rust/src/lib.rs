mod client_utils;
mod companion;
mod errors;
pub mod http;
mod opentelemetry;
mod transport;
mod types;
mod types_ext;

pub mod clover_sdk_test;

pub use companion::{CompanionApi, CONTEXT_SEEN_PATH, OVERVIEW_PATH, SUMMARY_PATH};
pub use errors::*;
pub use transport::{ApiRequest, Method, Transport};
pub use types::*;
