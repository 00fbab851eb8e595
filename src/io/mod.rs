//! Remote sources.

mod http;

pub use http::{HttpOptions, HttpRangeReader};
