//! Fetching and cleaning candidate pages.

pub mod clean;
pub mod http;

pub use clean::{clean_text, page_metadata, PageMetadata};
pub use http::HttpFetcher;
