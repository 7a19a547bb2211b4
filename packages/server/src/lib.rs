// Biography Source Curation - API Core
//
// Thin HTTP surface over the curation pipeline. Every route maps to one
// inbound operation of `source_curation::CurationPipeline`.

pub mod config;
pub mod server;

pub use config::*;
