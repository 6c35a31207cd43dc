//! # embedfn
//!
//! Configurable text-embedding function for vector-database clients: split
//! raw text into chunks, send consecutive batches to a remote embedding
//! service over HTTP, and return one numeric vector per chunk.
//!
//! The interesting part is the configuration lifecycle: a config is fully
//! validated before it is stored, serviceUrl/model/encodingFormat/
//! chunkOverlap/chunkStrategy are fixed once set, and only chunkSize and
//! the splitter may be revised afterwards. Invalid input is rejected with
//! field-attributed errors whose exact strings downstream tooling relies on.

pub mod config;
pub mod embedfn;
pub mod error;
pub mod remote;

pub use config::{EmbedConfig, RawEmbedConfig, Splitter, validate_config, validate_config_update};
pub use embedfn::EmbeddingFunction;
pub use error::EmbedFnError;
pub use remote::{DEFAULT_CHUNK_SIZE, RemoteEmbeddingFunction};
