//! Batched training-subgraph extraction over a SQLite-backed property graph.
//! Partitions a candidate vertex population into batches, expands each batch's
//! seeds through bounded multi-hop neighbor sampling, and delivers the
//! deduplicated subgraphs directly or through a message broker.

pub mod batch;
pub mod cache;
pub mod config;
pub mod errors;
pub mod loader;
pub mod sampler;
pub mod schema;
pub mod seed;
pub mod serializer;
pub mod sink;
pub mod store;

pub use crate::config::{BrokerAuth, LoaderConfig, StreamTarget};
pub use crate::errors::GraphLoaderError;
pub use crate::loader::{LoaderOutput, run_loader};
pub use crate::serializer::{BatchPayload, RecordTemplate};
pub use crate::sink::{BrokerProducer, PublishOutcome, UPGRADE_REQUIRED_CODE};
pub use crate::store::{Edge, GraphStore, Vertex, VertexRef};
