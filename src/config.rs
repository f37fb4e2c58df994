use serde::{Deserialize, Serialize};

use crate::{errors::GraphLoaderError, store::VertexRef};

/// Broker authentication fields. Absent values stay as empty strings and are
/// passed through to every publish call as-is, never omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerAuth {
    pub security_protocol: String,
    pub sasl_mechanism: String,
    pub sasl_username: String,
    pub sasl_password: String,
    pub ssl_ca_location: String,
}

/// Broker target. Its presence on [`LoaderConfig`] switches the run from
/// direct delivery to streaming delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTarget {
    pub address: String,
    pub topic: String,
    pub auth: BrokerAuth,
}

#[derive(Clone, Debug)]
pub struct LoaderConfig {
    pub num_batches: usize,
    pub num_neighbors: usize,
    pub num_hops: usize,
    pub shuffle: bool,
    pub filter_by: Option<String>,
    /// Types eligible as seeds. Falls back to `v_types`, then to every type.
    pub seed_types: Vec<String>,
    /// Types eligible as sampled neighbors. Empty means unrestricted.
    pub v_types: Vec<String>,
    /// Edge types eligible for traversal. Empty means unrestricted.
    pub e_types: Vec<String>,
    /// Explicit seed set. When non-empty the candidate partition is bypassed
    /// and these vertices seed every batch iteration.
    pub input_vertices: Vec<VertexRef>,
    /// Vertex attribute names rendered into each vertex record, in order.
    pub v_attributes: Vec<String>,
    /// Edge attribute names rendered into each edge record, in order.
    pub e_attributes: Vec<String>,
    pub stream: Option<StreamTarget>,
    /// Seed for all randomized decisions of the run. Entropy-seeded when unset.
    pub rng_seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            num_batches: 1,
            num_neighbors: 10,
            num_hops: 2,
            shuffle: false,
            filter_by: None,
            seed_types: Vec::new(),
            v_types: Vec::new(),
            e_types: Vec::new(),
            input_vertices: Vec::new(),
            v_attributes: Vec::new(),
            e_attributes: Vec::new(),
            stream: None,
            rng_seed: None,
        }
    }
}

impl LoaderConfig {
    /// Derives `num_batches` from a desired per-batch seed count.
    pub fn with_batch_size(
        mut self,
        batch_size: usize,
        candidate_count: usize,
    ) -> Result<Self, GraphLoaderError> {
        if batch_size == 0 {
            return Err(GraphLoaderError::invalid_input("batch_size must be positive"));
        }
        self.num_batches = candidate_count.div_ceil(batch_size).max(1);
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), GraphLoaderError> {
        if self.num_batches == 0 {
            return Err(GraphLoaderError::invalid_input(
                "num_batches must be positive",
            ));
        }
        if let Some(target) = &self.stream {
            if target.address.trim().is_empty() {
                return Err(GraphLoaderError::invalid_input(
                    "stream target requires a broker address",
                ));
            }
            if target.topic.trim().is_empty() {
                return Err(GraphLoaderError::invalid_input(
                    "stream target requires a topic",
                ));
            }
        }
        if let Some(attr) = &self.filter_by {
            if attr.trim().is_empty() {
                return Err(GraphLoaderError::invalid_input(
                    "filter_by attribute name must not be blank",
                ));
            }
        }
        Ok(())
    }

    /// Candidate vertex types for seed selection.
    pub fn candidate_types(&self) -> &[String] {
        if !self.seed_types.is_empty() {
            &self.seed_types
        } else {
            &self.v_types
        }
    }
}
