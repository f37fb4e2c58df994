use ahash::AHashSet;

use crate::{
    errors::GraphLoaderError,
    serializer::{BatchPayload, RecordTemplate},
    store::{Edge, Vertex},
};

/// Per-batch accumulator state, owned exclusively by one batch iteration.
/// The printed sets strictly determine what appears in the payload: a
/// vertex or edge already recorded is never rendered a second time.
pub struct BatchContext {
    batch_id: usize,
    printed_vertices: AHashSet<i64>,
    printed_edges: AHashSet<i64>,
    vertex_records: String,
    edge_records: String,
    id_map: Option<Vec<(i64, String)>>,
}

impl BatchContext {
    pub fn new(batch_id: usize, track_id_map: bool) -> Self {
        Self {
            batch_id,
            printed_vertices: AHashSet::new(),
            printed_edges: AHashSet::new(),
            vertex_records: String::new(),
            edge_records: String::new(),
            id_map: track_id_map.then(Vec::new),
        }
    }

    pub fn batch_id(&self) -> usize {
        self.batch_id
    }

    /// Renders the vertex unless it was already printed in this batch.
    /// Returns whether a record was appended.
    pub fn record_vertex(
        &mut self,
        vertex: &Vertex,
        is_seed: bool,
        template: &RecordTemplate,
    ) -> Result<bool, GraphLoaderError> {
        if !self.printed_vertices.insert(vertex.id) {
            return Ok(false);
        }
        let record = template.render_vertex(vertex, is_seed)?;
        self.vertex_records.push_str(&record);
        self.vertex_records.push('\n');
        if let Some(map) = self.id_map.as_mut() {
            map.push((vertex.id, vertex.key.clone()));
        }
        Ok(true)
    }

    /// Renders the edge unless it was already printed in this batch.
    pub fn record_edge(
        &mut self,
        edge: &Edge,
        template: &RecordTemplate,
    ) -> Result<bool, GraphLoaderError> {
        if !self.printed_edges.insert(edge.id) {
            return Ok(false);
        }
        let record = template.render_edge(edge)?;
        self.edge_records.push_str(&record);
        self.edge_records.push('\n');
        Ok(true)
    }

    pub fn vertex_printed(&self, id: i64) -> bool {
        self.printed_vertices.contains(&id)
    }

    pub fn into_payload(self) -> BatchPayload {
        BatchPayload {
            batch_id: self.batch_id,
            vertex_batch: self.vertex_records,
            edge_batch: self.edge_records,
            id_map: self.id_map,
        }
    }
}
