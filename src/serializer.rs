use serde_json::Value;

use crate::{
    config::LoaderConfig,
    errors::GraphLoaderError,
    store::{Edge, Vertex},
};

/// Attribute-serialization template shared by every batch of a run. Vertex
/// records render as `id,attr...,is_seed`; edge records as `from,to,attr...`.
#[derive(Clone, Debug, Default)]
pub struct RecordTemplate {
    pub v_attributes: Vec<String>,
    pub e_attributes: Vec<String>,
}

impl RecordTemplate {
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            v_attributes: config.v_attributes.clone(),
            e_attributes: config.e_attributes.clone(),
        }
    }

    pub fn render_vertex(&self, vertex: &Vertex, is_seed: bool) -> Result<String, GraphLoaderError> {
        let mut fields = Vec::with_capacity(self.v_attributes.len() + 2);
        fields.push(vertex.id.to_string());
        for attr in &self.v_attributes {
            fields.push(attribute_value(
                &vertex.data,
                attr,
                &format!("vertex {}", vertex.id),
            )?);
        }
        fields.push(is_seed.to_string());
        Ok(fields.join(","))
    }

    pub fn render_edge(&self, edge: &Edge) -> Result<String, GraphLoaderError> {
        let mut fields = Vec::with_capacity(self.e_attributes.len() + 2);
        fields.push(edge.from_id.to_string());
        fields.push(edge.to_id.to_string());
        for attr in &self.e_attributes {
            fields.push(attribute_value(
                &edge.data,
                attr,
                &format!("edge {}", edge.id),
            )?);
        }
        Ok(fields.join(","))
    }
}

/// One batch's rendered output: one payload per entity kind, plus the
/// internal-to-external id map when the run used explicit seeds.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchPayload {
    pub batch_id: usize,
    pub vertex_batch: String,
    pub edge_batch: String,
    pub id_map: Option<Vec<(i64, String)>>,
}

/// Reads a scalar attribute out of an attribute bag. A missing name or a
/// non-scalar value is an engine-level failure, not a per-batch one.
fn attribute_value(data: &Value, name: &str, owner: &str) -> Result<String, GraphLoaderError> {
    let value = data
        .get(name)
        .ok_or_else(|| GraphLoaderError::attribute(format!("{owner} has no attribute {name}")))?;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(GraphLoaderError::attribute(format!(
            "attribute {name} on {owner} is not a scalar: {other}"
        ))),
    }
}

/// Evaluates a boolean attribute gate. Referencing an attribute that does not
/// exist or is not boolean is fatal and aborts the run.
pub fn boolean_attribute(vertex: &Vertex, name: &str) -> Result<bool, GraphLoaderError> {
    let value = vertex.data.get(name).ok_or_else(|| {
        GraphLoaderError::attribute(format!("vertex {} has no attribute {name}", vertex.id))
    })?;
    value.as_bool().ok_or_else(|| {
        GraphLoaderError::attribute(format!(
            "attribute {name} on vertex {} is not boolean",
            vertex.id
        ))
    })
}
