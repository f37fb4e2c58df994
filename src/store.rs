use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::{cache::AdjacencyCache, errors::GraphLoaderError, schema::ensure_schema};

/// A typed vertex. `id` is the engine-internal stable identifier, `key` the
/// application-level handle it was loaded under. Attributes live in `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    pub id: i64,
    pub vertex_type: String,
    pub key: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: i64,
    pub from_id: i64,
    pub to_id: i64,
    pub edge_type: String,
    pub data: serde_json::Value,
}

/// Reference to a vertex by its external handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexRef {
    pub key: String,
    pub vertex_type: String,
}

pub struct GraphStore {
    conn: Connection,
    outgoing_cache: AdjacencyCache,
}

impl GraphStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GraphLoaderError> {
        let conn =
            Connection::open(path).map_err(|e| GraphLoaderError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, GraphLoaderError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| GraphLoaderError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Inserts a vertex and returns the SQLite rowid (monotonically increasing per connection).
    pub fn insert_vertex(&self, vertex: &Vertex) -> Result<i64, GraphLoaderError> {
        validate_vertex(vertex)?;
        let data = serde_json::to_string(&vertex.data)
            .map_err(|e| GraphLoaderError::invalid_input(e.to_string()))?;
        self.conn
            .execute(
                "INSERT INTO graph_vertices(vertex_type, vertex_key, data) VALUES(?1, ?2, ?3)",
                params![vertex.vertex_type.as_str(), vertex.key.as_str(), data],
            )
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_vertex(&self, id: i64) -> Result<Vertex, GraphLoaderError> {
        self.conn
            .query_row(
                "SELECT id, vertex_type, vertex_key, data FROM graph_vertices WHERE id=?1",
                params![id],
                |row| row_to_vertex(row),
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    GraphLoaderError::not_found(format!("vertex {id}"))
                }
                other => GraphLoaderError::query(other.to_string()),
            })
    }

    pub fn insert_edge(&self, edge: &Edge) -> Result<i64, GraphLoaderError> {
        validate_edge(edge)?;
        if !self.vertex_exists(edge.from_id)? || !self.vertex_exists(edge.to_id)? {
            return Err(GraphLoaderError::invalid_input(
                "edge endpoints must reference existing vertices",
            ));
        }
        let data = serde_json::to_string(&edge.data)
            .map_err(|e| GraphLoaderError::invalid_input(e.to_string()))?;
        self.conn
            .execute(
                "INSERT INTO graph_edges(from_id, to_id, edge_type, data) VALUES(?1, ?2, ?3, ?4)",
                params![edge.from_id, edge.to_id, edge.edge_type.as_str(), data],
            )
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        self.outgoing_cache.clear();
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_edge(&self, id: i64) -> Result<Edge, GraphLoaderError> {
        self.conn
            .query_row(
                "SELECT id, from_id, to_id, edge_type, data FROM graph_edges WHERE id=?1",
                params![id],
                |row| row_to_edge(row),
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    GraphLoaderError::not_found(format!("edge {id}"))
                }
                other => GraphLoaderError::query(other.to_string()),
            })
    }

    /// Ids of every vertex whose type is in `types`, all vertices when
    /// `types` is empty. Ascending id order.
    pub fn vertex_ids_by_types(&self, types: &[String]) -> Result<Vec<i64>, GraphLoaderError> {
        if types.is_empty() {
            return self.collect_ids("SELECT id FROM graph_vertices ORDER BY id", &[]);
        }
        let placeholders = (1..=types.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT id FROM graph_vertices WHERE vertex_type IN ({placeholders}) ORDER BY id"
        );
        let bound: Vec<&dyn rusqlite::ToSql> =
            types.iter().map(|t| t as &dyn rusqlite::ToSql).collect();
        self.collect_ids(&sql, &bound)
    }

    pub fn resolve_ref(&self, vertex: &VertexRef) -> Result<i64, GraphLoaderError> {
        self.conn
            .query_row(
                "SELECT id FROM graph_vertices WHERE vertex_type=?1 AND vertex_key=?2",
                params![vertex.vertex_type.as_str(), vertex.key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| GraphLoaderError::query(e.to_string()))?
            .ok_or_else(|| {
                GraphLoaderError::not_found(format!(
                    "vertex {}:{}",
                    vertex.vertex_type, vertex.key
                ))
            })
    }

    pub fn outgoing_edges(&self, id: i64) -> Result<Vec<Edge>, GraphLoaderError> {
        if let Some(cached) = self.outgoing_cache.get(id) {
            return Ok(cached);
        }
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, from_id, to_id, edge_type, data FROM graph_edges \
                 WHERE from_id=?1 ORDER BY to_id, edge_type, id",
            )
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![id], |row| row_to_edge(row))
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        let mut edges = Vec::new();
        for edge in rows {
            edges.push(edge.map_err(|e| GraphLoaderError::query(e.to_string()))?);
        }
        self.outgoing_cache.insert(id, edges.clone());
        Ok(edges)
    }

    pub fn vertex_count(&self) -> Result<usize, GraphLoaderError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM graph_vertices", [], |row| row.get(0))
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        Ok(count as usize)
    }

    fn collect_ids(
        &self,
        sql: &str,
        bound: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<i64>, GraphLoaderError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        let rows = stmt
            .query_map(bound, |row| row.get(0))
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id.map_err(|e| GraphLoaderError::query(e.to_string()))?);
        }
        Ok(ids)
    }

    fn vertex_exists(&self, id: i64) -> Result<bool, GraphLoaderError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM graph_vertices WHERE id=?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| GraphLoaderError::query(e.to_string()))?;
        Ok(exists.is_some())
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            outgoing_cache: AdjacencyCache::new(),
        }
    }
}

fn row_to_vertex(row: &rusqlite::Row<'_>) -> Result<Vertex, rusqlite::Error> {
    let data: String = row.get(3)?;
    let value: serde_json::Value = serde_json::from_str(&data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            data.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })?;
    Ok(Vertex {
        id: row.get(0)?,
        vertex_type: row.get(1)?,
        key: row.get(2)?,
        data: value,
    })
}

fn row_to_edge(row: &rusqlite::Row<'_>) -> Result<Edge, rusqlite::Error> {
    let data: String = row.get(4)?;
    let value: serde_json::Value = serde_json::from_str(&data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            data.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })?;
    Ok(Edge {
        id: row.get(0)?,
        from_id: row.get(1)?,
        to_id: row.get(2)?,
        edge_type: row.get(3)?,
        data: value,
    })
}

fn validate_vertex(vertex: &Vertex) -> Result<(), GraphLoaderError> {
    if vertex.vertex_type.trim().is_empty() {
        return Err(GraphLoaderError::invalid_input("vertex type must be set"));
    }
    if vertex.key.trim().is_empty() {
        return Err(GraphLoaderError::invalid_input("vertex key must be set"));
    }
    Ok(())
}

fn validate_edge(edge: &Edge) -> Result<(), GraphLoaderError> {
    if edge.edge_type.trim().is_empty() {
        return Err(GraphLoaderError::invalid_input("edge type must be set"));
    }
    if edge.from_id <= 0 || edge.to_id <= 0 {
        return Err(GraphLoaderError::invalid_input(
            "edge endpoints must be positive ids",
        ));
    }
    Ok(())
}
