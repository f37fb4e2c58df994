use rusqlite::Connection;

use crate::errors::GraphLoaderError;

pub fn ensure_schema(conn: &Connection) -> Result<(), GraphLoaderError> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS graph_vertices (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            vertex_type TEXT NOT NULL,
            vertex_key  TEXT NOT NULL,
            data        TEXT NOT NULL,
            UNIQUE(vertex_type, vertex_key)
        );
        CREATE TABLE IF NOT EXISTS graph_edges (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            from_id   INTEGER NOT NULL,
            to_id     INTEGER NOT NULL,
            edge_type TEXT NOT NULL,
            data      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_vertices_type ON graph_vertices(vertex_type);
        CREATE INDEX IF NOT EXISTS idx_edges_from ON graph_edges(from_id);
        CREATE INDEX IF NOT EXISTS idx_edges_to ON graph_edges(to_id);
        CREATE INDEX IF NOT EXISTS idx_edges_type ON graph_edges(edge_type);
        "#,
    )
    .map_err(|e| GraphLoaderError::schema(e.to_string()))?;
    Ok(())
}
