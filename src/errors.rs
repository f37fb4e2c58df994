use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphLoaderError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("schema error: {0}")]
    SchemaError(String),
    #[error("query error: {0}")]
    QueryError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("attribute error: {0}")]
    AttributeError(String),
}

impl GraphLoaderError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        GraphLoaderError::ConnectionError(msg.into())
    }

    pub fn schema<T: Into<String>>(msg: T) -> Self {
        GraphLoaderError::SchemaError(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        GraphLoaderError::QueryError(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GraphLoaderError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GraphLoaderError::InvalidInput(msg.into())
    }

    pub fn attribute<T: Into<String>>(msg: T) -> Self {
        GraphLoaderError::AttributeError(msg.into())
    }
}
