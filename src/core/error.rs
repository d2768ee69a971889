//! Error types for the grass system

use thiserror::Error;

/// Main error type for grass paging and shader generation
#[derive(Debug, Error)]
pub enum Error {
    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("{what} count {requested} exceeds the 16-bit limit of {limit}")]
    CapacityExceeded {
        what: &'static str,
        requested: usize,
        limit: usize,
    },

    #[error("Shader compile error in {name}: {reason}")]
    ShaderCompile { name: String, reason: String },

    #[error("Field error: {0}")]
    Field(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = Error::CapacityExceeded {
            what: "quad",
            requested: 65536,
            limit: 65535,
        };
        assert_eq!(
            err.to_string(),
            "quad count 65536 exceeds the 16-bit limit of 65535"
        );
    }

    #[test]
    fn test_json_conversion() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
