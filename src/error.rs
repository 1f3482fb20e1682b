//! Error taxonomy for case compilation
//!
//! Structural errors (missing context keys, missing templates) abort the whole
//! compile. Geometry and link problems are reported per fragment and the
//! fragment is skipped, see [`CompileError::is_recoverable`].

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    /// A template placeholder or a context key required by a renderer is absent
    #[error("schema mismatch: `{key}` is missing in {scope}")]
    SchemaMismatch { scope: String, key: String },

    /// A template file referenced by a renderer does not exist
    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("degenerate geometry in {scope}.{field}: {reason}")]
    DegenerateGeometry {
        scope: String,
        field: String,
        reason: String,
    },

    #[error("dangling link {scope}: `{field}` is empty")]
    DanglingLink { scope: String, field: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("context serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    pub fn schema(scope: impl Into<String>, key: impl Into<String>) -> Self {
        CompileError::SchemaMismatch {
            scope: scope.into(),
            key: key.into(),
        }
    }

    pub fn degenerate(
        scope: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CompileError::DegenerateGeometry {
            scope: scope.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error only invalidates one fragment of the document
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CompileError::DegenerateGeometry { .. } | CompileError::DanglingLink { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        assert!(CompileError::degenerate("damping.left", "limitmax", "zero length").is_recoverable());
        assert!(!CompileError::schema("objects[0]", "mk").is_recoverable());
        let missing = CompileError::TemplateNotFound { path: PathBuf::from("x.xml") };
        assert!(!missing.is_recoverable());
        assert_eq!(missing.to_string(), "template not found: x.xml");
    }
}
