//! Loading and resolution errors.

use std::path::PathBuf;

use featgate_types::FeatureId;
use thiserror::Error;

/// Error raised while scanning and parsing feature definition files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a definition directory.
    #[error("failed to read feature directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a definition file.
    #[error("failed to read feature file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a definition file.
    #[error("failed to parse feature file '{path}': {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    /// The same feature identifier was defined twice.
    #[error("duplicate feature '{id}' redefined in '{path}'")]
    DuplicateFeature { id: FeatureId, path: PathBuf },

    /// A definition file declares a feature with an unusable shape.
    #[error("malformed feature '{id}' in '{path}': {message}")]
    Malformed {
        id: FeatureId,
        path: PathBuf,
        message: String,
    },
}

impl LoadError {
    /// Creates a read directory error.
    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse file error.
    pub fn parse_file(path: impl Into<PathBuf>, source: json5::Error) -> Self {
        Self::ParseFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a duplicate feature error.
    pub fn duplicate_feature(id: FeatureId, path: impl Into<PathBuf>) -> Self {
        Self::DuplicateFeature {
            id,
            path: path.into(),
        }
    }

    /// Creates a malformed feature error.
    pub fn malformed(
        id: FeatureId,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            id,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Error raised while resolving dependency graphs over a loaded catalog.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A complex feature was used as a parent without a designated default.
    #[error("feature '{id}' has multiple variants but no default_parent")]
    AmbiguousParent { id: FeatureId },

    /// A dependency branch revisited a feature it already contains.
    #[error("circular dependency on '{id}' while expanding '{root}'")]
    CircularDependency { id: FeatureId, root: FeatureId },
}

impl ResolveError {
    /// Creates an ambiguous parent error.
    pub fn ambiguous_parent(id: FeatureId) -> Self {
        Self::AmbiguousParent { id }
    }

    /// Creates a circular dependency error.
    pub fn circular_dependency(id: FeatureId, root: FeatureId) -> Self {
        Self::CircularDependency { id, root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_display() {
        let err = LoadError::duplicate_feature(
            FeatureId::parse("api:tabs"),
            "/defs/_api_features.json",
        );
        assert!(err.to_string().contains("api:tabs"));
        assert!(err.to_string().contains("_api_features.json"));
    }

    #[test]
    fn malformed_error_display() {
        let err = LoadError::malformed(
            FeatureId::parse("api:empty"),
            "/defs/_api_features.json",
            "variant list is empty",
        );
        assert!(err.to_string().contains("malformed"));
        assert!(err.to_string().contains("variant list is empty"));
    }

    #[test]
    fn resolve_error_display() {
        let err = ResolveError::circular_dependency(
            FeatureId::parse("api:a"),
            FeatureId::parse("api:b"),
        );
        assert!(err.to_string().contains("api:a"));
        assert!(err.to_string().contains("api:b"));
    }
}
