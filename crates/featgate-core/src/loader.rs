//! Feature definition loading.
//!
//! # File Naming
//!
//! A definition directory holds one file per feature kind, named
//! `_<kind>_features.json` or `_<kind>_features.json5`. The kind in the
//! file name qualifies every bare feature name declared inside, so
//! `"tabs"` in `_permission_features.json` becomes `permission:tabs`.
//! Directories are scanned non-recursively, file names in sorted order.
//!
//! # Normalization
//!
//! After every file is read, attribute keys ending in a historical suffix
//! are renamed to the current one. The pass is idempotent; definitions
//! already using the current names load unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use featgate_types::{FeatureEntry, FeatureId};
use tracing::debug;

use crate::catalog::FeatureCatalog;
use crate::error::LoadError;

/// Key suffix renames applied to every loaded record.
const LEGACY_RENAMES: [(&str, &str); 2] =
    [("whitelist", "allowlist"), ("blacklist", "blocklist")];

const FILE_PREFIX: &str = "_";
const FILE_SUFFIXES: [&str; 2] = ["_features.json5", "_features.json"];

/// Feature definition loader with builder pattern.
///
/// # Example
///
/// ```ignore
/// use featgate_core::FeatureLoader;
///
/// let catalog = FeatureLoader::new()
///     .with_dir("platform/extensions/api")
///     .with_dir("platform/extensions/common")
///     .load()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureLoader {
    /// Definition directories, scanned in configuration order.
    dirs: Vec<PathBuf>,

    /// Skip legacy key renaming.
    skip_renames: bool,
}

impl FeatureLoader {
    /// Creates a new loader with no directories configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one definition directory.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    /// Adds several definition directories at once.
    #[must_use]
    pub fn with_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Skips the legacy key rename pass.
    ///
    /// Useful for inspecting definitions exactly as written.
    #[must_use]
    pub fn skip_legacy_renames(mut self) -> Self {
        self.skip_renames = true;
        self
    }

    /// Scans every configured directory and builds the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if a directory cannot be read, a definition
    /// file cannot be parsed, a feature identifier is defined twice across
    /// any two files, or an entry declares an empty variant list.
    pub fn load(&self) -> Result<FeatureCatalog, LoadError> {
        let mut catalog = FeatureCatalog::new();

        for dir in &self.dirs {
            self.load_dir(dir, &mut catalog)?;
        }

        if !self.skip_renames {
            normalize_legacy_names(&mut catalog);
        }

        Ok(catalog)
    }

    /// Loads every feature file in one directory, in sorted name order.
    fn load_dir(&self, dir: &Path, catalog: &mut FeatureCatalog) -> Result<(), LoadError> {
        let entries = std::fs::read_dir(dir).map_err(|e| LoadError::read_dir(dir, e))?;

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoadError::read_dir(dir, e))?;
            let path = entry.path();
            if let Some(kind) = feature_kind(&path) {
                files.push((kind, path));
            }
        }
        files.sort_by(|a, b| a.1.cmp(&b.1));

        for (kind, path) in files {
            self.load_file(&kind, &path, catalog)?;
        }

        Ok(())
    }

    /// Parses one definition file and merges its features into the catalog.
    fn load_file(
        &self,
        kind: &str,
        path: &Path,
        catalog: &mut FeatureCatalog,
    ) -> Result<(), LoadError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LoadError::read_file(path, e))?;

        let features: BTreeMap<String, FeatureEntry> =
            json5::from_str(&content).map_err(|e| LoadError::parse_file(path, e))?;

        let count = features.len();
        for (name, entry) in features {
            let id = FeatureId::new(kind, name);
            if entry.records().is_empty() {
                return Err(LoadError::malformed(id, path, "variant list is empty"));
            }
            if catalog.contains(&id) {
                return Err(LoadError::duplicate_feature(id, path));
            }
            catalog.insert(id, entry);
        }

        debug!(path = %path.display(), kind, features = count, "Loaded feature file");
        Ok(())
    }
}

/// Loads feature definitions from an ordered list of directories.
///
/// Convenience wrapper over [`FeatureLoader`] with default settings.
///
/// # Errors
///
/// Returns [`LoadError`] under the same conditions as
/// [`FeatureLoader::load`].
pub fn load_features<I, P>(dirs: I) -> Result<FeatureCatalog, LoadError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    FeatureLoader::new().with_dirs(dirs).load()
}

/// Extracts the feature kind from a definition file name.
///
/// Returns `None` for paths that are not feature definition files.
fn feature_kind(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_prefix(FILE_PREFIX)?;
    for suffix in FILE_SUFFIXES {
        if let Some(kind) = stem.strip_suffix(suffix) {
            if !kind.is_empty() {
                return Some(kind.to_string());
            }
        }
    }
    None
}

/// Applies the legacy suffix renames to every record in the catalog.
fn normalize_legacy_names(catalog: &mut FeatureCatalog) {
    let mut renamed = 0;
    for entry in catalog.entries_mut() {
        for record in entry.records_mut() {
            for (old, new) in LEGACY_RENAMES {
                renamed += record.rename_suffix(old, new);
            }
        }
    }
    if renamed > 0 {
        debug!(renamed, "Renamed legacy attribute keys");
    }
}
