//! Feature-gate resolution engine.
//!
//! This crate turns directories of raw feature definition files into
//! answers to one question: *what does it take for this feature to be
//! generally available?*
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Definition files                                            │
//! │  _api_features.json, _permission_features.json5, ...        │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ FeatureLoader::load
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │  FeatureCatalog   id -> entry, duplicate-free, normalized    │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ expand (flatten + fan out)
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │  Expansion        every end-to-end combination of records   │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ AdmissionPolicy::admit
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │  Option<Admission>  required permission set, or None        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loading is the only stage that touches the file system; everything
//! after it is a pure function over the catalog, so a loaded catalog can
//! be shared across threads and queried concurrently.
//!
//! # Example
//!
//! ```
//! use featgate_core::{load_features, AdmissionPolicy};
//! use featgate_types::FeatureId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! std::fs::write(
//!     dir.path().join("_api_features.json"),
//!     r#"{ "tabs": { "dependencies": ["permission:tabs"] } }"#,
//! )?;
//! std::fs::write(
//!     dir.path().join("_permission_features.json"),
//!     r#"{ "tabs": {} }"#,
//! )?;
//!
//! let catalog = load_features([dir.path()])?;
//! let expansion = catalog.expand(&FeatureId::parse("api:tabs"))?;
//!
//! let admission = AdmissionPolicy::new()
//!     .admit(&expansion)
//!     .expect("nothing restricts the tabs API");
//! assert!(admission.permissions.contains("tabs"));
//! # Ok(())
//! # }
//! ```

mod cache;
mod catalog;
mod error;
mod expand;
mod loader;
mod policy;

pub use cache::{ByteSource, CachedSource, Freshness};
pub use catalog::FeatureCatalog;
pub use error::{LoadError, ResolveError};
pub use expand::{ExpandedFeature, Expansion, Run};
pub use loader::{load_features, FeatureLoader};
pub use policy::{allowed_channel, Admission, AdmissionPolicy, ALL_URLS};
