//! Core types for the featgate engine.
//!
//! This crate provides the foundational vocabulary for featgate: feature
//! identifiers, release channels, and raw feature records.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Vocabulary Layer                          │
//! │  (Stable, minimal dependencies, safe to depend on)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  featgate-types : FeatureId, Channel, FeatureRecord ◄── HERE │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  featgate-core  : loader, catalog, expansion, admission     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Frontend Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  featgate-cli   : Command-line interface                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Features are addressed by composite identifiers: a kind (`api`,
//! `permission`, `manifest`, ...) and a dotted name whose segments form a
//! parent chain. Parsing an identifier never fails:
//!
//! - **Total**: malformed text becomes an identifier that simply matches
//!   nothing in a catalog, mirroring how lookups in loosely-typed feature
//!   files behave
//! - **Ordered**: identifiers sort by kind, then name, so catalog walks
//!   are deterministic
//! - **Serialization**: first-class serde support as `"kind:name"` strings
//!
//! # Record Design
//!
//! A [`FeatureRecord`] is deliberately schemaless: it keeps the parsed JSON
//! object whole and exposes typed accessors only for the attributes the
//! engine interprets (`dependencies`, `default_parent`, `internal`,
//! `allowlist`, `matches`, `channel`). Unknown attributes survive loading,
//! merging, and serialization untouched.
//!
//! # Example
//!
//! ```
//! use featgate_types::{Channel, FeatureId};
//!
//! let api = FeatureId::parse("api:storage.local");
//! assert_eq!(api.kind, "api");
//! assert_eq!(api.parent(), Some(FeatureId::new("api", "storage")));
//!
//! // Channels form a ladder from most to least stable.
//! let gate: Channel = "beta".parse().unwrap();
//! assert!(gate.admits(Channel::Canary));
//! assert!(!gate.admits(Channel::Stable));
//! ```

mod channel;
mod id;
mod record;

pub use channel::{Channel, ChannelError};
pub use id::{FeatureId, KIND_API, KIND_MANIFEST, KIND_PERMISSION};
pub use record::{FeatureEntry, FeatureRecord};
