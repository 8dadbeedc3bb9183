//! The loaded feature catalog and inheritance resolution.

use std::collections::BTreeMap;

use featgate_types::{FeatureEntry, FeatureId, FeatureRecord};

use crate::error::ResolveError;

/// Mapping from feature identifier to its definition entry.
///
/// Built once by the loader and immutable afterward; every resolution
/// operation takes `&self`, so a catalog can be shared across threads
/// freely. Iteration order is identifier order (kind, then name), which
/// keeps listings and expansions deterministic.
///
/// # Example
///
/// ```ignore
/// use featgate_core::load_features;
/// use featgate_types::FeatureId;
///
/// let catalog = load_features(["platform/extensions/api"])?;
/// let expansion = catalog.expand(&FeatureId::parse("api:tabs"))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCatalog {
    features: BTreeMap<FeatureId, FeatureEntry>,
}

impl FeatureCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: FeatureId, entry: FeatureEntry) {
        self.features.insert(id, entry);
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut FeatureEntry> {
        self.features.values_mut()
    }

    /// Returns the entry for `id`, if the catalog defines it.
    #[must_use]
    pub fn get(&self, id: &FeatureId) -> Option<&FeatureEntry> {
        self.features.get(id)
    }

    /// Returns `true` if the catalog defines `id`.
    #[must_use]
    pub fn contains(&self, id: &FeatureId) -> bool {
        self.features.contains_key(id)
    }

    /// Number of features in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the catalog holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Every loaded identifier of kind `api`, in identifier order.
    #[must_use]
    pub fn all_apis(&self) -> Vec<&FeatureId> {
        self.features.keys().filter(|id| id.is_api()).collect()
    }

    /// The record to use when `id` is consulted as a parent.
    ///
    /// An undefined feature contributes an empty record; a single-record
    /// entry contributes that record; a complex entry contributes the first
    /// variant flagged `default_parent`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::AmbiguousParent`] if the entry has multiple
    /// variants and none carries the flag.
    pub fn default_variant(&self, id: &FeatureId) -> Result<FeatureRecord, ResolveError> {
        let Some(entry) = self.features.get(id) else {
            return Ok(FeatureRecord::new());
        };

        let records = entry.records();
        if records.len() == 1 {
            return Ok(records[0].clone());
        }

        records
            .iter()
            .find(|record| record.is_default_parent())
            .cloned()
            .ok_or_else(|| ResolveError::ambiguous_parent(id.clone()))
    }

    /// Resolves `id` against its dotted ancestor chain.
    ///
    /// Starts from the entry's own records (one empty record if the catalog
    /// does not define `id`) and walks the name's ancestors from nearest to
    /// root, filling in attributes the candidates do not define yet. The
    /// merge is shallow and the child always wins; a dot-free name consults
    /// no ancestors at all.
    ///
    /// Returns one fully inherited record per declared variant.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::AmbiguousParent`] if an ancestor on the
    /// chain is complex without a designated default variant.
    pub fn flatten(&self, id: &FeatureId) -> Result<Vec<FeatureRecord>, ResolveError> {
        let mut candidates: Vec<FeatureRecord> = match self.features.get(id) {
            Some(entry) => entry.records().to_vec(),
            None => vec![FeatureRecord::new()],
        };

        let mut ancestor = id.parent();
        while let Some(parent_id) = ancestor {
            let defaults = self.default_variant(&parent_id)?;
            for candidate in &mut candidates {
                candidate.merge_under(&defaults);
            }
            ancestor = parent_id.parent();
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn catalog(entries: &[(&str, Value)]) -> FeatureCatalog {
        let mut catalog = FeatureCatalog::new();
        for (id, value) in entries {
            let entry: FeatureEntry =
                serde_json::from_value(value.clone()).expect("test entry parses");
            catalog.insert(FeatureId::parse(id), entry);
        }
        catalog
    }

    #[test]
    fn all_apis_filters_and_sorts() {
        let catalog = catalog(&[
            ("api:tabs", json!({})),
            ("api:bookmarks", json!({})),
            ("permission:tabs", json!({})),
            ("manifest:icons", json!({})),
        ]);

        let apis: Vec<String> = catalog.all_apis().iter().map(|id| id.to_string()).collect();
        assert_eq!(apis, vec!["api:bookmarks", "api:tabs"]);
    }

    #[test]
    fn default_variant_of_absent_feature_is_empty() {
        let catalog = FeatureCatalog::new();
        let record = catalog.default_variant(&FeatureId::parse("api:ghost")).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn default_variant_of_single_entry_is_that_record() {
        let catalog = catalog(&[("api:tabs", json!({ "channel": "beta" }))]);
        let record = catalog.default_variant(&FeatureId::parse("api:tabs")).unwrap();
        assert_eq!(record.channel(), Some("beta"));
    }

    #[test]
    fn default_variant_of_complex_entry_uses_flag() {
        let catalog = catalog(&[(
            "api:storage",
            json!([
                { "channel": "dev" },
                { "channel": "stable", "default_parent": true },
            ]),
        )]);

        let record = catalog.default_variant(&FeatureId::parse("api:storage")).unwrap();
        assert_eq!(record.channel(), Some("stable"));
    }

    #[test]
    fn first_flagged_variant_wins() {
        let catalog = catalog(&[(
            "api:storage",
            json!([
                { "channel": "dev", "default_parent": true },
                { "channel": "stable", "default_parent": true },
            ]),
        )]);

        let record = catalog.default_variant(&FeatureId::parse("api:storage")).unwrap();
        assert_eq!(record.channel(), Some("dev"));
    }

    #[test]
    fn complex_entry_without_flag_is_ambiguous() {
        let catalog = catalog(&[(
            "api:storage",
            json!([{ "channel": "dev" }, { "channel": "stable" }]),
        )]);

        let err = catalog.default_variant(&FeatureId::parse("api:storage")).unwrap_err();
        assert!(
            matches!(err, ResolveError::AmbiguousParent { id } if id == FeatureId::parse("api:storage"))
        );
    }

    #[test]
    fn flatten_unknown_feature_is_one_empty_record() {
        let catalog = FeatureCatalog::new();
        let records = catalog.flatten(&FeatureId::parse("api:ghost")).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_empty());
    }

    #[test]
    fn flatten_fills_gaps_from_ancestors() {
        let catalog = catalog(&[
            ("api:system", json!({ "internal": true, "channel": "stable" })),
            ("api:system.cpu", json!({ "channel": "dev" })),
            ("api:system.cpu.info", json!({ "dependencies": ["permission:cpu"] })),
        ]);

        let records = catalog.flatten(&FeatureId::parse("api:system.cpu.info")).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.dependencies(), vec!["permission:cpu"]);
        // Nearest ancestor supplies channel; the root still fills internal.
        assert_eq!(record.channel(), Some("dev"));
        assert!(record.is_internal());
    }

    #[test]
    fn flatten_child_wins_over_every_ancestor() {
        let catalog = catalog(&[
            ("api:a", json!({ "channel": "stable" })),
            ("api:a.b", json!({ "channel": "beta" })),
            ("api:a.b.c", json!({ "channel": "trunk" })),
        ]);

        let records = catalog.flatten(&FeatureId::parse("api:a.b.c")).unwrap();
        assert_eq!(records[0].channel(), Some("trunk"));
    }

    #[test]
    fn flatten_dot_free_name_consults_no_ancestors() {
        let catalog = catalog(&[("api:solo", json!({ "channel": "beta" }))]);

        let records = catalog.flatten(&FeatureId::parse("api:solo")).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 1);
    }

    #[test]
    fn flatten_complex_feature_keeps_one_record_per_variant() {
        let catalog = catalog(&[
            ("api:storage", json!({ "internal": true })),
            (
                "api:storage.local",
                json!([{ "channel": "stable" }, { "channel": "dev" }]),
            ),
        ]);

        let records = catalog.flatten(&FeatureId::parse("api:storage.local")).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].channel(), Some("stable"));
        assert_eq!(records[1].channel(), Some("dev"));
        assert!(records.iter().all(FeatureRecord::is_internal));
    }

    #[test]
    fn flatten_propagates_ambiguous_ancestor() {
        let catalog = catalog(&[
            ("api:storage", json!([{ "channel": "dev" }, { "channel": "stable" }])),
            ("api:storage.local", json!({})),
        ]);

        let err = catalog.flatten(&FeatureId::parse("api:storage.local")).unwrap_err();
        assert!(matches!(err, ResolveError::AmbiguousParent { .. }));
    }
}
