//! Raw feature records and catalog entries.
//!
//! A record is an unordered bag of named attributes exactly as it appeared
//! in a definition file. The handful of attributes the resolution engine
//! understands get typed accessors; everything else rides along opaquely
//! and is never merged destructively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One variant of a feature definition.
///
/// Wraps the parsed JSON object. An empty record is the neutral element for
/// merging: merging it under anything changes nothing, and merging anything
/// under it yields that thing.
///
/// # Example
///
/// ```
/// use featgate_types::FeatureRecord;
/// use serde_json::json;
///
/// let record: FeatureRecord =
///     serde_json::from_value(json!({ "dependencies": ["permission:tabs"] }))
///         .expect("object parses to a record");
/// assert_eq!(record.dependencies(), vec!["permission:tabs"]);
/// assert!(!record.is_internal());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    attrs: Map<String, Value>,
}

impl FeatureRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw attribute value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Returns `true` if the record defines `key`, whatever its value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Inserts an attribute, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.attrs.insert(key.into(), value)
    }

    /// Removes an attribute, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attrs.remove(key)
    }

    /// Number of attributes on the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if the record has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Borrow of the underlying attribute map.
    #[must_use]
    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    /// The feature identifiers this record requires, in declaration order.
    ///
    /// Non-string members of the `dependencies` list are skipped; records
    /// are taken as found and not schema-validated.
    #[must_use]
    pub fn dependencies(&self) -> Vec<&str> {
        match self.attrs.get("dependencies").and_then(Value::as_array) {
            Some(list) => list.iter().filter_map(Value::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Returns `true` if this variant is flagged as the one a parent/child
    /// lookup should use when the feature is only referenced as an ancestor.
    #[must_use]
    pub fn is_default_parent(&self) -> bool {
        self.bool_attr("default_parent")
    }

    /// Returns `true` if the feature is marked internal-only.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.bool_attr("internal")
    }

    /// Returns `true` if the record declares an `allowlist`, regardless of
    /// the list's contents.
    #[must_use]
    pub fn has_allowlist(&self) -> bool {
        self.attrs.contains_key("allowlist")
    }

    /// The URL match patterns the record declares, if any.
    ///
    /// `None` means unrestricted. A declared `matches` that is not an array
    /// is treated as an empty pattern list (declared but satisfying
    /// nothing) rather than ignored.
    #[must_use]
    pub fn url_patterns(&self) -> Option<Vec<&str>> {
        let declared = self.attrs.get("matches")?;
        match declared.as_array() {
            Some(list) => Some(list.iter().filter_map(Value::as_str).collect()),
            None => Some(Vec::new()),
        }
    }

    /// The minimum release channel the record declares, if any.
    #[must_use]
    pub fn channel(&self) -> Option<&str> {
        self.attrs.get("channel").and_then(Value::as_str)
    }

    /// Fills in every attribute of `ancestor` that this record does not
    /// already define. Shallow: values are taken whole, never merged
    /// key-by-key inside.
    ///
    /// # Example
    ///
    /// ```
    /// use featgate_types::FeatureRecord;
    /// use serde_json::json;
    ///
    /// let mut child: FeatureRecord =
    ///     serde_json::from_value(json!({ "channel": "beta" })).unwrap();
    /// let parent: FeatureRecord =
    ///     serde_json::from_value(json!({ "channel": "stable", "internal": true }))
    ///         .unwrap();
    ///
    /// child.merge_under(&parent);
    /// assert_eq!(child.channel(), Some("beta")); // child wins
    /// assert!(child.is_internal()); // gap filled from the parent
    /// ```
    pub fn merge_under(&mut self, ancestor: &FeatureRecord) {
        for (key, value) in &ancestor.attrs {
            if !self.attrs.contains_key(key) {
                self.attrs.insert(key.clone(), value.clone());
            }
        }
    }

    /// Renames every attribute whose key ends with `old_suffix`, replacing
    /// that suffix with `new_suffix`. Returns the number of keys renamed.
    ///
    /// The old key is removed and the new key inserted with the same value;
    /// a key already using the new suffix is left alone, so repeating the
    /// rename is a no-op.
    pub fn rename_suffix(&mut self, old_suffix: &str, new_suffix: &str) -> usize {
        let targets: Vec<String> = self
            .attrs
            .keys()
            .filter(|key| key.ends_with(old_suffix))
            .cloned()
            .collect();
        for key in &targets {
            if let Some(value) = self.attrs.remove(key) {
                let renamed = format!("{}{new_suffix}", &key[..key.len() - old_suffix.len()]);
                self.attrs.insert(renamed, value);
            }
        }
        targets.len()
    }

    fn bool_attr(&self, key: &str) -> bool {
        self.attrs.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl From<Map<String, Value>> for FeatureRecord {
    fn from(attrs: Map<String, Value>) -> Self {
        Self { attrs }
    }
}

/// What a composite identifier maps to in a loaded catalog: a single record,
/// or an ordered list of variant records (a "complex" feature).
///
/// Deserialization is shape-driven: a JSON object becomes [`Single`], a JSON
/// array becomes [`Variants`]. Variant order is the order in the source file
/// and is preserved; it only matters for default-parent selection.
///
/// [`Single`]: FeatureEntry::Single
/// [`Variants`]: FeatureEntry::Variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureEntry {
    /// The common case: one record.
    Single(FeatureRecord),
    /// A complex feature with multiple named variants.
    Variants(Vec<FeatureRecord>),
}

impl FeatureEntry {
    /// All records of the entry as a slice, whatever its shape.
    #[must_use]
    pub fn records(&self) -> &[FeatureRecord] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Variants(records) => records,
        }
    }

    /// Mutable view of the entry's records.
    pub fn records_mut(&mut self) -> &mut [FeatureRecord] {
        match self {
            Self::Single(record) => std::slice::from_mut(record),
            Self::Variants(records) => records,
        }
    }

    /// Returns `true` if the entry holds more than one variant.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.records().len() > 1
    }
}

impl From<FeatureRecord> for FeatureEntry {
    fn from(record: FeatureRecord) -> Self {
        Self::Single(record)
    }
}

impl From<Vec<FeatureRecord>> for FeatureEntry {
    fn from(records: Vec<FeatureRecord>) -> Self {
        Self::Variants(records)
    }
}
