//! Feature identifier types.
//!
//! Every feature definition is addressed by a composite identifier of the
//! form `<kind>:<name>`, where the kind is the namespace the definition was
//! loaded from (`api`, `permission`, `manifest`, ...) and the name may
//! contain `.`-separated segments denoting a parent/child relationship
//! (`api:foo.bar` is a child of `api:foo`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Kind namespace for API surface features.
pub const KIND_API: &str = "api";
/// Kind namespace for permission features.
pub const KIND_PERMISSION: &str = "permission";
/// Kind namespace for manifest-key features.
pub const KIND_MANIFEST: &str = "manifest";

/// Composite identifier of a feature definition.
///
/// # Kind and Name
///
/// The kind comes from the definition file a feature was loaded from; the
/// name is the key inside that file. Names nest with dots:
///
/// ```text
/// api:downloads            parent of
/// api:downloads.shelf      parent of
/// api:downloads.shelf.ui
/// ```
///
/// # Parsing
///
/// [`parse`](Self::parse) is total. Text without a `:` becomes a bare name
/// with an empty kind; such an identifier can never collide with a loaded
/// one, so lookups of it simply miss. This mirrors how the consumed
/// definition format treats dependency strings: they are map keys, not a
/// validated grammar.
///
/// # Ordering
///
/// `Ord` compares kind first, then name, so iterating an ordered map of
/// identifiers groups features by namespace in a stable order.
///
/// # Example
///
/// ```
/// use featgate_types::FeatureId;
///
/// let id = FeatureId::parse("api:downloads.shelf");
/// assert_eq!(id.kind, "api");
/// assert_eq!(id.name, "downloads.shelf");
/// assert_eq!(id.to_string(), "api:downloads.shelf");
///
/// let parent = id.parent().unwrap();
/// assert_eq!(parent.to_string(), "api:downloads");
/// assert!(parent.parent().unwrap().parent().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId {
    /// Namespace the definition belongs to (e.g. `api`, `permission`).
    pub kind: String,
    /// Feature name within the namespace, possibly dotted.
    pub name: String,
}

impl FeatureId {
    /// Creates an identifier from a kind and a name.
    ///
    /// # Example
    ///
    /// ```
    /// use featgate_types::FeatureId;
    ///
    /// let id = FeatureId::new("permission", "tabs");
    /// assert_eq!(id.to_string(), "permission:tabs");
    /// ```
    #[must_use]
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Parses `<kind>:<name>` text into an identifier.
    ///
    /// Splits at the first `:`. Text without a colon becomes a bare name
    /// with an empty kind.
    ///
    /// # Example
    ///
    /// ```
    /// use featgate_types::FeatureId;
    ///
    /// assert_eq!(FeatureId::parse("api:tabs"), FeatureId::new("api", "tabs"));
    /// assert_eq!(FeatureId::parse("tabs"), FeatureId::new("", "tabs"));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((kind, name)) => Self::new(kind, name),
            None => Self::new("", text),
        }
    }

    /// Returns the parent identifier, or `None` for a root name.
    ///
    /// The parent is the same kind with the last `.`-separated name segment
    /// stripped. Only the name nests; the kind never participates.
    #[must_use]
    pub fn parent(&self) -> Option<FeatureId> {
        let (stem, _) = self.name.rsplit_once('.')?;
        Some(Self::new(self.kind.clone(), stem))
    }

    /// Returns `true` if this identifier has the given kind.
    #[must_use]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Returns `true` for `api:*` identifiers.
    #[must_use]
    pub fn is_api(&self) -> bool {
        self.is_kind(KIND_API)
    }

    /// Returns the bare permission name for `permission:*` identifiers.
    ///
    /// # Example
    ///
    /// ```
    /// use featgate_types::FeatureId;
    ///
    /// assert_eq!(
    ///     FeatureId::parse("permission:tabs").permission_name(),
    ///     Some("tabs")
    /// );
    /// assert_eq!(FeatureId::parse("api:tabs").permission_name(), None);
    /// ```
    #[must_use]
    pub fn permission_name(&self) -> Option<&str> {
        self.is_kind(KIND_PERMISSION).then_some(self.name.as_str())
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.kind, self.name)
        }
    }
}

impl From<&str> for FeatureId {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for FeatureId {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

// Serialized as the qualified string so identifiers read naturally in JSON
// output and match the dependency-string form used in definition files.
impl Serialize for FeatureId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeatureId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}
