//! Run admissibility evaluation.
//!
//! A resolved run is *admissible* when nothing in it restricts who may use
//! the feature: no record is internal-only, none is allowlisted to specific
//! callers, and none is scoped to particular URLs. Evaluation is deny-wins
//! within a run; across runs the first admissible one decides.

use std::collections::BTreeSet;

use featgate_types::{Channel, ChannelError, FeatureId, FeatureRecord};
use serde::Serialize;
use tracing::trace;

use crate::expand::{Expansion, Run};

/// The URL match pattern that stands for "every URL".
pub const ALL_URLS: &str = "<all_urls>";

/// Policy deciding whether a resolved run is generally available.
///
/// The default policy admits a run iff no record in it is internal, none
/// declares an `allowlist`, and every declared `matches` list contains the
/// all-URLs wildcard. It does not gate on release channels; see
/// [`AdmissionPolicy::for_channel`].
///
/// # Example
///
/// ```ignore
/// use featgate_core::{load_features, AdmissionPolicy};
/// use featgate_types::FeatureId;
///
/// let catalog = load_features(["defs"])?;
/// let expansion = catalog.expand(&FeatureId::parse("api:tabs"))?;
/// match AdmissionPolicy::new().admit(&expansion) {
///     Some(admission) => println!("requires {:?}", admission.permissions),
///     None => println!("not generally available"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    /// The wildcard a declared `matches` list must contain to pass.
    all_urls_pattern: String,

    /// When set, a record gated to a less stable channel fails its run.
    request_channel: Option<Channel>,
}

impl AdmissionPolicy {
    /// Creates the default policy: wildcard `<all_urls>`, no channel gating.
    #[must_use]
    pub fn new() -> Self {
        Self {
            all_urls_pattern: ALL_URLS.to_string(),
            request_channel: None,
        }
    }

    /// Creates a policy that additionally fails any run containing a record
    /// whose declared channel is less stable than `channel`. A record
    /// without a channel counts as `stable`; a channel name that does not
    /// parse fails the run.
    #[must_use]
    pub fn for_channel(channel: Channel) -> Self {
        Self {
            request_channel: Some(channel),
            ..Self::new()
        }
    }

    /// Replaces the all-URLs wildcard pattern.
    #[must_use]
    pub fn with_all_urls_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.all_urls_pattern = pattern.into();
        self
    }

    /// Evaluates runs in order and returns the first admission.
    ///
    /// `None` means no run passed, which is an expected outcome for
    /// restricted features, not an error.
    #[must_use]
    pub fn admit(&self, expansion: &Expansion) -> Option<Admission> {
        for run in expansion.runs() {
            if let Some(permissions) = self.admit_run(run) {
                trace!(
                    feature = %expansion.target,
                    permissions = permissions.len(),
                    "Run admitted"
                );
                return Some(Admission {
                    feature: expansion.target.clone(),
                    permissions,
                });
            }
        }
        None
    }

    /// Evaluates one run, returning its required permission set if every
    /// record passes.
    #[must_use]
    pub fn admit_run(&self, run: &Run) -> Option<BTreeSet<String>> {
        let mut permissions = BTreeSet::new();
        for expanded in run.records() {
            if !self.record_passes(&expanded.record) {
                return None;
            }
            if let Some(name) = expanded.id.permission_name() {
                permissions.insert(name.to_string());
            }
        }
        Some(permissions)
    }

    fn record_passes(&self, record: &FeatureRecord) -> bool {
        if record.is_internal() || record.has_allowlist() {
            return false;
        }

        if let Some(patterns) = record.url_patterns() {
            if !patterns.contains(&self.all_urls_pattern.as_str()) {
                return false;
            }
        }

        if let Some(request) = self.request_channel {
            let gate = match record.channel() {
                None => Channel::default(),
                Some(name) => match name.parse::<Channel>() {
                    Ok(channel) => channel,
                    Err(_) => return false,
                },
            };
            if !gate.admits(request) {
                return false;
            }
        }

        true
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// A passing run summarized as its permission requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub feature: FeatureId,
    /// Deduplicated permission names, in sorted order.
    pub permissions: BTreeSet<String>,
}

impl Expansion {
    /// Evaluates this expansion under the default policy.
    #[must_use]
    pub fn admitted(&self) -> Option<Admission> {
        AdmissionPolicy::new().admit(self)
    }
}

/// Whether a feature gated to channel `feature` is usable from channel
/// `request`. An absent feature channel means `stable`.
///
/// # Example
///
/// ```
/// use featgate_core::allowed_channel;
///
/// assert!(!allowed_channel("stable", Some("beta")).unwrap());
/// assert!(allowed_channel("dev", Some("beta")).unwrap());
/// assert!(allowed_channel("stable", None).unwrap());
/// ```
///
/// # Errors
///
/// Returns [`ChannelError::Unknown`] if either name is not a channel.
pub fn allowed_channel(request: &str, feature: Option<&str>) -> Result<bool, ChannelError> {
    let request: Channel = request.parse()?;
    let gate: Channel = match feature {
        Some(name) => name.parse()?,
        None => Channel::default(),
    };
    Ok(gate.admits(request))
}
