//! Breadth-first dependency expansion.
//!
//! Expansion answers "what does enabling this feature actually require" by
//! walking the dependency graph and enumerating every end-to-end
//! combination of variant choices. Each combination is a *run*; a complex
//! dependency with N variants multiplies the number of runs by N.

use std::collections::VecDeque;

use featgate_types::{FeatureId, FeatureRecord};
use serde::Serialize;
use tracing::trace;

use crate::catalog::FeatureCatalog;
use crate::error::ResolveError;

/// One resolved record inside a run, tagged with its identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedFeature {
    pub id: FeatureId,
    pub record: FeatureRecord,
}

/// One end-to-end combination of resolved records.
///
/// Within a run no two records share an identifier, and every complex
/// dependency contributes exactly one of its variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Run {
    records: Vec<ExpandedFeature>,
}

impl Run {
    /// The run's records in visit order: the target first, then its
    /// dependencies breadth-first.
    #[must_use]
    pub fn records(&self) -> &[ExpandedFeature] {
        &self.records
    }

    /// Number of records in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the run holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn contains(&self, id: &FeatureId) -> bool {
        self.records.iter().any(|expanded| &expanded.id == id)
    }
}

/// Every end-to-end combination for one target feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expansion {
    pub target: FeatureId,
    runs: Vec<Run>,
}

impl Expansion {
    /// The runs, in the order the worklist finished them.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Returns `true` if expansion produced no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// One in-flight combination: identifiers still to visit plus the records
/// chosen so far. Branches are owned values; fan-out clones the whole
/// branch per variant rather than sharing state.
#[derive(Debug, Clone)]
struct Branch {
    pending: VecDeque<FeatureId>,
    run: Run,
}

impl FeatureCatalog {
    /// Expands `target` into every end-to-end combination of records.
    ///
    /// Works a queue of branch values. Popping an identifier the branch
    /// already resolved is a cycle; otherwise the identifier is flattened
    /// against its ancestor chain and the branch forks once per variant,
    /// queueing that variant's dependencies behind the work already
    /// pending. A branch is finished when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CircularDependency`] if any branch revisits
    /// an identifier, and propagates [`ResolveError::AmbiguousParent`]
    /// from flattening.
    pub fn expand(&self, target: &FeatureId) -> Result<Expansion, ResolveError> {
        let mut work = VecDeque::new();
        work.push_back(Branch {
            pending: VecDeque::from([target.clone()]),
            run: Run::default(),
        });

        let mut finished = Vec::new();
        while let Some(mut branch) = work.pop_front() {
            let Some(id) = branch.pending.pop_front() else {
                if !branch.run.is_empty() {
                    finished.push(branch.run);
                }
                continue;
            };

            if branch.run.contains(&id) {
                return Err(ResolveError::circular_dependency(id, target.clone()));
            }

            let variants = self.flatten(&id)?;
            trace!(feature = %id, variants = variants.len(), "Expanding feature");

            for record in variants {
                let dependencies: Vec<FeatureId> =
                    record.dependencies().into_iter().map(FeatureId::parse).collect();

                let mut next = branch.clone();
                next.pending.extend(dependencies);
                next.run.records.push(ExpandedFeature {
                    id: id.clone(),
                    record,
                });
                work.push_back(next);
            }
        }

        Ok(Expansion {
            target: target.clone(),
            runs: finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featgate_types::FeatureEntry;
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

    fn run_ids(run: &Run) -> Vec<String> {
        run.records().iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn leaf_feature_expands_to_itself() {
        let catalog = catalog(&[("api:tabs", json!({ "channel": "beta" }))]);

        let expansion = catalog.expand(&FeatureId::parse("api:tabs")).unwrap();

        assert_eq!(expansion.runs().len(), 1);
        assert_eq!(run_ids(&expansion.runs()[0]), vec!["api:tabs"]);
    }

    #[test]
    fn unknown_target_expands_to_one_empty_record() {
        let catalog = FeatureCatalog::new();

        let expansion = catalog.expand(&FeatureId::parse("api:ghost")).unwrap();

        assert_eq!(expansion.runs().len(), 1);
        let run = &expansion.runs()[0];
        assert_eq!(run.len(), 1);
        assert!(run.records()[0].record.is_empty());
    }

    #[test]
    fn dependencies_visit_breadth_first() {
        let catalog = catalog(&[
            ("api:root", json!({ "dependencies": ["api:left", "api:right"] })),
            ("api:left", json!({ "dependencies": ["api:leaf"] })),
            ("api:right", json!({})),
            ("api:leaf", json!({})),
        ]);

        let expansion = catalog.expand(&FeatureId::parse("api:root")).unwrap();

        assert_eq!(expansion.runs().len(), 1);
        assert_eq!(
            run_ids(&expansion.runs()[0]),
            vec!["api:root", "api:left", "api:right", "api:leaf"]
        );
    }

    #[test]
    fn complex_dependencies_multiply_runs() {
        let catalog = catalog(&[
            ("api:root", json!({ "dependencies": ["api:x", "api:y"] })),
            ("api:x", json!([{ "tag": "x1" }, { "tag": "x2" }])),
            (
                "api:y",
                json!([{ "tag": "y1" }, { "tag": "y2" }, { "tag": "y3" }]),
            ),
        ]);

        let expansion = catalog.expand(&FeatureId::parse("api:root")).unwrap();

        assert_eq!(expansion.runs().len(), 6);

        let mut pairs = Vec::new();
        for run in expansion.runs() {
            let tag = |wanted: &str| {
                run.records()
                    .iter()
                    .find(|e| e.id.to_string() == wanted)
                    .and_then(|e| e.record.get("tag"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap()
            };
            // Exactly one variant of each complex dependency per run.
            assert_eq!(run.len(), 3);
            pairs.push((tag("api:x"), tag("api:y")));
        }
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn variant_local_dependencies_fan_out() {
        let catalog = catalog(&[
            (
                "api:x",
                json!([{ "dependencies": ["permission:p"] }, { "tag": "plain" }]),
            ),
            ("permission:p", json!({})),
        ]);

        let expansion = catalog.expand(&FeatureId::parse("api:x")).unwrap();

        assert_eq!(expansion.runs().len(), 2);
        let lengths: Vec<usize> = expansion.runs().iter().map(Run::len).collect();
        assert!(lengths.contains(&2));
        assert!(lengths.contains(&1));
    }

    #[test]
    fn self_dependency_is_circular() {
        let catalog = catalog(&[("api:a", json!({ "dependencies": ["api:a"] }))]);

        let err = catalog.expand(&FeatureId::parse("api:a")).unwrap_err();

        match err {
            ResolveError::CircularDependency { id, root } => {
                assert_eq!(id, FeatureId::parse("api:a"));
                assert_eq!(root, FeatureId::parse("api:a"));
            }
            other => panic!("expected circular dependency, got {other}"),
        }
    }

    #[test]
    fn transitive_cycle_is_detected() {
        let catalog = catalog(&[
            ("api:a", json!({ "dependencies": ["api:b"] })),
            ("api:b", json!({ "dependencies": ["api:a"] })),
        ]);

        let err = catalog.expand(&FeatureId::parse("api:a")).unwrap_err();

        match err {
            ResolveError::CircularDependency { id, root } => {
                assert_eq!(id, FeatureId::parse("api:a"));
                assert_eq!(root, FeatureId::parse("api:a"));
            }
            other => panic!("expected circular dependency, got {other}"),
        }
    }

    #[test]
    fn shared_transitive_dependency_is_reported_as_circular() {
        let catalog = catalog(&[
            ("api:root", json!({ "dependencies": ["api:a", "api:b"] })),
            ("api:a", json!({ "dependencies": ["api:shared"] })),
            ("api:b", json!({ "dependencies": ["api:shared"] })),
            ("api:shared", json!({})),
        ]);

        let err = catalog.expand(&FeatureId::parse("api:root")).unwrap_err();

        assert!(matches!(
            err,
            ResolveError::CircularDependency { id, .. } if id == FeatureId::parse("api:shared")
        ));
    }

    #[test]
    fn expansion_applies_inheritance_before_fan_out() {
        let catalog = catalog(&[
            ("api:parent", json!({ "dependencies": ["permission:p"] })),
            ("api:parent.child", json!({ "channel": "dev" })),
            ("permission:p", json!({})),
        ]);

        let expansion = catalog.expand(&FeatureId::parse("api:parent.child")).unwrap();

        // The child inherits the dependency from its parent, so the run
        // carries the permission record too.
        assert_eq!(expansion.runs().len(), 1);
        assert_eq!(
            run_ids(&expansion.runs()[0]),
            vec!["api:parent.child", "permission:p"]
        );
    }

    #[test]
    fn ambiguous_ancestor_propagates_out_of_expand() {
        let catalog = catalog(&[
            ("api:base", json!([{ "tag": "a" }, { "tag": "b" }])),
            ("api:base.sub", json!({})),
        ]);

        let err = catalog.expand(&FeatureId::parse("api:base.sub")).unwrap_err();

        assert!(matches!(err, ResolveError::AmbiguousParent { .. }));
    }
}
