use crate::document::DecorationDoc;
use crate::domain::models::{Catalog, MapType, PropTarget, Requirement, RequirementSet};
use crate::services::names;
use std::collections::BTreeSet;

/// Scans a document and resolves every prop with a non-empty cleaned name
/// against the catalog for the requested target map type.
///
/// Props whose name has no catalog entry, or whose entry lacks an identifier
/// on the target type, land in the no-counterpart list (deduplicated,
/// lexicographically sorted) and contribute no requirement. Everything else
/// increments its target identifier's required count, with provenance kept
/// in document order. Deterministic for identical (document, catalog) input.
pub fn aggregate(doc: &DecorationDoc, catalog: &Catalog, to: MapType) -> RequirementSet {
    let mut set = RequirementSet::default();
    let mut no_counterpart = BTreeSet::new();

    for (index, prop) in doc.props().into_iter().enumerate() {
        let name = names::clean(prop.name());
        if name.is_empty() {
            continue;
        }

        let target_id = catalog
            .lookup(&names::lookup_key(&name))
            .and_then(|entry| entry.target_id(to));

        set.prop_targets.push(PropTarget {
            index,
            name: name.clone(),
            target_id,
        });

        match target_id {
            None => {
                no_counterpart.insert(name);
            }
            Some(id) => {
                let req = set.requirements.entry(id).or_insert_with(|| Requirement {
                    target_id: id,
                    required: 0,
                    sources: Vec::new(),
                });
                req.required += 1;
                req.sources.push(index);
            }
        }
    }

    set.no_counterpart = no_counterpart.into_iter().collect();
    set
}
