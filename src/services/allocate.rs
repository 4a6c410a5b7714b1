use crate::domain::models::{
    Catalog, DropReason, MapType, MissingEntry, OwnershipLedger, PropDecision, RequirementSet,
};
use std::collections::BTreeMap;

/// Decides, per prop, whether it survives the swap and under which
/// identifier.
///
/// No-counterpart props never survive. With `include_missing`, every
/// resolvable prop survives. With an empty ledger, ownership was never
/// actually obtained, so nothing is culled either: dropping is only
/// triggered by data, not by its absence. Otherwise the first N props in
/// document order survive per identifier, N = owned count.
pub fn allocate(
    set: &RequirementSet,
    ledger: &OwnershipLedger,
    include_missing: bool,
) -> Vec<PropDecision> {
    let enforce = !include_missing && ledger.is_verified();
    let mut used: BTreeMap<u64, u64> = BTreeMap::new();

    set.prop_targets
        .iter()
        .map(|pt| match pt.target_id {
            None => PropDecision {
                index: pt.index,
                keep: false,
                new_id: None,
                drop_reason: Some(DropReason::NoCounterpart),
            },
            Some(id) => {
                if enforce {
                    let taken = used.entry(id).or_insert(0);
                    if *taken < ledger.owned(id) {
                        *taken += 1;
                    } else {
                        return PropDecision {
                            index: pt.index,
                            keep: false,
                            new_id: None,
                            drop_reason: Some(DropReason::InsufficientOwnership),
                        };
                    }
                }
                PropDecision {
                    index: pt.index,
                    keep: true,
                    new_id: Some(id),
                    drop_reason: None,
                }
            }
        })
        .collect()
}

/// Deficit rows (owned < required), sorted by descending shortfall with the
/// identifier as tie-break. Names resolve through the catalog's reverse
/// lookup, falling back to the raw identifier.
pub fn missing_report(
    set: &RequirementSet,
    ledger: &OwnershipLedger,
    catalog: &Catalog,
    to: MapType,
) -> Vec<MissingEntry> {
    let mut missing: Vec<MissingEntry> = set
        .requirements
        .values()
        .filter_map(|req| {
            let owned = ledger.owned(req.target_id);
            if owned >= req.required {
                return None;
            }
            let name = catalog
                .name_for_id(req.target_id, to)
                .map(str::to_string)
                .unwrap_or_else(|| format!("ID {}", req.target_id));
            Some(MissingEntry {
                target_id: req.target_id,
                name,
                required: req.required,
                owned,
                missing: req.required - owned,
            })
        })
        .collect();
    missing.sort_by(|a, b| b.missing.cmp(&a.missing).then(a.target_id.cmp(&b.target_id)));
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CatalogEntry, PropTarget, Requirement};

    fn set_from_targets(targets: Vec<(usize, &str, Option<u64>)>) -> RequirementSet {
        let mut set = RequirementSet::default();
        for (index, name, target_id) in targets {
            set.prop_targets.push(PropTarget {
                index,
                name: name.to_string(),
                target_id,
            });
            if let Some(id) = target_id {
                let req = set.requirements.entry(id).or_insert_with(|| Requirement {
                    target_id: id,
                    required: 0,
                    sources: Vec::new(),
                });
                req.required += 1;
                req.sources.push(index);
            }
        }
        set
    }

    fn lantern_bench_set() -> RequirementSet {
        // 5 Lanterns resolving to 42, 3 Benches with no counterpart
        set_from_targets(vec![
            (0, "Lantern", Some(42)),
            (1, "Bench", None),
            (2, "Lantern", Some(42)),
            (3, "Lantern", Some(42)),
            (4, "Bench", None),
            (5, "Lantern", Some(42)),
            (6, "Bench", None),
            (7, "Lantern", Some(42)),
        ])
    }

    fn ledger(counts: &[(u64, u64)]) -> OwnershipLedger {
        OwnershipLedger {
            counts: counts.iter().copied().collect(),
        }
    }

    fn kept(decisions: &[PropDecision]) -> Vec<usize> {
        decisions
            .iter()
            .filter(|d| d.keep)
            .map(|d| d.index)
            .collect()
    }

    #[test]
    fn first_n_in_document_order_survive_when_ownership_is_short() {
        let decisions = allocate(&lantern_bench_set(), &ledger(&[(42, 2)]), false);
        assert_eq!(kept(&decisions), vec![0, 2]);
        let dropped_short: Vec<usize> = decisions
            .iter()
            .filter(|d| d.drop_reason == Some(DropReason::InsufficientOwnership))
            .map(|d| d.index)
            .collect();
        assert_eq!(dropped_short, vec![3, 5, 7]);
    }

    #[test]
    fn no_counterpart_always_drops_regardless_of_flags() {
        for (ledger, include_missing) in [
            (ledger(&[]), true),
            (ledger(&[]), false),
            (ledger(&[(42, 100)]), false),
        ] {
            let decisions = allocate(&lantern_bench_set(), &ledger, include_missing);
            for d in decisions.iter().filter(|d| [1, 4, 6].contains(&d.index)) {
                assert!(!d.keep);
                assert_eq!(d.drop_reason, Some(DropReason::NoCounterpart));
            }
        }
    }

    #[test]
    fn include_missing_keeps_every_resolvable_prop() {
        let decisions = allocate(&lantern_bench_set(), &ledger(&[(42, 0)]), true);
        assert_eq!(kept(&decisions), vec![0, 2, 3, 5, 7]);
        assert!(decisions.iter().filter(|d| d.keep).all(|d| d.new_id == Some(42)));
    }

    #[test]
    fn empty_ledger_never_culls() {
        let decisions = allocate(&lantern_bench_set(), &ledger(&[]), false);
        assert_eq!(kept(&decisions), vec![0, 2, 3, 5, 7]);
    }

    #[test]
    fn fetched_zero_is_data_and_culls() {
        let decisions = allocate(&lantern_bench_set(), &ledger(&[(42, 0)]), false);
        assert!(kept(&decisions).is_empty());
    }

    #[test]
    fn allocation_is_stable_under_reordering_of_unrelated_props() {
        let a = set_from_targets(vec![
            (0, "Lantern", Some(42)),
            (1, "Rug", Some(9)),
            (2, "Lantern", Some(42)),
            (3, "Rug", Some(9)),
            (4, "Lantern", Some(42)),
        ]);
        // permute the Rug props among themselves; Lantern ordinals unchanged
        let b = set_from_targets(vec![
            (0, "Lantern", Some(42)),
            (3, "Rug", Some(9)),
            (2, "Lantern", Some(42)),
            (1, "Rug", Some(9)),
            (4, "Lantern", Some(42)),
        ]);
        let l = ledger(&[(42, 2), (9, 1)]);
        let keep_lanterns = |set: &RequirementSet| -> Vec<usize> {
            allocate(set, &l, false)
                .iter()
                .filter(|d| d.keep && d.new_id == Some(42))
                .map(|d| d.index)
                .collect()
        };
        assert_eq!(keep_lanterns(&a), keep_lanterns(&b));
    }

    #[test]
    fn kept_never_exceeds_min_of_owned_and_required() {
        let set = lantern_bench_set();
        for owned in 0..8u64 {
            let decisions = allocate(&set, &ledger(&[(42, owned)]), false);
            let kept_count = decisions.iter().filter(|d| d.keep).count() as u64;
            assert_eq!(kept_count, owned.min(5));
        }
    }

    #[test]
    fn missing_report_sorts_by_descending_deficit_with_name_fallback() {
        let set = set_from_targets(vec![
            (0, "Lantern", Some(42)),
            (1, "Lantern", Some(42)),
            (2, "Lantern", Some(42)),
            (3, "Rug", Some(9)),
            (4, "Rug", Some(9)),
        ]);
        let mut catalog = Catalog::default();
        catalog.insert(
            "lantern".to_string(),
            CatalogEntry {
                name: "Lantern".to_string(),
                homestead_id: None,
                guild_upgrade_id: Some(42),
            },
        );
        let report = missing_report(&set, &ledger(&[(42, 0), (9, 0)]), &catalog, MapType::GuildHall);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "Lantern");
        assert_eq!(report[0].missing, 3);
        assert_eq!(report[1].name, "ID 9");
        assert_eq!(report[1].missing, 2);
    }

    #[test]
    fn satisfied_requirements_produce_no_deficit_rows() {
        let set = lantern_bench_set();
        let report = missing_report(
            &set,
            &ledger(&[(42, 5)]),
            &Catalog::default(),
            MapType::GuildHall,
        );
        assert!(report.is_empty());
    }
}
