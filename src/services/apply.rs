use crate::document::{DecorationDoc, Node};
use crate::domain::models::{DropReason, PropDecision, SwapPlan, SwapSummary};
use std::collections::HashMap;

/// Applies a validated plan to the live document: drops culled props,
/// rewrites kept props' catalog identifiers, and rewrites the root map
/// identity. Decisions come from the plan as-is; nothing is re-derived here.
pub fn apply_plan(doc: &mut DecorationDoc, plan: &SwapPlan) -> SwapSummary {
    let decisions: HashMap<usize, &PropDecision> =
        plan.decisions.iter().map(|d| (d.index, d)).collect();

    let mut summary = SwapSummary::default();
    let mut ordinal = 0usize;
    doc.nodes.retain_mut(|node| {
        let prop = match node {
            Node::Prop(p) => p,
            Node::Comment(_) => return true,
        };
        let index = ordinal;
        ordinal += 1;
        match decisions.get(&index) {
            // props with no cleaned name were never part of the pass
            None => true,
            Some(decision) if decision.keep => {
                if let Some(id) = decision.new_id {
                    prop.set_id(id);
                    summary.updated_ids += 1;
                }
                true
            }
            Some(decision) => {
                match decision.drop_reason {
                    Some(DropReason::InsufficientOwnership) => summary.removed_missing += 1,
                    _ => summary.removed_no_counterpart += 1,
                }
                false
            }
        }
    });

    doc.set_root_attr("mapId", &plan.target_map_id);
    doc.set_root_attr("mapName", &plan.target_map_name);
    doc.set_root_attr("type", plan.target_type.flag());
    summary
}
