use crate::domain::models::{MapType, OwnershipStatus, SwapPlan, SwapSummary};

const RULE_HEAVY: &str = "========================================";
const RULE_LIGHT: &str = "----------------------------------------";
const NAME_COL: usize = 52;

fn pad_name(name: &str, width: usize) -> String {
    if name.chars().count() >= width {
        name.to_string()
    } else {
        let padding = width - name.chars().count();
        format!("{}{}", name, " ".repeat(padding))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

/// Assembles the human-readable pre-check report: header, optional capacity
/// warning, no-counterpart list, deficit list or unverified-ownership line,
/// and an echo of the options in effect. Presentation only; nothing parses
/// this.
pub fn precheck_report(plan: &SwapPlan) -> String {
    let mut out = String::new();
    out.push_str("MAP SWAP PRE-CHECK\n");
    out.push_str(RULE_HEAVY);
    out.push('\n');

    let from_label = match plan.source_type {
        Some(t) => t.label(),
        None => "Unknown",
    };
    let to_label = plan.target_type.label();

    out.push_str(&format!("Loaded XML: {}\n", plan.file_name));
    out.push_str(&format!("Props found: {}\n", plan.prop_count));
    out.push_str(&format!("From: {}\n", from_label));
    out.push_str(&format!("To:   {} -> {}\n\n", to_label, plan.target_map_name));

    if plan.source_type == Some(MapType::Homestead) && plan.target_type == MapType::GuildHall {
        out.push_str("WARNING:\n");
        out.push_str("Switching Homestead -> Guild Hall can risk local-area deco caps.\n");
        out.push_str("Some items may fail to load or drop out depending on placement and limits.\n\n");
    }

    if plan.no_counterpart.is_empty() {
        out.push_str(&format!(
            "All props have a valid {} counter-part.\n\n",
            to_label
        ));
    } else {
        out.push_str(&format!(
            "The following decos will not be included, as there is no {} counter-part:\n",
            to_label
        ));
        out.push_str(RULE_LIGHT);
        out.push('\n');
        for name in &plan.no_counterpart {
            out.push_str(&format!("* {}\n", name));
        }
        out.push('\n');
    }

    match plan.ownership_status {
        OwnershipStatus::HelperNotRunning => {
            out.push_str("Helper not detected - ownership counts could not be verified.\n");
        }
        OwnershipStatus::NoCredential => {
            out.push_str("Helper has no API key - ownership counts could not be verified.\n");
        }
        OwnershipStatus::GuildNotSelected => {
            out.push_str("Guild selection required - ownership counts could not be verified.\n");
        }
        OwnershipStatus::FetchFailed => {
            out.push_str("Helper request failed - ownership counts could not be verified.\n");
        }
        OwnershipStatus::Verified => {
            if plan.missing.is_empty() {
                out.push_str("Ownership check: All required decorations are available.\n\n");
            } else {
                out.push_str(&format!(
                    "You do not have the following decos. Your map swap will {} them:\n",
                    if plan.include_missing { "INCLUDE" } else { "EXCLUDE" }
                ));
                out.push_str(RULE_LIGHT);
                out.push('\n');
                for entry in &plan.missing {
                    out.push_str(&format!(
                        "* {}  Missing: {}\n",
                        pad_name(&entry.name, NAME_COL),
                        entry.missing
                    ));
                }
                out.push('\n');
            }
        }
    }

    out.push_str("Options:\n");
    out.push_str(&format!(
        "* Include Missing Decorations: {}\n",
        yes_no(plan.include_missing)
    ));
    out
}

/// The section appended to the report after a successful apply.
pub fn swap_report(plan: &SwapPlan, summary: &SwapSummary, out_file: &str) -> String {
    let mut out = String::new();
    out.push_str("SWAP EXECUTED\n");
    out.push_str(RULE_LIGHT);
    out.push('\n');
    out.push_str(&format!("Target map: {}\n", plan.target_map_name));
    out.push_str(&format!("Updated IDs: {}\n", summary.updated_ids));
    out.push_str(&format!(
        "Removed (no counterpart): {}\n",
        summary.removed_no_counterpart
    ));
    out.push_str(&format!(
        "Removed (missing ownership): {}\n",
        summary.removed_missing
    ));
    out.push_str(&format!(
        "Include Missing Decorations: {}\n",
        yes_no(plan.include_missing)
    ));
    out.push_str(&format!("Wrote: {}\n", out_file));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{MissingEntry, OwnershipLedger, SwapPlan};

    fn base_plan() -> SwapPlan {
        SwapPlan {
            file_name: "layout.xml".to_string(),
            fingerprint: String::new(),
            source_type: Some(MapType::Homestead),
            target_key: "gilded".to_string(),
            target_map_id: "1121".to_string(),
            target_map_name: "Gilded Hollow".to_string(),
            target_type: MapType::GuildHall,
            include_missing: false,
            guild_id: None,
            prop_count: 8,
            requirements: Vec::new(),
            ownership: OwnershipLedger::default(),
            ownership_status: OwnershipStatus::Verified,
            decisions: Vec::new(),
            missing: Vec::new(),
            no_counterpart: Vec::new(),
        }
    }

    #[test]
    fn report_carries_header_warning_and_options() {
        let report = precheck_report(&base_plan());
        assert!(report.starts_with("MAP SWAP PRE-CHECK\n"));
        assert!(report.contains("Loaded XML: layout.xml"));
        assert!(report.contains("Props found: 8"));
        assert!(report.contains("From: Homestead"));
        assert!(report.contains("To:   Guild Hall -> Gilded Hollow"));
        assert!(report.contains("WARNING:"));
        assert!(report.contains("Include Missing Decorations: NO"));
    }

    #[test]
    fn deficit_rows_show_name_and_missing_count() {
        let mut plan = base_plan();
        plan.missing.push(MissingEntry {
            target_id: 42,
            name: "Lantern".to_string(),
            required: 5,
            owned: 2,
            missing: 3,
        });
        let report = precheck_report(&plan);
        assert!(report.contains("Your map swap will EXCLUDE them:"));
        assert!(report.contains(&format!("* {}  Missing: 3", pad_name("Lantern", NAME_COL))));
    }

    #[test]
    fn unverified_ownership_gets_an_explanatory_line() {
        let mut plan = base_plan();
        plan.ownership_status = OwnershipStatus::HelperNotRunning;
        plan.missing.clear();
        let report = precheck_report(&plan);
        assert!(report.contains("Helper not detected - ownership counts could not be verified."));
        assert!(!report.contains("Ownership check:"));
    }

    #[test]
    fn no_counterpart_section_lists_sorted_names() {
        let mut plan = base_plan();
        plan.no_counterpart = vec!["Aquarium".to_string(), "Bench".to_string()];
        let report = precheck_report(&plan);
        assert!(report.contains("no Guild Hall counter-part:"));
        assert!(report.contains("* Aquarium\n* Bench\n"));
    }

    #[test]
    fn swap_section_reports_all_counts() {
        let summary = SwapSummary {
            updated_ids: 5,
            removed_no_counterpart: 3,
            removed_missing: 2,
        };
        let report = swap_report(&base_plan(), &summary, "layout_Gilded-Hollow.xml");
        assert!(report.starts_with("SWAP EXECUTED\n"));
        assert!(report.contains("Updated IDs: 5"));
        assert!(report.contains("Removed (no counterpart): 3"));
        assert!(report.contains("Removed (missing ownership): 2"));
        assert!(report.contains("Wrote: layout_Gilded-Hollow.xml"));
    }
}
