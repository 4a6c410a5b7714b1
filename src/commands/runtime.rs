use crate::cli::{Cli, Commands, MapKey};
use crate::document::{self, DecorationDoc};
use crate::domain::constants::{TargetMap, TARGET_MAPS};
use crate::domain::error::SwapError;
use crate::domain::models::{
    MapType, OwnershipLedger, OwnershipStatus, SessionState, SwapPlan, SwapSummary,
};
use crate::helper::{self, HelperClient};
use crate::services::plan::{PlanTracker, Selections};
use crate::services::{aggregate, allocate, apply, output, report, storage};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct PrecheckOut<'a> {
    plan: &'a SwapPlan,
    report: &'a str,
}

#[derive(Serialize)]
struct SwapOut<'a> {
    summary: SwapSummary,
    out_file: &'a str,
    report: &'a str,
}

pub fn handle_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Maps => {
            output::print_out(cli.json, TARGET_MAPS, |m| {
                format!("{}\t{}\t{}\t{}", m.key, m.map_id, m.map_name, m.map_type.label())
            })?;
        }
        Commands::Status => {
            let client = HelperClient::new(&cli.helper)?;
            let status = client.status();
            output::print_one(cli.json, status, |s| {
                format!(
                    "helper: {}\napi key: {}\ngame link: {}",
                    if s.running { "running" } else { "not running" },
                    if s.api_key_present { "present" } else { "absent" },
                    if s.game_link { "up" } else { "down" }
                )
            })?;
        }
        Commands::Guilds => {
            let client = HelperClient::new(&cli.helper)?;
            let guilds = client
                .guilds()
                .map_err(|e| SwapError::CatalogUnavailable(e.to_string()))?;
            output::print_out(cli.json, &guilds, |g| format!("{}\t{}", g.id, g.display()))?;
        }
        Commands::Report { out } => {
            let session = storage::load_session()?;
            let text = session.last_report.ok_or(SwapError::NoPlan)?;
            match out {
                Some(path) => std::fs::write(path, &text)?,
                None => output::print_report(cli.json, &text, &text)?,
            }
        }
        Commands::Precheck {
            file,
            to,
            guild,
            include_missing,
            catalog,
        } => {
            let (plan, text) = run_precheck(
                cli,
                file,
                *to,
                guild.as_deref(),
                *include_missing,
                catalog.as_deref(),
            )?;
            storage::audit(
                "precheck",
                serde_json::json!({
                    "file": plan.file_name,
                    "to": plan.target_key,
                    "props": plan.prop_count,
                    "no_counterpart": plan.no_counterpart.len(),
                    "missing": plan.missing.len(),
                }),
            );
            output::print_report(cli.json, PrecheckOut { plan: &plan, report: &text }, &text)?;
        }
        Commands::Swap {
            file,
            to,
            guild,
            include_missing,
            catalog: _,
            out,
        } => {
            let (plan, summary, out_file, text) =
                run_swap(file, *to, guild.as_deref(), *include_missing, out.as_deref())?;
            storage::audit(
                "swap",
                serde_json::json!({
                    "file": plan.file_name,
                    "to": plan.target_key,
                    "updated": summary.updated_ids,
                    "removed_no_counterpart": summary.removed_no_counterpart,
                    "removed_missing": summary.removed_missing,
                    "out": out_file,
                }),
            );
            output::print_report(
                cli.json,
                SwapOut { summary, out_file: &out_file, report: &text },
                &text,
            )?;
        }
    }
    Ok(())
}

fn run_precheck(
    cli: &Cli,
    file: &str,
    to: MapKey,
    guild: Option<&str>,
    include_missing: bool,
    catalog_file: Option<&str>,
) -> anyhow::Result<(SwapPlan, String)> {
    let mut tracker = PlanTracker::default();
    let generation = tracker.begin();

    let (doc, bytes) = match document::load(Path::new(file)) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracker.fail(generation);
            return Err(e.into());
        }
    };
    if doc.prop_count() == 0 {
        tracker.fail(generation);
        return Err(SwapError::NoProps(file.to_string()).into());
    }

    let target = to.map();
    let client = HelperClient::new(&cli.helper)?;
    let status = client.status();

    if target.map_type == MapType::GuildHall
        && guild.is_none()
        && status.running
        && status.api_key_present
    {
        tracker.fail(generation);
        return Err(SwapError::GuildRequired.into());
    }

    let catalog = match load_catalog(&client, &status, catalog_file) {
        Ok(c) => c,
        Err(e) => {
            tracker.fail(generation);
            return Err(e.into());
        }
    };

    let set = aggregate::aggregate(&doc, &catalog, target.map_type);
    let ids = set.target_ids();

    let (ledger, ownership_status) =
        fetch_ownership(&client, &status, target, guild, &ids);

    let decisions = allocate::allocate(&set, &ledger, include_missing);
    let missing = allocate::missing_report(&set, &ledger, &catalog, target.map_type);

    let plan = SwapPlan {
        file_name: doc.file_name.clone(),
        fingerprint: storage::fingerprint(&bytes),
        source_type: doc.detect_map_type(),
        target_key: target.key.to_string(),
        target_map_id: target.map_id.to_string(),
        target_map_name: target.map_name.to_string(),
        target_type: target.map_type,
        include_missing,
        guild_id: guild.map(|g| g.to_string()),
        prop_count: doc.prop_count(),
        requirements: set.requirements.values().cloned().collect(),
        ownership: ledger,
        ownership_status,
        decisions,
        missing,
        no_counterpart: set.no_counterpart,
    };
    tracker.complete(generation, plan.clone());

    let text = report::precheck_report(&plan);
    storage::save_session(&SessionState {
        plan: Some(plan.clone()),
        last_report: Some(text.clone()),
    })?;
    Ok((plan, text))
}

fn load_catalog(
    client: &HelperClient,
    status: &crate::domain::models::HelperStatus,
    catalog_file: Option<&str>,
) -> Result<crate::domain::models::Catalog, SwapError> {
    let catalog = match catalog_file {
        Some(path) => helper::load_catalog_file(Path::new(path))
            .map_err(|e| SwapError::CatalogUnavailable(e.to_string()))?,
        None => {
            if !status.running {
                return Err(SwapError::CatalogUnavailable(format!(
                    "helper not reachable at {}",
                    client.base()
                )));
            }
            client
                .catalog()
                .map_err(|e| SwapError::CatalogUnavailable(e.to_string()))?
        }
    };
    if catalog.is_empty() {
        return Err(SwapError::CatalogUnavailable(
            "decoration catalog is empty".to_string(),
        ));
    }
    Ok(catalog)
}

fn fetch_ownership(
    client: &HelperClient,
    status: &crate::domain::models::HelperStatus,
    target: &TargetMap,
    guild: Option<&str>,
    ids: &[u64],
) -> (OwnershipLedger, OwnershipStatus) {
    if !status.running {
        return (OwnershipLedger::default(), OwnershipStatus::HelperNotRunning);
    }
    if !status.api_key_present {
        return (OwnershipLedger::default(), OwnershipStatus::NoCredential);
    }
    let fetched = match target.map_type {
        MapType::Homestead => client.homestead_counts(ids),
        MapType::GuildHall => match guild {
            Some(id) => client.guild_counts(id, ids),
            None => {
                return (OwnershipLedger::default(), OwnershipStatus::GuildNotSelected);
            }
        },
    };
    match fetched {
        Ok(counts) => (OwnershipLedger { counts }, OwnershipStatus::Verified),
        Err(_) => (OwnershipLedger::default(), OwnershipStatus::FetchFailed),
    }
}

fn run_swap(
    file: &str,
    to: MapKey,
    guild: Option<&str>,
    include_missing: bool,
    out: Option<&str>,
) -> anyhow::Result<(SwapPlan, SwapSummary, String, String)> {
    let (mut doc, bytes) = document::load(Path::new(file))?;
    let target = to.map();

    let session = storage::load_session()?;
    let prior_report = session.last_report.clone().unwrap_or_default();
    let mut tracker = PlanTracker::default();
    if let Some(plan) = session.plan {
        tracker.restore(plan);
    }

    let selections = Selections {
        file_name: doc.file_name.clone(),
        fingerprint: storage::fingerprint(&bytes),
        target_map_id: target.map_id.to_string(),
        include_missing,
        guild_id: guild.map(|g| g.to_string()),
    };
    let plan = tracker.begin_apply(&selections)?;

    if plan.target_type == MapType::GuildHall
        && !plan.include_missing
        && !plan.ownership.is_verified()
    {
        return Err(SwapError::OwnershipUnverified.into());
    }

    let (summary, out_file) = apply_and_write(&mut doc, &plan, file, out)?;
    tracker.finish_apply();

    let section = report::swap_report(&plan, &summary, &out_file);
    let text = if prior_report.is_empty() {
        section.clone()
    } else {
        format!("{}\n{}", prior_report, section)
    };
    storage::save_session(&SessionState {
        plan: Some(plan.clone()),
        last_report: Some(text.clone()),
    })?;
    Ok((plan, summary, out_file, text))
}

fn apply_and_write(
    doc: &mut DecorationDoc,
    plan: &SwapPlan,
    file: &str,
    out: Option<&str>,
) -> anyhow::Result<(SwapSummary, String)> {
    let summary = apply::apply_plan(doc, plan);
    let out_file = match out {
        Some(path) => path.to_string(),
        None => document::output_file_name(file, &plan.target_map_name),
    };
    std::fs::write(&out_file, doc.to_xml())?;
    Ok((summary, out_file))
}
