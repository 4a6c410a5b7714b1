use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// One of the two mutually exclusive map categories. Each carries its own
/// catalog-identifier numbering space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    Homestead,
    GuildHall,
}

impl MapType {
    /// The `type` attribute value the game writes into documents.
    pub fn flag(self) -> &'static str {
        match self {
            MapType::Homestead => "0",
            MapType::GuildHall => "1",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "0" => Some(MapType::Homestead),
            "1" => Some(MapType::GuildHall),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapType::Homestead => "Homestead",
            MapType::GuildHall => "Guild Hall",
        }
    }
}

/// One row of the decoration catalog. Either target identifier may be absent
/// when the item has no counterpart on that map type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub homestead_id: Option<u64>,
    pub guild_upgrade_id: Option<u64>,
}

impl CatalogEntry {
    pub fn target_id(&self, to: MapType) -> Option<u64> {
        match to {
            MapType::Homestead => self.homestead_id,
            MapType::GuildHall => self.guild_upgrade_id,
        }
    }
}

/// Name-keyed decoration lookup, immutable for the session once loaded.
/// Keys are lowercase cleaned names (see `services::names`).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn insert(&mut self, key: String, entry: CatalogEntry) {
        self.entries.insert(key, entry);
    }

    pub fn lookup(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reverse lookup for report display. First match in key order wins,
    /// which keeps the result deterministic when two names share an id.
    pub fn name_for_id(&self, id: u64, to: MapType) -> Option<&str> {
        self.entries
            .values()
            .find(|e| e.target_id(to) == Some(id))
            .map(|e| e.name.as_str())
    }
}

/// Aggregated need for one target identifier, with provenance in document
/// order. Never merged across reconciliation passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub target_id: u64,
    pub required: u64,
    /// Prop ordinals (position among `<prop>` elements) that contribute.
    pub sources: Vec<usize>,
}

/// Per-prop resolution produced by one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropTarget {
    pub index: usize,
    pub name: String,
    pub target_id: Option<u64>,
}

/// Output of the requirement aggregator for one (document, target) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    pub requirements: BTreeMap<u64, Requirement>,
    pub prop_targets: Vec<PropTarget>,
    /// Deduplicated, lexicographically sorted.
    pub no_counterpart: Vec<String>,
}

impl RequirementSet {
    pub fn target_ids(&self) -> Vec<u64> {
        self.requirements.keys().copied().collect()
    }
}

/// Owned-quantity snapshot keyed by target identifier. An empty ledger means
/// ownership is unknown, not that the account owns nothing: a successful
/// fetch records an entry (defaulting to 0) for every requested identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipLedger {
    pub counts: BTreeMap<u64, u64>,
}

impl OwnershipLedger {
    pub fn owned(&self, id: u64) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn is_verified(&self) -> bool {
        !self.counts.is_empty()
    }
}

/// Why ownership counts were or were not obtained during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipStatus {
    Verified,
    HelperNotRunning,
    NoCredential,
    GuildNotSelected,
    FetchFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    NoCounterpart,
    InsufficientOwnership,
}

/// Allocation outcome for one prop ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropDecision {
    pub index: usize,
    pub keep: bool,
    pub new_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_reason: Option<DropReason>,
}

/// One ownership-deficit row for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingEntry {
    pub target_id: u64,
    pub name: String,
    pub required: u64,
    pub owned: u64,
    pub missing: u64,
}

/// Immutable snapshot of one successful reconciliation pass. Gates the
/// destructive apply step; invalidated by any input change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapPlan {
    pub file_name: String,
    /// SHA-256 of the document bytes the plan was computed from.
    pub fingerprint: String,
    pub source_type: Option<MapType>,
    pub target_key: String,
    pub target_map_id: String,
    pub target_map_name: String,
    pub target_type: MapType,
    pub include_missing: bool,
    pub guild_id: Option<String>,
    pub prop_count: usize,
    pub requirements: Vec<Requirement>,
    pub ownership: OwnershipLedger,
    pub ownership_status: OwnershipStatus,
    pub decisions: Vec<PropDecision>,
    pub missing: Vec<MissingEntry>,
    pub no_counterpart: Vec<String>,
}

/// Counts produced by the apply step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SwapSummary {
    pub updated_ids: usize,
    pub removed_no_counterpart: usize,
    pub removed_missing: usize,
}

/// Persisted session state: at most one plan at a time.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub plan: Option<SwapPlan>,
    #[serde(default)]
    pub last_report: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRef {
    pub id: String,
    pub name: String,
    pub tag: Option<String>,
}

impl GuildRef {
    pub fn display(&self) -> String {
        match &self.tag {
            Some(tag) if !tag.is_empty() => format!("{} [{}]", self.name, tag),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HelperStatus {
    pub running: bool,
    pub api_key_present: bool,
    pub game_link: bool,
}
