use crate::domain::models::{Catalog, CatalogEntry, GuildRef, HelperStatus};
use crate::services::names;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

/// Client for the local Deco Tools Helper service. All payloads are
/// normalized here; the rest of the crate never sees raw helper JSON.
pub struct HelperClient {
    base: String,
    client: reqwest::blocking::Client,
}

impl HelperClient {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(2500))
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base, path);
        let resp = self.client.get(url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    /// Never errors: an unreachable helper is a normal, reportable state.
    pub fn status(&self) -> HelperStatus {
        let raw: RawStatus = match self.get_json("/status") {
            Ok(s) => s,
            Err(_) => return HelperStatus::default(),
        };
        let game_link = raw.running
            && self
                .get_json::<RawMumble>("/mumble")
                .map(|m| m.available)
                .unwrap_or(false);
        HelperStatus {
            running: raw.running,
            api_key_present: raw.api_key_present,
            game_link,
        }
    }

    /// Prefers the lite decoration feed, falling back to the full one.
    pub fn catalog(&self) -> anyhow::Result<Catalog> {
        let payload: RawCatalogPayload = match self.get_json("/decorations-lite") {
            Ok(p) => p,
            Err(_) => self.get_json("/decorations")?,
        };
        Ok(catalog_from_payload(payload))
    }

    pub fn guilds(&self) -> anyhow::Result<Vec<GuildRef>> {
        let raw: Vec<RawGuild> = self.get_json("/guilds")?;
        Ok(raw.into_iter().map(RawGuild::normalize).collect())
    }

    /// Owned counts for the account's homestead storage, scoped to `ids`.
    pub fn homestead_counts(&self, ids: &[u64]) -> anyhow::Result<BTreeMap<u64, u64>> {
        let raw: HashMap<String, serde_json::Value> = self.get_json("/decos/homestead")?;
        Ok(counts_for_ids(&raw, ids))
    }

    /// Owned counts for one guild's storage, scoped to `ids`.
    pub fn guild_counts(&self, guild_id: &str, ids: &[u64]) -> anyhow::Result<BTreeMap<u64, u64>> {
        let url = format!("{}/decos/guild/{}", self.base, guild_id);
        let raw: HashMap<String, serde_json::Value> = self
            .client
            .post(url)
            .json(&serde_json::json!({ "ids": ids }))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(counts_for_ids(&raw, ids))
    }
}

/// Loads a catalog from a local JSON file in any of the payload shapes the
/// helper serves.
pub fn load_catalog_file(path: &Path) -> anyhow::Result<Catalog> {
    let raw = std::fs::read_to_string(path)?;
    catalog_from_str(&raw)
}

pub fn catalog_from_str(raw: &str) -> anyhow::Result<Catalog> {
    let payload: RawCatalogPayload = serde_json::from_str(raw)?;
    Ok(catalog_from_payload(payload))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatus {
    #[serde(default)]
    running: bool,
    #[serde(default)]
    api_key_present: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawMumble {
    #[serde(default)]
    available: bool,
}

/// The helper has served all three shapes over its lifetime; accept any.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCatalogPayload {
    List(Vec<RawDecoration>),
    Wrapped {
        #[serde(alias = "Decorations")]
        decorations: Vec<RawDecoration>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecoration {
    #[serde(default, alias = "Name")]
    name: Option<String>,
    #[serde(default, alias = "HomesteadId")]
    homestead_id: Option<u64>,
    #[serde(default, alias = "GuildUpgradeId")]
    guild_upgrade_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawGuild {
    #[serde(default, alias = "Id")]
    id: Option<serde_json::Value>,
    #[serde(default, alias = "Name")]
    name: Option<String>,
    #[serde(default, alias = "Tag")]
    tag: Option<String>,
}

impl RawGuild {
    fn normalize(self) -> GuildRef {
        let id = match self.id {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        GuildRef {
            id,
            name: self.name.unwrap_or_else(|| "Unknown Guild".to_string()),
            tag: self.tag,
        }
    }
}

fn catalog_from_payload(payload: RawCatalogPayload) -> Catalog {
    let list = match payload {
        RawCatalogPayload::List(l) => l,
        RawCatalogPayload::Wrapped { decorations } => decorations,
    };
    let mut catalog = Catalog::default();
    for raw in list {
        let cleaned = names::clean(raw.name.as_deref().unwrap_or(""));
        if cleaned.is_empty() {
            continue;
        }
        let key = names::lookup_key(&cleaned);
        catalog.insert(
            key,
            CatalogEntry {
                name: cleaned,
                homestead_id: raw.homestead_id,
                guild_upgrade_id: raw.guild_upgrade_id,
            },
        );
    }
    catalog
}

/// Records an entry for every requested identifier (defaulting to 0), so a
/// successful fetch is distinguishable from no fetch at all.
fn counts_for_ids(raw: &HashMap<String, serde_json::Value>, ids: &[u64]) -> BTreeMap<u64, u64> {
    ids.iter()
        .map(|id| {
            let count = raw
                .get(&id.to_string())
                .and_then(|v| {
                    v.as_u64()
                        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
                })
                .unwrap_or(0);
            (*id, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MapType;

    #[test]
    fn catalog_accepts_bare_array() {
        let catalog = catalog_from_str(
            r#"[{"name":"Lantern","homesteadId":101,"guildUpgradeId":42}]"#,
        )
        .unwrap();
        let entry = catalog.lookup("lantern").unwrap();
        assert_eq!(entry.homestead_id, Some(101));
        assert_eq!(entry.guild_upgrade_id, Some(42));
    }

    #[test]
    fn catalog_accepts_wrapped_and_capitalized_shapes() {
        let lower = catalog_from_str(
            r#"{"decorations":[{"name":"Bench","homesteadId":7,"guildUpgradeId":null}]}"#,
        )
        .unwrap();
        assert_eq!(lower.lookup("bench").unwrap().guild_upgrade_id, None);

        let upper = catalog_from_str(
            r#"{"Decorations":[{"Name":"Bench","HomesteadId":7,"GuildUpgradeId":8}]}"#,
        )
        .unwrap();
        assert_eq!(upper.lookup("bench").unwrap().guild_upgrade_id, Some(8));
    }

    #[test]
    fn catalog_cleans_names_and_skips_empty_ones() {
        let catalog = catalog_from_str(
            r#"[{"name":"<c=@flavor>Lantern</c>\nA warm glow","homesteadId":1},
                {"name":"","homesteadId":2},
                {"homesteadId":3}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = catalog.lookup("lantern").unwrap();
        assert_eq!(entry.name, "Lantern");
        assert_eq!(entry.target_id(MapType::Homestead), Some(1));
    }

    #[test]
    fn counts_default_missing_ids_to_zero() {
        let raw: HashMap<String, serde_json::Value> =
            serde_json::from_str(r#"{"42":2,"77":"5"}"#).unwrap();
        let counts = counts_for_ids(&raw, &[42, 77, 99]);
        assert_eq!(counts.get(&42), Some(&2));
        assert_eq!(counts.get(&77), Some(&5));
        assert_eq!(counts.get(&99), Some(&0));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn guild_payloads_accept_either_casing() {
        let raw: Vec<RawGuild> = serde_json::from_str(
            r#"[{"Id":"abc-1","Name":"Keepers","Tag":"KP"},{"id":7,"name":"Low"}]"#,
        )
        .unwrap();
        let guilds: Vec<GuildRef> = raw.into_iter().map(RawGuild::normalize).collect();
        assert_eq!(guilds[0].id, "abc-1");
        assert_eq!(guilds[0].display(), "Keepers [KP]");
        assert_eq!(guilds[1].id, "7");
        assert_eq!(guilds[1].display(), "Low");
    }
}
