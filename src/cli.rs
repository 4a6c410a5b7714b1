use crate::domain::constants::{TargetMap, HELPER_BASE, TARGET_MAPS};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "decoswap", version, about = "Decoration layout map-swap CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = HELPER_BASE,
        help = "Base URL of the local game helper"
    )]
    pub helper: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a layout against a target map and stage a swap plan
    Precheck {
        file: String,
        #[arg(long, value_enum)]
        to: MapKey,
        #[arg(long, help = "Guild id for guild hall ownership counts")]
        guild: Option<String>,
        #[arg(long, default_value_t = false)]
        include_missing: bool,
        #[arg(long, help = "Read the decoration catalog from a JSON file instead of the helper")]
        catalog: Option<String>,
    },
    /// Apply the staged plan and write the translated layout
    Swap {
        file: String,
        #[arg(long, value_enum)]
        to: MapKey,
        #[arg(long)]
        guild: Option<String>,
        #[arg(long, default_value_t = false)]
        include_missing: bool,
        #[arg(long)]
        catalog: Option<String>,
        #[arg(short, long, help = "Output file (defaults to <input>_<Map-Name>.xml)")]
        out: Option<String>,
    },
    /// Print the report from the most recent pre-check or swap
    Report {
        #[arg(long, help = "Write the report to a file instead of stdout")]
        out: Option<String>,
    },
    /// Show helper availability and credential state
    Status,
    /// List guilds known to the helper
    Guilds,
    /// List supported target maps
    Maps,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MapKey {
    Hearth,
    Comosus,
    Lost,
    Gilded,
    Windswept,
    Isle,
}

impl MapKey {
    /// Variants mirror `TARGET_MAPS` row for row.
    pub fn map(self) -> &'static TargetMap {
        match self {
            MapKey::Hearth => &TARGET_MAPS[0],
            MapKey::Comosus => &TARGET_MAPS[1],
            MapKey::Lost => &TARGET_MAPS[2],
            MapKey::Gilded => &TARGET_MAPS[3],
            MapKey::Windswept => &TARGET_MAPS[4],
            MapKey::Isle => &TARGET_MAPS[5],
        }
    }
}
