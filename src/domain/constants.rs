use crate::domain::models::MapType;
use serde::Serialize;

/// Default base URL of the local Deco Tools Helper service.
pub const HELPER_BASE: &str = "http://localhost:61337";

/// One swappable destination map with its authoritative identity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TargetMap {
    pub key: &'static str,
    pub map_id: &'static str,
    pub map_name: &'static str,
    pub map_type: MapType,
}

/// Authoritative map identities. The `map_id` and `type` attributes written
/// into swapped documents come from this table and nowhere else.
pub const TARGET_MAPS: &[TargetMap] = &[
    TargetMap {
        key: "hearth",
        map_id: "1558",
        map_name: "Hearth's Glow",
        map_type: MapType::Homestead,
    },
    TargetMap {
        key: "comosus",
        map_id: "1596",
        map_name: "Comosus Isle",
        map_type: MapType::Homestead,
    },
    TargetMap {
        key: "lost",
        map_id: "1124",
        map_name: "Lost Precipice",
        map_type: MapType::GuildHall,
    },
    TargetMap {
        key: "gilded",
        map_id: "1121",
        map_name: "Gilded Hollow",
        map_type: MapType::GuildHall,
    },
    TargetMap {
        key: "windswept",
        map_id: "1232",
        map_name: "Windswept Haven",
        map_type: MapType::GuildHall,
    },
    TargetMap {
        key: "isle",
        map_id: "1462",
        map_name: "Isle of Reflection",
        map_type: MapType::GuildHall,
    },
];

pub fn map_by_id(map_id: &str) -> Option<&'static TargetMap> {
    TARGET_MAPS.iter().find(|m| m.map_id == map_id)
}
