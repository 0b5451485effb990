use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use swagcall_core::HealthStatus;

static ROUTE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/$|[{}]").unwrap_or_else(|e| panic!("invalid route pattern: {e}"))
});

/// One entry of the upstream status feed.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRecord {
    pub method: String,
    pub route: String,
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthSnapshot {
    pub statuses: BTreeMap<String, HealthStatus>,
    /// 0-100, higher is healthier.
    pub score: u8,
}

/// Derives the operation id a feed entry refers to:
/// `get` + `/characters/{character_id}/assets/` -> `get_characters_character_id_assets`.
pub fn feed_operation_id(method: &str, route: &str) -> String {
    let route = ROUTE_NOISE.replace_all(route, "");
    format!("{}{}", method.to_ascii_lowercase(), route.replace('/', "_"))
}

/// Untagged records are not operations and are skipped. An empty feed scores 0.
pub fn build_snapshot(records: &[StatusRecord]) -> HealthSnapshot {
    let mut statuses = BTreeMap::new();
    let mut weight = 0.0_f64;
    let mut count = 0usize;

    for r in records {
        if r.tags.is_empty() {
            continue;
        }
        let status = HealthStatus::from_feed(&r.status);
        statuses.insert(feed_operation_id(&r.method, &r.route), status);
        weight += status.weight();
        count += 1;
    }

    let score = if count == 0 {
        0
    } else {
        let mean = weight / count as f64;
        (100.0 - (mean * 100.0).round()).clamp(0.0, 100.0) as u8
    };

    HealthSnapshot { statuses, score }
}
