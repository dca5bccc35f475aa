//! Snapshot payload
//!
//! One response from the API. Every field is optional: the user may not
//! have selected it, or the API may simply leave it out.

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::cooldowns::CooldownCategory;
use crate::regen::{ResourceKind, ResourceState};

/// Complete snapshot as decoded from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub bars: Option<Bars>,
    /// Energy reported at the top level (`selections=bars` on the v1 API)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<Bar>,
    /// Nerve reported at the top level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nerve: Option<Bar>,
    #[serde(default)]
    pub cooldowns: Option<CooldownValues>,
    #[serde(default)]
    pub racing: Option<Racing>,
    /// Error body returned in place of data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Nested `bars` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bars {
    #[serde(default)]
    pub energy: Option<Bar>,
    #[serde(default)]
    pub nerve: Option<Bar>,
}

/// A single bar; only usable when both values are present
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(default)]
    pub current: Option<i64>,
    #[serde(default)]
    pub maximum: Option<i64>,
}

impl Bar {
    pub fn state(&self) -> Option<ResourceState> {
        match (self.current, self.maximum) {
            (Some(current), Some(maximum)) => Some(ResourceState::new(current, maximum)),
            _ => None,
        }
    }
}

/// Seconds remaining per cooldown category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownValues {
    #[serde(default)]
    pub drug: Option<i64>,
    #[serde(default)]
    pub medical: Option<i64>,
    #[serde(default)]
    pub booster: Option<i64>,
}

impl CooldownValues {
    pub fn get(&self, category: CooldownCategory) -> Option<i64> {
        match category {
            CooldownCategory::Drug => self.drug,
            CooldownCategory::Medical => self.medical,
            CooldownCategory::Booster => self.booster,
        }
    }

    /// Present categories with their values
    pub fn entries(&self) -> Vec<(CooldownCategory, i64)> {
        CooldownCategory::ALL
            .iter()
            .filter_map(|&category| self.get(category).map(|seconds| (category, seconds)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Racing {
    #[serde(default)]
    pub race: Option<Race>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Race {
    /// Race end as epoch seconds
    #[serde(default)]
    pub ends: Option<i64>,
}

/// `{"error": {"code": 2, "error": "Incorrect key"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    #[serde(rename = "error")]
    pub message: String,
}

impl Snapshot {
    /// Bar for a resource, preferring the nested `bars` block
    pub fn bar(&self, kind: ResourceKind) -> Option<ResourceState> {
        let nested = self.bars.as_ref().and_then(|bars| match kind {
            ResourceKind::Energy => bars.energy,
            ResourceKind::Nerve => bars.nerve,
        });
        let top_level = match kind {
            ResourceKind::Energy => self.energy,
            ResourceKind::Nerve => self.nerve,
        };
        nested.or(top_level).and_then(|bar| bar.state())
    }

    /// End of the active race, if any
    pub fn race_ends_at(&self) -> Option<Timestamp> {
        let ends = self.racing?.race?.ends?;
        chrono::DateTime::from_timestamp(ends, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let json = r#"{
            "bars": {
                "energy": {"current": 50, "maximum": 100},
                "nerve": {"current": 12, "maximum": 60}
            },
            "cooldowns": {"drug": 300, "medical": 0, "booster": 3725},
            "racing": {"race": {"ends": 1700000000}}
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.bar(ResourceKind::Energy), Some(ResourceState::new(50, 100)));
        assert_eq!(snapshot.bar(ResourceKind::Nerve), Some(ResourceState::new(12, 60)));
        let cooldowns = snapshot.cooldowns.unwrap();
        assert_eq!(
            cooldowns.entries(),
            vec![
                (CooldownCategory::Drug, 300),
                (CooldownCategory::Medical, 0),
                (CooldownCategory::Booster, 3725),
            ]
        );
        assert_eq!(snapshot.race_ends_at().map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_decode_sparse_payload() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(snapshot.bar(ResourceKind::Energy), None);
        assert_eq!(snapshot.race_ends_at(), None);

        let json = r#"{"bars": {"energy": {"current": 10}, "nerve": null}, "racing": {"race": null}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.bar(ResourceKind::Energy), None); // No maximum
        assert_eq!(snapshot.bar(ResourceKind::Nerve), None);
        assert_eq!(snapshot.race_ends_at(), None);
    }

    #[test]
    fn test_top_level_bars() {
        let json = r#"{
            "energy": {"current": 150, "maximum": 150, "increment": 5, "interval": 600},
            "nerve": {"current": 3, "maximum": 60}
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.bar(ResourceKind::Energy), Some(ResourceState::new(150, 150)));
        assert_eq!(snapshot.bar(ResourceKind::Nerve), Some(ResourceState::new(3, 60)));
    }

    #[test]
    fn test_partial_cooldowns() {
        let json = r#"{"cooldowns": {"medical": 90}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.cooldowns.unwrap().entries(),
            vec![(CooldownCategory::Medical, 90)]
        );
    }

    #[test]
    fn test_decode_error_body() {
        let json = r#"{"error": {"code": 2, "error": "Incorrect key"}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.error,
            Some(ApiError { code: 2, message: "Incorrect key".to_string() })
        );
    }
}
