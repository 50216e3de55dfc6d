//! Immutable metadata snapshots for the provider's resource hierarchy
//! (sites → devices → points) and the name-matching rule shared by every
//! lookup.
//!
//! Snapshots are taken once when a resource is fetched and never refresh
//! themselves; callers own them as plain values.

use serde::{Deserialize, Serialize};

/// Snapshot of a site's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Provider-assigned site id.
    pub id: i64,
    /// Site name (`nom`).
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Address complement.
    pub address2: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Monitoring start date, as reported by the provider.
    pub start: Option<String>,
}

/// One row of a device's point table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    /// Provider-assigned point id.
    pub id: i64,
    /// Human-readable label (`labelHumain`).
    pub human_label: String,
}

/// Snapshot of a device's attributes, including its point table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Provider-assigned device id.
    pub id: i64,
    /// Id of the parent site.
    pub site_id: i64,
    /// Short mnemonic code.
    pub mnemonic: Option<String>,
    /// Device name (`nom`).
    pub name: String,
    /// Installation start date.
    pub installed_from: Option<String>,
    /// Installation end date, if decommissioned.
    pub installed_to: Option<String>,
    /// Last time the device reported in.
    pub last_seen: Option<String>,
    /// Reporting cadence, as reported by the provider.
    pub polling_interval: Option<String>,
    /// The device's points.
    pub points: Vec<PointSummary>,
}

/// Snapshot of a point's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointInfo {
    /// Provider-assigned point id.
    pub id: i64,
    /// Id of the parent device.
    pub device_id: i64,
    /// Id of the parent site (through the device).
    pub site_id: i64,
    /// Label as configured on the automaton (`labelAutomate`).
    pub automaton_label: Option<String>,
    /// Human-readable label (`labelHumain`).
    pub human_label: Option<String>,
    /// Most recent value, if any.
    pub last_value: Option<f64>,
    /// Timestamp of the most recent value.
    pub last_value_date: Option<String>,
    /// Point type name.
    pub kind: Option<String>,
    /// Point subtype name.
    pub subkind: Option<String>,
    /// Unit symbol, e.g. `kWh`.
    pub unit: Option<String>,
}

impl PointInfo {
    /// Whether this point is a virtual "API" point that accepts writes.
    ///
    /// Writing is authorized by naming convention: one of the labels must
    /// contain `"API"` case-insensitively. Real sensor points never carry
    /// that marker.
    #[must_use]
    pub fn is_api_point(&self) -> bool {
        let has = |l: &Option<String>| {
            l.as_deref()
                .is_some_and(|l| l.to_lowercase().contains("api"))
        };
        has(&self.automaton_label) || has(&self.human_label)
    }

    /// The label to show in diagnostics: human label, falling back to the
    /// automaton label, falling back to the id.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.human_label
            .clone()
            .or_else(|| self.automaton_label.clone())
            .unwrap_or_else(|| format!("point {}", self.id))
    }
}

/// The single matching rule used by every lookup: a candidate name matches
/// iff **every** word is a case-insensitive substring of it.
#[must_use]
pub fn matches_words(name: &str, words: &[impl AsRef<str>]) -> bool {
    let name = name.to_lowercase();
    words
        .iter()
        .all(|w| name.contains(&w.as_ref().to_lowercase()))
}
