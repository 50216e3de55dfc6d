//! Serde models for the provider's wire format.
//!
//! Every endpoint wraps its payload in a `{"response": {...}}` envelope and
//! reports failures as `{"message": "..."}`. Field names are the provider's
//! (French) names; they are renamed here once so the rest of the crate works
//! with the `globalvisio-core` vocabulary.
//!
//! Inner payload fields the original API may omit or null out are `Option`s;
//! the client maps an absent payload to `GvError::Schema` rather than a
//! decode failure.

use serde::{Deserialize, Serialize};

/// Body shape of a non-200 response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

/// The `{"response": ...}` envelope common to all endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: Option<T>,
}

/// `POST /api/auth/token` request body.
#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST /api/auth/token` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthPayload {
    pub token: String,
    pub expiration: String,
}

/// `GET /api/sites/index` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct SitesPayload {
    pub sites: Option<Vec<SiteRow>>,
}

/// One row of the sites index.
#[derive(Debug, Deserialize)]
pub(crate) struct SiteRow {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
}

/// `GET /api/sites/index/{id}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct SitePayload {
    pub site: Option<SiteBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteBody {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse")]
    pub address: Option<String>,
    #[serde(rename = "adresse2")]
    pub address2: Option<String>,
    #[serde(rename = "codePostal")]
    pub postal_code: Option<String>,
    #[serde(rename = "ville")]
    pub city: Option<String>,
    #[serde(rename = "pays")]
    pub country: Option<String>,
    pub start: Option<String>,
}

/// `GET /api/devices/listBySite/{site_id}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct DevicesPayload {
    pub devices: Option<Vec<DeviceRow>>,
}

/// One row of a site's device list.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceRow {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
}

/// `GET /api/devices/index/{id}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct DevicePayload {
    pub device: Option<DeviceBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceBody {
    pub site: IdRef,
    #[serde(rename = "mnemonique")]
    pub mnemonic: Option<String>,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "installationDebut")]
    pub installed_from: Option<String>,
    #[serde(rename = "installationFin")]
    pub installed_to: Option<String>,
    #[serde(rename = "derniereConnexion")]
    pub last_seen: Option<String>,
    #[serde(rename = "frequenceCommunication")]
    pub polling_interval: Option<String>,
    #[serde(default)]
    pub points: Vec<PointRow>,
}

/// A bare `{"id": ...}` reference to a parent resource.
#[derive(Debug, Deserialize)]
pub(crate) struct IdRef {
    pub id: i64,
}

/// One row of a device's point table.
#[derive(Debug, Deserialize)]
pub(crate) struct PointRow {
    pub id: i64,
    #[serde(rename = "labelHumain")]
    pub human_label: Option<String>,
}

/// `GET /api/points/index/{id}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct PointPayload {
    pub point: Option<PointBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointBody {
    pub device: DeviceRef,
    #[serde(rename = "labelAutomate")]
    pub automaton_label: Option<String>,
    #[serde(rename = "labelHumain")]
    pub human_label: Option<String>,
    #[serde(rename = "lastValue")]
    pub last_value: Option<f64>,
    #[serde(rename = "lastValueDate")]
    pub last_value_date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<NameRef>,
    pub subtype: Option<NameRef>,
    pub unit: Option<SymbolRef>,
}

/// A device reference carrying its parent site.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceRef {
    pub id: i64,
    pub site: IdRef,
}

/// A named nested object, e.g. a point type.
#[derive(Debug, Deserialize)]
pub(crate) struct NameRef {
    #[serde(rename = "nom")]
    pub name: String,
}

/// A unit object carrying its symbol.
#[derive(Debug, Deserialize)]
pub(crate) struct SymbolRef {
    #[serde(rename = "symbole")]
    pub symbol: String,
}

/// `GET /api/points/history/{id}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryPayload {
    pub history: Option<Vec<ValueRow>>,
}

/// `GET /api/points/consumption/{id}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ConsumptionPayload {
    pub consumption: Option<Vec<ValueRow>>,
}

/// One `{date, value}` row of a history or consumption table.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRow {
    pub date: String,
    pub value: f64,
}

/// `POST /api/points/saveConsumption/{id}` request body.
#[derive(Debug, Serialize)]
pub(crate) struct SaveRequest {
    #[serde(rename = "modeSave")]
    pub mode_save: &'static str,
    pub data: Vec<SaveRow>,
}

/// One row of a write-back batch.
#[derive(Debug, Serialize)]
pub(crate) struct SaveRow {
    pub datetime: String,
    pub value: f64,
}
