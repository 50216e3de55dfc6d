//! Resource fetchers for the site → device → point hierarchy.
//!
//! Each `fetch` takes one immutable snapshot of the resource's attributes;
//! nothing refreshes behind the caller's back. Collection listings
//! (`GvClient::sites`, `devices_by_site`, `device_points`) return the raw
//! id/name rows the lookups match against.

use globalvisio_core::{DeviceInfo, GvError, PointInfo, PointSummary, SiteInfo};

use crate::client::GvClient;
use crate::wire::{DevicePayload, DevicesPayload, PointPayload, SitePayload, SitesPayload};

/// A site, with its attribute snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    info: SiteInfo,
}

impl Site {
    /// Fetch the site's attributes and wrap them in an immutable snapshot.
    ///
    /// # Errors
    /// `Api`/`Transport`/`Decode` per the request plumbing; `Schema` when
    /// the provider reports no data for this id.
    pub fn fetch(client: &GvClient, id: i64) -> Result<Self, GvError> {
        let payload: SitePayload =
            client.get_payload(&format!("/api/sites/index/{id}"), "site attributes")?;
        let body = payload
            .site
            .ok_or_else(|| GvError::schema(format!("site {id}: no attributes returned")))?;
        Ok(Self {
            info: SiteInfo {
                id,
                name: body.name,
                address: body.address,
                address2: body.address2,
                postal_code: body.postal_code,
                city: body.city,
                country: body.country,
                start: body.start,
            },
        })
    }

    /// The attribute snapshot.
    #[must_use]
    pub fn info(&self) -> &SiteInfo {
        &self.info
    }
}

/// A device, with its attribute snapshot (including its point table).
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    info: DeviceInfo,
}

impl Device {
    /// Fetch the device's attributes and point table.
    ///
    /// # Errors
    /// `Api`/`Transport`/`Decode` per the request plumbing; `Schema` when
    /// the provider reports no data for this id.
    pub fn fetch(client: &GvClient, id: i64) -> Result<Self, GvError> {
        let payload: DevicePayload =
            client.get_payload(&format!("/api/devices/index/{id}"), "device attributes")?;
        let body = payload
            .device
            .ok_or_else(|| GvError::schema(format!("device {id}: no attributes returned")))?;
        Ok(Self {
            info: DeviceInfo {
                id,
                site_id: body.site.id,
                mnemonic: body.mnemonic,
                name: body.name,
                installed_from: body.installed_from,
                installed_to: body.installed_to,
                last_seen: body.last_seen,
                polling_interval: body.polling_interval,
                points: body
                    .points
                    .into_iter()
                    .map(|p| PointSummary {
                        id: p.id,
                        human_label: p.human_label.unwrap_or_default(),
                    })
                    .collect(),
            },
        })
    }

    /// The attribute snapshot.
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }
}

/// A point, with its attribute snapshot. History and write operations live
/// in [`crate::history`].
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    info: PointInfo,
}

impl Point {
    /// Fetch the point's attributes (labels, unit, parent ids).
    ///
    /// # Errors
    /// `Api`/`Transport`/`Decode` per the request plumbing; `Schema` when
    /// the provider reports no data for this id.
    pub fn fetch(client: &GvClient, id: i64) -> Result<Self, GvError> {
        let payload: PointPayload =
            client.get_payload(&format!("/api/points/index/{id}"), "point attributes")?;
        let body = payload
            .point
            .ok_or_else(|| GvError::schema(format!("point {id}: no attributes returned")))?;
        Ok(Self {
            info: PointInfo {
                id,
                device_id: body.device.id,
                site_id: body.device.site.id,
                automaton_label: body.automaton_label,
                human_label: body.human_label,
                last_value: body.last_value,
                last_value_date: body.last_value_date,
                kind: body.kind.map(|k| k.name),
                subkind: body.subtype.map(|k| k.name),
                unit: body.unit.map(|u| u.symbol),
            },
        })
    }

    /// The attribute snapshot.
    #[must_use]
    pub fn info(&self) -> &PointInfo {
        &self.info
    }

    /// Build a point from an already-known snapshot (tests, callers that
    /// cache metadata themselves).
    #[must_use]
    pub fn from_info(info: PointInfo) -> Self {
        Self { info }
    }
}

/// An id/name row of a collection listing, as matched by the lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRow {
    /// Resource id.
    pub id: i64,
    /// Name field the lookups match against (`nom` for sites and devices,
    /// `labelHumain` for points).
    pub name: String,
}

impl GvClient {
    /// List all sites (single page of up to 100, as the provider serves it).
    ///
    /// # Errors
    /// `Api`/`Transport`/`Decode`/`Schema` per the request plumbing.
    pub fn sites(&self) -> Result<Vec<NamedRow>, GvError> {
        let payload: SitesPayload =
            self.get_payload("/api/sites/index?page=0&perPage=100", "sites index")?;
        let rows = payload
            .sites
            .ok_or_else(|| GvError::schema("sites index: no site list returned"))?;
        Ok(rows
            .into_iter()
            .map(|s| NamedRow {
                id: s.id,
                name: s.name,
            })
            .collect())
    }

    /// List a site's devices.
    ///
    /// # Errors
    /// `Api`/`Transport`/`Decode`/`Schema` per the request plumbing.
    pub fn devices_by_site(&self, site_id: i64) -> Result<Vec<NamedRow>, GvError> {
        let payload: DevicesPayload = self.get_payload(
            &format!("/api/devices/listBySite/{site_id}"),
            "devices by site",
        )?;
        let rows = payload
            .devices
            .ok_or_else(|| GvError::schema(format!("site {site_id}: no device list returned")))?;
        Ok(rows
            .into_iter()
            .map(|d| NamedRow {
                id: d.id,
                name: d.name,
            })
            .collect())
    }

    /// List a device's points (id + human label).
    ///
    /// # Errors
    /// `Api`/`Transport`/`Decode`/`Schema` per the request plumbing.
    pub fn device_points(&self, device_id: i64) -> Result<Vec<NamedRow>, GvError> {
        let payload: DevicePayload = self.get_payload(
            &format!("/api/devices/index/{device_id}"),
            "device point table",
        )?;
        let body = payload
            .device
            .ok_or_else(|| GvError::schema(format!("device {device_id}: no data returned")))?;
        Ok(body
            .points
            .into_iter()
            .map(|p| NamedRow {
                id: p.id,
                name: p.human_label.unwrap_or_default(),
            })
            .collect())
    }

    /// List every point of every device of a site, concatenated.
    ///
    /// # Errors
    /// Aborts on the first failing device listing.
    pub fn site_points(&self, site_id: i64) -> Result<Vec<NamedRow>, GvError> {
        let mut all = Vec::new();
        for device in self.devices_by_site(site_id)? {
            all.extend(self.device_points(device.id)?);
        }
        Ok(all)
    }
}
