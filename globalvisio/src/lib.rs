//! globalvisio
//!
//! Blocking client for the GlobalVisio energy-monitoring HTTP API.
//!
//! - `client`: the [`GvClient`] session — credentials, cached bearer token,
//!   remaining-quota gauge, request plumbing.
//! - `resources`: fetchers for the site → device → point hierarchy.
//! - `lookup`: name-fragment → id resolution.
//! - `history`: windowed history/consumption fetching and the guarded
//!   write-back.
//!
//! All I/O is synchronous and blocking; a session is intended for
//! single-threaded use (or caller-provided synchronization) and never
//! retries on its own.
//!
//! ```no_run
//! use globalvisio::{GvClient, Point};
//!
//! fn main() -> Result<(), globalvisio::GvError> {
//!     let client = GvClient::builder("user", "secret").build()?;
//!     let site_id = client.find_site_id(&["chaufferie", "nord"])?;
//!     let device_ids = client.find_device_ids(site_id, &["compteur"])?;
//!     let point_ids = client.find_point_ids(device_ids[0], &["conso"])?;
//!
//!     let point = Point::fetch(&client, point_ids[0])?;
//!     let series = point.history(
//!         &client,
//!         "2024-01-01".parse().unwrap(),
//!         "2024-03-01".parse().unwrap(),
//!     )?;
//!     if let Some(series) = series {
//!         println!("{} hourly rows", series.len());
//!     }
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

/// The session object and request plumbing.
pub mod client;
/// Windowed fetching and write-back for point series.
pub mod history;
/// Name-fragment lookups.
pub mod lookup;
/// Resource fetchers and collection listings.
pub mod resources;
mod wire;

pub use client::{DEFAULT_BASE_URL, GvClient, GvClientBuilder};
pub use resources::{Device, NamedRow, Point, Site};

pub use globalvisio_core::{
    DeviceInfo, GvError, PROVIDER_TZ, PointInfo, PointSummary, RangeKind, Sample, Series, SiteInfo,
    Window,
};
