//! Name-fragment → id resolution across the resource hierarchy.
//!
//! All lookups share one matching rule: a candidate matches iff every word
//! is a case-insensitive substring of its name field. Site lookup fails
//! closed on ambiguity; device and point lookups return every match,
//! ascending.

use tracing::warn;

use globalvisio_core::{GvError, matches_words};

use crate::client::GvClient;

impl GvClient {
    /// Resolve a site by name fragments.
    ///
    /// # Errors
    /// `NotFound` when no site name contains every word; `Ambiguous` when
    /// more than one does (the lookup does not guess); otherwise the
    /// request plumbing's errors.
    pub fn find_site_id(&self, words: &[&str]) -> Result<i64, GvError> {
        let sites = self.sites()?;
        let matches: Vec<i64> = sites
            .iter()
            .filter(|s| matches_words(&s.name, words))
            .map(|s| s.id)
            .collect();
        match matches.as_slice() {
            [] => Err(GvError::not_found(format!("site matching {words:?}"))),
            [id] => Ok(*id),
            _ => {
                warn!(?words, count = matches.len(), "site lookup is ambiguous");
                Err(GvError::Ambiguous {
                    what: format!("site matching {words:?}"),
                    count: matches.len(),
                })
            }
        }
    }

    /// Resolve a site's devices by name fragments. Multiple matches are
    /// valid and returned ascending.
    ///
    /// # Errors
    /// `NotFound` when no device name contains every word; otherwise the
    /// request plumbing's errors.
    pub fn find_device_ids(&self, site_id: i64, words: &[&str]) -> Result<Vec<i64>, GvError> {
        let devices = self.devices_by_site(site_id)?;
        let mut ids: Vec<i64> = devices
            .iter()
            .filter(|d| matches_words(&d.name, words))
            .map(|d| d.id)
            .collect();
        if ids.is_empty() {
            return Err(GvError::not_found(format!(
                "device of site {site_id} matching {words:?}"
            )));
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Resolve a device's points by human-label fragments. Multiple matches
    /// are valid and returned ascending; zero matches yield an empty list.
    ///
    /// # Errors
    /// The request plumbing's errors.
    pub fn find_point_ids(&self, device_id: i64, words: &[&str]) -> Result<Vec<i64>, GvError> {
        let points = self.device_points(device_id)?;
        let mut ids: Vec<i64> = points
            .iter()
            .filter(|p| matches_words(&p.name, words))
            .map(|p| p.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
