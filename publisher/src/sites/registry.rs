//! Site identifier to storage location mapping

use std::collections::{BTreeMap, HashMap};

use crate::errors::PublishError;
use crate::models::site::{SiteId, SiteLocation};

/// Fixed mapping from site identifiers to folders in the content repository.
///
/// Built once from configuration and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: HashMap<SiteId, SiteLocation>,
}

impl SiteRegistry {
    /// Build a registry from `site id -> folder` pairs.
    ///
    /// Fails if any folder is not a single safe path segment.
    pub fn from_mapping<I, K, V>(mapping: I) -> Result<Self, PublishError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut sites = HashMap::new();
        for (id, folder) in mapping {
            let id = id.into();
            let folder = folder.into();
            validate_folder(&folder).map_err(|reason| {
                PublishError::ConfigError(format!(
                    "Invalid folder '{}' for site '{}': {}",
                    folder, id, reason
                ))
            })?;
            sites.insert(SiteId(id), SiteLocation::new_unchecked(folder));
        }
        Ok(Self { sites })
    }

    /// Resolve a site identifier to its location
    pub fn resolve(&self, site_id: &SiteId) -> Result<&SiteLocation, PublishError> {
        self.sites
            .get(site_id)
            .ok_or_else(|| PublishError::UnconfiguredSite(site_id.0.clone()))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Configured identifiers, sorted
    pub fn ids(&self) -> Vec<&SiteId> {
        let mut ids: Vec<&SiteId> = self.sites.keys().collect();
        ids.sort();
        ids
    }
}

impl TryFrom<&BTreeMap<String, String>> for SiteRegistry {
    type Error = PublishError;

    fn try_from(mapping: &BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_mapping(mapping.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

fn validate_folder(folder: &str) -> Result<(), &'static str> {
    if folder.is_empty() {
        return Err("folder is empty");
    }
    if folder.starts_with('.') {
        return Err("folder starts with '.'");
    }
    if folder.contains(['/', '\\']) {
        return Err("folder contains a path separator");
    }
    if folder.chars().any(|c| c.is_control()) {
        return Err("folder contains control characters");
    }
    Ok(())
}
