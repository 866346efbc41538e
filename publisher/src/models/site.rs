//! Site models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque site key supplied by callers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub String);

impl From<&str> for SiteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SiteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Folder under `sites/` that backs a site in the content repository.
///
/// Only the registry constructs these, after validating the folder name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SiteLocation(String);

impl SiteLocation {
    /// Root folder holding every site in the content repository
    pub const ROOT: &'static str = "sites";

    /// Page file published for each site
    pub const INDEX_FILE: &'static str = "index.html";

    pub(crate) fn new_unchecked(folder: String) -> Self {
        Self(folder)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `sites/{folder}`
    pub fn folder_path(&self) -> String {
        format!("{}/{}", Self::ROOT, self.0)
    }

    /// `sites/{folder}/index.html`
    pub fn index_path(&self) -> String {
        format!("{}/{}/{}", Self::ROOT, self.0, Self::INDEX_FILE)
    }
}

impl fmt::Display for SiteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Revision token of a stored file, used as a write precondition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRevision(pub String);

impl ContentRevision {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
