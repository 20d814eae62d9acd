//! Identity of the overlay provider's service and lookup of its metadata.

use std::collections::BTreeMap;

use const_format::concatcp;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OVERLAY_PACKAGE: &str = "com.google.android.googlequicksearchbox";
pub const DEFAULT_OVERLAY_CLASS: &str =
    "com.google.android.apps.gsa.nowoverlayservice.DrawerOverlayService";
pub const DEFAULT_OVERLAY_COMPONENT: &str =
    concatcp!(DEFAULT_OVERLAY_PACKAGE, "/", DEFAULT_OVERLAY_CLASS);

/// Metadata key under which the provider advertises its protocol version.
pub const VERSION_METADATA_KEY: &str = "service.api.version";

/// The service component the client binds to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceTarget {
    pub package: String,
    pub class: String,
}

impl ServiceTarget {
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            class: class.into(),
        }
    }

    /// `package/class` form, as used in logs and dumps.
    pub fn component(&self) -> String {
        format!("{}/{}", self.package, self.class)
    }
}

impl Default for ServiceTarget {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAY_PACKAGE, DEFAULT_OVERLAY_CLASS)
    }
}

/// Advertised descriptor of an installed service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub metadata: BTreeMap<String, i64>,
}

impl ServiceDescriptor {
    pub fn with_metadata(mut self, key: impl Into<String>, value: i64) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Host package manager lookup.
pub trait PackageResolver {
    /// Returns `None` when the provider is not installed.
    fn resolve_service(&self, target: &ServiceTarget) -> Option<ServiceDescriptor>;
}
