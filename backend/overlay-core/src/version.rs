//! Protocol version negotiation.
//!
//! The provider's version is looked up once per process from its service
//! metadata and cached in a [`VersionCache`]. Production code shares
//! [`VersionCache::process`]; tests inject their own instance.

use crate::service::{PackageResolver, ServiceTarget};

use models::ProtocolVersion;

use log::{debug, info};
use once_cell::sync::OnceCell;

static PROCESS_VERSION: VersionCache = VersionCache::new();

/// Write-once holder of the negotiated [`ProtocolVersion`].
#[derive(Debug)]
pub struct VersionCache {
    resolved: OnceCell<ProtocolVersion>,
}

impl VersionCache {
    pub const fn new() -> Self {
        Self {
            resolved: OnceCell::new(),
        }
    }

    /// The cache shared by every client in this process.
    pub fn process() -> &'static VersionCache {
        &PROCESS_VERSION
    }

    /// Resolve on first use, then return the cached value forever after.
    ///
    /// # Arguments
    ///
    /// * `resolver` - Host package manager used for the one-time lookup
    /// * `target` - Service whose metadata advertises the version
    /// * `metadata_key` - Metadata entry holding the version number
    pub fn resolve(
        &self,
        resolver: &dyn PackageResolver,
        target: &ServiceTarget,
        metadata_key: &str,
    ) -> ProtocolVersion {
        *self
            .resolved
            .get_or_init(|| load_api_version(resolver, target, metadata_key))
    }

    /// The cached version, if one was resolved already.
    pub fn get(&self) -> Option<ProtocolVersion> {
        self.resolved.get().copied()
    }
}

impl Default for VersionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Query the provider's advertised version. Absent provider or absent
/// metadata both mean [`ProtocolVersion::BASELINE`].
pub fn load_api_version(
    resolver: &dyn PackageResolver,
    target: &ServiceTarget,
    metadata_key: &str,
) -> ProtocolVersion {
    let Some(descriptor) = resolver.resolve_service(target) else {
        debug!("{} not installed, using baseline protocol", target.component());
        return ProtocolVersion::BASELINE;
    };

    let version = descriptor
        .metadata
        .get(metadata_key)
        .copied()
        .map(ProtocolVersion::from_metadata)
        .unwrap_or(ProtocolVersion::BASELINE);

    info!("Overlay provider {} speaks protocol {version}", target.component());
    version
}
