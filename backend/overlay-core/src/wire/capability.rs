//! Version-gated method selection.
//!
//! Every version-dependent choice in the client goes through [`MethodTable`].
//! Supporting a new protocol revision means adding rows to [`ROUTES`], not
//! touching call sites.

use crate::wire::method::MethodId;

use models::ProtocolVersion;

/// Something the client wants the provider to do, independent of wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AttachWindow,
    ReportStart,
    ReportResume,
    ReportPause,
    ReportStop,
    Reattach,
}

struct Route {
    since: u32,
    capability: Capability,
    method: MethodId,
}

const fn route(since: u32, capability: Capability, method: MethodId) -> Route {
    Route {
        since,
        capability,
        method,
    }
}

/// The newest row whose `since` is not above the negotiated version wins.
const ROUTES: &[Route] = &[
    route(1, Capability::AttachWindow, MethodId::WindowAttached),
    route(3, Capability::AttachWindow, MethodId::WindowAttached2),
    route(1, Capability::ReportResume, MethodId::Resume),
    route(4, Capability::ReportResume, MethodId::NotifyLifecycle),
    route(1, Capability::ReportPause, MethodId::Pause),
    route(4, Capability::ReportPause, MethodId::NotifyLifecycle),
    route(4, Capability::ReportStart, MethodId::NotifyLifecycle),
    route(4, Capability::ReportStop, MethodId::NotifyLifecycle),
    route(7, Capability::Reattach, MethodId::WindowAttached2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodTable {
    version: ProtocolVersion,
}

impl MethodTable {
    pub const fn for_version(version: ProtocolVersion) -> Self {
        Self { version }
    }

    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Method serving `capability` at this version, or `None` when the
    /// provider has no way to express it.
    pub fn resolve(&self, capability: Capability) -> Option<MethodId> {
        ROUTES
            .iter()
            .filter(|r| r.capability == capability && self.version.at_least(r.since))
            .max_by_key(|r| r.since)
            .map(|r| r.method)
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.resolve(capability).is_some()
    }
}
