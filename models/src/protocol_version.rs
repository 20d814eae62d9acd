use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Capability level advertised by the installed overlay provider.
///
/// Resolved once per host process. Every call site branches on the cached
/// value; nothing re-resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProtocolVersion(u32);

impl ProtocolVersion {
    /// Minimal revision, assumed when the provider is absent or silent.
    pub const BASELINE: ProtocolVersion = ProtocolVersion(1);

    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Interpret a raw metadata value. Negative values fall back to
    /// [`ProtocolVersion::BASELINE`].
    pub fn from_metadata(raw: i64) -> Self {
        u32::try_from(raw).map(Self).unwrap_or(Self::BASELINE)
    }

    pub const fn at_least(self, minimum: u32) -> bool {
        self.0 >= minimum
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "{}", self.0)
    }
}
