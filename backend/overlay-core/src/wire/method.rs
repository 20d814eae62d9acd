/// Remote operations understood by the overlay provider.
///
/// Ids are never reused or renumbered; a new capability gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MethodId {
    StartScroll = 1,
    OnScroll = 2,
    EndScroll = 3,
    WindowAttached = 4,
    WindowDetached = 5,
    CloseOverlay = 6,
    Pause = 7,
    Resume = 8,
    OpenOverlay = 9,
    RequestSecondaryCapability = 10,
    QuerySecondaryCapabilityActive = 12,
    QueryExtendedCapability = 13,
    WindowAttached2 = 14,
    NotifyLifecycle = 16,
}

impl MethodId {
    pub const ALL: [MethodId; 14] = [
        MethodId::StartScroll,
        MethodId::OnScroll,
        MethodId::EndScroll,
        MethodId::WindowAttached,
        MethodId::WindowDetached,
        MethodId::CloseOverlay,
        MethodId::Pause,
        MethodId::Resume,
        MethodId::OpenOverlay,
        MethodId::RequestSecondaryCapability,
        MethodId::QuerySecondaryCapabilityActive,
        MethodId::QueryExtendedCapability,
        MethodId::WindowAttached2,
        MethodId::NotifyLifecycle,
    ];

    pub const fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.code() == code)
    }

    /// Calls that wait for a reply payload. Everything else is one-way.
    pub const fn has_reply(self) -> bool {
        matches!(
            self,
            MethodId::QuerySecondaryCapabilityActive | MethodId::QueryExtendedCapability
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            MethodId::StartScroll => "startScroll",
            MethodId::OnScroll => "onScroll",
            MethodId::EndScroll => "endScroll",
            MethodId::WindowAttached => "windowAttached",
            MethodId::WindowDetached => "windowDetached",
            MethodId::CloseOverlay => "closeOverlay",
            MethodId::Pause => "pause",
            MethodId::Resume => "resume",
            MethodId::OpenOverlay => "openOverlay",
            MethodId::RequestSecondaryCapability => "requestSecondaryCapability",
            MethodId::QuerySecondaryCapabilityActive => "querySecondaryCapabilityActive",
            MethodId::QueryExtendedCapability => "queryExtendedCapability",
            MethodId::WindowAttached2 => "windowAttached2",
            MethodId::NotifyLifecycle => "notifyLifecycle",
        }
    }
}
