// Wire payloads for the overlay provider protocol (package: overlay).
//
// Field tags are part of the protocol and must stay stable across versions.
// Calls without arguments carry an empty payload.

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcWindowLayout {
    #[prost(uint64, tag = "1")]
    pub token: u64,
    #[prost(int32, tag = "2")]
    pub x: i32,
    #[prost(int32, tag = "3")]
    pub y: i32,
    #[prost(int32, tag = "4")]
    pub width: i32,
    #[prost(int32, tag = "5")]
    pub height: i32,
    #[prost(uint32, tag = "6")]
    pub flags: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcConfiguration {
    /// 0 = portrait, 1 = landscape.
    #[prost(int32, tag = "1")]
    pub orientation: i32,
    #[prost(int32, tag = "2")]
    pub screen_width_dp: i32,
    #[prost(int32, tag = "3")]
    pub screen_height_dp: i32,
    #[prost(int32, tag = "4")]
    pub density_dpi: i32,
    #[prost(bool, tag = "5")]
    pub night_mode: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcEmpty {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcScrollUpdate {
    #[prost(float, tag = "1")]
    pub progress: f32,
}

/// Attach request of protocol revisions 1 and 2 (method 4).
#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcLegacyAttach {
    #[prost(message, optional, tag = "1")]
    pub layout_params: Option<IpcWindowLayout>,
    #[prost(int32, tag = "2")]
    pub client_options: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcAttachBundle {
    #[prost(message, optional, tag = "1")]
    pub layout_params: Option<IpcWindowLayout>,
    #[prost(message, optional, tag = "2")]
    pub configuration: Option<IpcConfiguration>,
    #[prost(int32, tag = "3")]
    pub client_options: i32,
}

/// Attach request of protocol revision 3 and later (method 14).
#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcBundledAttach {
    #[prost(message, optional, tag = "1")]
    pub bundle: Option<IpcAttachBundle>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcWindowDetached {
    #[prost(bool, tag = "1")]
    pub is_reconfiguring: bool,
}

/// Open/close argument: 0/1 for a plain animate flag, or an encoded duration.
#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcOverlayCommand {
    #[prost(int32, tag = "1")]
    pub value: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcLifecycleState {
    #[prost(int32, tag = "1")]
    pub state: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcCapabilityToggle {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IpcBoolReply {
    #[prost(bool, tag = "1")]
    pub value: bool,
}
