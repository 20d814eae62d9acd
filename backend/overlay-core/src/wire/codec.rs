//! Argument marshaling for every [`MethodId`].
//!
//! [`OverlayProxy`] is the outbound half: it writes arguments in a fixed
//! order and issues the transaction. [`OverlayCall`] is the inbound half used
//! by provider-side implementations to decode what the client sent.

use crate::error::ipc::IpcError;
use crate::proto::{
    IpcAttachBundle, IpcBoolReply, IpcBundledAttach, IpcCapabilityToggle, IpcConfiguration,
    IpcEmpty, IpcLegacyAttach, IpcLifecycleState, IpcOverlayCommand, IpcScrollUpdate,
    IpcWindowDetached, IpcWindowLayout,
};
use crate::wire::{MethodId, OverlayCallback, OverlayHandle, Reply, Transaction};

use common::ErrorLocation;
use models::{Configuration, Orientation, WindowParams};

use std::panic::Location;
use std::sync::Arc;

use log::trace;
use prost::Message;

impl From<&WindowParams> for IpcWindowLayout {
    fn from(params: &WindowParams) -> Self {
        Self {
            token: params.token,
            x: params.x,
            y: params.y,
            width: params.width,
            height: params.height,
            flags: params.flags,
        }
    }
}

impl From<IpcWindowLayout> for WindowParams {
    fn from(layout: IpcWindowLayout) -> Self {
        Self {
            token: layout.token,
            x: layout.x,
            y: layout.y,
            width: layout.width,
            height: layout.height,
            flags: layout.flags,
        }
    }
}

impl From<&Configuration> for IpcConfiguration {
    fn from(configuration: &Configuration) -> Self {
        Self {
            orientation: match configuration.orientation {
                Orientation::Portrait => 0,
                Orientation::Landscape => 1,
            },
            screen_width_dp: configuration.screen_width_dp,
            screen_height_dp: configuration.screen_height_dp,
            density_dpi: configuration.density_dpi,
            night_mode: configuration.night_mode,
        }
    }
}

impl From<IpcConfiguration> for Configuration {
    fn from(configuration: IpcConfiguration) -> Self {
        Self {
            orientation: if configuration.orientation == 1 {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            },
            screen_width_dp: configuration.screen_width_dp,
            screen_height_dp: configuration.screen_height_dp,
            density_dpi: configuration.density_dpi,
            night_mode: configuration.night_mode,
        }
    }
}

/// Typed client for a bound overlay provider.
///
/// Borrow one per remote call attempt; do not keep it across calls since the
/// underlying handle can die at any time.
pub struct OverlayProxy {
    handle: OverlayHandle,
}

impl OverlayProxy {
    pub fn new(handle: OverlayHandle) -> Self {
        Self { handle }
    }

    fn call<M: Message>(
        &self,
        method: MethodId,
        args: &M,
        callback: Option<Arc<dyn OverlayCallback>>,
    ) -> Result<Reply, IpcError> {
        let mut payload = Vec::with_capacity(args.encoded_len());
        args.encode(&mut payload)?;

        trace!(
            "transact {} (id {}, {} bytes)",
            method.name(),
            method.code(),
            payload.len()
        );

        self.handle.transact(Transaction {
            method,
            payload,
            callback,
            oneway: !method.has_reply(),
        })
    }

    fn query(&self, method: MethodId) -> Result<bool, IpcError> {
        let reply = self.call(method, &IpcEmpty {}, None)?;
        Ok(IpcBoolReply::decode(reply.payload.as_slice())?.value)
    }

    pub fn start_scroll(&self) -> Result<(), IpcError> {
        self.call(MethodId::StartScroll, &IpcEmpty {}, None).map(drop)
    }

    pub fn on_scroll(&self, progress: f32) -> Result<(), IpcError> {
        self.call(MethodId::OnScroll, &IpcScrollUpdate { progress }, None)
            .map(drop)
    }

    pub fn end_scroll(&self) -> Result<(), IpcError> {
        self.call(MethodId::EndScroll, &IpcEmpty {}, None).map(drop)
    }

    /// Discrete attach used by protocol revisions below 3.
    pub fn window_attached(
        &self,
        params: &WindowParams,
        callback: Arc<dyn OverlayCallback>,
        client_options: i32,
    ) -> Result<(), IpcError> {
        let args = IpcLegacyAttach {
            layout_params: Some(params.into()),
            client_options,
        };
        self.call(MethodId::WindowAttached, &args, Some(callback))
            .map(drop)
    }

    /// Bundled attach used by protocol revision 3 and later.
    pub fn window_attached_bundled(
        &self,
        params: &WindowParams,
        configuration: &Configuration,
        client_options: i32,
        callback: Arc<dyn OverlayCallback>,
    ) -> Result<(), IpcError> {
        let args = IpcBundledAttach {
            bundle: Some(IpcAttachBundle {
                layout_params: Some(params.into()),
                configuration: Some(configuration.into()),
                client_options,
            }),
        };
        self.call(MethodId::WindowAttached2, &args, Some(callback))
            .map(drop)
    }

    pub fn window_detached(&self, is_reconfiguring: bool) -> Result<(), IpcError> {
        let args = IpcWindowDetached { is_reconfiguring };
        self.call(MethodId::WindowDetached, &args, None).map(drop)
    }

    pub fn open_overlay(&self, value: i32) -> Result<(), IpcError> {
        self.call(MethodId::OpenOverlay, &IpcOverlayCommand { value }, None)
            .map(drop)
    }

    pub fn close_overlay(&self, value: i32) -> Result<(), IpcError> {
        self.call(MethodId::CloseOverlay, &IpcOverlayCommand { value }, None)
            .map(drop)
    }

    pub fn pause(&self) -> Result<(), IpcError> {
        self.call(MethodId::Pause, &IpcEmpty {}, None).map(drop)
    }

    pub fn resume(&self) -> Result<(), IpcError> {
        self.call(MethodId::Resume, &IpcEmpty {}, None).map(drop)
    }

    pub fn notify_lifecycle(&self, state: i32) -> Result<(), IpcError> {
        self.call(MethodId::NotifyLifecycle, &IpcLifecycleState { state }, None)
            .map(drop)
    }

    pub fn request_secondary_capability(&self, enabled: bool) -> Result<(), IpcError> {
        let args = IpcCapabilityToggle { enabled };
        self.call(MethodId::RequestSecondaryCapability, &args, None)
            .map(drop)
    }

    pub fn is_secondary_capability_active(&self) -> Result<bool, IpcError> {
        self.query(MethodId::QuerySecondaryCapabilityActive)
    }

    pub fn query_extended_capability(&self) -> Result<bool, IpcError> {
        self.query(MethodId::QueryExtendedCapability)
    }
}

/// A decoded outbound call, as seen by the overlay provider.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCall {
    StartScroll,
    Scroll {
        progress: f32,
    },
    EndScroll,
    WindowAttached {
        params: WindowParams,
        client_options: i32,
    },
    WindowAttachedBundled {
        params: WindowParams,
        configuration: Configuration,
        client_options: i32,
    },
    WindowDetached {
        is_reconfiguring: bool,
    },
    CloseOverlay {
        value: i32,
    },
    Pause,
    Resume,
    OpenOverlay {
        value: i32,
    },
    RequestSecondaryCapability {
        enabled: bool,
    },
    QuerySecondaryCapabilityActive,
    QueryExtendedCapability,
    NotifyLifecycle {
        state: i32,
    },
}

impl OverlayCall {
    /// Decode a transaction's payload according to its method id.
    #[track_caller]
    pub fn decode(transaction: &Transaction) -> Result<Self, IpcError> {
        let bytes = transaction.payload.as_slice();

        let call = match transaction.method {
            MethodId::StartScroll => OverlayCall::StartScroll,
            MethodId::OnScroll => OverlayCall::Scroll {
                progress: IpcScrollUpdate::decode(bytes)?.progress,
            },
            MethodId::EndScroll => OverlayCall::EndScroll,
            MethodId::WindowAttached => {
                let args = IpcLegacyAttach::decode(bytes)?;
                OverlayCall::WindowAttached {
                    params: required(args.layout_params, "layout_params")?.into(),
                    client_options: args.client_options,
                }
            }
            MethodId::WindowAttached2 => {
                let bundle = required(IpcBundledAttach::decode(bytes)?.bundle, "bundle")?;
                OverlayCall::WindowAttachedBundled {
                    params: required(bundle.layout_params, "layout_params")?.into(),
                    configuration: required(bundle.configuration, "configuration")?.into(),
                    client_options: bundle.client_options,
                }
            }
            MethodId::WindowDetached => OverlayCall::WindowDetached {
                is_reconfiguring: IpcWindowDetached::decode(bytes)?.is_reconfiguring,
            },
            MethodId::CloseOverlay => OverlayCall::CloseOverlay {
                value: IpcOverlayCommand::decode(bytes)?.value,
            },
            MethodId::Pause => OverlayCall::Pause,
            MethodId::Resume => OverlayCall::Resume,
            MethodId::OpenOverlay => OverlayCall::OpenOverlay {
                value: IpcOverlayCommand::decode(bytes)?.value,
            },
            MethodId::RequestSecondaryCapability => OverlayCall::RequestSecondaryCapability {
                enabled: IpcCapabilityToggle::decode(bytes)?.enabled,
            },
            MethodId::QuerySecondaryCapabilityActive => {
                OverlayCall::QuerySecondaryCapabilityActive
            }
            MethodId::QueryExtendedCapability => OverlayCall::QueryExtendedCapability,
            MethodId::NotifyLifecycle => OverlayCall::NotifyLifecycle {
                state: IpcLifecycleState::decode(bytes)?.state,
            },
        };

        Ok(call)
    }

    pub fn method(&self) -> MethodId {
        match self {
            OverlayCall::StartScroll => MethodId::StartScroll,
            OverlayCall::Scroll { .. } => MethodId::OnScroll,
            OverlayCall::EndScroll => MethodId::EndScroll,
            OverlayCall::WindowAttached { .. } => MethodId::WindowAttached,
            OverlayCall::WindowAttachedBundled { .. } => MethodId::WindowAttached2,
            OverlayCall::WindowDetached { .. } => MethodId::WindowDetached,
            OverlayCall::CloseOverlay { .. } => MethodId::CloseOverlay,
            OverlayCall::Pause => MethodId::Pause,
            OverlayCall::Resume => MethodId::Resume,
            OverlayCall::OpenOverlay { .. } => MethodId::OpenOverlay,
            OverlayCall::RequestSecondaryCapability { .. } => {
                MethodId::RequestSecondaryCapability
            }
            OverlayCall::QuerySecondaryCapabilityActive => {
                MethodId::QuerySecondaryCapabilityActive
            }
            OverlayCall::QueryExtendedCapability => MethodId::QueryExtendedCapability,
            OverlayCall::NotifyLifecycle { .. } => MethodId::NotifyLifecycle,
        }
    }
}

/// Reply payload for the boolean query methods.
pub fn bool_reply(value: bool) -> Reply {
    Reply {
        payload: IpcBoolReply { value }.encode_to_vec(),
    }
}

#[track_caller]
fn required<T>(field: Option<T>, name: &str) -> Result<T, IpcError> {
    field.ok_or_else(|| IpcError::Transaction {
        message: format!("Missing required field: {name}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
