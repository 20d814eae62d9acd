//! Versioned RPC surface between the host and the overlay provider.
//!
//! - [`method`] - stable numeric method ids shared by every protocol revision
//! - [`capability`] - which method serves a capability at a given revision
//! - [`codec`] - marshaling of arguments and replies
//!
//! The codec never branches on the negotiated version. Callers ask the
//! [`MethodTable`] which method to use and then invoke it.

pub mod capability;
pub mod codec;
pub mod method;

pub use capability::{Capability, MethodTable};
pub use codec::{OverlayCall, OverlayProxy, bool_reply};
pub use method::MethodId;

use crate::error::ipc::IpcError;

use std::fmt;
use std::sync::Arc;

/// Live reference to a bound overlay provider.
pub type OverlayHandle = Arc<dyn OverlayTransport>;

/// The binary channel to the remote process.
///
/// Implementations may block briefly while dispatching. One-way calls return
/// an empty [`Reply`].
pub trait OverlayTransport: Send + Sync {
    fn transact(&self, transaction: Transaction) -> Result<Reply, IpcError>;
}

/// Callback surface the overlay provider invokes, from any thread.
pub trait OverlayCallback: Send + Sync {
    fn overlay_scroll_changed(&self, progress: f32);

    fn overlay_status_changed(&self, status: i32);

    /// Ask the host to move its window off-screen (`true`) or back (`false`).
    fn window_shift_requested(&self, hidden: bool);
}

/// One outbound call: method id, encoded arguments, and an optional callback
/// object passed by reference alongside the payload.
pub struct Transaction {
    pub method: MethodId,
    pub payload: Vec<u8>,
    pub callback: Option<Arc<dyn OverlayCallback>>,
    pub oneway: bool,
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("method", &self.method)
            .field("payload_len", &self.payload.len())
            .field("has_callback", &self.callback.is_some())
            .field("oneway", &self.oneway)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub payload: Vec<u8>,
}
