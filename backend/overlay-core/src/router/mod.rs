//! Inbound callback routing.
//!
//! Provider callbacks arrive on the transport's dispatch thread. They cross
//! into the owning thread in two pieces:
//!
//! - [`CallbackSink`] - the object handed to the provider; its only job is to
//!   enqueue
//! - [`CallbackRouter`] - runs on the owning thread while the client drains
//!   its [`MessageQueue`], and is the only place inbound state is applied
//!
//! Scroll updates are coalesced (latest wins); status updates are never dropped.
//! Every message a sink posts is stamped with the binding generation the sink
//! was created for, so the owner can discard callbacks from a binding that has
//! since been released.

mod dispatch;
mod queue;
mod sink;

pub use dispatch::CallbackRouter;
pub(crate) use dispatch::RoutedClient;
pub use queue::{Delivery, InboundMessage, MessageKind, MessageQueue};
pub use sink::CallbackSink;
