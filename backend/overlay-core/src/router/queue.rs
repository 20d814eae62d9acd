use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

/// Work delivered to the owning thread.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    ScrollChanged(f32),
    StatusChanged(i32),
    WindowShift(bool),
    ServiceConnected,
    ServiceDisconnected,
    BindFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Scroll,
    Status,
    WindowShift,
    Connection,
}

impl InboundMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            InboundMessage::ScrollChanged(_) => MessageKind::Scroll,
            InboundMessage::StatusChanged(_) => MessageKind::Status,
            InboundMessage::WindowShift(_) => MessageKind::WindowShift,
            InboundMessage::ServiceConnected
            | InboundMessage::ServiceDisconnected
            | InboundMessage::BindFailed => MessageKind::Connection,
        }
    }
}

/// A queued message and the binding generation of the sink that posted it.
///
/// Messages posted by the connection manager or directly by the host carry
/// no generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub message: InboundMessage,
    pub binding: Option<u64>,
}

/// Ordered, unbounded queue drained by the owning thread.
///
/// Any thread may post. Only the owner pops.
#[derive(Debug, Default)]
pub struct MessageQueue {
    pending: Mutex<VecDeque<Delivery>>,
    notify: Notify,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Delivery>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, delivery: Delivery, coalesce: bool) {
        {
            let mut pending = self.lock();
            if coalesce {
                let kind = delivery.message.kind();
                pending.retain(|queued| queued.message.kind() != kind);
            }
            pending.push_back(delivery);
        }
        self.notify.notify_one();
    }

    pub fn post(&self, message: InboundMessage) {
        self.push(
            Delivery {
                message,
                binding: None,
            },
            false,
        );
    }

    /// Replace any pending message of the same kind, then enqueue at the back.
    pub fn post_coalesced(&self, message: InboundMessage) {
        self.push(
            Delivery {
                message,
                binding: None,
            },
            true,
        );
    }

    /// Post on behalf of a callback sink created for binding generation `binding`.
    pub fn post_from(&self, binding: u64, message: InboundMessage, coalesce: bool) {
        self.push(
            Delivery {
                message,
                binding: Some(binding),
            },
            coalesce,
        );
    }

    pub fn pop(&self) -> Option<InboundMessage> {
        self.pop_delivery().map(|delivery| delivery.message)
    }

    pub fn pop_delivery(&self) -> Option<Delivery> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Resolve once at least one message is pending.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if !self.is_empty() {
                return;
            }
            notified.await;
        }
    }
}
