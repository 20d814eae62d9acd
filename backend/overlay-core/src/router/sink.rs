use crate::router::queue::{InboundMessage, MessageQueue};
use crate::wire::OverlayCallback;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::trace;

/// Callback object handed to the overlay provider.
///
/// Safe to call from any thread. After [`CallbackSink::clear`] every callback
/// is dropped on the floor.
#[derive(Debug)]
pub struct CallbackSink {
    queue: Mutex<Option<Arc<MessageQueue>>>,
    binding: u64,
    // Cleared when a positive scroll arrives; nothing reads it beyond that.
    window_hidden: AtomicBool,
}

impl CallbackSink {
    pub(crate) fn new(queue: Arc<MessageQueue>, binding: u64) -> Self {
        Self {
            queue: Mutex::new(Some(queue)),
            binding,
            window_hidden: AtomicBool::new(false),
        }
    }

    pub(crate) fn clear(&self) {
        *self.queue.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_cleared(&self) -> bool {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Binding generation every message from this sink is stamped with.
    pub fn binding(&self) -> u64 {
        self.binding
    }

    fn post(&self, message: InboundMessage, coalesce: bool) {
        let queue = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match queue {
            Some(queue) => queue.post_from(self.binding, message, coalesce),
            None => trace!("callback after clear ignored"),
        }
    }
}

impl OverlayCallback for CallbackSink {
    fn overlay_scroll_changed(&self, progress: f32) {
        self.post(InboundMessage::ScrollChanged(progress), true);
        if progress > 0.0 && self.window_hidden.load(Ordering::Acquire) {
            self.window_hidden.store(false, Ordering::Release);
        }
    }

    fn overlay_status_changed(&self, status: i32) {
        self.post(InboundMessage::StatusChanged(status), false);
    }

    fn window_shift_requested(&self, hidden: bool) {
        self.post(InboundMessage::WindowShift(hidden), false);
    }
}
