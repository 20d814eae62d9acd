use crate::event_log::EventLog;
use crate::host::OverlayHost;
use crate::router::queue::{InboundMessage, MessageQueue};
use crate::router::sink::CallbackSink;
use crate::wire::OverlayCallback;

use models::{ServiceStatus, WindowParams};

use std::rc::Rc;
use std::sync::Arc;

use log::{debug, trace};

/// The parts of the protocol client the router is allowed to touch.
pub(crate) trait RoutedClient {
    fn service_status(&self) -> ServiceStatus;

    fn deliver_scroll(&self, progress: f32);

    fn notify_status_changed(&mut self, status: i32);

    fn service_log(&mut self) -> &mut EventLog;
}

/// Owning-thread consumer of provider callbacks.
#[derive(Clone)]
pub struct CallbackRouter {
    sink: Arc<CallbackSink>,
    host: Rc<dyn OverlayHost>,
    window_shift: i32,
}

impl CallbackRouter {
    pub(crate) fn new(queue: Arc<MessageQueue>, host: Rc<dyn OverlayHost>) -> Self {
        let window_shift = host.display_size().off_screen_shift();
        Self {
            sink: Arc::new(CallbackSink::new(queue, 0)),
            host,
            window_shift,
        }
    }

    /// Retire the current sink in favor of a fresh one feeding `queue` for
    /// binding generation `binding`, and refresh the display-derived shift.
    /// Callbacks still arriving on the old sink are dropped.
    pub(crate) fn bind(&mut self, queue: Arc<MessageQueue>, binding: u64) {
        self.sink.clear();
        self.sink = Arc::new(CallbackSink::new(queue, binding));
        self.window_shift = self.host.display_size().off_screen_shift();
    }

    pub(crate) fn clear(&self) {
        self.sink.clear();
    }

    /// The object to pass to the provider with an attach call.
    pub fn callback(&self) -> Arc<dyn OverlayCallback> {
        self.sink.clone()
    }

    pub fn sink(&self) -> &Arc<CallbackSink> {
        &self.sink
    }

    pub fn window_shift(&self) -> i32 {
        self.window_shift
    }

    /// Apply one routed message. Connection messages belong to the client and
    /// are ignored here.
    pub(crate) fn handle(&self, message: InboundMessage, client: &mut impl RoutedClient) {
        trace!("handle {message:?}");
        match message {
            InboundMessage::ScrollChanged(progress) => {
                if client.service_status().is_overlay_attached() {
                    client.deliver_scroll(progress);
                    let log = client.service_log();
                    if progress <= 0.0 {
                        log.event("onScroll 0, overlay closed");
                    } else if progress >= 1.0 {
                        log.event("onScroll 1, overlay opened");
                    } else {
                        log.float("onScroll", progress);
                    }
                }
            }
            InboundMessage::StatusChanged(status) => {
                client.notify_status_changed(status);
                client.service_log().int("stateChanged", status);
            }
            InboundMessage::WindowShift(hidden) => self.shift_window(hidden),
            InboundMessage::ServiceConnected
            | InboundMessage::ServiceDisconnected
            | InboundMessage::BindFailed => debug!("{message:?} is not routed"),
        }
    }

    fn shift_window(&self, hidden: bool) {
        let Some(mut params) = self.host.window_params() else {
            debug!("Window shift requested without a window");
            return;
        };

        if hidden {
            params.x = self.window_shift;
            params.flags |= WindowParams::FLAG_LAYOUT_NO_LIMITS;
        } else {
            params.x = 0;
            params.flags &= !WindowParams::FLAG_LAYOUT_NO_LIMITS;
        }

        self.host.update_window_params(params);
    }
}
