use crate::connection::{ConnectionMode, ServiceBinder};
use crate::router::{InboundMessage, MessageQueue};
use crate::service::ServiceTarget;
use crate::wire::OverlayHandle;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Weak};

use log::{debug, info, warn};

#[derive(Default)]
struct ConnectionState {
    bound: bool,
    overlay: Option<OverlayHandle>,
    registrant: Option<Weak<MessageQueue>>,
    stop_requested: bool,
    retired: bool,
    // Bumped by every unbind that releases a binding.
    binding: u64,
}

/// Owns the binding to the overlay provider.
///
/// Lives on the owning thread. Connection results are posted to the
/// registered client's inbox, never applied to the client directly.
pub struct ConnectionManager {
    binder: Rc<dyn ServiceBinder>,
    target: ServiceTarget,
    mode: ConnectionMode,
    state: RefCell<ConnectionState>,
}

impl ConnectionManager {
    pub fn new(binder: Rc<dyn ServiceBinder>, target: ServiceTarget, mode: ConnectionMode) -> Self {
        Self {
            binder,
            target,
            mode,
            state: RefCell::new(ConnectionState::default()),
        }
    }

    pub fn target(&self) -> &ServiceTarget {
        &self.target
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn is_bound(&self) -> bool {
        self.state.borrow().bound
    }

    /// A retired shared manager is never handed out again.
    pub fn is_retired(&self) -> bool {
        self.state.borrow().retired
    }

    /// Generation of the current binding. Callbacks stamped with an older
    /// generation belong to a binding that has been released.
    pub fn binding(&self) -> u64 {
        self.state.borrow().binding
    }

    pub fn overlay(&self) -> Option<OverlayHandle> {
        self.state.borrow().overlay.clone()
    }

    /// Bind if not already bound. Returns whether a bind is in place or in flight.
    pub fn reconnect(&self) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.bound {
                return true;
            }
            state.bound = true;
        }

        let flags = self.mode.bind_flags();
        let bound = match self.binder.bind_service(&self.target, flags) {
            Ok(bound) => bound,
            Err(e) => {
                warn!("Unable to connect to overlay service: {e}");
                false
            }
        };

        if !bound {
            let mut state = self.state.borrow_mut();
            state.bound = false;
            state.overlay = None;
        }
        debug!(
            "reconnect {} (flags {:#x}): {bound}",
            self.target.component(),
            flags.bits()
        );
        bound
    }

    /// Release the binding. Idempotent; connection results that arrive
    /// afterwards are ignored.
    pub fn unbind(&self) {
        let was_bound = {
            let mut state = self.state.borrow_mut();
            let was_bound = state.bound;
            state.bound = false;
            state.overlay = None;
            if was_bound {
                state.binding += 1;
            }
            was_bound
        };

        if was_bound {
            self.binder.unbind_service(&self.target);
            debug!("unbound from {}", self.target.component());
        }
    }

    /// Record the caller's preference; unbinds at once when stopping with no
    /// live provider handle.
    pub fn stop_service(&self, stop: bool) {
        self.state.borrow_mut().stop_requested = stop;
        self.reset_service();
    }

    /// Make `inbox` the single registrant. Shared connections replay a
    /// pending connection to the newcomer.
    pub fn register(&self, inbox: &Arc<MessageQueue>) {
        let replay = {
            let mut state = self.state.borrow_mut();
            state.registrant = Some(Arc::downgrade(inbox));
            self.mode == ConnectionMode::Shared && state.overlay.is_some()
        };

        if replay {
            inbox.post(InboundMessage::ServiceConnected);
        }
    }

    /// Drop the registration only when `inbox` is still the current
    /// registrant; a stale client can never unbind its successor.
    pub fn unregister(&self, inbox: &Arc<MessageQueue>, also_unbind: bool) {
        if !self.is_registered(inbox) {
            debug!("unregister from a stale client ignored");
            return;
        }

        self.state.borrow_mut().registrant = None;
        if also_unbind {
            self.unbind();
            if self.mode == ConnectionMode::Shared {
                self.state.borrow_mut().retired = true;
            }
        }
    }

    pub fn is_registered(&self, inbox: &Arc<MessageQueue>) -> bool {
        self.registrant()
            .is_some_and(|current| Arc::ptr_eq(&current, inbox))
    }

    pub fn on_service_connected(&self, overlay: OverlayHandle) {
        let registrant = {
            let mut state = self.state.borrow_mut();
            if !state.bound {
                debug!("connection after unbind ignored");
                return;
            }
            state.overlay = Some(overlay);
            state.registrant.as_ref().and_then(Weak::upgrade)
        };

        info!("Connected to {}", self.target.component());
        if let Some(inbox) = registrant {
            inbox.post(InboundMessage::ServiceConnected);
        }
    }

    pub fn on_service_disconnected(&self) {
        let registrant = {
            let mut state = self.state.borrow_mut();
            if !state.bound {
                return;
            }
            state.overlay = None;
            state.registrant.as_ref().and_then(Weak::upgrade)
        };

        info!("Disconnected from {}", self.target.component());
        if let Some(inbox) = registrant {
            inbox.post(InboundMessage::ServiceDisconnected);
        }
        self.reset_service();
    }

    fn registrant(&self) -> Option<Arc<MessageQueue>> {
        self.state
            .borrow()
            .registrant
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn reset_service(&self) {
        let should_unbind = {
            let state = self.state.borrow();
            state.stop_requested && state.overlay.is_none()
        };
        if should_unbind {
            self.unbind();
        }
    }
}
