use crate::connection::{ConnectionManager, ConnectionMode, ServiceBinder};
use crate::service::ServiceTarget;

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

/// Holds the one shared connection of a host process.
///
/// Owned by whoever creates clients and passed to them; there is no global
/// instance.
#[derive(Default)]
pub struct SharedConnectionRegistry {
    current: RefCell<Option<Rc<ConnectionManager>>>,
}

impl SharedConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live shared manager, or a fresh one when none exists or the last
    /// one was retired by a final unbind.
    pub fn obtain(&self, binder: Rc<dyn ServiceBinder>, target: ServiceTarget) -> Rc<ConnectionManager> {
        let mut current = self.current.borrow_mut();
        if let Some(manager) = current.as_ref().filter(|m| !m.is_retired()) {
            return Rc::clone(manager);
        }

        debug!("Creating shared connection to {}", target.component());
        let manager = Rc::new(ConnectionManager::new(binder, target, ConnectionMode::Shared));
        *current = Some(Rc::clone(&manager));
        manager
    }

    pub fn current(&self) -> Option<Rc<ConnectionManager>> {
        self.current
            .borrow()
            .as_ref()
            .filter(|m| !m.is_retired())
            .cloned()
    }
}
