use crate::client::ProtocolClient;
use crate::connection::ConnectionManager;
use crate::error::protocol::ProtocolError;
use crate::event_log::EventLog;
use crate::host::{OverlayClientCallbacks, OverlayHost};
use crate::router::MessageQueue;
use crate::wire::MethodTable;

use common::ErrorLocation;
use models::{ClientOptions, ClientState, ProtocolVersion, ServiceStatus};

use std::panic::Location;
use std::rc::Rc;
use std::sync::Arc;

const CLIENT_LOG_TAG: &str = "Client";
const SERVICE_LOG_TAG: &str = "Service";
const DEFAULT_CLIENT_LOG_CAPACITY: usize = 20;
const DEFAULT_SERVICE_LOG_CAPACITY: usize = 10;

pub struct ProtocolClientBuilder {
    host: Option<Rc<dyn OverlayHost>>,
    callbacks: Option<Rc<dyn OverlayClientCallbacks>>,
    connection: Option<Rc<ConnectionManager>>,
    version: ProtocolVersion,
    options: ClientOptions,
    client_log_capacity: usize,
    service_log_capacity: usize,
}

impl Default for ProtocolClientBuilder {
    fn default() -> Self {
        Self {
            host: None,
            callbacks: None,
            connection: None,
            version: ProtocolVersion::BASELINE,
            options: ClientOptions::default(),
            client_log_capacity: DEFAULT_CLIENT_LOG_CAPACITY,
            service_log_capacity: DEFAULT_SERVICE_LOG_CAPACITY,
        }
    }
}

impl ProtocolClientBuilder {
    pub fn with_host(mut self, host: Rc<dyn OverlayHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_callbacks(mut self, callbacks: Rc<dyn OverlayClientCallbacks>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn with_connection(mut self, connection: Rc<ConnectionManager>) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Negotiated provider version, normally from [`crate::version::VersionCache`].
    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_log_capacities(mut self, client: usize, service: usize) -> Self {
        self.client_log_capacity = client;
        self.service_log_capacity = service;
        self
    }

    /// Create the client: register with the connection, start listening for
    /// provider reinstalls, bind, and attach to the host window if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidArgument`] when a required component is missing.
    #[track_caller]
    pub fn build(self) -> Result<ProtocolClient, ProtocolError> {
        let host = self.host.ok_or_else(|| missing("Overlay host"))?;
        let callbacks = self.callbacks.ok_or_else(|| missing("Client callbacks"))?;
        let connection = self.connection.ok_or_else(|| missing("Connection manager"))?;

        let mut client = ProtocolClient {
            host,
            callbacks,
            connection,
            version: self.version,
            methods: MethodTable::for_version(self.version),
            inbox: Arc::new(MessageQueue::new()),
            router: None,
            client_log: EventLog::new(CLIENT_LOG_TAG, self.client_log_capacity),
            service_log: EventLog::new(SERVICE_LOG_TAG, self.service_log_capacity),
            state: ClientState::default(),
            service_status: ServiceStatus::default(),
            options: self.options,
            window: None,
            service_connected: false,
            overlay_released: false,
            destroyed: false,
        };

        client.connection.register(&client.inbox);
        client
            .host
            .register_package_listener(&client.connection.target().package);
        client.reconnect();

        if let Some(params) = client.host.window_params() {
            client.on_window_attached(params);
        }

        Ok(client)
    }
}

#[track_caller]
fn missing(what: &str) -> ProtocolError {
    ProtocolError::InvalidArgument {
        message: format!("{what} is required"),
        location: ErrorLocation::from(Location::caller()),
    }
}
