use overlay_host::error::HostError;
use overlay_host::host::{DemoBinder, DemoHost, DemoResolver, LoggingCallbacks};
use overlay_host::logger::initialize as LoggerInitialize;
use overlay_host::provider::LoopbackProvider;
use overlay_host::session::{self, SessionParts};

use overlay_core::{OverlayConfig, ProtocolClient, SharedConnectionRegistry, VersionCache};

use common::ErrorLocation;
use models::{DisplaySize, ProtocolVersion};

use std::fs::create_dir_all;
use std::panic::Location;
use std::rc::Rc;

use log::info;

const APP_DIR_NAME: &str = "overlay-host";

/// Revision the loopback provider advertises.
const LOOPBACK_PROVIDER_VERSION: u32 = 7;

#[tokio::main]
async fn main() -> Result<(), HostError> {
    let app_dir = dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| HostError::Host {
            message: "No config directory on this platform".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    create_dir_all(&app_dir).map_err(|e| HostError::Host {
        message: format!("Failed to create {}: {e}", app_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&app_dir)?;

    info!("Overlay host starting");
    info!("App directory: {}", app_dir.display());

    let config = OverlayConfig::load(&app_dir).map_err(|e| HostError::Config {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;
    let target = config.service_target();
    let metadata_key = config.service.version_metadata_key.as_str();

    let resolver = DemoResolver::installed(metadata_key, LOOPBACK_PROVIDER_VERSION);
    let version: ProtocolVersion = VersionCache::process().resolve(&resolver, &target, metadata_key);

    let provider = LoopbackProvider::spawn();
    let binder = Rc::new(DemoBinder::new(true));
    let registry = SharedConnectionRegistry::new();
    let connection = registry.obtain(binder.clone(), target);
    let host = Rc::new(DemoHost::new(DisplaySize::new(1080, 2340)));
    let callbacks = Rc::new(LoggingCallbacks::default());

    let mut client = ProtocolClient::builder()
        .with_host(host.clone())
        .with_callbacks(callbacks.clone())
        .with_connection(connection.clone())
        .with_version(version)
        .with_options(config.client_options())
        .with_log_capacities(
            config.event_log.client_capacity,
            config.event_log.service_capacity,
        )
        .build()
        .map_err(|e| HostError::Core {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let parts = SessionParts {
        binder: &binder,
        connection: &connection,
        host: &host,
        callbacks: &callbacks,
        provider: &provider,
    };
    let outcome = session::run(&mut client, &parts).await;

    println!("{}", client.dump(""));
    client.destroy();
    provider.shutdown().await;

    outcome
}
