use crate::host::{DemoBinder, DemoResolver};

use overlay_core::connection::{ConnectionMode, ServiceBinder};
use overlay_core::error::bind::BindError;
use overlay_core::service::{ServiceTarget, VERSION_METADATA_KEY};
use overlay_core::version::load_api_version;

#[test]
fn given_uninstalled_provider_when_binding_then_not_installed_error() {
    let binder = DemoBinder::new(false);

    let result = binder.bind_service(&ServiceTarget::default(), ConnectionMode::Shared.bind_flags());

    assert!(matches!(result, Err(BindError::NotInstalled { .. })));
    assert!(!binder.take_pending());
}

#[test]
fn given_bind_when_taken_then_pending_only_once() {
    let binder = DemoBinder::new(true);

    binder
        .bind_service(&ServiceTarget::default(), ConnectionMode::PerClient.bind_flags())
        .unwrap();

    assert!(binder.take_pending());
    assert!(!binder.take_pending());
}

#[test]
fn given_demo_resolvers_when_versions_loaded_then_advertised_or_baseline() {
    let installed = DemoResolver::installed(VERSION_METADATA_KEY, 7);
    let missing = DemoResolver::missing();
    let target = ServiceTarget::default();

    assert_eq!(load_api_version(&installed, &target, VERSION_METADATA_KEY).get(), 7);
    assert_eq!(load_api_version(&missing, &target, VERSION_METADATA_KEY).get(), 1);
}
