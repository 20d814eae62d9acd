use crate::helpers::FakeResolver;

use overlay_core::VersionCache;
use overlay_core::service::{ServiceDescriptor, ServiceTarget, VERSION_METADATA_KEY};
use overlay_core::version::load_api_version;

use models::ProtocolVersion;

use serial_test::serial;

#[test]
fn given_provider_not_installed_when_loading_version_then_baseline() {
    let resolver = FakeResolver::default();

    let version = load_api_version(&resolver, &ServiceTarget::default(), VERSION_METADATA_KEY);

    assert_eq!(version, ProtocolVersion::BASELINE);
}

#[test]
fn given_provider_without_metadata_when_loading_version_then_baseline() {
    let resolver = FakeResolver {
        descriptor: Some(ServiceDescriptor::default()),
        ..FakeResolver::default()
    };

    let version = load_api_version(&resolver, &ServiceTarget::default(), VERSION_METADATA_KEY);

    assert_eq!(version.get(), 1);
}

#[test]
fn given_negative_metadata_when_loading_version_then_baseline() {
    let resolver = FakeResolver::advertising(VERSION_METADATA_KEY, -3);

    let version = load_api_version(&resolver, &ServiceTarget::default(), VERSION_METADATA_KEY);

    assert_eq!(version, ProtocolVersion::BASELINE);
}

#[test]
fn given_advertised_version_when_loading_then_used() {
    let resolver = FakeResolver::advertising(VERSION_METADATA_KEY, 7);

    let version = load_api_version(&resolver, &ServiceTarget::default(), VERSION_METADATA_KEY);

    assert_eq!(version.get(), 7);
}

/// **VALUE**: Verifies the version is looked up once and never re-resolved.
///
/// **WHY THIS MATTERS**: Every call site branches on the cached value. A second
/// lookup after a provider update would mix protocol shapes within one process.
///
/// **BUG THIS CATCHES**: Would catch a cache that re-queries on every client.
#[test]
fn given_resolved_cache_when_resolving_again_then_first_value_kept() {
    // GIVEN: A cache resolved against a version-5 provider
    let cache = VersionCache::new();
    let first = FakeResolver::advertising(VERSION_METADATA_KEY, 5);
    cache.resolve(&first, &ServiceTarget::default(), VERSION_METADATA_KEY);

    // WHEN: Resolving again against a newer provider
    let second = FakeResolver::advertising(VERSION_METADATA_KEY, 9);
    let version = cache.resolve(&second, &ServiceTarget::default(), VERSION_METADATA_KEY);

    // THEN: Still 5, and the second resolver was never asked
    assert_eq!(version.get(), 5);
    assert_eq!(first.lookups.get(), 1);
    assert_eq!(second.lookups.get(), 0);
}

#[test]
#[serial]
fn given_process_cache_when_resolved_then_shared_by_later_callers() {
    let resolver = FakeResolver::advertising(VERSION_METADATA_KEY, 4);

    let version = VersionCache::process().resolve(&resolver, &ServiceTarget::default(), VERSION_METADATA_KEY);

    assert_eq!(VersionCache::process().get(), Some(version));
}
