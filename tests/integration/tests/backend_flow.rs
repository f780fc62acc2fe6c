//! End-to-end flows through a mounted signature backend.

use std::sync::Arc;

use sigvault_integration_tests::KNOWN_SIGNATURE;
use sigvault_plugin_sdk::{
    AttributeValue, Attributes, BackendRegistry, FileStorage, InmemStorage, PluginContext,
    PluginError, Request, Storage, Version,
};
use sigvault_secrets::{SecretError, SignatureBackend, BACKEND_TYPE};
use tempfile::TempDir;

fn mounted(storage: Arc<dyn Storage>) -> BackendRegistry {
    let ctx = PluginContext::new(Version::new(0, 1, 0), storage);
    let mut registry = BackendRegistry::new();
    registry
        .register_factory(BACKEND_TYPE, SignatureBackend::factory)
        .unwrap();
    registry.mount(BACKEND_TYPE, "sigv4/", &ctx).unwrap();
    registry
}

fn foobar() -> Attributes {
    Attributes::new().with("secret_access_key", "foobar")
}

#[tokio::test]
async fn test_record_lifecycle() {
    let registry = mounted(Arc::new(InmemStorage::new()));

    // absent
    assert!(registry
        .handle_request(&Request::read("sigv4/key_name/20150831/ec2/us-east-1"))
        .await
        .unwrap()
        .is_none());

    // present
    registry
        .handle_request(&Request::write("sigv4/key_name", foobar()))
        .await
        .unwrap();
    let resp = registry
        .handle_request(&Request::read("sigv4/key_name/20150831/ec2/us-east-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resp.get("signature").and_then(|v| v.as_str()), Some(KNOWN_SIGNATURE));

    // replaced
    registry
        .handle_request(&Request::write(
            "sigv4/key_name",
            Attributes::new().with("secret_access_key", "rotated"),
        ))
        .await
        .unwrap();
    let resp = registry
        .handle_request(&Request::read("sigv4/raw/key_name").privileged())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        resp.get("secret_access_key"),
        Some(&AttributeValue::String("rotated".to_string()))
    );

    // absent again
    registry
        .handle_request(&Request::delete("sigv4/key_name"))
        .await
        .unwrap();
    assert!(registry
        .handle_request(&Request::read("sigv4/raw/key_name").privileged())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_raw_requires_privilege() {
    let registry = mounted(Arc::new(InmemStorage::new()));
    registry
        .handle_request(&Request::write("sigv4/key_name", foobar()))
        .await
        .unwrap();

    let err = registry
        .handle_request(&Request::read("sigv4/raw/key_name"))
        .await
        .unwrap_err();
    assert!(matches!(err, PluginError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_backend_errors_downcast() {
    let registry = mounted(Arc::new(InmemStorage::new()));

    let err = registry
        .handle_request(&Request::write("sigv4/key_name", Attributes::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_backend::<SecretError>(),
        Some(SecretError::InvalidInput(_))
    ));

    let err = registry
        .handle_request(&Request::read("sigv4/key name"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_backend::<SecretError>(),
        Some(SecretError::InvalidPath { .. })
    ));
}

#[tokio::test]
async fn test_file_storage_survives_remount() {
    let dir = TempDir::new().unwrap();

    let registry = mounted(Arc::new(FileStorage::new(dir.path())));
    registry
        .handle_request(&Request::write("sigv4/key_name", foobar()))
        .await
        .unwrap();
    drop(registry);

    let registry = mounted(Arc::new(FileStorage::new(dir.path())));
    let resp = registry
        .handle_request(&Request::read("sigv4/key_name/20150831/ec2/us-east-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resp.get("signature").and_then(|v| v.as_str()), Some(KNOWN_SIGNATURE));
}

#[tokio::test]
async fn test_parallel_requests_on_distinct_keys() {
    let registry = Arc::new(mounted(Arc::new(InmemStorage::new())));

    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let path = format!("sigv4/key_{}", i);
            registry
                .handle_request(&Request::write(&path, foobar()))
                .await
                .unwrap();
            registry
                .handle_request(&Request::read(format!("{}/20150831/ec2/us-east-1", path)))
                .await
                .unwrap()
                .and_then(|resp| resp.get("signature").cloned())
        }));
    }

    for handle in handles {
        let sig = handle.await.unwrap().unwrap();
        assert_eq!(sig.as_str(), Some(KNOWN_SIGNATURE));
    }
}
