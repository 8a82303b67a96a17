//! Integration tests for the service registry core contract

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use storefront_domain::{Error, ServiceEvent};
use storefront_registry::{ServiceCatalog, ServiceRegistry};
use tokio::sync::Notify;

#[derive(Debug, PartialEq)]
struct Pricing {
    rate: f64,
}

/// Catalog with one gated, invocation-counting "pricing" loader
fn gated_pricing_catalog(
    count: Arc<AtomicUsize>,
    gate: Arc<Notify>,
) -> ServiceCatalog<Arc<Pricing>> {
    ServiceCatalog::builder()
        .register_fn("pricing", "Pricing rules service", move || {
            let count = Arc::clone(&count);
            let gate = Arc::clone(&gate);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok(Arc::new(Pricing { rate: 1.2 }))
            }
        })
        .unwrap()
        .build()
}

/// Catalog with an always-failing "catalog" loader
fn failing_catalog(count: Arc<AtomicUsize>) -> ServiceCatalog<Arc<Pricing>> {
    ServiceCatalog::builder()
        .register_fn("catalog", "Product catalog service", move || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err::<Arc<Pricing>, _>("network down".into())
            }
        })
        .unwrap()
        .build()
}

#[tokio::test]
async fn test_second_sequential_call_returns_identical_instance() {
    let count = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());
    gate.notify_one();
    let registry = ServiceRegistry::new(gated_pricing_catalog(Arc::clone(&count), gate.clone()));

    let first = registry.get_or_load("pricing").await.unwrap();
    let second = registry.get_or_load("pricing").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_overlapping_requests_invoke_loader_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());
    let registry = ServiceRegistry::new(gated_pricing_catalog(Arc::clone(&count), gate.clone()));

    let (a, b) = tokio::join!(registry.get_or_load("pricing"), async {
        gate.notify_one();
        registry.get_or_load("pricing").await
    });

    let a = a.unwrap();
    let b = b.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_three_concurrent_callers_one_execution() {
    // Loader Table = { "pricing": loaderA } where loaderA resolves to
    // {rate: 1.2} after a delay; three concurrent calls share one run.
    let count = Arc::new(AtomicUsize::new(0));
    let catalog = {
        let count = Arc::clone(&count);
        ServiceCatalog::builder()
            .register_fn("pricing", "Pricing rules service", move || {
                let count = Arc::clone(&count);
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(Arc::new(Pricing { rate: 1.2 }))
                }
            })
            .unwrap()
            .build()
    };
    let registry = ServiceRegistry::new(catalog);

    let (a, b, c) = tokio::join!(
        registry.get_or_load("pricing"),
        registry.get_or_load("pricing"),
        registry.get_or_load("pricing"),
    );

    for service in [a.unwrap(), b.unwrap(), c.unwrap()] {
        assert_eq!(*service, Pricing { rate: 1.2 });
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_has_is_false_while_pending_and_true_after_resolution() {
    let count = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());
    let registry = ServiceRegistry::new(gated_pricing_catalog(Arc::clone(&count), gate.clone()));

    assert!(!registry.has("pricing"));

    let caller = tokio::spawn({
        let registry = registry.clone();
        async move { registry.get_or_load("pricing").await }
    });
    while count.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    assert!(!registry.has("pricing"));

    gate.notify_one();
    caller.await.unwrap().unwrap();
    assert!(registry.has("pricing"));
}

#[tokio::test]
async fn test_unknown_service_never_invokes_any_loader() {
    let count = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());
    let registry = ServiceRegistry::new(gated_pricing_catalog(Arc::clone(&count), gate));

    let err = registry.get_or_load("employees").await.unwrap_err();
    assert!(matches!(err, Error::UnknownService { ref service } if service == "employees"));
    assert_eq!(count.load(Ordering::SeqCst), 0);

    // Not a transient condition: a second request fails the same way.
    let err = registry.get_or_load("employees").await.unwrap_err();
    assert!(matches!(err, Error::UnknownService { .. }));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failing_loader_propagates_and_allows_retry() {
    // Loader Table = { "catalog": loaderB } where loaderB always rejects
    // with "network down".
    let count = Arc::new(AtomicUsize::new(0));
    let registry = ServiceRegistry::new(failing_catalog(Arc::clone(&count)));

    let err = registry.get_or_load("catalog").await.unwrap_err();
    assert!(err.to_string().contains("network down"));
    assert!(!registry.has("catalog"));
    assert_eq!(
        registry.last_error("catalog").map(|f| f.message),
        Some("network down".to_string())
    );

    let err = registry.get_or_load("catalog").await.unwrap_err();
    assert!(err.to_string().contains("network down"));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_retry_after_failure_can_succeed() {
    let count = Arc::new(AtomicUsize::new(0));
    let fail_first = Arc::new(AtomicBool::new(true));
    let catalog = {
        let count = Arc::clone(&count);
        let fail_first = Arc::clone(&fail_first);
        ServiceCatalog::builder()
            .register_fn("pricing", "Pricing rules service", move || {
                let count = Arc::clone(&count);
                let fail_first = Arc::clone(&fail_first);
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    if fail_first.swap(false, Ordering::SeqCst) {
                        Err("warming up".into())
                    } else {
                        Ok(Arc::new(Pricing { rate: 1.2 }))
                    }
                }
            })
            .unwrap()
            .build()
    };
    let registry = ServiceRegistry::new(catalog);

    assert!(registry.get_or_load("pricing").await.is_err());
    assert!(!registry.has("pricing"));

    let service = registry.get_or_load("pricing").await.unwrap();
    assert_eq!(service.rate, 1.2);
    assert!(registry.has("pricing"));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_failure() {
    let count = Arc::new(AtomicUsize::new(0));
    let registry = ServiceRegistry::new(failing_catalog(Arc::clone(&count)));

    let (a, b) = tokio::join!(
        registry.get_or_load("catalog"),
        registry.get_or_load("catalog"),
    );

    assert!(a.unwrap_err().to_string().contains("network down"));
    assert!(b.unwrap_err().to_string().contains("network down"));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_lifecycle_events_for_success_and_failure() {
    let count = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());
    gate.notify_one();
    let registry = ServiceRegistry::new(gated_pricing_catalog(Arc::clone(&count), gate));
    let mut events = registry.subscribe_events();

    registry.get_or_load("pricing").await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        ServiceEvent::LoadStarted {
            service: "pricing".to_string()
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        ServiceEvent::Resolved {
            service: "pricing".to_string()
        }
    );

    let failing = ServiceRegistry::new(failing_catalog(Arc::new(AtomicUsize::new(0))));
    let mut events = failing.subscribe_events();
    failing.get_or_load("catalog").await.unwrap_err();
    assert_eq!(
        events.recv().await.unwrap(),
        ServiceEvent::LoadStarted {
            service: "catalog".to_string()
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        ServiceEvent::LoadFailed {
            service: "catalog".to_string(),
            message: "network down".to_string()
        }
    );
}

#[tokio::test]
async fn test_reset_discards_inflight_outcome() {
    let count = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());
    let registry = ServiceRegistry::new(gated_pricing_catalog(Arc::clone(&count), gate.clone()));

    let caller = tokio::spawn({
        let registry = registry.clone();
        async move { registry.get_or_load("pricing").await }
    });
    while count.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    registry.reset();
    gate.notify_one();

    // The attached caller still receives its outcome, but the registry
    // no longer caches it.
    assert!(caller.await.unwrap().is_ok());
    assert!(!registry.has("pricing"));
    assert!(registry.peek("pricing").is_none());

    gate.notify_one();
    registry.get_or_load("pricing").await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
