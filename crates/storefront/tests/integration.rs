//! End-to-end test across the facade: config → registry → hooks

use std::sync::Arc;
use std::time::Duration;

use storefront::{AppConfig, ServiceCatalog, ServiceRegistry};

#[derive(Debug)]
struct Inventory {
    skus: Vec<String>,
}

fn catalog() -> ServiceCatalog<Arc<Inventory>> {
    ServiceCatalog::builder()
        .register_fn("inventory", "Product inventory service", || async {
            Ok(Arc::new(Inventory {
                skus: vec!["apron".to_string(), "till-roll".to_string()],
            }))
        })
        .unwrap()
        .build()
}

#[tokio::test(start_paused = true)]
async fn test_full_stack_load_and_observe() {
    let config = AppConfig::default();
    let registry: ServiceRegistry<Arc<Inventory>> =
        storefront::build_registry(catalog(), &config);

    let mut ready = registry.watch_ready_with_interval("inventory", Duration::from_millis(10));
    assert!(!ready.is_ready());

    let mut watch = registry.observe("inventory").unwrap();
    let state = watch.settled().await;
    assert_eq!(state.service.unwrap().skus.len(), 2);

    assert!(ready.ready().await);
    assert!(registry.has("inventory"));
    assert_eq!(registry.loaded(), vec!["inventory".to_string()]);
}
