use statefold::{Config, Event, Pipeline, Registry, RegistryError, RouteError};

mod common;
use common::{averaging_pipeline, history_values};

#[tokio::test]
async fn test_routes_by_name() {
    let registry = Registry::builder()
        .register(averaging_pipeline("left", 4))
        .unwrap()
        .register(averaging_pipeline("right", 4))
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names(), vec!["left", "right"]);

    registry.route("left", Event::new(1.0)).await.unwrap();
    registry.route("right", Event::new(10.0)).await.unwrap();
    registry.route("left", Event::new(3.0)).await.unwrap();

    let states = registry.shutdown().await;
    let left = states["left"].as_ref().unwrap();
    let right = states["right"].as_ref().unwrap();
    assert_eq!(history_values(left), vec![1.0, 3.0]);
    assert_eq!(left.display_text, "2.00");
    assert_eq!(history_values(right), vec![10.0]);
    assert_eq!(right.display_text, "10.00");
}

#[tokio::test]
async fn test_unknown_name_is_reported() {
    let registry = Registry::builder()
        .register(averaging_pipeline("demo1", 2))
        .unwrap()
        .build()
        .unwrap();

    let err = registry.route("demo2", Event::new(1.0)).await.unwrap_err();
    assert!(matches!(err, RouteError::UnknownPipelineName(ref name) if name == "demo2"));
    assert_eq!(err.to_string(), "no pipeline named `demo2`");
    assert!(registry.handle("demo2").is_err());

    // The known pipeline is unaffected.
    let state = registry.get("demo1").unwrap().snapshot().await.unwrap();
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let builder = Registry::builder()
        .register(averaging_pipeline("demo1", 2))
        .unwrap();

    let duplicate = Pipeline::builder("demo1").start();
    let err = builder.register(duplicate).err().unwrap();
    assert_eq!(err, RegistryError::DuplicateName("demo1".into()));
}

#[tokio::test]
async fn test_empty_registry_is_rejected() {
    let err = Registry::builder().build().unwrap_err();
    assert_eq!(err, RegistryError::Empty);
}

#[tokio::test]
async fn test_handle_outlives_lookup() {
    let registry = Registry::builder()
        .register(averaging_pipeline("demo1", 2))
        .unwrap()
        .build()
        .unwrap();

    let handle = registry.handle("demo1").unwrap();
    let task = tokio::spawn(async move { handle.submit(Event::new(4.0)).await });
    task.await.unwrap().unwrap();

    let state = registry.get("demo1").unwrap().snapshot().await.unwrap();
    assert_eq!(history_values(&state), vec![4.0]);
}

#[tokio::test]
async fn test_default_config_starts_demo1() {
    let registry = Config::default().start_registry().unwrap();
    assert_eq!(registry.names(), vec!["demo1"]);
    assert!(registry.contains("demo1"));

    for v in [1.0, 2.0, 3.0] {
        registry.route("demo1", Event::new(v)).await.unwrap();
    }
    let states = registry.shutdown().await;
    assert_eq!(states["demo1"].as_ref().unwrap().display_text, "2.50");
}
