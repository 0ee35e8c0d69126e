use statefold::testing::RecordingStep;
use statefold::{
    AverageStep, Config, Event, HistoryStep, IngestReport, Ingestor, LineError, Pipeline, Registry,
    RouteError,
};

mod common;
use common::history_values;

fn recorded_registry(recorder: &RecordingStep) -> Registry {
    Registry::builder()
        .register(
            Pipeline::builder("demo1")
                .step(recorder.clone())
                .step(HistoryStep::new(2))
                .step(AverageStep)
                .start(),
        )
        .unwrap()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_malformed_line_is_skipped() {
    let recorder = RecordingStep::new();
    let registry = recorded_registry(&recorder);

    let report = Ingestor::new(&registry, "demo1")
        .run(&b"abc\n3.5\n"[..])
        .await
        .unwrap();

    assert_eq!(
        report,
        IngestReport {
            accepted: 1,
            rejected: 1,
            unrouted: 0,
        }
    );

    let states = registry.shutdown().await;
    let state = states["demo1"].as_ref().unwrap();
    assert_eq!(recorder.values(), vec![3.5]);
    assert_eq!(history_values(state), vec![3.5]);
    assert_eq!(state.display_text, "3.50");
    assert_eq!(state.history[0].annotation("val"), Some("3.5"));
}

#[tokio::test]
async fn test_malformed_line_changes_nothing() {
    let recorder = RecordingStep::new();
    let registry = recorded_registry(&recorder);
    let ingestor = Ingestor::new(&registry, "demo1");

    let err = ingestor.ingest_line("abc\n").await.unwrap_err();
    assert!(matches!(err, LineError::Parse(_)));

    let state = registry.get("demo1").unwrap().snapshot().await.unwrap();
    assert_eq!(state, statefold::State::default());
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_last_line_without_newline() {
    let recorder = RecordingStep::new();
    let registry = recorded_registry(&recorder);

    let report = Ingestor::new(&registry, "demo1")
        .run(&b"1\r\n2\n4"[..])
        .await
        .unwrap();
    assert_eq!(report.accepted, 3);

    registry.shutdown().await;
    assert_eq!(recorder.values(), vec![1.0, 2.0, 4.0]);
}

#[tokio::test]
async fn test_unknown_route_counts_unrouted() {
    let recorder = RecordingStep::new();
    let registry = recorded_registry(&recorder);
    let ingestor = Ingestor::new(&registry, "demo2");

    let report = ingestor.run(&b"1\nx\n2\n"[..]).await.unwrap();
    assert_eq!(
        report,
        IngestReport {
            accepted: 0,
            rejected: 1,
            unrouted: 2,
        }
    );

    let err = ingestor.ingest_line("5").await.unwrap_err();
    assert!(matches!(
        err,
        LineError::Route(RouteError::UnknownPipelineName(_))
    ));
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_default_wiring_end_to_end() {
    let config = Config::default();
    let registry = config.start_registry().unwrap();

    let report = Ingestor::new(&registry, config.route.as_str())
        .run(&b"1.0\n2.0\nnot a number\n3.0\n"[..])
        .await
        .unwrap();
    assert_eq!(report.accepted, 3);
    assert_eq!(report.rejected, 1);

    let handle = registry.handle("demo1").unwrap();
    let state = handle.snapshot().await.unwrap();
    assert_eq!(history_values(&state), vec![2.0, 3.0]);
    assert_eq!(state.display_text, "2.50");

    // Values routed directly and through the ingestor share one state.
    registry.route("demo1", Event::new(5.0)).await.unwrap();
    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.display_text, "4.00");
}

#[tokio::test]
async fn test_invalid_utf8_line_is_skipped() {
    let recorder = RecordingStep::new();
    let registry = recorded_registry(&recorder);

    let report = Ingestor::new(&registry, "demo1")
        .run(&b"1.0\n\xff\xfe\n3.5\n"[..])
        .await
        .unwrap();
    assert_eq!(
        report,
        IngestReport {
            accepted: 2,
            rejected: 1,
            unrouted: 0,
        }
    );

    let states = registry.shutdown().await;
    assert_eq!(recorder.values(), vec![1.0, 3.5]);
    assert_eq!(history_values(states["demo1"].as_ref().unwrap()), vec![1.0, 3.5]);
}
