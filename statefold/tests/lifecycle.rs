use statefold::testing::{GateStep, RecordingStep};
use statefold::{Event, HistoryStep, Pipeline, PipelineError};
use std::time::Duration;

mod common;
use common::{assert_non_decreasing, averaging_pipeline, history_values};

#[tokio::test]
async fn test_drain_folds_everything_then_closes() {
    let pipeline = averaging_pipeline("drain", 10);
    let handle = pipeline.handle();

    for v in [1.0, 2.0, 3.0, 4.0] {
        handle.submit(Event::new(v)).await.unwrap();
    }

    let state = pipeline.drain().await.unwrap();
    assert_eq!(history_values(&state), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(state.display_text, "2.50");

    assert!(matches!(
        handle.submit(Event::new(5.0)).await,
        Err(PipelineError::Closed(name)) if name == "drain"
    ));
    assert!(handle.is_closed());
}

#[tokio::test]
async fn test_stop_returns_last_state_and_closes() {
    let pipeline = averaging_pipeline("stop", 10);
    let handle = pipeline.handle();

    handle.submit(Event::new(8.0)).await.unwrap();
    // Make sure the accepted event has been folded before stopping.
    handle.snapshot().await.unwrap();

    let state = pipeline.stop().await.unwrap();
    assert_eq!(history_values(&state), vec![8.0]);

    assert!(matches!(
        handle.snapshot().await,
        Err(PipelineError::Closed(_))
    ));
    assert!(matches!(handle.stats().await, Err(PipelineError::Closed(_))));
}

#[tokio::test]
async fn test_dropping_pipeline_closes_handles() {
    let pipeline = averaging_pipeline("dropped", 2);
    let handle = pipeline.handle();
    drop(pipeline);

    assert!(matches!(
        handle.submit(Event::new(1.0)).await,
        Err(PipelineError::Closed(_))
    ));
}

#[tokio::test]
async fn test_concurrent_submitters_keep_their_own_order() {
    let pipeline = Pipeline::builder("fan-in")
        .step(HistoryStep::new(1_000))
        .start();

    let mut tasks = Vec::new();
    for producer in 0..4 {
        let handle = pipeline.handle();
        tasks.push(tokio::spawn(async move {
            for i in 0..25 {
                let value = f64::from(producer * 1_000 + i);
                handle.submit(Event::new(value)).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let stats = pipeline.stats().await.unwrap();
    assert_eq!(stats.processed, 100);

    let state = pipeline.drain().await.unwrap();
    assert_eq!(state.history.len(), 100);
    for producer in 0..4 {
        let low = f64::from(producer * 1_000);
        let mine: Vec<f64> = history_values(&state)
            .into_iter()
            .filter(|v| *v >= low && *v < low + 1_000.0)
            .collect();
        assert_eq!(mine.len(), 25);
        assert_non_decreasing(&mine);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_discards_queued_events() {
    let gate = GateStep::new();
    let recorder = RecordingStep::new();
    let pipeline = Pipeline::builder("stopped")
        .step(gate.clone())
        .step(recorder.clone())
        .step(HistoryStep::new(4))
        .start();
    let handle = pipeline.handle();

    // Folding 1.0 blocks on the gate; 2.0 waits in the queue behind it.
    handle.submit(Event::new(1.0)).await.unwrap();
    let queued = tokio::spawn({
        let handle = handle.clone();
        async move { handle.submit(Event::new(2.0)).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!queued.is_finished());

    let stopping = tokio::spawn(pipeline.stop());
    tokio::time::sleep(Duration::from_millis(50)).await;
    gate.open();

    let state = stopping.await.unwrap().unwrap();
    assert_eq!(history_values(&state), vec![1.0]);
    assert!(matches!(
        queued.await.unwrap(),
        Err(PipelineError::Closed(name)) if name == "stopped"
    ));
    assert_eq!(recorder.values(), vec![1.0]);
}
