//! Batch lifecycle integration tests.
//!
//! These tests run the batch orchestrator over mock generators and the real
//! stroke pipeline (with mock renderer and encoder) and check the outcome
//! partition, skip behavior, and failure isolation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use strokegif_core::{
    config::{OutputConfig, RenderConfig},
    testing::{MockEncoder, MockGenerator, MockRenderer},
    BatchOrchestrator, BatchSummary, CharacterGenerator, Job, JobClaimCallback, StrokePipeline,
};

const CHARACTERS: &[&str] = &["中", "文", "字", "永", "人", "大", "天", "山", "水", "火"];

fn characters() -> Vec<String> {
    CHARACTERS.iter().map(|c| c.to_string()).collect()
}

fn assert_partition(summary: &BatchSummary, input: &[String]) {
    let mut seen: Vec<&str> = summary.characters();
    assert_eq!(seen.len(), input.len(), "every character recorded once");
    seen.sort_unstable();
    let mut expected: Vec<&str> = input.iter().map(String::as_str).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected);
}

/// Test helper wiring a mock generator into an orchestrator.
struct TestHarness {
    generator: Arc<MockGenerator>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let generator = Arc::new(MockGenerator::new(temp_dir.path().join("output")));
        Self {
            generator,
            _temp_dir: temp_dir,
        }
    }

    fn orchestrator(&self) -> BatchOrchestrator {
        BatchOrchestrator::new(self.generator.clone())
    }
}

#[tokio::test]
async fn test_outcomes_partition_input() {
    let harness = TestHarness::new();
    let input = characters();

    let summary = harness.orchestrator().run(input.clone(), 3).await;

    assert_partition(&summary, &input);
    assert_eq!(summary.successes.len(), input.len());
    assert!(!summary.has_failures());
}

#[tokio::test]
async fn test_second_run_skips_everything() {
    let harness = TestHarness::new();
    let input = characters();

    let first = harness.orchestrator().run(input.clone(), 4).await;
    assert_eq!(first.successes.len(), input.len());
    let calls_after_first = harness.generator.call_count().await;

    let second = harness.orchestrator().run(input.clone(), 4).await;

    assert_eq!(second.skips.len(), input.len());
    assert!(second.successes.is_empty());
    assert!(second.failures.is_empty());
    assert_eq!(harness.generator.call_count().await, calls_after_first);
}

#[tokio::test]
async fn test_existing_output_is_skipped_without_generating() {
    let harness = TestHarness::new();
    let existing = harness.generator.output_path("中").unwrap();
    std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
    std::fs::write(&existing, b"GIF89a").unwrap();

    let summary = harness.orchestrator().run(vec!["中".to_string()], 1).await;

    assert_eq!(summary.skips.len(), 1);
    assert_eq!(harness.generator.call_count().await, 0);
}

#[tokio::test]
async fn test_failure_is_isolated() {
    let harness = TestHarness::new();
    harness.generator.fail_on("字").await;
    let input = characters();

    let summary = harness.orchestrator().run(input.clone(), 3).await;

    assert_partition(&summary, &input);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.successes.len(), input.len() - 1);
    let (character, error) = summary.failed().next().unwrap();
    assert_eq!(character, "字");
    assert!(error.contains("mock failure"));
}

#[tokio::test]
async fn test_every_index_claimed_once_for_any_concurrency() {
    let input = characters();

    for concurrency in 1..=8 {
        let harness = TestHarness::new();
        harness.generator.set_delay(Duration::from_millis(5)).await;

        let claims = Arc::new(Mutex::new(Vec::new()));
        let log = claims.clone();
        let callback: JobClaimCallback = Arc::new(move |job: &Job| {
            log.lock().unwrap().push(job.index);
        });

        let summary = harness
            .orchestrator()
            .with_claim_callback(callback)
            .run(input.clone(), concurrency)
            .await;

        assert_partition(&summary, &input);
        assert_eq!(summary.successes.len(), input.len());

        let mut claimed = claims.lock().unwrap().clone();
        claimed.sort_unstable();
        assert_eq!(
            claimed,
            (0..input.len()).collect::<Vec<_>>(),
            "concurrency {}",
            concurrency
        );
    }
}

#[tokio::test]
async fn test_concurrency_larger_than_input() {
    let harness = TestHarness::new();
    let input = vec!["中".to_string(), "文".to_string()];

    let summary = harness.orchestrator().run(input.clone(), 16).await;

    assert_partition(&summary, &input);
    let calls: HashSet<String> = harness.generator.calls().await.into_iter().collect();
    assert_eq!(calls.len(), 2);
}

#[tokio::test]
async fn test_pipeline_batch_with_mock_backends() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = OutputConfig {
        dir: temp_dir.path().join("output"),
        temp_dir: temp_dir.path().join("temp"),
        ..Default::default()
    };
    let renderer = MockRenderer::new();
    let encoder = MockEncoder::new();
    let pipeline = StrokePipeline::new(
        RenderConfig::instant(),
        output.clone(),
        renderer.clone(),
        encoder.clone(),
    );
    let orchestrator = BatchOrchestrator::new(Arc::new(pipeline));
    let input = vec!["中".to_string(), "文".to_string(), "字".to_string()];

    let summary = orchestrator.run(input.clone(), 2).await;

    assert_partition(&summary, &input);
    assert_eq!(summary.successes.len(), 3);
    assert_eq!(renderer.closed_count().await, 3);
    assert_eq!(encoder.recorded_jobs().await.len(), 3);
    for character in &input {
        assert!(output.dir.join(format!("{}.gif", character)).exists());
        assert!(!output.temp_dir.join(character).exists());
    }
}
