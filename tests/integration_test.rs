// Integration tests for vecmatch
use serde_json::json;
use std::io::Write;
use vecmatch::matcher::{filter_by_threshold, match_batch, score_batch};
use vecmatch::prelude::*;

fn alice_bob() -> ReferenceCatalog {
    ReferenceCatalog::from_value(&json!({
        "alice": {"f1": [1, 0]},
        "bob": {"f1": [0, 1]}
    }))
    .unwrap()
}

#[test]
fn test_best_match_per_input() {
    let inputs = InputBatch::from_value(&json!([[1, 0], [0, 1]])).unwrap();
    let results = match_batch(&inputs, &alice_bob(), 0.5, MatchPolicy::Best).unwrap();

    assert_eq!(
        serde_json::to_value(&results).unwrap(),
        json!([{"alice": {"f1": 1.0}}, {"bob": {"f1": 1.0}}])
    );
}

#[test]
fn test_diagonal_below_high_threshold() {
    let inputs = InputBatch::from_value(&json!([[1, 1]])).unwrap();
    let err = match_batch(&inputs, &alice_bob(), 0.99, MatchPolicy::Best).unwrap_err();
    assert!(matches!(err, Error::NoResultsAboveThreshold { .. }));
    assert!(err.to_string().contains("lower threshold"));
}

#[test]
fn test_zero_reference_vector() {
    let catalog = ReferenceCatalog::from_value(&json!({"alice": {"f1": [0, 0]}})).unwrap();
    let inputs = InputBatch::from_value(&json!([[0.3, -2.0], [1, 1]])).unwrap();
    let err = match_batch(&inputs, &catalog, 0.0, MatchPolicy::All).unwrap_err();
    assert!(matches!(err, Error::DegenerateVector { .. }));
}

#[test]
fn test_zero_input_vector() {
    let inputs = InputBatch::from_value(&json!([[1, 0], [0, 0]])).unwrap();
    let err = match_batch(&inputs, &alice_bob(), 0.0, MatchPolicy::Best).unwrap_err();
    match err {
        Error::DegenerateVector { input, .. } => assert_eq!(input, 1),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_policies_on_larger_catalog() {
    let mut catalog = ReferenceCatalog::new();
    for owner in 0..5 {
        for file in 0..4 {
            let v = vec![owner as f32 + 1.0, file as f32, 1.0];
            catalog.insert(format!("owner{owner}"), format!("file{file}.jpg"), Vector::new(v));
        }
    }
    let inputs = InputBatch::from_value(&json!([[1, 0, 1], [5, 3, 1], [0, 1, 0]])).unwrap();

    let best = score_batch(&inputs, &catalog, MatchPolicy::Best).unwrap();
    let all = score_batch(&inputs, &catalog, MatchPolicy::All).unwrap();
    assert_eq!(best.len(), 3);
    assert_eq!(all.len(), 3);

    for (best, all) in best.iter().zip(&all) {
        assert_eq!(best.values().map(|f| f.len()).sum::<usize>(), 1);
        assert_eq!(all.values().map(|f| f.len()).sum::<usize>(), 20);

        // The best pick is the maximum of the full result
        let (owner, files) = best.iter().next().unwrap();
        let (file, score) = files.iter().next().unwrap();
        let max = all
            .values()
            .flat_map(|f| f.values())
            .cloned()
            .fold(f32::MIN, f32::max);
        assert_eq!(*score, max);
        assert_eq!(all[owner][file], max);
    }

    let once = filter_by_threshold(all, 0.9);
    assert_eq!(filter_by_threshold(once.clone(), 0.9), once);
}

#[tokio::test]
async fn test_pipeline_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"alice": {{"f1": [1, 0]}}, "bob": {{"f1": [0, 1]}}}}"#).unwrap();

    let defaults = MatchConfig {
        file: file.path().to_string_lossy().into_owned(),
        threshold: 0.5,
        ..Default::default()
    };
    let pipeline = Pipeline::new(defaults, CatalogLoader::default()).unwrap();

    let request: MatchRequest = serde_json::from_value(json!({"payload": [[0, 2]]})).unwrap();
    let output = pipeline.invoke(&request).await.unwrap();

    assert_eq!(
        serde_json::to_value(&output).unwrap()["payload"],
        json!([{"bob": {"f1": 1.0}}])
    );
    assert_eq!(output.config.file_type, SourceKind::Path);
    assert_eq!(output.config.threshold, 0.5);
}

#[tokio::test]
async fn test_pipeline_flow_variable_missing() {
    let defaults = MatchConfig {
        file_type: SourceKind::Flow,
        file: "faces".to_string(),
        ..Default::default()
    };
    let pipeline = Pipeline::new(defaults, CatalogLoader::default()).unwrap();

    let request: MatchRequest = serde_json::from_value(json!({"payload": [[1, 0]]})).unwrap();
    let err = pipeline.invoke(&request).await.unwrap_err();
    assert!(matches!(err, Error::CatalogNotFound(_)));
}

#[tokio::test]
async fn test_pipeline_global_store_with_override() {
    let global = std::sync::Arc::new(MemoryStore::new());
    global.set("faces", json!({"carol": {"a.png": [0.6, 0.8]}}));
    let stores = ContextStores::new(std::sync::Arc::new(MemoryStore::new()), global);

    let pipeline = Pipeline::new(MatchConfig::default(), CatalogLoader::new(stores)).unwrap();
    let request: MatchRequest = serde_json::from_value(json!({
        "payload": [[0.6, 0.8]],
        "cosineOptions": {"fileType": "global", "file": "faces", "threshold": "nope"}
    }))
    .unwrap();

    let output = pipeline.invoke(&request).await.unwrap();
    let score = output.payload[0]["carol"]["a.png"];
    assert!((score - 1.0).abs() < 1e-6);
    // Invalid threshold override falls back to the default
    assert_eq!(output.config.threshold, 0.0);
    assert_eq!(output.config.file_type, SourceKind::Global);
}
