use std::fs;
use std::sync::Arc;
use std::thread;

use commentsense::classifier::LABEL_PREFIX;
use commentsense::trainer::{train_to_file, LabeledExample, TrainingParams};
use commentsense::{ArtifactError, Classifier, SentimentAnalyzer};
use env_logger::{Builder, Env};

// Initialize test logger
fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn")).is_test(true).try_init();
}

fn examples() -> Vec<LabeledExample> {
    let positive = [
        "I love this product! It is amazing.",
        "Amazing quality, love it",
        "Great value and\namazing support",
        "love love love",
    ];
    let negative = [
        "Worst experience ever.",
        "Terrible, broke after a day. Worst purchase.",
        "Awful product,\nterrible support",
        "worst worst worst",
    ];
    let mut examples = Vec::new();
    for _ in 0..5 {
        examples.extend(positive.iter().map(|t| LabeledExample {
            label: "Positive".into(),
            text: t.to_string(),
        }));
        examples.extend(negative.iter().map(|t| LabeledExample {
            label: "NEGATIVE".into(),
            text: t.to_string(),
        }));
    }
    examples
}

fn params() -> TrainingParams {
    TrainingParams {
        dim: 16,
        bucket: 2048,
        ..TrainingParams::default()
    }
}

fn setup_test_classifier(dir: &tempfile::TempDir) -> Classifier {
    let corpus_path = dir.path().join("train.fasttext.txt");
    let model_path = dir.path().join("sentiment_model.bin");
    train_to_file(&examples(), &corpus_path, &model_path, &params()).expect("training failed");
    Classifier::load(&model_path).expect("Failed to load classifier")
}

#[test]
fn test_training_file_lines_are_well_formed() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let corpus_path = dir.path().join("train.fasttext.txt");
    train_to_file(&examples(), &corpus_path, dir.path().join("model.bin"), &params())?;

    let contents = fs::read_to_string(&corpus_path)?;
    assert_eq!(contents.lines().count(), examples().len());
    for line in contents.lines() {
        let rest = line.strip_prefix(LABEL_PREFIX).expect("missing label prefix");
        let (label, body) = rest.split_once(' ').expect("missing separator");
        assert!(label == "positive" || label == "negative", "label {:?}", label);
        assert!(!body.contains('\n'));
        assert_eq!(body, body.trim());
    }
    Ok(())
}

#[test]
fn test_trained_model_separates_sentiment() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let classifier = setup_test_classifier(&dir);

    assert_eq!(classifier.info().labels.len(), 2);
    assert_eq!(classifier.predict("I love this product! It is amazing.")?.label, "positive");
    assert_eq!(classifier.predict("Worst experience ever.")?.label, "negative");
    Ok(())
}

#[test]
fn test_scenario_through_the_pipeline() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let analyzer = SentimentAnalyzer::new(Arc::new(setup_test_classifier(&dir)));

    let counts = analyzer.analyze(&[
        "I love this product! It is amazing.",
        "Worst experience ever.",
        "It was okay, nothing special.",
    ])?;
    assert_eq!(counts.total(), 3);
    assert!(counts.positive >= 1);
    assert!(counts.negative >= 1);
    Ok(())
}

#[test]
fn test_reloaded_model_predicts_identically() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let first = setup_test_classifier(&dir);
    let second = Classifier::load(dir.path().join("sentiment_model.bin"))?;
    for text in ["love it", "terrible", "", "something unseen entirely"] {
        assert_eq!(first.predict(text)?, second.predict(text)?);
    }
    Ok(())
}

#[test]
fn test_corrupted_artifact_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    setup_test_classifier(&dir);
    let model_path = dir.path().join("sentiment_model.bin");

    let mut bytes = fs::read(&model_path)?;
    let middle = bytes.len() / 2;
    bytes[middle] = bytes[middle].wrapping_add(1);
    fs::write(&model_path, bytes)?;

    assert!(matches!(Classifier::load(&model_path), Err(ArtifactError::HashMismatch { .. })));
    assert!(matches!(
        Classifier::load(dir.path().join("missing.bin")),
        Err(ArtifactError::IoError(_))
    ));
    Ok(())
}

#[test]
fn test_thread_safety() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let classifier = Arc::new(setup_test_classifier(&dir));
    let mut handles = vec![];

    for _ in 0..3 {
        let classifier = Arc::clone(&classifier);
        handles.push(thread::spawn(move || classifier.predict("test text")));
    }

    for handle in handles {
        handle.join().map_err(|_| "prediction thread panicked")??;
    }
    Ok(())
}
