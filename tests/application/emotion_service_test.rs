use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use moodmix::application::ports::{AudioNormalizerError, ClassifierError};
use moodmix::application::services::{EmotionService, PredictionError};
use moodmix::domain::Emotion;

use crate::helpers::{
    CountingLoader, FailingClassifierLoader, FailingLoader, FailingNormalizer, StubNormalizer,
    count_files,
};

fn create_service(
    loader: Arc<dyn moodmix::application::ports::ClassifierLoader>,
) -> (tempfile::TempDir, EmotionService) {
    let dir = tempfile::TempDir::new().unwrap();
    let service = EmotionService::new(
        Arc::new(StubNormalizer { samples: 16_000 }),
        loader,
        dir.path().join("uploads"),
    )
    .unwrap();
    (dir, service)
}

#[tokio::test]
async fn given_neutral_prediction_when_predicting_upload_then_returns_calm() {
    let (loader, _) = CountingLoader::new(0);
    let (_dir, service) = create_service(Arc::new(loader));

    let emotion = service
        .predict_upload(b"RIFF....", Some("clip.wav"))
        .await
        .unwrap();

    assert_eq!(emotion, Emotion::Calm);
}

#[tokio::test]
async fn given_repeated_predictions_when_predicting_then_model_is_loaded_once() {
    let (loader, loads) = CountingLoader::new(4);
    let (_dir, service) = create_service(Arc::new(loader));

    assert!(!service.is_model_loaded());

    for _ in 0..3 {
        let emotion = service.predict_upload(b"data", None).await.unwrap();
        assert_eq!(emotion, Emotion::Angry);
    }

    assert!(service.is_model_loaded());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_first_requests_when_predicting_then_model_is_loaded_once() {
    let (loader, loads) = CountingLoader::new(5);
    let loader = loader.with_delay(Duration::from_millis(50));
    let (_dir, service) = create_service(Arc::new(loader));
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.predict_upload(b"data", None).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), Emotion::Energetic);
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_successful_prediction_when_finished_then_transient_upload_is_removed() {
    let (loader, _) = CountingLoader::new(2);
    let (_dir, service) = create_service(Arc::new(loader));

    service
        .predict_upload(b"audio bytes", Some("clip.webm"))
        .await
        .unwrap();

    assert_eq!(count_files(service.upload_dir()), 0);
}

#[tokio::test]
async fn given_model_load_failure_when_predicting_then_returns_error_and_removes_upload() {
    let (_dir, service) = create_service(Arc::new(FailingLoader));

    let result = service.predict_upload(b"audio bytes", Some("clip.wav")).await;

    assert!(matches!(
        result,
        Err(PredictionError::Classification(ClassifierError::ModelLoadFailed(_)))
    ));
    assert!(!service.is_model_loaded());
    assert_eq!(count_files(service.upload_dir()), 0);
}

#[tokio::test]
async fn given_inference_failure_when_predicting_then_returns_error_and_removes_upload() {
    let (_dir, service) = create_service(Arc::new(FailingClassifierLoader));

    let result = service.predict_upload(b"audio bytes", None).await;

    assert!(matches!(
        result,
        Err(PredictionError::Classification(ClassifierError::InferenceFailed(_)))
    ));
    assert_eq!(count_files(service.upload_dir()), 0);
}

#[tokio::test]
async fn given_undecodable_audio_when_predicting_then_returns_error_and_removes_upload() {
    let dir = tempfile::TempDir::new().unwrap();
    let (loader, _) = CountingLoader::new(1);
    let service = EmotionService::new(
        Arc::new(FailingNormalizer),
        Arc::new(loader),
        dir.path().to_path_buf(),
    )
    .unwrap();

    let result = service.predict_upload(b"not audio", Some("clip.mp3")).await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        PredictionError::Normalization(AudioNormalizerError::DecodingFailed(_))
    ));
    assert!(err.to_string().contains("audio decoding failed"));
    assert_eq!(count_files(dir.path()), 0);
}

#[tokio::test]
async fn given_failed_load_when_predicting_again_then_loader_is_retried() {
    let (_dir, service) = create_service(Arc::new(FailingLoader));

    assert!(service.predict_upload(b"a", None).await.is_err());
    assert!(service.predict_upload(b"b", None).await.is_err());
    assert!(!service.is_model_loaded());
}

#[tokio::test]
async fn given_file_on_disk_when_predicting_file_then_file_is_left_in_place() {
    let (loader, _) = CountingLoader::new(3);
    let (dir, service) = create_service(Arc::new(loader));
    let path = dir.path().join("existing.wav");
    std::fs::write(&path, b"bytes").unwrap();

    let emotion = service.predict_file(&path).await.unwrap();

    assert_eq!(emotion, Emotion::Sad);
    assert!(path.exists());
}
