//! Integration tests for the upload workflow.
//!
//! Every test drives `UploadWorkflow` against the in-memory MockTransport and
//! checks which remote steps ran, in which order, and what was reported.

mod common;

use std::io::Cursor;

use common::{Call, MockTransport, Step};
use gp_core::error::{GpError, ImageIdError, UploadPhase};
use gp_services::{UploadRequest, UploadResult, UploadWorkflow};

fn request() -> UploadRequest {
    let bytes = common::photo_bytes();
    let size = bytes.len() as i64;
    UploadRequest::new(Cursor::new(bytes), size)
        .with_name("beach.jpg")
        .with_timestamp_ms(1_600_000_000_000)
}

// ---- Success ----

#[tokio::test]
async fn upload_without_album_runs_three_steps() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();

    let result = UploadWorkflow::new(request(), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        result,
        UploadResult {
            uploaded: true,
            image_id: Some("AbC-123_xyz".into()),
            image_url: Some(common::IMAGE_URL.into()),
            album_id: None,
        }
    );
    assert_eq!(
        transport.steps(),
        vec![Step::RequestUploadUrl, Step::UploadBytes, Step::EnablePhoto]
    );
    assert_eq!(result.url_string().as_deref(), Some(common::IMAGE_URL));
}

#[tokio::test]
async fn stream_is_sent_whole_to_the_upload_url() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();

    UploadWorkflow::new(request(), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(transport.received(), common::photo_bytes());
    let calls = transport.calls();
    assert_eq!(
        calls[1],
        Call::UploadBytes {
            upload_url: common::UPLOAD_URL.into(),
            size: common::photo_bytes().len() as u64,
        }
    );
    assert_eq!(
        calls[2],
        Call::EnablePhoto {
            upload_token: common::UPLOAD_TOKEN.into(),
            name: "beach.jpg".into(),
            timestamp_ms: 1_600_000_000_000,
        }
    );
}

#[tokio::test]
async fn credentials_and_metadata_reach_the_session_request() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();

    UploadWorkflow::new(request(), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap();

    match &transport.calls()[0] {
        Call::RequestUploadUrl { metadata, user_id } => {
            assert_eq!(user_id, "user-42");
            assert_eq!(metadata.name, "beach.jpg");
            assert_eq!(metadata.size, common::photo_bytes().len() as u64);
            assert_eq!(metadata.timestamp_ms, 1_600_000_000_000);
        }
        other => panic!("expected RequestUploadUrl first, got {other:?}"),
    }
}

#[tokio::test]
async fn existing_album_gets_the_photo() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();

    let result = UploadWorkflow::new(request().with_album_id("album-9"), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(result.album_id.is_none());
    assert_eq!(transport.count(Step::MoveToAlbum), 1);
    assert_eq!(transport.count(Step::CreateAlbum), 0);
    assert_eq!(
        transport.calls()[3],
        Call::MoveToAlbum {
            media_key: common::MEDIA_KEY.into(),
            album_id: "album-9".into(),
        }
    );
}

#[tokio::test]
async fn new_album_is_created_and_reported() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();

    let result = UploadWorkflow::new(request().with_album_name("Holidays"), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(result.album_id.as_deref(), Some(common::CREATED_ALBUM));
    assert_eq!(transport.count(Step::MoveToAlbum), 0);
    assert_eq!(
        transport.calls()[3],
        Call::CreateAlbum {
            media_key: common::MEDIA_KEY.into(),
            album_name: "Holidays".into(),
        }
    );
}

#[tokio::test]
async fn both_album_options_move_then_create() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();
    let req = request().with_album_id("album-9").with_album_name("Holidays");

    let result = UploadWorkflow::new(req, &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(result.album_id.as_deref(), Some(common::CREATED_ALBUM));
    assert_eq!(
        transport.steps(),
        vec![
            Step::RequestUploadUrl,
            Step::UploadBytes,
            Step::EnablePhoto,
            Step::MoveToAlbum,
            Step::CreateAlbum,
        ]
    );
}

#[tokio::test]
async fn empty_album_options_are_ignored() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();
    let req = request().with_album_id("").with_album_name("");

    UploadWorkflow::new(req, &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(transport.steps().len(), 3);
}

// ---- Validation ----

#[tokio::test]
async fn missing_stream_is_rejected_before_any_call() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();
    let req = UploadRequest {
        size: 10,
        ..UploadRequest::default()
    };

    let err = UploadWorkflow::new(req, &creds, &transport).unwrap_err();
    assert!(matches!(err, GpError::Validation(_)), "got {err:?}");
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn non_positive_size_is_rejected_before_any_call() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();

    for size in [0, -1] {
        let req = UploadRequest::new(Cursor::new(vec![1u8]), size);
        let err = UploadWorkflow::new(req, &creds, &transport).unwrap_err();
        assert!(matches!(err, GpError::Validation(_)), "size {size}: got {err:?}");
    }
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn credentials_without_at_token_are_rejected_before_any_call() {
    let transport = MockTransport::new();
    let mut creds = common::test_credentials();
    creds.set_at_token("");

    let err = UploadWorkflow::new(request().with_album_id("album-9"), &creds, &transport)
        .unwrap_err();
    assert!(matches!(err, GpError::Credentials(_)), "got {err:?}");
    assert!(transport.calls().is_empty());
    assert!(transport.received().is_empty());
}

#[tokio::test]
async fn missing_name_and_timestamp_get_defaults() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();
    let before = chrono::Utc::now().timestamp_millis();

    let req = UploadRequest::new(Cursor::new(vec![1u8, 2]), 2)
        .with_name("")
        .with_timestamp_ms(-5);
    let workflow = UploadWorkflow::new(req, &creds, &transport).unwrap();
    let metadata = workflow.metadata().clone();

    assert!(!metadata.name.is_empty());
    assert!(metadata.name.ends_with(" UTC"));
    assert!(metadata.timestamp_ms >= before);
    assert_eq!(metadata.size, 2);

    workflow.run().await.unwrap();
    assert_eq!(transport.received(), vec![1u8, 2]);
}

// ---- Failures before the bytes are stored ----

#[tokio::test]
async fn session_failure_reports_nothing_uploaded() {
    let transport = MockTransport::failing_at(Step::RequestUploadUrl);
    let creds = common::test_credentials();

    let failure = UploadWorkflow::new(request().with_album_name("Holidays"), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase(), Some(UploadPhase::RequestUploadUrl));
    assert_eq!(failure.result, UploadResult::default());
    assert_eq!(transport.steps(), vec![Step::RequestUploadUrl]);
    assert!(failure.to_string().starts_with("can't get an upload url"));
}

#[tokio::test]
async fn transfer_failure_reports_nothing_uploaded() {
    let transport = MockTransport::failing_at(Step::UploadBytes);
    let creds = common::test_credentials();

    let failure = UploadWorkflow::new(request(), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase(), Some(UploadPhase::UploadBytes));
    assert!(!failure.result.uploaded);
    assert_eq!(transport.count(Step::EnablePhoto), 0);
}

// ---- Failures after the bytes are stored ----

#[tokio::test]
async fn enable_failure_still_reports_uploaded() {
    let transport = MockTransport::failing_at(Step::EnablePhoto);
    let creds = common::test_credentials();

    let failure = UploadWorkflow::new(request().with_album_id("album-9"), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase(), Some(UploadPhase::EnablePhoto));
    assert_eq!(
        failure.result,
        UploadResult {
            uploaded: true,
            ..UploadResult::default()
        }
    );
    assert_eq!(transport.count(Step::MoveToAlbum), 0);
}

#[tokio::test]
async fn unparseable_image_url_keeps_the_url() {
    let transport = MockTransport::new().with_image_url("https://example.com/not-an-image");
    let creds = common::test_credentials();

    let failure = UploadWorkflow::new(request().with_album_name("Holidays"), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase(), Some(UploadPhase::ParseImageId));
    assert!(failure.result.uploaded);
    assert!(failure.result.image_id.is_none());
    assert_eq!(
        failure.result.image_url.as_deref(),
        Some("https://example.com/not-an-image")
    );
    assert_eq!(transport.count(Step::CreateAlbum), 0);

    match failure.error {
        GpError::Phase { source, .. } => assert!(matches!(
            *source,
            GpError::ImageId(ImageIdError::NoMatch(_))
        )),
        other => panic!("expected phase error, got {other:?}"),
    }
}

#[tokio::test]
async fn album_creation_failure_keeps_the_image_id() {
    let transport = MockTransport::failing_at(Step::CreateAlbum);
    let creds = common::test_credentials();

    let failure = UploadWorkflow::new(request().with_album_name("Holidays"), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase(), Some(UploadPhase::CreateAlbum));
    assert!(failure.result.uploaded);
    assert_eq!(failure.result.image_id.as_deref(), Some("AbC-123_xyz"));
    assert!(failure.result.album_id.is_none());
}

#[tokio::test]
async fn album_move_failure_alone_is_reported() {
    let transport = MockTransport::failing_at(Step::MoveToAlbum);
    let creds = common::test_credentials();

    let failure = UploadWorkflow::new(request().with_album_id("album-9"), &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase(), Some(UploadPhase::MoveToAlbum));
    assert_eq!(
        failure.result,
        UploadResult {
            uploaded: true,
            image_id: Some("AbC-123_xyz".into()),
            image_url: Some(common::IMAGE_URL.into()),
            album_id: None,
        }
    );
    assert_eq!(transport.count(Step::CreateAlbum), 0);
}

#[tokio::test]
async fn album_move_failure_is_reported_after_creation() {
    let transport = MockTransport::failing_at(Step::MoveToAlbum);
    let creds = common::test_credentials();
    let req = request().with_album_id("album-9").with_album_name("Holidays");

    let failure = UploadWorkflow::new(req, &creds, &transport)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase(), Some(UploadPhase::MoveToAlbum));
    assert_eq!(transport.count(Step::CreateAlbum), 1);
    assert_eq!(
        failure.result,
        UploadResult {
            uploaded: true,
            image_id: Some("AbC-123_xyz".into()),
            image_url: Some(common::IMAGE_URL.into()),
            album_id: Some(common::CREATED_ALBUM.into()),
        }
    );
}

#[tokio::test]
async fn uploads_share_one_transport() {
    let transport = MockTransport::new();
    let creds = common::test_credentials();

    for name in ["a.jpg", "b.jpg"] {
        let req = UploadRequest::new(Cursor::new(vec![7u8; 3]), 3).with_name(name);
        UploadWorkflow::new(req, &creds, &transport)
            .unwrap()
            .run()
            .await
            .unwrap();
    }

    assert_eq!(transport.count(Step::RequestUploadUrl), 2);
    assert_eq!(transport.received(), vec![7u8; 6]);
}
