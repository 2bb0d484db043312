use base64::Engine as _;
use family_portrait::{
    ai::{GeminiPortraitClient, MockGenerationClient},
    app::{App, AppServices},
    encoder::{Base64FileEncoder, MockFileEncoder},
    models::{BackgroundInput, BackgroundMode, ContentPart, ImageFile},
    preview::PreviewRegistry,
    session::{GenerateOutcome, NoticeLevel, Session, DOWNLOAD_FILE_NAME},
    Error,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_png(dir: &Path, name: &str, shade: u8) -> std::path::PathBuf {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([shade, shade, shade, 255]));
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

fn portrait_response(bytes: &[u8]) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "inlineData": {
                        "mimeType": "image/png",
                        "data": base64::engine::general_purpose::STANDARD.encode(bytes)
                    } },
                    { "text": "A warm family portrait." }
                ]
            },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_full_workflow_against_mock_gemini() {
    let dir = tempfile::tempdir().unwrap();
    let mum = write_png(dir.path(), "mum.png", 10);
    let dad = write_png(dir.path(), "dad.png", 20);
    let portrait = fs::read(write_png(dir.path(), "portrait-fixture.png", 30)).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/v1beta/models/gemini-2.5-flash-image-preview:generateContent",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(portrait_response(&portrait)))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiPortraitClient::new(
        "test-key".to_string(),
        "gemini-2.5-flash-image-preview".to_string(),
        None,
    )
    .with_base_url(server.uri());
    let app = App::with_services(AppServices {
        encoder: Arc::new(Base64FileEncoder::new()),
        client: Box::new(client),
    });

    let mut session = Session::new(PreviewRegistry::new());
    session.add_files(vec![
        ImageFile::from_path(&mum).unwrap(),
        ImageFile::from_path(&dad).unwrap(),
    ]);
    session.set_background_prompt("a beach at sunset");

    assert_eq!(session.generate(&app).await, GenerateOutcome::Generated);
    assert_eq!(session.generated_text(), Some("A warm family portrait."));

    let out_dir = dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    let saved = session.download(&out_dir).await.unwrap();
    assert_eq!(saved, out_dir.join(DOWNLOAD_FILE_NAME));
    assert_eq!(fs::read(&saved).unwrap(), portrait);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 4);
    assert_eq!(
        parts[0]["inlineData"]["data"],
        base64::engine::general_purpose::STANDARD.encode(fs::read(&mum).unwrap())
    );
    assert_eq!(
        parts[1]["inlineData"]["data"],
        base64::engine::general_purpose::STANDARD.encode(fs::read(&dad).unwrap())
    );
    assert!(parts[3]["text"]
        .as_str()
        .unwrap()
        .contains("a beach at sunset"));
    assert_eq!(
        body["generationConfig"]["responseModalities"],
        serde_json::json!(["IMAGE", "TEXT"])
    );
}

#[tokio::test]
async fn test_gemini_error_surfaces_as_single_user_facing_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let client = GeminiPortraitClient::new("key".to_string(), "model".to_string(), None)
        .with_base_url(server.uri());
    let app = App::with_services(AppServices {
        encoder: Arc::new(Base64FileEncoder::new()),
        client: Box::new(client),
    });

    let mut session = Session::new(PreviewRegistry::new());
    session.add_files(vec![ImageFile::from_bytes("kid.jpg", vec![0xFFu8, 0xD8, 0xFF])]);

    assert_eq!(session.generate(&app).await, GenerateOutcome::Failed);
    let notice = session.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, Error::Generation.to_string());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_image_background_scenario() {
    let client = MockGenerationClient::new().with_json_response(portrait_response(&[1, 2, 3]));
    let recorder = client.clone();
    let app = App::with_services(AppServices {
        encoder: Arc::new(MockFileEncoder::new()),
        client: Box::new(client),
    });

    let registry = PreviewRegistry::new();
    let mut session = Session::new(registry.clone());
    session.add_files(vec![ImageFile::from_bytes("solo.jpg", vec![0xFFu8, 0xD8, 0xFF])]);
    session.set_background_image(Some(ImageFile::from_bytes(
        "garden.png",
        vec![0x89u8, 0x50, 0x4E, 0x47],
    )));
    session.set_background_mode(BackgroundMode::Image);

    assert_eq!(session.generate(&app).await, GenerateOutcome::Generated);

    let requests = recorder.get_requests();
    assert_eq!(requests.len(), 1);
    let parts = &requests[0].parts;
    assert_eq!(parts.len(), 3);
    assert!(matches!(&parts[1], ContentPart::InlineData { mime_type, .. } if mime_type == "image/png"));
    assert!(matches!(&parts[2], ContentPart::Text(text) if text.contains("the 1 preceding images")));

    session.clear_files();
    session.set_background_image(None);
    assert_eq!(registry.live_count(), 0);
}

#[tokio::test]
async fn test_unreadable_person_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockGenerationClient::new();
    let recorder = client.clone();
    let app = App::with_services(AppServices {
        encoder: Arc::new(Base64FileEncoder::new()),
        client: Box::new(client),
    });

    let missing = ImageFile::from_path(dir.path().join("missing.jpg")).unwrap();
    let err = app
        .generate_portrait(&[missing], &BackgroundInput::Text("a lake".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
    assert_eq!(recorder.get_call_count(), 0);
}
