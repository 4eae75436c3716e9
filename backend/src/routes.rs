use crate::config::Config;
use crate::errors::ApiError;
use crate::frame::decode_data_url;
use crate::inference::{Predictor, SUCCESS_MESSAGE, UploadedImage};
use crate::upload::receive_image;
use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use shared::{FrameRequest, HealthStatus, MAX_UPLOAD_BYTES, PredictionResponse};
use std::path::PathBuf;
use std::time::Instant;

/// Base64 inflates by 4/3; leave room for the JSON envelope and data URL prefix.
const FRAME_JSON_LIMIT: usize = (MAX_UPLOAD_BYTES as usize / 3) * 4 + 64 * 1024;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(FRAME_JSON_LIMIT)
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(web::resource("/api/predict").route(web::post().to(predict)))
    .service(web::resource("/api/predict-frame").route(web::post().to(predict_frame)))
    .service(web::resource("/api/health").route(web::get().to(health)));
}

async fn predict(
    config: web::Data<Config>,
    predictor: web::Data<dyn Predictor>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let started = Instant::now();
    let upload = receive_image(payload, &config.upload_dir).await?;
    log::info!(
        "Received upload {} ({} bytes)",
        upload.path().display(),
        upload.size()
    );

    let image = upload.load().await?;
    let response = run_prediction(predictor.get_ref(), &image, started).await?;
    upload.remove();

    Ok(HttpResponse::Ok().json(response))
}

async fn predict_frame(
    predictor: web::Data<dyn Predictor>,
    request: web::Json<FrameRequest>,
) -> Result<HttpResponse, ApiError> {
    let started = Instant::now();
    let (kind, bytes) = decode_data_url(&request.image)?;
    let image = UploadedImage {
        bytes,
        file_name: format!("frame.{}", kind.mime().trim_start_matches("image/")),
        kind,
    };

    let response = run_prediction(predictor.get_ref(), &image, started).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn health(config: web::Data<Config>, predictor: web::Data<dyn Predictor>) -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        message: format!("{} is running", config.variant.api_name()),
        variant: config.variant.to_string(),
        predictor: predictor.name().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn run_prediction(
    predictor: &dyn Predictor,
    image: &UploadedImage,
    started: Instant,
) -> Result<PredictionResponse, ApiError> {
    let mut response = predictor.predict(image).await?;
    response.message.get_or_insert_with(|| SUCCESS_MESSAGE.to_string());
    response
        .processing_time
        .get_or_insert_with(|| started.elapsed().as_secs_f64());
    log::info!(
        "{} predictor returned {} detections for {}",
        predictor.name(),
        response.predictions.len(),
        image.file_name
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::tests::{JPEG_BYTES, jpeg_data_url};
    use crate::inference::{MockPredictor, PredictorError};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use shared::{DemoVariant, ErrorBody};
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BOUNDARY: &str = "----demo-boundary";

    struct Part<'a> {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        body: &'a [u8],
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, part.file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
            body.extend_from_slice(part.body);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(parts: &[Part]) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/predict")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(parts))
    }

    fn image_part(body: &[u8]) -> Part<'_> {
        Part {
            name: "image",
            file_name: "station.png",
            content_type: "image/png",
            body,
        }
    }

    fn test_config(upload_dir: &Path, variant: DemoVariant) -> Config {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.upload_dir = upload_dir.to_path_buf();
        config.variant = variant;
        config
    }

    /// Records what it saw and then fails or answers with an empty list.
    struct ProbePredictor {
        calls: AtomicUsize,
        upstream_down: bool,
        seen_len: AtomicUsize,
    }

    impl ProbePredictor {
        fn new(upstream_down: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                upstream_down,
                seen_len: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Predictor for ProbePredictor {
        async fn predict(&self, image: &UploadedImage) -> Result<PredictionResponse, PredictorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_len.store(image.bytes.len(), Ordering::SeqCst);
            if self.upstream_down {
                Err(PredictorError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
            } else {
                Ok(PredictionResponse::default())
            }
        }

        fn name(&self) -> &'static str {
            "probe"
        }
    }

    macro_rules! app {
        ($config:expr, $predictor:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($config))
                    .app_data(web::Data::<dyn Predictor>::from($predictor))
                    .configure(configure_api),
            )
            .await
        };
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[actix_web::test]
    async fn upload_returns_mock_predictions_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let predictor: Arc<dyn Predictor> = Arc::new(MockPredictor::new(DemoVariant::AiVision));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), predictor);

        let resp = test::call_service(&app, upload_request(&[image_part(b"\x89PNG\r\n\x1a\n")]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: PredictionResponse = test::read_body_json(resp).await;
        let labels: Vec<_> = body.predictions.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["person", "car", "bicycle"]);
        assert_eq!(body.message.as_deref(), Some(SUCCESS_MESSAGE));
        assert!(body.processing_time.is_some());
        assert_eq!(files_in(dir.path()), 0);
    }

    #[actix_web::test]
    async fn upload_response_uses_class_key() {
        let dir = tempfile::tempdir().unwrap();
        let predictor: Arc<dyn Predictor> = Arc::new(MockPredictor::new(DemoVariant::SpaceStation));
        let app = app!(test_config(dir.path(), DemoVariant::SpaceStation), predictor);

        let resp = test::call_service(&app, upload_request(&[image_part(b"png")]).to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["predictions"][0]["class"], json!("toolbox"));
        assert_eq!(body["overall_map"].as_f64().map(|v| (v * 1000.0).round()), Some(847.0));
    }

    #[actix_web::test]
    async fn missing_image_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(false));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), probe.clone() as Arc<dyn Predictor>);

        let other = Part {
            name: "caption",
            file_name: "note.png",
            content_type: "image/png",
            body: b"hello",
        };
        let resp = test::call_service(&app, upload_request(&[other]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "No image file provided");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[actix_web::test]
    async fn empty_image_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(false));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), probe.clone() as Arc<dyn Predictor>);

        let resp = test::call_service(&app, upload_request(&[image_part(b"")]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[actix_web::test]
    async fn disallowed_type_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(false));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), probe.clone() as Arc<dyn Predictor>);

        for (file_name, content_type) in [("anim.gif", "image/gif"), ("fake.png", "text/plain"), ("script.sh", "image/png")] {
            let part = Part {
                name: "image",
                file_name,
                content_type,
                body: b"GIF89a",
            };
            let resp = test::call_service(&app, upload_request(&[part]).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{file_name}");
            let body: ErrorBody = test::read_body_json(resp).await;
            assert_eq!(body.error, "Invalid file type");
        }
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(false));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), probe.clone() as Arc<dyn Predictor>);

        let big = vec![0u8; MAX_UPLOAD_BYTES as usize + 1];
        let resp = test::call_service(&app, upload_request(&[image_part(&big)]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[actix_web::test]
    async fn predictor_failure_is_generic_and_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(true));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), probe.clone() as Arc<dyn Predictor>);

        let resp = test::call_service(&app, upload_request(&[image_part(b"\x89PNG")]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Failed to process image");
        assert!(!body.message.contains("503"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert_eq!(probe.seen_len.load(Ordering::SeqCst), 4);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[actix_web::test]
    async fn extra_fields_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(false));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), probe.clone() as Arc<dyn Predictor>);

        let note = Part {
            name: "note",
            file_name: "n.txt",
            content_type: "text/plain",
            body: b"ignore me",
        };
        let resp = test::call_service(&app, upload_request(&[note, image_part(b"12345678")]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PredictionResponse = test::read_body_json(resp).await;
        assert!(body.predictions.is_empty());
        assert_eq!(probe.seen_len.load(Ordering::SeqCst), 8);
    }

    #[actix_web::test]
    async fn frame_endpoint_accepts_jpeg_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(false));
        let app = app!(test_config(dir.path(), DemoVariant::SpaceStation), probe.clone() as Arc<dyn Predictor>);

        let req = test::TestRequest::post()
            .uri("/api/predict-frame")
            .set_json(FrameRequest { image: jpeg_data_url() })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PredictionResponse = test::read_body_json(resp).await;
        assert!(body.predictions.is_empty());
        assert_eq!(probe.seen_len.load(Ordering::SeqCst), JPEG_BYTES.len());
    }

    #[actix_web::test]
    async fn frame_endpoint_rejects_bad_frames() {
        let dir = tempfile::tempdir().unwrap();
        let probe = Arc::new(ProbePredictor::new(false));
        let app = app!(test_config(dir.path(), DemoVariant::AiVision), probe.clone() as Arc<dyn Predictor>);

        let req = test::TestRequest::post()
            .uri("/api/predict-frame")
            .set_json(json!({"image": "data:text/plain;base64,aGVsbG8="}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid frame");

        let req = test::TestRequest::post()
            .uri("/api/predict-frame")
            .set_json(json!({"frame": "nope"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid request");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn health_reports_variant_and_predictor() {
        let dir = tempfile::tempdir().unwrap();
        let predictor: Arc<dyn Predictor> = Arc::new(MockPredictor::new(DemoVariant::SpaceStation));
        let app = app!(test_config(dir.path(), DemoVariant::SpaceStation), predictor);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: HealthStatus = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.variant, "space-station");
        assert_eq!(body.predictor, "mock");
        assert_eq!(body.message, "Station Detection API is running");
    }

    #[actix_web::test]
    async fn root_serves_the_built_frontend_page() {
        let uploads = tempfile::tempdir().unwrap();
        let site = tempfile::tempdir().unwrap();
        std::fs::write(
            site.path().join("index.html"),
            include_str!("../../frontend/index.html"),
        )
        .unwrap();

        let predictor: Arc<dyn Predictor> = Arc::new(MockPredictor::new(DemoVariant::AiVision));
        let frontend_dir = site.path().to_path_buf();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(uploads.path(), DemoVariant::AiVision)))
                .app_data(web::Data::<dyn Predictor>::from(predictor))
                .configure(move |cfg| configure_routes(cfg, frontend_dir)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains(r#"<link data-trunk rel="rust""#));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
