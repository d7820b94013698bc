/*
 * Project::Augur, a synthetic market forecaster with an image caption client
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::{collections::HashMap, time::Duration};

use axum::{
	extract::{Multipart, Query},
	http::StatusCode,
	routing::{get, post},
	Json, Router,
};
use chrono::Timelike;
use project_augur_lib::{
	CaptionClient, CaptionConfig, CaptionError, CaptionModel, CaptionStyle, ImageUpload,
	SessionStats,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Serves `router` on an ephemeral port and returns its base URL.
async fn serve(router: Router) -> String {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let address = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, router).await.unwrap();
	});

	format!("http://{address}")
}

/// A backend whose health probe answers with `status`.
fn backend(status: &'static str) -> Router {
	Router::new().route(
		"/health",
		get(move || async move {
			Json(json!({ "status": status, "device": "cpu", "models_loaded": 4 }))
		}),
	)
}

fn client(base_url: &str) -> CaptionClient {
	CaptionClient::new(CaptionConfig::default().with_base_url(base_url)).unwrap()
}

fn image() -> ImageUpload {
	ImageUpload::new("cat.png", "image/png", vec![137, 80, 78, 71])
}

/// Describes the uploaded `file` field in the caption text, or answers 400 when it is missing.
async fn describe_upload(mut multipart: Multipart) -> Result<String, StatusCode> {
	while let Ok(Some(field)) = multipart.next_field().await {
		if field.name() != Some("file") {
			continue;
		}

		let file_name = field.file_name().unwrap_or_default().to_string();
		let content_type = field.content_type().unwrap_or_default().to_string();
		let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
		return Ok(format!("{file_name} {content_type} {}", bytes.len()));
	}

	Err(StatusCode::BAD_REQUEST)
}

async fn captions(multipart: Multipart) -> (StatusCode, Json<Value>) {
	match describe_upload(multipart).await {
		Ok(text) => (
			StatusCode::OK,
			Json(json!({
				"success": true,
				"captions": [
					{
						"id": "1",
						"text": text,
						"confidence": 0.8,
						"style": "descriptive",
						"model": "BLIP",
						"timestamp": 1_700_000_000.5
					},
					{
						"id": "2",
						"text": "a small cat",
						"confidence": 0.6,
						"style": "creative",
						"model": "Some New Model",
						"timestamp": 1_700_000_001.0
					}
				],
				"stats": {
					"processing_time": 1.5,
					"num_captions": 2,
					"average_confidence": 0.7,
					"image_size": "2x2"
				}
			})),
		),
		Err(status) => (status, Json(json!({ "detail": "No file uploaded" }))),
	}
}

async fn single_caption(
	Query(query): Query<HashMap<String, String>>,
	multipart: Multipart,
) -> (StatusCode, Json<Value>) {
	match describe_upload(multipart).await {
		Ok(text) => (
			StatusCode::OK,
			Json(json!({
				"success": true,
				"caption": {
					"id": "single",
					"text": text,
					"confidence": 0.9,
					"style": query.get("style").cloned().unwrap_or_default(),
					"model": "Technical Analysis",
					"timestamp": 1_700_000_002.0
				}
			})),
		),
		Err(status) => (status, Json(json!({ "detail": "No file uploaded" }))),
	}
}

#[tokio::test]
async fn healthy_backend_reports_its_status() {
	let url = serve(backend("healthy")).await;
	let client = client(&url);

	assert!(client.check_health().await);

	let status = client.check_status().await;
	assert!(status.is_running);
	assert_eq!(status.device.as_deref(), Some("cpu"));
	assert_eq!(status.models_loaded, Some(4));
}

#[tokio::test]
async fn loading_backend_is_not_healthy() {
	let url = serve(backend("loading").route("/generate-captions", post(captions))).await;
	let client = client(&url);

	assert!(!client.check_health().await);

	let err = client.generate_captions(&image()).await.unwrap_err();
	assert!(err.is_backend_offline());
}

#[tokio::test]
async fn batch_captions_are_normalized() {
	let url = serve(backend("healthy").route("/generate-captions", post(captions))).await;

	let batch = client(&url).generate_captions(&image()).await.unwrap();

	assert_eq!(batch.captions.len(), 2);
	assert_eq!(batch.captions[0].text, "cat.png image/png 4");
	assert_eq!(batch.captions[0].model, CaptionModel::Blip);
	assert_eq!(batch.captions[0].style, CaptionStyle::Descriptive);
	assert_eq!(batch.captions[0].timestamp.timestamp(), 1_700_000_000);
	assert_eq!(batch.captions[0].timestamp.nanosecond(), 500_000_000);
	assert_eq!(
		batch.captions[1].model,
		CaptionModel::Other(String::from("Some New Model"))
	);
	assert_eq!(batch.captions[1].style, CaptionStyle::Creative);
	assert_eq!(batch.stats.num_captions, 2);
	assert_eq!(batch.stats.image_size, "2x2");

	let stats = SessionStats::default().record_batch(&batch);
	assert_eq!(stats.total_images, 1);
	assert_eq!(stats.total_captions, 2);
	assert!((stats.average_confidence - 0.7f64).abs() < 1e-9);
	assert_eq!(stats.processing_time, 1.5f64);
}

#[tokio::test]
async fn single_caption_sends_requested_style() {
	let url = serve(
		backend("healthy").route("/generate-single-caption", post(single_caption)),
	)
	.await;

	let caption = client(&url)
		.generate_single_caption(&image(), CaptionStyle::Technical)
		.await
		.unwrap();

	assert_eq!(caption.style, CaptionStyle::Technical);
	assert_eq!(caption.model, CaptionModel::TechnicalAnalysis);
	assert_eq!(caption.text, "cat.png image/png 4");
	assert_eq!(caption.timestamp.timestamp(), 1_700_000_002);
}

#[tokio::test]
async fn server_error_carries_backend_detail() {
	let router = backend("healthy")
		.route(
			"/generate-captions",
			post(|| async {
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Json(json!({ "detail": "x" })),
				)
			}),
		)
		.route(
			"/generate-single-caption",
			post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
		);
	let client = client(&serve(router).await);

	assert_eq!(
		client.generate_captions(&image()).await.unwrap_err(),
		CaptionError::InferenceFailure(String::from("x"))
	);

	match client
		.generate_single_caption(&image(), CaptionStyle::Detailed)
		.await
	{
		Err(CaptionError::InferenceFailure(message)) => assert!(!message.is_empty()),
		other => panic!("expected an inference failure, got {other:?}"),
	}
}

#[tokio::test]
async fn bad_request_means_invalid_image() {
	let router = backend("healthy").route(
		"/generate-single-caption",
		post(|| async {
			(
				StatusCode::BAD_REQUEST,
				Json(json!({ "detail": "File must be an image" })),
			)
		}),
	);

	let err = client(&serve(router).await)
		.generate_single_caption(&image(), CaptionStyle::Descriptive)
		.await
		.unwrap_err();

	assert!(matches!(err, CaptionError::InvalidImage(_)));
}

#[tokio::test]
async fn unexpected_answers_are_unknown() {
	let router = backend("healthy")
		.route(
			"/generate-captions",
			post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
		)
		.route(
			"/generate-single-caption",
			post(|| async { Json(json!({ "success": false, "caption": null })) }),
		);
	let client = client(&serve(router).await);

	assert!(matches!(
		client.generate_captions(&image()).await,
		Err(CaptionError::Unknown(_))
	));
	assert!(matches!(
		client
			.generate_single_caption(&image(), CaptionStyle::Creative)
			.await,
		Err(CaptionError::Unknown(_))
	));
}

#[tokio::test]
async fn malformed_body_is_unknown() {
	let router = backend("healthy").route("/generate-captions", post(|| async { "not json" }));

	let err = client(&serve(router).await)
		.generate_captions(&image())
		.await
		.unwrap_err();

	assert!(matches!(err, CaptionError::Unknown(_)));
}

#[tokio::test]
async fn unreachable_backend_is_offline() {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let address = listener.local_addr().unwrap();
	drop(listener);
	let client = client(&format!("http://{address}"));

	assert!(!client.check_health().await);
	assert!(!client.check_status().await.is_running);

	let err = client.generate_captions(&image()).await.unwrap_err();
	assert!(matches!(err, CaptionError::BackendUnavailable(_)));
}

/// Answers `/health` as healthy, then hangs up on every other request without responding.
async fn serve_hanging_up() -> String {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let address = listener.local_addr().unwrap();
	tokio::spawn(async move {
		while let Ok((mut socket, _)) = listener.accept().await {
			tokio::spawn(async move {
				let mut buffer = [0u8; 4096];
				let read = socket.read(&mut buffer).await.unwrap_or(0);
				if !buffer[..read].starts_with(b"GET /health") {
					return;
				}

				let body = r#"{"status":"healthy"}"#;
				let response = format!(
					"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
					 content-length: {}\r\nconnection: close\r\n\r\n{body}",
					body.len()
				);
				let _ = socket.write_all(response.as_bytes()).await;
				let _ = socket.shutdown().await;
			});
		}
	});

	format!("http://{address}")
}

#[tokio::test]
async fn dropped_connection_is_offline() {
	let client = client(&serve_hanging_up().await);

	assert!(client.check_health().await);

	let err = client.generate_captions(&image()).await.unwrap_err();
	assert!(err.is_backend_offline(), "got {err:?}");

	let err = client
		.generate_single_caption(&image(), CaptionStyle::Descriptive)
		.await
		.unwrap_err();
	assert!(err.is_backend_offline(), "got {err:?}");
}

#[tokio::test]
async fn slow_backend_times_out() {
	let router = backend("healthy").route(
		"/generate-captions",
		post(|| async {
			tokio::time::sleep(Duration::from_secs(2)).await;
			Json(json!({ "success": true, "captions": [] }))
		}),
	);
	let config = CaptionConfig {
		batch_timeout: Duration::from_millis(200),
		..CaptionConfig::default().with_base_url(serve(router).await)
	};

	let err = CaptionClient::new(config)
		.unwrap()
		.generate_captions(&image())
		.await
		.unwrap_err();

	assert!(matches!(err, CaptionError::RequestTimeout(_)));
}

#[tokio::test]
async fn upload_reads_file_and_guesses_type() {
	let mut file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
	std::io::Write::write_all(&mut file, &[1, 2, 3]).unwrap();

	let upload = ImageUpload::from_path(file.path()).await.unwrap();

	assert_eq!(upload.content_type, "image/png");
	assert_eq!(upload.bytes, vec![1, 2, 3]);
	assert!(upload.file_name.ends_with(".PNG"));

	let missing = ImageUpload::from_path(file.path().with_extension("missing")).await;
	assert!(matches!(missing, Err(CaptionError::InvalidImage(_))));
}
