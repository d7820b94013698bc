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

use std::path::Path;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use super::typedef::*;
use crate::error::CaptionError;

pub(super) const MESSAGE_OFFLINE: &str =
	"AI server is not available. Please ensure the Python backend is running.";
pub(super) const MESSAGE_CONNECT: &str =
	"Cannot connect to AI server. Please start the Python backend.";
pub(super) const MESSAGE_INVALID_IMAGE: &str = "Invalid image file. Please upload a valid image.";
pub(super) const MESSAGE_INFERENCE: &str = "AI processing failed. Please try again.";
pub(super) const MESSAGE_TIMEOUT: &str =
	"Request timeout. The image might be too large or complex.";

pub(super) fn content_type_for(path: &Path) -> &'static str {
	let extension = path
		.extension()
		.and_then(|found| found.to_str())
		.map(|found| found.to_lowercase())
		.unwrap_or_default();

	match extension.as_str() {
		"jpg" | "jpeg" => "image/jpeg",
		"png" => "image/png",
		"gif" => "image/gif",
		"webp" => "image/webp",
		"bmp" => "image/bmp",
		"tif" | "tiff" => "image/tiff",
		_ => "application/octet-stream",
	}
}

pub(super) fn timestamp_from_secs(secs: f64) -> Option<DateTime<Utc>> {
	if !secs.is_finite() {
		return None;
	}

	let whole = secs.floor();
	let nanos = ((secs - whole) * 1e9).round().min(999_999_999f64) as u32;
	DateTime::from_timestamp(whole as i64, nanos)
}

pub(super) fn caption_from_wire(wire: WireCaption) -> Result<Caption, CaptionError> {
	let timestamp = timestamp_from_secs(wire.timestamp).ok_or_else(|| {
		CaptionError::Unknown(format!("Invalid caption timestamp {}", wire.timestamp))
	})?;

	Ok(Caption {
		id: wire.id,
		text: wire.text,
		confidence: wire.confidence,
		style: wire.style,
		model: wire.model,
		timestamp,
	})
}

/// Maps a failure that produced no HTTP status.
pub(super) fn classify_transport(err: reqwest::Error) -> CaptionError {
	if err.is_timeout() {
		CaptionError::RequestTimeout(String::from(MESSAGE_TIMEOUT))
	} else if err.is_connect() {
		CaptionError::BackendUnavailable(String::from(MESSAGE_CONNECT))
	} else if err.is_decode() {
		CaptionError::Unknown(format!("Malformed response from AI server: {err}"))
	} else if err.status().is_none() && (err.is_request() || err.is_body()) {
		// Connection closed or reset after it was established.
		CaptionError::BackendUnavailable(String::from(MESSAGE_CONNECT))
	} else {
		CaptionError::Unknown(err.to_string())
	}
}

/// Maps a non-success HTTP status, reading `detail` from the body when the backend sent one.
pub(super) fn classify_status(status: StatusCode, body: &str) -> CaptionError {
	match status {
		StatusCode::BAD_REQUEST => CaptionError::InvalidImage(String::from(MESSAGE_INVALID_IMAGE)),
		StatusCode::INTERNAL_SERVER_ERROR => CaptionError::InferenceFailure(
			detail_of(body).unwrap_or_else(|| String::from(MESSAGE_INFERENCE)),
		),
		_ => CaptionError::Unknown(format!("AI server answered with status {status}")),
	}
}

fn detail_of(body: &str) -> Option<String> {
	let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;

	match parsed.detail? {
		serde_json::Value::String(found) if !found.is_empty() => Some(found),
		serde_json::Value::String(_) | serde_json::Value::Null => None,
		other => Some(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn server_error_detail_becomes_message() {
		assert_eq!(
			classify_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail": "x"}"#),
			CaptionError::InferenceFailure(String::from("x"))
		);
	}

	#[test]
	fn server_error_without_detail_uses_default() {
		for body in ["", "not json", r#"{"detail": null}"#, r#"{"other": 1}"#] {
			assert_eq!(
				classify_status(StatusCode::INTERNAL_SERVER_ERROR, body),
				CaptionError::InferenceFailure(String::from(MESSAGE_INFERENCE))
			);
		}
	}

	#[test]
	fn bad_request_is_invalid_image() {
		assert!(matches!(
			classify_status(StatusCode::BAD_REQUEST, r#"{"detail": "File must be an image"}"#),
			CaptionError::InvalidImage(_)
		));
	}

	#[test]
	fn other_statuses_are_unknown() {
		assert!(matches!(
			classify_status(StatusCode::NOT_FOUND, ""),
			CaptionError::Unknown(_)
		));
		assert!(matches!(
			classify_status(StatusCode::BAD_GATEWAY, ""),
			CaptionError::Unknown(_)
		));
	}

	#[test]
	fn timestamps_keep_fractional_seconds() {
		let converted = timestamp_from_secs(1_700_000_000.5f64).unwrap();
		assert_eq!(converted.timestamp(), 1_700_000_000);
		assert_eq!(converted.timestamp_subsec_millis(), 500);
		assert!(timestamp_from_secs(f64::NAN).is_none());
	}

	#[test]
	fn content_type_follows_extension() {
		assert_eq!(content_type_for(Path::new("cat.JPG")), "image/jpeg");
		assert_eq!(content_type_for(Path::new("dog.png")), "image/png");
		assert_eq!(content_type_for(Path::new("notes")), "application/octet-stream");
	}
}
