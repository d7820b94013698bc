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

use std::{fmt, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::CaptionError;

#[derive(
	Default, PartialEq, Eq, EnumIter, EnumString, Display, Deserialize, Serialize, Clone, Copy, Debug,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CaptionStyle {
	#[default]
	Descriptive,
	Detailed,
	Creative,
	Technical,
}

/// Model the backend credits a caption to. Unrecognized names are kept verbatim.
#[derive(PartialEq, Eq, Deserialize, Serialize, Clone, Debug)]
#[serde(from = "String", into = "String")]
pub enum CaptionModel {
	Blip,
	VitGpt2,
	CreativeEnhancement,
	TechnicalAnalysis,
	Other(String),
}

impl From<String> for CaptionModel {
	fn from(value: String) -> Self {
		match value.as_str() {
			"BLIP" => CaptionModel::Blip,
			"ViT-GPT2" => CaptionModel::VitGpt2,
			"Creative Enhancement" => CaptionModel::CreativeEnhancement,
			"Technical Analysis" => CaptionModel::TechnicalAnalysis,
			_ => CaptionModel::Other(value),
		}
	}
}

impl From<CaptionModel> for String {
	fn from(value: CaptionModel) -> Self {
		value.to_string()
	}
}

impl fmt::Display for CaptionModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CaptionModel::Blip => write!(f, "BLIP"),
			CaptionModel::VitGpt2 => write!(f, "ViT-GPT2"),
			CaptionModel::CreativeEnhancement => write!(f, "Creative Enhancement"),
			CaptionModel::TechnicalAnalysis => write!(f, "Technical Analysis"),
			CaptionModel::Other(name) => write!(f, "{name}"),
		}
	}
}

#[derive(Serialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
	pub id: String,
	pub text: String,
	pub confidence: f64,
	pub style: CaptionStyle,
	pub model: CaptionModel,
	pub timestamp: DateTime<Utc>,
}

/// Per-request statistics reported by the backend.
#[derive(Default, Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct CaptionStats {
	pub processing_time: f64,
	pub num_captions: u32,
	pub average_confidence: f64,
	pub image_size: String,
}

#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct CaptionBatch {
	pub captions: Vec<Caption>,
	pub stats: CaptionStats,
}

#[derive(Default, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
	pub is_running: bool,
	pub device: Option<String>,
	pub models_loaded: Option<u32>,
}

/// Image bytes sent as the multipart `file` field.
#[derive(Clone, Debug)]
pub struct ImageUpload {
	pub file_name: String,
	pub content_type: String,
	pub bytes: Vec<u8>,
}

impl ImageUpload {
	pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
		Self {
			file_name: file_name.into(),
			content_type: content_type.into(),
			bytes,
		}
	}

	/// Reads `path`, guessing the content type from its extension.
	pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptionError> {
		let path = path.as_ref();
		let bytes = tokio::fs::read(path).await.map_err(|err| {
			CaptionError::InvalidImage(format!("Cannot read \"{}\": {err}", path.display()))
		})?;

		let file_name = path
			.file_name()
			.and_then(|name| Some(name.to_str()?.to_string()))
			.unwrap_or_else(|| String::from("image"));

		Ok(Self {
			content_type: super::helper::content_type_for(path).to_string(),
			file_name,
			bytes,
		})
	}
}

#[derive(Deserialize, Debug)]
pub(super) struct HealthResponse {
	pub status: String,
	pub device: Option<String>,
	pub models_loaded: Option<u32>,
}

#[derive(Deserialize, Debug)]
pub(super) struct WireCaption {
	pub id: String,
	pub text: String,
	pub confidence: f64,
	pub style: CaptionStyle,
	pub model: CaptionModel,
	/// Seconds since the Unix epoch.
	pub timestamp: f64,
}

#[derive(Deserialize, Debug)]
pub(super) struct CaptionResponse {
	pub success: bool,
	#[serde(default)]
	pub captions: Vec<WireCaption>,
	#[serde(default)]
	pub stats: CaptionStats,
}

#[derive(Deserialize, Debug)]
pub(super) struct SingleCaptionResponse {
	pub success: bool,
	pub caption: Option<WireCaption>,
}

#[derive(Deserialize, Debug)]
pub(super) struct ErrorBody {
	pub detail: Option<serde_json::Value>,
}
