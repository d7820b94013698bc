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

use reqwest::{
	multipart::{Form, Part},
	Client, Response,
};
use serde::de::DeserializeOwned;

use super::config::CaptionConfig;
use super::helper::*;
use super::typedef::*;
use crate::error::CaptionError;

/// Client of the caption inference server. Every call is a single attempt.
#[derive(Clone, Debug)]
pub struct CaptionClient {
	client: Client,
	config: CaptionConfig,
}

impl CaptionClient {
	pub fn new(config: CaptionConfig) -> Result<Self, CaptionError> {
		let client = Client::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()
			.map_err(classify_transport)?;

		Ok(Self { client, config })
	}

	pub fn config(&self) -> &CaptionConfig {
		&self.config
	}

	/// `true` only when `/health` answers with `status: "healthy"`. Never fails.
	pub async fn check_health(&self) -> bool {
		let response = self
			.client
			.get(self.config.endpoint("health"))
			.timeout(self.config.health_timeout)
			.send()
			.await;

		let response = match response {
			Ok(ok) if ok.status().is_success() => ok,
			Ok(ok) => {
				tracing::warn!(status = %ok.status(), "caption server health check rejected");
				return false;
			}
			Err(err) => {
				tracing::warn!(error = %err, "caption server health check failed");
				return false;
			}
		};

		match response.json::<HealthResponse>().await {
			Ok(health) => health.status == "healthy",
			Err(err) => {
				tracing::warn!(error = %err, "caption server health body unreadable");
				false
			}
		}
	}

	/// Background status poll. Any failure degrades to `is_running: false`.
	pub async fn check_status(&self) -> ServerStatus {
		let response = self
			.client
			.get(self.config.endpoint("health"))
			.timeout(self.config.status_timeout)
			.send()
			.await;

		match response {
			Ok(ok) if ok.status().is_success() => match ok.json::<HealthResponse>().await {
				Ok(health) => ServerStatus {
					is_running: true,
					device: health.device,
					models_loaded: health.models_loaded,
				},
				Err(_) => ServerStatus {
					is_running: true,
					..Default::default()
				},
			},
			_ => ServerStatus::default(),
		}
	}

	/// Runs every captioning model of the backend on `image`.
	pub async fn generate_captions(&self, image: &ImageUpload) -> Result<CaptionBatch, CaptionError> {
		self.ensure_healthy().await?;

		tracing::info!(file = %image.file_name, bytes = image.bytes.len(), "requesting captions");

		let response = self
			.client
			.post(self.config.endpoint("generate-captions"))
			.multipart(image_form(image)?)
			.timeout(self.config.batch_timeout)
			.send()
			.await
			.map_err(classify_transport)?;

		let body = read_json::<CaptionResponse>(response).await?;
		if !body.success {
			return Err(CaptionError::Unknown(String::from("Failed to generate captions")));
		}

		let captions = body
			.captions
			.into_iter()
			.map(caption_from_wire)
			.collect::<Result<Vec<_>, _>>()?;

		Ok(CaptionBatch {
			captions,
			stats: body.stats,
		})
	}

	/// Runs the single model matching `style` on `image`.
	pub async fn generate_single_caption(
		&self,
		image: &ImageUpload,
		style: CaptionStyle,
	) -> Result<Caption, CaptionError> {
		self.ensure_healthy().await?;

		tracing::info!(file = %image.file_name, %style, "requesting single caption");

		let response = self
			.client
			.post(self.config.endpoint("generate-single-caption"))
			.query(&[("style", style.to_string())])
			.multipart(image_form(image)?)
			.timeout(self.config.single_timeout)
			.send()
			.await
			.map_err(classify_transport)?;

		let body = read_json::<SingleCaptionResponse>(response).await?;
		match body.caption {
			Some(caption) if body.success => caption_from_wire(caption),
			_ => Err(CaptionError::Unknown(String::from("Failed to generate caption"))),
		}
	}

	async fn ensure_healthy(&self) -> Result<(), CaptionError> {
		if self.check_health().await {
			return Ok(());
		}

		Err(CaptionError::BackendUnavailable(String::from(MESSAGE_OFFLINE)))
	}
}

fn image_form(image: &ImageUpload) -> Result<Form, CaptionError> {
	let part = Part::bytes(image.bytes.clone())
		.file_name(image.file_name.clone())
		.mime_str(&image.content_type)
		.map_err(|_| CaptionError::InvalidImage(String::from(MESSAGE_INVALID_IMAGE)))?;

	Ok(Form::new().part("file", part))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CaptionError> {
	let status = response.status();
	if status.is_success() {
		return response.json::<T>().await.map_err(classify_transport);
	}

	let body = response.text().await.unwrap_or_default();
	Err(classify_status(status, &body))
}
