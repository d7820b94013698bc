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

use std::time::Duration;

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "AUGUR_CAPTION_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionConfig {
	pub base_url: String,
	/// Probe made before every caption request.
	pub health_timeout: Duration,
	/// Background status poll.
	pub status_timeout: Duration,
	/// `/generate-captions`, which runs every model on the image.
	pub batch_timeout: Duration,
	/// `/generate-single-caption`.
	pub single_timeout: Duration,
}

impl Default for CaptionConfig {
	fn default() -> Self {
		Self {
			base_url: String::from(DEFAULT_BASE_URL),
			health_timeout: Duration::from_secs(5),
			status_timeout: Duration::from_secs(3),
			batch_timeout: Duration::from_secs(30),
			single_timeout: Duration::from_secs(20),
		}
	}
}

impl CaptionConfig {
	/// Defaults, with the base URL taken from [`BASE_URL_ENV`] when it is set and non-empty.
	pub fn from_env() -> Self {
		match std::env::var(BASE_URL_ENV) {
			Ok(found) if !found.trim().is_empty() => Self::default().with_base_url(found),
			_ => Self::default(),
		}
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	pub(super) fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url.trim_end_matches('/'), path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_point_at_local_backend() {
		let config = CaptionConfig::default();
		assert_eq!(config.base_url, "http://localhost:8000");
		assert_eq!(config.health_timeout, Duration::from_secs(5));
		assert_eq!(config.batch_timeout, Duration::from_secs(30));
	}

	#[test]
	fn endpoint_joins_without_double_slash() {
		let config = CaptionConfig::default().with_base_url("http://10.0.0.2:9000/");
		assert_eq!(config.endpoint("health"), "http://10.0.0.2:9000/health");
	}
}
