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

use serde::Serialize;

use super::typedef::*;

/// Running totals over a session of caption requests. Folding returns a new snapshot.
#[derive(Default, Serialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
	pub total_images: u64,
	pub total_captions: u64,
	/// Confidence of the latest request, not of the whole session.
	pub average_confidence: f64,
	/// Seconds the backend spent on the latest request; 0 for single captions.
	pub processing_time: f64,
	pub image_size: Option<String>,
}

impl SessionStats {
	pub fn record_batch(&self, batch: &CaptionBatch) -> SessionStats {
		let average_confidence = match batch.captions.len() {
			0 => 0f64,
			count => batch.captions.iter().map(|each| each.confidence).sum::<f64>() / count as f64,
		};

		SessionStats {
			total_images: self.total_images + 1,
			total_captions: self.total_captions + batch.captions.len() as u64,
			average_confidence,
			processing_time: batch.stats.processing_time,
			image_size: Some(batch.stats.image_size.clone()),
		}
	}

	pub fn record_single(&self, caption: &Caption) -> SessionStats {
		SessionStats {
			total_images: self.total_images + 1,
			total_captions: self.total_captions + 1,
			average_confidence: caption.confidence,
			processing_time: 0f64,
			image_size: self.image_size.clone(),
		}
	}
}
