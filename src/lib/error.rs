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

use thiserror::Error;

/// Rejected inputs to the metrics calculator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
	#[error("actual has {actual} values but predicted has {predicted}")]
	LengthMismatch { actual: usize, predicted: usize },

	/// Direction accuracy needs at least one consecutive pair.
	#[error("at least 2 points are required, got {0}")]
	TooFewPoints(usize),
}

/// Errors raised by a forecaster while training, predicting or scoring.
#[derive(Debug, Error)]
pub enum ForecastError {
	#[error("Model not trained")]
	NotTrained,

	#[error("Not enough data: {required} bars are required, got {available}")]
	InsufficientData { required: usize, available: usize },

	#[error("This model is already being trained")]
	ConcurrentTraining,

	#[error("Invalid input: {0}")]
	InvalidInput(#[from] MetricsError),

	/// The stored model or a worker thread could not be reached.
	#[error("Model state inaccessible: {0}")]
	State(String),
}

impl ForecastError {
	/// Whether this is a model misuse (untrained model or too little data).
	pub fn is_model_error(&self) -> bool {
		matches!(
			self,
			ForecastError::NotTrained | ForecastError::InsufficientData { .. }
		)
	}
}

/// User-facing failures of the caption client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptionError {
	#[error("{0}")]
	BackendUnavailable(String),

	#[error("{0}")]
	InvalidImage(String),

	#[error("{0}")]
	InferenceFailure(String),

	#[error("{0}")]
	RequestTimeout(String),

	#[error("{0}")]
	Unknown(String),
}

impl CaptionError {
	/// Whether the caller should flip its "server online" indicator off.
	pub fn is_backend_offline(&self) -> bool {
		matches!(self, CaptionError::BackendUnavailable(_))
	}
}
