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

use std::{ops::RangeInclusive, sync::atomic::AtomicBool, sync::Mutex};

use burn::{
	backend::ndarray::NdArrayDevice,
	module::AutodiffModule,
	prelude::*,
	tensor::ElementConversion,
};
use rand::Rng;

use super::*;
use crate::evaluate::{
	command::calculate_metrics,
	helper::{into_predictions, roll_forward},
};
use crate::preprocess::{command::close_windows, typedef::LINEAR_LOOKBACK};
use crate::train::{
	helper::{fit_model, rows_to_tensor, send_windows_to_device},
	model::{PriceRegressor, PriceRegressorConfig},
	typedef::TrainingConfig,
};
use crate::typedef::{InferBackend, TrainBackend};

const CONFIDENCE: RangeInclusive<f64> = 0.7f64..=0.9f64;

/// Dense regressor over the last [`LINEAR_LOOKBACK`] raw closes.
pub struct LinearForecaster {
	network: PriceRegressorConfig,
	config: TrainingConfig,
	seed: Option<u64>,
	training: AtomicBool,
	trained: Mutex<Option<PriceRegressor<InferBackend>>>,
}

impl Default for LinearForecaster {
	fn default() -> Self {
		Self::new()
	}
}

impl LinearForecaster {
	pub fn new() -> Self {
		Self::with_config(TrainingConfig::linear())
	}

	pub fn with_config(config: TrainingConfig) -> Self {
		Self {
			network: PriceRegressorConfig::new().with_input_size(LINEAR_LOOKBACK),
			config,
			seed: None,
			training: AtomicBool::new(false),
			trained: Mutex::new(None),
		}
	}

	/// Makes weight initialization, shuffling and confidence draws reproducible.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	pub fn metrics(&self, actual: &[f64], predicted: &[f64]) -> Result<Metrics, ForecastError> {
		Ok(calculate_metrics(actual, predicted)?)
	}

	fn trained_model(&self) -> Result<PriceRegressor<InferBackend>, ForecastError> {
		self.trained
			.lock()
			.map_err(state_error)?
			.clone()
			.ok_or(ForecastError::NotTrained)
	}
}

impl Forecaster for LinearForecaster {
	fn kind(&self) -> ModelKind {
		ModelKind::Linear
	}

	fn lookback(&self) -> usize {
		LINEAR_LOOKBACK
	}

	fn is_trained(&self) -> bool {
		self.trained
			.lock()
			.map(|guarded| guarded.is_some())
			.unwrap_or(false)
	}

	fn train(
		&self,
		bars: &[Bar],
		on_progress: &mut dyn FnMut(EpochProgress),
	) -> Result<TrainSummary, ForecastError> {
		let _guard = TrainingGuard::acquire(&self.training)?;
		require_bars(bars, LINEAR_LOOKBACK + 1)?;

		let device = NdArrayDevice::Cpu;
		let mut rng = make_rng(self.seed);
		TrainBackend::seed(rng.random());

		let windows = close_windows(bars, LINEAR_LOOKBACK);
		let input = send_windows_to_device::<TrainBackend>(
			&windows,
			self.config.validation_split,
			&device,
		);

		tracing::info!(
			examples = windows.len(),
			epochs = self.config.epochs,
			"training linear forecaster"
		);

		let model = self.network.init::<TrainBackend>(&device);
		let (model, last_progress) = fit_model(model, &input, &self.config, &mut rng, on_progress);

		*self.trained.lock().map_err(state_error)? = Some(model.valid());

		Ok(TrainSummary {
			examples: windows.len(),
			train_examples: input.train_count,
			valid_examples: input.valid_count,
			epochs: self.config.epochs,
			final_train_loss: last_progress
				.as_ref()
				.map(|found| found.train_loss)
				.unwrap_or_default(),
			final_valid_loss: last_progress.and_then(|found| found.valid_loss),
		})
	}

	fn predict(&self, bars: &[Bar], steps: usize) -> Result<Vec<Prediction>, ForecastError> {
		let model = self.trained_model()?;
		require_bars(bars, LINEAR_LOOKBACK)?;

		let device = NdArrayDevice::Cpu;
		let last_date = bars[bars.len() - 1].date;
		let window = bars[bars.len() - LINEAR_LOOKBACK..]
			.iter()
			.map(|each| each.close)
			.collect::<Vec<_>>();

		let values = roll_forward(window, steps, |window| {
			let input = rows_to_tensor::<InferBackend>(&[window.to_vec()], LINEAR_LOOKBACK, &device);
			let predicted = model.forward(input).into_scalar().elem::<f64>();
			(predicted, predicted)
		});

		let mut rng = make_rng(self.seed.map(|seed| seed.wrapping_add(1)));
		Ok(into_predictions(values, last_date, CONFIDENCE, &mut rng))
	}

	fn evaluate(&self, bars: &[Bar]) -> Result<Metrics, ForecastError> {
		let model = self.trained_model()?;

		let tail = &bars[bars.len().saturating_sub(EVALUATION_TAIL)..];
		let windows = close_windows(tail, LINEAR_LOOKBACK);
		// Direction accuracy needs at least two scored windows.
		if windows.len() < 2 {
			return Err(ForecastError::InsufficientData {
				required: LINEAR_LOOKBACK + 2,
				available: bars.len(),
			});
		}

		let input =
			rows_to_tensor::<InferBackend>(&windows.features, windows.width, &NdArrayDevice::Cpu);
		let predicted = model
			.forward(input)
			.into_data()
			.iter::<f64>()
			.collect::<Vec<_>>();

		Ok(calculate_metrics(&windows.labels, &predicted)?)
	}
}
