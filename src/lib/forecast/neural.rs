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
use crate::preprocess::{
	command::{close_volume_windows, close_volume_windows_in},
	helper::interleave,
	typedef::NEURAL_LOOKBACK,
};
use crate::train::{
	helper::{fit_model, rows_to_tensor, send_windows_to_device},
	model::{PriceVolumeNetwork, PriceVolumeNetworkConfig},
	typedef::TrainingConfig,
};
use crate::typedef::{InferBackend, MinMax, TrainBackend};

const CONFIDENCE: RangeInclusive<f64> = 0.6f64..=0.9f64;

/// Normalized volume assumed for every forecast step, since future volume is unknown.
const NEUTRAL_VOLUME: f64 = 0.5f64;

/// Step appended to the rollout window after predicting `close`.
fn next_step(close: f64) -> (f64, f64) {
	(close, NEUTRAL_VOLUME)
}

#[derive(Clone)]
struct TrainedNetwork {
	model: PriceVolumeNetwork<InferBackend>,
	price_range: MinMax,
	volume_range: MinMax,
}

/// Dense network over the last [`NEURAL_LOOKBACK`] normalized (close, volume) pairs.
pub struct NeuralForecaster {
	network: PriceVolumeNetworkConfig,
	config: TrainingConfig,
	seed: Option<u64>,
	training: AtomicBool,
	trained: Mutex<Option<TrainedNetwork>>,
}

impl Default for NeuralForecaster {
	fn default() -> Self {
		Self::new()
	}
}

impl NeuralForecaster {
	pub fn new() -> Self {
		Self::with_config(TrainingConfig::neural())
	}

	pub fn with_config(config: TrainingConfig) -> Self {
		Self {
			network: PriceVolumeNetworkConfig::new().with_input_size(NEURAL_LOOKBACK * 2),
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

	/// Close and volume ranges captured by the last successful training run.
	pub fn ranges(&self) -> Option<(MinMax, MinMax)> {
		self.trained
			.lock()
			.ok()?
			.as_ref()
			.map(|found| (found.price_range, found.volume_range))
	}

	fn trained_network(&self) -> Result<TrainedNetwork, ForecastError> {
		self.trained
			.lock()
			.map_err(state_error)?
			.clone()
			.ok_or(ForecastError::NotTrained)
	}
}

impl Forecaster for NeuralForecaster {
	fn kind(&self) -> ModelKind {
		ModelKind::Neural
	}

	fn lookback(&self) -> usize {
		NEURAL_LOOKBACK
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
		require_bars(bars, NEURAL_LOOKBACK + 1)?;

		let device = NdArrayDevice::Cpu;
		let mut rng = make_rng(self.seed);
		TrainBackend::seed(rng.random());

		let normalized = close_volume_windows(bars, NEURAL_LOOKBACK);
		let input = send_windows_to_device::<TrainBackend>(
			&normalized.windows,
			self.config.validation_split,
			&device,
		);

		tracing::info!(
			examples = normalized.windows.len(),
			epochs = self.config.epochs,
			"training neural forecaster"
		);

		let model = self.network.init::<TrainBackend>(&device);
		let (model, last_progress) = fit_model(model, &input, &self.config, &mut rng, on_progress);

		*self.trained.lock().map_err(state_error)? = Some(TrainedNetwork {
			model: model.valid(),
			price_range: normalized.price_range,
			volume_range: normalized.volume_range,
		});

		Ok(TrainSummary {
			examples: normalized.windows.len(),
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
		let trained = self.trained_network()?;
		require_bars(bars, NEURAL_LOOKBACK)?;

		let device = NdArrayDevice::Cpu;
		let last_date = bars[bars.len() - 1].date;
		let window = bars[bars.len() - NEURAL_LOOKBACK..]
			.iter()
			.map(|each| {
				(
					trained.price_range.normalize(each.close),
					trained.volume_range.normalize(each.volume as f64),
				)
			})
			.collect::<Vec<_>>();

		let values = roll_forward(window, steps, |window| {
			let features = interleave(
				window.iter().map(|(close, _)| close),
				window.iter().map(|(_, volume)| volume),
			);
			let input = rows_to_tensor::<InferBackend>(&[features], NEURAL_LOOKBACK * 2, &device);
			let predicted = trained.model.forward(input).into_scalar().elem::<f64>();
			(predicted, next_step(predicted))
		});

		let values = values
			.into_iter()
			.map(|each| trained.price_range.denormalize(each))
			.collect::<Vec<_>>();

		let mut rng = make_rng(self.seed.map(|seed| seed.wrapping_add(1)));
		Ok(into_predictions(values, last_date, CONFIDENCE, &mut rng))
	}

	fn evaluate(&self, bars: &[Bar]) -> Result<Metrics, ForecastError> {
		let trained = self.trained_network()?;

		let tail = &bars[bars.len().saturating_sub(EVALUATION_TAIL)..];
		let normalized = close_volume_windows_in(
			tail,
			NEURAL_LOOKBACK,
			trained.price_range,
			trained.volume_range,
		);
		// Direction accuracy needs at least two scored windows.
		if normalized.windows.len() < 2 {
			return Err(ForecastError::InsufficientData {
				required: NEURAL_LOOKBACK + 2,
				available: bars.len(),
			});
		}

		let input = rows_to_tensor::<InferBackend>(
			&normalized.windows.features,
			normalized.windows.width,
			&NdArrayDevice::Cpu,
		);
		let predicted = trained
			.model
			.forward(input)
			.into_data()
			.iter::<f64>()
			.map(|each| trained.price_range.denormalize(each))
			.collect::<Vec<_>>();
		let actual = normalized
			.windows
			.labels
			.iter()
			.map(|each| trained.price_range.denormalize(*each))
			.collect::<Vec<_>>();

		Ok(calculate_metrics(&actual, &predicted)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rollout_holds_volume_at_midpoint() {
		assert_eq!(next_step(0.42f64), (0.42f64, 0.5f64));

		let mut seen = Vec::new();
		roll_forward(vec![(0.1f64, 0.9f64); 3], 3, |window| {
			seen.push(window.to_vec());
			(0.7f64, next_step(0.7f64))
		});

		assert_eq!(seen[2], vec![(0.1f64, 0.9f64), (0.7f64, 0.5f64), (0.7f64, 0.5f64)]);
	}

	#[test]
	fn untrained_network_has_no_ranges() {
		let forecaster = NeuralForecaster::new();
		assert!(forecaster.ranges().is_none());
		assert!(!forecaster.is_trained());
		assert_eq!(forecaster.lookback(), 20);
	}
}
