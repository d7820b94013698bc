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

use burn::{
	module::AutodiffModule,
	nn::loss::{MseLoss, Reduction::Mean},
	optim::{GradientsParams, Optimizer},
	prelude::*,
	tensor::{backend::AutodiffBackend, ElementConversion},
};
use rand::{rngs::StdRng, seq::SliceRandom};

use super::model::Regressor;
use super::typedef::*;
use crate::preprocess::typedef::WindowSet;

/// Packs feature rows into a `[rows, width]` tensor.
pub(crate) fn rows_to_tensor<B: Backend>(
	rows: &[Vec<f64>],
	width: usize,
	device: &B::Device,
) -> Tensor<B, 2> {
	let flatten = rows
		.iter()
		.flatten()
		.map(|each| *each as f32)
		.collect::<Vec<_>>();

	Tensor::from_data(TensorData::new(flatten, [rows.len(), width]), device)
}

/// Packs labels into a `[rows, 1]` tensor.
pub(crate) fn labels_to_tensor<B: Backend>(labels: &[f64], device: &B::Device) -> Tensor<B, 2> {
	let flatten = labels.iter().map(|each| *each as f32).collect::<Vec<_>>();

	Tensor::from_data(TensorData::new(flatten, [labels.len(), 1]), device)
}

/// Splits the windows chronologically: the oldest rows train, the newest `validation_split`
/// share validates. At least one row always trains.
pub(crate) fn send_windows_to_device<B: AutodiffBackend>(
	windows: &WindowSet,
	validation_split: f64,
	device: &B::Device,
) -> TrainInput<B> {
	let total = windows.len();
	let train_count = ((total as f64) * (1f64 - validation_split.clamp(0f64, 1f64))).floor() as usize;
	let train_count = train_count.clamp(1, total.max(1));

	let train_features = rows_to_tensor::<B>(&windows.features[..train_count], windows.width, device);
	let train_targets = labels_to_tensor::<B>(&windows.labels[..train_count], device);

	let valid = if train_count < total {
		let features =
			rows_to_tensor::<B>(&windows.features[train_count..], windows.width, device).valid();
		let targets = labels_to_tensor::<B>(&windows.labels[train_count..], device).valid();
		Some((features, targets))
	} else {
		None
	};

	TrainInput {
		train_features,
		train_targets,
		valid,
		train_count,
		valid_count: total - train_count,
	}
}

/// Mini-batch Adam over MSE. Training rows are reshuffled every epoch; `on_progress` fires after
/// each epoch's validation pass.
pub(crate) fn fit_model<B, M>(
	mut model: M,
	input: &TrainInput<B>,
	config: &TrainingConfig,
	rng: &mut StdRng,
	on_progress: &mut dyn FnMut(EpochProgress),
) -> (M, Option<EpochProgress>)
where
	B: AutodiffBackend,
	M: AutodiffModule<B> + Regressor<B>,
	M::InnerModule: Regressor<B::InnerBackend>,
{
	let mut optim = config.optimizer.init::<B, M>();
	let device = input.train_features.device();
	let batch_size = config.batch_size.max(1);
	let mut last_progress = None;

	for epoch in 1..=config.epochs {
		let mut order = (0..input.train_count as i64).collect::<Vec<_>>();
		order.shuffle(rng);

		// Training phase
		let mut train_loss = 0f64;
		for chunk in order.chunks(batch_size) {
			let indices = Tensor::<B, 1, Int>::from_data(
				TensorData::new(chunk.to_vec(), [chunk.len()]),
				&device,
			);
			let features = input.train_features.clone().select(0, indices.clone());
			let targets = input.train_targets.clone().select(0, indices);

			let output = model.regress(features);
			let loss = MseLoss::new().forward(output, targets, Mean);
			train_loss += loss.clone().into_scalar().elem::<f64>() * chunk.len() as f64;

			let grads = loss.backward();
			let grads = GradientsParams::from_grads(grads, &model);
			model = optim.step(config.lr, model, grads);
		}
		train_loss /= input.train_count.max(1) as f64;

		// Validation phase
		let valid_loss = input.valid.as_ref().map(|(features, targets)| {
			let model = model.valid();
			let output = model.regress(features.clone());
			MseLoss::new()
				.forward(output, targets.clone(), Mean)
				.into_scalar()
				.elem::<f64>()
		});

		let progress = EpochProgress {
			epoch,
			epochs: config.epochs,
			percent: epoch as f32 * 100f32 / config.epochs as f32,
			train_loss,
			valid_loss,
		};

		tracing::debug!(epoch, train_loss, ?valid_loss, "epoch finished");
		on_progress(progress.clone());
		last_progress = Some(progress);
	}

	(model, last_progress)
}

#[cfg(test)]
mod tests {
	use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
	use rand::SeedableRng;

	use super::*;
	use crate::train::model::PriceRegressorConfig;

	type B = Autodiff<NdArray>;

	fn windows(rows: usize) -> WindowSet {
		WindowSet {
			features: (0..rows)
				.map(|row| (0..10).map(|col| (row + col) as f64 / 100f64).collect())
				.collect(),
			labels: (0..rows).map(|row| (row + 10) as f64 / 100f64).collect(),
			width: 10,
		}
	}

	#[test]
	fn split_holds_out_newest_fifth() {
		let input = send_windows_to_device::<B>(&windows(390), 0.2, &NdArrayDevice::Cpu);

		assert_eq!(input.train_count, 312);
		assert_eq!(input.valid_count, 78);
		assert_eq!(input.train_features.dims(), [312, 10]);
		assert_eq!(input.train_targets.dims(), [312, 1]);
		let (features, targets) = input.valid.unwrap();
		assert_eq!(features.dims(), [78, 10]);
		assert_eq!(targets.dims(), [78, 1]);
	}

	#[test]
	fn single_example_trains_without_validation() {
		let input = send_windows_to_device::<B>(&windows(1), 0.2, &NdArrayDevice::Cpu);

		assert_eq!(input.train_count, 1);
		assert_eq!(input.valid_count, 0);
		assert!(input.valid.is_none());
	}

	#[test]
	fn fit_reports_every_epoch_in_order() {
		let device = NdArrayDevice::Cpu;
		let input = send_windows_to_device::<B>(&windows(40), 0.2, &device);
		let config = TrainingConfig::linear().with_epochs(4).with_batch_size(8);
		let model = PriceRegressorConfig::new().init::<B>(&device);
		let mut rng = StdRng::seed_from_u64(3);

		let mut seen = Vec::new();
		let (_, last) = fit_model(model, &input, &config, &mut rng, &mut |progress| {
			seen.push(progress)
		});

		assert_eq!(
			seen.iter().map(|each| each.epoch).collect::<Vec<_>>(),
			vec![1, 2, 3, 4]
		);
		assert_eq!(seen.last().unwrap().percent, 100f32);
		assert_eq!(seen[0].percent, 25f32);
		assert!(seen.iter().all(|each| each.train_loss.is_finite()));
		assert!(seen.iter().all(|each| each.valid_loss.is_some()));
		assert_eq!(last.as_ref(), seen.last());
	}
}
