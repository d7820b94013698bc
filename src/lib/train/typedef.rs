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
	grad_clipping::GradientClippingConfig,
	optim::AdamConfig,
	tensor::{backend::AutodiffBackend, Tensor},
};
use serde::Serialize;

/// Emitted once at the end of every epoch, in epoch order.
#[derive(Default, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpochProgress {
	pub epoch: usize,
	pub epochs: usize,
	/// `epoch / epochs * 100`.
	pub percent: f32,
	pub train_loss: f64,
	/// `None` when every example went to the training split.
	pub valid_loss: Option<f64>,
}

#[derive(Default, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainSummary {
	pub examples: usize,
	pub train_examples: usize,
	pub valid_examples: usize,
	pub epochs: usize,
	pub final_train_loss: f64,
	pub final_valid_loss: Option<f64>,
}

#[derive(burn::config::Config)]
pub struct TrainingConfig {
	pub optimizer: AdamConfig,

	#[config(default = 1e-3)]
	pub lr: f64,

	#[config(default = 100)]
	pub epochs: usize,

	#[config(default = 32)]
	pub batch_size: usize,

	/// Share of the newest examples held out for validation.
	#[config(default = 0.2)]
	pub validation_split: f64,
}

impl TrainingConfig {
	/// Hyper-parameters of the closing-price regressor.
	pub fn linear() -> Self {
		Self::new(clipped_adam())
	}

	/// Hyper-parameters of the price/volume network.
	pub fn neural() -> Self {
		Self::new(clipped_adam())
			.with_lr(1e-4)
			.with_epochs(150)
			.with_batch_size(16)
	}
}

fn clipped_adam() -> AdamConfig {
	AdamConfig::new().with_grad_clipping(Some(GradientClippingConfig::Norm(1.0)))
}

pub(crate) struct TrainInput<B: AutodiffBackend> {
	pub train_features: Tensor<B, 2>,
	pub train_targets: Tensor<B, 2>,
	pub valid: Option<(Tensor<B::InnerBackend, 2>, Tensor<B::InnerBackend, 2>)>,
	pub train_count: usize,
	pub valid_count: usize,
}
