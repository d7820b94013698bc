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
	nn::{Dropout, DropoutConfig, Linear, LinearConfig},
	prelude::*,
	tensor::activation::{relu, sigmoid},
};

/// Forward pass shared by every network a forecaster fits.
pub(crate) trait Regressor<B: Backend> {
	/// Maps `[batch, features]` to `[batch, 1]`.
	fn regress(&self, input: Tensor<B, 2>) -> Tensor<B, 2>;
}

/// Dense network over raw closing prices: 10 → 32 → 16 → 1.
#[derive(Module, Debug)]
pub struct PriceRegressor<B: Backend> {
	input: Linear<B>,
	dropout: Dropout,
	hidden: Linear<B>,
	output: Linear<B>,
}

#[derive(Config, Debug)]
pub struct PriceRegressorConfig {
	#[config(default = 10)]
	pub input_size: usize,
	#[config(default = 32)]
	pub hidden_size: usize,
	#[config(default = 16)]
	pub bottleneck_size: usize,
	#[config(default = 0.2)]
	pub dropout: f64,
}

impl PriceRegressorConfig {
	pub fn init<B: Backend>(&self, device: &B::Device) -> PriceRegressor<B> {
		PriceRegressor {
			input: LinearConfig::new(self.input_size, self.hidden_size).init(device),
			dropout: DropoutConfig::new(self.dropout).init(),
			hidden: LinearConfig::new(self.hidden_size, self.bottleneck_size).init(device),
			output: LinearConfig::new(self.bottleneck_size, 1).init(device),
		}
	}
}

impl<B: Backend> PriceRegressor<B> {
	pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
		let x = relu(self.input.forward(input));
		let x = self.dropout.forward(x);
		let x = relu(self.hidden.forward(x));

		self.output.forward(x)
	}
}

impl<B: Backend> Regressor<B> for PriceRegressor<B> {
	fn regress(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
		self.forward(input)
	}
}

/// Dense network over interleaved normalized (close, volume) steps: 40 → 64 → 32 → 16 → 1.
/// The sigmoid head keeps the output inside the normalized price range.
#[derive(Module, Debug)]
pub struct PriceVolumeNetwork<B: Backend> {
	input: Linear<B>,
	first_dropout: Dropout,
	hidden: Linear<B>,
	second_dropout: Dropout,
	bottleneck: Linear<B>,
	output: Linear<B>,
}

#[derive(Config, Debug)]
pub struct PriceVolumeNetworkConfig {
	#[config(default = 40)]
	pub input_size: usize,
	#[config(default = 64)]
	pub hidden_size: usize,
	#[config(default = 32)]
	pub second_hidden_size: usize,
	#[config(default = 16)]
	pub bottleneck_size: usize,
	#[config(default = 0.3)]
	pub first_dropout: f64,
	#[config(default = 0.2)]
	pub second_dropout: f64,
}

impl PriceVolumeNetworkConfig {
	pub fn init<B: Backend>(&self, device: &B::Device) -> PriceVolumeNetwork<B> {
		PriceVolumeNetwork {
			input: LinearConfig::new(self.input_size, self.hidden_size).init(device),
			first_dropout: DropoutConfig::new(self.first_dropout).init(),
			hidden: LinearConfig::new(self.hidden_size, self.second_hidden_size).init(device),
			second_dropout: DropoutConfig::new(self.second_dropout).init(),
			bottleneck: LinearConfig::new(self.second_hidden_size, self.bottleneck_size)
				.init(device),
			output: LinearConfig::new(self.bottleneck_size, 1).init(device),
		}
	}
}

impl<B: Backend> PriceVolumeNetwork<B> {
	pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
		let x = relu(self.input.forward(input));
		let x = self.first_dropout.forward(x);
		let x = relu(self.hidden.forward(x));
		let x = self.second_dropout.forward(x);
		let x = relu(self.bottleneck.forward(x));

		sigmoid(self.output.forward(x))
	}
}

impl<B: Backend> Regressor<B> for PriceVolumeNetwork<B> {
	fn regress(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
		self.forward(input)
	}
}

#[cfg(test)]
mod tests {
	use burn::backend::{ndarray::NdArrayDevice, NdArray};

	use super::*;

	#[test]
	fn regressor_maps_rows_to_single_output() {
		let device = NdArrayDevice::Cpu;
		let model = PriceRegressorConfig::new().init::<NdArray>(&device);
		let input = Tensor::<NdArray, 2>::zeros([4, 10], &device);

		assert_eq!(model.forward(input).dims(), [4, 1]);
	}

	#[test]
	fn price_volume_output_stays_in_unit_range() {
		let device = NdArrayDevice::Cpu;
		let model = PriceVolumeNetworkConfig::new().init::<NdArray>(&device);
		let input = Tensor::<NdArray, 2>::ones([3, 40], &device);
		let output = model.forward(input);

		assert_eq!(output.dims(), [3, 1]);
		for each in output.into_data().iter::<f64>() {
			assert!((0f64..=1f64).contains(&each));
		}
	}
}
