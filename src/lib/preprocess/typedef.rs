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

use crate::typedef::MinMax;

/// Trailing closes fed to the linear network.
pub const LINEAR_LOOKBACK: usize = 10;

/// Trailing (close, volume) steps fed to the neural network.
pub const NEURAL_LOOKBACK: usize = 20;

/// Supervised examples built by sliding a lookback window over a series.
#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WindowSet {
	pub features: Vec<Vec<f64>>,
	pub labels: Vec<f64>,
	/// Length of every feature row.
	pub width: usize,
}

impl WindowSet {
	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}
}

#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedWindowSet {
	pub windows: WindowSet,
	pub price_range: MinMax,
	pub volume_range: MinMax,
}
