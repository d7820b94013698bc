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

use burn::backend::{Autodiff, NdArray};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Backend used for the forward/backward passes while fitting a network.
pub type TrainBackend = Autodiff<NdArray>;

/// Backend a trained network is kept on for forecasting.
pub type InferBackend = NdArray;

/// One trading day of synthetic market data.
#[derive(Default, Deserialize, Serialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
	pub date: NaiveDate,
	pub open: f64,
	pub high: f64,
	pub low: f64,
	pub close: f64,
	pub volume: u64,
}

/// Bars of a single symbol, one per calendar day in ascending order.
#[derive(Default, Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StockSeries {
	pub symbol: String,
	pub bars: Vec<Bar>,
}

impl StockSeries {
	pub fn closes(&self) -> Vec<f64> {
		self.bars.iter().map(|each| each.close).collect()
	}

	pub fn last_date(&self) -> Option<NaiveDate> {
		self.bars.last().map(|each| each.date)
	}
}

/// A forecast for one day past the known data.
#[derive(Default, Deserialize, Serialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
	pub date: NaiveDate,
	/// Always `None` for a forecast; the real close is not known yet.
	pub actual: Option<f64>,
	pub predicted: f64,
	pub confidence: f64,
}

/// Observed range of a column, used for min-max scaling.
#[derive(Default, Deserialize, Serialize, Clone, Copy, PartialEq, Debug)]
pub struct MinMax {
	pub min: f64,
	pub max: f64,
}

impl MinMax {
	pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
		values.into_iter().fold(None, |range, each| match range {
			None => Some(MinMax {
				min: each,
				max: each,
			}),
			Some(found) => Some(MinMax {
				min: found.min.min(each),
				max: found.max.max(each),
			}),
		})
	}

	pub fn span(&self) -> f64 {
		self.max - self.min
	}

	/// Maps `value` into `[0, 1]`. A flat range maps everything to 0.
	pub fn normalize(&self, value: f64) -> f64 {
		let span = self.span();
		if span == 0f64 {
			return 0f64;
		}

		(value - self.min) / span
	}

	pub fn denormalize(&self, value: f64) -> f64 {
		value * self.span() + self.min
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn min_max_tracks_extremes() {
		let range = MinMax::of([3f64, -1f64, 7f64, 2f64]).unwrap();
		assert_eq!(range.min, -1f64);
		assert_eq!(range.max, 7f64);
		assert!(MinMax::of(Vec::<f64>::new()).is_none());
	}

	#[test]
	fn normalize_then_denormalize_restores_value() {
		let range = MinMax {
			min: 50f64,
			max: 150f64,
		};
		assert_eq!(range.normalize(100f64), 0.5f64);
		assert_eq!(range.denormalize(0.25f64), 75f64);
	}

	#[test]
	fn flat_range_normalizes_to_zero() {
		let range = MinMax {
			min: 10f64,
			max: 10f64,
		};
		assert_eq!(range.normalize(10f64), 0f64);
		assert_eq!(range.denormalize(0.9f64), 10f64);
	}
}
