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

use super::typedef::*;
use crate::error::MetricsError;

pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<Metrics, MetricsError> {
	if actual.len() != predicted.len() {
		return Err(MetricsError::LengthMismatch {
			actual: actual.len(),
			predicted: predicted.len(),
		});
	}

	let n = actual.len();
	if n < 2 {
		return Err(MetricsError::TooFewPoints(n));
	}

	let (squared, absolute) = actual.iter().zip(predicted).fold(
		(0f64, 0f64),
		|(squared, absolute), (a, p)| {
			let error = a - p;
			(squared + error * error, absolute + error.abs())
		},
	);
	let mse = squared / n as f64;
	let mae = absolute / n as f64;

	// Zero actuals have no defined percentage error
	let (percentage, counted) = actual
		.iter()
		.zip(predicted)
		.filter(|(a, _)| **a != 0f64)
		.fold((0f64, 0usize), |(sum, count), (a, p)| {
			(sum + ((a - p) / a).abs(), count + 1)
		});
	let mape = match counted {
		0 => 0f64,
		_ => percentage / counted as f64 * 100f64,
	};

	let correct_direction = actual
		.windows(2)
		.zip(predicted.windows(2))
		.filter(|(a, p)| (a[1] > a[0]) == (p[1] > p[0]))
		.count();
	let accuracy = correct_direction as f64 / (n - 1) as f64 * 100f64;

	Ok(Metrics {
		mse,
		mae,
		rmse: mse.sqrt(),
		mape,
		accuracy,
	})
}
