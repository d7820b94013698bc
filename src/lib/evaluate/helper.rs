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

use std::{collections::VecDeque, ops::RangeInclusive};

use chrono::NaiveDate;
use rand::{rngs::StdRng, Rng};

use crate::typedef::Prediction;

/// Autoregressive rollout. `infer` sees the current window and returns the predicted value along
/// with the step to append; the oldest step is dropped after every prediction.
pub(crate) fn roll_forward<T>(
	window: Vec<T>,
	steps: usize,
	mut infer: impl FnMut(&[T]) -> (f64, T),
) -> Vec<f64> {
	let mut window = VecDeque::from(window);

	(0..steps)
		.map(|_| {
			let (predicted, next_step) = infer(window.make_contiguous());
			window.pop_front();
			window.push_back(next_step);
			predicted
		})
		.collect()
}

/// Dates the forecast values one day apart, starting the day after `last_date`.
pub(crate) fn into_predictions(
	values: Vec<f64>,
	last_date: NaiveDate,
	confidence: RangeInclusive<f64>,
	rng: &mut StdRng,
) -> Vec<Prediction> {
	last_date
		.iter_days()
		.skip(1)
		.zip(values)
		.map(|(date, predicted)| Prediction {
			date,
			actual: None,
			predicted: (predicted * 100f64).round() / 100f64,
			confidence: rng.random_range(confidence.clone()),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;

	#[test]
	fn rollout_feeds_predictions_back() {
		let mut seen = Vec::new();
		let values = roll_forward(vec![1f64, 2f64, 3f64], 3, |window| {
			seen.push(window.to_vec());
			let next = window.iter().sum::<f64>();
			(next, next)
		});

		assert_eq!(values, vec![6f64, 11f64, 20f64]);
		assert_eq!(seen[0], vec![1f64, 2f64, 3f64]);
		assert_eq!(seen[1], vec![2f64, 3f64, 6f64]);
		assert_eq!(seen[2], vec![3f64, 6f64, 11f64]);
	}

	#[test]
	fn rollout_of_zero_steps_is_empty() {
		let values = roll_forward(vec![1f64], 0, |_| unreachable!());
		assert!(values.is_empty());
	}

	#[test]
	fn predictions_start_the_next_day() {
		let last_date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
		let mut rng = StdRng::seed_from_u64(9);
		let predictions = into_predictions(
			vec![101.234f64, 102f64, 103f64],
			last_date,
			0.7f64..=0.9f64,
			&mut rng,
		);

		assert_eq!(predictions.len(), 3);
		assert_eq!(predictions[0].date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
		assert_eq!(predictions[1].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
		assert_eq!(predictions[0].predicted, 101.23f64);
		assert!(predictions.iter().all(|each| each.actual.is_none()));
		assert!(predictions
			.iter()
			.all(|each| (0.7f64..=0.9f64).contains(&each.confidence)));
	}
}
