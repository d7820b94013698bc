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

use std::sync::atomic::{AtomicBool, Ordering};

use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::ForecastError;
use crate::evaluate::typedef::Metrics;
use crate::train::typedef::{EpochProgress, TrainSummary};
use crate::typedef::{Bar, Prediction};

pub mod command;
mod linear;
mod neural;

pub use linear::LinearForecaster;
pub use neural::NeuralForecaster;

/// Forecast length used when the caller has no preference.
pub const DEFAULT_STEPS: usize = 5;

/// Number of newest bars scored by [`Forecaster::evaluate`].
pub const EVALUATION_TAIL: usize = 100;

#[derive(PartialEq, Eq, EnumIter, EnumString, Display, Serialize, Clone, Copy, Debug)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
	Linear,
	Neural,
}

/// A trainable next-close predictor.
///
/// Every method takes `&self` so one instance can be shared between a training task and readers.
/// Only one `train` may run per instance; a second call made while the first is still running
/// fails with [`ForecastError::ConcurrentTraining`].
pub trait Forecaster: Send + Sync {
	fn kind(&self) -> ModelKind;

	/// Number of trailing bars consumed per prediction.
	fn lookback(&self) -> usize;

	fn is_trained(&self) -> bool;

	/// Fits a fresh network on `bars`, replacing any previously trained one on success.
	/// `on_progress` fires once per epoch.
	fn train(
		&self,
		bars: &[Bar],
		on_progress: &mut dyn FnMut(EpochProgress),
	) -> Result<TrainSummary, ForecastError>;

	/// Forecasts `steps` days past the last bar, feeding each prediction back as input.
	fn predict(&self, bars: &[Bar], steps: usize) -> Result<Vec<Prediction>, ForecastError>;

	/// Scores one-step predictions over the newest [`EVALUATION_TAIL`] bars.
	fn evaluate(&self, bars: &[Bar]) -> Result<Metrics, ForecastError>;
}

/// Holds the training flag of one forecaster and clears it when dropped.
pub(crate) struct TrainingGuard<'a>(&'a AtomicBool);

impl<'a> TrainingGuard<'a> {
	pub fn acquire(flag: &'a AtomicBool) -> Result<Self, ForecastError> {
		flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.map_err(|_| ForecastError::ConcurrentTraining)?;

		Ok(Self(flag))
	}
}

impl Drop for TrainingGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

pub(crate) fn require_bars(bars: &[Bar], required: usize) -> Result<(), ForecastError> {
	if bars.len() < required {
		return Err(ForecastError::InsufficientData {
			required,
			available: bars.len(),
		});
	}

	Ok(())
}

/// Seeded from `seed` when given, otherwise from the thread generator.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
	StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

pub(crate) fn state_error(err: impl std::fmt::Display) -> ForecastError {
	ForecastError::State(err.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn guard_rejects_second_holder_until_dropped() {
		let flag = AtomicBool::new(false);

		let first = TrainingGuard::acquire(&flag).unwrap();
		assert!(matches!(
			TrainingGuard::acquire(&flag),
			Err(ForecastError::ConcurrentTraining)
		));

		drop(first);
		assert!(TrainingGuard::acquire(&flag).is_ok());
		assert!(!flag.load(Ordering::Acquire));
	}

	#[test]
	fn require_bars_reports_shortfall() {
		let bars = vec![Bar::default(); 3];

		assert!(require_bars(&bars, 3).is_ok());
		assert!(matches!(
			require_bars(&bars, 11),
			Err(ForecastError::InsufficientData {
				required: 11,
				available: 3
			})
		));
	}

	#[test]
	fn model_kind_round_trips_through_strings() {
		assert_eq!(ModelKind::Neural.to_string(), "neural");
		assert_eq!("linear".parse::<ModelKind>().unwrap(), ModelKind::Linear);
	}
}
