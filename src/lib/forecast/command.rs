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

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use super::*;

/// Trains `forecaster` on the blocking pool. Progress is forwarded in epoch order; a closed
/// receiver does not interrupt training.
pub async fn start_train<F>(
	forecaster: Arc<F>,
	bars: Arc<[Bar]>,
	progress: UnboundedSender<EpochProgress>,
) -> Result<TrainSummary, ForecastError>
where
	F: Forecaster + ?Sized + 'static,
{
	tokio::task::spawn_blocking(move || {
		forecaster.train(&bars, &mut |each| {
			let _ = progress.send(each);
		})
	})
	.await
	.map_err(state_error)?
}

pub async fn get_prediction<F>(
	forecaster: Arc<F>,
	bars: Arc<[Bar]>,
	steps: usize,
) -> Result<Vec<Prediction>, ForecastError>
where
	F: Forecaster + ?Sized + 'static,
{
	tokio::task::spawn_blocking(move || forecaster.predict(&bars, steps))
		.await
		.map_err(state_error)?
}

pub async fn get_evaluation<F>(
	forecaster: Arc<F>,
	bars: Arc<[Bar]>,
) -> Result<Metrics, ForecastError>
where
	F: Forecaster + ?Sized + 'static,
{
	tokio::task::spawn_blocking(move || forecaster.evaluate(&bars))
		.await
		.map_err(state_error)?
}
