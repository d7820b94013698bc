#![recursion_limit = "256"]

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

pub mod caption;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod forecast;
pub mod preprocess;
pub mod train;
pub mod typedef;

pub use caption::{
	command::CaptionClient, config::CaptionConfig, stats::SessionStats, typedef::*,
};
pub use data::{
	command::{available_symbols, generate_seeded_series, generate_series, generate_series_with},
	typedef::SymbolInfo,
};
pub use error::{CaptionError, ForecastError, MetricsError};
pub use evaluate::{command::calculate_metrics, typedef::Metrics};
pub use forecast::{Forecaster, LinearForecaster, ModelKind, NeuralForecaster, DEFAULT_STEPS};
pub use train::typedef::{EpochProgress, TrainSummary, TrainingConfig};
pub use typedef::{Bar, MinMax, Prediction, StockSeries};
