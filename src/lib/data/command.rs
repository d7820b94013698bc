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

use chrono::{Local, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::helper::*;
use super::typedef::*;
use crate::typedef::{Bar, StockSeries};

pub fn available_symbols() -> &'static [SymbolInfo] {
	&DEMO_SYMBOLS
}

/// Synthesizes `days` daily bars ending yesterday. Every call yields a different walk.
pub fn generate_series(symbol: &str, days: usize) -> StockSeries {
	generate_series_with(symbol, days, Local::now().date_naive(), &mut rand::rng())
}

/// Same walk shape as [`generate_series`], but reproducible for a given `seed`.
pub fn generate_seeded_series(symbol: &str, days: usize, seed: u64) -> StockSeries {
	let mut rng = StdRng::seed_from_u64(seed);
	generate_series_with(symbol, days, Local::now().date_naive(), &mut rng)
}

pub fn generate_series_with<R: Rng>(
	symbol: &str,
	days: usize,
	today: NaiveDate,
	rng: &mut R,
) -> StockSeries {
	let start_date = today
		.checked_sub_days(chrono::Days::new(days as u64))
		.unwrap_or(NaiveDate::MIN);

	let mut state = WalkState {
		base_price: base_price_for_symbol(symbol),
		drift: 0.001f64,
	};

	let bars = start_date
		.iter_days()
		.take(days)
		.map(|date| {
			let noise = (rng.random::<f64>() - 0.5f64) * 0.04f64;
			state.base_price *= 1f64 + state.drift + seasonal_factor(date) + noise;

			let volatility = state.base_price * 0.02f64;
			let open = state.base_price + (rng.random::<f64>() - 0.5f64) * volatility;
			let close = state.base_price + (rng.random::<f64>() - 0.5f64) * volatility;
			let high = open.max(close) + rng.random::<f64>() * volatility * 0.5f64;
			let low = open.min(close) - rng.random::<f64>() * volatility * 0.5f64;
			let volume = (1_000_000f64 + rng.random::<f64>() * 5_000_000f64).floor() as u64;

			state.drift += (rng.random::<f64>() - 0.5f64) * 0.0001f64;

			Bar {
				date,
				open: round_cents(open),
				high: round_cents(high),
				low: round_cents(low),
				close: round_cents(close),
				volume,
			}
		})
		.collect::<Vec<_>>();

	tracing::debug!(symbol, days, "generated synthetic series");

	StockSeries {
		symbol: symbol.to_string(),
		bars,
	}
}
