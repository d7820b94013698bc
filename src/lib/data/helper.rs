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

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};

use super::typedef::*;

pub(super) fn base_price_for_symbol(symbol: &str) -> f64 {
	DEMO_SYMBOLS
		.iter()
		.find(|each| each.symbol == symbol)
		.map(|found| found.base_price)
		.unwrap_or(DEFAULT_BASE_PRICE)
}

/// Weekly and monthly cycles, keyed on day of week (Sunday = 0) and day of month.
pub(super) fn seasonal_factor(date: NaiveDate) -> f64 {
	let day_of_week = date.weekday().num_days_from_sunday() as f64;
	let day_of_month = date.day() as f64;

	(day_of_week * PI / 3f64).sin() * 0.02f64 + (day_of_month * PI / 15f64).sin() * 0.01f64
}

pub(super) fn round_cents(value: f64) -> f64 {
	(value * 100f64).round() / 100f64
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_symbols_use_lookup_table() {
		assert_eq!(base_price_for_symbol("AAPL"), 180f64);
		assert_eq!(base_price_for_symbol("NVDA"), 480f64);
		assert_eq!(base_price_for_symbol("ZZZZ"), DEFAULT_BASE_PRICE);
	}

	#[test]
	fn seasonal_factor_is_bounded() {
		let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
		for date in start.iter_days().take(400) {
			assert!(seasonal_factor(date).abs() <= 0.03f64 + f64::EPSILON);
		}
	}

	#[test]
	fn round_cents_keeps_two_decimals() {
		assert_eq!(round_cents(101.23456f64), 101.23f64);
		assert_eq!(round_cents(99.996f64), 100f64);
	}
}
