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

use super::helper::*;
use super::typedef::*;
use crate::typedef::{Bar, MinMax};

/// Windows of raw closes labelled with the next raw close.
pub fn close_windows(bars: &[Bar], lookback: usize) -> WindowSet {
	let closes = bars.iter().map(|each| each.close).collect::<Vec<_>>();

	let (features, labels) = slide(&closes, lookback)
		.map(|(window, index)| (window.to_vec(), closes[index]))
		.unzip();

	WindowSet {
		features,
		labels,
		width: lookback,
	}
}

/// Windows of interleaved normalized (close, volume) steps labelled with the next normalized
/// close. Both columns are scaled by their own min and max over the whole of `bars`.
pub fn close_volume_windows(bars: &[Bar], lookback: usize) -> NormalizedWindowSet {
	let price_range = MinMax::of(bars.iter().map(|each| each.close)).unwrap_or_default();
	let volume_range = MinMax::of(bars.iter().map(|each| each.volume as f64)).unwrap_or_default();

	close_volume_windows_in(bars, lookback, price_range, volume_range)
}

/// Like [`close_volume_windows`] but scales with ranges captured elsewhere, typically at
/// training time.
pub fn close_volume_windows_in(
	bars: &[Bar],
	lookback: usize,
	price_range: MinMax,
	volume_range: MinMax,
) -> NormalizedWindowSet {
	let closes = normalize_column(
		&bars.iter().map(|each| each.close).collect::<Vec<_>>(),
		&price_range,
	);
	let volumes = normalize_column(
		&bars.iter().map(|each| each.volume as f64).collect::<Vec<_>>(),
		&volume_range,
	);

	let (features, labels) = slide(&closes, lookback)
		.map(|(window, index)| {
			let start = index - lookback;
			(
				interleave(window, &volumes[start..index]),
				closes[index],
			)
		})
		.unzip();

	NormalizedWindowSet {
		windows: WindowSet {
			features,
			labels,
			width: lookback * 2,
		},
		price_range,
		volume_range,
	}
}
